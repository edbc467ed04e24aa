//! View models for the three result tabs and the shell's content area.
//!
//! Every function here is pure: it only reads the slot it is given and never
//! touches session state.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::controller::{SessionState, Tab};
use crate::models::{AnalysisResult, GeneratedQuestions, Topic};
use crate::theme::Theme;

pub const ANALYSIS_PLACEHOLDER: &str = "Summary and keywords will be displayed here after analysis.";
pub const QUESTIONS_PLACEHOLDER: &str =
    "Generated questions will be displayed here after analysis.";
pub const TOPICS_PLACEHOLDER: &str =
    "Predicted topics chart will be displayed here after analysis.";
pub const EMPTY_PROMPT: &str = "Your AI-generated insights will appear here.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisView {
    Placeholder { message: &'static str },
    Ready { summary: String, keywords: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McqView {
    pub number: usize,
    pub question: String,
    /// Options prefixed `a) `, `b) `, ...
    pub options: Vec<String>,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionsView {
    Placeholder {
        message: &'static str,
    },
    Ready {
        mcqs: Vec<McqView>,
        short_answers: Vec<String>,
        long_answer: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPalette {
    pub grid: &'static str,
    pub axis: &'static str,
    pub tick: &'static str,
    pub bar: &'static str,
}

impl ChartPalette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                grid: "#e2e8f0",
                axis: "#64748b",
                tick: "#334155",
                bar: "#4f46e5",
            },
            Theme::Dark => Self {
                grid: "#334155",
                axis: "#94a3b8",
                tick: "#e2e8f0",
                bar: "#38bdf8",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopicsView {
    Placeholder {
        message: &'static str,
    },
    Ready {
        topics: Vec<Topic>,
        palette: ChartPalette,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", content = "view", rename_all = "snake_case")]
pub enum TabView {
    Analysis(AnalysisView),
    Questions(QuestionsView),
    Topics(TopicsView),
}

/// What the result area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentView {
    Loading { message: &'static str },
    Empty { message: &'static str },
    Error { message: String },
    Tab(TabView),
}

pub fn analysis_view(result: Option<&AnalysisResult>) -> AnalysisView {
    match result {
        None => AnalysisView::Placeholder {
            message: ANALYSIS_PLACEHOLDER,
        },
        Some(r) => AnalysisView::Ready {
            summary: r.summary.clone(),
            keywords: r.keywords.clone(),
        },
    }
}

fn option_label(index: usize, option: &str) -> String {
    // a..z, then fall back to numbers
    match u8::try_from(index).ok().filter(|i| *i < 26) {
        Some(i) => format!("{}) {}", char::from(b'a' + i), option),
        None => format!("{}) {}", index + 1, option),
    }
}

pub fn questions_view(
    result: Option<&GeneratedQuestions>,
    revealed: &BTreeSet<usize>,
) -> QuestionsView {
    let Some(q) = result else {
        return QuestionsView::Placeholder {
            message: QUESTIONS_PLACEHOLDER,
        };
    };

    let mcqs = q
        .mcqs
        .iter()
        .enumerate()
        .map(|(i, mcq)| {
            let shown = revealed.contains(&i);
            McqView {
                number: i + 1,
                question: mcq.question.clone(),
                options: mcq
                    .options
                    .iter()
                    .enumerate()
                    .map(|(j, o)| option_label(j, o))
                    .collect(),
                revealed: shown,
                answer: shown.then(|| mcq.answer.clone()),
            }
        })
        .collect();

    QuestionsView::Ready {
        mcqs,
        short_answers: q.short_answers.clone(),
        long_answer: q.long_answers.first().cloned(),
    }
}

/// Topics by descending probability; equal probabilities keep input order
pub fn sorted_topics(topics: &[Topic]) -> Vec<Topic> {
    let mut sorted = topics.to_vec();
    sorted.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    sorted
}

pub fn topics_view(result: Option<&[Topic]>, theme: Theme) -> TopicsView {
    match result {
        None => TopicsView::Placeholder {
            message: TOPICS_PLACEHOLDER,
        },
        Some(topics) => TopicsView::Ready {
            topics: sorted_topics(topics),
            palette: ChartPalette::for_theme(theme),
        },
    }
}

pub fn tab_view(state: &SessionState, tab: Tab) -> TabView {
    match tab {
        Tab::Analysis => TabView::Analysis(analysis_view(state.analysis.as_ref())),
        Tab::Questions => TabView::Questions(questions_view(
            state.questions.as_ref(),
            &state.revealed_answers,
        )),
        Tab::Topics => TabView::Topics(topics_view(state.topics.as_deref(), state.theme)),
    }
}

pub fn content_view(state: &SessionState) -> ContentView {
    if state.loading {
        return ContentView::Loading {
            message: state.loading_message(),
        };
    }
    match (&state.error, state.has_results()) {
        (None, false) => ContentView::Empty {
            message: EMPTY_PROMPT,
        },
        (Some(error), false) => ContentView::Error {
            message: error.clone(),
        },
        _ => ContentView::Tab(tab_view(state, state.active_tab)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{AGGREGATE_FAILURE_MESSAGE, LOADING_MESSAGES};
    use crate::models::Mcq;

    fn topic(name: &str, probability: f64) -> Topic {
        Topic {
            topic: name.to_string(),
            probability,
        }
    }

    fn questions() -> GeneratedQuestions {
        GeneratedQuestions {
            mcqs: vec![
                Mcq {
                    question: "Capital of France?".to_string(),
                    options: vec!["Paris".to_string(), "Lyon".to_string()],
                    answer: "Paris".to_string(),
                },
                Mcq {
                    question: "2 + 2?".to_string(),
                    options: vec!["3".to_string(), "4".to_string(), "5".to_string()],
                    answer: "4".to_string(),
                },
            ],
            short_answers: vec!["Name a river.".to_string()],
            long_answers: vec!["Essay one.".to_string(), "Essay two.".to_string()],
        }
    }

    #[test]
    fn test_topics_sorted_by_descending_probability() {
        let sorted = sorted_topics(&[topic("A", 30.0), topic("B", 90.0), topic("C", 50.0)]);
        let names: Vec<_> = sorted.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn test_topic_ties_keep_input_order() {
        let sorted = sorted_topics(&[
            topic("first", 50.0),
            topic("top", 80.0),
            topic("second", 50.0),
            topic("third", 50.0),
        ]);
        let names: Vec<_> = sorted.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(names, ["top", "first", "second", "third"]);
    }

    #[test]
    fn test_placeholders_for_absent_slots() {
        assert_eq!(
            analysis_view(None),
            AnalysisView::Placeholder {
                message: ANALYSIS_PLACEHOLDER
            }
        );
        assert_eq!(
            questions_view(None, &BTreeSet::new()),
            QuestionsView::Placeholder {
                message: QUESTIONS_PLACEHOLDER
            }
        );
        assert_eq!(
            topics_view(None, Theme::Light),
            TopicsView::Placeholder {
                message: TOPICS_PLACEHOLDER
            }
        );
    }

    #[test]
    fn test_answers_hidden_unless_revealed() {
        let q = questions();
        let revealed: BTreeSet<usize> = [1].into_iter().collect();
        let QuestionsView::Ready {
            mcqs,
            short_answers,
            long_answer,
        } = questions_view(Some(&q), &revealed)
        else {
            panic!("expected populated questions view");
        };

        assert_eq!(mcqs[0].number, 1);
        assert_eq!(mcqs[0].options, ["a) Paris", "b) Lyon"]);
        assert!(!mcqs[0].revealed);
        assert!(mcqs[0].answer.is_none());

        assert!(mcqs[1].revealed);
        assert_eq!(mcqs[1].answer.as_deref(), Some("4"));
        assert_eq!(mcqs[1].options[2], "c) 5");

        assert_eq!(short_answers, ["Name a river."]);
        assert_eq!(long_answer.as_deref(), Some("Essay one."));
    }

    #[test]
    fn test_missing_long_answer_is_tolerated() {
        let mut q = questions();
        q.long_answers.clear();
        let QuestionsView::Ready { long_answer, .. } = questions_view(Some(&q), &BTreeSet::new())
        else {
            panic!("expected populated questions view");
        };
        assert!(long_answer.is_none());
    }

    #[test]
    fn test_option_labels_past_z() {
        assert_eq!(option_label(25, "last"), "z) last");
        assert_eq!(option_label(26, "more"), "27) more");
    }

    #[test]
    fn test_topics_view_uses_theme_palette() {
        let topics = [topic("X", 10.0)];
        let TopicsView::Ready { palette, .. } = topics_view(Some(&topics[..]), Theme::Dark) else {
            panic!("expected populated topics view");
        };
        assert_eq!(palette.bar, "#38bdf8");
    }

    #[test]
    fn test_content_view_states() {
        let mut state = SessionState::default();
        assert_eq!(
            content_view(&state),
            ContentView::Empty {
                message: EMPTY_PROMPT
            }
        );

        state.loading = true;
        assert_eq!(
            content_view(&state),
            ContentView::Loading {
                message: LOADING_MESSAGES[0]
            }
        );

        state.loading = false;
        state.error = Some(AGGREGATE_FAILURE_MESSAGE.to_string());
        assert_eq!(
            content_view(&state),
            ContentView::Error {
                message: AGGREGATE_FAILURE_MESSAGE.to_string()
            }
        );

        // Partial results win over the warning; absent slots show placeholders
        state.questions = Some(questions());
        state.active_tab = Tab::Topics;
        assert_eq!(
            content_view(&state),
            ContentView::Tab(TabView::Topics(TopicsView::Placeholder {
                message: TOPICS_PLACEHOLDER
            }))
        );
    }

    #[test]
    fn test_content_view_serializes_with_tags() {
        let state = SessionState {
            analysis: Some(AnalysisResult {
                summary: "s".to_string(),
                keywords: vec!["k".to_string()],
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(content_view(&state)).expect("serialize");
        assert_eq!(value["kind"], "tab");
        assert_eq!(value["tab"], "analysis");
        assert_eq!(value["view"]["kind"], "ready");
        assert_eq!(value["view"]["summary"], "s");
    }
}
