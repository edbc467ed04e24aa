//! Session state and the aggregation controller.
//!
//! `SessionController` owns the whole session: input text, active tab, the
//! three result slots, the error message and the theme. An analysis run moves
//! the session `Idle/Settled -> Running -> Settled`; the three AI tasks run as
//! independent tokio tasks and are settled together, so one failure never
//! hides the others' results.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinError;
use uuid::Uuid;

use crate::error::{Result, StudyError};
use crate::models::{AnalysisResult, GeneratedQuestions, Topic};
use crate::tasks::{StudyAssistant, Task};
use crate::theme::{Theme, ThemeStore};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text or upload a file to analyze.";
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Unsupported file type. Please upload a .txt file.";
pub const FILE_READ_MESSAGE: &str = "Failed to read the file.";
pub const AGGREGATE_FAILURE_MESSAGE: &str =
    "One or more AI tasks failed. Some results may be missing.";
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred. Please check the console and try again.";

pub const LOADING_MESSAGES: [&str; 6] = [
    "Brewing coffee for the AI...",
    "Analyzing textual nuances...",
    "Generating insightful questions...",
    "Predicting key topics...",
    "Consulting the digital oracles...",
    "Almost there...",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Settled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Analysis,
    Questions,
    Topics,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Analysis, Tab::Questions, Tab::Topics];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Analysis => "Summary & Keywords",
            Tab::Questions => "Question Generator",
            Tab::Topics => "Topic Prediction",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub input_text: String,
    pub file_name: Option<String>,
    pub active_tab: Tab,
    pub phase: Phase,
    pub loading: bool,
    pub loading_message_index: usize,
    pub error: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub questions: Option<GeneratedQuestions>,
    pub topics: Option<Vec<Topic>>,
    /// MCQ indices whose answer is currently shown
    pub revealed_answers: BTreeSet<usize>,
    pub theme: Theme,
}

/// Terminal result of one AI task
pub type TaskOutcome<T> = Result<T>;

/// The three settled outcomes of a run
#[derive(Debug)]
pub struct Settlement {
    pub analysis: TaskOutcome<AnalysisResult>,
    pub questions: TaskOutcome<GeneratedQuestions>,
    pub topics: TaskOutcome<Vec<Topic>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub succeeded: Vec<Task>,
    pub failed: Vec<Task>,
}

impl RunReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    fn record<T>(&mut self, task: Task, outcome: TaskOutcome<T>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.succeeded.push(task);
                Some(value)
            }
            Err(e) => {
                tracing::warn!(run_id = %self.run_id, %task, error = %e, "AI task failed");
                self.failed.push(task);
                None
            }
        }
    }
}

impl SessionState {
    pub fn has_results(&self) -> bool {
        self.analysis.is_some() || self.questions.is_some() || self.topics.is_some()
    }

    /// Whether the analyze action should be offered
    pub fn can_analyze(&self) -> bool {
        self.phase != Phase::Running && !self.input_text.trim().is_empty()
    }

    pub fn loading_message(&self) -> &'static str {
        LOADING_MESSAGES[self.loading_message_index % LOADING_MESSAGES.len()]
    }

    /// Guard and enter `Running`. Returns the text to analyze.
    fn begin_run(&mut self) -> Result<String> {
        if self.phase == Phase::Running {
            return Err(StudyError::Busy);
        }
        if self.input_text.trim().is_empty() {
            self.error = Some(EMPTY_INPUT_MESSAGE.to_string());
            return Err(StudyError::InputValidation(EMPTY_INPUT_MESSAGE.to_string()));
        }

        self.phase = Phase::Running;
        self.loading = true;
        self.loading_message_index = 0;
        self.error = None;
        self.analysis = None;
        self.questions = None;
        self.topics = None;
        self.revealed_answers.clear();

        Ok(self.input_text.clone())
    }

    /// Apply the settled outcomes of a run and leave `Running`
    pub fn settle(&mut self, run_id: Uuid, settlement: Settlement) -> RunReport {
        let mut report = RunReport::new(run_id);

        self.analysis = report.record(Task::Analysis, settlement.analysis);
        self.questions = report.record(Task::Questions, settlement.questions);
        self.topics = report.record(Task::Topics, settlement.topics);

        if !report.failed.is_empty() {
            self.error = Some(AGGREGATE_FAILURE_MESSAGE.to_string());
        }
        self.loading = false;
        self.phase = Phase::Settled;

        report
    }

    fn fail_unexpectedly(&mut self) {
        self.error = Some(UNEXPECTED_ERROR_MESSAGE.to_string());
        self.loading = false;
        self.phase = Phase::Settled;
    }
}

/// Declared type must be `text/plain`, optionally with parameters
fn is_plain_text(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
}

fn joined<T>(task: Task, res: std::result::Result<TaskOutcome<T>, JoinError>) -> TaskOutcome<T> {
    res.unwrap_or_else(|e| {
        Err(StudyError::Internal(format!(
            "{task} task did not complete: {e}"
        )))
    })
}

pub struct SessionController {
    assistant: Arc<dyn StudyAssistant>,
    state: Arc<RwLock<SessionState>>,
    themes: Option<ThemeStore>,
    #[cfg(test)]
    settle_hook: Option<fn()>,
}

impl SessionController {
    pub fn new(assistant: Arc<dyn StudyAssistant>) -> Self {
        Self::with_state(assistant, SessionState::default())
    }

    fn with_state(assistant: Arc<dyn StudyAssistant>, state: SessionState) -> Self {
        Self {
            assistant,
            state: Arc::new(RwLock::new(state)),
            themes: None,
            #[cfg(test)]
            settle_hook: None,
        }
    }

    /// Persist the theme in `store`, starting from its saved value
    pub fn with_theme_store(self, store: ThemeStore) -> Self {
        let state = SessionState {
            theme: store.load(),
            ..Default::default()
        };
        Self {
            themes: Some(store),
            ..Self::with_state(self.assistant, state)
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Replace the input text; a typed edit detaches any loaded file name
    pub async fn set_input_text(&self, text: String) {
        let mut state = self.state.write().await;
        state.input_text = text;
        state.file_name = None;
    }

    /// Load an uploaded file's content as the input text
    pub async fn load_file(
        &self,
        name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<()> {
        let mut state = self.state.write().await;

        if !is_plain_text(content_type) {
            tracing::warn!(file = name, ?content_type, "Rejected upload");
            state.error = Some(UNSUPPORTED_FILE_MESSAGE.to_string());
            return Err(StudyError::InputValidation(
                UNSUPPORTED_FILE_MESSAGE.to_string(),
            ));
        }

        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(file = name, error = %e, "Upload is not valid UTF-8");
                state.error = Some(FILE_READ_MESSAGE.to_string());
                return Err(StudyError::InputValidation(FILE_READ_MESSAGE.to_string()));
            }
        };

        tracing::info!(file = name, bytes = bytes.len(), "Loaded text file");
        state.input_text = text.to_string();
        state.file_name = Some(name.to_string());
        state.error = None;
        Ok(())
    }

    pub async fn clear_file(&self) {
        let mut state = self.state.write().await;
        state.file_name = None;
        state.input_text.clear();
        state.error = None;
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.state.write().await.active_tab = tab;
    }

    /// Show or hide one MCQ's answer. Returns whether it is now shown.
    pub async fn toggle_answer(&self, index: usize) -> Result<bool> {
        let mut state = self.state.write().await;
        let count = state.questions.as_ref().map_or(0, |q| q.mcqs.len());
        if index >= count {
            return Err(StudyError::InputValidation(format!(
                "No multiple-choice question at position {}",
                index + 1
            )));
        }

        if state.revealed_answers.remove(&index) {
            Ok(false)
        } else {
            state.revealed_answers.insert(index);
            Ok(true)
        }
    }

    /// Flip the theme and persist it
    pub async fn toggle_theme(&self) -> Result<Theme> {
        let mut state = self.state.write().await;
        let theme = state.theme.toggled();
        if let Some(store) = &self.themes {
            store.save(theme)?;
        }
        state.theme = theme;
        Ok(theme)
    }

    /// Advance the rotating loading message while a run is in flight
    pub async fn next_loading_message(&self) -> &'static str {
        let mut state = self.state.write().await;
        if state.loading {
            state.loading_message_index = (state.loading_message_index + 1) % LOADING_MESSAGES.len();
        }
        state.loading_message()
    }

    /// Run all three AI tasks over the current input and settle the session.
    ///
    /// Fails fast with `Busy` when a run is already in flight, before the
    /// input is even looked at, and otherwise with `InputValidation` on blank
    /// input; neither touches the result slots. Individual task failures are
    /// not errors here: they leave their slot empty and set the aggregate
    /// warning.
    ///
    /// The run is driven by its own tokio task, so dropping the returned
    /// future (a client hanging up mid-request) still settles the session.
    pub async fn run(&self) -> Result<RunReport> {
        let text = self.state.write().await.begin_run()?;
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, chars = text.len(), "Starting analysis run");

        let assistant = Arc::clone(&self.assistant);
        let state = Arc::clone(&self.state);
        #[cfg(test)]
        let settle_hook = self.settle_hook;

        let driver = tokio::spawn(async move {
            let settlement = dispatch(assistant, text).await;

            let settled = AssertUnwindSafe(async {
                let mut state = state.write().await;
                #[cfg(test)]
                if let Some(hook) = settle_hook {
                    hook();
                }
                state.settle(run_id, settlement)
            })
            .catch_unwind()
            .await;

            match settled {
                Ok(report) => {
                    tracing::info!(
                        %run_id,
                        succeeded = report.succeeded.len(),
                        failed = report.failed.len(),
                        "Analysis run settled"
                    );
                    Ok(report)
                }
                Err(_) => {
                    tracing::error!(%run_id, "Analysis run aborted unexpectedly");
                    state.write().await.fail_unexpectedly();
                    Err(StudyError::Internal(format!("analysis run {run_id} panicked")))
                }
            }
        });

        match driver.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(%run_id, error = %e, "Analysis run driver did not complete");
                self.state.write().await.fail_unexpectedly();
                Err(StudyError::Internal(format!(
                    "analysis run {run_id} did not complete: {e}"
                )))
            }
        }
    }
}

/// Spawn the three tasks and wait for every one of them to finish
async fn dispatch(assistant: Arc<dyn StudyAssistant>, text: String) -> Settlement {
    let text: Arc<str> = Arc::from(text);

    let analysis = {
        let assistant = Arc::clone(&assistant);
        let text = Arc::clone(&text);
        tokio::spawn(async move { assistant.analyze_document(&text).await })
    };
    let questions = {
        let assistant = Arc::clone(&assistant);
        let text = Arc::clone(&text);
        tokio::spawn(async move { assistant.generate_questions(&text).await })
    };
    let topics = tokio::spawn(async move { assistant.predict_topics(&text).await });

    let (analysis, questions, topics) = tokio::join!(analysis, questions, topics);

    Settlement {
        analysis: joined(Task::Analysis, analysis),
        questions: joined(Task::Questions, questions),
        topics: joined(Task::Topics, topics),
    }
}
