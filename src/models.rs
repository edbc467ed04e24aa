use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Summary and keywords for a piece of study material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    #[schemars(description = "A concise summary of the provided text.")]
    pub summary: String,

    #[schemars(description = "The top 5 most relevant keywords from the text.")]
    pub keywords: Vec<String>,
}

/// A multiple-choice question. `answer` is expected to match one of `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    #[schemars(description = "The correct option text.")]
    pub answer: String,
}

/// Exam-style questions generated from the source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestions {
    pub mcqs: Vec<Mcq>,
    pub short_answers: Vec<String>,
    /// Only the first entry is shown
    pub long_answers: Vec<String>,
}

/// A predicted exam topic. Probability is nominally 0-100 and is not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Topic {
    #[schemars(description = "The name of the topic.")]
    pub topic: String,

    #[schemars(description = "The probability (0-100) of the topic appearing in an exam.")]
    pub probability: f64,
}

/// One request to the remote model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub contents: String,
    pub response_schema: serde_json::Value,
}

// Gemini generateContent request format
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

impl From<&GenerateRequest> for GeminiRequest {
    fn from(req: &GenerateRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(req.contents.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: req.response_schema.clone(),
            },
        }
    }
}

// Gemini generateContent response format
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}
