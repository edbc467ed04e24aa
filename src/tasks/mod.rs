//! The three AI request functions: document analysis, question generation
//! and topic prediction.

pub mod analysis;
pub mod questions;
pub mod topics;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StudyError};
use crate::models::{AnalysisResult, GenerateRequest, GeneratedQuestions, Topic};
use crate::parser::parse_json_response;
use crate::transport::Transport;

#[cfg(test)]
use mockall::automock;

/// Names one of the three AI request functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Analysis,
    Questions,
    Topics,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Analysis, Task::Questions, Task::Topics];
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Task::Analysis => "document analysis",
            Task::Questions => "question generation",
            Task::Topics => "topic prediction",
        };
        f.write_str(name)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait StudyAssistant: Send + Sync + 'static {
    async fn analyze_document(&self, text: &str) -> Result<AnalysisResult>;
    async fn generate_questions(&self, text: &str) -> Result<GeneratedQuestions>;
    async fn predict_topics(&self, text: &str) -> Result<Vec<Topic>>;
}

/// Gemini-backed implementation of the three study tasks
pub struct GeminiStudy {
    tx: Arc<dyn Transport>,
    model: String,
}

impl GeminiStudy {
    pub fn new(tx: Arc<dyn Transport>, model: String) -> Self {
        Self { tx, model }
    }

    /// Send one prompt and parse the reply into `T`
    async fn request<T: DeserializeOwned>(
        &self,
        task: Task,
        contents: String,
        response_schema: serde_json::Value,
    ) -> Result<T> {
        tracing::info!("Requesting {} from model {}", task, self.model);

        let request = GenerateRequest {
            model: self.model.clone(),
            contents,
            response_schema,
        };
        let raw = self.tx.generate_content(&request).await?;

        parse_json_response(&raw).ok_or(StudyError::Parse { task, raw })
    }
}

#[async_trait]
impl StudyAssistant for GeminiStudy {
    async fn analyze_document(&self, text: &str) -> Result<AnalysisResult> {
        self.request(Task::Analysis, analysis::prompt(text), analysis::response_schema())
            .await
    }

    async fn generate_questions(&self, text: &str) -> Result<GeneratedQuestions> {
        self.request(
            Task::Questions,
            questions::prompt(text),
            questions::response_schema(),
        )
        .await
    }

    async fn predict_topics(&self, text: &str) -> Result<Vec<Topic>> {
        self.request(Task::Topics, topics::prompt(text), topics::response_schema())
            .await
    }
}
