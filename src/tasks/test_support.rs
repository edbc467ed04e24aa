use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{Task, analysis, questions, topics};
use crate::error::{Result, StudyError};
use crate::models::GenerateRequest;
use crate::transport::Transport;

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// Transport double that answers by task, so replies do not depend on call order
pub(crate) struct MockTransport {
    replies: HashMap<Task, Reply>,
    delays: HashMap<Task, Duration>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            replies: HashMap::new(),
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn respond(mut self, task: Task, text: impl Into<String>) -> Self {
        self.replies.insert(task, Reply::Text(text.into()));
        self
    }

    pub(crate) fn fail(mut self, task: Task, message: impl Into<String>) -> Self {
        self.replies.insert(task, Reply::Fail(message.into()));
        self
    }

    pub(crate) fn delay(mut self, task: Task, delay: Duration) -> Self {
        self.delays.insert(task, delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .expect("Mock transport mutex should not be poisoned")
            .clone()
    }

    fn task_for(req: &GenerateRequest) -> Option<Task> {
        if req.contents.starts_with(analysis::INSTRUCTION) {
            Some(Task::Analysis)
        } else if req.contents.starts_with(questions::INSTRUCTION) {
            Some(Task::Questions)
        } else if req.contents.starts_with(topics::INSTRUCTION) {
            Some(Task::Topics)
        } else {
            None
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn generate_content(&self, req: &GenerateRequest) -> Result<String> {
        self.requests
            .lock()
            .expect("Mock transport mutex should not be poisoned")
            .push(req.clone());

        let task = Self::task_for(req)
            .ok_or_else(|| StudyError::Transport("Unrecognised prompt".to_string()))?;
        if let Some(delay) = self.delays.get(&task) {
            tokio::time::sleep(*delay).await;
        }
        match self.replies.get(&task) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Fail(message)) => Err(StudyError::Transport(message.clone())),
            None => Err(StudyError::Transport(format!("No mock reply for {task}"))),
        }
    }
}

pub(crate) fn analysis_json() -> String {
    r#"{
        "summary": "Cells are the smallest unit of life and carry out all vital functions.",
        "keywords": ["cell", "membrane", "nucleus", "organelle", "mitosis"]
    }"#
    .to_string()
}

pub(crate) fn questions_json() -> String {
    r#"{
        "mcqs": [
            {"question": "Which organelle holds DNA?", "options": ["Nucleus", "Ribosome", "Vacuole", "Golgi"], "answer": "Nucleus"},
            {"question": "What surrounds the cell?", "options": ["Wall", "Membrane", "Capsid", "Shell"], "answer": "Membrane"},
            {"question": "Which process divides cells?", "options": ["Osmosis", "Mitosis", "Diffusion", "Lysis"], "answer": "Mitosis"}
        ],
        "shortAnswers": ["Define an organelle.", "State one function of the membrane."],
        "longAnswers": ["Describe the stages of mitosis in detail."]
    }"#
    .to_string()
}

pub(crate) fn topics_json() -> String {
    r#"[
        {"topic": "Cell division", "probability": 90},
        {"topic": "Membrane transport", "probability": 65.5},
        {"topic": "Organelles", "probability": 40}
    ]"#
    .to_string()
}

/// A transport where every task succeeds
pub(crate) fn all_success() -> MockTransport {
    MockTransport::new()
        .respond(Task::Analysis, analysis_json())
        .respond(Task::Questions, questions_json())
        .respond(Task::Topics, topics_json())
}
