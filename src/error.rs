//! Error types for study-ai

use thiserror::Error;

use crate::tasks::Task;

pub type Result<T> = std::result::Result<T, StudyError>;

/// Main error type for the study assistant
#[derive(Error, Debug)]
pub enum StudyError {
    /// Rejected before any network call: blank input, wrong file type, unreadable file
    #[error("{0}")]
    InputValidation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to parse {task} response")]
    Parse { task: Task, raw: String },

    #[error("An analysis run is already in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
