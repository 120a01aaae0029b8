use crate::model::TaskId;
use thiserror::Error;

/// Failure surfaced to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("empty_text - please write down a task")]
    EmptyText,
    #[error("import_error - {0}")]
    Import(#[from] ImportError),
    #[error("confirmation_pending - answer the delete confirmation for task {0} first")]
    ConfirmationPending(TaskId),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::EmptyText => "empty_text",
            Self::Import(_) => "import_error",
            Self::ConfirmationPending(_) => "confirmation_pending",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput(message) | Self::InvalidData(message) | Self::Io(message) => {
                message.clone()
            }
            Self::EmptyText => "please write down a task".to_string(),
            Self::Import(err) => err.to_string(),
            Self::ConfirmationPending(id) => {
                format!("answer the delete confirmation for task {id} first")
            }
        }
    }
}

/// Why an externally supplied document could not replace the task list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("invalid file format: expected a list of tasks")]
    NotAList,
    #[error("couldn't import that file: {0}")]
    Parse(String),
}

/// Durable slot failure. Logged by the persistence adapter, never surfaced.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read slot `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write slot `{key}`: {reason}")]
    Write { key: String, reason: String },
}
