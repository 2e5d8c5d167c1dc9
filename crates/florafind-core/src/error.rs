//! Error Types
//!
//! `ClientError` classifies backend failures; `Error` is the crate-wide type.

/// Why a backend call failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("malformed payload: {0}")]
    Decode(String),
}

impl ClientError {
    /// Short kind tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "network",
            ClientError::Status { .. } => "status",
            ClientError::Backend(_) => "backend",
            ClientError::Decode(_) => "decode",
        }
    }

    /// Transport failures and 5xx answers may succeed on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message the backend put in its `error` field, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Backend(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    #[error("Storage encoding failed: {0}")]
    Storage(#[from] serde_json::Error),

    #[error("Storage write for '{key}' failed: {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("No scheduled task with id {0}")]
    UnknownTask(u64),

    #[error("Wizard step '{step}' does not accept {input}")]
    WizardStep {
        step: &'static str,
        input: &'static str,
    },

    #[error("Invalid option '{0}'")]
    InvalidOption(String),

    #[error("A name is required for a custom entry")]
    MissingName,
}

pub type Result<T> = std::result::Result<T, Error>;
