use std::io;
use thiserror::Error;

/// Unified error type for the neochat application
#[derive(Error, Debug)]
pub enum ChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Transport-level failures talking to a lookup service
    #[error("Network error: {0}")]
    Network(String),

    /// A lookup service answered with a non-success status
    #[error("Upstream returned status {status}")]
    Upstream { status: u16 },

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A plugin trigger pattern failed to compile or is not anchored
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Conversation history file errors
    #[error("History error: {0}")]
    History(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ChatError::Upstream {
                status: status.as_u16(),
            }
        } else if err.is_timeout() {
            ChatError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ChatError::Serialization(format!("Response body: {}", err))
        } else {
            ChatError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<regex::Error> for ChatError {
    fn from(err: regex::Error) -> Self {
        ChatError::Pattern(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for ChatError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ChatError::Input(format!("Line editor: {}", err))
    }
}
