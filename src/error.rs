use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalsError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid timestamp '{input}'. Accepted formats: {}", .accepted.join(", "))]
    InvalidTimestamp {
        input: String,
        accepted: Vec<&'static str>,
    },

    #[error("HTTP {status}: {message}")]
    Transport { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EvalsError {
    /// HTTP status code of a failed server response, if this error carries one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EvalsError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalsError>;
