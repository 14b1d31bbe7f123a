/// Error types for the status command
///
/// Fetch failures are always fatal to the current invocation: nothing is
/// rendered once the server has answered with a non-success status.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatusError>;

#[derive(Error, Debug)]
pub enum StatusError {
    /// The server answered, but not with HTTP 200
    #[error("Problem retrieving status (HTTP {status}):\ninput:{task}\noutput:{body}\nreason:{reason}")]
    Communication { task: String, status: u16, body: String, reason: String },

    /// The request never produced an answer (DNS, TLS, timeout, ...)
    #[error("Failed to contact {url}: {message}")]
    Transport { url: String, message: String },

    /// A response body did not have the expected shape
    #[error("Malformed server response: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StatusError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            StatusError::Communication { .. } | StatusError::Transport { .. } => 3,
            _ => 1,
        }
    }
}
