use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Unknown formatting command: {0}")]
    UnknownCommand(String),

    #[error("Malformed host message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}
