use thiserror::Error;

/// Command store failures. Surfaced to the caller, never folded into a match result.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to access command file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse command file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize command file: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    #[error("command \"{0}\" already exists for this user")]
    Duplicate(String),
}

/// Request-level failures
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("transcription failed: {0}")]
    Transcription(String),
    #[error("rejected audio: {0}")]
    InvalidAudio(String),
}
