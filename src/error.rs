use std::time::Duration;
use tokio_util::codec::LinesCodecError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to start server {path}: {source}")]
    Spawn {
        path: String,
        source: std::io::Error,
    },

    #[error("Server {0} is not piped")]
    MissingPipe(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] LinesCodecError),

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("Elicitation request has no id")]
    MissingRequestId,
}

pub type Result<T> = std::result::Result<T, Error>;
