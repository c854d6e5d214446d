use std::time::Duration;
use thiserror::Error;

/// Errors produced while resolving the bind address or answering a query.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("config error: {0}")]
    Config(String),

    #[error("bind failed on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    /// The resolver could not be spawned or exited abnormally. Carries the
    /// resolver's diagnostic stream.
    #[error("{0}")]
    Subprocess(String),

    #[error("parse error: {0}")]
    Parse(String),

    /// The resolver ran but reported that the target server is unreachable
    /// or invalid.
    #[error("{0}")]
    Domain(String),

    #[error("resolver timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Parse(e.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
