use dbgenie_core::RemoteError;
use thiserror::Error;

/// Errors raised while setting up or using a generation service client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("failed to build http client: {0}")]
    Build(String),
}

/// Result type for client construction.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Failure of a session-driven call: blocked locally or failed remotely.
#[derive(Debug, Error)]
pub enum SessionCallError {
    #[error(transparent)]
    Local(#[from] dbgenie_core::Error),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
