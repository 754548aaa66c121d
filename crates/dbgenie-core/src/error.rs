use thiserror::Error;

use crate::session::Action;

/// Core error type shared across dbgenie crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Submission attempted with no table that has at least one column.
    #[error("define at least one table with columns before generating data")]
    EmptySchema,
    /// Suggestion requested without a description of the database.
    #[error("enter a description of the database context first")]
    EmptyContext,
    /// The control for this action is disabled while a request is in flight.
    #[error("{0} request already in progress")]
    Busy(Action),
    #[error("no table at position {0}")]
    UnknownTable(usize),
    #[error("no column at position {column} in table {table}")]
    UnknownColumn { table: usize, column: usize },
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    /// A schema draft or payload could not be read.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by dbgenie crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a call to the generation service.
///
/// None of these are fatal: the session stays usable and the table list is
/// never left empty after one is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Non-2xx response. `message` is the server's `error` field when it sent
    /// one, otherwise a generic status line.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// 2xx response whose body matches no recognized shape.
    #[error("unrecognized response: {0}")]
    Malformed(String),
    /// Network failure before any response arrived.
    #[error("network error: {0}")]
    Transport(String),
    #[error("request timed out after {0}s")]
    TimedOut(u64),
}

impl RemoteError {
    /// Build a rejection from a status code and an optional structured message.
    /// The message is kept as sent unless it is blank.
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));
        RemoteError::Rejected { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_server_message() {
        let err = RemoteError::rejected(503, Some("AI is not active.".to_string()));
        assert_eq!(err.to_string(), "AI is not active.");

        let padded = RemoteError::rejected(400, Some(" Empty context.\n".to_string()));
        assert_eq!(padded.to_string(), " Empty context.\n");
    }

    #[test]
    fn rejection_falls_back_to_status() {
        let err = RemoteError::rejected(500, Some("  ".to_string()));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(
            RemoteError::rejected(404, None),
            RemoteError::Rejected {
                status: 404,
                message: "HTTP error! status: 404".to_string()
            }
        );
    }
}
