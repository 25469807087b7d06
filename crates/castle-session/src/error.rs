//! Error types for the session driver.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while playing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The player submitted an empty action.
    #[error("say what you do")]
    EmptyAction,

    /// The playthrough already ended in death or escape.
    #[error("the game is over")]
    SessionOver,

    /// Unknown journal export format.
    #[error("unknown format '{0}', use: markdown, text")]
    UnknownFormat(String),

    /// The narrator failed twice in a row.
    #[error(transparent)]
    Narrator(#[from] NarratorError),
}

/// Failures talking to a narrator backend.
#[derive(Debug, Error)]
pub enum NarratorError {
    /// The request could not be sent or the response not read.
    #[error("narrator request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("narrator returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The request timed out.
    #[error("narrator timed out after {0} s")]
    Timeout(u64),

    /// The reply held no usable JSON object.
    #[error("narrator reply was not valid JSON")]
    InvalidJson,

    /// A scripted narrator ran out of replies.
    #[error("no scripted reply left")]
    Exhausted,
}
