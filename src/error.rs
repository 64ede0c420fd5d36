//! Error types for Waylay

use thiserror::Error;

/// Result type for Waylay operations
pub type Result<T> = std::result::Result<T, WaylayError>;

/// Errors that can occur in Waylay
///
/// Variants are `Clone` so a failure can be recorded in the call log and
/// still be returned to the caller.
#[derive(Debug, Clone, Error)]
pub enum WaylayError {
    /// No expectation matched the dispatched request
    #[error("Connection refused: {url}")]
    ConnectionRefused {
        /// URL of the unmatched request
        url: String,
    },

    /// A response sequence was matched more times than it has responses
    #[error("Response sequence exhausted for {method} {url}")]
    SequenceExhausted {
        /// Method of the exhausted expectation
        method: String,
        /// URL pattern of the exhausted expectation
        url: String,
    },

    /// Header value contains bytes that cannot travel in an HTTP header
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// Header name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A session was started while another activation is in progress
    #[error("Interception session is already active")]
    AlreadyActive,

    /// The client has no transport hook installed
    #[error("No transport hook installed for request to {0}")]
    NoTransport(String),

    /// Generic error with context, mainly for callback authors
    #[error("{0}")]
    Other(String),
}
