//! Publishing error types.

/// Failure conditions when sending a post or reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PublishErrorKind {
    /// Transport-level failure
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Platform returned a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or platform message
        message: String,
    },
    /// Platform rate limit hit (HTTP 429)
    #[display("Rate limited by platform")]
    RateLimited,
    /// Response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// Platform accepted the request but reported errors
    #[display("Post rejected: {}", _0)]
    Rejected(String),
    /// Access token not present in the environment
    #[display("Missing credentials: {} not set", _0)]
    MissingCredentials(String),
}

/// Publish error with location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{PublishError, PublishErrorKind};
///
/// let err = PublishError::new(PublishErrorKind::Rejected("duplicate content".to_string()));
/// assert!(format!("{}", err).contains("duplicate content"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// The kind of error that occurred
    pub kind: PublishErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PublishError {
    /// Create a new publish error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
