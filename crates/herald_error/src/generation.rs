//! Content generation error types.

/// Failure conditions of a text generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Transport-level failure (connection, TLS, timeout)
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Provider returned a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or provider message
        message: String,
    },
    /// Provider rate limit hit (HTTP 429)
    #[display("Rate limited by provider")]
    RateLimited,
    /// Response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// API key not present in the environment
    #[display("Missing credentials: {} not set", _0)]
    MissingCredentials(String),
    /// Provider answered without any text content
    #[display("Provider returned no text content")]
    EmptyResponse,
    /// Request could not be assembled
    #[display("Failed to build request: {}", _0)]
    Builder(String),
}

impl GenerationErrorKind {
    /// Check if this error type should be retried by the provider client.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::Http(_) | GenerationErrorKind::RateLimited => true,
            GenerationErrorKind::Api { status, .. } => *status >= 500 || *status == 408,
            _ => false,
        }
    }
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::RateLimited);
/// assert!(err.kind.is_retryable());
/// assert!(format!("{}", err).contains("Rate limited"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
