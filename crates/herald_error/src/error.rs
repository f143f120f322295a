//! Top-level error wrapper types.

use crate::{ConfigError, FetchError, GenerationError, PublishError};

/// Every failure the agent can observe.
///
/// # Examples
///
/// ```
/// use herald_error::{HeraldError, PublishError, PublishErrorKind};
///
/// let err: HeraldError = PublishError::new(PublishErrorKind::RateLimited).into();
/// assert!(format!("{}", err).contains("Publish Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HeraldErrorKind {
    /// Content generation failed
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Publishing a post or reply failed
    #[from(PublishError)]
    Publish(PublishError),
    /// Fetching inbound items failed
    #[from(FetchError)]
    Fetch(FetchError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Herald error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Herald Error: {}", _0)]
pub struct HeraldError(Box<HeraldErrorKind>);

impl HeraldError {
    /// Create a new error from a kind.
    pub fn new(kind: HeraldErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HeraldErrorKind {
        &self.0
    }

    /// Whether the loops may abandon the current cycle and carry on.
    ///
    /// Only configuration problems are unrecoverable; they are reported before
    /// either loop starts.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), HeraldErrorKind::Config(_))
    }
}

// Generic From implementation for any type that converts to HeraldErrorKind
impl<T> From<T> for HeraldError
where
    T: Into<HeraldErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for herald operations.
pub type HeraldResult<T> = std::result::Result<T, HeraldError>;
