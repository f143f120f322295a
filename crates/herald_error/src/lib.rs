//! Error types for the herald social agent.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The three collaborator failures ([`GenerationError`], [`PublishError`],
//! [`FetchError`]) are recoverable at the loop level. [`ConfigError`] only
//! surfaces at startup.
//!
//! # Examples
//!
//! ```
//! use herald_error::{FetchError, FetchErrorKind, HeraldResult};
//!
//! fn fetch() -> HeraldResult<Vec<String>> {
//!     Err(FetchError::new(FetchErrorKind::RateLimited))?
//! }
//!
//! let err = fetch().unwrap_err();
//! assert!(err.is_recoverable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod fetch;
mod generation;
mod publish;

pub use config::ConfigError;
pub use error::{HeraldError, HeraldErrorKind, HeraldResult};
pub use fetch::{FetchError, FetchErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use publish::{PublishError, PublishErrorKind};
