//! Trait definitions for the herald social agent.
//!
//! The agent loops treat text generation, publishing, and mention fetching as
//! black boxes behind these traits. Implementations must be safe to call from
//! both loops concurrently; the loops themselves take no locks around them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ContentGenerator, ContentPublisher, MentionSource};
