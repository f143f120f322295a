//! Published post identifiers.

use serde::{Deserialize, Serialize};

/// Identifier returned by the platform for a published post or reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublishedPost {
    /// Platform-assigned post id
    pub id: String,
}

impl PublishedPost {
    /// Wrap a platform post id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
