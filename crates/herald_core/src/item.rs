//! Inbound items (mentions) fetched from the platform.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reference types marking an item as a pure re-share of another item.
///
/// `retweeted` is the value the X API v2 reports; `retweet` is accepted as well.
pub const RESHARE_TYPES: &[&str] = &["retweeted", "retweet"];

/// One unit of inbound content, immutable once fetched.
///
/// # Examples
///
/// ```
/// use herald_core::InboundItemBuilder;
///
/// let item = InboundItemBuilder::default()
///     .id("1850000000000000001")
///     .text("@herald what's new?")
///     .author_id("42")
///     .author_username("alice")
///     .build()
///     .expect("Valid item");
///
/// assert_eq!(item.author_username(), "alice");
/// assert!(!item.is_reshare());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct InboundItem {
    /// Platform-unique item id
    id: String,
    /// Item text as posted
    text: String,
    /// Author account id
    author_id: String,
    /// Author handle, without the leading `@`
    author_username: String,
    /// How this item references other items (e.g. `retweeted`, `quoted`, `replied_to`)
    #[builder(default, setter(each(name = "referenced_type", into)))]
    #[serde(default)]
    referenced_types: BTreeSet<String>,
}

impl InboundItem {
    /// Whether the item is only a re-share of someone else's item.
    ///
    /// Quotes and replies carry their own text and are still address-able.
    pub fn is_reshare(&self) -> bool {
        self.referenced_types
            .iter()
            .any(|kind| RESHARE_TYPES.contains(&kind.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(types: &[&str]) -> InboundItem {
        let mut builder = InboundItemBuilder::default();
        builder
            .id("1")
            .text("hello")
            .author_id("2")
            .author_username("bob");
        for kind in types {
            builder.referenced_type(*kind);
        }
        builder.build().expect("Valid item")
    }

    #[test]
    fn test_plain_mention_is_not_reshare() {
        assert!(!item(&[]).is_reshare());
    }

    #[test]
    fn test_retweet_is_reshare() {
        assert!(item(&["retweeted"]).is_reshare());
        assert!(item(&["retweet"]).is_reshare());
    }

    #[test]
    fn test_quote_and_reply_are_addressable() {
        assert!(!item(&["quoted"]).is_reshare());
        assert!(!item(&["replied_to"]).is_reshare());
    }
}
