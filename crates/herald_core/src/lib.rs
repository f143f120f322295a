//! Core data types for the herald social agent.
//!
//! These are the values that flow between the agent loops and their external
//! collaborators: weighted topic options, inbound items (mentions), and the
//! identifiers of published posts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod item;
mod item_id;
mod option;
mod post;

pub use item::{InboundItem, InboundItemBuilder, InboundItemBuilderError, RESHARE_TYPES};
pub use item_id::{compare_item_ids, newest_item_id};
pub use option::WeightedOption;
pub use post::PublishedPost;
