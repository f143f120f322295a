//! Collaborator contracts consumed by the agent loops.

use async_trait::async_trait;
use herald_core::{InboundItem, PublishedPost};
use herald_error::HeraldResult;

/// Core trait that all text generation backends implement.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate text for a prompt.
    ///
    /// # Errors
    ///
    /// Returns a generation error on provider failure.
    async fn generate_text(&self, prompt: &str) -> HeraldResult<String>;

    /// Provider name (e.g., "openai", "anthropic").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Sink for original posts and replies.
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Publish a standalone post.
    ///
    /// # Errors
    ///
    /// Returns a publish error if the platform rejects or never receives the post.
    async fn publish_content(&self, text: &str) -> HeraldResult<PublishedPost>;

    /// Publish a reply addressed to an existing item.
    ///
    /// # Errors
    ///
    /// Returns a publish error if the platform rejects or never receives the reply.
    async fn publish_reply(&self, text: &str, in_reply_to_id: &str) -> HeraldResult<PublishedPost>;

    /// Platform name (e.g., "x", "dry-run").
    fn platform_name(&self) -> &str;
}

/// Source of inbound items addressed to the agent.
#[async_trait]
pub trait MentionSource: Send + Sync {
    /// Fetch items strictly newer than `cursor`, at most `page_size` of them.
    ///
    /// A `None` cursor fetches the most recent page. Items are returned in the
    /// order they should be handled.
    ///
    /// # Errors
    ///
    /// Returns a fetch error on platform failure.
    async fn fetch_mentions_since(
        &self,
        cursor: Option<&str>,
        page_size: usize,
    ) -> HeraldResult<Vec<InboundItem>>;
}
