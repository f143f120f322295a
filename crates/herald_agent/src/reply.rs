//! Reply generation for inbound mentions.

use crate::{AgentMetrics, MentionHandler, PromptStyle};
use async_trait::async_trait;
use herald_core::InboundItem;
use herald_error::HeraldResult;
use herald_interface::{ContentGenerator, ContentPublisher};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Generates a reply to a mention and publishes it.
///
/// Generation errors are returned to the poller. Publish errors are logged
/// here and swallowed.
pub struct ReplyHandler {
    generator: Arc<dyn ContentGenerator>,
    publisher: Arc<dyn ContentPublisher>,
    style: Arc<PromptStyle>,
    metrics: AgentMetrics,
}

impl ReplyHandler {
    /// Creates a new reply handler.
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        publisher: Arc<dyn ContentPublisher>,
        style: Arc<PromptStyle>,
    ) -> Self {
        Self {
            generator,
            publisher,
            style,
            metrics: AgentMetrics::new(),
        }
    }

    /// Report into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: AgentMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

#[async_trait]
impl MentionHandler for ReplyHandler {
    #[instrument(skip(self, item), fields(item_id = %item.id(), author = %item.author_username()))]
    async fn handle(&self, item: &InboundItem) -> HeraldResult<()> {
        let prompt = self.style.reply_prompt(item);
        let response = self.generator.generate_text(&prompt).await?;
        let response = response.trim();

        if response.is_empty() {
            debug!("Generator returned empty reply, not responding");
            return Ok(());
        }

        match self.publisher.publish_reply(response, item.id()).await {
            Ok(post) => {
                info!(reply_id = %post.id, "Reply published");
                self.metrics.record_reply_published();
            }
            Err(e) => {
                warn!(error = %e, "Reply could not be published");
                self.metrics.record_reply_failure();
            }
        }
        Ok(())
    }
}
