//! Autonomous posting on a weighted topic table.

use crate::{AgentMetrics, PromptStyle, RandomSource, RngSource, StopSignal, WeightedSelector};
use herald_core::PublishedPost;
use herald_error::HeraldResult;
use herald_interface::{ContentGenerator, ContentPublisher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Result of one posting cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// Text was generated and published
    Published {
        /// Selected topic prompt
        topic: String,
        /// Platform id of the new post
        post: PublishedPost,
    },
    /// The generator returned only whitespace, nothing was published
    Skipped {
        /// Selected topic prompt
        topic: String,
    },
}

/// Selects a topic, generates a post for it, and publishes it, forever.
pub struct AutonomousPoster {
    selector: WeightedSelector,
    rng: Box<dyn RandomSource>,
    generator: Arc<dyn ContentGenerator>,
    publisher: Arc<dyn ContentPublisher>,
    style: Arc<PromptStyle>,
    post_interval: Duration,
    recovery_interval: Duration,
    metrics: AgentMetrics,
}

impl AutonomousPoster {
    /// Creates a poster drawing topics with an entropy-seeded RNG.
    pub fn new(
        selector: WeightedSelector,
        generator: Arc<dyn ContentGenerator>,
        publisher: Arc<dyn ContentPublisher>,
        style: Arc<PromptStyle>,
    ) -> Self {
        Self {
            selector,
            rng: Box::new(RngSource::from_entropy()),
            generator,
            publisher,
            style,
            post_interval: Duration::from_secs(3600),
            recovery_interval: Duration::from_secs(60),
            metrics: AgentMetrics::new(),
        }
    }

    /// Replace the random source.
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Pause after a successful cycle.
    pub fn with_post_interval(mut self, post_interval: Duration) -> Self {
        self.post_interval = post_interval;
        self
    }

    /// Pause after a failed cycle.
    pub fn with_recovery_interval(mut self, recovery_interval: Duration) -> Self {
        self.recovery_interval = recovery_interval;
        self
    }

    /// Report into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: AgentMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Run one select-generate-publish cycle.
    ///
    /// # Errors
    ///
    /// Returns the generation or publish error that abandoned the cycle.
    #[instrument(skip(self))]
    pub async fn run_cycle(&mut self) -> HeraldResult<PostOutcome> {
        let topic = self.selector.select(self.rng.as_mut()).to_string();
        debug!(topic = %topic, "Selected topic");

        let prompt = self.style.post_prompt(&topic);
        let text = self.generator.generate_text(&prompt).await?;
        let text = text.trim();

        if text.is_empty() {
            info!(topic = %topic, "Generated post was empty, nothing published");
            return Ok(PostOutcome::Skipped { topic });
        }

        let post = self.publisher.publish_content(text).await?;
        info!(topic = %topic, post_id = %post.id, "Post published");
        Ok(PostOutcome::Published { topic, post })
    }

    /// Post until stopped.
    ///
    /// Waits `post_interval` after a completed cycle and `recovery_interval`
    /// after a failed one.
    #[instrument(skip_all, fields(interval_secs = self.post_interval.as_secs()))]
    pub async fn run(mut self, mut stop: StopSignal) {
        info!("Autonomous poster started");
        while !stop.is_stopped() {
            let pause = match self.run_cycle().await {
                Ok(PostOutcome::Published { .. }) => {
                    self.metrics.record_post_published();
                    self.post_interval
                }
                Ok(PostOutcome::Skipped { .. }) => {
                    self.metrics.record_post_skipped();
                    self.post_interval
                }
                Err(e) => {
                    error!(
                        error = %e,
                        retry_secs = self.recovery_interval.as_secs(),
                        "Posting cycle failed"
                    );
                    self.metrics.record_post_failure();
                    self.recovery_interval
                }
            };
            if stop.sleep(pause).await {
                break;
            }
        }
        info!("Autonomous poster stopped");
    }
}
