//! Runs the posting and mention loops side by side.

use crate::{
    AgentConfig, AgentMetrics, AutonomousPoster, DedupStore, DedupTracker, MentionHandler,
    MentionPoller, ReplyHandler, StopHandle, WeightedSelector,
};
use herald_error::HeraldResult;
use herald_interface::{ContentGenerator, ContentPublisher, MentionSource};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// Owns both agent loops and the stop signal they share.
///
/// Each loop runs as its own task; one loop ending or panicking does not stop
/// the other.
pub struct AgentServer<H = ReplyHandler, D = DedupTracker> {
    poster: Option<AutonomousPoster>,
    poller: Option<MentionPoller<H, D>>,
    stop: StopHandle,
}

impl<H, D> Default for AgentServer<H, D> {
    fn default() -> Self {
        Self {
            poster: None,
            poller: None,
            stop: StopHandle::new(),
        }
    }
}

impl AgentServer<ReplyHandler, DedupTracker> {
    /// Wire both loops from configuration.
    ///
    /// The posting loop is built when `agent.enable_posting` is set. The mention
    /// loop is built when mentions are enabled, `social.user_id` is set and a
    /// `source` is given.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the topic table is invalid.
    pub fn from_config(
        config: &AgentConfig,
        generator: Arc<dyn ContentGenerator>,
        publisher: Arc<dyn ContentPublisher>,
        source: Option<Arc<dyn MentionSource>>,
        metrics: AgentMetrics,
    ) -> HeraldResult<Self> {
        let style = Arc::new(config.style.clone());
        let mut server = Self::new();

        if config.agent.enable_posting {
            let selector = WeightedSelector::new(config.topics.clone())?;
            let poster = AutonomousPoster::new(
                selector,
                Arc::clone(&generator),
                Arc::clone(&publisher),
                Arc::clone(&style),
            )
            .with_post_interval(config.agent.post_interval())
            .with_recovery_interval(config.agent.post_recovery())
            .with_metrics(metrics.clone());
            server = server.with_poster(poster);
        }

        match (config.mentions_enabled(), source, &config.social.user_id) {
            (true, Some(source), Some(user_id)) => {
                let handler = ReplyHandler::new(generator, publisher, style)
                    .with_metrics(metrics.clone());
                let poller = MentionPoller::new(source, handler)
                    .with_page_size(config.agent.mention_page_size)
                    .with_reply_delay(config.agent.reply_delay())
                    .with_poll_interval(config.agent.poll_interval())
                    .with_own_user_id(user_id.clone())
                    .with_metrics(metrics);
                server = server.with_poller(poller);
            }
            (true, None, _) => warn!("No mention source available, mention polling disabled"),
            _ => {}
        }

        Ok(server)
    }
}

impl<H, D> AgentServer<H, D>
where
    H: MentionHandler + 'static,
    D: DedupStore + 'static,
{
    /// Server with no loops configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run this posting loop.
    pub fn with_poster(mut self, poster: AutonomousPoster) -> Self {
        self.poster = Some(poster);
        self
    }

    /// Run this mention loop.
    pub fn with_poller(mut self, poller: MentionPoller<H, D>) -> Self {
        self.poller = Some(poller);
        self
    }

    /// Handle that stops both loops after their current cycles.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Whether the posting loop is configured.
    pub fn has_poster(&self) -> bool {
        self.poster.is_some()
    }

    /// Whether the mention loop is configured.
    pub fn has_poller(&self) -> bool {
        self.poller.is_some()
    }

    /// Spawn the configured loops and wait until both have exited.
    #[instrument(skip(self), fields(posting = self.poster.is_some(), mentions = self.poller.is_some()))]
    pub async fn run(self) {
        info!("Starting agent server");

        let mut handles: Vec<(&'static str, JoinHandle<()>)> = Vec::new();
        if let Some(poster) = self.poster {
            let signal = self.stop.signal();
            handles.push(("poster", tokio::spawn(poster.run(signal))));
        }
        if let Some(poller) = self.poller {
            let signal = self.stop.signal();
            handles.push(("poller", tokio::spawn(poller.run(signal))));
        }

        if handles.is_empty() {
            warn!("No loops configured, nothing to run");
            return;
        }

        for (name, handle) in handles {
            match handle.await {
                Ok(()) => info!(task = name, "Loop exited"),
                Err(e) => error!(task = name, error = %e, "Loop terminated abnormally"),
            }
        }

        info!("Agent server stopped");
    }
}
