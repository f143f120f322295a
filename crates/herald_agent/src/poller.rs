//! Cursor-based mention polling with deduplication.

use crate::{AgentMetrics, DedupStore, DedupTracker, StopSignal};
use async_trait::async_trait;
use futures::FutureExt;
use herald_core::{InboundItem, newest_item_id};
use herald_error::HeraldResult;
use herald_interface::MentionSource;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Acts on one inbound item.
#[async_trait]
pub trait MentionHandler: Send + Sync {
    /// Handle `item`. An error is logged by the poller and the batch continues.
    async fn handle(&self, item: &InboundItem) -> HeraldResult<()>;
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Repeatedly fetches new mentions and dispatches them to a handler.
///
/// The poller owns its [`DedupStore`]; nothing else reads or writes it while
/// the loop runs.
pub struct MentionPoller<H, D = DedupTracker> {
    source: Arc<dyn MentionSource>,
    handler: H,
    dedup: D,
    page_size: usize,
    reply_delay: Duration,
    poll_interval: Duration,
    own_user_id: Option<String>,
    metrics: AgentMetrics,
}

impl<H: MentionHandler> MentionPoller<H, DedupTracker> {
    /// Poller with a fresh in-memory tracker and default timings.
    pub fn new(source: Arc<dyn MentionSource>, handler: H) -> Self {
        Self::with_store(source, handler, DedupTracker::new())
    }
}

impl<H: MentionHandler, D: DedupStore> MentionPoller<H, D> {
    /// Poller backed by the given dedup store.
    pub fn with_store(source: Arc<dyn MentionSource>, handler: H, dedup: D) -> Self {
        Self {
            source,
            handler,
            dedup,
            page_size: 10,
            reply_delay: Duration::from_secs(1),
            poll_interval: Duration::from_secs(1200),
            own_user_id: None,
            metrics: AgentMetrics::new(),
        }
    }

    /// Maximum items requested per fetch.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Pause between two dispatched items of one cycle.
    pub fn with_reply_delay(mut self, reply_delay: Duration) -> Self {
        self.reply_delay = reply_delay;
        self
    }

    /// Pause after a cycle completes.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Never dispatch items authored by this account.
    pub fn with_own_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.own_user_id = Some(user_id.into());
        self
    }

    /// Report into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: AgentMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// The dedup store.
    pub fn dedup(&self) -> &D {
        &self.dedup
    }

    /// The mention handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    fn skip_reason(&self, item: &InboundItem) -> Option<&'static str> {
        if item.is_reshare() {
            Some("re-share")
        } else if self.own_user_id.as_deref() == Some(item.author_id().as_str()) {
            Some("own item")
        } else if !self.dedup.should_process(item.id()) {
            Some("already processed")
        } else {
            None
        }
    }

    /// Run one fetch-and-dispatch cycle, returning the number of dispatched items.
    ///
    /// A failed fetch abandons the cycle and leaves the dedup store untouched. A
    /// handler that fails or panics is logged and the remaining items are still
    /// dispatched.
    #[instrument(skip(self), fields(cursor = ?self.dedup.current_cursor()))]
    pub async fn poll_once(&mut self) -> usize {
        let cursor = self.dedup.current_cursor().map(str::to_owned);
        let items = match self
            .source
            .fetch_mentions_since(cursor.as_deref(), self.page_size)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Fetching mentions failed, abandoning cycle");
                self.metrics.record_fetch_failure();
                return 0;
            }
        };
        self.metrics.record_poll_success();

        if items.is_empty() {
            debug!("No new mentions");
            return 0;
        }

        let mut dispatched = 0;
        for item in &items {
            if let Some(reason) = self.skip_reason(item) {
                debug!(item_id = %item.id(), reason, "Skipping mention");
                continue;
            }

            if dispatched > 0 {
                tokio::time::sleep(self.reply_delay).await;
            }

            self.dedup.mark_processed(item.id());
            self.metrics.record_mention_dispatched();
            dispatched += 1;

            let outcome = AssertUnwindSafe(self.handler.handle(item))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(())) => debug!(item_id = %item.id(), "Mention handled"),
                Ok(Err(e)) => {
                    error!(item_id = %item.id(), error = %e, "Mention handler failed");
                    self.metrics.record_handler_failure();
                }
                Err(panic) => {
                    error!(
                        item_id = %item.id(),
                        panic = panic_message(&*panic),
                        "Mention handler panicked"
                    );
                    self.metrics.record_handler_failure();
                }
            }
        }

        if let Some(newest) = newest_item_id(items.iter().map(|item| item.id().as_str())) {
            self.dedup.advance_cursor(newest);
        }

        info!(
            fetched = items.len(),
            dispatched,
            cursor = ?self.dedup.current_cursor(),
            "Poll cycle complete"
        );
        dispatched
    }

    /// Poll until stopped, waiting `poll_interval` after each completed cycle.
    #[instrument(skip_all, fields(interval_secs = self.poll_interval.as_secs()))]
    pub async fn run(mut self, mut stop: StopSignal) {
        info!("Mention poller started");
        while !stop.is_stopped() {
            self.poll_once().await;
            if stop.sleep(self.poll_interval).await {
                break;
            }
        }
        info!("Mention poller stopped");
    }
}
