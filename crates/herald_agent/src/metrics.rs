//! Counters for both agent loops.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared metrics collector. Clones observe the same counters.
#[derive(Debug, Clone)]
pub struct AgentMetrics {
    inner: Arc<AgentMetricsInner>,
}

#[derive(Debug)]
struct AgentMetricsInner {
    started_at: DateTime<Utc>,

    // Autonomous posting
    posts_published: AtomicU64,
    posts_skipped: AtomicU64,
    post_failures: AtomicU64,
    post_last_success: parking_lot::Mutex<Option<Instant>>,

    // Mention polling
    poll_cycles: AtomicU64,
    fetch_failures: AtomicU64,
    mentions_dispatched: AtomicU64,
    handler_failures: AtomicU64,
    poll_last_success: parking_lot::Mutex<Option<Instant>>,

    // Replies
    replies_published: AtomicU64,
    reply_failures: AtomicU64,
    reply_last_success: parking_lot::Mutex<Option<Instant>>,
}

impl Default for AgentMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

fn since(last: &parking_lot::Mutex<Option<Instant>>) -> Option<Duration> {
    last.lock().map(|instant| instant.elapsed())
}

impl AgentMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AgentMetricsInner {
                started_at: Utc::now(),
                posts_published: AtomicU64::new(0),
                posts_skipped: AtomicU64::new(0),
                post_failures: AtomicU64::new(0),
                post_last_success: parking_lot::Mutex::new(None),
                poll_cycles: AtomicU64::new(0),
                fetch_failures: AtomicU64::new(0),
                mentions_dispatched: AtomicU64::new(0),
                handler_failures: AtomicU64::new(0),
                poll_last_success: parking_lot::Mutex::new(None),
                replies_published: AtomicU64::new(0),
                reply_failures: AtomicU64::new(0),
                reply_last_success: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Records a published autonomous post.
    pub fn record_post_published(&self) {
        bump(&self.inner.posts_published);
        *self.inner.post_last_success.lock() = Some(Instant::now());
    }

    /// Records a cycle that generated empty text.
    pub fn record_post_skipped(&self) {
        bump(&self.inner.posts_skipped);
    }

    /// Records a failed posting cycle.
    pub fn record_post_failure(&self) {
        bump(&self.inner.post_failures);
    }

    /// Records a poll cycle whose fetch succeeded.
    pub fn record_poll_success(&self) {
        bump(&self.inner.poll_cycles);
        *self.inner.poll_last_success.lock() = Some(Instant::now());
    }

    /// Records a poll cycle abandoned because the fetch failed.
    pub fn record_fetch_failure(&self) {
        bump(&self.inner.poll_cycles);
        bump(&self.inner.fetch_failures);
    }

    /// Records an item handed to the mention handler.
    pub fn record_mention_dispatched(&self) {
        bump(&self.inner.mentions_dispatched);
    }

    /// Records a handler invocation that returned an error.
    pub fn record_handler_failure(&self) {
        bump(&self.inner.handler_failures);
    }

    /// Records a published reply.
    pub fn record_reply_published(&self) {
        bump(&self.inner.replies_published);
        *self.inner.reply_last_success.lock() = Some(Instant::now());
    }

    /// Records a reply the platform did not accept.
    pub fn record_reply_failure(&self) {
        bump(&self.inner.reply_failures);
    }

    /// Number of published autonomous posts.
    pub fn posts_published(&self) -> u64 {
        self.inner.posts_published.load(Ordering::Relaxed)
    }

    /// Number of skipped autonomous posts.
    pub fn posts_skipped(&self) -> u64 {
        self.inner.posts_skipped.load(Ordering::Relaxed)
    }

    /// Number of failed posting cycles.
    pub fn post_failures(&self) -> u64 {
        self.inner.post_failures.load(Ordering::Relaxed)
    }

    /// Number of poll cycles, failed ones included.
    pub fn poll_cycles(&self) -> u64 {
        self.inner.poll_cycles.load(Ordering::Relaxed)
    }

    /// Number of failed fetches.
    pub fn fetch_failures(&self) -> u64 {
        self.inner.fetch_failures.load(Ordering::Relaxed)
    }

    /// Number of dispatched mentions.
    pub fn mentions_dispatched(&self) -> u64 {
        self.inner.mentions_dispatched.load(Ordering::Relaxed)
    }

    /// Number of handler errors.
    pub fn handler_failures(&self) -> u64 {
        self.inner.handler_failures.load(Ordering::Relaxed)
    }

    /// Number of published replies.
    pub fn replies_published(&self) -> u64 {
        self.inner.replies_published.load(Ordering::Relaxed)
    }

    /// Number of failed replies.
    pub fn reply_failures(&self) -> u64 {
        self.inner.reply_failures.load(Ordering::Relaxed)
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let now = Utc::now();
        MetricsSnapshot {
            started_at: self.inner.started_at,
            uptime_secs: (now - self.inner.started_at).num_seconds().max(0) as u64,
            posting: PostingSnapshot {
                published: self.posts_published(),
                skipped: self.posts_skipped(),
                failures: self.post_failures(),
                seconds_since_success: since(&self.inner.post_last_success)
                    .map(|d| d.as_secs()),
            },
            mentions: MentionSnapshot {
                cycles: self.poll_cycles(),
                fetch_failures: self.fetch_failures(),
                dispatched: self.mentions_dispatched(),
                handler_failures: self.handler_failures(),
                seconds_since_success: since(&self.inner.poll_last_success)
                    .map(|d| d.as_secs()),
            },
            replies: ReplySnapshot {
                published: self.replies_published(),
                failures: self.reply_failures(),
                seconds_since_success: since(&self.inner.reply_last_success)
                    .map(|d| d.as_secs()),
            },
        }
    }
}

/// Serializable snapshot of agent metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// When the collector was created
    pub started_at: DateTime<Utc>,
    /// Seconds since `started_at`
    pub uptime_secs: u64,
    /// Autonomous posting loop
    pub posting: PostingSnapshot,
    /// Mention polling loop
    pub mentions: MentionSnapshot,
    /// Replies sent by the mention handler
    pub replies: ReplySnapshot,
}

/// Posting loop counters.
#[derive(Debug, Clone, Serialize)]
pub struct PostingSnapshot {
    /// Posts published
    pub published: u64,
    /// Cycles that generated empty text
    pub skipped: u64,
    /// Cycles abandoned on error
    pub failures: u64,
    /// Seconds since the last published post
    pub seconds_since_success: Option<u64>,
}

/// Mention loop counters.
#[derive(Debug, Clone, Serialize)]
pub struct MentionSnapshot {
    /// Poll cycles run
    pub cycles: u64,
    /// Cycles abandoned because the fetch failed
    pub fetch_failures: u64,
    /// Items handed to the handler
    pub dispatched: u64,
    /// Handler invocations that failed
    pub handler_failures: u64,
    /// Seconds since the last successful fetch
    pub seconds_since_success: Option<u64>,
}

/// Reply counters.
#[derive(Debug, Clone, Serialize)]
pub struct ReplySnapshot {
    /// Replies published
    pub published: u64,
    /// Replies the platform did not accept
    pub failures: u64,
    /// Seconds since the last published reply
    pub seconds_since_success: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = AgentMetrics::new();
        let clone = metrics.clone();
        clone.record_post_published();
        clone.record_fetch_failure();
        metrics.record_poll_success();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.posting.published, 1);
        assert_eq!(snapshot.mentions.cycles, 2);
        assert_eq!(snapshot.mentions.fetch_failures, 1);
        assert!(snapshot.posting.seconds_since_success.is_some());
        assert!(snapshot.replies.seconds_since_success.is_none());
    }
}
