//! Publisher that logs instead of posting.

use crate::fit_to_limit;
use async_trait::async_trait;
use herald_core::PublishedPost;
use herald_error::HeraldResult;
use herald_interface::ContentPublisher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Logs every post and reply and hands back synthetic ids (`dry-run-1`, `dry-run-2`, ...).
#[derive(Debug)]
pub struct DryRunPublisher {
    max_chars: usize,
    counter: AtomicU64,
}

impl DryRunPublisher {
    /// Create a dry-run publisher applying the given length limit.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            counter: AtomicU64::new(0),
        }
    }

    fn next_post(&self) -> PublishedPost {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        PublishedPost::new(format!("dry-run-{}", n))
    }
}

#[async_trait]
impl ContentPublisher for DryRunPublisher {
    async fn publish_content(&self, text: &str) -> HeraldResult<PublishedPost> {
        let text = fit_to_limit(text, self.max_chars);
        let post = self.next_post();
        info!(post_id = %post.id, chars = text.chars().count(), text = %text, "Dry run: would publish post");
        Ok(post)
    }

    async fn publish_reply(&self, text: &str, in_reply_to_id: &str) -> HeraldResult<PublishedPost> {
        let text = fit_to_limit(text, self.max_chars);
        let post = self.next_post();
        info!(
            post_id = %post.id,
            in_reply_to = in_reply_to_id,
            text = %text,
            "Dry run: would publish reply"
        );
        Ok(post)
    }

    fn platform_name(&self) -> &str {
        "dry-run"
    }
}
