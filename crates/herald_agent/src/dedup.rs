//! Processed-item tracking and the mention cursor.

use herald_core::compare_item_ids;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Remembers handled items and the newest item id seen.
///
/// Checking and marking are separate so a caller can decide whether an item
/// counts as handled.
pub trait DedupStore: Send {
    /// Whether `id` has not been handled yet. Never mutates.
    fn should_process(&self, id: &str) -> bool;

    /// Record `id` as handled. Marking twice is the same as marking once.
    fn mark_processed(&mut self, id: &str);

    /// Move the cursor to `latest_id` if it is newer than the current one.
    fn advance_cursor(&mut self, latest_id: &str);

    /// Exclusive lower bound for the next fetch.
    fn current_cursor(&self) -> Option<&str>;
}

/// In-memory [`DedupStore`] living for the whole process.
///
/// The processed set only grows. Nothing is persisted, so a restarted process
/// starts with no cursor and an empty set.
///
/// # Examples
///
/// ```
/// use herald_agent::{DedupStore, DedupTracker};
///
/// let mut tracker = DedupTracker::new();
/// assert!(tracker.should_process("100"));
/// tracker.mark_processed("100");
/// assert!(!tracker.should_process("100"));
///
/// tracker.advance_cursor("100");
/// tracker.advance_cursor("50");
/// assert_eq!(tracker.current_cursor(), Some("100"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DedupTracker {
    processed: HashSet<String>,
    cursor: Option<String>,
}

impl DedupTracker {
    /// Empty tracker with no cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items marked processed.
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}

impl DedupStore for DedupTracker {
    fn should_process(&self, id: &str) -> bool {
        !self.processed.contains(id)
    }

    fn mark_processed(&mut self, id: &str) {
        if !self.processed.contains(id) {
            self.processed.insert(id.to_string());
        }
    }

    fn advance_cursor(&mut self, latest_id: &str) {
        let newer = match self.cursor.as_deref() {
            None => true,
            Some(current) => compare_item_ids(latest_id, current) == Ordering::Greater,
        };
        if newer {
            self.cursor = Some(latest_id.to_string());
        }
    }

    fn current_cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}
