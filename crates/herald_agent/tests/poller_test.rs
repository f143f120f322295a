//! Mention polling cycles and the polling loop.

mod test_utils;

use herald_agent::{AgentMetrics, DedupStore, MentionPoller, StopHandle};
use herald_error::FetchErrorKind;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockSource, PanickingHandler, RecordingHandler, item};

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_leaves_state_unchanged() {
    let source = Arc::new(MockSource::new(vec![
        Ok(vec![item("100", "ann", &[])]),
        Err(FetchErrorKind::RateLimited),
    ]));
    let metrics = AgentMetrics::new();
    let mut poller =
        MentionPoller::new(source.clone(), RecordingHandler::new()).with_metrics(metrics.clone());

    assert_eq!(poller.poll_once().await, 1);
    let processed_before = poller.dedup().processed_count();
    let cursor_before = poller.dedup().current_cursor().map(str::to_string);

    assert_eq!(poller.poll_once().await, 0);
    assert_eq!(poller.dedup().processed_count(), processed_before);
    assert_eq!(poller.dedup().current_cursor().map(str::to_string), cursor_before);
    assert_eq!(metrics.fetch_failures(), 1);
    assert_eq!(metrics.poll_cycles(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_first_fetch_has_no_cursor() {
    let source = Arc::new(MockSource::new(vec![Err(FetchErrorKind::Http(
        "connection refused".to_string(),
    ))]));
    let mut poller = MentionPoller::new(source, RecordingHandler::new());

    assert_eq!(poller.poll_once().await, 0);
    assert_eq!(poller.dedup().current_cursor(), None);
    assert_eq!(poller.dedup().processed_count(), 0);
    assert!(poller.handler().handled_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reshare_is_skipped_and_order_kept() {
    let source = Arc::new(MockSource::new(vec![Ok(vec![
        item("1", "ann", &[]),
        item("2", "ben", &["retweet"]),
        item("3", "cat", &["quoted"]),
    ])]));
    let mut poller = MentionPoller::new(source, RecordingHandler::new());

    assert_eq!(poller.poll_once().await, 2);
    assert_eq!(poller.handler().handled_ids(), vec!["1", "3"]);
    assert!(poller.dedup().should_process("2"));
    assert_eq!(poller.dedup().current_cursor(), Some("3"));
}

#[tokio::test(start_paused = true)]
async fn test_handler_failure_does_not_abort_batch() {
    let source = Arc::new(MockSource::new(vec![Ok(vec![
        item("10", "ann", &[]),
        item("11", "ben", &[]),
        item("12", "cat", &[]),
    ])]));
    let metrics = AgentMetrics::new();
    let mut poller = MentionPoller::new(source, RecordingHandler::failing_on(&["11"]))
        .with_metrics(metrics.clone());

    assert_eq!(poller.poll_once().await, 3);
    assert_eq!(poller.handler().handled_ids(), vec!["10", "11", "12"]);
    assert!(!poller.dedup().should_process("11"));
    assert_eq!(metrics.handler_failures(), 1);
    assert_eq!(metrics.mentions_dispatched(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_handler_panic_counts_as_item_failure() {
    let source = Arc::new(MockSource::new(vec![Ok(vec![
        item("40", "ann", &[]),
        item("41", "ben", &[]),
    ])]));
    let metrics = AgentMetrics::new();
    let mut poller = MentionPoller::new(source, PanickingHandler).with_metrics(metrics.clone());

    assert_eq!(poller.poll_once().await, 2);
    assert!(!poller.dedup().should_process("40"));
    assert!(!poller.dedup().should_process("41"));
    assert_eq!(poller.dedup().current_cursor(), Some("41"));
    assert_eq!(metrics.handler_failures(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refetched_items_are_not_dispatched_twice() {
    let batch = vec![item("20", "ann", &[]), item("21", "ben", &[])];
    let source = Arc::new(MockSource::new(vec![Ok(batch.clone()), Ok(batch)]));
    let mut poller = MentionPoller::new(source.clone(), RecordingHandler::new());

    assert_eq!(poller.poll_once().await, 2);
    assert_eq!(poller.poll_once().await, 0);
    assert_eq!(poller.handler().handled_ids(), vec!["20", "21"]);
    assert_eq!(source.cursors(), vec![None, Some("21".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_own_items_are_skipped() {
    let source = Arc::new(MockSource::new(vec![Ok(vec![
        item("30", "herald", &[]),
        item("31", "ann", &[]),
    ])]));
    let mut poller =
        MentionPoller::new(source, RecordingHandler::new()).with_own_user_id("uid-herald");

    assert_eq!(poller.poll_once().await, 1);
    assert_eq!(poller.handler().handled_ids(), vec!["31"]);
    assert_eq!(poller.dedup().current_cursor(), Some("31"));
}

#[tokio::test(start_paused = true)]
async fn test_cursor_covers_skipped_items() {
    let source = Arc::new(MockSource::new(vec![Ok(vec![
        item("99", "ann", &[]),
        item("100", "ben", &["retweeted"]),
    ])]));
    let mut poller = MentionPoller::new(source, RecordingHandler::new());

    poller.poll_once().await;
    assert_eq!(poller.dedup().current_cursor(), Some("100"));
}

#[tokio::test(start_paused = true)]
async fn test_delay_between_dispatched_items_only() {
    let source = Arc::new(MockSource::new(vec![Ok(vec![
        item("1", "ann", &[]),
        item("2", "ben", &["retweeted"]),
        item("3", "cat", &[]),
        item("4", "dan", &[]),
    ])]));
    let mut poller = MentionPoller::new(source, RecordingHandler::new())
        .with_reply_delay(Duration::from_secs(1));

    let start = tokio::time::Instant::now();
    assert_eq!(poller.poll_once().await, 3);

    let offsets: Vec<u64> = poller
        .handler()
        .handled_at()
        .iter()
        .map(|at| at.duration_since(start).as_secs())
        .collect();
    assert_eq!(offsets, vec![0, 1, 2]);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_loop_waits_interval_after_each_cycle_and_stops() {
    let source = Arc::new(MockSource::new(vec![
        Ok(vec![item("1", "ann", &[])]),
        Err(FetchErrorKind::RateLimited),
        Ok(vec![item("2", "ben", &[])]),
    ]));
    let poller = MentionPoller::new(source.clone(), RecordingHandler::new())
        .with_poll_interval(Duration::from_secs(1200));

    let stop = StopHandle::new();
    let task = tokio::spawn(poller.run(stop.signal()));

    // Cycles at 0s, 1200s and 2400s; stop lands during the third sleep.
    tokio::time::sleep(Duration::from_secs(3000)).await;
    stop.stop();
    task.await.expect("Poller exits cleanly");

    assert_eq!(
        source.cursors(),
        vec![None, Some("1".to_string()), Some("1".to_string())]
    );
}
