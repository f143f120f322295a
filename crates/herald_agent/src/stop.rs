//! Cooperative shutdown for the agent loops.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Owner side of the stop signal. Clones share the same signal.
///
/// Dropping every handle counts as a stop request.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StopHandle {
    /// Fresh, un-triggered signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask every loop holding a [`StopSignal`] to stop after its current cycle.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// New receiver for a loop.
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Loop side of the stop signal, checked between cycles.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Whether the loop should exit.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once a stop has been requested.
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }

    /// Sleep for `duration`, waking early on stop.
    ///
    /// Returns `true` if the loop should exit.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_stopped(),
            _ = self.stopped() => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stop_wakes_sleeper() {
        let handle = StopHandle::new();
        let mut signal = handle.signal();

        let sleeper = tokio::spawn(async move { signal.sleep(Duration::from_secs(3600)).await });
        tokio::task::yield_now().await;
        handle.stop();

        assert!(sleeper.await.expect("Sleeper completes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_runs_to_completion_without_stop() {
        let handle = StopHandle::new();
        let mut signal = handle.signal();
        assert!(!signal.sleep(Duration::from_secs(5)).await);
        assert!(!handle.is_stopped());
    }

    #[test]
    fn test_dropped_handle_counts_as_stop() {
        let signal = StopHandle::new().signal();
        assert!(signal.is_stopped());
    }
}
