//! Debouncer that cancels the previously scheduled task

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Runs scheduled work after a quiet period.
///
/// Scheduling new work cancels whatever is still waiting. Work that already
/// started is not interrupted.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `work`; the handle yields `None` if it was superseded
    pub fn schedule<F>(&self, work: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.replace(Some(token.clone())) {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => None,
                _ = tokio::time::sleep(delay) => Some(work.await),
            }
        })
    }

    /// Cancel whatever is waiting
    pub fn cancel(&self) {
        if let Some(previous) = self.replace(None) {
            previous.cancel();
        }
    }

    fn replace(&self, token: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *pending, token)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let start = tokio::time::Instant::now();
        let result = debouncer.schedule(async { 7 }).await.unwrap();
        assert_eq!(result, Some(7));
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_schedule_cancels_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let first = debouncer.schedule(async { "first" });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = debouncer.schedule(async { "second" });

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let handle = debouncer.schedule(async { 1 });
        debouncer.cancel();
        assert_eq!(handle.await.unwrap(), None);
    }
}
