//! Trailing-edge debounce for autosave.
//!
//! A `Debouncer` holds at most one outstanding timer. Every `schedule`
//! aborts the previous timer and starts a new one, so a burst of calls
//! results in a single invocation of the action once the burst has been
//! quiet for the configured delay.

use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Work run when the timer fires.
pub type DebouncedAction = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Per-session scheduler with a single resettable timer.
pub struct Debouncer {
    delay: Duration,
    action: DebouncedAction,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration, action: DebouncedAction) -> Self {
        Self {
            delay,
            action,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts the timer, replacing any timer that has not fired yet.
    ///
    /// When the timer fires the action runs on its own task, so a later
    /// `schedule` or `cancel` never interrupts an action that has started.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self) {
        let delay = self.delay;
        let action = self.action.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action());
        });

        if let Some(previous) = self.slot().replace(handle) {
            previous.abort();
        }
    }

    /// Drops the pending timer without running the action.
    ///
    /// Returns true if a timer was still waiting.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// Runs the action now if a timer is pending, and waits for it.
    ///
    /// Returns true if the action ran as part of this call.
    pub async fn flush(&self) -> bool {
        let Some(handle) = self.slot().take() else {
            return false;
        };
        handle.abort();

        // A cancelled timer never fired; a completed one already handed
        // the action off.
        match handle.await {
            Err(e) if e.is_cancelled() => {
                (self.action)().await;
                true
            }
            _ => false,
        }
    }

    /// Returns true while a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: Arc<AtomicUsize>) -> DebouncedAction {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_one_call() {
        let counter = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(3000), counting(counter.clone()));

        debouncer.schedule();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        debouncer.schedule();
        tokio::time::sleep(Duration::from_millis(2999)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_timer() {
        let counter = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100), counting(counter.clone()));

        debouncer.schedule();
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_runs_pending_action_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100), counting(counter.clone()));

        assert!(!debouncer.flush().await);
        debouncer.schedule();
        assert!(debouncer.flush().await);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
