// ── Debounced task scheduling ──
//
// A `Debouncer` runs at most one pending task at a time. Scheduling a new
// task cancels the previous one before arming the new timer, so a burst
// of edits inside the quiet period collapses into the last one.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Cancels one scheduled task. Dropping the handle does *not* cancel.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancelHandle>>,
}

impl Debouncer {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    // Poisoning is ignored: the slot is a plain `Option`.
    fn pending(&self) -> MutexGuard<'_, Option<CancelHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `task` once `delay` has elapsed without another `schedule`
    /// call. Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F) -> CancelHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = CancelHandle {
            token: CancellationToken::new(),
        };

        let previous = self.pending().replace(handle.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let token = handle.token.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => trace!("debounced task superseded"),
                () = tokio::time::sleep(delay) => task.await,
            }
        });

        handle
    }

    /// Cancel whatever is pending, if anything.
    pub fn cancel_pending(&self) {
        if let Some(previous) = self.pending().take() {
            previous.cancel();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter_task(counter: &Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_only_the_last_task() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let last = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for value in 1..=5 {
            handles.push(debouncer.schedule(counter_task(&last, value)));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(last.load(Ordering::SeqCst), 5);
        assert!(handles[..4].iter().all(CancelHandle::is_cancelled));
        assert!(!handles[4].is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_cancel_prevents_the_run() {
        let debouncer = Debouncer::default();
        let ran = Arc::new(AtomicUsize::new(0));

        let handle = debouncer.schedule(counter_task(&ran, 1));
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_does_not_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let ran = Arc::new(AtomicUsize::new(0));

        drop(debouncer.schedule(counter_task(&ran, 7)));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(ran.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn poisoned_slot_keeps_scheduling() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(10)));
        let poisoner = Arc::clone(&debouncer);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.pending.lock().unwrap();
            panic!("panic while holding the pending slot");
        })
        .join();
        assert!(joined.is_err());
        assert!(debouncer.pending.is_poisoned());

        let ran = Arc::new(AtomicUsize::new(0));
        debouncer.schedule(counter_task(&ran, 3));
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.cancel_pending();

        assert_eq!(ran.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_edits_each_run() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let runs = Arc::clone(&runs);
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(150)).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }
}
