//! Owned one-shot timers.
//!
//! A [`DebounceTimer`] runs a callback once after a delay unless it is
//! cancelled first. The timer owns its task: dropping the handle cancels it,
//! so a session that stores the timer cannot leak a stray callback.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Boxed future returned by the engine's async collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A cancellable delayed callback.
#[derive(Debug)]
pub struct DebounceTimer {
    handle: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    /// Schedules `f` to run once after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Cancels the timer. The callback will not run if it has not already.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Returns true if the timer has neither fired nor been cancelled.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let timer = DebounceTimer::start(Duration::from_millis(100), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.is_armed());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_prevent_callback() {
        let fired = Arc::new(AtomicUsize::new(0));

        let f = fired.clone();
        let mut cancelled = DebounceTimer::start(Duration::from_millis(50), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        cancelled.cancel();
        assert!(!cancelled.is_armed());

        let f = fired.clone();
        drop(DebounceTimer::start(Duration::from_millis(50), move || {
            f.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
