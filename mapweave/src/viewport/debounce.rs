//! Debouncing of raw zoom-change events.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::timer::DebounceTimer;

/// Default quiet period before a zoom change is acted on.
pub const DEFAULT_ZOOM_DEBOUNCE: Duration = Duration::from_millis(100);

/// Coalesces bursts of zoom-changed events into one callback carrying the
/// last reported level.
pub struct ZoomDebouncer {
    delay: Duration,
    on_zoom: Arc<dyn Fn(u32) + Send + Sync>,
    timer: Mutex<Option<DebounceTimer>>,
}

impl ZoomDebouncer {
    pub fn new(delay: Duration, on_zoom: Arc<dyn Fn(u32) + Send + Sync>) -> Self {
        Self {
            delay,
            on_zoom,
            timer: Mutex::new(None),
        }
    }

    /// Records a zoom change, restarting the quiet period.
    pub fn zoom_changed(&self, level: u32) {
        let on_zoom = Arc::clone(&self.on_zoom);
        let timer = DebounceTimer::start(self.delay, move || on_zoom(level));
        // Replacing the previous timer cancels it.
        *self.timer.lock() = Some(timer);
    }

    /// Drops any pending callback.
    pub fn cancel(&self) {
        if let Some(mut timer) = self.timer.lock().take() {
            timer.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .is_some_and(DebounceTimer::is_armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_yields_single_callback_with_last_level() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let debouncer = ZoomDebouncer::new(
            DEFAULT_ZOOM_DEBOUNCE,
            Arc::new(move |level| s.lock().push(level)),
        );

        for level in [10, 9, 8, 7] {
            debouncer.zoom_changed(level);
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
        assert!(seen.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(61)).await;
        assert_eq!(*seen.lock(), vec![7]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let debouncer = ZoomDebouncer::new(
            DEFAULT_ZOOM_DEBOUNCE,
            Arc::new(move |level| s.lock().push(level)),
        );
        debouncer.zoom_changed(5);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(seen.lock().is_empty());
    }
}
