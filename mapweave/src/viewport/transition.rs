//! Stepped camera transitions.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::camera::Camera;
use crate::geo::LatLng;

/// Called with the final zoom level once a transition has settled.
pub type SettleCallback = Arc<dyn Fn(u32) + Send + Sync>;

/// Timing of a stepped transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionConfig {
    /// Wait after panning before the first zoom step.
    pub pan_settle: Duration,
    /// Interval between single-level zoom steps.
    pub step_interval: Duration,
    /// Wait after the last zoom step before settling.
    pub final_settle: Duration,
    /// Wait after a pan that needs no zoom change.
    pub no_zoom_settle: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            pan_settle: Duration::from_millis(400),
            step_interval: Duration::from_millis(150),
            final_settle: Duration::from_millis(150),
            no_zoom_settle: Duration::from_millis(500),
        }
    }
}

/// How a transition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Settled { zoom: u32 },
    /// Superseded by a newer transition or cancelled explicitly.
    Cancelled,
}

/// Handle to a running transition.
#[derive(Debug)]
pub struct TransitionHandle {
    pub generation: u64,
    token: CancellationToken,
    handle: JoinHandle<TransitionOutcome>,
}

impl TransitionHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub async fn wait(self) -> TransitionOutcome {
        self.handle.await.unwrap_or(TransitionOutcome::Cancelled)
    }
}

#[derive(Debug, Default)]
struct Active {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Drives the camera one zoom level at a time and reports when it settles.
pub struct TransitionController {
    camera: Arc<dyn Camera>,
    config: TransitionConfig,
    on_settled: SettleCallback,
    active: Arc<Mutex<Active>>,
}

impl TransitionController {
    pub fn new(camera: Arc<dyn Camera>, config: TransitionConfig, on_settled: SettleCallback) -> Self {
        Self {
            camera,
            config,
            on_settled,
            active: Arc::new(Mutex::new(Active::default())),
        }
    }

    pub fn camera(&self) -> &Arc<dyn Camera> {
        &self.camera
    }

    /// Pans to `center`, then steps to `target_zoom`.
    ///
    /// The settle callback runs once even when no zoom change is needed.
    pub fn move_to(&self, center: LatLng, target_zoom: u32) -> TransitionHandle {
        let (generation, token) = self.begin();
        self.camera.pan_to(center);
        info!(center = %center, target_zoom, generation, "Camera transition started");
        self.spawn(generation, token, target_zoom, self.config.pan_settle)
    }

    /// Steps to `target_zoom` without panning.
    ///
    /// Returns `None`, and never calls back, when the camera is already at
    /// the target.
    pub fn zoom_to(&self, target_zoom: u32) -> Option<TransitionHandle> {
        if self.camera.zoom_level() == target_zoom {
            return None;
        }
        let (generation, token) = self.begin();
        debug!(target_zoom, generation, "Zoom transition started");
        Some(self.spawn(generation, token, target_zoom, Duration::ZERO))
    }

    /// Cancels the running transition, if any.
    pub fn cancel(&self) {
        let mut active = self.active.lock();
        if let Some(token) = active.token.take() {
            token.cancel();
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.active
            .lock()
            .token
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let mut active = self.active.lock();
        if let Some(previous) = active.token.take() {
            previous.cancel();
        }
        active.generation += 1;
        let token = CancellationToken::new();
        active.token = Some(token.clone());
        (active.generation, token)
    }

    fn spawn(
        &self,
        generation: u64,
        token: CancellationToken,
        target: u32,
        initial_wait: Duration,
    ) -> TransitionHandle {
        let run = Run {
            camera: Arc::clone(&self.camera),
            config: self.config,
            on_settled: Arc::clone(&self.on_settled),
            active: Arc::clone(&self.active),
            generation,
            token: token.clone(),
        };
        let handle = tokio::spawn(run.execute(target, initial_wait));
        TransitionHandle {
            generation,
            token,
            handle,
        }
    }
}

struct Run {
    camera: Arc<dyn Camera>,
    config: TransitionConfig,
    on_settled: SettleCallback,
    active: Arc<Mutex<Active>>,
    generation: u64,
    token: CancellationToken,
}

impl Run {
    async fn execute(self, target: u32, initial_wait: Duration) -> TransitionOutcome {
        let mut current = self.camera.zoom_level();

        if current == target {
            if !self.pause(self.config.no_zoom_settle).await {
                return TransitionOutcome::Cancelled;
            }
            return self.settle(target);
        }

        if !self.pause(initial_wait).await {
            return TransitionOutcome::Cancelled;
        }

        while current != target {
            current = if current > target {
                current - 1
            } else {
                current + 1
            };
            self.camera.set_zoom_level(current);
            debug!(zoom = current, target, generation = self.generation, "Zoom step");

            let wait = if current == target {
                self.config.final_settle
            } else {
                self.config.step_interval
            };
            if !self.pause(wait).await {
                return TransitionOutcome::Cancelled;
            }
        }

        self.settle(target)
    }

    /// Sleeps for `wait`; false if cancelled meanwhile.
    async fn pause(&self, wait: Duration) -> bool {
        if wait.is_zero() {
            return !self.token.is_cancelled();
        }
        tokio::select! {
            _ = self.token.cancelled() => false,
            _ = tokio::time::sleep(wait) => true,
        }
    }

    fn settle(&self, zoom: u32) -> TransitionOutcome {
        {
            let mut active = self.active.lock();
            if self.token.is_cancelled() || active.generation != self.generation {
                return TransitionOutcome::Cancelled;
            }
            active.token = None;
        }
        info!(zoom, generation = self.generation, "Camera transition settled");
        (self.on_settled)(zoom);
        TransitionOutcome::Settled { zoom }
    }
}
