//! Per-layer batch scheduler.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::profile::BatchProfile;
use crate::layer::LayerKey;
use crate::overlay::OverlayId;
use crate::surface::SurfaceError;

/// Receives the attach operations of a batch.
pub trait BatchSink: Send + Sync {
    /// Attaches one overlay.
    ///
    /// Implementations must check `cancel` under the same lock that guards
    /// detaching the layer and return `Ok(false)` without attaching when it
    /// is cancelled.
    fn attach(
        &self,
        layer: LayerKey,
        id: OverlayId,
        cancel: &CancellationToken,
    ) -> Result<bool, SurfaceError>;
}

/// Observable progress of a layer's most recent batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderProgress {
    pub is_rendering: bool,
    /// Overlays attached so far by the current batch.
    pub visible_count: usize,
    pub total: usize,
    pub chunks_completed: usize,
    /// Bumped on every schedule or cancel.
    pub generation: u64,
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed {
        attached: usize,
        failed: usize,
        chunks: usize,
    },
    Cancelled {
        attached: usize,
    },
}

/// Handle to a scheduled batch.
#[derive(Debug)]
pub struct BatchTicket {
    pub layer: LayerKey,
    pub generation: u64,
    handle: JoinHandle<BatchOutcome>,
}

impl BatchTicket {
    /// Waits for the batch to finish or be cancelled.
    pub async fn wait(self) -> BatchOutcome {
        self.handle
            .await
            .unwrap_or(BatchOutcome::Cancelled { attached: 0 })
    }
}

/// Runs at most one attach batch per layer.
#[derive(Default)]
pub struct BatchScheduler {
    progress: DashMap<LayerKey, RenderProgress>,
    /// Live batch per layer, tagged with its generation.
    tokens: DashMap<LayerKey, (u64, CancellationToken)>,
}

impl BatchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts attaching `ids` in chunks, cancelling any batch already
    /// running for the layer.
    ///
    /// `already_attached` counts the layer's overlays that are attached
    /// before this batch starts; progress counts them as visible.
    pub fn schedule(
        self: &Arc<Self>,
        layer: LayerKey,
        ids: Vec<OverlayId>,
        already_attached: usize,
        profile: BatchProfile,
        sink: Arc<dyn BatchSink>,
    ) -> BatchTicket {
        let generation = {
            let mut progress = self.progress.entry(layer).or_default();
            progress.generation += 1;
            progress.is_rendering = !ids.is_empty();
            progress.visible_count = already_attached;
            progress.chunks_completed = 0;
            progress.total = already_attached + ids.len();
            progress.generation
        };

        let token = CancellationToken::new();
        if let Some((_, previous)) = self.tokens.insert(layer, (generation, token.clone())) {
            previous.cancel();
        }

        debug!(
            layer = %layer,
            items = ids.len(),
            chunk_size = profile.chunk_size,
            generation,
            "Scheduling batch attach"
        );

        let scheduler = Arc::clone(self);
        let handle = tokio::spawn(async move {
            scheduler
                .run(layer, generation, ids, profile, sink, token)
                .await
        });

        BatchTicket {
            layer,
            generation,
            handle,
        }
    }

    async fn run(
        &self,
        layer: LayerKey,
        generation: u64,
        ids: Vec<OverlayId>,
        profile: BatchProfile,
        sink: Arc<dyn BatchSink>,
        token: CancellationToken,
    ) -> BatchOutcome {
        let chunk_size = profile.chunk_size.max(1);
        let chunk_total = ids.len().div_ceil(chunk_size);
        let mut attached = 0;
        let mut failed = 0;

        for (index, chunk) in ids.chunks(chunk_size).enumerate() {
            if token.is_cancelled() {
                return BatchOutcome::Cancelled { attached };
            }

            let mut chunk_attached = 0;
            for id in chunk {
                match sink.attach(layer, *id, &token) {
                    Ok(true) => chunk_attached += 1,
                    Ok(false) => return BatchOutcome::Cancelled { attached },
                    Err(e) => {
                        failed += 1;
                        warn!(layer = %layer, overlay = %id, error = %e, "Attach failed, continuing batch");
                    }
                }
            }
            attached += chunk_attached;

            if !self.update(layer, generation, |p| {
                p.visible_count += chunk_attached;
                p.chunks_completed += 1;
            }) {
                return BatchOutcome::Cancelled { attached };
            }
            debug!(
                layer = %layer,
                chunk = index + 1,
                chunks = chunk_total,
                attached,
                "Batch chunk attached"
            );

            if index + 1 < chunk_total {
                if profile.yield_interval.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::select! {
                        _ = token.cancelled() => return BatchOutcome::Cancelled { attached },
                        _ = tokio::time::sleep(profile.yield_interval) => {}
                    }
                }
            }
        }

        self.update(layer, generation, |p| p.is_rendering = false);
        self.tokens
            .remove_if(&layer, |_, (current, _)| *current == generation);
        info!(layer = %layer, attached, failed, chunks = chunk_total, "Batch attach complete");

        BatchOutcome::Completed {
            attached,
            failed,
            chunks: chunk_total,
        }
    }

    /// Applies `f` to the layer's progress if `generation` is still current.
    fn update(&self, layer: LayerKey, generation: u64, f: impl FnOnce(&mut RenderProgress)) -> bool {
        match self.progress.get_mut(&layer) {
            Some(mut progress) if progress.generation == generation => {
                f(&mut progress);
                true
            }
            _ => false,
        }
    }

    /// Cancels the running batch for `layer`, if any.
    pub fn cancel(&self, layer: LayerKey) {
        if let Some((_, (_, token))) = self.tokens.remove(&layer) {
            token.cancel();
            debug!(layer = %layer, "Batch cancelled");
        }
        if let Some(mut progress) = self.progress.get_mut(&layer) {
            progress.generation += 1;
            progress.is_rendering = false;
        }
    }

    /// Cancels the batch and zeroes the layer's progress.
    pub fn reset(&self, layer: LayerKey) {
        self.cancel(layer);
        if let Some(mut progress) = self.progress.get_mut(&layer) {
            progress.visible_count = 0;
            progress.chunks_completed = 0;
            progress.total = 0;
        }
    }

    pub fn cancel_all(&self) {
        for layer in LayerKey::ALL {
            self.reset(layer);
        }
    }

    pub fn progress(&self, layer: LayerKey) -> RenderProgress {
        self.progress
            .get(&layer)
            .map(|p| *p)
            .unwrap_or_default()
    }

    pub fn is_rendering(&self, layer: LayerKey) -> bool {
        self.progress(layer).is_rendering
    }
}
