//! Inputs and results of engine operations.

use crate::layer::{DataMode, LayerKey, LayerSet};
use crate::overlay::{LayerDataReport, ShowOutcome};
use crate::render::BatchTicket;

/// Pointer activity over an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Click,
}

/// Pointer activity over an open hover popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    Enter,
    Leave,
    /// The popup's close control.
    Close,
}

/// Layers shown and hidden by one visibility recompute.
#[derive(Debug)]
pub struct VisibilityChange {
    pub zoom: u32,
    pub mode: DataMode,
    /// Every layer that should be visible afterwards.
    pub visible: LayerSet,
    pub shown: LayerSet,
    pub hidden: LayerSet,
    /// Batches started for newly shown layers.
    pub batches: Vec<BatchTicket>,
}

impl VisibilityChange {
    /// True if nothing was shown or hidden.
    pub fn is_unchanged(&self) -> bool {
        self.shown.is_empty() && self.hidden.is_empty()
    }

    /// Waits for every batch started by this change.
    pub async fn wait(self) {
        futures::future::join_all(self.batches.into_iter().map(BatchTicket::wait)).await;
    }
}

/// Result of replacing a layer's data through the engine.
#[derive(Debug)]
pub struct LayerUpdate {
    pub report: LayerDataReport,
    /// Set when the layer was visible and has been re-shown.
    pub show: Option<ShowOutcome>,
}

impl LayerUpdate {
    pub fn layer(&self) -> LayerKey {
        self.report.layer
    }

    /// Waits for the re-show to finish, if one was started.
    pub async fn wait(self) {
        if let Some(show) = self.show {
            show.wait().await;
        }
    }
}
