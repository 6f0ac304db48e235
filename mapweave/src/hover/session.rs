//! Per-marker hover sessions.

use crate::detail::DataClass;
use crate::overlay::OverlayId;
use crate::surface::{PopupId, SurfaceId};
use crate::timer::DebounceTimer;

/// Hover state of one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    /// Waiting for the detail payload.
    PendingShow,
    Shown,
    /// Popup still open, hide debounce running.
    PendingHide,
}

/// The marker a pointer is over.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub marker: OverlayId,
    pub surface_id: SurfaceId,
    pub detail_key: String,
    pub title: String,
    pub class: DataClass,
}

/// Interaction state of one marker. Owns its debounce timer.
#[derive(Debug)]
pub struct HoverSession {
    pub target: HoverTarget,
    pub state: HoverState,
    /// Identifies the current fetch or timer arm; stale completions compare
    /// against it and back off.
    pub(crate) seq: u64,
    pub(crate) timer: Option<DebounceTimer>,
    pub(crate) popup: Option<PopupId>,
}

impl HoverSession {
    pub(crate) fn new(target: HoverTarget, seq: u64) -> Self {
        Self {
            target,
            state: HoverState::PendingShow,
            seq,
            timer: None,
            popup: None,
        }
    }

    /// Cancels the pending hide, if any.
    pub fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn has_popup(&self) -> bool {
        self.popup.is_some()
    }
}
