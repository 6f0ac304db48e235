//! Camera transitions and zoom-change debouncing.
//!
//! Jumping the camera several zoom levels at once flips through every band
//! in between. [`TransitionController`] instead pans first, then steps one
//! zoom level at a time, and asks for a visibility recompute exactly once
//! after the last step has settled:
//!
//! ```text
//! move_to(center, 6) from zoom 10
//!
//!  pan ── 400ms ── 9 ── 150ms ── 8 ── 150ms ── 7 ── 150ms ── 6 ── 150ms ── settled(6)
//! ```

mod camera;
mod debounce;
mod transition;

pub use camera::{Camera, MemoryCamera};
pub use debounce::{ZoomDebouncer, DEFAULT_ZOOM_DEBOUNCE};
pub use transition::{
    SettleCallback, TransitionConfig, TransitionController, TransitionHandle, TransitionOutcome,
};
