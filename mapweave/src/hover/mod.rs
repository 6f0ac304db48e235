//! Hover preview coordination.
//!
//! Each marker with transient pointer interaction gets a [`HoverSession`]
//! driving this state machine:
//!
//! ```text
//!          enter                resolved              leave
//!  Idle ──────────► PendingShow ─────────► Shown ─────────────► PendingHide
//!   ▲                   │                    ▲                      │   │
//!   │      leave        │                    └── enter (marker ─────┘   │
//!   ├───────────────────┘                        or its popup)          │
//!   └──────────────────────── debounce elapsed ─────────────────────────┘
//! ```
//!
//! At most one popup is shown at a time. A session that resolves while
//! another popup is open closes that popup first.

mod coordinator;
mod placement;
mod session;

pub use coordinator::{
    HoverConfig, HoverCoordinator, DEFAULT_HIDE_DEBOUNCE, DEFAULT_HIGHLIGHT_HYSTERESIS,
    DEFAULT_POPUP_HIDE_DEBOUNCE,
};
pub use placement::{place_popup, Placement, PopupPlacement, PopupSize};
pub use session::{HoverSession, HoverState, HoverTarget};
