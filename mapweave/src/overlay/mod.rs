//! Overlay lifecycle management.
//!
//! [`OverlayManager`] is the only owner of overlay handles. Each layer's
//! handles are rebuilt when its dataset is replaced and toggled between
//! attached and detached as the viewport changes. Click handlers are kept in
//! a [`HandlerRegistry`] and released with the handle that registered them.

mod error;
mod handle;
mod handlers;
mod highlight;
mod manager;
mod selection;

pub use error::OverlayError;
pub use handle::{OverlayHandle, OverlayId, OverlayView};
pub use handlers::{HandlerRegistry, SelectionHandler, Subscription};
pub use highlight::RegionHighlight;
pub use manager::{LayerDataReport, OverlayManager, ShowOutcome};
pub use selection::{handler_for, SelectedEntity, SelectionListener, TracingSelectionListener};
