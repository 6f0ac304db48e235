//! Pure overlay content builder.
//!
//! Turns dataset records into surface-independent overlay descriptions and
//! detail payloads into popup bodies. Nothing here touches the rendering
//! surface, so the output can be asserted on directly in tests.

mod builder;
mod format;
mod popup;

pub use builder::{
    build_overlay, Anchor, OverlayContent, OverlayKind, OverlaySpec, ShapeStyle, HOVER_Z_INDEX,
};
pub use format::{format_area_price, format_price_eok, format_receipt_date, truncate_name};
pub use popup::{popup_body, PopupBody};
