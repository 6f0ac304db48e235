//! Popup placement relative to a marker.

use crate::geo::{ScreenRect, ScreenSize};

/// Popup box dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupSize {
    pub width: f64,
    pub height: f64,
    /// Height of the speech-bubble tail.
    pub tail: f64,
    /// Space between tail and marker.
    pub gap: f64,
    /// Minimum distance from the viewport edges.
    pub margin: f64,
}

impl Default for PopupSize {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 110.0,
            tail: 15.0,
            gap: 10.0,
            margin: 20.0,
        }
    }
}

/// Which side of the marker the popup sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

/// Top-left corner of the popup in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPlacement {
    pub left: f64,
    pub top: f64,
    pub placement: Placement,
}

/// Centres the popup above the marker, clamped horizontally to the viewport.
/// Flips below the marker when there is not enough room above; a flipped
/// popup is clamped to the bottom margin, top margin winning on a viewport
/// too short for either.
pub fn place_popup(anchor: ScreenRect, viewport: ScreenSize, size: &PopupSize) -> PopupPlacement {
    let max_left = viewport.width - size.width - size.margin;
    let left = (anchor.center_x() - size.width / 2.0)
        .min(max_left)
        .max(size.margin);

    let above = anchor.top - size.height - size.tail - size.gap;
    if above >= size.margin {
        PopupPlacement {
            left,
            top: above,
            placement: Placement::Above,
        }
    } else {
        let max_top = viewport.height - size.height - size.margin;
        let top = (anchor.bottom + size.tail + size.gap)
            .min(max_top)
            .max(size.margin);
        PopupPlacement {
            left,
            top,
            placement: Placement::Below,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: ScreenSize = ScreenSize::new(1280.0, 800.0);

    fn marker(x: f64, y: f64) -> ScreenRect {
        ScreenRect::new(x - 20.0, y - 40.0, x + 20.0, y)
    }

    #[test]
    fn test_centred_above_marker() {
        let p = place_popup(marker(640.0, 400.0), VIEWPORT, &PopupSize::default());
        assert_eq!(p.placement, Placement::Above);
        assert_eq!(p.left, 480.0);
        assert_eq!(p.top, 360.0 - 110.0 - 15.0 - 10.0);
    }

    #[test]
    fn test_clamped_to_edges() {
        let left = place_popup(marker(30.0, 400.0), VIEWPORT, &PopupSize::default());
        assert_eq!(left.left, 20.0);

        let right = place_popup(marker(1270.0, 400.0), VIEWPORT, &PopupSize::default());
        assert_eq!(right.left, 1280.0 - 320.0 - 20.0);
    }

    #[test]
    fn test_flips_below_near_top() {
        let p = place_popup(marker(640.0, 120.0), VIEWPORT, &PopupSize::default());
        assert_eq!(p.placement, Placement::Below);
        assert_eq!(p.top, 120.0 + 15.0 + 10.0);
    }

    #[test]
    fn test_below_clamped_to_viewport_bottom() {
        let size = PopupSize::default();
        let p = place_popup(marker(640.0, 100.0), ScreenSize::new(1280.0, 200.0), &size);
        assert_eq!(p.placement, Placement::Below);
        assert_eq!(p.top, 200.0 - 110.0 - 20.0);
        assert!(p.top + size.height <= 200.0 - size.margin);

        let tiny = place_popup(marker(640.0, 60.0), ScreenSize::new(1280.0, 100.0), &size);
        assert_eq!(tiny.placement, Placement::Below);
        assert_eq!(tiny.top, 20.0);
    }

    #[test]
    fn test_narrow_viewport_keeps_left_margin() {
        let p = place_popup(
            marker(100.0, 400.0),
            ScreenSize::new(300.0, 600.0),
            &PopupSize::default(),
        );
        assert_eq!(p.left, 20.0);
    }
}
