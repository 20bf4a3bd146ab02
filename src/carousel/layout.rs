use serde::{Deserialize, Serialize};

/// Horizontal geometry shared by every carousel component.
///
/// The centered card fills the viewport minus a preview strip on each side,
/// so neighbours peek in by `preview_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarouselLayout {
    pub viewport_width: f32,
    pub preview_width: f32,
}

impl CarouselLayout {
    pub fn new(viewport_width: f32, preview_width: f32) -> Self {
        Self {
            viewport_width,
            preview_width,
        }
    }

    pub fn card_width(&self) -> f32 {
        (self.viewport_width - 2.0 * self.preview_width).max(0.0)
    }

    /// Drag distance that must be exceeded (strictly) to change page.
    pub fn snap_threshold(&self) -> f32 {
        self.card_width() / 3.0
    }

    /// Left edge of the slot at `-radius` when the track is at rest.
    pub fn track_origin(&self, radius: i32) -> f32 {
        self.preview_width - radius as f32 * self.card_width()
    }

    /// Applies a new viewport width. Returns `false` when nothing changed.
    pub fn resize(&mut self, viewport_width: f32) -> bool {
        if (viewport_width - self.viewport_width).abs() <= f32::EPSILON {
            return false;
        }
        self.viewport_width = viewport_width;
        true
    }
}

impl Default for CarouselLayout {
    fn default() -> Self {
        Self::new(400.0, 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_width_leaves_room_for_previews() {
        let layout = CarouselLayout::new(400.0, 50.0);
        assert_eq!(layout.card_width(), 300.0);
        assert_eq!(layout.snap_threshold(), 100.0);
        assert_eq!(layout.track_origin(2), 50.0 - 600.0);
    }

    #[test]
    fn narrow_viewport_never_goes_negative() {
        let layout = CarouselLayout::new(60.0, 50.0);
        assert_eq!(layout.card_width(), 0.0);
    }

    #[test]
    fn resize_recomputes_card_width() {
        let mut layout = CarouselLayout::new(400.0, 50.0);
        assert!(!layout.resize(400.0));
        assert!(layout.resize(700.0));
        assert_eq!(layout.card_width(), 600.0);
        assert!(layout.resize(80.0));
        assert_eq!(layout.card_width(), 0.0);
    }
}
