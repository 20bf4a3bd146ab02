//! Position/index synchronization engine for a snapping carousel.
//!
//! A drag moves a continuous offset; the release either snaps back or
//! moves exactly one card; the discrete index commits once the settle
//! animation lands; and an overlay copy of the track crossfades over the
//! re-layout that follows a commit. None of this depends on the ECS, so
//! the [`widgets::carousel`](crate::widgets::carousel) plugin and the
//! headless [`Carousel`] driver share the same code.

use serde::{Deserialize, Serialize};

pub mod animator;
pub mod domain;
pub mod gesture;
pub mod layout;
pub mod overlay;
pub mod sync;
pub mod window;

pub use animator::{AnimatedValue, AnimationConfig, Easing};
pub use domain::{
    AnimationDomain, Carousel, CommitDomain, CommitEvent, GestureSignal, Handoff, TrackFrame,
};
pub use gesture::{EdgePolicy, GestureCapture, GestureContext, GesturePhase, IndexBounds};
pub use layout::CarouselLayout;
pub use overlay::{CrossfadeOverlay, OverlayTiming, OverlayTransition};
pub use sync::{CommittedState, IndexChange, IndexSynchronizer};
pub use window::{render_window, window_slots, WindowSlot, DEFAULT_WINDOW_RADIUS};

/// Engine settings, read from the `carousel` section of the app config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Width of the neighbouring cards peeking in on each side.
    pub preview_width: f32,
    pub window_radius: i32,
    pub initial_index: i32,
    pub edge_policy: EdgePolicy,
    pub settle: AnimationConfig,
    pub overlay: OverlayTiming,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            preview_width: 50.0,
            window_radius: DEFAULT_WINDOW_RADIUS,
            initial_index: 0,
            edge_policy: EdgePolicy::Clamp,
            settle: AnimationConfig::clamped_spring(),
            overlay: OverlayTiming::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: CarouselConfig =
            serde_yaml::from_str("initial_index: 2\nedge_policy: unbounded\n").unwrap();
        assert_eq!(config.initial_index, 2);
        assert_eq!(config.edge_policy, EdgePolicy::Unbounded);
        assert_eq!(config.preview_width, 50.0);
        assert_eq!(config.settle, AnimationConfig::clamped_spring());
    }
}
