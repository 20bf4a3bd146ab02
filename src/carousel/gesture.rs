use bevy::log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::animator::{AnimatedValue, AnimationConfig};
use super::layout::CarouselLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    #[default]
    Inactive,
    Active,
}

/// What happens when a release would move past the first or last item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Snap back instead of leaving `[0, item_count)`.
    #[default]
    Clamp,
    /// Follow the drag anyway; the window then renders placeholders.
    Unbounded,
}

impl EdgePolicy {
    pub fn admits(self, index: i32, item_count: usize) -> bool {
        match self {
            EdgePolicy::Unbounded => true,
            EdgePolicy::Clamp => index >= 0 && (index as usize) < item_count,
        }
    }
}

/// Which indices a release may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBounds {
    pub item_count: usize,
    pub policy: EdgePolicy,
}

impl IndexBounds {
    pub fn new(item_count: usize, policy: EdgePolicy) -> Self {
        Self { item_count, policy }
    }

    pub fn admits(&self, index: i32) -> bool {
        self.policy.admits(index, self.item_count)
    }
}

/// `+1` for a drag to the right, `-1` to the left, `None` when there is no
/// usable horizontal motion.
pub fn drag_direction(delta_x: f32) -> Option<i32> {
    if !delta_x.is_finite() || delta_x == 0.0 {
        return None;
    }
    Some(if delta_x > 0.0 { 1 } else { -1 })
}

/// Direction of a release that crosses the snap threshold. A drag of
/// exactly one third of a card stays put.
pub fn release_direction(delta_x: f32, card_width: f32) -> Option<i32> {
    let direction = drag_direction(delta_x)?;
    (delta_x.abs() > card_width / 3.0).then_some(direction)
}

/// Per-gesture scratch state, alive from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureContext {
    pub start_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub target_offset: f32,
    pub index: i32,
    pub changed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GestureCapture {
    phase: GesturePhase,
    context: Option<GestureContext>,
}

impl GestureCapture {
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn context(&self) -> Option<&GestureContext> {
        self.context.as_ref()
    }

    /// Begins tracking. Cancels any settle animation before anchoring on the
    /// offset's resting value. Returns `true` when the phase changed.
    pub fn start(&mut self, offset: &mut AnimatedValue<i32>) -> bool {
        offset.cancel();
        let start_offset = offset.next_value();
        self.context = Some(GestureContext { start_offset });
        trace!("gesture start at {start_offset:.2}");
        let changed = self.phase != GesturePhase::Active;
        self.phase = GesturePhase::Active;
        changed
    }

    /// Marks the phase active for a settle that no pointer drives.
    pub fn hold(&mut self, offset: &mut AnimatedValue<i32>) -> bool {
        offset.cancel();
        self.context = None;
        let changed = self.phase != GesturePhase::Active;
        self.phase = GesturePhase::Active;
        changed
    }

    /// Tracks the pointer 1:1. Ignored outside a gesture.
    pub fn update(&mut self, delta_x: f32, offset: &mut AnimatedValue<i32>) -> bool {
        let Some(context) = self.context else {
            return false;
        };
        offset.set(context.start_offset + delta_x);
        true
    }

    /// Resolves the release and starts the settle animation, carrying the
    /// pending index as its completion payload. The phase stays active until
    /// [`GestureCapture::finish`].
    pub fn end(
        &mut self,
        delta_x: f32,
        current_index: i32,
        bounds: IndexBounds,
        layout: &CarouselLayout,
        settle: AnimationConfig,
        offset: &mut AnimatedValue<i32>,
    ) -> Option<Release> {
        let context = self.context.take()?;
        let card_width = layout.card_width();

        let release = match release_direction(delta_x, card_width) {
            Some(direction) if bounds.admits(current_index - direction) => Release {
                target_offset: context.start_offset + direction as f32 * card_width,
                index: current_index - direction,
                changed: true,
            },
            crossed => {
                if crossed.is_some() {
                    debug!("release past the edge at index {current_index}, snapping back");
                }
                Release {
                    target_offset: context.start_offset,
                    index: current_index,
                    changed: false,
                }
            }
        };

        trace!(
            "gesture end: delta {delta_x:.2}, target {:.2}, index {}",
            release.target_offset,
            release.index
        );
        offset.animate_to(release.target_offset, settle, release.index);
        Some(release)
    }

    /// Returns `true` when the phase changed.
    pub fn finish(&mut self) -> bool {
        self.context = None;
        let changed = self.phase != GesturePhase::Inactive;
        self.phase = GesturePhase::Inactive;
        changed
    }

    pub fn rescale(&mut self, ratio: f32) {
        if let Some(context) = self.context.as_mut() {
            context.start_offset *= ratio;
        }
    }

    pub fn shift(&mut self, delta: f32) {
        if let Some(context) = self.context.as_mut() {
            context.start_offset += delta;
        }
    }
}
