use bevy::log::trace;
use serde::{Deserialize, Serialize};

use super::animator::{AnimatedValue, AnimationConfig, Easing};
use super::gesture::GesturePhase;
use super::sync::IndexSynchronizer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayTiming {
    /// Seconds before fading in once a drag begins.
    pub fade_in_delay: f32,
    /// Seconds the overlay lingers after the settle before fading out.
    pub fade_out_delay: f32,
    pub fade: AnimationConfig,
}

impl Default for OverlayTiming {
    fn default() -> Self {
        Self {
            fade_in_delay: 0.05,
            fade_out_delay: 0.05,
            fade: AnimationConfig::timing(0.3, Easing::QuadraticInOut),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayTransition {
    FadeIn,
    FadeOut,
}

/// Second copy of the windowed track that masks the re-layout jump of an
/// index commit.
///
/// It mirrors the gesture phase: when a drag begins it snaps onto the
/// primary window and fades in, and once the gesture has settled it fades
/// back out after a short delay.
#[derive(Debug, Clone)]
pub struct CrossfadeOverlay {
    opacity: AnimatedValue,
    issued_target: f32,
    timing: OverlayTiming,
}

impl CrossfadeOverlay {
    pub fn new(timing: OverlayTiming) -> Self {
        Self {
            opacity: AnimatedValue::new(0.0),
            issued_target: 0.0,
            timing,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.value().clamp(0.0, 1.0)
    }

    /// Last target opacity issued.
    pub fn target(&self) -> f32 {
        self.issued_target
    }

    pub fn is_fading(&self) -> bool {
        self.opacity.is_animating()
    }

    pub fn on_phase(
        &mut self,
        phase: GesturePhase,
        sync: &mut IndexSynchronizer,
    ) -> Option<OverlayTransition> {
        let (target, delay, transition) = match phase {
            GesturePhase::Active => (1.0, self.timing.fade_in_delay, OverlayTransition::FadeIn),
            GesturePhase::Inactive => (0.0, self.timing.fade_out_delay, OverlayTransition::FadeOut),
        };
        if self.issued_target == target {
            return None;
        }

        if transition == OverlayTransition::FadeIn {
            sync.snapshot_overlay();
        }
        self.issued_target = target;
        self.opacity.cancel();
        self.opacity.animate_to_delayed(target, delay, self.timing.fade, ());
        trace!("overlay {transition:?} from {:.2}", self.opacity.value());
        Some(transition)
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.opacity.tick(delta_seconds);
    }
}

impl Default for CrossfadeOverlay {
    fn default() -> Self {
        Self::new(OverlayTiming::default())
    }
}
