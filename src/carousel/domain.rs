//! The two execution contexts of a carousel and the hand-off between them.
//!
//! [`AnimationDomain`] runs every frame and owns the continuous offset and
//! the gesture phase. [`CommitDomain`] owns the discrete index and overlay
//! state and only changes by applying [`Handoff`]s, in order. Nothing in the
//! animation domain ever waits for the commit domain.

use std::collections::VecDeque;

use bevy::log::{debug, trace};

use super::animator::{AnimatedValue, AnimationConfig};
use super::gesture::{EdgePolicy, GestureCapture, GesturePhase, IndexBounds};
use super::layout::CarouselLayout;
use super::overlay::{CrossfadeOverlay, OverlayTransition};
use super::sync::{CommittedState, IndexChange, IndexSynchronizer};
use super::CarouselConfig;

/// Pointer input, already reduced to total horizontal drag distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSignal {
    Start,
    Move { delta_x: f32 },
    End { delta_x: f32 },
    /// The pointer was lost mid-drag. Settles back onto the resting card.
    Cancel,
}

/// A message from the animation domain to the commit domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handoff {
    Commit { index: i32 },
    Phase(GesturePhase),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitEvent {
    Index(IndexChange),
    Overlay(OverlayTransition),
}

#[derive(Debug, Clone)]
pub struct AnimationDomain {
    layout: CarouselLayout,
    settle: AnimationConfig,
    edge_policy: EdgePolicy,
    item_count: usize,
    offset: AnimatedValue<i32>,
    gesture: GestureCapture,
    resting_index: i32,
    /// Index at which the offset reads zero.
    anchor_index: i32,
    /// Card width the stored offsets are expressed in. Zero until the
    /// viewport has been measured.
    offset_scale: f32,
}

impl AnimationDomain {
    pub fn new(config: &CarouselConfig, viewport_width: f32, item_count: usize) -> Self {
        let layout = CarouselLayout::new(viewport_width, config.preview_width);
        Self {
            offset_scale: layout.card_width(),
            layout,
            settle: config.settle,
            edge_policy: config.edge_policy,
            item_count,
            offset: AnimatedValue::new(0.0),
            gesture: GestureCapture::default(),
            resting_index: config.initial_index,
            anchor_index: config.initial_index,
        }
    }

    pub fn layout(&self) -> &CarouselLayout {
        &self.layout
    }

    pub fn offset(&self) -> f32 {
        self.offset.value()
    }

    pub fn next_offset(&self) -> f32 {
        self.offset.next_value()
    }

    pub fn is_settling(&self) -> bool {
        self.offset.is_animating()
    }

    pub fn phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    /// Index the carousel will rest on once the current settle completes.
    pub fn resting_index(&self) -> i32 {
        self.resting_index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    fn bounds(&self) -> IndexBounds {
        IndexBounds::new(self.item_count, self.edge_policy)
    }

    pub fn handle(&mut self, signal: GestureSignal, out: &mut impl Extend<Handoff>) {
        match signal {
            GestureSignal::Start => {
                if self.gesture.start(&mut self.offset) {
                    out.extend([Handoff::Phase(GesturePhase::Active)]);
                }
            }
            GestureSignal::Move { delta_x } => {
                self.gesture.update(delta_x, &mut self.offset);
            }
            GestureSignal::Cancel => self.handle(GestureSignal::End { delta_x: 0.0 }, out),
            GestureSignal::End { delta_x } => {
                let bounds = self.bounds();
                if let Some(release) = self.gesture.end(
                    delta_x,
                    self.resting_index,
                    bounds,
                    &self.layout,
                    self.settle,
                    &mut self.offset,
                ) {
                    self.resting_index = release.index;
                }
            }
        }
    }

    /// Settles on `index` without a drag. Refused while a pointer is
    /// dragging or when `index` is out of bounds.
    pub fn scroll_to(&mut self, index: i32, out: &mut impl Extend<Handoff>) -> bool {
        if self.gesture.context().is_some() || !self.bounds().admits(index) {
            return false;
        }
        if index == self.resting_index {
            return false;
        }

        if self.gesture.hold(&mut self.offset) {
            out.extend([Handoff::Phase(GesturePhase::Active)]);
        }
        let steps = (index - self.resting_index) as f32;
        let target = self.offset.next_value() - steps * self.layout.card_width();
        self.offset.animate_to(target, self.settle, index);
        debug!("scrolling {} -> {index}", self.resting_index);
        self.resting_index = index;
        true
    }

    /// Advances the settle animation. On completion the pending index is
    /// handed off, followed by the end of the gesture phase.
    pub fn tick(&mut self, delta_seconds: f32, out: &mut impl Extend<Handoff>) {
        let Some(index) = self.offset.tick(delta_seconds) else {
            return;
        };
        trace!("settled at {:.2} on index {index}", self.offset.value());
        out.extend([Handoff::Commit { index }]);
        if self.gesture.finish() {
            out.extend([Handoff::Phase(GesturePhase::Inactive)]);
        }
    }

    /// Applies a new viewport width, keeping offsets proportional.
    pub fn resize(&mut self, viewport_width: f32) -> bool {
        if !self.layout.resize(viewport_width) {
            return false;
        }
        let card_width = self.layout.card_width();
        // A zero-width layout cannot hold a position, so keep the old units
        // until a usable width comes back.
        if card_width <= f32::EPSILON || card_width == self.offset_scale {
            return true;
        }

        if self.offset_scale > f32::EPSILON {
            let ratio = card_width / self.offset_scale;
            self.offset.rescale(ratio);
            self.gesture.rescale(ratio);
        } else {
            let resting = -((self.resting_index - self.anchor_index) as f32) * card_width;
            let delta = resting - self.offset.next_value();
            self.offset.shift(delta);
            self.gesture.shift(delta);
            debug!("rebuilt offset {resting:.1} for resting index {}", self.resting_index);
        }
        self.offset_scale = card_width;
        true
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
    }
}

#[derive(Debug, Clone)]
pub struct CommitDomain {
    sync: IndexSynchronizer,
    overlay: CrossfadeOverlay,
}

impl CommitDomain {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            sync: IndexSynchronizer::new(config.initial_index),
            overlay: CrossfadeOverlay::new(config.overlay),
        }
    }

    pub fn state(&self) -> &CommittedState {
        self.sync.state()
    }

    pub fn active_index(&self) -> i32 {
        self.sync.active_index()
    }

    pub fn revision(&self) -> u64 {
        self.sync.revision()
    }

    pub fn overlay(&self) -> &CrossfadeOverlay {
        &self.overlay
    }

    pub fn apply(&mut self, handoff: Handoff) -> Option<CommitEvent> {
        match handoff {
            Handoff::Commit { index } => self.sync.commit(index).map(CommitEvent::Index),
            Handoff::Phase(phase) => self
                .overlay
                .on_phase(phase, &mut self.sync)
                .map(CommitEvent::Overlay),
        }
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.overlay.tick(delta_seconds);
    }
}

/// Where both tracks sit this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFrame {
    pub card_width: f32,
    pub primary_x: f32,
    pub overlay_x: f32,
    pub overlay_opacity: f32,
    pub active_index: i32,
    pub overlay_active_index: i32,
}

impl TrackFrame {
    pub fn compute(animation: &AnimationDomain, commit: &CommitDomain, radius: i32) -> Self {
        let layout = animation.layout();
        let card_width = layout.card_width();
        let state = commit.state();
        let primary_x =
            layout.track_origin(radius) + animation.offset() + state.layout_offset(card_width);
        Self {
            card_width,
            primary_x,
            overlay_x: primary_x + state.overlay_offset(card_width),
            overlay_opacity: commit.overlay().opacity(),
            active_index: state.active_index,
            overlay_active_index: state.overlay_active_index,
        }
    }
}

/// Both domains plus an explicit FIFO hand-off queue, for hosts without
/// their own message bus.
#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    animation: AnimationDomain,
    commit: CommitDomain,
    handoffs: VecDeque<Handoff>,
}

impl Carousel {
    pub fn new(config: CarouselConfig, viewport_width: f32, item_count: usize) -> Self {
        Self {
            animation: AnimationDomain::new(&config, viewport_width, item_count),
            commit: CommitDomain::new(&config),
            handoffs: VecDeque::new(),
            config,
        }
    }

    pub fn animation(&self) -> &AnimationDomain {
        &self.animation
    }

    pub fn commit_domain(&self) -> &CommitDomain {
        &self.commit
    }

    pub fn active_index(&self) -> i32 {
        self.commit.active_index()
    }

    pub fn pending_handoffs(&self) -> usize {
        self.handoffs.len()
    }

    pub fn signal(&mut self, signal: GestureSignal) {
        self.animation.handle(signal, &mut self.handoffs);
    }

    pub fn scroll_to(&mut self, index: i32) -> bool {
        self.animation.scroll_to(index, &mut self.handoffs)
    }

    pub fn resize(&mut self, viewport_width: f32) -> bool {
        self.animation.resize(viewport_width)
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        self.animation.set_item_count(item_count);
    }

    /// One display frame on the animation side. Hand-offs queue up until
    /// [`Carousel::flush`].
    pub fn advance(&mut self, delta_seconds: f32) {
        self.animation.tick(delta_seconds, &mut self.handoffs);
        self.commit.tick(delta_seconds);
    }

    /// Applies queued hand-offs to the commit domain in order.
    pub fn flush(&mut self) -> Vec<CommitEvent> {
        let mut events = Vec::new();
        while let Some(handoff) = self.handoffs.pop_front() {
            events.extend(self.commit.apply(handoff));
        }
        events
    }

    pub fn frame(&self) -> TrackFrame {
        TrackFrame::compute(&self.animation, &self.commit, self.config.window_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::animator::Easing;
    use crate::carousel::overlay::OverlayTiming;

    const FRAME: f32 = 1.0 / 60.0;

    fn config() -> CarouselConfig {
        CarouselConfig {
            preview_width: 50.0,
            window_radius: 2,
            initial_index: 2,
            edge_policy: EdgePolicy::Clamp,
            settle: AnimationConfig::timing(0.2, Easing::QuadraticInOut),
            overlay: OverlayTiming {
                fade_in_delay: 0.05,
                fade_out_delay: 0.05,
                fade: AnimationConfig::timing(0.2, Easing::Linear),
            },
        }
    }

    // card width 300
    fn carousel() -> Carousel {
        Carousel::new(config(), 400.0, 10)
    }

    fn drag(carousel: &mut Carousel, delta_x: f32) {
        carousel.signal(GestureSignal::Start);
        carousel.signal(GestureSignal::Move { delta_x: delta_x / 2.0 });
        carousel.signal(GestureSignal::Move { delta_x });
        carousel.signal(GestureSignal::End { delta_x });
    }

    fn run(carousel: &mut Carousel, seconds: f32) -> Vec<CommitEvent> {
        let mut events = Vec::new();
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            carousel.advance(FRAME);
            events.extend(carousel.flush());
        }
        events
    }

    fn index_changes(events: &[CommitEvent]) -> Vec<IndexChange> {
        events
            .iter()
            .filter_map(|event| match event {
                CommitEvent::Index(change) => Some(*change),
                CommitEvent::Overlay(_) => None,
            })
            .collect()
    }

    #[test]
    fn index_commits_only_after_settle() {
        let mut carousel = carousel();
        drag(&mut carousel, -150.0);
        assert_eq!(carousel.animation().resting_index(), 3);
        assert_eq!(carousel.animation().next_offset(), -300.0);

        let events = carousel.flush();
        assert_eq!(events, vec![CommitEvent::Overlay(OverlayTransition::FadeIn)]);
        assert_eq!(carousel.active_index(), 2);

        let events = run(&mut carousel, 0.5);
        let changes = index_changes(&events);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].current, 3);
        assert!(events.contains(&CommitEvent::Overlay(OverlayTransition::FadeOut)));
        assert_eq!(carousel.active_index(), 3);
        assert_eq!(carousel.animation().phase(), GesturePhase::Inactive);
    }

    #[test]
    fn threshold_examples() {
        for (delta, expected) in [(-101.0, 3), (-99.0, 2), (-100.0, 2), (101.0, 1)] {
            let mut carousel = carousel();
            drag(&mut carousel, delta);
            run(&mut carousel, 0.5);
            assert_eq!(carousel.active_index(), expected, "delta {delta}");
        }
    }

    #[test]
    fn new_gesture_cancels_pending_commit() {
        let mut carousel = carousel();
        drag(&mut carousel, -150.0);
        run(&mut carousel, 0.05);
        assert!(carousel.animation().is_settling());

        // reverse before the first settle lands
        drag(&mut carousel, 150.0);
        let events = run(&mut carousel, 0.5);
        assert!(index_changes(&events).is_empty());
        assert_eq!(carousel.active_index(), 2);
        assert_eq!(carousel.commit_domain().revision(), 0);
    }

    #[test]
    fn chained_gestures_commit_only_the_latest_resolution() {
        let mut carousel = carousel();
        drag(&mut carousel, -150.0);
        run(&mut carousel, 0.05);
        drag(&mut carousel, -150.0);
        let changes = index_changes(&run(&mut carousel, 0.5));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].previous, 2);
        assert_eq!(changes[0].current, 4);
        assert_eq!(changes[0].overlay_offset_delta, -2.0);
        assert_eq!(carousel.animation().next_offset(), -600.0);
    }

    #[test]
    fn round_trip_restores_index_and_offset() {
        let mut carousel = carousel();
        let rest = carousel.animation().next_offset();
        drag(&mut carousel, -200.0);
        run(&mut carousel, 0.5);
        assert_eq!(carousel.active_index(), 3);
        drag(&mut carousel, 200.0);
        run(&mut carousel, 0.5);
        assert_eq!(carousel.active_index(), 2);
        assert!((carousel.animation().next_offset() - rest).abs() < 1e-3);
        assert!((carousel.animation().offset() - rest).abs() < 1e-3);
    }

    #[test]
    fn resting_frame_is_centered_on_the_active_card() {
        let mut carousel = carousel();
        let initial = carousel.frame();
        assert_eq!(initial.primary_x, 50.0 - 600.0);
        drag(&mut carousel, -180.0);
        run(&mut carousel, 1.0);
        let settled = carousel.frame();
        assert!((settled.primary_x - initial.primary_x).abs() < 1e-3);
        assert_eq!(settled.active_index, 3);
        assert_eq!(settled.overlay_opacity, 0.0);
    }

    #[test]
    fn overlay_lines_up_with_primary_across_a_commit() {
        let mut carousel = carousel();
        drag(&mut carousel, -180.0);
        carousel.flush();
        // Settle on the animation side without delivering the commit yet.
        for _ in 0..30 {
            carousel.advance(FRAME);
        }
        let before = carousel.frame();
        assert_eq!(before.active_index, 2);
        assert!(carousel.pending_handoffs() > 0);

        carousel.flush();
        let after = carousel.frame();
        assert_eq!(after.active_index, 3);
        assert_eq!(after.overlay_active_index, 2);
        // Item i sits at x + (i - window_center) * card_width on both tracks.
        let item_x = |x: f32, center: i32, item: i32| x + (item - center) as f32 * after.card_width;
        assert!((item_x(after.overlay_x, 2, 3) - item_x(after.primary_x, 3, 3)).abs() < 1e-3);
        assert!((item_x(before.primary_x, 2, 3) - item_x(after.primary_x, 3, 3)).abs() < 1e-3);
    }

    #[test]
    fn clamped_edges_snap_back() {
        let mut carousel = Carousel::new(
            CarouselConfig {
                initial_index: 0,
                ..config()
            },
            400.0,
            3,
        );
        drag(&mut carousel, 250.0);
        run(&mut carousel, 0.5);
        assert_eq!(carousel.active_index(), 0);
        assert_eq!(carousel.animation().next_offset(), 0.0);
    }

    #[test]
    fn scroll_to_settles_and_commits_once() {
        let mut carousel = carousel();
        assert!(carousel.scroll_to(5));
        assert!(!carousel.scroll_to(10));
        let changes = index_changes(&run(&mut carousel, 0.5));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].current, 5);
        assert_eq!(carousel.animation().next_offset(), -900.0);
        assert_eq!(carousel.animation().phase(), GesturePhase::Inactive);
        assert!(!carousel.scroll_to(5));
    }

    #[test]
    fn scroll_is_refused_mid_drag() {
        let mut carousel = carousel();
        carousel.signal(GestureSignal::Start);
        assert!(!carousel.scroll_to(4));
    }

    #[test]
    fn collapsing_the_viewport_keeps_the_committed_card_centered() {
        let mut carousel = carousel();
        let initial = carousel.frame();
        drag(&mut carousel, -150.0);
        run(&mut carousel, 0.5);
        assert_eq!(carousel.active_index(), 3);

        assert!(carousel.resize(80.0));
        assert!(carousel.resize(400.0));
        let frame = carousel.frame();
        assert!((frame.primary_x - initial.primary_x).abs() < 1e-3);
        assert_eq!(carousel.animation().next_offset(), -300.0);

        assert!(carousel.resize(80.0));
        assert!(carousel.resize(700.0));
        assert_eq!(carousel.animation().next_offset(), -600.0);

        drag(&mut carousel, -250.0);
        run(&mut carousel, 0.5);
        assert_eq!(carousel.active_index(), 4);
        assert_eq!(carousel.animation().next_offset(), -1200.0);
    }

    #[test]
    fn navigation_before_layout_is_placed_once_measured() {
        let mut carousel = Carousel::new(config(), 0.0, 10);
        assert!(carousel.scroll_to(4));
        run(&mut carousel, 0.5);
        assert_eq!(carousel.active_index(), 4);

        assert!(carousel.resize(400.0));
        assert_eq!(carousel.animation().next_offset(), -600.0);
        assert!((carousel.frame().primary_x - (50.0 - 600.0)).abs() < 1e-3);
    }

    #[test]
    fn cancelled_drag_settles_back_and_ends_the_phase() {
        let mut carousel = carousel();
        carousel.signal(GestureSignal::Start);
        carousel.signal(GestureSignal::Move { delta_x: -180.0 });
        carousel.signal(GestureSignal::Cancel);
        let events = run(&mut carousel, 0.5);

        assert!(index_changes(&events).is_empty());
        assert_eq!(carousel.active_index(), 2);
        assert_eq!(carousel.animation().offset(), 0.0);
        assert_eq!(carousel.animation().phase(), GesturePhase::Inactive);
        assert!(carousel.scroll_to(5));
    }

    #[test]
    fn resize_mid_drag_keeps_gesture_proportional() {
        let mut carousel = carousel();
        carousel.signal(GestureSignal::Start);
        carousel.signal(GestureSignal::Move { delta_x: -60.0 });
        assert!(carousel.resize(700.0));
        assert_eq!(carousel.animation().offset(), -120.0);
        carousel.signal(GestureSignal::End { delta_x: -210.0 });
        run(&mut carousel, 1.0);
        assert_eq!(carousel.active_index(), 3);
        assert_eq!(carousel.animation().next_offset(), -600.0);
        assert!(!carousel.resize(700.0));
    }
}
