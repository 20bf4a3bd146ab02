use bevy::log::debug;

/// Discrete carousel state owned by the commit domain.
///
/// `overlay_offset_delta` is measured in card widths: it is how far the
/// overlay track must be shifted so its window, centered on
/// `overlay_active_index`, lines up with the primary track after the
/// primary re-centered on `active_index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommittedState {
    pub active_index: i32,
    pub overlay_active_index: i32,
    pub overlay_offset_delta: f32,
    /// Index at which the animated offset reads zero.
    pub anchor_index: i32,
}

impl CommittedState {
    pub fn new(active_index: i32) -> Self {
        Self {
            active_index,
            overlay_active_index: active_index,
            overlay_offset_delta: 0.0,
            anchor_index: active_index,
        }
    }

    /// Pixel shift applied to the primary track to re-center it on the
    /// committed index.
    pub fn layout_offset(&self, card_width: f32) -> f32 {
        (self.active_index - self.anchor_index) as f32 * card_width
    }

    pub fn overlay_offset(&self, card_width: f32) -> f32 {
        self.overlay_offset_delta * card_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexChange {
    pub previous: i32,
    pub current: i32,
    /// `-1`, `0` or `1`: which way the primary track's layout moved.
    pub offset_direction: i32,
    pub overlay_offset_delta: f32,
}

/// Single writer of [`CommittedState::active_index`].
#[derive(Debug, Clone)]
pub struct IndexSynchronizer {
    state: CommittedState,
    revision: u64,
}

impl IndexSynchronizer {
    pub fn new(active_index: i32) -> Self {
        Self {
            state: CommittedState::new(active_index),
            revision: 0,
        }
    }

    pub fn state(&self) -> &CommittedState {
        &self.state
    }

    pub fn active_index(&self) -> i32 {
        self.state.active_index
    }

    /// Bumped once per observable state transition.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Publishes `new_index` together with the matching overlay shift in a
    /// single transition. Committing the index already held is a no-op.
    pub fn commit(&mut self, new_index: i32) -> Option<IndexChange> {
        let previous = self.state.active_index;
        if new_index == previous {
            return None;
        }

        let offset_direction = (new_index - previous).signum();
        let overlay_offset_delta = self.state.overlay_offset_delta - (new_index - previous) as f32;
        self.state = CommittedState {
            active_index: new_index,
            overlay_offset_delta,
            ..self.state
        };
        self.revision += 1;

        debug!("committed index {previous} -> {new_index}");
        Some(IndexChange {
            previous,
            current: new_index,
            offset_direction,
            overlay_offset_delta,
        })
    }

    /// Points the overlay at the current window with no shift. Returns
    /// `false` when the overlay was already there.
    pub fn snapshot_overlay(&mut self) -> bool {
        let aligned = CommittedState {
            overlay_active_index: self.state.active_index,
            overlay_offset_delta: 0.0,
            ..self.state
        };
        if aligned == self.state {
            return false;
        }
        self.state = aligned;
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redundant_commit_is_a_no_op() {
        let mut sync = IndexSynchronizer::new(5);
        assert_eq!(sync.commit(5), None);
        assert_eq!(sync.commit(5), None);
        assert_eq!(sync.revision(), 0);
        assert_eq!(sync.active_index(), 5);
    }

    #[test]
    fn commit_publishes_index_and_overlay_shift_together() {
        let mut sync = IndexSynchronizer::new(2);
        let change = sync.commit(3).unwrap();
        assert_eq!(change.previous, 2);
        assert_eq!(change.current, 3);
        assert_eq!(change.offset_direction, 1);
        assert_eq!(change.overlay_offset_delta, -1.0);
        assert_eq!(sync.revision(), 1);

        let state = sync.state();
        assert_eq!(state.active_index, 3);
        assert_eq!(state.overlay_active_index, 2);
        assert_eq!(state.layout_offset(300.0), 300.0);
        assert_eq!(state.overlay_offset(300.0), -300.0);
    }

    #[test]
    fn overlay_stays_aligned_with_its_own_window() {
        let mut sync = IndexSynchronizer::new(2);
        sync.commit(3);
        sync.commit(4);
        let state = sync.state();
        // overlay still renders index 2, two cards to the left of the primary
        let primary_center = state.layout_offset(100.0);
        let overlay_center = primary_center + state.overlay_offset(100.0);
        assert_eq!(overlay_center, (state.overlay_active_index - state.anchor_index) as f32 * 100.0);

        sync.commit(1);
        assert_eq!(sync.state().overlay_offset_delta, 1.0);
    }

    #[test]
    fn snapshot_realigns_overlay_once() {
        let mut sync = IndexSynchronizer::new(0);
        assert!(!sync.snapshot_overlay());
        sync.commit(1);
        assert!(sync.snapshot_overlay());
        assert_eq!(sync.state().overlay_active_index, 1);
        assert_eq!(sync.state().overlay_offset_delta, 0.0);
        assert!(!sync.snapshot_overlay());
        assert_eq!(sync.revision(), 2);
    }
}
