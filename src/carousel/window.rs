//! Windowed item resolution for a carousel track.

/// Slots on each side of the centered item.
pub const DEFAULT_WINDOW_RADIUS: i32 = 2;

#[derive(Debug, PartialEq)]
pub struct WindowSlot<'a, T> {
    /// Position relative to the centered slot, in `[-radius, radius]`.
    pub slot_offset: i32,
    pub index: i32,
    /// `None` when `index` falls outside the item list.
    pub item: Option<&'a T>,
}

// Manual impls: derives would require `T: Clone + Copy`.
impl<T> Clone for WindowSlot<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WindowSlot<'_, T> {}

pub fn resolve<T>(items: &[T], index: i32) -> Option<&T> {
    usize::try_from(index).ok().and_then(|index| items.get(index))
}

/// Slots from `-radius` to `radius` around `active_index`, left to right.
pub fn window_slots<T>(
    active_index: i32,
    items: &[T],
    radius: i32,
) -> impl Iterator<Item = WindowSlot<'_, T>> {
    let radius = radius.max(0);
    (-radius..=radius).map(move |slot_offset| {
        let index = active_index.saturating_add(slot_offset);
        WindowSlot {
            slot_offset,
            index,
            item: resolve(items, index),
        }
    })
}

/// Calls `render_item` once per slot, in slot order.
pub fn render_window<T, V>(
    active_index: i32,
    items: &[T],
    radius: i32,
    mut render_item: impl FnMut(Option<&T>, i32) -> V,
) -> Vec<V> {
    window_slots(active_index, items, radius)
        .map(|slot| render_item(slot.item, slot.slot_offset))
        .collect()
}
