use core::cmp::Ordering;

use super::Layer;

/// Stable sort key for draw items.
///
/// Ordering rules:
/// 1) `layer`: descending (farthest layer first, back-to-front)
/// 2) `order`: ascending (insertion order within a layer)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub layer: Layer,
    /// Insertion index, ensuring stable ordering within a layer.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(layer: Layer, order: u32) -> Self {
        Self { layer, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match other.layer.cmp(&self.layer) {
            Ordering::Equal => self.order.cmp(&other.order),
            o => o,
        }
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
