use super::{Layer, SortKey};

/// A single recorded draw: sort key + payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem<T> {
    pub key: SortKey,
    pub payload: T,
}

/// Recorded draw stream for a frame.
///
/// The renderer relies on the depth test for occlusion between layers; paint
/// order still matters inside a layer, where equal depths let the later draw win.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
#[derive(Debug)]
pub struct DrawList<T> {
    items: Vec<DrawItem<T>>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl<T> Default for DrawList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_order: 0,
            sorted_indices: Vec::new(),
            sorted_dirty: false,
        }
    }
}

impl<T> DrawList<T> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem<T>] {
        &self.items
    }

    /// Records `payload` on `layer`.
    #[inline]
    pub fn push(&mut self, layer: impl Into<Layer>, payload: T) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(layer.into(), order),
            payload,
        });

        self.sorted_dirty = true;
    }

    /// Iterates items in paint order (back-to-front).
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem<T>> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        let items = &self.items;
        self.sorted_indices
            .sort_unstable_by(|&a, &b| items[a].key.cmp(&items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint_order(list: &mut DrawList<&'static str>) -> Vec<&'static str> {
        list.iter_in_paint_order().map(|i| i.payload).collect()
    }

    #[test]
    fn paints_back_to_front() {
        let mut list = DrawList::new();
        list.push(0, "front");
        list.push(10, "back");
        list.push(3, "middle");
        assert_eq!(paint_order(&mut list), ["back", "middle", "front"]);
    }

    #[test]
    fn same_layer_keeps_insertion_order() {
        let mut list = DrawList::new();
        list.push(2, "a");
        list.push(2, "b");
        list.push(7, "bg");
        list.push(2, "c");
        assert_eq!(paint_order(&mut list), ["bg", "a", "b", "c"]);
    }

    #[test]
    fn clear_resets_order_and_items() {
        let mut list = DrawList::new();
        list.push(1, "x");
        let _ = paint_order(&mut list);
        list.clear();
        assert!(list.is_empty());
        list.push(Layer(4), "y");
        assert_eq!(list.items()[0].key, SortKey::new(Layer(4), 0));
        assert_eq!(paint_order(&mut list), ["y"]);
    }

    #[test]
    fn pushing_after_iteration_resorts() {
        let mut list = DrawList::new();
        list.push(1, "near");
        assert_eq!(paint_order(&mut list), ["near"]);
        list.push(9, "far");
        assert_eq!(list.len(), 2);
        assert_eq!(paint_order(&mut list), ["far", "near"]);
    }
}
