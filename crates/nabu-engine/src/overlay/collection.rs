use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Ordered overlay items with an optional draw limit.
///
/// Only the first `size()` items are drawn. Hit testing still searches the
/// whole list.
#[derive(Debug, Clone)]
pub struct ItemCollection<T> {
    items: Vec<T>,
    draw_limit: usize,
    drawable: usize,
}

impl<T> Default for ItemCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemCollection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            draw_limit: usize::MAX,
            drawable: 0,
        }
    }

    pub fn from_items(items: Vec<T>) -> Self {
        let mut c = Self {
            items,
            draw_limit: usize::MAX,
            drawable: 0,
        };
        c.refresh();
        c
    }

    /// Appends `item`. Always succeeds.
    pub fn add(&mut self, item: T) -> bool {
        self.items.push(item);
        self.refresh();
        true
    }

    /// Inserts `item` at `index` (clamped to `len()`).
    pub fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.refresh();
    }

    /// Appends all `items`; returns whether anything was added.
    pub fn add_all<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.items.len();
        self.items.extend(items);
        self.refresh();
        self.items.len() > before
    }

    /// Removes the first item equal to `item`.
    pub fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let Some(index) = self.items.iter().position(|i| i == item) else {
            return false;
        };
        self.items.remove(index);
        self.refresh();
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.refresh();
        Some(item)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.refresh();
    }

    pub fn set_draw_limit(&mut self, limit: usize) {
        self.draw_limit = limit;
        self.refresh();
    }

    #[inline]
    pub fn draw_limit(&self) -> usize {
        self.draw_limit
    }

    /// Number of drawable items: `min(len(), draw_limit())`.
    #[inline]
    pub fn size(&self) -> usize {
        self.drawable
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Items that should be drawn this frame.
    #[inline]
    pub fn drawable(&self) -> &[T] {
        &self.items[..self.drawable]
    }

    fn refresh(&mut self) {
        self.drawable = self.items.len().min(self.draw_limit);
    }
}

impl<'a, T> IntoIterator for &'a ItemCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [`ItemCollection`] shared between the input and render threads.
///
/// Readers (hit testing, drawing) take the read lock; mutations the write lock.
#[derive(Debug)]
pub struct SharedItemCollection<T> {
    inner: Arc<RwLock<ItemCollection<T>>>,
}

impl<T> Clone for SharedItemCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SharedItemCollection<T> {
    fn default() -> Self {
        Self::new(ItemCollection::new())
    }
}

impl<T> SharedItemCollection<T> {
    pub fn new(collection: ItemCollection<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collection)),
        }
    }

    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, ItemCollection<T>> {
        self.inner.read()
    }

    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, ItemCollection<T>> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: u32) -> ItemCollection<u32> {
        ItemCollection::from_items((0..n).collect())
    }

    // ── draw limit ────────────────────────────────────────────────────────

    #[test]
    fn unlimited_by_default() {
        let c = numbers(10);
        assert_eq!(c.draw_limit(), usize::MAX);
        assert_eq!(c.size(), 10);
    }

    #[test]
    fn size_is_capped_by_draw_limit() {
        let mut c = numbers(10);
        c.set_draw_limit(3);
        assert_eq!(c.size(), 3);
        assert_eq!(c.drawable(), &[0, 1, 2]);

        c.add(10);
        assert_eq!(c.size(), 3);
        assert_eq!(c.len(), 11);

        c.set_draw_limit(20);
        assert_eq!(c.size(), 11);
    }

    #[test]
    fn size_shrinks_below_limit_on_removal() {
        let mut c = numbers(4);
        c.set_draw_limit(3);
        c.remove_at(0);
        c.remove_at(0);
        assert_eq!(c.size(), 2);
    }

    // ── mutations ─────────────────────────────────────────────────────────

    #[test]
    fn add_all_reports_whether_anything_changed() {
        let mut c = numbers(2);
        assert!(c.add_all([7, 8]));
        assert!(!c.add_all(Vec::new()));
        assert_eq!(c.as_slice(), &[0, 1, 7, 8]);
        assert_eq!(c.size(), 4);
    }

    #[test]
    fn insert_recomputes_size_and_clamps_index() {
        let mut c = numbers(2);
        c.insert(0, 42);
        c.insert(99, 43);
        assert_eq!(c.as_slice(), &[42, 0, 1, 43]);
        assert_eq!(c.size(), 4);
    }

    #[test]
    fn remove_by_value_and_index() {
        let mut c = numbers(5);
        assert!(c.remove(&3));
        assert!(!c.remove(&3));
        assert_eq!(c.remove_at(0), Some(0));
        assert_eq!(c.remove_at(10), None);
        assert_eq!(c.as_slice(), &[1, 2, 4]);
        assert_eq!(c.size(), 3);
    }

    #[test]
    fn clear_empties_drawables() {
        let mut c = numbers(5);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.size(), 0);
        assert!(c.drawable().is_empty());
    }

    // ── sharing ───────────────────────────────────────────────────────────

    #[test]
    fn shared_clones_see_writes() {
        let shared = SharedItemCollection::new(numbers(1));
        let other = shared.clone();

        other.write().add(5);
        assert_eq!(shared.read().as_slice(), &[0, 5]);
        assert_eq!(shared.read().size(), 2);
    }
}
