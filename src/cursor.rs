use std::sync::Arc;

/// A key-value pair copied out of the list.
///
/// Values are shared with the list through an [`Arc`], so materializing a
/// result never clones the value itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<K, V> {
    key: K,
    value: Arc<V>,
    height: usize,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: Arc<V>, height: usize) -> Self {
        Self { key, value, height }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// A shared handle to the value.
    pub fn value_arc(&self) -> &Arc<V> {
        &self.value
    }

    /// Number of levels the node was linked into.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn into_parts(self) -> (K, Arc<V>) {
        (self.key, self.value)
    }
}

/// A forward-only cursor over the result of a range operation.
///
/// The result is collected eagerly while the list is locked; the cursor
/// itself holds no lock and never observes later changes. A fresh cursor is
/// positioned before the first entry, so [`Cursor::advance`] must be called
/// before [`Cursor::key`] or [`Cursor::value`] return anything.
///
/// ```
/// use fingerskip::SkipList;
///
/// let list = SkipList::new(fingerskip::Ascending);
/// list.insert(1, "a").unwrap();
/// list.insert(2, "b").unwrap();
///
/// let mut cursor = list.select_range(&1, &2).unwrap();
/// assert_eq!(cursor.count(), 2);
/// while cursor.advance() {
///     println!("{:?} => {:?}", cursor.key(), cursor.value());
/// }
/// assert_eq!(cursor.key(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<K, V> {
    entries: Vec<Entry<K, V>>,
    /// `0` is before the first entry, `i` means `entries[i - 1]` is current.
    position: usize,
}

impl<K, V> Cursor<K, V> {
    pub(crate) fn new(entries: Vec<Entry<K, V>>) -> Self {
        Self {
            entries,
            position: 0,
        }
    }

    /// Moves to the next entry and reports whether one exists.
    pub fn advance(&mut self) -> bool {
        if self.position <= self.entries.len() {
            self.position += 1;
        }
        self.position <= self.entries.len()
    }

    pub fn current(&self) -> Option<&Entry<K, V>> {
        self.entries.get(self.position.checked_sub(1)?)
    }

    pub fn key(&self) -> Option<&K> {
        self.current().map(Entry::key)
    }

    pub fn value(&self) -> Option<&V> {
        self.current().map(Entry::value)
    }

    /// Moves back to before the first entry.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Total number of entries, independent of the current position.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }
}

impl<K, V> IntoIterator for Cursor<K, V> {
    type Item = Entry<K, V>;
    type IntoIter = std::vec::IntoIter<Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
