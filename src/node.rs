use std::sync::Arc;

use crate::arena::NodeId;
use crate::cursor::Entry;

/// A link to the next node at some level, or `None` past the end.
pub(crate) type Link = Option<NodeId>;

/// A node in the skiplist.
///
/// The forward array is sized at creation and never changes, so a node
/// linked at level `l` is always linked at every level below it.
/// `forward[0]` is the lowest level.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    key: K,
    value: Arc<V>,
    forward: Box<[Link]>,
}

impl<K, V> Node<K, V> {
    /// Creates an unlinked node with `height` levels.
    ///
    /// # Panics
    /// - if `height` is zero.
    pub(crate) fn new(key: K, value: Arc<V>, height: usize) -> Self {
        assert!(height > 0, "node height must be at least 1");
        Self {
            key,
            value,
            forward: vec![None; height].into_boxed_slice(),
        }
    }

    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }

    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn value(&self) -> &Arc<V> {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: Arc<V>) {
        self.value = value;
    }

    /// Successor on the base level.
    pub(crate) fn next(&self) -> Link {
        self.next_at(0)
    }

    /// Successor at `level`, or `None` when the node does not reach that level.
    pub(crate) fn next_at(&self, level: usize) -> Link {
        self.forward.get(level).copied().flatten()
    }

    /// # Panics
    /// - if `level` is not below the node's height.
    pub(crate) fn set_next_at(&mut self, level: usize, link: Link) {
        assert!(
            level < self.forward.len(),
            "level {} out of range for node of height {}",
            level,
            self.forward.len()
        );
        self.forward[level] = link;
    }

    pub(crate) fn into_entry(self) -> Entry<K, V> {
        let height = self.height();
        Entry::new(self.key, self.value, height)
    }
}

impl<K: Clone, V> Node<K, V> {
    pub(crate) fn to_entry(&self) -> Entry<K, V> {
        Entry::new(self.key().clone(), Arc::clone(self.value()), self.height())
    }
}
