//! Slab storage for skiplist nodes.
//!
//! Nodes are addressed by a [`NodeId`], an index into the slab. Links between
//! nodes are plain ids, so the level structure never needs shared or cyclic
//! ownership: the arena owns every node, and at each level a predecessor's
//! link slot is the only reference to its successor.
//!
//! Unlike a bump allocator, deleted nodes hand their slot back to a free list
//! and the next allocation reuses it. Ids of freed nodes must therefore not be
//! kept around; the skiplist rewrites its finger caches on every delete for
//! exactly that reason.
//!
//! The arena also holds the link array of the head sentinel. Positions during
//! a traversal are expressed as [`Pos`], which is either the head or a live
//! node, so the search code does not need a dummy key for the head.

use std::ops::{Index, IndexMut};

use derive_more::{Display, From, Into};

use crate::node::{Link, Node};

/// Stable index of a node inside the [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[display("#{_0}")]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A traversal position: the head sentinel or a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pos {
    Head,
    Node(NodeId),
}

#[derive(Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<u32> },
}

#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    /// Head of the free list threaded through vacant slots.
    free: Option<u32>,
    len: usize,
    /// Forward links of the head sentinel, one per configured level.
    head: Vec<Link>,
}

impl<K, V> Arena<K, V> {
    /// The maximum number of slots; ids are 32 bit.
    pub(crate) const MAX_SLOTS: usize = u32::MAX as usize;

    /// Creates an empty arena whose head sentinel has `levels` links.
    ///
    /// # Panics
    /// - if `levels` is zero.
    pub(crate) fn new(levels: usize) -> Self {
        assert!(levels > 0, "head must have at least one level");
        Self {
            slots: Vec::new(),
            free: None,
            len: 0,
            head: vec![None; levels],
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of levels the head sentinel can link.
    pub(crate) fn levels(&self) -> usize {
        self.head.len()
    }

    /// Grows the head sentinel to `levels` links. Never shrinks it.
    pub(crate) fn reserve_levels(&mut self, levels: usize) {
        if levels > self.head.len() {
            self.head.resize(levels, None);
        }
    }

    /// Stores `node` and returns its id, reusing a freed slot if one exists.
    ///
    /// # Panics
    /// - if the arena already holds [`Self::MAX_SLOTS`] slots.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free {
            let slot = &mut self.slots[index as usize];
            match slot {
                Slot::Vacant { next_free } => self.free = *next_free,
                Slot::Occupied(_) => unreachable!("free list points at occupied slot {}", index),
            }
            *slot = Slot::Occupied(node);
            return NodeId(index);
        }

        assert!(
            self.slots.len() < Self::MAX_SLOTS,
            "arena is full ({} slots)",
            Self::MAX_SLOTS
        );
        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied(node));
        NodeId(index)
    }

    /// Removes the node at `id` and returns it, or `None` if the slot is vacant.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let slot = self.slots.get_mut(id.index())?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let taken = std::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(id.0);
        self.len -= 1;
        match taken {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        match self.slots.get(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    /// The successor of `pos` at `level`.
    pub(crate) fn next(&self, pos: Pos, level: usize) -> Link {
        match pos {
            Pos::Head => self.head.get(level).copied().flatten(),
            Pos::Node(id) => self[id].next_at(level),
        }
    }

    /// Points `pos` at `link` on `level`.
    pub(crate) fn set_next(&mut self, pos: Pos, level: usize, link: Link) {
        match pos {
            Pos::Head => self.head[level] = link,
            Pos::Node(id) => self[id].set_next_at(level, link),
        }
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    /// # Panics
    /// - if `id` does not name a live node.
    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id)
            .unwrap_or_else(|| panic!("node {} is not live", id))
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("node {} is not live", id))
    }
}
