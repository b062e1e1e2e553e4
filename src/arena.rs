//! Node storage and circular sibling rings
//!
//! Heap nodes live in slotmaps and refer to each other by [`Handle`] instead
//! of by pointer. Every list in a Fibonacci heap (the root list and each
//! node's child list) is a circular doubly-linked ring threaded through the
//! nodes' `left`/`right` handles:
//!
//! - A single node forms a ring by pointing at itself
//! - There is no head or tail; any member is an entry point
//! - Splicing two rings, inserting and removing are all O(1)
//!
//! An arena is a set of segments. Each segment is one slotmap tagged with a
//! process-unique `SegmentId`, and a handle names both its segment and its
//! slot. New nodes always go into the arena's home segment. Absorbing another
//! arena moves its segments over whole, so no node is touched and every
//! handle the other arena issued keeps resolving.
//!
//! Handles are generation-checked: once a node is removed its handle never
//! resolves again, even if the slot is reused. A handle issued by a different
//! heap names a segment this arena does not own and never resolves either.

use crate::rank::Degree;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Slot of a node inside one segment
    pub(crate) struct Slot;
}

/// Process-unique tag of one node segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SegmentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to an element in a Fibonacci heap
///
/// Returned by `push` and accepted by `decrease_key`, `delete` and the lookup
/// methods. A handle stays valid until its element is popped or deleted,
/// including across a merge into another heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
    segment: SegmentId,
    slot: Slot,
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<Handle>,
    pub(crate) child: Option<Handle>,
    pub(crate) left: Handle,
    pub(crate) right: Handle,
    pub(crate) degree: Degree,
    pub(crate) marked: bool,
}

type Segment<K, V> = SlotMap<Slot, Node<K, V>>;

/// Owner of every node of one heap
pub(crate) struct Arena<K, V> {
    home_id: SegmentId,
    home: Segment<K, V>,
    /// Non-empty segments taken over from merged heaps
    absorbed: FxHashMap<SegmentId, Segment<K, V>>,
    len: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            home_id: SegmentId::fresh(),
            home: SlotMap::with_capacity_and_key(capacity),
            absorbed: FxHashMap::default(),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of segments currently holding nodes, the home segment included
    pub(crate) fn segments(&self) -> usize {
        1 + self.absorbed.len()
    }

    #[inline]
    fn segment(&self, id: SegmentId) -> Option<&Segment<K, V>> {
        if id == self.home_id {
            Some(&self.home)
        } else {
            self.absorbed.get(&id)
        }
    }

    #[inline]
    fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment<K, V>> {
        if id == self.home_id {
            Some(&mut self.home)
        } else {
            self.absorbed.get_mut(&id)
        }
    }

    #[inline]
    pub(crate) fn contains(&self, h: Handle) -> bool {
        self.get(h).is_some()
    }

    #[inline]
    pub(crate) fn get(&self, h: Handle) -> Option<&Node<K, V>> {
        self.segment(h.segment)?.get(h.slot)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, h: Handle) -> Option<&mut Node<K, V>> {
        self.segment_mut(h.segment)?.get_mut(h.slot)
    }

    pub(crate) fn clear(&mut self) {
        self.home.clear();
        self.absorbed.clear();
        self.len = 0;
    }

    /// Allocates a node in the home segment that forms a ring on its own.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> Handle {
        let segment = self.home_id;
        let slot = self.home.insert_with_key(|slot| {
            let h = Handle { segment, slot };
            Node {
                key,
                value,
                parent: None,
                child: None,
                left: h,
                right: h,
                degree: 0,
                marked: false,
            }
        });
        self.len += 1;
        Handle { segment, slot }
    }

    /// Frees a live node. The node must already be unlinked from every ring.
    pub(crate) fn free(&mut self, h: Handle) -> (K, V) {
        let segment = self
            .segment_mut(h.segment)
            .expect("freed a handle of a foreign segment");
        let node = segment.remove(h.slot).expect("freed a handle that is not live");
        let emptied = segment.is_empty();
        if emptied && h.segment != self.home_id {
            self.absorbed.remove(&h.segment);
        }
        self.len -= 1;
        (node.key, node.value)
    }

    /// Makes `h` a ring of one.
    #[inline]
    pub(crate) fn make_singleton(&mut self, h: Handle) {
        let node = &mut self[h];
        node.left = h;
        node.right = h;
    }

    /// Inserts the singleton `new` before `at` in `at`'s ring.
    pub(crate) fn insert_before(&mut self, at: Handle, new: Handle) {
        debug_assert!(self[new].left == new && self[new].right == new);
        let prev = self[at].left;
        self[new].right = at;
        self[new].left = prev;
        self[prev].right = new;
        self[at].left = new;
    }

    /// Unlinks `h` from its ring and leaves it as a singleton.
    ///
    /// Returns a surviving neighbour, or `None` if `h` was alone.
    pub(crate) fn unlink(&mut self, h: Handle) -> Option<Handle> {
        let (left, right) = (self[h].left, self[h].right);
        if right == h {
            return None;
        }
        self[left].right = right;
        self[right].left = left;
        self.make_singleton(h);
        Some(right)
    }

    /// Joins the rings containing `a` and `b` into one ring.
    ///
    /// ```text
    /// before:  .. a_prev <-> a ..      .. b_prev <-> b ..
    /// after:   .. a_prev <-> b .. b_prev <-> a ..
    /// ```
    pub(crate) fn splice(&mut self, a: Handle, b: Handle) {
        let a_prev = self[a].left;
        let b_prev = self[b].left;
        self[a_prev].right = b;
        self[b].left = a_prev;
        self[b_prev].right = a;
        self[a].left = b_prev;
    }

    /// Collects the members of the ring containing `start`, beginning there.
    pub(crate) fn ring(&self, start: Handle) -> Vec<Handle> {
        let mut members = vec![start];
        let mut current = self[start].right;
        while current != start {
            members.push(current);
            current = self[current].right;
        }
        members
    }

    /// Takes ownership of every segment of `other`.
    ///
    /// Nodes stay in their slots, so all of `other`'s handles remain valid
    /// here. Costs O(min(segments)) and never depends on the node count.
    pub(crate) fn absorb(&mut self, other: Arena<K, V>) {
        let Arena {
            home_id,
            home,
            mut absorbed,
            len,
        } = other;
        if absorbed.len() > self.absorbed.len() {
            std::mem::swap(&mut self.absorbed, &mut absorbed);
        }
        self.absorbed.extend(absorbed);
        if !home.is_empty() {
            self.absorbed.insert(home_id, home);
        }
        self.len += len;
        log::debug!(
            "absorbed {} nodes, arena now spans {} segments",
            len,
            self.segments()
        );
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Handle, &Node<K, V>)> {
        let home_id = self.home_id;
        let home = self
            .home
            .iter()
            .map(move |(slot, node)| (Handle { segment: home_id, slot }, node));
        let absorbed = self.absorbed.iter().flat_map(|(&segment, nodes)| {
            nodes
                .iter()
                .map(move |(slot, node)| (Handle { segment, slot }, node))
        });
        home.chain(absorbed)
    }
}

impl<K, V> std::ops::Index<Handle> for Arena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, h: Handle) -> &Node<K, V> {
        self.get(h).expect("handle does not resolve in this arena")
    }
}

impl<K, V> std::ops::IndexMut<Handle> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, h: Handle) -> &mut Node<K, V> {
        self.get_mut(h).expect("handle does not resolve in this arena")
    }
}
