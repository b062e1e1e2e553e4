//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a priority queue with:
//! - O(1) amortized push, decrease_key and peek
//! - O(log n) amortized pop and delete
//!
//! The structure is a collection of heap-ordered trees whose roots are linked
//! in a circular doubly linked list, the root list. The heap keeps a handle to
//! the minimum root. Work is deferred: `push` and `decrease_key` only add roots,
//! and `pop` pays for it by consolidating the root list so that at most one
//! tree of each degree survives.
//!
//! Decrease-key keeps trees bushy with marks: a non-root node that loses a
//! child is marked, and a marked node that loses a second child is cut to the
//! root list itself (a cascading cut). This caps a degree-`d` node's subtree
//! at no fewer than `F(d + 2)` nodes, which is where the heap gets its name.
//!
//! # Example
//!
//! ```rust
//! use fibheap_index::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let a = heap.push(10, "a");
//! heap.push(5, "b");
//! heap.push(7, "c");
//! assert_eq!(heap.peek(), Ok((&5, &"b")));
//!
//! heap.decrease_key(a, 1).unwrap();
//! assert_eq!(heap.pop(), Ok((1, "a")));
//! assert_eq!(heap.pop(), Ok((5, "b")));
//! ```

use crate::arena::{Arena, Handle};
use crate::compare::{Comparator, Natural};
use crate::error::{HeapError, Result};
use crate::rank::{checked_increment, max_degree, saturating_decrement};
use std::cmp::Ordering;
use std::fmt;

/// Fibonacci Heap
///
/// `K` is the key the heap orders by, `V` the payload carried with it and `C`
/// the [`Comparator`] that orders keys. Keys and payloads are owned by the
/// heap; store references (`&T`) to have the heap borrow caller data instead.
pub struct FibonacciHeap<K, V, C = Natural> {
    pub(crate) arena: Arena<K, V>,
    pub(crate) min: Option<Handle>,
    cmp: C,
}

impl<K: Ord, V> FibonacciHeap<K, V> {
    /// Creates an empty min-heap ordered by `K: Ord`
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Creates an empty min-heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C: Comparator<K>> FibonacciHeap<K, V, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            arena: Arena::new(),
            min: None,
            cmp,
        }
    }

    /// Creates an empty heap ordered by `cmp` with room for `capacity` elements
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            min: None,
            cmp,
        }
    }

    /// Returns the comparator ordering this heap
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of elements in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if the heap is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.arena.clear();
        self.min = None;
    }

    /// Inserts `value` with priority `key`, returning its handle
    ///
    /// # Time Complexity
    /// O(1)
    pub fn push(&mut self, key: K, value: V) -> Handle {
        let h = self.arena.alloc(key, value);
        self.add_root(h);
        h
    }

    /// Returns the minimum key and its value
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap has no elements.
    pub fn peek(&self) -> Result<(&K, &V)> {
        let min = self.min.ok_or(HeapError::Empty)?;
        let node = &self.arena[min];
        Ok((&node.key, &node.value))
    }

    /// Returns the handle of the minimum element
    pub fn peek_handle(&self) -> Option<Handle> {
        self.min
    }

    /// Removes and returns the minimum key and its value
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap has no elements.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn pop(&mut self) -> Result<(K, V)> {
        let z = self.min.ok_or(HeapError::Empty)?;
        self.promote_children(z);
        let next = self.arena.unlink(z);
        let entry = self.arena.free(z);
        self.min = next;
        if next.is_some() {
            self.consolidate();
        }
        Ok(entry)
    }

    /// Lowers the key of the element behind `handle` to `new_key`
    ///
    /// An equal key is accepted and changes nothing.
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if `handle` is not live in this heap
    /// - [`HeapError::InvalidKeyOrder`] if `new_key` is greater than the
    ///   current key
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: Handle, new_key: K) -> Result<()> {
        let node = self.arena.get(handle).ok_or(HeapError::NotFound)?;
        match self.cmp.compare(&new_key, &node.key) {
            Ordering::Greater => return Err(HeapError::InvalidKeyOrder),
            Ordering::Equal => return Ok(()),
            Ordering::Less => {}
        }
        self.arena[handle].key = new_key;

        if let Some(parent) = self.arena[handle].parent {
            if self.less(handle, parent) {
                self.cut(handle, parent);
                self.cascading_cut(parent);
            }
        }
        if let Some(min) = self.min {
            if self.less(handle, min) {
                self.min = Some(handle);
            }
        }
        Ok(())
    }

    /// Removes the element behind `handle`, returning its key and value
    ///
    /// Behaves as if the key were lowered below every other key and then
    /// popped, without needing such a key to exist.
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if `handle` is not live in this heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: Handle) -> Result<(K, V)> {
        let parent = self.arena.get(handle).ok_or(HeapError::NotFound)?.parent;
        if let Some(parent) = parent {
            self.cut(handle, parent);
            self.cascading_cut(parent);
        }
        self.min = Some(handle);
        self.pop()
    }

    /// Returns true if `handle` refers to an element of this heap
    pub fn contains(&self, handle: Handle) -> bool {
        self.arena.contains(handle)
    }

    /// Returns the key and value behind `handle`
    pub fn get(&self, handle: Handle) -> Option<(&K, &V)> {
        self.arena.get(handle).map(|node| (&node.key, &node.value))
    }

    /// Returns the key behind `handle`
    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.arena.get(handle).map(|node| &node.key)
    }

    /// Returns the value behind `handle`
    pub fn value(&self, handle: Handle) -> Option<&V> {
        self.arena.get(handle).map(|node| &node.value)
    }

    /// Returns the value behind `handle` mutably. Keys cannot be changed this
    /// way; use [`decrease_key`](Self::decrease_key).
    pub fn value_mut(&mut self, handle: Handle) -> Option<&mut V> {
        self.arena.get_mut(handle).map(|node| &mut node.value)
    }

    /// Moves every element of `other` into this heap
    ///
    /// The root lists are spliced together; consolidation is left to the
    /// next `pop`. Nodes are not moved, so handles issued by either heap stay
    /// valid in the merged heap.
    ///
    /// # Time Complexity
    /// O(1) in the number of elements. Taking over `other`'s storage costs
    /// O(min(s, t)) for heaps built from `s` and `t` earlier merges, which is
    /// O(1) whenever either side has never absorbed another heap.
    pub fn merge(&mut self, other: Self) {
        let other_min = other.min;
        self.arena.absorb(other.arena);
        if let Some(other_min) = other_min {
            match self.min {
                None => self.min = Some(other_min),
                Some(min) => {
                    self.arena.splice(min, other_min);
                    if self.less(other_min, min) {
                        self.min = Some(other_min);
                    }
                }
            }
        }
    }

    /// Combines two heaps into one, see [`merge`](Self::merge)
    pub fn union(mut a: Self, b: Self) -> Self {
        a.merge(b);
        a
    }

    /// Pops every element, returning them in ascending key order
    pub fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        self.drain_sorted().collect()
    }

    /// Returns an iterator that pops elements in ascending key order
    ///
    /// Elements the iterator has not yet yielded stay in the heap if it is
    /// dropped early.
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, K, V, C> {
        DrainSorted { heap: self }
    }

    #[inline]
    fn less(&self, a: Handle, b: Handle) -> bool {
        self.cmp.less(&self.arena[a].key, &self.arena[b].key)
    }

    /// Adds the unparented singleton `h` to the root list.
    fn add_root(&mut self, h: Handle) {
        match self.min {
            None => self.min = Some(h),
            Some(min) => {
                self.arena.insert_before(min, h);
                if self.less(h, min) {
                    self.min = Some(h);
                }
            }
        }
    }

    /// Moves every child of the root `z` into the root list.
    fn promote_children(&mut self, z: Handle) {
        let Some(child) = self.arena[z].child.take() else {
            return;
        };
        for c in self.arena.ring(child) {
            let node = &mut self.arena[c];
            node.parent = None;
            node.marked = false;
        }
        self.arena.splice(z, child);
        self.arena[z].degree = 0;
    }

    /// Links roots of equal degree until every degree occurs at most once,
    /// then rebuilds the root list and recomputes the minimum.
    fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        let roots = self.arena.ring(start);
        let before = roots.len();
        let mut table: Vec<Option<Handle>> = vec![None; max_degree(self.len()) + 1];

        for root in roots {
            let mut x = root;
            let mut d = self.arena[x].degree as usize;
            loop {
                if d >= table.len() {
                    table.resize(d + 1, None);
                }
                let Some(y) = table[d].take() else {
                    break;
                };
                // On equal keys the earlier occupant stays on top.
                let (small, large) = if self.less(x, y) { (x, y) } else { (y, x) };
                self.link(large, small);
                x = small;
                d = self.arena[x].degree as usize;
            }
            table[d] = Some(x);
        }

        self.min = None;
        let mut after = 0;
        for root in table.into_iter().flatten() {
            self.arena.make_singleton(root);
            self.add_root(root);
            after += 1;
        }
        log::trace!("consolidated {} roots into {}", before, after);
    }

    /// Makes the root `child` a child of the root `parent`.
    fn link(&mut self, child: Handle, parent: Handle) {
        self.arena.unlink(child);
        let node = &mut self.arena[child];
        node.parent = Some(parent);
        node.marked = false;
        match self.arena[parent].child {
            Some(first) => self.arena.insert_before(first, child),
            None => self.arena[parent].child = Some(child),
        }
        let node = &mut self.arena[parent];
        node.degree = checked_increment(node.degree);
    }

    /// Cuts `x` from its parent `parent` and makes it a root.
    fn cut(&mut self, x: Handle, parent: Handle) {
        let survivor = self.arena.unlink(x);
        let node = &mut self.arena[parent];
        if node.child == Some(x) {
            node.child = survivor;
        }
        node.degree = saturating_decrement(node.degree);

        let node = &mut self.arena[x];
        node.parent = None;
        node.marked = false;
        self.add_root(x);
    }

    /// Walks up from `y`, cutting marked ancestors until it reaches a root or
    /// an unmarked node, which it marks.
    fn cascading_cut(&mut self, mut y: Handle) {
        let mut cuts = 0usize;
        while let Some(parent) = self.arena[y].parent {
            if !self.arena[y].marked {
                self.arena[y].marked = true;
                break;
            }
            self.cut(y, parent);
            cuts += 1;
            y = parent;
        }
        if cuts > 0 {
            log::trace!("cascading cut promoted {} ancestors", cuts);
        }
    }
}

/// Iterator returned by [`FibonacciHeap::drain_sorted`]
pub struct DrainSorted<'a, K, V, C: Comparator<K>> {
    heap: &'a mut FibonacciHeap<K, V, C>,
}

impl<K, V, C: Comparator<K>> Iterator for DrainSorted<'_, K, V, C> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.heap.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<K, V, C: Comparator<K>> ExactSizeIterator for DrainSorted<'_, K, V, C> {}

impl<K, V, C: Comparator<K> + Default> Default for FibonacciHeap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for FibonacciHeap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.push(key, value);
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for FibonacciHeap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut heap = Self::default();
        heap.extend(iter);
        heap
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C: Comparator<K>> fmt::Debug for FibonacciHeap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len())
            .field("min", &self.peek().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Reversed;

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push(5, "a");
        heap.push(3, "b");
        heap.push(7, "c");

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Ok((&3, &"b")));

        assert_eq!(heap.pop(), Ok((3, "b")));
        assert_eq!(heap.peek(), Ok((&5, &"a")));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_empty_heap_errors() {
        let mut heap: FibonacciHeap<i32, ()> = FibonacciHeap::new();
        assert_eq!(heap.peek(), Err(HeapError::Empty));
        assert_eq!(heap.pop(), Err(HeapError::Empty));
        assert_eq!(heap.peek_handle(), None);
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = FibonacciHeap::new();
        heap.push(10, "a");
        let h2 = heap.push(20, "b");
        let h3 = heap.push(30, "c");

        heap.decrease_key(h2, 5).unwrap();
        assert_eq!(heap.peek(), Ok((&5, &"b")));

        heap.decrease_key(h3, 1).unwrap();
        assert_eq!(heap.peek(), Ok((&1, &"c")));
        assert_eq!(heap.peek_handle(), Some(h3));
    }

    #[test]
    fn test_decrease_key_equal_is_noop() {
        let mut heap = FibonacciHeap::new();
        let h = heap.push(4, "a");
        assert_eq!(heap.decrease_key(h, 4), Ok(()));
        assert_eq!(heap.key(h), Some(&4));
    }

    #[test]
    fn test_decrease_key_rejects_increase() {
        let mut heap = FibonacciHeap::new();
        let h = heap.push(4, "a");
        assert_eq!(heap.decrease_key(h, 9), Err(HeapError::InvalidKeyOrder));
        assert_eq!(heap.key(h), Some(&4));
    }

    #[test]
    fn test_stale_handle_not_found() {
        let mut heap = FibonacciHeap::new();
        let h = heap.push(1, "a");
        heap.pop().unwrap();
        assert!(!heap.contains(h));
        assert_eq!(heap.decrease_key(h, 0), Err(HeapError::NotFound));
        assert_eq!(heap.delete(h), Err(HeapError::NotFound));
        assert_eq!(heap.get(h), None);
    }

    #[test]
    fn test_decrease_key_inside_tree() {
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..16).map(|i| heap.push(i * 10, i)).collect();
        // Pop once to consolidate the remaining 15 into trees.
        assert_eq!(heap.pop(), Ok((0, 0)));

        let deep = handles
            .iter()
            .rev()
            .copied()
            .find(|&h| heap.arena.get(h).map_or(false, |n| n.parent.is_some()))
            .expect("15 nodes consolidate into trees with children");
        let value = *heap.value(deep).unwrap();
        heap.decrease_key(deep, -1).unwrap();
        assert!(heap.arena[deep].parent.is_none());
        assert_eq!(heap.peek(), Ok((&-1, &value)));
        heap.validate().unwrap();
    }

    #[test]
    fn test_cascading_cut_marks_then_cuts() {
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..9).map(|i| heap.push(i, i)).collect();
        heap.pop().unwrap();
        heap.validate().unwrap();

        // Find a non-root node with at least two children.
        let parent = handles[1..]
            .iter()
            .copied()
            .find(|&h| heap.arena[h].parent.is_some() && heap.arena[h].degree >= 2)
            .expect("consolidating 8 nodes builds a degree-3 tree");
        let first = heap.arena[parent].child.unwrap();
        let second = heap.arena[first].right;

        heap.decrease_key(first, -10).unwrap();
        assert!(heap.arena[parent].marked);
        assert!(heap.arena[parent].parent.is_some());

        heap.decrease_key(second, -20).unwrap();
        assert!(!heap.arena[parent].marked);
        assert!(heap.arena[parent].parent.is_none());
        heap.validate().unwrap();
    }

    #[test]
    fn test_delete() {
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..10).map(|i| heap.push(i, i)).collect();
        heap.pop().unwrap();

        assert_eq!(heap.delete(handles[5]), Ok((5, 5)));
        assert_eq!(heap.delete(handles[1]), Ok((1, 1)));
        assert_eq!(heap.len(), 7);
        assert!(!heap.contains(handles[5]));
        heap.validate().unwrap();

        let rest: Vec<_> = heap.into_sorted_vec().into_iter().map(|(k, _)| k).collect();
        assert_eq!(rest, vec![2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_merge() {
        let mut heap1 = FibonacciHeap::new();
        let a = heap1.push(5, "a");
        heap1.push(10, "b");

        let mut heap2 = FibonacciHeap::new();
        let c = heap2.push(3, "c");
        heap2.push(7, "d");

        heap1.merge(heap2);
        assert_eq!(heap1.peek(), Ok((&3, &"c")));
        assert_eq!(heap1.peek_handle(), Some(c));
        assert_eq!(heap1.len(), 4);
        assert_eq!(heap1.value(a), Some(&"a"));

        heap1.decrease_key(c, 1).unwrap();
        assert_eq!(heap1.pop(), Ok((1, "c")));
        heap1.validate().unwrap();
    }

    #[test]
    fn test_union_with_empty() {
        let empty = FibonacciHeap::new();
        let mut full = FibonacciHeap::new();
        let x = full.push(2, "x");

        let heap = FibonacciHeap::union(empty, full);
        assert_eq!(heap.peek(), Ok((&2, &"x")));
        assert!(heap.contains(x));
        assert_eq!(heap.arena.segments(), 2);
    }

    #[test]
    fn test_merge_does_not_touch_nodes() {
        let mut big = FibonacciHeap::new();
        for k in 0..1000 {
            big.push(k, ());
        }
        big.pop().unwrap();
        let mut small = FibonacciHeap::new();
        let handles: Vec<_> = (0..1000).map(|k| small.push(k + 5000, ())).collect();
        small.pop().unwrap();
        let before = crate::validate::snapshot(&small).1;

        // Absorbed nodes keep their handles, keys and tree links. Only the
        // root-list splice points change their sibling links.
        big.merge(small);
        let after = crate::validate::snapshot(&big).1;
        let mut resplit = 0;
        for old in &before {
            let new = after.iter().find(|n| n.0 == old.0).unwrap();
            assert_eq!((new.1, new.2, new.3, new.6, new.7), (old.1, old.2, old.3, old.6, old.7));
            if (new.4, new.5) != (old.4, old.5) {
                resplit += 1;
            }
        }
        assert!(resplit <= 2);
        assert_eq!(big.len(), 1998);
        assert_eq!(big.key(handles[999]), Some(&5999));
        big.validate().unwrap();
    }

    #[test]
    fn test_handles_survive_repeated_merges() {
        let mut parts: Vec<FibonacciHeap<i32, usize>> = Vec::new();
        let mut handles = Vec::new();
        for p in 0..6 {
            let mut heap = FibonacciHeap::new();
            for i in 0..5 {
                handles.push(heap.push(p * 10 + i, handles.len()));
            }
            heap.pop().unwrap();
            parts.push(heap);
        }
        // Pairwise merges so absorbed heaps already carry absorbed segments.
        while parts.len() > 1 {
            let b = parts.pop().unwrap();
            let a = parts.pop().unwrap();
            parts.insert(0, FibonacciHeap::union(a, b));
        }
        let mut heap = parts.pop().unwrap();
        heap.validate().unwrap();
        assert_eq!(heap.len(), 24);

        let live: Vec<_> = handles.iter().copied().filter(|&h| heap.contains(h)).collect();
        assert_eq!(live.len(), 24);
        for (i, &h) in live.iter().enumerate() {
            heap.decrease_key(h, -100 - i as i32).unwrap();
        }
        heap.validate().unwrap();
        let order: Vec<_> = heap.drain_sorted().map(|(k, _)| k).collect();
        assert_eq!(order, (0..24).map(|i| -123 + i).collect::<Vec<_>>());
        assert_eq!(heap.arena.segments(), 1);
    }

    #[test]
    fn test_foreign_handle_not_found() {
        let mut heap = FibonacciHeap::new();
        heap.push(1, "a");
        let mut other = FibonacciHeap::new();
        let foreign = other.push(0, "b");

        assert!(!heap.contains(foreign));
        assert_eq!(heap.decrease_key(foreign, -5), Err(HeapError::NotFound));
        assert_eq!(heap.delete(foreign), Err(HeapError::NotFound));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_reversed_comparator() {
        let mut heap = FibonacciHeap::with_comparator(Reversed);
        for k in [3, 9, 1, 7] {
            heap.push(k, ());
        }
        let h = heap.push(0, ());
        assert_eq!(heap.decrease_key(h, -1), Err(HeapError::InvalidKeyOrder));
        heap.decrease_key(h, 20).unwrap();
        let order: Vec<_> = heap.drain_sorted().map(|(k, _)| k).collect();
        assert_eq!(order, vec![20, 9, 7, 3, 1]);
    }

    #[test]
    fn test_from_iter_and_value_mut() {
        let mut heap: FibonacciHeap<u32, String> =
            [(3, "c".to_string()), (1, "a".to_string())].into_iter().collect();
        let h = heap.peek_handle().unwrap();
        heap.value_mut(h).unwrap().push('!');
        assert_eq!(heap.pop(), Ok((1, "a!".to_string())));
    }

    #[test]
    fn test_clear() {
        let mut heap = FibonacciHeap::new();
        let h = heap.push(1, ());
        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains(h));
        assert_eq!(heap.pop(), Err(HeapError::Empty));
    }

    #[test]
    fn test_drain_sorted_partial() {
        let mut heap: FibonacciHeap<i32, ()> = (0..5).rev().map(|k| (k, ())).collect();
        let first_two: Vec<_> = heap.drain_sorted().take(2).map(|(k, _)| k).collect();
        assert_eq!(first_two, vec![0, 1]);
        assert_eq!(heap.len(), 3);
    }
}
