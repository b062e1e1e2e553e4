//! Fibonacci heap addressed by element identity
//!
//! [`IndexedFibonacciHeap`] wraps a [`FibonacciHeap`] with an index from an
//! identity derived from each value to the value's handle. Callers that
//! already have a stable name for their elements (a vertex id, a string key)
//! can then decrease keys and delete by that name without tracking handles.
//!
//! The identity is computed once, when the value is pushed, by the identity
//! function the heap was built with, and is remembered per element. Mutating
//! a value after pushing it (through `Cell`, `RefCell` and the like) never
//! changes the identity it is indexed or removed under.
//!
//! # Example
//!
//! ```rust
//! use fibheap_index::IndexedFibonacciHeap;
//!
//! // Index vertices by name.
//! let mut heap = IndexedFibonacciHeap::new(|v: &&str| v.to_string());
//! heap.push(10, "A").unwrap();
//! heap.push(5, "B").unwrap();
//! heap.push(7, "C").unwrap();
//!
//! heap.decrease_key(&"C".to_string(), 1).unwrap();
//! assert_eq!(heap.pop(), Ok((1, "C")));
//! assert!(!heap.contains(&"C".to_string()));
//! ```

use crate::arena::Handle;
use crate::compare::{Comparator, Natural};
use crate::error::{HeapError, InvariantViolation, Result};
use crate::fibonacci::FibonacciHeap;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// Fibonacci heap with an identity index
///
/// - `K`: the priority key
/// - `V`: the element stored in the heap
/// - `I`: the identity type, produced from a `&V` by `F`
/// - `C`: the key [`Comparator`]
pub struct IndexedFibonacciHeap<K, V, I, F, C = Natural> {
    heap: FibonacciHeap<K, V, C>,
    index: FxHashMap<I, Handle>,
    /// Identity each live element was registered under
    registered: FxHashMap<Handle, I>,
    identify: F,
}

impl<K: Ord, V, I, F> IndexedFibonacciHeap<K, V, I, F>
where
    I: Hash + Eq + Clone,
    F: Fn(&V) -> I,
{
    /// Creates an empty min-heap that indexes values by `identify`
    pub fn new(identify: F) -> Self {
        Self::with_comparator(identify, Natural)
    }
}

impl<K, V, I, F, C> IndexedFibonacciHeap<K, V, I, F, C>
where
    I: Hash + Eq + Clone,
    F: Fn(&V) -> I,
    C: Comparator<K>,
{
    /// Creates an empty heap that indexes values by `identify` and orders
    /// keys by `cmp`
    pub fn with_comparator(identify: F, cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, identify, cmp)
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity_and_comparator(capacity: usize, identify: F, cmp: C) -> Self {
        Self {
            heap: FibonacciHeap::with_capacity_and_comparator(capacity, cmp),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            registered: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            identify,
        }
    }

    /// Returns the underlying handle-based heap
    pub fn heap(&self) -> &FibonacciHeap<K, V, C> {
        &self.heap
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
        self.registered.clear();
    }

    /// Inserts `value` with priority `key`
    ///
    /// # Errors
    /// [`HeapError::DuplicateIdentity`] if a value with the same identity is
    /// already in the heap. The heap is left unchanged.
    pub fn push(&mut self, key: K, value: V) -> Result<Handle> {
        let id = (self.identify)(&value);
        if self.index.contains_key(&id) {
            return Err(HeapError::DuplicateIdentity);
        }
        let handle = self.heap.push(key, value);
        self.index.insert(id.clone(), handle);
        self.registered.insert(handle, id);
        Ok(handle)
    }

    /// Returns the minimum key and its value
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap has no elements.
    pub fn peek(&self) -> Result<(&K, &V)> {
        self.heap.peek()
    }

    /// Removes and returns the minimum key and its value
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap has no elements.
    pub fn pop(&mut self) -> Result<(K, V)> {
        let handle = self.heap.peek_handle().ok_or(HeapError::Empty)?;
        let entry = self.heap.pop()?;
        self.deregister(handle);
        Ok(entry)
    }

    /// Lowers the key of the element with identity `id`
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if no element has identity `id`
    /// - [`HeapError::InvalidKeyOrder`] if `new_key` is greater than the
    ///   current key
    pub fn decrease_key(&mut self, id: &I, new_key: K) -> Result<()> {
        let handle = self.handle_of(id)?;
        self.heap.decrease_key(handle, new_key)
    }

    /// Removes the element with identity `id`, returning its key and value
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if no element has identity `id`.
    pub fn delete(&mut self, id: &I) -> Result<(K, V)> {
        let handle = self.handle_of(id)?;
        let entry = self.heap.delete(handle)?;
        self.deregister(handle);
        Ok(entry)
    }

    fn deregister(&mut self, handle: Handle) {
        if let Some(id) = self.registered.remove(&handle) {
            self.index.remove(&id);
        }
    }

    /// Returns true if an element with identity `id` is in the heap
    pub fn contains(&self, id: &I) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the key of the element with identity `id`
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if no element has identity `id`.
    pub fn get_key(&self, id: &I) -> Result<&K> {
        let handle = self.handle_of(id)?;
        self.heap.key(handle).ok_or(HeapError::NotFound)
    }

    /// Returns the value with identity `id`
    pub fn get(&self, id: &I) -> Option<&V> {
        self.index.get(id).and_then(|&h| self.heap.value(h))
    }

    /// Returns the handle of the element with identity `id`
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if no element has identity `id`.
    pub fn handle_of(&self, id: &I) -> Result<Handle> {
        self.index.get(id).copied().ok_or(HeapError::NotFound)
    }

    /// Moves every element of `other` into this heap, index entries included
    ///
    /// The heaps themselves merge in O(1); the two indexes are combined by
    /// inserting the smaller into the larger.
    ///
    /// # Errors
    /// [`HeapError::DuplicateIdentity`] if an identity is present in both
    /// heaps. Neither heap is changed; `other` is handed back alongside the
    /// error.
    pub fn merge(&mut self, mut other: Self) -> std::result::Result<(), (HeapError, Self)> {
        let (small, large) = if other.index.len() <= self.index.len() {
            (&other.index, &self.index)
        } else {
            (&self.index, &other.index)
        };
        if small.keys().any(|id| large.contains_key(id)) {
            return Err((HeapError::DuplicateIdentity, other));
        }

        self.heap.merge(other.heap);
        if other.index.len() > self.index.len() {
            std::mem::swap(&mut self.index, &mut other.index);
            std::mem::swap(&mut self.registered, &mut other.registered);
        }
        self.index.extend(other.index);
        self.registered.extend(other.registered);
        Ok(())
    }

    /// Combines two heaps into one, see [`merge`](Self::merge)
    ///
    /// # Errors
    /// [`HeapError::DuplicateIdentity`] if an identity is present in both
    /// heaps.
    pub fn union(mut a: Self, b: Self) -> Result<Self> {
        a.merge(b).map_err(|(err, _)| err)?;
        Ok(a)
    }

    /// Pops every element, returning them in ascending key order
    pub fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.len());
        while let Ok(entry) = self.pop() {
            out.push(entry);
        }
        out
    }

    /// Checks the heap's structural invariants and that the index holds
    /// exactly one entry per element, under the identity it was pushed with
    ///
    /// # Errors
    /// The first [`InvariantViolation`] found.
    pub fn validate(&self) -> std::result::Result<(), InvariantViolation> {
        self.heap.validate()?;
        if self.index.len() != self.heap.len() || self.registered.len() != self.heap.len() {
            return Err(InvariantViolation::Index(format!(
                "{} index entries and {} registrations for {} elements",
                self.index.len(),
                self.registered.len(),
                self.heap.len()
            )));
        }
        for (id, &handle) in &self.index {
            if !self.heap.contains(handle) {
                return Err(InvariantViolation::Index(format!(
                    "entry points at dead handle {:?}",
                    handle
                )));
            }
            if self.registered.get(&handle) != Some(id) {
                return Err(InvariantViolation::Index(format!(
                    "element {:?} is indexed under a different identity",
                    handle
                )));
            }
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, I, F, C: Comparator<K>> fmt::Debug
    for IndexedFibonacciHeap<K, V, I, F, C>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedFibonacciHeap")
            .field("len", &self.heap.len())
            .field("min", &self.heap.peek().ok())
            .finish()
    }
}
