//! Key ordering for heaps
//!
//! A heap is parameterised by a [`Comparator`] chosen when it is built. The
//! comparator is part of the heap's type, so two heaps can only be merged when
//! they order keys the same way.
//!
//! - [`Natural`]: ascending `Ord` order (a min-heap), the default
//! - [`Reversed`]: descending `Ord` order (a max-heap)
//! - any `Fn(&K, &K) -> Ordering` closure or function
//!
//! # Example
//!
//! ```rust
//! use fibheap_index::FibonacciHeap;
//!
//! // Order (distance, hops) pairs by distance only.
//! let by_distance = |a: &(u32, u32), b: &(u32, u32)| a.0.cmp(&b.0);
//! let mut heap = FibonacciHeap::with_comparator(by_distance);
//! heap.push((7, 1), "far");
//! heap.push((2, 9), "near");
//! assert_eq!(heap.peek().map(|(_, v)| *v), Ok("near"));
//! ```

use std::cmp::Ordering;

/// A total order over heap keys
///
/// The heap keeps the key that compares `Less` than all others at its top.
pub trait Comparator<K: ?Sized> {
    /// Compares two keys
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Returns true if `a` sorts strictly before `b`
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Orders keys by their `Ord` implementation, smallest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by their `Ord` implementation, largest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed;

impl<K: Ord + ?Sized> Comparator<K> for Reversed {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
