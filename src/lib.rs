//! Fibonacci heap with decrease-key by handle or by identity
//!
//! This crate provides a Fibonacci heap, the priority queue behind the
//! textbook bounds of Dijkstra's shortest paths and Prim's minimum spanning
//! tree, in two flavours:
//!
//! - [`FibonacciHeap`]: `push` returns a [`Handle`] that the caller passes
//!   back to `decrease_key` and `delete`
//! - [`IndexedFibonacciHeap`]: elements are looked up by an identity derived
//!   from the value (a vertex id, a name), so callers need not keep handles
//!
//! # Complexity
//!
//! | operation      | cost             |
//! |----------------|------------------|
//! | `push`         | O(1)             |
//! | `peek`         | O(1)             |
//! | `pop`          | O(log n) amort.  |
//! | `decrease_key` | O(1) amort.      |
//! | `delete`       | O(log n) amort.  |
//! | `merge`        | O(1)             |
//!
//! # Memory model
//!
//! Nodes live in a generation-checked arena. Links between nodes are handles,
//! not pointers, so the heap contains no `unsafe` code, and a handle whose
//! element has been popped is reported as [`HeapError::NotFound`] rather than
//! dangling. Merging hands the absorbed heap's node storage over whole, so
//! handles from both heaps keep working afterwards.
//!
//! # Example
//!
//! ```rust
//! use fibheap_index::{FibonacciHeap, HeapError};
//!
//! let mut heap = FibonacciHeap::new();
//! let a = heap.push(10, 'A');
//! heap.push(5, 'B');
//! let c = heap.push(7, 'C');
//! assert_eq!(heap.peek(), Ok((&5, &'B')));
//!
//! heap.decrease_key(c, 1)?;
//! assert_eq!(heap.pop(), Ok((1, 'C')));
//! assert_eq!(heap.decrease_key(a, 20), Err(HeapError::InvalidKeyOrder));
//! # Ok::<(), HeapError>(())
//! ```

pub mod arena;
pub mod compare;
pub mod error;
pub mod fibonacci;
pub mod indexed;
pub mod rank;
mod validate;

pub use arena::Handle;
pub use compare::{Comparator, Natural, Reversed};
pub use error::{HeapError, InvariantViolation, Result};
pub use fibonacci::{DrainSorted, FibonacciHeap};
pub use indexed::IndexedFibonacciHeap;
