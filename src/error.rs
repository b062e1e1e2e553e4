//! Error types for heap operations
//!
//! Every fallible operation reports its failure before touching the heap
//! structure, so an `Err` always leaves the heap exactly as it was.

/// Error type for heap operations
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `peek` or `pop` on a heap with no elements
    #[error("heap is empty")]
    Empty,

    /// `decrease_key` was given a key greater than the current one
    #[error("new key is greater than the current key")]
    InvalidKeyOrder,

    /// The handle or identity does not refer to an element of this heap
    #[error("element not found in heap")]
    NotFound,

    /// An element with the same identity is already in the heap
    #[error("an element with the same identity is already in the heap")]
    DuplicateIdentity,
}

/// Result type for heap operations
pub type Result<T> = std::result::Result<T, HeapError>;

/// A broken structural invariant, reported by `validate`
///
/// Seeing one of these means a bug in the heap itself, never in caller code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("sibling ring is not a valid doubly-linked cycle at {0}")]
    BrokenRing(String),

    #[error("child {child} has a smaller key than its parent {parent}")]
    HeapOrder { parent: String, child: String },

    #[error("node {node} records degree {recorded} but has {actual} children")]
    Degree {
        node: String,
        recorded: usize,
        actual: usize,
    },

    #[error("root {0} is marked")]
    MarkedRoot(String),

    #[error("node {0} has the wrong parent link")]
    ParentLink(String),

    #[error("min does not reference the minimum root")]
    Min,

    #[error("heap reports {reported} elements but {reachable} are reachable")]
    Count { reported: usize, reachable: usize },

    #[error("node {node} has degree {degree}, above the bound {bound} for {len} elements")]
    DegreeBound {
        node: String,
        degree: usize,
        bound: usize,
        len: usize,
    },

    #[error("identity index is out of sync with the heap: {0}")]
    Index(String),
}
