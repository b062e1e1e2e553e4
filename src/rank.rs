//! Node degree type and the Fibonacci degree bound.
//!
//! # Why u8?
//!
//! A node of degree `d` in a Fibonacci heap roots a subtree of at least
//! `F(d + 2)` nodes, where `F` is the Fibonacci sequence. `F(d + 2)` grows like
//! `φ^d`, so even a heap holding `usize::MAX` elements keeps every degree
//! below 93. A `u8` covers that with room to spare and keeps nodes small.
//!
//! # The bound
//!
//! [`max_degree`] returns the largest degree any node can reach in a heap of
//! `n` elements. Consolidation sizes its degree table from it, and
//! `validate` checks every node against it.

/// Type alias for node degree (number of children).
pub type Degree = u8;

/// Largest representable degree.
pub const MAX_DEGREE: Degree = u8::MAX;

/// Increments a degree, panicking on overflow.
///
/// # Panics
///
/// Panics if `degree == MAX_DEGREE`, which the degree bound rules out for
/// any heap that fits in memory.
///
/// # Example
///
/// ```rust
/// use fibheap_index::rank::{checked_increment, Degree};
///
/// let degree: Degree = 5;
/// assert_eq!(checked_increment(degree), 6);
/// ```
#[inline]
pub fn checked_increment(degree: Degree) -> Degree {
    degree
        .checked_add(1)
        .expect("degree overflow: degrees are bounded by log_phi(n)")
}

/// Decrements a degree, saturating at zero.
///
/// # Example
///
/// ```rust
/// use fibheap_index::rank::saturating_decrement;
///
/// assert_eq!(saturating_decrement(5), 4);
/// assert_eq!(saturating_decrement(0), 0);
/// ```
#[inline]
pub fn saturating_decrement(degree: Degree) -> Degree {
    degree.saturating_sub(1)
}

/// Returns the largest degree a node can have in a heap of `n` elements.
///
/// This is the largest `d` with `F(d + 2) <= n`, i.e. `⌊log_φ n⌋` up to the
/// usual off-by-one slack, computed with integer arithmetic. For `n <= 1`
/// the bound is 0.
///
/// # Example
///
/// ```rust
/// use fibheap_index::rank::max_degree;
///
/// assert_eq!(max_degree(1), 0);
/// assert_eq!(max_degree(2), 1);
/// assert_eq!(max_degree(3), 2);
/// assert_eq!(max_degree(8), 4);
/// ```
pub fn max_degree(n: usize) -> usize {
    // (prev, cur) = (F(d + 1), F(d + 2)), starting at d = 0.
    let (mut prev, mut cur): (usize, usize) = (1, 1);
    let mut d = 0;
    loop {
        let next = match prev.checked_add(cur) {
            Some(next) if next <= n => next,
            _ => return d,
        };
        prev = cur;
        cur = next;
        d += 1;
    }
}
