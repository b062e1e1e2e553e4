//! Structural invariant checks
//!
//! [`FibonacciHeap::validate`] walks the whole heap and confirms:
//!
//! 1. Every ring is a valid doubly-linked cycle
//! 2. Every child's key is not less than its parent's
//! 3. Every recorded degree equals the size of the child ring
//! 4. No root is marked
//! 5. `min` is a root holding the minimum key
//!
//! plus that every stored node is reachable exactly once and that no degree
//! exceeds [`max_degree`](crate::rank::max_degree). Validation is O(n) and
//! meant for tests and debugging.

use crate::arena::{Arena, Handle};
use crate::compare::Comparator;
use crate::error::InvariantViolation;
use crate::fibonacci::FibonacciHeap;
use crate::rank::max_degree;
use rustc_hash::FxHashSet;

impl<K, V, C: Comparator<K>> FibonacciHeap<K, V, C> {
    /// Checks every structural invariant of the heap
    ///
    /// # Errors
    /// The first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let len = self.len();
        let Some(min) = self.min else {
            return if len == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::Count {
                    reported: len,
                    reachable: 0,
                })
            };
        };

        if !self.arena.contains(min) || self.arena[min].parent.is_some() {
            return Err(InvariantViolation::Min);
        }

        let bound = max_degree(len);
        let mut seen = FxHashSet::default();
        let mut stack = vec![(None, min)];
        while let Some((parent, entry)) = stack.pop() {
            let ring = checked_ring(&self.arena, entry, &mut seen)?;
            for &h in &ring {
                let node = &self.arena[h];
                if node.parent != parent {
                    return Err(InvariantViolation::ParentLink(format!("{:?}", h)));
                }
                match parent {
                    None => {
                        if node.marked {
                            return Err(InvariantViolation::MarkedRoot(format!("{:?}", h)));
                        }
                        if self.comparator().less(&node.key, &self.arena[min].key) {
                            return Err(InvariantViolation::Min);
                        }
                    }
                    Some(p) => {
                        if self.comparator().less(&node.key, &self.arena[p].key) {
                            return Err(InvariantViolation::HeapOrder {
                                parent: format!("{:?}", p),
                                child: format!("{:?}", h),
                            });
                        }
                    }
                }

                let degree = node.degree as usize;
                let children = match node.child {
                    Some(child) => {
                        stack.push((Some(h), child));
                        ring_len(&self.arena, child)
                    }
                    None => 0,
                };
                if degree != children {
                    return Err(InvariantViolation::Degree {
                        node: format!("{:?}", h),
                        recorded: degree,
                        actual: children,
                    });
                }
                if degree > bound {
                    return Err(InvariantViolation::DegreeBound {
                        node: format!("{:?}", h),
                        degree,
                        bound,
                        len,
                    });
                }
            }
        }

        if seen.len() != len {
            return Err(InvariantViolation::Count {
                reported: len,
                reachable: seen.len(),
            });
        }
        Ok(())
    }
}

/// Walks the ring at `entry`, checking its links and that no member was
/// already visited through another ring.
fn checked_ring<K, V>(
    arena: &Arena<K, V>,
    entry: Handle,
    seen: &mut FxHashSet<Handle>,
) -> Result<Vec<Handle>, InvariantViolation> {
    let broken = |h: Handle| InvariantViolation::BrokenRing(format!("{:?}", h));
    let mut ring = Vec::new();
    let mut current = entry;
    loop {
        let node = arena.get(current).ok_or_else(|| broken(current))?;
        if !seen.insert(current) {
            return Err(broken(current));
        }
        let right = arena.get(node.right).ok_or_else(|| broken(current))?;
        if right.left != current {
            return Err(broken(current));
        }
        ring.push(current);
        current = node.right;
        if current == entry {
            return Ok(ring);
        }
    }
}

fn ring_len<K, V>(arena: &Arena<K, V>, entry: Handle) -> usize {
    let mut count = 1;
    let mut current = arena[entry].right;
    while current != entry && count <= arena.len() {
        count += 1;
        current = arena[current].right;
    }
    count
}

/// Frozen copy of every node's links, for comparing a heap before and after an
/// operation that must not change it.
#[cfg(test)]
pub(crate) fn snapshot<K: Clone, V, C>(
    heap: &FibonacciHeap<K, V, C>,
) -> (Option<Handle>, Vec<(Handle, K, Option<Handle>, Option<Handle>, Handle, Handle, u8, bool)>) {
    let nodes = heap
        .arena
        .iter()
        .map(|(h, n)| {
            (
                h,
                n.key.clone(),
                n.parent,
                n.child,
                n.left,
                n.right,
                n.degree,
                n.marked,
            )
        })
        .collect();
    (heap.min, nodes)
}
