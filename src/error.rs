//! Error type for heap operations
//!
//! All errors are locally recoverable: a missing handle and an unorderable
//! priority are caller conditions, not heap corruption. An empty heap is
//! signaled by `None` from [`peek`](crate::BinomialHeap::peek) and
//! [`pop`](crate::BinomialHeap::pop) rather than by an error.

use std::fmt;

/// Error returned by handle-based and fallible heap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// No entry is currently registered under the given handle.
    NotFound,
    /// The priority does not compare equal to itself (e.g. a floating-point
    /// NaN). The heap requires a total order over stored priorities, so
    /// such values are rejected before any mutation.
    UnorderedPriority,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::NotFound => {
                write!(f, "no entry is registered under the given handle")
            }
            HeapError::UnorderedPriority => {
                write!(f, "priority is not orderable (does not compare equal to itself)")
            }
        }
    }
}

impl std::error::Error for HeapError {}
