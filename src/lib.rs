//! Mergeable, indexable priority queue
//!
//! This crate provides a binomial min-heap built for mutable-priority
//! workloads (discrete-event simulation, Dijkstra-style shortest paths):
//! entries can be decreased, increased, or removed by an opaque
//! caller-supplied handle before they reach the front of the queue, and
//! whole heaps can be merged in one operation.
//!
//! # Features
//!
//! - **Handle registry**: O(1) average handle-to-entry lookup backing
//!   `update_priority`, `remove`, and `priority_of`
//! - **Configurable tie-breaking**: per-call choice of whether later
//!   equal-priority operations take precedence ([`TieBreak`])
//! - **Arena storage**: nodes live in a generational-key arena, so there
//!   is no unsafe code and no reference-counting overhead
//! - **`PartialOrd` priorities**: `f64` works directly; NaN is rejected
//!   at the boundary instead of corrupting the order
//!
//! # Example
//!
//! ```rust
//! use mergeq::BinomialHeap;
//!
//! let mut heap: BinomialHeap<i32, &str> = BinomialHeap::new();
//! heap.push_with_handle(5, "write")?
//!     .push_with_handle(3, "flush")?
//!     .push_with_handle(8, "close")?;
//!
//! heap.update_priority(&"close", 1)?;
//! assert_eq!(heap.pop(), Some((1, Some("close"))));
//! assert_eq!(heap.pop(), Some((3, Some("flush"))));
//! # Ok::<(), mergeq::HeapError>(())
//! ```

pub mod binomial;
pub mod error;
pub mod pathfinding;
pub mod policy;

mod registry;

pub use binomial::BinomialHeap;
pub use error::HeapError;
pub use policy::TieBreak;
