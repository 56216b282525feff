//! Tie-break policy for equal-priority entries
//!
//! Every operation that compares two equal priorities — linking two roots
//! during [`unite`](crate::binomial::BinomialHeap::merge), challenging the
//! cached minimum on insert, or bubbling an entry past its parent during a
//! priority decrease — consults a [`TieBreak`] policy to decide which entry
//! is treated as "more minimal".
//!
//! The policy is a per-call parameter: every mutating operation has a
//! variant taking an explicit `TieBreak`, and the plain variants fall back
//! to the heap-level default configured at construction time.

/// Rule for ordering two entries whose priorities compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// A later operation on an equal priority takes precedence: inserting
    /// an entry with a priority equal to the current minimum makes the new
    /// entry the minimum, and decreasing a key to its parent's priority
    /// bubbles it past the parent.
    #[default]
    PreferNew,
    /// Equal-priority entries keep their original relative ordering: the
    /// current minimum is never displaced by an equal newcomer, and
    /// bubbling stops at an equal-priority parent.
    PreferExisting,
}
