//! Mergeable, indexable binomial heap
//!
//! A binomial heap is a forest of binomial trees with:
//! - O(log n) insert and extract-min
//! - O(log n) decrease-key, increase-key, and remove-by-handle
//! - min-lookup in O(1) via a cached pointer
//!
//! # Algorithm Overview
//!
//! **Binomial Tree Bₖ**: recursively defined; B₀ is a single node and Bₖ
//! is formed by linking two B_{k-1} trees, so a Bₖ tree has exactly 2ᵏ
//! nodes and root degree k.
//!
//! The heap keeps its trees on a singly linked *root list* sorted by
//! non-decreasing degree, with at most one tree per degree. All structural
//! maintenance funnels through `unite`: a stable merge of two
//! degree-sorted root lists followed by a linking pass that collapses
//! equal-degree pairs, exactly like carry propagation in binary addition.
//!
//! **Storage**: nodes live in a [`slotmap`] arena and every link
//! (`parent`, `child`, `sibling`, plus the heap's `head` and `min`) is a
//! generational key into it. The arena reclaims slots through its internal
//! free list, so stale keys are detectable and no unsafe code or reference
//! counting is needed.
//!
//! **Handles**: an entry may carry an opaque caller handle. A per-heap
//! [registry](crate::registry) maps each handle to the node currently
//! holding it, which is what makes `update_priority` and `remove` O(log n)
//! instead of a full search. Priority changes move *payloads* (priority +
//! handle) between nodes rather than restructuring trees: a decrease swaps
//! the entry upward while it beats its parent, and an increase or removal
//! swaps the entry all the way to its root, extracts that root, and
//! re-unites the orphaned children.
//!
//! **Tie-breaking**: every comparison of equal priorities consults a
//! [`TieBreak`] policy, so callers choose whether later equal-priority
//! operations take precedence over earlier ones. See [`crate::policy`].

use std::cmp::Ordering;
use std::hash::Hash;
use std::mem;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::HeapError;
use crate::policy::TieBreak;
use crate::registry::HandleRegistry;

new_key_type! {
    /// Generational key addressing a node in the heap's arena.
    pub(crate) struct NodeKey;
}

/// Internal node. Links are arena keys, never owning pointers; the arena
/// itself owns every node.
///
/// The child list is linked through `sibling` in decreasing degree order
/// (the most recently linked child is first), which is what lets
/// extraction rebuild a degree-sorted root list by a single reversal.
#[derive(Debug)]
struct Node<P, H> {
    priority: P,
    handle: Option<H>,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    sibling: Option<NodeKey>,
    /// Number of children; the root of a Bₖ tree has degree k.
    degree: usize,
}

/// A mergeable min-heap of `(priority, handle)` entries with handle-based
/// priority mutation.
///
/// `P` is the priority type; any `PartialOrd` type works, and values that
/// do not compare equal to themselves (floating-point NaN) are rejected at
/// the boundary. `H` is the caller's handle type; handles are compared by
/// value equality and may be omitted per entry.
///
/// # Example
///
/// ```rust
/// use mergeq::BinomialHeap;
///
/// let mut heap: BinomialHeap<i32, &str> = BinomialHeap::new();
/// heap.push_with_handle(5, "five").unwrap();
/// heap.push_with_handle(2, "two").unwrap();
/// heap.update_priority(&"five", 1).unwrap();
/// assert_eq!(heap.peek(), Some((&1, Some(&"five"))));
/// ```
pub struct BinomialHeap<P, H = ()> {
    /// Arena owning every node reachable from `head`.
    nodes: SlotMap<NodeKey, Node<P, H>>,
    /// First root in the degree-sorted root list.
    head: Option<NodeKey>,
    /// Cached minimum root; `None` iff the heap is empty.
    min: Option<NodeKey>,
    /// Handle-to-node index, kept in lockstep with payload moves.
    registry: HandleRegistry<H>,
    /// Number of entries.
    len: usize,
    /// Policy used by operations that do not take an explicit one.
    default_tie_break: TieBreak,
}

/// Strict priority comparison. `PartialOrd` incomparability is treated as
/// "not less"; stored priorities are validated to be self-comparable, so
/// this only matters for pathological `PartialOrd` impls.
fn lt<P: PartialOrd>(a: &P, b: &P) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less))
}

fn eq_priority<P: PartialOrd>(a: &P, b: &P) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Equal))
}

/// Whether `a` takes precedence over `b` under the given tie policy.
fn beats<P: PartialOrd>(a: &P, b: &P, tie_break: TieBreak) -> bool {
    lt(a, b) || (tie_break == TieBreak::PreferNew && eq_priority(a, b))
}

/// Rejects priorities the heap cannot totally order (NaN and friends)
/// before any mutation happens.
fn ensure_orderable<P: PartialOrd>(priority: &P) -> Result<(), HeapError> {
    if eq_priority(priority, priority) {
        Ok(())
    } else {
        Err(HeapError::UnorderedPriority)
    }
}

impl<P: PartialOrd, H: Eq + Hash + Clone> BinomialHeap<P, H> {
    /// Creates an empty heap with the default tie policy
    /// ([`TieBreak::PreferNew`]).
    pub fn new() -> Self {
        Self::with_tie_break(TieBreak::default())
    }

    /// Creates an empty heap whose operations default to the given tie
    /// policy. Per-call overrides remain available through the `*_with`
    /// variants.
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        BinomialHeap {
            nodes: SlotMap::with_key(),
            head: None,
            min: None,
            registry: HandleRegistry::new(),
            len: 0,
            default_tie_break: tie_break,
        }
    }

    /// The policy used when no per-call override is given.
    pub fn default_tie_break(&self) -> TieBreak {
        self.default_tie_break
    }

    /// Returns true if the heap has no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of entries in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the minimum priority and its handle without removing the
    /// entry, or `None` if the heap is empty.
    ///
    /// O(1); the minimum root is cached.
    pub fn peek(&self) -> Option<(&P, Option<&H>)> {
        let min = self.min?;
        let node = &self.nodes[min];
        Some((&node.priority, node.handle.as_ref()))
    }

    /// Current priority of the entry registered under `handle`, or `None`
    /// if no such entry exists.
    ///
    /// O(1) average via the handle registry.
    pub fn priority_of(&self, handle: &H) -> Option<&P> {
        let key = self.registry.node_of(handle)?;
        Some(&self.nodes[key].priority)
    }

    /// Inserts an anonymous entry under the heap's default tie policy.
    pub fn push(&mut self, priority: P) -> Result<&mut Self, HeapError> {
        let tie_break = self.default_tie_break;
        self.push_with(priority, None, tie_break)
    }

    /// Inserts an entry registered under `handle`, using the heap's
    /// default tie policy.
    pub fn push_with_handle(&mut self, priority: P, handle: H) -> Result<&mut Self, HeapError> {
        let tie_break = self.default_tie_break;
        self.push_with(priority, Some(handle), tie_break)
    }

    /// Inserts an entry: full form.
    ///
    /// A single-node tree is united into the root list; the new entry
    /// displaces the cached minimum if it beats it under `tie_break`
    /// (with [`TieBreak::PreferNew`] an equal priority suffices, so a
    /// later insert of the current minimum priority takes precedence).
    ///
    /// If `handle` is already registered, the registry is retargeted to
    /// the new entry and the old entry stays in the heap anonymously.
    ///
    /// Returns `&mut Self` so inserts chain; fails without mutating if
    /// `priority` is not orderable.
    ///
    /// O(log n) worst case (carry propagation), O(1) amortized.
    pub fn push_with(
        &mut self,
        priority: P,
        handle: Option<H>,
        tie_break: TieBreak,
    ) -> Result<&mut Self, HeapError> {
        ensure_orderable(&priority)?;

        let key = self.nodes.insert(Node {
            priority,
            handle,
            parent: None,
            child: None,
            sibling: None,
            degree: 0,
        });
        if let Some(h) = self.nodes[key].handle.clone() {
            if let Some(stale) = self.registry.register(h, key) {
                self.nodes[stale].handle = None;
            }
        }

        self.unite(Some(key), tie_break);

        let challenger_wins = match self.min {
            Some(min) => beats(&self.nodes[key].priority, &self.nodes[min].priority, tie_break),
            None => true,
        };
        if challenger_wins {
            self.min = Some(key);
        }
        self.len += 1;
        Ok(self)
    }

    /// Removes and returns the minimum entry, or `None` if the heap is
    /// empty.
    ///
    /// The minimum root is cut from the root list, its child list is
    /// reversed (turning decreasing degrees into a valid root list) and
    /// united back in, and the minimum cache is recomputed by a root scan
    /// that breaks priority ties toward the root encountered first.
    ///
    /// O(log n).
    pub fn pop(&mut self) -> Option<(P, Option<H>)> {
        let min = self.min?;
        let tie_break = self.default_tie_break;
        self.extract_root(min, tie_break);

        let node = self.nodes.remove(min)?;
        if let Some(h) = &node.handle {
            self.registry.unregister(h);
        }
        self.len -= 1;
        Some((node.priority, node.handle))
    }

    /// Changes the priority of the entry registered under `handle`, using
    /// the heap's default tie policy.
    pub fn update_priority(&mut self, handle: &H, new_priority: P) -> Result<bool, HeapError> {
        let tie_break = self.default_tie_break;
        self.update_priority_with(handle, new_priority, tie_break)
    }

    /// Changes the priority of the entry registered under `handle`: full
    /// form.
    ///
    /// - Equal to the current priority: no-op, returns `Ok(false)`.
    /// - Decrease: the payload is swapped toward the root while it beats
    ///   its parent under `tie_break`, then challenges the cached minimum.
    /// - Increase: the payload is swapped unconditionally to its root, the
    ///   root is extracted with its children re-united, and the entry is
    ///   re-inserted fresh with the new priority.
    ///
    /// Returns `Ok(true)` if the priority changed,
    /// `Err(HeapError::NotFound)` if the handle is not registered, and
    /// `Err(HeapError::UnorderedPriority)` (before any mutation) if the
    /// new priority is not orderable.
    ///
    /// O(log n).
    pub fn update_priority_with(
        &mut self,
        handle: &H,
        new_priority: P,
        tie_break: TieBreak,
    ) -> Result<bool, HeapError> {
        ensure_orderable(&new_priority)?;
        let key = self.registry.node_of(handle).ok_or(HeapError::NotFound)?;

        if eq_priority(&self.nodes[key].priority, &new_priority) {
            return Ok(false);
        }

        let resting = if lt(&new_priority, &self.nodes[key].priority) {
            self.nodes[key].priority = new_priority;
            self.bubble_up(key, tie_break)
        } else {
            let root = self.bubble_to_root(key);
            self.extract_root(root, tie_break);

            // Re-insert the detached node as a fresh singleton.
            let node = &mut self.nodes[root];
            node.priority = new_priority;
            node.parent = None;
            node.child = None;
            node.sibling = None;
            node.degree = 0;
            self.unite(Some(root), tie_break);
            root
        };

        let challenger_wins = match self.min {
            Some(min) => beats(
                &self.nodes[resting].priority,
                &self.nodes[min].priority,
                tie_break,
            ),
            None => true,
        };
        if challenger_wins {
            self.min = Some(resting);
        }
        Ok(true)
    }

    /// Removes the entry registered under `handle`, returning its
    /// priority.
    ///
    /// The entry's payload is swapped unconditionally to its root (the
    /// same interior-extraction primitive the increase-key path uses),
    /// the root is extracted with its children re-united, and the handle
    /// is unregistered.
    ///
    /// O(log n).
    pub fn remove(&mut self, handle: &H) -> Result<P, HeapError> {
        let key = self.registry.node_of(handle).ok_or(HeapError::NotFound)?;
        let tie_break = self.default_tie_break;

        let root = self.bubble_to_root(key);
        self.extract_root(root, tie_break);

        let node = self.nodes.remove(root).ok_or(HeapError::NotFound)?;
        if let Some(h) = &node.handle {
            self.registry.unregister(h);
        }
        self.len -= 1;
        Ok(node.priority)
    }

    /// Merges `other` into this heap under the default tie policy,
    /// consuming it. All of `other`'s entries, including registered
    /// handles, move across; if both heaps registered the same handle,
    /// lookups retarget to the entry coming from `other` and this heap's
    /// entry stays anonymously.
    pub fn merge(&mut self, other: Self) {
        let tie_break = self.default_tie_break;
        self.merge_with(other, tie_break);
    }

    /// Merges `other` into this heap: full form. See [`merge`](Self::merge).
    ///
    /// Nodes move between arenas, so every link is rewritten through a key
    /// translation table; the root lists are then united and the minimum
    /// recomputed. O(n) in the size of `other`.
    pub fn merge_with(&mut self, mut other: Self, tie_break: TieBreak) {
        let Some(other_head) = other.head.take() else {
            return;
        };

        // Move every node across, remembering the key translation.
        let mut remap: FxHashMap<NodeKey, NodeKey> = FxHashMap::default();
        remap.reserve(other.len);
        let old_keys: Vec<NodeKey> = other.nodes.keys().collect();
        for old in old_keys {
            if let Some(node) = other.nodes.remove(old) {
                remap.insert(old, self.nodes.insert(node));
            }
        }

        // Rewrite links through the translation.
        for &new in remap.values() {
            let node = &mut self.nodes[new];
            node.parent = node.parent.and_then(|k| remap.get(&k).copied());
            node.child = node.child.and_then(|k| remap.get(&k).copied());
            node.sibling = node.sibling.and_then(|k| remap.get(&k).copied());
        }

        // Carry registry entries across.
        for (handle, old) in other.registry.drain() {
            if let Some(&new) = remap.get(&old) {
                if let Some(stale) = self.registry.register(handle, new) {
                    self.nodes[stale].handle = None;
                }
            }
        }

        self.len += other.len;
        other.min = None;
        other.len = 0;

        let translated_head = remap.get(&other_head).copied();
        self.unite(translated_head, tie_break);
        self.update_min();
    }

    /// Walks the whole structure and checks every invariant; returns
    /// false on the first violation. Intended for tests and debugging.
    ///
    /// Checked: root list sorted by strictly increasing degree with
    /// parentless roots; every tree is a well-formed binomial tree (child
    /// count equals degree, child degrees decrease by one); no child's
    /// priority is strictly less than its parent's; the cached minimum is
    /// a root no other root strictly undercuts; the arena, `len`, and the
    /// handle registry all agree.
    pub fn verify_internal_structure(&self) -> bool {
        let mut visited = 0usize;
        let mut handles_seen = 0usize;
        let mut last_degree: Option<usize> = None;
        let mut min_is_root = false;

        let mut root = self.head;
        while let Some(r) = root {
            let node = &self.nodes[r];
            if node.parent.is_some() {
                return false;
            }
            match last_degree {
                Some(d) if node.degree <= d => return false,
                _ => last_degree = Some(node.degree),
            }
            if self.min == Some(r) {
                min_is_root = true;
            }
            if let Some(min) = self.min {
                if lt(&node.priority, &self.nodes[min].priority) {
                    return false;
                }
            }
            if !self.verify_tree(r, &mut visited, &mut handles_seen) {
                return false;
            }
            root = node.sibling;
        }

        if self.min.is_some() != self.head.is_some() {
            return false;
        }
        if self.min.is_some() && !min_is_root {
            return false;
        }
        visited == self.len
            && self.nodes.len() == self.len
            && handles_seen == self.registry.len()
    }

    fn verify_tree(&self, key: NodeKey, visited: &mut usize, handles_seen: &mut usize) -> bool {
        *visited += 1;
        let node = &self.nodes[key];
        if let Some(h) = &node.handle {
            *handles_seen += 1;
            if self.registry.node_of(h) != Some(key) {
                return false;
            }
        }

        let mut children = 0usize;
        let mut child = node.child;
        while let Some(c) = child {
            let child_node = &self.nodes[c];
            children += 1;
            if children > node.degree {
                return false;
            }
            let expected_degree = node.degree - children;
            if child_node.parent != Some(key) || child_node.degree != expected_degree {
                return false;
            }
            if lt(&child_node.priority, &node.priority) {
                return false;
            }
            if !self.verify_tree(c, visited, handles_seen) {
                return false;
            }
            child = child_node.sibling;
        }
        children == node.degree
    }

    /// Stable merge of a degree-sorted root list into the heap's root
    /// list. Relative order among equal-degree roots is preserved, with
    /// roots from `list` placed before existing roots of the same degree
    /// (this positioning is what gives the linking pass its tie-break
    /// orientation).
    fn merge_roots(&mut self, list: Option<NodeKey>) {
        let Some(first) = list else { return };
        let Some(head) = self.head else {
            self.head = list;
            return;
        };

        if self.nodes[head].degree >= self.nodes[first].degree {
            self.head = Some(first);
        }

        let mut prev: Option<NodeKey> = None;
        let mut ours = Some(head);
        let mut theirs = Some(first);
        while let (Some(x), Some(y)) = (ours, theirs) {
            if self.nodes[x].degree >= self.nodes[y].degree {
                // Splice y in front of x.
                let rest = self.nodes[y].sibling;
                self.nodes[y].sibling = Some(x);
                if let Some(p) = prev {
                    self.nodes[p].sibling = Some(y);
                }
                prev = Some(y);
                theirs = rest;
            } else {
                prev = Some(x);
                ours = self.nodes[x].sibling;
            }
        }
        if ours.is_none() {
            if let Some(p) = prev {
                self.nodes[p].sibling = theirs;
            }
        }
    }

    /// Links root `child` under root `parent` as its new first child,
    /// producing a tree of one higher degree. Keeps the minimum cache on a
    /// root: if `child` was the cached minimum, the cache moves to
    /// `parent`, which just beat it under the active tie policy.
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        self.nodes[child].parent = Some(parent);
        self.nodes[child].sibling = self.nodes[parent].child;
        self.nodes[parent].child = Some(child);
        self.nodes[parent].degree += 1;
        if self.min == Some(child) {
            self.min = Some(parent);
        }
    }

    /// Core linking algorithm: merges `list` into the root list, then
    /// collapses duplicate degrees with a three-node sliding window.
    ///
    /// The window skips a pair when the degrees differ or when a third
    /// consecutive root shares the degree (linking the first two would
    /// only create a new duplicate; the next iteration pairs the latter
    /// two instead). Otherwise the root that beats the other under
    /// `tie_break` absorbs it. One pass restores "at most one tree per
    /// degree" in O(roots) time.
    fn unite(&mut self, list: Option<NodeKey>, tie_break: TieBreak) {
        self.merge_roots(list);
        let Some(head) = self.head else { return };

        let mut prev: Option<NodeKey> = None;
        let mut x = head;
        let mut next = self.nodes[x].sibling;
        while let Some(y) = next {
            let same_degree = self.nodes[x].degree == self.nodes[y].degree;
            let third_same = self.nodes[y]
                .sibling
                .map(|z| self.nodes[z].degree == self.nodes[x].degree)
                .unwrap_or(false);

            if !same_degree || third_same {
                prev = Some(x);
                x = y;
            } else if beats(&self.nodes[x].priority, &self.nodes[y].priority, tie_break) {
                self.nodes[x].sibling = self.nodes[y].sibling;
                self.link(y, x);
            } else {
                match prev {
                    Some(p) => self.nodes[p].sibling = Some(y),
                    None => self.head = Some(y),
                }
                self.link(x, y);
                x = y;
            }
            next = self.nodes[x].sibling;
        }
    }

    /// Cuts root `x` out of the root list, re-unites its children, and
    /// recomputes the minimum cache if `x` held it. The node itself stays
    /// in the arena, detached; callers either free it (pop/remove) or
    /// re-insert it (increase-key).
    fn extract_root(&mut self, x: NodeKey, tie_break: TieBreak) {
        // Unlink x from the root list.
        let mut prev: Option<NodeKey> = None;
        let mut cursor = self.head;
        while let Some(c) = cursor {
            if c == x {
                break;
            }
            prev = Some(c);
            cursor = self.nodes[c].sibling;
        }
        debug_assert_eq!(cursor, Some(x), "extract target must be a root");
        match prev {
            Some(p) => self.nodes[p].sibling = self.nodes[x].sibling,
            None => self.head = self.nodes[x].sibling,
        }
        self.nodes[x].sibling = None;

        // Reverse x's child list in place, clearing parent links. The
        // children of a Bₖ root have degrees k-1 .. 0, so the reversal is
        // a valid degree-sorted root list.
        let mut reversed: Option<NodeKey> = None;
        let mut child = self.nodes[x].child.take();
        while let Some(c) = child {
            child = self.nodes[c].sibling;
            self.nodes[c].parent = None;
            self.nodes[c].sibling = reversed;
            reversed = Some(c);
        }

        self.unite(reversed, tie_break);
        if self.min == Some(x) {
            self.update_min();
        }
    }

    /// Swaps the payload (priority + handle) of an entry with its
    /// parent's while the entry beats the parent under `tie_break`,
    /// returning the node where it came to rest. Tree shape never changes.
    fn bubble_up(&mut self, key: NodeKey, tie_break: TieBreak) -> NodeKey {
        let mut current = key;
        while let Some(parent) = self.nodes[current].parent {
            if !beats(
                &self.nodes[current].priority,
                &self.nodes[parent].priority,
                tie_break,
            ) {
                break;
            }
            self.swap_payload(current, parent);
            current = parent;
        }
        current
    }

    /// Interior-extraction primitive shared by `remove` and the
    /// increase-key path: swaps the entry's payload unconditionally up to
    /// its tree's root and returns that root, which then holds the entry.
    fn bubble_to_root(&mut self, key: NodeKey) -> NodeKey {
        let mut current = key;
        while let Some(parent) = self.nodes[current].parent {
            self.swap_payload(current, parent);
            current = parent;
        }
        current
    }

    /// Exchanges priorities and handles between two nodes and retargets
    /// the registry entries that follow them.
    fn swap_payload(&mut self, a: NodeKey, b: NodeKey) {
        if let Some([node_a, node_b]) = self.nodes.get_disjoint_mut([a, b]) {
            mem::swap(&mut node_a.priority, &mut node_b.priority);
            mem::swap(&mut node_a.handle, &mut node_b.handle);
        }
        if let Some(h) = self.nodes[a].handle.clone() {
            self.registry.reassign(&h, a);
        }
        if let Some(h) = self.nodes[b].handle.clone() {
            self.registry.reassign(&h, b);
        }
    }

    /// Recomputes the minimum cache by scanning the root list, breaking
    /// priority ties toward the root encountered first.
    fn update_min(&mut self) {
        let mut min = self.head;
        let mut cursor = self.head.and_then(|h| self.nodes[h].sibling);
        while let Some(c) = cursor {
            if let Some(m) = min {
                if lt(&self.nodes[c].priority, &self.nodes[m].priority) {
                    min = Some(c);
                }
            }
            cursor = self.nodes[c].sibling;
        }
        self.min = min;
    }
}

impl<P: PartialOrd, H: Eq + Hash + Clone> Default for BinomialHeap<P, H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Operation-level coverage lives in tests/; these pin down the pure
    // comparison helpers.

    #[test]
    fn beats_respects_tie_policy() {
        assert!(beats(&1, &2, TieBreak::PreferExisting));
        assert!(!beats(&2, &1, TieBreak::PreferNew));
        assert!(beats(&1, &1, TieBreak::PreferNew));
        assert!(!beats(&1, &1, TieBreak::PreferExisting));
    }

    #[test]
    fn nan_is_not_orderable() {
        assert_eq!(ensure_orderable(&1.5f64), Ok(()));
        assert_eq!(
            ensure_orderable(&f64::NAN),
            Err(HeapError::UnorderedPriority)
        );
    }
}
