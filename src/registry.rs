//! Handle registry: per-heap mapping from caller handles to arena nodes
//!
//! The registry is what makes decrease-key, increase-key, and
//! remove-by-handle possible: it resolves an opaque caller-supplied handle
//! to the arena node currently carrying it, in O(1) average time. Handle
//! equality is caller-defined value equality (`Eq + Hash`), never node
//! identity.
//!
//! The mapping is maintained incrementally: every payload swap during
//! bubbling, every insert, every extraction, and every merge updates the
//! affected entries. A node without a handle is simply absent from the
//! registry (anonymous entries support pure priority-queue usage).

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::binomial::NodeKey;

/// Per-heap handle-to-node mapping.
#[derive(Debug, Clone)]
pub(crate) struct HandleRegistry<H> {
    map: FxHashMap<H, NodeKey>,
}

impl<H: Eq + Hash + Clone> HandleRegistry<H> {
    pub(crate) fn new() -> Self {
        HandleRegistry {
            map: FxHashMap::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    /// Resolves a handle to the node currently carrying it.
    pub(crate) fn node_of(&self, handle: &H) -> Option<NodeKey> {
        self.map.get(handle).copied()
    }

    /// Registers a handle for a freshly inserted node.
    ///
    /// Returns the node a previous registration of the same handle pointed
    /// at, if any; the caller is responsible for stripping the stale handle
    /// from that node.
    pub(crate) fn register(&mut self, handle: H, node: NodeKey) -> Option<NodeKey> {
        self.map.insert(handle, node).filter(|&old| old != node)
    }

    /// Retargets an existing registration after its payload moved to a
    /// different node (payload swaps during bubbling).
    pub(crate) fn reassign(&mut self, handle: &H, node: NodeKey) {
        if let Some(entry) = self.map.get_mut(handle) {
            *entry = node;
        }
    }

    /// Drops the registration for an extracted or removed entry.
    pub(crate) fn unregister(&mut self, handle: &H) -> Option<NodeKey> {
        self.map.remove(handle)
    }

    /// Empties the registry, yielding all entries (used when a heap is
    /// absorbed into another by merge).
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (H, NodeKey)> + '_ {
        self.map.drain()
    }
}
