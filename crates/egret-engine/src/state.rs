use egret_graph::NodeId;
use rustc_hash::FxHashMap;

use crate::AbstractValue;

#[derive(Clone, Debug, PartialEq)]
struct NodeState<V> {
    pre: V,
    post: V,
}

impl<V: AbstractValue> NodeState<V> {
    fn bottom() -> Self {
        NodeState {
            pre: V::bottom(),
            post: V::bottom(),
        }
    }
}

/// Per-node `(precondition, postcondition)` storage for one method's
/// fixpoint computation.
///
/// States are created lazily at bottom on first access and mutated only by
/// the driving analysis: joined at edges, overwritten by node transfers.
/// The map is exclusively owned by one intra-procedural run until it is
/// finalized into a [`MethodAnalysis`](crate::MethodAnalysis).
#[derive(Clone, Debug, PartialEq)]
pub struct StateMap<V> {
    states: FxHashMap<NodeId, NodeState<V>>,
}

impl<V: AbstractValue> Default for StateMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: AbstractValue> StateMap<V> {
    pub fn new() -> Self {
        StateMap {
            states: FxHashMap::default(),
        }
    }

    /// The abstract value flowing into `node`; bottom if never touched.
    pub fn precondition(&self, node: NodeId) -> V {
        self.states
            .get(&node)
            .map(|s| s.pre.clone())
            .unwrap_or_else(V::bottom)
    }

    /// The abstract value flowing out of `node`; bottom if never executed.
    pub fn postcondition(&self, node: NodeId) -> V {
        self.states
            .get(&node)
            .map(|s| s.post.clone())
            .unwrap_or_else(V::bottom)
    }

    /// Overwrite the precondition (used to seed the entry node).
    pub fn set_precondition(&mut self, node: NodeId, value: V) {
        self.states
            .entry(node)
            .or_insert_with(NodeState::bottom)
            .pre = value;
    }

    /// Overwrite the postcondition with a freshly computed transfer result.
    pub fn set_postcondition(&mut self, node: NodeId, value: V) {
        self.states
            .entry(node)
            .or_insert_with(NodeState::bottom)
            .post = value;
    }

    /// Canonical edge propagation: merge an incoming postcondition into the
    /// target's precondition. The first touch of a node adopts the incoming
    /// value as-is; later touches go through `merge` (join or widen).
    ///
    /// Returns whether the stored precondition changed.
    pub fn merge_precondition<F>(&mut self, target: NodeId, incoming: &V, merge: F) -> bool
    where
        F: FnOnce(&V, &V) -> V,
    {
        use std::collections::hash_map::Entry;
        match self.states.entry(target) {
            Entry::Occupied(mut entry) => {
                let merged = merge(&entry.get().pre, incoming);
                let changed = merged != entry.get().pre;
                entry.get_mut().pre = merged;
                changed
            }
            Entry::Vacant(slot) => {
                slot.insert(NodeState {
                    pre: incoming.clone(),
                    post: V::bottom(),
                });
                true
            }
        }
    }

    /// Replace the precondition, reporting whether it changed. Used by the
    /// narrowing sweep, which recomputes merged values downward.
    pub fn replace_precondition(&mut self, node: NodeId, value: V) -> bool {
        let state = self.states.entry(node).or_insert_with(NodeState::bottom);
        let changed = state.pre != value;
        state.pre = value;
        changed
    }

    /// Iterate `(node, precondition, postcondition)` over all touched nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &V, &V)> {
        self.states.iter().map(|(n, s)| (*n, &s.pre, &s.post))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Pointwise subsumption: every stored state of `self` must be covered
    /// by a state in `other`.
    pub fn is_subseteq(&self, other: &Self) -> bool {
        self.states.iter().all(|(node, state)| {
            other.states.get(node).is_some_and(|o| {
                state.pre.is_subseteq(&o.pre) && state.post.is_subseteq(&o.post)
            })
        })
    }

    pub(crate) fn get(&self, node: NodeId) -> Option<(&V, &V)> {
        self.states.get(&node).map(|s| (&s.pre, &s.post))
    }
}
