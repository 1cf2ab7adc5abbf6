use egret_graph::NodeId;

use crate::state::StateMap;
use crate::{AbstractValue, WideningStrategy};

/// The converged result of analyzing one method.
///
/// Holds the final per-node abstract states and the method's exit value
/// (the join of the postconditions of all reachable return nodes), which is
/// what summary construction reads.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodAnalysis<V> {
    states: StateMap<V>,
    exit: Option<V>,
}

impl<V: AbstractValue> MethodAnalysis<V> {
    pub(crate) fn new(states: StateMap<V>, exit: Option<V>) -> Self {
        MethodAnalysis { states, exit }
    }

    /// The abstract value flowing into `node` at the fixpoint.
    pub fn precondition(&self, node: NodeId) -> V {
        self.states.precondition(node)
    }

    /// The abstract value flowing out of `node` at the fixpoint.
    pub fn postcondition(&self, node: NodeId) -> V {
        self.states.postcondition(node)
    }

    /// The joined postcondition over all reachable return nodes, or `None`
    /// if no return node was reached.
    pub fn exit_value(&self) -> Option<&V> {
        self.exit.as_ref()
    }

    /// The full per-node state store.
    pub fn states(&self) -> &StateMap<V> {
        &self.states
    }

    /// Whether this result is covered by `other` (`self ⊑ other`), compared
    /// pointwise over node states and the exit value. Used to detect that a
    /// summary-refinement round no longer grew.
    pub fn is_subseteq(&self, other: &Self) -> bool {
        match (&self.exit, &other.exit) {
            (Some(a), Some(b)) if !a.is_subseteq(b) => return false,
            (Some(_), None) => return false,
            _ => {}
        }
        self.states.is_subseteq(&other.states)
    }

    /// Merge a newer refinement round into this (older) one, widening per
    /// `strategy` so that ascending rounds terminate. Nodes only present in
    /// one round are carried over unchanged.
    pub(crate) fn merge_round(
        &self,
        next: &Self,
        strategy: WideningStrategy,
        round: usize,
    ) -> Self {
        let mut states = self.states.clone();
        for (node, pre, post) in next.states.iter() {
            match states.get(node) {
                Some((old_pre, old_post)) => {
                    let merged_pre = strategy.merge(old_pre, pre, round);
                    let merged_post = strategy.merge(old_post, post, round);
                    states.set_precondition(node, merged_pre);
                    states.set_postcondition(node, merged_post);
                }
                None => {
                    states.set_precondition(node, pre.clone());
                    states.set_postcondition(node, post.clone());
                }
            }
        }
        let exit = match (&self.exit, &next.exit) {
            (Some(a), Some(b)) => Some(strategy.merge(a, b, round)),
            (Some(a), None) => Some(a.clone()),
            (None, b) => b.clone(),
        };
        MethodAnalysis { states, exit }
    }
}
