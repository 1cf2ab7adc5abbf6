use egret_graph::{MethodId, MethodRef, NodeId};

use crate::{AbstractValue, MethodAnalysis};

/// Outcome of consulting the inter-procedural layer about one call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome<S> {
    /// The callee was resolved and analyzed (or served from the memo
    /// table); apply its summary at the call site.
    Summary(S),
    /// The callee is filtered out of the analysis scope; the call is
    /// treated as having no effect.
    Skipped,
}

/// The transfer-function contract of a client analysis.
///
/// The engine walks the CFG and dispatches on node kind; the analysis
/// supplies the domain-specific pieces: how abstract values start, how
/// calls and returns transform them, and how a finished callee collapses
/// into a reusable summary.
///
/// Summaries must be safe to apply repeatedly: one summary is built per
/// distinct callee and reused at every call site targeting it.
pub trait Analysis {
    type Value: AbstractValue;
    type Summary: Clone;

    /// The abstract value seeded at a method's entry node.
    fn entry_value(&self, method: MethodId) -> Self::Value;

    /// Locally-known effect of a call, bypassing summary lookup (e.g. a
    /// recognized resource constructor). Return `None` to delegate to the
    /// inter-procedural layer.
    fn call_effect(&self, target: &MethodRef, pre: &Self::Value) -> Option<Self::Value>;

    /// Compose a callee summary onto the caller-side precondition.
    fn apply_summary(&self, summary: &Self::Summary, pre: &Self::Value) -> Self::Value;

    /// The optimistic summary assumed for a callee whose analysis is still
    /// in progress (call cycles). Refinement rounds replace it.
    fn optimistic_summary(&self, callee: MethodId) -> Self::Summary;

    /// Derive the complete summary from a callee's converged analysis.
    fn summarize(&self, callee: MethodId, result: &MethodAnalysis<Self::Value>) -> Self::Summary;

    /// Transfer for return nodes. Default: identity.
    fn flow_return(&self, pre: &Self::Value) -> Self::Value {
        pre.clone()
    }

    /// Transfer for nodes that are neither calls nor returns.
    /// Default: identity.
    fn flow_other(&self, node: NodeId, pre: &Self::Value) -> Self::Value {
        let _ = node;
        pre.clone()
    }
}
