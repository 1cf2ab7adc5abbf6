//! Resource-leak analysis over the fixpoint engine.
//!
//! Tracks how many resources a method holds open, paired with a sticky flag
//! recording whether a still-open resource ever flowed out of a return. Call
//! sites recognized by an [`EffectTable`] adjust the counter directly; every
//! other call is handled inter-procedurally through callee summaries.
//!
//! ```
//! use egret_graph::{Cfg, MethodRef, Program};
//! # use egret_graph::{MethodId, ResolveError};
//! use egret_leak::{find_leaks, EffectTable};
//!
//! # struct OneMethod(Cfg);
//! # impl Program for OneMethod {
//! #     fn cfg(&self, _: MethodId) -> Option<&Cfg> { Some(&self.0) }
//! #     fn resolve(&self, call: &MethodRef) -> Result<MethodId, ResolveError> {
//! #         Err(ResolveError::Unknown { call: call.clone() })
//! #     }
//! # }
//! let mut b = Cfg::builder();
//! let open = b.call(MethodRef::new("File", "open"));
//! let ret = b.ret();
//! b.edge(open, ret);
//! let program = OneMethod(b.build());
//!
//! let effects = EffectTable::new().opens("File", "open").closes("File", "close");
//! let report = find_leaks(&program, egret_graph::MethodId::new(0), effects)?;
//! assert!(report.leaks());
//! # Ok::<(), egret_engine::AnalysisError>(())
//! ```

use egret_domains::{BoolOr, Count, Pair};
use egret_engine::{Analysis, Analyzer, AnalysisError, MethodAnalysis};
use egret_graph::{HasBottom, Lattice, MethodId, MethodRef, Program};
use rustc_hash::FxHashMap;

/// The per-node abstract state: open-resource count times escape flag.
pub type LeakValue = Pair<Count, BoolOr>;

/// How a recognized call site acts on the open-resource counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceEffect {
    /// Acquires one resource.
    Open,
    /// Releases one resource.
    Close,
}

/// Allow-list mapping call targets to their resource effect.
///
/// Matching is by full [`MethodRef`] identity, owner and name, never by
/// name substrings. Targets absent from the table have no direct effect
/// and fall through to summary-based handling.
#[derive(Clone, Debug, Default)]
pub struct EffectTable {
    effects: FxHashMap<MethodRef, ResourceEffect>,
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `owner.name` as acquiring a resource.
    pub fn opens(mut self, owner: &str, name: &str) -> Self {
        self.effects
            .insert(MethodRef::new(owner, name), ResourceEffect::Open);
        self
    }

    /// Register `owner.name` as releasing a resource.
    pub fn closes(mut self, owner: &str, name: &str) -> Self {
        self.effects
            .insert(MethodRef::new(owner, name), ResourceEffect::Close);
        self
    }

    pub fn effect(&self, target: &MethodRef) -> Option<ResourceEffect> {
        self.effects.get(target).copied()
    }
}

/// What one analyzed method does to its caller's state, compressed to a
/// reusable form: the net change to the open count plus whether any path
/// through the callee let a resource escape.
///
/// Summaries compose additively, so one summary is valid at every call
/// site regardless of how many resources the caller already holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeakSummary {
    pub delta: Count,
    pub escaped: BoolOr,
}

impl LeakSummary {
    pub const NO_EFFECT: LeakSummary = LeakSummary {
        delta: Count::ZERO,
        escaped: BoolOr::FALSE,
    };

    /// Compose this summary onto a caller-side state.
    pub fn apply(&self, pre: &LeakValue) -> LeakValue {
        Pair::new(
            pre.first.saturating_add(self.delta),
            pre.second.join(&self.escaped),
        )
    }
}

/// The [`Analysis`] instance driving leak detection.
pub struct LeakAnalysis {
    effects: EffectTable,
}

impl LeakAnalysis {
    pub fn new(effects: EffectTable) -> Self {
        LeakAnalysis { effects }
    }

    pub fn effects(&self) -> &EffectTable {
        &self.effects
    }
}

impl Analysis for LeakAnalysis {
    type Value = LeakValue;
    type Summary = LeakSummary;

    fn entry_value(&self, _method: MethodId) -> LeakValue {
        // Methods start with no resources of their own; the summary delta
        // is then exactly the exit count.
        LeakValue::bottom()
    }

    fn call_effect(&self, target: &MethodRef, pre: &LeakValue) -> Option<LeakValue> {
        match self.effects.effect(target)? {
            ResourceEffect::Open => Some(Pair::new(pre.first.increment(), pre.second)),
            ResourceEffect::Close => Some(Pair::new(pre.first.decrement(), pre.second)),
        }
    }

    fn apply_summary(&self, summary: &LeakSummary, pre: &LeakValue) -> LeakValue {
        summary.apply(pre)
    }

    fn optimistic_summary(&self, _callee: MethodId) -> LeakSummary {
        LeakSummary::NO_EFFECT
    }

    fn summarize(&self, callee: MethodId, result: &MethodAnalysis<LeakValue>) -> LeakSummary {
        let summary = match result.exit_value() {
            Some(exit) => LeakSummary {
                delta: exit.first,
                escaped: exit.second,
            },
            None => LeakSummary::NO_EFFECT,
        };
        log::trace!("summarized {callee:?} as {summary:?}");
        summary
    }

    /// Returns re-derive the escape flag from the count on this path: a
    /// balanced return clears it, an unbalanced one sets it.
    fn flow_return(&self, pre: &LeakValue) -> LeakValue {
        if pre.first.is_zero() {
            Pair::new(pre.first, pre.second.meet(&BoolOr::FALSE))
        } else {
            Pair::new(pre.first, pre.second.join(&BoolOr::TRUE))
        }
    }
}

/// The verdict for one root method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeakReport {
    /// Resources still open at the joined exit of the root.
    pub open_at_exit: Count,
    /// Whether any path let a still-open resource escape a return.
    pub escaped: bool,
}

impl LeakReport {
    pub fn leaks(&self) -> bool {
        !self.open_at_exit.is_zero() || self.escaped
    }
}

/// Run the leak analysis from `root` with default engine settings.
///
/// For fixed summaries, custom widening, or summary inspection, drive an
/// [`Analyzer`] with a [`LeakAnalysis`] directly instead.
pub fn find_leaks<P: Program>(
    program: &P,
    root: MethodId,
    effects: EffectTable,
) -> Result<LeakReport, AnalysisError> {
    let mut analyzer = Analyzer::new(program, LeakAnalysis::new(effects));
    let result = analyzer.analyze(root)?;
    let exit = result.exit_value().copied().unwrap_or_else(LeakValue::bottom);
    let report = LeakReport {
        open_at_exit: exit.first,
        escaped: exit.second.is_set(),
    };
    log::debug!("leak verdict for {root:?}: {report:?}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_table_matches_full_identity() {
        let effects = EffectTable::new().opens("File", "open");
        assert_eq!(
            effects.effect(&MethodRef::new("File", "open")),
            Some(ResourceEffect::Open)
        );
        // Same name under a different owner is a different method.
        assert_eq!(effects.effect(&MethodRef::new("Socket", "open")), None);
    }

    #[test]
    fn summary_application_is_additive() {
        let summary = LeakSummary {
            delta: Count::Finite(2),
            escaped: BoolOr::FALSE,
        };
        let pre = Pair::new(Count::Finite(1), BoolOr::TRUE);
        assert_eq!(
            summary.apply(&pre),
            Pair::new(Count::Finite(3), BoolOr::TRUE)
        );
        assert_eq!(LeakSummary::NO_EFFECT.apply(&pre), pre);
    }

    #[test]
    fn return_flow_rederives_escape_from_count() {
        let analysis = LeakAnalysis::new(EffectTable::new());
        let balanced = Pair::new(Count::ZERO, BoolOr::TRUE);
        assert_eq!(
            analysis.flow_return(&balanced),
            Pair::new(Count::ZERO, BoolOr::FALSE)
        );
        let open = Pair::new(Count::Finite(1), BoolOr::FALSE);
        assert_eq!(
            analysis.flow_return(&open),
            Pair::new(Count::Finite(1), BoolOr::TRUE)
        );
    }

    #[test]
    fn close_clamps_at_zero() {
        let analysis =
            LeakAnalysis::new(EffectTable::new().closes("File", "close"));
        let pre = LeakValue::bottom();
        let post = analysis
            .call_effect(&MethodRef::new("File", "close"), &pre)
            .unwrap();
        assert_eq!(post.first, Count::ZERO);
    }
}
