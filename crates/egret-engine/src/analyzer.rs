use egret_graph::MethodId;
use rustc_hash::FxHashMap;

use crate::summary::SummaryCache;
use crate::{Analysis, WideningStrategy};

/// One entry of the in-progress method stack.
///
/// `used_tentative` records whether this method's current fixpoint run
/// consumed a not-yet-final summary (i.e. the method participates in a call
/// cycle); such results must be refined before they can be trusted.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) method: MethodId,
    pub(crate) used_tentative: bool,
}

impl Frame {
    pub(crate) fn new(method: MethodId) -> Self {
        Frame {
            method,
            used_tentative: false,
        }
    }
}

/// Worklist-based inter-procedural abstract interpreter.
///
/// Analyzes a root method and, transitively, every in-scope method it
/// calls: a sequential depth-first descent through the call graph with one
/// memoized summary per callee. Within each method, a worklist fixpoint
/// joins abstract states at CFG merge points and iterates until nothing
/// changes, widening per the configured [`WideningStrategy`] so that
/// infinite-height domains still terminate.
///
/// All state (the summary table, the in-progress stack, the configuration)
/// is owned by the instance; there are no process-wide registries, and the
/// summary table is not designed for concurrent mutation.
pub struct Analyzer<'p, P, A: Analysis> {
    pub(crate) program: &'p P,
    pub(crate) analysis: A,
    pub(crate) widening: WideningStrategy,
    pub(crate) max_iterations: usize,
    pub(crate) narrowing_iterations: usize,
    pub(crate) max_summary_iterations: usize,
    pub(crate) max_depth: Option<usize>,
    pub(crate) summaries: FxHashMap<MethodId, SummaryCache<A::Summary>>,
    pub(crate) stack: Vec<Frame>,
    /// Cycle members whose summaries are still tentative, promoted together
    /// once the frame that closed their cycle finishes.
    pub(crate) deferred: Vec<MethodId>,
}

impl<'p, P, A: Analysis> Analyzer<'p, P, A> {
    /// Create an analyzer over `program` driving `analysis`.
    pub fn new(program: &'p P, analysis: A) -> Self {
        Analyzer {
            program,
            analysis,
            widening: WideningStrategy::Delayed(2),
            max_iterations: 1000,
            narrowing_iterations: 2,
            max_summary_iterations: 50,
            max_depth: None,
            summaries: FxHashMap::default(),
            stack: Vec::new(),
            deferred: Vec::new(),
        }
    }

    // -- Builder methods ----------------------------------------------------

    /// Configure widening behavior at fixpoint merge points.
    pub fn with_widening(mut self, strategy: WideningStrategy) -> Self {
        self.widening = strategy;
        self
    }

    /// Configure the worklist iteration cap for one method's fixpoint.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Configure post-fixpoint narrowing sweeps.
    pub fn with_narrowing_iterations(mut self, n: usize) -> Self {
        self.narrowing_iterations = n;
        self
    }

    /// Configure the cap on summary-refinement rounds per method.
    pub fn with_max_summary_iterations(mut self, n: usize) -> Self {
        self.max_summary_iterations = n;
        self
    }

    /// Configure the maximum inter-procedural descent depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    // -- Accessors -----------------------------------------------------------

    pub fn program(&self) -> &'p P {
        self.program
    }

    pub fn analysis(&self) -> &A {
        &self.analysis
    }

    /// The servable summary for `callee` (fixed or memoized), if any.
    pub fn summary(&self, callee: MethodId) -> Option<&A::Summary> {
        self.summaries.get(&callee).and_then(SummaryCache::lookup)
    }

    /// Install an immutable summary for `callee`. The engine serves it at
    /// every call site targeting `callee` and never analyzes the body,
    /// which is how library methods without a CFG are modeled.
    pub fn insert_fixed_summary(&mut self, callee: MethodId, summary: A::Summary) {
        self.summaries
            .entry(callee)
            .or_default()
            .set_fixed(summary);
    }

    /// Drop the memoized summary for `callee`, keeping a fixed one.
    pub fn invalidate_summary(&mut self, callee: MethodId) {
        if let Some(cache) = self.summaries.get_mut(&callee) {
            cache.invalidate();
        }
    }

    /// Remove all summaries for `callee`, including a fixed one.
    pub fn remove_summary(&mut self, callee: MethodId) -> bool {
        self.summaries.remove(&callee).is_some()
    }
}
