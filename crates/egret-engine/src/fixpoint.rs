use std::collections::VecDeque;

use egret_graph::{Cfg, Lattice, MethodId, MethodRef, NodeId, NodeKind, Program};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::analyzer::{Analyzer, Frame};
use crate::state::StateMap;
use crate::value::AbstractValue;
use crate::summary::SummaryCache;
use crate::{Analysis, AnalysisError, CallOutcome, MethodAnalysis};

impl<P: Program, A: Analysis> Analyzer<'_, P, A> {
    /// Analyze `root` and, transitively, every in-scope method it calls.
    ///
    /// Returns the converged per-node states of `root`. Callee results are
    /// retained as summaries, queryable through
    /// [`summary`](Analyzer::summary) and reused by later `analyze` calls on
    /// the same instance.
    pub fn analyze(&mut self, root: MethodId) -> Result<MethodAnalysis<A::Value>, AnalysisError> {
        log::debug!("starting analysis at root {root:?}");
        self.analyze_method(root)
    }

    fn analyze_method(
        &mut self,
        method: MethodId,
    ) -> Result<MethodAnalysis<A::Value>, AnalysisError> {
        if let Some(limit) = self.max_depth {
            if self.stack.len() >= limit {
                return Err(AnalysisError::MaxDepthExceeded(limit));
            }
        }
        let cfg = self
            .program
            .cfg(method)
            .ok_or(AnalysisError::MissingCfg(method))?;

        // Seed the tentative slot so recursive call sites reached during
        // this run have something to consume.
        let optimistic = self.analysis.optimistic_summary(method);
        self.summaries
            .entry(method)
            .or_default()
            .set_tentative(optimistic);
        self.stack.push(Frame::new(method));
        log::debug!("analyzing {method:?} at depth {}", self.stack.len());

        let outcome = self.refine(method, cfg);
        let frame = self.stack.pop().expect("analysis stack underflow");

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                // Leave no stale tentative entries behind on the error path.
                if let Some(cache) = self.summaries.get_mut(&method) {
                    cache.invalidate();
                }
                for deferred in self.deferred.drain(..) {
                    if let Some(cache) = self.summaries.get_mut(&deferred) {
                        cache.invalidate();
                    }
                }
                return Err(err);
            }
        };

        let summary = self.analysis.summarize(method, &result);
        // The cycle is still open while any frame below this one is marked;
        // this method's result may then shift when those frames refine.
        let cycle_open =
            frame.used_tentative && self.stack.iter().any(|f| f.used_tentative);
        let cache = self.summaries.entry(method).or_default();
        if cycle_open {
            cache.set_tentative(summary);
            self.deferred.push(method);
        } else {
            cache.promote_tentative(summary);
            if frame.used_tentative {
                // This frame closed its cycle, so the members' last-round
                // summaries are final too.
                for deferred in self.deferred.drain(..) {
                    if let Some(cache) = self.summaries.get_mut(&deferred) {
                        cache.finalize_tentative();
                    }
                }
            }
        }
        Ok(result)
    }

    /// Run the intra-procedural fixpoint, iterating to a stable summary when
    /// `method` turns out to sit on a call cycle.
    ///
    /// Methods outside any cycle converge in a single worklist pass. Cycle
    /// members re-run under progressively larger tentative summaries until a
    /// round no longer grows the result, widening across rounds so the
    /// ascent terminates.
    fn refine(
        &mut self,
        method: MethodId,
        cfg: &Cfg,
    ) -> Result<MethodAnalysis<A::Value>, AnalysisError> {
        let mut current = self.run_fixpoint(method, cfg)?;
        if !self.in_cycle() {
            return Ok(current);
        }
        for round in 0..self.max_summary_iterations {
            let tentative = self.analysis.summarize(method, &current);
            self.summaries
                .entry(method)
                .or_default()
                .set_tentative(tentative);

            let next = self.run_fixpoint(method, cfg)?;
            let merged = current.merge_round(&next, self.widening, round);
            if merged.is_subseteq(&current) {
                log::debug!("summary for {method:?} stabilized after {round} refinements");
                return Ok(current);
            }
            current = merged;
        }
        Err(AnalysisError::SummaryNotConverged {
            limit: self.max_summary_iterations,
        })
    }

    fn in_cycle(&self) -> bool {
        self.stack.last().is_some_and(|f| f.used_tentative)
    }

    /// Resolve one call site to a servable summary.
    ///
    /// In order: out-of-scope callees are skipped, memoized or fixed
    /// summaries are served directly, callees already on the in-progress
    /// stack get their tentative summary (marking the whole cycle for
    /// refinement), and anything else is analyzed on the spot.
    pub fn call_outcome(
        &mut self,
        call: &MethodRef,
    ) -> Result<CallOutcome<A::Summary>, AnalysisError> {
        let callee = self.program.resolve(call)?;
        if !self.program.should_analyze(callee) {
            log::trace!("skipping out-of-scope callee {call}");
            return Ok(CallOutcome::Skipped);
        }
        if let Some(summary) = self.summary(callee) {
            return Ok(CallOutcome::Summary(summary.clone()));
        }
        if let Some(pos) = self.stack.iter().position(|f| f.method == callee) {
            log::trace!("recursive call to {call}, serving tentative summary");
            // Every frame from the recursion target up participates in the
            // cycle and must not finalize its summary yet.
            for frame in &mut self.stack[pos..] {
                frame.used_tentative = true;
            }
            let summary = match self.summaries.get(&callee).and_then(SummaryCache::tentative) {
                Some(tentative) => tentative.clone(),
                None => self.analysis.optimistic_summary(callee),
            };
            return Ok(CallOutcome::Summary(summary));
        }

        let result = self.analyze_method(callee)?;
        let summary = match self.summary(callee) {
            Some(summary) => summary.clone(),
            // Not promoted: the callee is tied into a cycle that is still
            // refining. Summarize what we have for this round.
            None => self.analysis.summarize(callee, &result),
        };
        Ok(CallOutcome::Summary(summary))
    }

    /// One worklist pass over `cfg` under the current summary table.
    fn run_fixpoint(
        &mut self,
        method: MethodId,
        cfg: &Cfg,
    ) -> Result<MethodAnalysis<A::Value>, AnalysisError> {
        let mut states: StateMap<A::Value> = StateMap::new();
        let entry = cfg.entry();
        states.set_precondition(entry, self.analysis.entry_value(method));

        let mut worklist: VecDeque<NodeId> = VecDeque::new();
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut revisits: FxHashMap<NodeId, usize> = FxHashMap::default();
        worklist.push_back(entry);

        let mut fuel = self.max_iterations;
        while let Some(node) = worklist.pop_front() {
            if fuel == 0 {
                return Err(AnalysisError::NotConverged {
                    limit: self.max_iterations,
                });
            }
            fuel -= 1;

            let first_visit = visited.insert(node);
            let pre = states.precondition(node);
            let post = self.exec_node(cfg, node, &pre)?;
            let changed = first_visit || post != states.postcondition(node);
            states.set_postcondition(node, post.clone());
            if !changed {
                continue;
            }

            for &succ in cfg.successors(node) {
                let merges = if visited.contains(&succ) {
                    let count = revisits.entry(succ).or_insert(0);
                    *count += 1;
                    *count
                } else {
                    0
                };
                let strategy = self.widening;
                let grew = states.merge_precondition(succ, &post, |cur, inc| {
                    strategy.merge(cur, inc, merges)
                });
                if (grew || !visited.contains(&succ)) && !worklist.contains(&succ) {
                    worklist.push_back(succ);
                }
            }
        }

        self.narrow(method, cfg, &mut states, &visited)?;

        let mut exit: Option<A::Value> = None;
        for node in cfg.nodes() {
            if visited.contains(&node) && matches!(cfg.kind(node), NodeKind::Return) {
                let post = states.postcondition(node);
                exit = Some(match exit {
                    Some(acc) => acc.join(&post),
                    None => post,
                });
            }
        }
        log::trace!(
            "fixpoint for {method:?} reached over {} nodes, exit {:?}",
            states.len(),
            exit.is_some()
        );
        Ok(MethodAnalysis::new(states, exit))
    }

    /// Descending sweeps after the fixpoint: recompute each precondition
    /// from its predecessors' final postconditions and narrow the stored
    /// value toward it. Recovers precision lost to widening where the
    /// recomputed inflow is genuinely smaller.
    fn narrow(
        &mut self,
        method: MethodId,
        cfg: &Cfg,
        states: &mut StateMap<A::Value>,
        visited: &FxHashSet<NodeId>,
    ) -> Result<(), AnalysisError> {
        let mut order: Vec<NodeId> = visited.iter().copied().collect();
        order.sort_unstable();

        for _ in 0..self.narrowing_iterations {
            let mut changed = false;
            for &node in &order {
                // The entry keeps its seed value; back edges into it still
                // contribute.
                let mut acc: Option<A::Value> = if node == cfg.entry() {
                    Some(self.analysis.entry_value(method))
                } else {
                    None
                };
                for pred in cfg.predecessors(node) {
                    if !visited.contains(pred) {
                        continue;
                    }
                    let post = states.postcondition(*pred);
                    acc = Some(match acc {
                        Some(acc) => acc.join(&post),
                        None => post,
                    });
                }
                let inflow = match acc {
                    Some(inflow) => inflow,
                    None => continue,
                };
                let narrowed = states.precondition(node).narrow(&inflow);
                if states.replace_precondition(node, narrowed.clone()) {
                    changed = true;
                }
                let post = self.exec_node(cfg, node, &narrowed)?;
                if post != states.postcondition(node) {
                    states.set_postcondition(node, post);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        Ok(())
    }

    fn exec_node(
        &mut self,
        cfg: &Cfg,
        node: NodeId,
        pre: &A::Value,
    ) -> Result<A::Value, AnalysisError> {
        match cfg.kind(node) {
            NodeKind::Call(target) => {
                if let Some(post) = self.analysis.call_effect(target, pre) {
                    return Ok(post);
                }
                match self.call_outcome(target)? {
                    CallOutcome::Summary(summary) => {
                        Ok(self.analysis.apply_summary(&summary, pre))
                    }
                    CallOutcome::Skipped => Ok(pre.clone()),
                }
            }
            NodeKind::Return => Ok(self.analysis.flow_return(pre)),
            NodeKind::Other => Ok(self.analysis.flow_other(node, pre)),
        }
    }
}
