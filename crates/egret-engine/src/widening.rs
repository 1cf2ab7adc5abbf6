use crate::AbstractValue;

/// When to trade precision for termination at fixpoint merge points.
#[derive(Debug, Clone, Copy)]
pub enum WideningStrategy {
    /// Widen on every re-merge. Fastest convergence, least precise.
    Always,
    /// Only ever join. Sound for finite-height domains; on infinite-height
    /// domains the iteration cap is the only thing standing between the
    /// analysis and a `NotConverged` error.
    Never,
    /// Join for the first `n` re-merges of a node, then widen.
    Delayed(usize),
}

impl WideningStrategy {
    /// Merge `incoming` into `current` according to this strategy.
    ///
    /// `revisits` counts how many times the merge point has been re-merged
    /// (0 on the first visit).
    pub fn merge<V: AbstractValue>(&self, current: &V, incoming: &V, revisits: usize) -> V {
        match self {
            Self::Always => current.widen(incoming),
            Self::Never => current.join(incoming),
            Self::Delayed(n) => {
                if revisits <= *n {
                    current.join(incoming)
                } else {
                    current.widen(incoming)
                }
            }
        }
    }
}
