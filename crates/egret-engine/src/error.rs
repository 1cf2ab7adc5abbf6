use egret_graph::{MethodId, ResolveError};

/// Error type for analysis failures.
///
/// Any error aborts the whole analysis run: the engine unwinds through every
/// in-progress method with no partial results. User-defined failures go in
/// the [`Custom`](Self::Custom) variant via [`AnalysisError::custom`].
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A call target could not be resolved.
    #[error(transparent)]
    Unresolved(#[from] ResolveError),
    /// A method was reached that has neither a CFG nor a fixed summary.
    #[error("no control flow graph for method {0:?}")]
    MissingCfg(MethodId),
    /// The intra-procedural worklist did not reach a fixpoint within the
    /// configured iteration cap.
    #[error("fixpoint not reached within {limit} worklist iterations")]
    NotConverged { limit: usize },
    /// Summary refinement over a call cycle did not stabilize.
    #[error("summaries did not stabilize within {limit} refinement rounds")]
    SummaryNotConverged { limit: usize },
    /// Inter-procedural descent exceeded the configured depth cap.
    #[error("call depth exceeded maximum of {0}")]
    MaxDepthExceeded(usize),
    /// User-defined error.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl AnalysisError {
    /// Wrap an arbitrary error as [`AnalysisError::Custom`].
    pub fn custom(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        AnalysisError::Custom(Box::new(error))
    }
}
