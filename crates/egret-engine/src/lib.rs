mod analysis;
mod analyzer;
mod error;
mod fixpoint;
mod result;
mod state;
mod summary;
mod value;
mod widening;

pub use analysis::{Analysis, CallOutcome};
pub use analyzer::Analyzer;
pub use error::AnalysisError;
pub use result::MethodAnalysis;
pub use state::StateMap;
pub use summary::SummaryCache;
pub use value::AbstractValue;
pub use widening::WideningStrategy;
