use crate::cfg::Cfg;
use crate::method::{MethodId, MethodRef};

/// Call-target resolution failure.
///
/// Resolution failures are fatal to the enclosing analysis: a static result
/// is considered void if any call site could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No method matches the reference.
    #[error("no method matching '{call}'")]
    Unknown { call: MethodRef },
    /// More than one candidate matches and the provider cannot narrow it.
    #[error("ambiguous call target '{call}': {candidates} candidates")]
    Ambiguous { call: MethodRef, candidates: usize },
}

/// The host-compiler side of the analysis: everything the engine consumes
/// from its collaborators.
///
/// One implementation bundles the CFG provider, the call-target resolver,
/// and the caller filter. The engine holds a shared reference to it for the
/// duration of one analysis run and never mutates it.
pub trait Program {
    /// The CFG of `method`, or `None` if no body is available (e.g. an
    /// external method only describable via a fixed summary).
    fn cfg(&self, method: MethodId) -> Option<&Cfg>;

    /// Resolve a call-site reference to its concrete callee.
    fn resolve(&self, call: &MethodRef) -> Result<MethodId, ResolveError>;

    /// Whether `method` is in scope for inter-procedural descent. Filtered
    /// methods are treated as having no effect at their call sites.
    fn should_analyze(&self, method: MethodId) -> bool {
        let _ = method;
        true
    }
}
