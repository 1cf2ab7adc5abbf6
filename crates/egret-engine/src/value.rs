use egret_graph::HasBottom;

/// Lattice values usable by the fixpoint engine.
///
/// Extends [`HasBottom`] with widening and narrowing; `Clone` because values
/// are forked (never aliased) across CFG edges, `PartialEq` because fixpoint
/// convergence is detected by equality.
///
/// ## Algebraic contracts
///
/// **Widening**: `x ⊑ widen(x, y)` and `y ⊑ widen(x, y)`, and the ascending
/// chain `x₀, widen(x₀, x₁), widen(widen(x₀, x₁), x₂), …` stabilizes in
/// finitely many steps. This is what guarantees termination on domains of
/// infinite height.
///
/// **Narrowing**: `x ⊓ y ⊑ narrow(x, y) ⊑ x`; the descending chain must
/// also stabilize.
pub trait AbstractValue: HasBottom + Clone + PartialEq {
    /// Widen `self` with `next` to guarantee ascending-chain termination.
    fn widen(&self, next: &Self) -> Self;

    /// Narrow `self` with `next` to refine a post-fixpoint downward.
    ///
    /// Default: no refinement (returns `self`).
    fn narrow(&self, _next: &Self) -> Self {
        self.clone()
    }
}
