/// A lattice of abstract values, ordered by `is_subseteq`.
///
/// `join` is the least upper bound, `meet` the greatest lower bound. Both
/// must be commutative, associative, and idempotent, and consistent with
/// the ordering: `a.is_subseteq(b)` iff `a.join(b) == b` iff
/// `a.meet(b) == a`.
pub trait Lattice {
    fn join(&self, other: &Self) -> Self;
    fn meet(&self, other: &Self) -> Self;
    fn is_subseteq(&self, other: &Self) -> bool;
}

/// Lattices with a least element.
///
/// `bottom()` is the identity for `join` and the zero for `meet`; the
/// engine uses it for uninitialized preconditions.
pub trait HasBottom: Lattice {
    fn bottom() -> Self;
}

/// Lattices with a greatest element.
pub trait HasTop: Lattice {
    fn top() -> Self;
}
