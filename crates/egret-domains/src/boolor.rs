use egret_graph::{HasBottom, HasTop, Lattice};

/// Sticky boolean domain: once any path sets the flag, the join keeps it.
///
/// `join` is logical or and `meet` logical and; `FALSE` is bottom, `TRUE`
/// top. Used e.g. to record that a resource escaped on some path.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct BoolOr(pub bool);

impl BoolOr {
    pub const FALSE: BoolOr = BoolOr(false);
    pub const TRUE: BoolOr = BoolOr(true);

    pub fn is_set(&self) -> bool {
        self.0
    }
}

impl Lattice for BoolOr {
    fn join(&self, other: &Self) -> Self {
        BoolOr(self.0 | other.0)
    }

    fn meet(&self, other: &Self) -> Self {
        BoolOr(self.0 & other.0)
    }

    fn is_subseteq(&self, other: &Self) -> bool {
        !self.0 | other.0
    }
}

impl HasBottom for BoolOr {
    fn bottom() -> Self {
        BoolOr::FALSE
    }
}

impl HasTop for BoolOr {
    fn top() -> Self {
        BoolOr::TRUE
    }
}

#[cfg(feature = "engine")]
impl egret_engine::AbstractValue for BoolOr {
    // Two-element chain: plain join already terminates.
    fn widen(&self, next: &Self) -> Self {
        self.join(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egret_test_utils::lattice::assert_finite_lattice_laws;

    #[test]
    fn boolor_lattice_laws() {
        assert_finite_lattice_laws(&[BoolOr::FALSE, BoolOr::TRUE]);
    }

    #[test]
    fn join_is_sticky() {
        assert_eq!(BoolOr::FALSE.join(&BoolOr::TRUE), BoolOr::TRUE);
        assert_eq!(BoolOr::TRUE.join(&BoolOr::FALSE), BoolOr::TRUE);
        assert_eq!(BoolOr::TRUE.meet(&BoolOr::FALSE), BoolOr::FALSE);
    }
}
