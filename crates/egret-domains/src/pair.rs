use egret_graph::{HasBottom, HasTop, Lattice};

/// Pointwise product of two lattices.
///
/// `Pair` lets two independent analyses run as one combined fixpoint: every
/// operation delegates component-wise, so
/// `join((a1,b1),(a2,b2)) == (a1 ⊔ a2, b1 ⊔ b2)` and likewise for `meet`,
/// ordering, widening, and narrowing.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Pair<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Pair { first, second }
    }
}

impl<A: Lattice, B: Lattice> Lattice for Pair<A, B> {
    fn join(&self, other: &Self) -> Self {
        Pair {
            first: self.first.join(&other.first),
            second: self.second.join(&other.second),
        }
    }

    fn meet(&self, other: &Self) -> Self {
        Pair {
            first: self.first.meet(&other.first),
            second: self.second.meet(&other.second),
        }
    }

    fn is_subseteq(&self, other: &Self) -> bool {
        self.first.is_subseteq(&other.first) && self.second.is_subseteq(&other.second)
    }
}

impl<A: HasBottom, B: HasBottom> HasBottom for Pair<A, B> {
    fn bottom() -> Self {
        Pair {
            first: A::bottom(),
            second: B::bottom(),
        }
    }
}

impl<A: HasTop, B: HasTop> HasTop for Pair<A, B> {
    fn top() -> Self {
        Pair {
            first: A::top(),
            second: B::top(),
        }
    }
}

#[cfg(feature = "engine")]
impl<A, B> egret_engine::AbstractValue for Pair<A, B>
where
    A: egret_engine::AbstractValue,
    B: egret_engine::AbstractValue,
{
    fn widen(&self, next: &Self) -> Self {
        Pair {
            first: self.first.widen(&next.first),
            second: self.second.widen(&next.second),
        }
    }

    fn narrow(&self, next: &Self) -> Self {
        Pair {
            first: self.first.narrow(&next.first),
            second: self.second.narrow(&next.second),
        }
    }
}
