use egret_graph::{HasBottom, HasTop, Lattice};

/// Non-negative counter domain ordered by magnitude.
///
/// `join` is max and `meet` is min over the total order
/// `Finite(0) ≤ Finite(1) ≤ … ≤ Unbounded`. The bottom element is zero;
/// `Unbounded` is the top element, normally only introduced by widening
/// (e.g. a resource opened inside a loop).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Count {
    Finite(u64),
    Unbounded,
}

impl Count {
    pub const ZERO: Count = Count::Finite(0);

    pub fn is_zero(&self) -> bool {
        matches!(self, Count::Finite(0))
    }

    /// Count one more open resource. `Unbounded` absorbs.
    pub fn increment(self) -> Self {
        match self {
            Count::Finite(n) => Count::Finite(n.saturating_add(1)),
            Count::Unbounded => Count::Unbounded,
        }
    }

    /// Count one resource closed.
    ///
    /// Policy: decrementing zero is a no-op. The counter clamps at its
    /// floor rather than going negative, so a close without a matching open
    /// never produces a value outside the domain.
    pub fn decrement(self) -> Self {
        match self {
            Count::Finite(n) => Count::Finite(n.saturating_sub(1)),
            Count::Unbounded => Count::Unbounded,
        }
    }

    /// Add two counts. `Unbounded` absorbs.
    pub fn saturating_add(self, other: Self) -> Self {
        match (self, other) {
            (Count::Finite(a), Count::Finite(b)) => Count::Finite(a.saturating_add(b)),
            _ => Count::Unbounded,
        }
    }
}

impl Lattice for Count {
    fn join(&self, other: &Self) -> Self {
        (*self).max(*other)
    }

    fn meet(&self, other: &Self) -> Self {
        (*self).min(*other)
    }

    fn is_subseteq(&self, other: &Self) -> bool {
        self <= other
    }
}

impl HasBottom for Count {
    fn bottom() -> Self {
        Count::ZERO
    }
}

impl HasTop for Count {
    fn top() -> Self {
        Count::Unbounded
    }
}

#[cfg(feature = "engine")]
impl egret_engine::AbstractValue for Count {
    /// Any strict increase jumps straight to `Unbounded`: a counter still
    /// growing at a widening point will grow forever.
    fn widen(&self, next: &Self) -> Self {
        if self < next { Count::Unbounded } else { *self }
    }

    fn narrow(&self, next: &Self) -> Self {
        match self {
            Count::Unbounded => *next,
            finite => *finite,
        }
    }
}
