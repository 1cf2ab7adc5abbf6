//! Shared test helpers: lattice law checkers and an in-memory
//! [`Program`](egret_graph::Program) for wiring up small call graphs.

pub mod lattice;
mod program;

pub use program::{call_to, TestProgram};

use egret_graph::{HasBottom, HasTop, Lattice};

/// A four-element chain used by the law-checker docs and tests.
///
/// Ordered by the contained level, with `Rank(0)` as bottom and `Rank(3)`
/// as top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rank(pub u8);

impl Rank {
    pub const MAX: u8 = 3;
}

impl Lattice for Rank {
    fn join(&self, other: &Self) -> Self {
        Rank(self.0.max(other.0))
    }

    fn meet(&self, other: &Self) -> Self {
        Rank(self.0.min(other.0))
    }

    fn is_subseteq(&self, other: &Self) -> bool {
        self.0 <= other.0
    }
}

impl HasBottom for Rank {
    fn bottom() -> Self {
        Rank(0)
    }
}

impl HasTop for Rank {
    fn top() -> Self {
        Rank(Rank::MAX)
    }
}
