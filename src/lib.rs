//! Umbrella crate re-exporting the analysis stack: CFG and program
//! abstractions, abstract domains, the inter-procedural fixpoint engine,
//! and the resource-leak analysis built on top of it.

pub use egret_domains as domains;
pub use egret_engine as engine;
pub use egret_graph as graph;
pub use egret_leak as leak;

pub mod prelude {
    pub use egret_engine::{Analysis, AnalysisError, Analyzer, WideningStrategy};
    pub use egret_graph::{Cfg, HasBottom, HasTop, Lattice, MethodId, MethodRef, Program};
}
