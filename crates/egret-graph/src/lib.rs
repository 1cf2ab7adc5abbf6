mod cfg;
mod lattice;
mod method;
mod program;

pub use cfg::{Cfg, CfgBuilder, NodeId, NodeKind};
pub use lattice::{HasBottom, HasTop, Lattice};
pub use method::{MethodId, MethodRef};
pub use program::{Program, ResolveError};
