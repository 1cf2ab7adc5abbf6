mod boolor;
mod count;
mod pair;

pub use boolor::BoolOr;
pub use count::Count;
pub use pair::Pair;
