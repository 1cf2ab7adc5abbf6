use std::fmt;

/// A unique identifier for a method, assigned by the [`Program`] provider.
///
/// Summary tables and the inter-procedural descent are keyed by this
/// identity; it must be stable for the lifetime of one analysis.
///
/// [`Program`]: crate::Program
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MethodId(u32);

impl MethodId {
    pub const fn new(raw: u32) -> Self {
        MethodId(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Symbolic reference to a callee as written at a call site: the declaring
/// type plus the method name.
///
/// A `MethodRef` is not yet resolved; the [`Program`] provider maps it to
/// a concrete [`MethodId`]. It is also the key of effect allow-lists, which
/// match on the target's identity rather than on name substrings.
///
/// [`Program`]: crate::Program
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct MethodRef {
    owner: String,
    name: String,
}

impl MethodRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        MethodRef {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The declaring type of the callee.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The method name of the callee.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}
