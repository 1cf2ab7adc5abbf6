use std::cell::RefCell;

use egret_graph::{Cfg, MethodId, MethodRef, Program, ResolveError};
use rustc_hash::{FxHashMap, FxHashSet};

/// The call-site reference tests use for a [`TestProgram`] method named
/// `name`. All test methods share the owner type `"Test"`.
pub fn call_to(name: &str) -> MethodRef {
    MethodRef::new("Test", name)
}

/// An in-memory [`Program`] for tests.
///
/// Methods are registered by name and resolved by name, so CFGs can be
/// wired up with [`call_to`] before their targets exist. CFG fetches are
/// counted per method, letting tests assert that a callee body was walked
/// exactly once regardless of its number of call sites.
#[derive(Default)]
pub struct TestProgram {
    bodies: Vec<Option<Cfg>>,
    by_name: FxHashMap<String, MethodId>,
    skipped: FxHashSet<MethodId>,
    ambiguous: FxHashSet<String>,
    fetches: RefCell<FxHashMap<MethodId, usize>>,
}

impl TestProgram {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, body: Option<Cfg>) -> MethodId {
        let id = MethodId::new(self.bodies.len() as u32);
        self.bodies.push(body);
        assert!(
            self.by_name.insert(name.to_owned(), id).is_none(),
            "duplicate test method '{name}'"
        );
        id
    }

    /// Register a method with a body.
    pub fn add_method(&mut self, name: &str, cfg: Cfg) -> MethodId {
        self.register(name, Some(cfg))
    }

    /// Register a resolvable method without a body, as a host compiler
    /// would expose an external method.
    pub fn declare(&mut self, name: &str) -> MethodId {
        self.register(name, None)
    }

    /// Exclude `method` from inter-procedural descent.
    pub fn skip(&mut self, method: MethodId) {
        self.skipped.insert(method);
    }

    /// Make every call to `name` fail resolution as ambiguous.
    pub fn mark_ambiguous(&mut self, name: &str) {
        self.ambiguous.insert(name.to_owned());
    }

    /// How many times the engine fetched `method`'s CFG.
    pub fn cfg_fetches(&self, method: MethodId) -> usize {
        self.fetches
            .borrow()
            .get(&method)
            .copied()
            .unwrap_or_default()
    }
}

impl Program for TestProgram {
    fn cfg(&self, method: MethodId) -> Option<&Cfg> {
        *self.fetches.borrow_mut().entry(method).or_insert(0) += 1;
        self.bodies.get(method.index())?.as_ref()
    }

    fn resolve(&self, call: &MethodRef) -> Result<MethodId, ResolveError> {
        if self.ambiguous.contains(call.name()) {
            return Err(ResolveError::Ambiguous {
                call: call.clone(),
                candidates: 2,
            });
        }
        self.by_name
            .get(call.name())
            .copied()
            .ok_or_else(|| ResolveError::Unknown { call: call.clone() })
    }

    fn should_analyze(&self, method: MethodId) -> bool {
        !self.skipped.contains(&method)
    }
}
