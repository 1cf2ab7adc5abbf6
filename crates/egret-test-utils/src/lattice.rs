//! Assertion helpers for lattice algebraic laws.
//!
//! Each checker runs over a caller-supplied sample of elements and gathers
//! every violation before panicking, so a broken implementation reports all
//! failing laws in one go.
//!
//! # Example
//!
//! ```
//! use egret_test_utils::lattice::assert_finite_lattice_laws;
//! use egret_test_utils::Rank;
//!
//! // Bottom and top are exercised automatically alongside the samples.
//! assert_finite_lattice_laws(&[Rank(1), Rank(2)]);
//! ```

use std::fmt::{Debug, Write};

use egret_graph::{HasBottom, HasTop, Lattice};

fn report(violations: Vec<String>) {
    if violations.is_empty() {
        return;
    }
    let mut msg = format!("{} lattice law violation(s):\n", violations.len());
    for (i, v) in violations.iter().enumerate() {
        let _ = writeln!(msg, "  {}. {v}", i + 1);
    }
    panic!("{msg}");
}

/// Check the core lattice laws over `elements`: idempotence, commutativity,
/// and associativity of both `join` and `meet`, the absorption laws, and
/// agreement between `is_subseteq` and the two operators.
pub fn assert_lattice_laws<L: Lattice + PartialEq + Debug>(elements: &[L]) {
    let mut violations = Vec::new();
    check_operator_laws(elements, &mut violations);
    check_ordering(elements, &mut violations);
    report(violations);
}

/// Check the bottom element laws over `elements`: bottom is below every
/// element, is the identity of `join`, and annihilates `meet`.
pub fn assert_bottom_laws<L: HasBottom + PartialEq + Debug>(elements: &[L]) {
    let mut violations = Vec::new();
    check_bottom(elements, &mut violations);
    report(violations);
}

/// Check the top element laws over `elements`: every element is below top,
/// top annihilates `join`, and is the identity of `meet`.
pub fn assert_top_laws<L: HasTop + PartialEq + Debug>(elements: &[L]) {
    let mut violations = Vec::new();
    check_top(elements, &mut violations);
    report(violations);
}

/// Check everything: the core lattice laws plus the bottom and top element
/// laws, with `bottom()` and `top()` added to the sample set.
pub fn assert_finite_lattice_laws<L>(elements: &[L])
where
    L: HasBottom + HasTop + Clone + PartialEq + Debug,
{
    let mut samples: Vec<L> = elements.to_vec();
    samples.push(L::bottom());
    samples.push(L::top());

    let mut violations = Vec::new();
    check_operator_laws(&samples, &mut violations);
    check_ordering(&samples, &mut violations);
    check_bottom(&samples, &mut violations);
    check_top(&samples, &mut violations);
    report(violations);
}

fn check_operator_laws<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        if a.join(a) != *a {
            v.push(format!("join not idempotent at {a:?}"));
        }
        if a.meet(a) != *a {
            v.push(format!("meet not idempotent at {a:?}"));
        }
        for b in elements {
            if a.join(b) != b.join(a) {
                v.push(format!("join not commutative for ({a:?}, {b:?})"));
            }
            if a.meet(b) != b.meet(a) {
                v.push(format!("meet not commutative for ({a:?}, {b:?})"));
            }
            if a.join(&a.meet(b)) != *a {
                v.push(format!("join/meet absorption violated for ({a:?}, {b:?})"));
            }
            if a.meet(&a.join(b)) != *a {
                v.push(format!("meet/join absorption violated for ({a:?}, {b:?})"));
            }
            for c in elements {
                if a.join(b).join(c) != a.join(&b.join(c)) {
                    v.push(format!("join not associative for ({a:?}, {b:?}, {c:?})"));
                }
                if a.meet(b).meet(c) != a.meet(&b.meet(c)) {
                    v.push(format!("meet not associative for ({a:?}, {b:?}, {c:?})"));
                }
            }
        }
    }
}

fn check_ordering<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        for b in elements {
            let sub = a.is_subseteq(b);
            if sub != (a.join(b) == *b) {
                v.push(format!(
                    "is_subseteq disagrees with join for ({a:?}, {b:?}): got {sub}"
                ));
            }
            if sub != (a.meet(b) == *a) {
                v.push(format!(
                    "is_subseteq disagrees with meet for ({a:?}, {b:?}): got {sub}"
                ));
            }
        }
    }
}

fn check_bottom<L: HasBottom + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    let bot = L::bottom();
    for x in elements {
        if !bot.is_subseteq(x) {
            v.push(format!("bottom not below {x:?}"));
        }
        if bot.join(x) != *x {
            v.push(format!("bottom is not the join identity at {x:?}"));
        }
        if bot.meet(x) != bot {
            v.push(format!("bottom does not annihilate meet at {x:?}"));
        }
    }
}

fn check_top<L: HasTop + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    let top = L::top();
    for x in elements {
        if !x.is_subseteq(&top) {
            v.push(format!("{x:?} not below top"));
        }
        if top.join(x) != top {
            v.push(format!("top does not annihilate join at {x:?}"));
        }
        if top.meet(x) != *x {
            v.push(format!("top is not the meet identity at {x:?}"));
        }
    }
}
