//! Smoke test through the umbrella crate: build a tiny two-method program
//! and run the leak analysis over it via the prelude surface.

use egret::domains::Count;
use egret::leak::{find_leaks, EffectTable};
use egret::prelude::*;
use egret_test_utils::{call_to, TestProgram};

#[test]
fn leaking_helper_is_caught_through_the_facade() {
    let mut program = TestProgram::new();

    // helper: open without close
    let mut h = Cfg::builder();
    let open = h.call(MethodRef::new("File", "open"));
    let hret = h.ret();
    h.edge(open, hret);
    program.add_method("helper", h.build());

    // main: call helper, return
    let mut m = Cfg::builder();
    let call = m.call(call_to("helper"));
    let mret = m.ret();
    m.edge(call, mret);
    let main = program.add_method("main", m.build());

    let effects = EffectTable::new().opens("File", "open").closes("File", "close");
    let report = find_leaks(&program, main, effects).unwrap();
    assert_eq!(report.open_at_exit, Count::Finite(1));
    assert!(report.leaks());
}

#[test]
fn balanced_program_passes_through_the_facade() {
    let mut program = TestProgram::new();

    let mut m = Cfg::builder();
    let open = m.call(MethodRef::new("File", "open"));
    let close = m.call(MethodRef::new("File", "close"));
    let mret = m.ret();
    m.edge(open, close);
    m.edge(close, mret);
    let main = program.add_method("main", m.build());

    let effects = EffectTable::new().opens("File", "open").closes("File", "close");
    let report = find_leaks(&program, main, effects).unwrap();
    assert!(!report.leaks());
}
