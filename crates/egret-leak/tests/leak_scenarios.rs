use egret_domains::{BoolOr, Count, Pair};
use egret_engine::{AnalysisError, Analyzer};
use egret_graph::{Cfg, NodeId};
use egret_leak::{find_leaks, EffectTable, LeakAnalysis, LeakSummary};
use egret_test_utils::{call_to, TestProgram};

fn file_effects() -> EffectTable {
    EffectTable::new().opens("File", "open").closes("File", "close")
}

/// open -> close -> return
fn balanced_cfg() -> (Cfg, NodeId) {
    let mut b = Cfg::builder();
    let open = b.call(call_to("open_file"));
    let close = b.call(call_to("close_file"));
    let ret = b.ret();
    b.edge(open, close);
    b.edge(close, ret);
    (b.build(), ret)
}

fn raw_effects() -> EffectTable {
    EffectTable::new()
        .opens("Test", "open_file")
        .closes("Test", "close_file")
}

#[test]
fn balanced_open_close_does_not_leak() {
    let mut program = TestProgram::new();
    let (cfg, ret) = balanced_cfg();
    let main = program.add_method("main", cfg);

    let analysis = LeakAnalysis::new(raw_effects());
    let mut analyzer = Analyzer::new(&program, analysis);
    let result = analyzer.analyze(main).unwrap();

    assert_eq!(
        result.precondition(ret),
        Pair::new(Count::ZERO, BoolOr::FALSE)
    );
    assert_eq!(
        result.exit_value(),
        Some(&Pair::new(Count::ZERO, BoolOr::FALSE))
    );
}

#[test]
fn unclosed_open_leaks() {
    let mut program = TestProgram::new();
    let mut b = Cfg::builder();
    let open = b.call(call_to("open_file"));
    let ret = b.ret();
    b.edge(open, ret);
    let main = program.add_method("main", b.build());

    let report = find_leaks(&program, main, raw_effects()).unwrap();
    assert_eq!(report.open_at_exit, Count::Finite(1));
    assert!(report.escaped);
    assert!(report.leaks());
}

#[test]
fn leaking_branch_taints_the_join() {
    // One branch opens without closing, the other does nothing.
    let mut program = TestProgram::new();
    let mut b = Cfg::builder();
    let branch = b.other();
    let open = b.call(call_to("open_file"));
    let noop = b.other();
    let ret = b.ret();
    b.edge(branch, open);
    b.edge(branch, noop);
    b.edge(open, ret);
    b.edge(noop, ret);
    let main = program.add_method("main", b.build());

    let report = find_leaks(&program, main, raw_effects()).unwrap();
    assert!(report.escaped);
    assert!(report.leaks());
}

#[test]
fn helper_summary_is_reused_across_call_sites() {
    // helper: open -> return, called twice from main; its body must be
    // walked exactly once.
    let mut program = TestProgram::new();

    let mut h = Cfg::builder();
    let open = h.call(call_to("open_file"));
    let hret = h.ret();
    h.edge(open, hret);
    let helper = program.add_method("helper", h.build());

    let mut m = Cfg::builder();
    let first = m.call(call_to("helper"));
    let second = m.call(call_to("helper"));
    let mret = m.ret();
    m.edge(first, second);
    m.edge(second, mret);
    let main = program.add_method("main", m.build());

    let analysis = LeakAnalysis::new(raw_effects());
    let mut analyzer = Analyzer::new(&program, analysis);
    let result = analyzer.analyze(main).unwrap();

    assert_eq!(
        result.exit_value(),
        Some(&Pair::new(Count::Finite(2), BoolOr::TRUE))
    );
    assert_eq!(program.cfg_fetches(helper), 1);
    assert_eq!(
        analyzer.summary(helper),
        Some(&LeakSummary {
            delta: Count::Finite(1),
            escaped: BoolOr::TRUE,
        })
    );
}

#[test]
fn self_recursive_open_widens_to_unbounded() {
    // f: open -> call f -> return
    let mut program = TestProgram::new();
    let mut b = Cfg::builder();
    let open = b.call(call_to("open_file"));
    let rec = b.call(call_to("f"));
    let ret = b.ret();
    b.edge(open, rec);
    b.edge(rec, ret);
    let f = program.add_method("f", b.build());

    let report = find_leaks(&program, f, raw_effects()).unwrap();
    assert_eq!(report.open_at_exit, Count::Unbounded);
    assert!(report.escaped);
}

#[test]
fn mutual_recursion_terminates() {
    // a calls b, b calls a; neither touches a resource.
    let mut program = TestProgram::new();

    let mut ab = Cfg::builder();
    let call_b = ab.call(call_to("b"));
    let aret = ab.ret();
    ab.edge(call_b, aret);
    let a = program.add_method("a", ab.build());

    let mut bb = Cfg::builder();
    let call_a = bb.call(call_to("a"));
    let bret = bb.ret();
    bb.edge(call_a, bret);
    program.add_method("b", bb.build());

    let report = find_leaks(&program, a, file_effects()).unwrap();
    assert_eq!(report.open_at_exit, Count::ZERO);
    assert!(!report.leaks());
}

#[test]
fn unresolved_call_aborts_the_analysis() {
    let mut program = TestProgram::new();
    let mut b = Cfg::builder();
    let call = b.call(call_to("nowhere"));
    let ret = b.ret();
    b.edge(call, ret);
    let main = program.add_method("main", b.build());

    let err = find_leaks(&program, main, file_effects()).unwrap_err();
    assert!(matches!(err, AnalysisError::Unresolved(_)));

    // The failure leaves no shared state behind; a fresh run over a clean
    // program is unaffected.
    let mut clean = TestProgram::new();
    let (cfg, _) = balanced_cfg();
    let main = clean.add_method("main", cfg);
    assert!(find_leaks(&clean, main, raw_effects()).is_ok());
}

#[test]
fn skipped_callee_has_no_effect() {
    let mut program = TestProgram::new();

    let mut h = Cfg::builder();
    let open = h.call(call_to("open_file"));
    let hret = h.ret();
    h.edge(open, hret);
    let helper = program.add_method("helper", h.build());
    program.skip(helper);

    let mut m = Cfg::builder();
    let call = m.call(call_to("helper"));
    let mret = m.ret();
    m.edge(call, mret);
    let main = program.add_method("main", m.build());

    let report = find_leaks(&program, main, raw_effects()).unwrap();
    assert!(!report.leaks());
    assert_eq!(program.cfg_fetches(helper), 0);
}

#[test]
fn fixed_summary_models_a_method_without_a_body() {
    let mut program = TestProgram::new();
    let acquire = program.declare("acquire");

    let mut m = Cfg::builder();
    let call = m.call(call_to("acquire"));
    let close = m.call(call_to("close_file"));
    let mret = m.ret();
    m.edge(call, close);
    m.edge(close, mret);
    let main = program.add_method("main", m.build());

    let mut analyzer = Analyzer::new(&program, LeakAnalysis::new(raw_effects()));
    analyzer.insert_fixed_summary(
        acquire,
        LeakSummary {
            delta: Count::Finite(1),
            escaped: BoolOr::FALSE,
        },
    );
    let result = analyzer.analyze(main).unwrap();
    assert_eq!(
        result.exit_value(),
        Some(&Pair::new(Count::ZERO, BoolOr::FALSE))
    );
    assert_eq!(program.cfg_fetches(acquire), 0);

    // Without the fixed summary the body-less callee is an error.
    let mut bare = Analyzer::new(&program, LeakAnalysis::new(raw_effects()));
    let err = bare.analyze(main).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingCfg(id) if id == acquire));
}

#[test]
fn owner_identity_distinguishes_targets() {
    // "Socket.noop" is not in the effect table, so it goes through summary
    // handling and resolves to a method that does nothing.
    let mut program = TestProgram::new();

    let mut n = Cfg::builder();
    n.ret();
    program.add_method("noop", n.build());

    let mut m = Cfg::builder();
    let call = m.call(egret_graph::MethodRef::new("Socket", "noop"));
    let mret = m.ret();
    m.edge(call, mret);
    let main = program.add_method("main", m.build());

    let report = find_leaks(&program, main, raw_effects()).unwrap();
    assert!(!report.leaks());
}

#[test]
fn double_close_stays_at_zero() {
    let mut program = TestProgram::new();
    let mut b = Cfg::builder();
    let open = b.call(call_to("open_file"));
    let c1 = b.call(call_to("close_file"));
    let c2 = b.call(call_to("close_file"));
    let ret = b.ret();
    b.edge(open, c1);
    b.edge(c1, c2);
    b.edge(c2, ret);
    let main = program.add_method("main", b.build());

    let report = find_leaks(&program, main, raw_effects()).unwrap();
    assert_eq!(report.open_at_exit, Count::ZERO);
    assert!(!report.leaks());
}

#[test]
fn loop_with_balanced_body_converges_finite() {
    // while (...) { open; close; } return
    let mut program = TestProgram::new();
    let mut b = Cfg::builder();
    let head = b.other();
    let open = b.call(call_to("open_file"));
    let close = b.call(call_to("close_file"));
    let ret = b.ret();
    b.edge(head, open);
    b.edge(open, close);
    b.edge(close, head);
    b.edge(head, ret);
    let main = program.add_method("main", b.build());

    let report = find_leaks(&program, main, raw_effects()).unwrap();
    assert_eq!(report.open_at_exit, Count::ZERO);
    assert!(!report.leaks());
}

#[test]
fn loop_that_opens_every_iteration_is_unbounded() {
    // while (...) { open; } return
    let mut program = TestProgram::new();
    let mut b = Cfg::builder();
    let head = b.other();
    let open = b.call(call_to("open_file"));
    let ret = b.ret();
    b.edge(head, open);
    b.edge(open, head);
    b.edge(head, ret);
    let main = program.add_method("main", b.build());

    let report = find_leaks(&program, main, raw_effects()).unwrap();
    assert_eq!(report.open_at_exit, Count::Unbounded);
    assert!(report.escaped);
}
