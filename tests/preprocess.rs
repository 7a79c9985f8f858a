mod common;

use {
    common::*,
    sprep::{
        assign::AssignIF,
        cdb::{ClauseDBIF, ClauseIF},
        processor::Tusize,
        proof::{DratWriter, ProofLog, ProofSink},
        types::*,
        Config, Preprocessor,
    },
};

fn only(config: Config) -> Config {
    Config {
        enable_subsume: false,
        enable_bve: false,
        enable_bce: false,
        enable_ee: false,
        enable_twosat: false,
        enable_probe: false,
        ..config
    }
}

fn solve_and_extend(pp: &Preprocessor) -> Option<Vec<i32>> {
    let exported = split_stream(&pp.dump_formula());
    let nv = exported
        .iter()
        .flatten()
        .map(|l| l.unsigned_abs() as usize)
        .max()
        .unwrap_or(0);
    let mut model = Dpll::new(nv, &exported).solve()?;
    pp.extend_model(&mut model).expect("no bug");
    Some(model)
}

#[test]
fn unit_chain_is_unsat() {
    let cnf = vec![vec![1, 2], vec![-1, 2], vec![-2]];
    let mut pp = Preprocessor::try_from(cnf.clone()).expect("valid");
    let log = ProofLog::default();
    pp.set_proof_sink(Box::new(log.clone()));
    assert_eq!(pp.preprocess(), Status::Unsat);
    assert_eq!(check_proof(&cnf, &log.steps()), Ok(()));
}

#[test]
fn middle_var_is_eliminated() {
    let cnf = vec![vec![1, 2, 3], vec![-1, 2], vec![-2, 3]];
    let config = Config {
        enable_subsume: true,
        enable_bve: true,
        ..only(Config::default())
    };
    let mut pp = Preprocessor::try_from((config, cnf.as_slice())).expect("valid");
    pp.freeze(1).expect("live");
    pp.freeze(3).expect("live");
    let status = pp.preprocess();
    assert_ne!(status, Status::Unsat);
    assert!(pp.ctx.asg.is(2, FlagVar::ELIMINATED));
    assert_eq!(pp.give_new_literal(Lit::from(2i32)), None);
    let model = solve_and_extend(&pp).expect("satisfiable");
    assert!(satisfies(&model, &cnf));
}

#[test]
fn equivalent_literals_are_substituted() {
    // (1 <-> 2); the ternary clauses aren't in the implication graph
    let cnf = vec![vec![-1, 2], vec![-2, 1], vec![1, 3, 4], vec![-2, -3, -4]];
    let config = Config {
        enable_ee: true,
        ..only(Config::default())
    };
    let mut pp = Preprocessor::try_from((config, cnf.as_slice())).expect("valid");
    assert_eq!(pp.preprocess(), Status::Unknown);
    assert!(pp.ctx.asg.is(2, FlagVar::SUBSTITUTED));
    assert_eq!(pp.ctx.derefer(Tusize::NumSubstitutedVar), 1);
    let dump = pp.dump_formula();
    assert!(dump.iter().all(|l| l.abs() != 2));
    for m in [vec![1, -3, 4], vec![-1, 3, 4]] {
        let mut model = m.clone();
        pp.extend_model(&mut model).expect("no bug");
        assert_eq!(0 < model[0], 0 < model[1]);
        assert!(satisfies(&model, &cnf));
    }
}

#[test]
fn frozen_vars_survive_everything() {
    let cnf = vec![
        vec![1, 2],
        vec![-1, 3],
        vec![-2, 3, 4],
        vec![-3, -4],
        vec![2, 4, 5],
        vec![-5, 1],
    ];
    let config = Config {
        enable_dense: true,
        ..Config::default()
    };
    let mut pp = Preprocessor::try_from((config, cnf.as_slice())).expect("valid");
    for vi in [2, 5] {
        pp.freeze(vi).expect("live");
    }
    assert_ne!(pp.preprocess(), Status::Unsat);
    for vi in [2, 5] {
        assert!(!pp.ctx.asg.is(vi, FlagVar::ELIMINATED));
        assert!(!pp.ctx.asg.is(vi, FlagVar::SUBSTITUTED));
        assert!(pp.give_new_literal(Lit::from(vi as i32)).is_some());
    }
    let model = solve_and_extend(&pp).expect("satisfiable");
    assert!(satisfies(&model, &cnf));
}

#[test]
fn growth_is_bounded() {
    // eliminating any var of the 3 x 3 grid adds clauses
    let cnf = vec![
        vec![1, 2, 3],
        vec![4, 5, 6],
        vec![7, 8, 9],
        vec![-1, -4, -7],
        vec![-2, -5, -8],
        vec![-3, -6, -9],
        vec![-1, -5, -9],
        vec![-3, -5, -7],
    ];
    let config = Config {
        enable_bve: true,
        bve_grow: 0,
        bve_blocked: false,
        ..only(Config::default())
    };
    let mut pp = Preprocessor::try_from((config, cnf.as_slice())).expect("valid");
    pp.preprocess();
    assert!(pp.ctx.cdb.derefer(sprep::cdb::property::Tusize::NumActive) <= cnf.len());
    if let Some(model) = solve_and_extend(&pp) {
        assert!(satisfies(&model, &cnf));
    } else {
        assert!(brute_force(9, &cnf).is_none());
    }
}

#[test]
fn subsumption_is_idempotent() {
    let cnf = vec![
        vec![1, 2],
        vec![1, 2, 3],
        vec![-1, 2, 4],
        vec![1, -3, 4],
        vec![2, 4, 5],
        vec![-2, -4],
    ];
    let config = Config {
        enable_subsume: true,
        ..only(Config::default())
    };
    let mut pp = Preprocessor::try_from((config, cnf.as_slice())).expect("valid");
    pp.preprocess();
    let first = pp.dump_formula();
    let changes = pp.ctx.num_changes();
    pp.preprocess();
    assert_eq!(pp.dump_formula(), first);
    assert_eq!(pp.ctx.num_changes(), changes);
}

#[test]
fn handles_stay_valid_over_compaction() {
    let mut cnf = Vec::new();
    for i in 1..=12 {
        cnf.push(vec![i, i + 1, -(i + 2)]);
        cnf.push(vec![-i, i + 2]);
    }
    let mut pp = Preprocessor::try_from(cnf.clone()).expect("valid");
    for vi in [1, 7, 14] {
        pp.freeze(vi).expect("live");
    }
    pp.preprocess();
    assert!(pp.ctx.check_consistency().is_ok());
    for cr in pp.ctx.cdb.refs() {
        assert!(pp.ctx.cdb.get(cr).map_or(false, |c| !c.is_dead()));
    }
    let model = solve_and_extend(&pp).expect("satisfiable");
    assert!(satisfies(&model, &cnf));
}

#[test]
fn parallel_elimination_through_preprocessor() {
    let mut cnf = Vec::new();
    for i in 1..=10 {
        cnf.push(vec![i, i + 1, i + 2]);
        cnf.push(vec![-i, -(i + 1)]);
        cnf.push(vec![-(i + 1), -(i + 2), i]);
    }
    let config = Config {
        enable_bve: true,
        bve_threads: 4,
        ..only(Config::default())
    };
    let mut pp = Preprocessor::try_from((config, cnf.as_slice())).expect("valid");
    let status = pp.preprocess();
    assert!(0 < pp.ctx.derefer(Tusize::NumEliminatedVar));
    match solve_and_extend(&pp) {
        Some(model) => assert!(satisfies(&model, &cnf)),
        None => assert_eq!(status, Status::Unsat),
    }
}

#[test]
fn inprocess_keeps_models_valid() {
    let cnf = vec![
        vec![1, 2, -3],
        vec![-1, 3, 4],
        vec![2, -4, 5],
        vec![-2, -5, 6],
        vec![3, -6, 1],
        vec![-3, 4, -6],
    ];
    let mut pp = Preprocessor::try_from(cnf.clone()).expect("valid");
    for vi in [1, 2, 6] {
        pp.freeze(vi).expect("live");
    }
    pp.preprocess();
    pp.add_clause([6, -1]).expect("live vars");
    pp.add_clause([-6, 2]).expect("live vars");
    assert_ne!(pp.inprocess(), Status::Unsat);
    let mut extended = cnf.clone();
    extended.push(vec![6, -1]);
    extended.push(vec![-6, 2]);
    let model = solve_and_extend(&pp).expect("satisfiable");
    assert!(satisfies(&model, &extended));
}

#[test]
fn drat_writer_receives_steps() {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut w = DratWriter::new(&mut buf);
        w.on_clause_added(&[Lit::from(-3i32)]);
        w.on_clause_removed(&[Lit::from(1i32), Lit::from(-2i32)]);
        w.on_clause_added(&[]);
        w.close();
        assert_eq!(w.stats(), (2, 1));
    }
    assert_eq!(String::from_utf8(buf).expect("utf8"), "-3 0\nd 1 -2 0\n0\n");
}
