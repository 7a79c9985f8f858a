//! Module `processor` implements the simplification techniques and the
//! context they work on.
//!
//! * private module `simplify` provides unit propagation over clauses
//! * private module `subsume` provides clause subsumption and self-subsuming resolution
//! * private module `heap` provides the var order for elimination
//! * private module `eliminate` provides bounded variable elimination
//! * private module `parallel` provides a multi-threaded variable elimination
//! * private module `equivalence` provides equivalent literal substitution
//! * private module `twosat` provides a 2-SAT solver on binary clauses
//! * private module `probe` provides failed literal probing
//! * private module `bce` provides blocked clause elimination
//! * private module `dense` provides var renumbering
//!
//!# Example
//!
//!```
//!  use sprep::{config::Config, processor::*, types::*};
//!  let cnf = CNFDescription { num_of_variables: 3, ..CNFDescription::default() };
//!  let mut ctx = EngineContext::instantiate(&Config::default(), &cnf);
//!  for c in [vec![1i32, 2], vec![-1, 2], vec![-2, 3]] {
//!      ctx.add_clause(c.iter().map(|i| Lit::from(*i)).collect(), false).expect("consistent");
//!  }
//!  let mut elim = Eliminator::instantiate(&ctx.config, &cnf);
//!  assert_eq!(elim.process(&mut ctx), Status::Sat);
//!  assert!(0 < ctx.derefer(property::Tusize::NumEliminatedVar));
//!```

mod bce;
mod dense;
mod eliminate;
mod equivalence;
mod heap;
mod parallel;
mod probe;
mod simplify;
mod subsume;
mod twosat;

pub use self::{
    bce::BlockedClause, dense::Densifier, eliminate::Eliminator, equivalence::Equivalence,
    parallel::ParallelEliminator, probe::Prober, simplify::UnitPropagator, subsume::Subsumer,
    twosat::TwoSat,
};

use {
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{normalize, ClauseDB, ClauseDBIF, ClauseIF, OccurIndex, RelocateIF, Relocation},
        extend::ExtensionStack,
        proof::ProofSink,
        types::*,
    },
    rand::{rngs::StdRng, SeedableRng},
    std::{
        fmt,
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
    },
};

/// Events which change the set of vars or their state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessorEvent {
    /// a var was assigned at root level.
    Assert(VarId),
    /// a var was eliminated by resolution or blocked clause removal.
    Eliminate(VarId),
    /// a new var was added.
    NewVar,
    /// clear caches bound to the current formula.
    Reinitialize,
    /// a var was replaced by its representative.
    Substitute(VarId),
}

/// API for simplification techniques.
///
/// A technique mutates the formula only through [`EngineContext`], so the
/// orchestrator can detect progress by the change counter of the context.
pub trait Technique {
    /// return the name used in logs.
    fn name(&self) -> &'static str;
    /// return the budget of this technique.
    fn budget(&mut self) -> &mut Budget;
    /// run the technique once.
    /// Return `Status::Unsat` if the empty clause was derived, `Status::Sat` if
    /// no clause remains, `Status::Unknown` otherwise.
    fn process(&mut self, ctx: &mut EngineContext) -> Status;
    /// clear caches bound to a run.
    fn reset(&mut self) {}
    /// drop all caches; called between full runs.
    fn destroy(&mut self) {
        self.reset();
    }
    /// update clause handles held over a compaction.
    fn relocate(&mut self, _map: &Relocation) {}
}

/// Step budget and penalty backoff of a technique.
///
/// A step is a literal visit, roughly. An unsuccessful run blocks the
/// technique for a number of rounds which grows by one at every failure.
#[derive(Clone, Debug, Default)]
pub struct Budget {
    steps_used: usize,
    steps_limit: usize,
    penalty: usize,
    last_max_penalty: usize,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Budget {
    /// start a run with a step limit.
    pub fn start(&mut self, limit: usize, interrupt: &Arc<AtomicBool>) {
        self.steps_used = 0;
        self.steps_limit = limit;
        self.interrupt = Some(Arc::clone(interrupt));
    }
    /// consume `n` steps; return `false` if the technique should stop.
    #[inline]
    pub fn spend(&mut self, n: usize) -> bool {
        self.steps_used += n;
        if let Some(ref flag) = self.interrupt {
            if flag.load(Ordering::Relaxed) {
                self.steps_used = self.steps_limit.max(self.steps_used);
                return false;
            }
        }
        self.steps_used < self.steps_limit
    }
    /// return `true` if the steps run out.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.steps_limit <= self.steps_used
    }
    pub fn steps_used(&self) -> usize {
        self.steps_used
    }
    pub fn steps_limit(&self) -> usize {
        self.steps_limit
    }
    /// return `true` if the technique may run now; otherwise reduce the penalty.
    pub fn perform(&mut self) -> bool {
        if self.penalty == 0 {
            return true;
        }
        self.penalty -= 1;
        false
    }
    /// block the technique for more rounds than the last time.
    pub fn unsuccessful(&mut self) {
        self.last_max_penalty += 1;
        self.penalty = self.last_max_penalty;
    }
    /// forget penalties.
    pub fn clear_penalty(&mut self) {
        self.penalty = 0;
        self.last_max_penalty = 0;
    }
}

/// Counters about simplification.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    pub num_subsumed: usize,
    pub num_strengthened: usize,
    pub num_eliminated_var: usize,
    pub num_resolvents: usize,
    pub num_blocked: usize,
    pub num_gates: usize,
    pub num_substituted_var: usize,
    pub num_failed_lit: usize,
    pub num_necessary_assign: usize,
    pub num_twosat_unit: usize,
    pub num_unit: usize,
    pub num_postponed: usize,
    pub num_postpone_overflow: usize,
    pub num_hidden_tautology: usize,
    pub num_hidden_literal: usize,
}

/// The owner of everything a technique touches.
pub struct EngineContext {
    pub config: Config,
    pub cdb: ClauseDB,
    pub occur: OccurIndex,
    pub asg: AssignStack,
    pub ext: ExtensionStack,
    pub proof: Option<Box<dyn ProofSink + Send>>,
    pub rng: StdRng,
    pub interrupted: Arc<AtomicBool>,
    /// `true` while running `inprocess`; step limits are scaled.
    pub inprocessing: bool,
    pub stats: Stats,
    /// the length of the trail whose literals have been applied to clauses
    pub(crate) num_applied: usize,
    num_changes: usize,
    /// the first invariant violation found; no model can be trusted after it.
    poisoned: Option<String>,
    unsat: bool,
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("cdb", &self.cdb)
            .field("asg", &self.asg)
            .field("ext", &self.ext)
            .field("stats", &self.stats)
            .field("num_changes", &self.num_changes)
            .field("unsat", &self.unsat)
            .finish()
    }
}

impl Instantiate for EngineContext {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Self {
        EngineContext {
            config: config.clone(),
            cdb: ClauseDB::instantiate(config, cnf),
            occur: OccurIndex::instantiate(config, cnf),
            asg: AssignStack::instantiate(config, cnf),
            ext: ExtensionStack::default(),
            proof: None,
            rng: StdRng::seed_from_u64(config.seed),
            interrupted: Arc::new(AtomicBool::new(false)),
            inprocessing: false,
            stats: Stats::default(),
            num_applied: 0,
            num_changes: 0,
            poisoned: None,
            unsat: false,
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        match e {
            ProcessorEvent::NewVar => {
                self.asg.handle(e);
                self.occur.handle(e);
            }
            ProcessorEvent::Eliminate(_) | ProcessorEvent::Substitute(_) => {
                self.asg.handle(e);
                self.num_changes += 1;
            }
            ProcessorEvent::Assert(_) => self.num_changes += 1,
            ProcessorEvent::Reinitialize => self.asg.handle(e),
        }
    }
}

impl EngineContext {
    /// return the number of vars.
    pub fn num_vars(&self) -> usize {
        self.asg.num_vars
    }
    /// return a counter increased by every structural change.
    pub fn num_changes(&self) -> usize {
        self.num_changes
    }
    /// record a change which isn't made through the methods of the context.
    pub fn touch(&mut self) {
        self.num_changes += 1;
    }
    /// return `true` if the empty clause was derived.
    pub fn is_unsat(&self) -> bool {
        self.unsat
    }
    /// return the message of the first invariant violation if any.
    pub fn poisoned(&self) -> Option<&str> {
        self.poisoned.as_deref()
    }
    /// return `true` if the interrupt flag is raised.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
    /// return a step limit for a run of a technique.
    pub fn step_limit(&self, base: usize) -> usize {
        self.config.step_limit(base, self.inprocessing)
    }
    /// return `true` if var `vi` is frozen.
    pub fn is_frozen(&self, vi: VarId) -> bool {
        self.asg.is(vi, FlagVar::FROZEN)
    }
    /// return `true` if var `vi` may be eliminated or substituted.
    pub fn is_removable(&self, vi: VarId) -> bool {
        self.asg.assign(vi).is_none() && self.asg.is_removable(vi)
    }
    /// convert the result of a technique to a status, recording UNSAT and bugs.
    pub fn conclude(&mut self, r: MaybeInconsistent) -> Status {
        match r {
            Ok(()) if self.cdb.is_empty() => Status::Sat,
            Ok(()) => Status::Unknown,
            Err(e) if e.is_unsat() => {
                if !self.unsat {
                    self.unsat = true;
                    self.notify_added(&[]);
                }
                Status::Unsat
            }
            Err(SolverError::Interrupted) => Status::Unknown,
            Err(SolverError::SolverBug(msg)) => {
                log::error!("{msg}");
                self.poisoned.get_or_insert(msg);
                Status::Unknown
            }
            Err(e) => {
                log::warn!("a technique stopped by {e}");
                Status::Unknown
            }
        }
    }
    /// report an invariant violation. Panics in debug builds.
    pub fn bug(&mut self, msg: String) -> SolverError {
        debug_assert!(false, "{msg}");
        SolverError::SolverBug(msg)
    }
    pub(crate) fn notify_added(&mut self, lits: &[Lit]) {
        if let Some(ref mut p) = self.proof {
            p.on_clause_added(lits);
        }
    }
    pub(crate) fn notify_removed(&mut self, lits: &[Lit]) {
        if let Some(ref mut p) = self.proof {
            p.on_clause_removed(lits);
        }
    }
    /// add a clause derived from the current formula.
    ///
    /// The literals are normalized; tautologies and satisfied clauses are
    /// dropped, falsified literals are removed, and a unit is assigned at root
    /// level. Return the handle if a clause was stored.
    ///
    /// # Errors
    ///
    /// `EmptyClause` if every literal is false; `RootLevelConflict` if a unit
    /// conflicts.
    pub fn add_clause(
        &mut self,
        lits: Vec<Lit>,
        redundant: bool,
    ) -> Result<Option<ClauseRef>, SolverError> {
        self.store_clause(lits, redundant, true)
    }
    /// add a clause given from outside; it isn't reported as a derived one
    /// unless falsified literals are removed from it.
    pub fn import_clause(
        &mut self,
        lits: Vec<Lit>,
        redundant: bool,
    ) -> Result<Option<ClauseRef>, SolverError> {
        self.store_clause(lits, redundant, false)
    }
    fn store_clause(
        &mut self,
        mut lits: Vec<Lit>,
        redundant: bool,
        derived: bool,
    ) -> Result<Option<ClauseRef>, SolverError> {
        if lits.iter().any(|l| self.asg.num_vars < l.vi() || l.vi() == 0) {
            return Err(SolverError::OutOfRange);
        }
        if normalize(&mut lits) {
            return Ok(None);
        }
        if self.asg.satisfies(&lits) {
            return Ok(None);
        }
        let len = lits.len();
        lits.retain(|l| self.asg.assigned(*l).is_none());
        let shrunk = lits.len() < len;
        match lits.len() {
            0 => Err(SolverError::EmptyClause),
            1 => {
                self.assign_unit(lits[0])?;
                Ok(None)
            }
            _ => {
                if derived || shrunk {
                    self.notify_added(&lits);
                }
                let cr = self.cdb.new_clause(lits, redundant);
                self.occur.add(cr, self.cdb[cr].lits());
                self.num_changes += 1;
                Ok(Some(cr))
            }
        }
    }
    /// assign a literal at root level as a derived unit clause.
    pub fn assign_unit(&mut self, l: Lit) -> MaybeInconsistent {
        match self.asg.assigned(l) {
            Some(true) => Ok(()),
            Some(false) => Err(SolverError::RootLevelConflict(l)),
            None => {
                if self.asg.is(l.vi(), FlagVar::ELIMINATED)
                    || self.asg.is(l.vi(), FlagVar::SUBSTITUTED)
                {
                    return Err(self.bug(format!("assigning a removed var by {l}")));
                }
                self.notify_added(&[l]);
                self.asg.assign_at_root_level(l)?;
                self.stats.num_unit += 1;
                self.handle(ProcessorEvent::Assert(l.vi()));
                Ok(())
            }
        }
    }
    /// remove a live clause from the formula.
    pub fn remove_clause(&mut self, cr: ClauseRef) {
        let EngineContext {
            cdb, occur, proof, ..
        } = self;
        let c = &cdb[cr];
        debug_assert!(!c.is_dead(), "removing a dead clause {cr}{c}");
        if let Some(p) = proof {
            p.on_clause_removed(c.lits());
        }
        occur.remove(cr, c.lits());
        cdb.remove_clause(cr);
        self.num_changes += 1;
    }
    /// remove `lit` from clause `cr`. A clause shrunk to a unit is removed and
    /// its literal is assigned.
    pub fn strengthen(&mut self, cr: ClauseRef, lit: Lit) -> MaybeInconsistent {
        let c = &self.cdb[cr];
        debug_assert!(c.contains(lit), "{cr}{c} doesn't contain {lit}");
        if c.len() == 2 {
            let other = if c[0] == lit { c[1] } else { c[0] };
            self.assign_unit(other)?;
            self.remove_clause(cr);
            return Ok(());
        }
        if self.proof.is_some() {
            let old = c.lits().to_vec();
            let new = old.iter().copied().filter(|l| *l != lit).collect::<Vec<_>>();
            self.notify_added(&new);
            self.notify_removed(&old);
        }
        self.cdb.strengthen_clause(cr, lit);
        self.occur.remove_lit(cr, lit);
        self.stats.num_strengthened += 1;
        self.num_changes += 1;
        Ok(())
    }
    /// replace the literals of a clause with a new set derived from it.
    /// Return the new handle if a clause remains.
    pub fn replace_clause(
        &mut self,
        cr: ClauseRef,
        lits: Vec<Lit>,
    ) -> Result<Option<ClauseRef>, SolverError> {
        let redundant = self.cdb[cr].is_redundant();
        let new = self.add_clause(lits, redundant)?;
        self.remove_clause(cr);
        Ok(new)
    }
    /// make a redundant clause irredundant.
    pub fn make_irredundant(&mut self, cr: ClauseRef) {
        self.cdb.make_irredundant(cr);
    }
    /// push a record on the extension stack.
    pub fn push_record(&mut self, chosen: Lit, lits: &[Lit]) {
        self.ext.push_record(chosen, lits);
    }
    /// remove clause `cr` and keep it on the extension stack with `chosen`.
    pub fn remove_clause_with_record(&mut self, cr: ClauseRef, chosen: Lit) {
        if !self.cdb[cr].is_redundant() {
            let EngineContext { cdb, ext, .. } = self;
            ext.push_record(chosen, cdb[cr].lits());
        }
        self.remove_clause(cr);
    }
    /// rebuild the arena with live clauses and relocate the occurrence index
    /// and `holders`.
    pub fn compact(&mut self, holders: &mut [&mut dyn RelocateIF]) -> Relocation {
        let map = self.cdb.compact(holders);
        self.occur.relocate(&map);
        log::debug!(
            "compaction: {} clauses survive at epoch {}",
            map.num_survivors(),
            self.cdb.epoch()
        );
        map
    }
    /// return the live clauses as DIMACS vectors.
    pub fn clauses_as_i32(&self) -> Vec<Vec<i32>> {
        self.cdb
            .iter()
            .filter(|c| !c.is_dead())
            .map(Vec::<i32>::from)
            .collect()
    }
    /// check the occurrence index against the arena.
    pub fn check_consistency(&mut self) -> MaybeInconsistent {
        if let Err(msg) = self.occur.check_consistency(&self.cdb) {
            return Err(self.bug(msg));
        }
        Ok(())
    }
    /// cancel assignments above root level.
    pub fn cancel_to_root(&mut self) {
        self.asg.cancel_until(0);
    }
    /// drop every live clause without reporting to the proof sink.
    /// The clauses are owned by a solver from now on.
    pub fn release_clauses(&mut self) {
        for cr in self.cdb.refs() {
            let EngineContext { cdb, occur, .. } = self;
            occur.remove(cr, cdb[cr].lits());
            cdb.remove_clause(cr);
        }
        self.num_changes += 1;
    }
}

pub mod property {
    use super::EngineContext;
    use crate::types::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Tusize {
        NumBlocked,
        NumChanges,
        NumEliminatedVar,
        NumFailedLiteral,
        NumGate,
        NumHiddenLiteral,
        NumHiddenTautology,
        NumNecessaryAssign,
        NumPostponed,
        NumPostponeOverflow,
        NumResolvent,
        NumStrengthened,
        NumSubstitutedVar,
        NumSubsumed,
        NumTwoSatUnit,
        NumUnit,
        NumRecord,
    }

    impl PropertyDereference<Tusize, usize> for EngineContext {
        #[inline]
        fn derefer(&self, k: Tusize) -> usize {
            match k {
                Tusize::NumBlocked => self.stats.num_blocked,
                Tusize::NumChanges => self.num_changes(),
                Tusize::NumEliminatedVar => self.stats.num_eliminated_var,
                Tusize::NumFailedLiteral => self.stats.num_failed_lit,
                Tusize::NumGate => self.stats.num_gates,
                Tusize::NumHiddenLiteral => self.stats.num_hidden_literal,
                Tusize::NumHiddenTautology => self.stats.num_hidden_tautology,
                Tusize::NumNecessaryAssign => self.stats.num_necessary_assign,
                Tusize::NumPostponed => self.stats.num_postponed,
                Tusize::NumPostponeOverflow => self.stats.num_postpone_overflow,
                Tusize::NumResolvent => self.stats.num_resolvents,
                Tusize::NumStrengthened => self.stats.num_strengthened,
                Tusize::NumSubstitutedVar => self.stats.num_substituted_var,
                Tusize::NumSubsumed => self.stats.num_subsumed,
                Tusize::NumTwoSatUnit => self.stats.num_twosat_unit,
                Tusize::NumUnit => self.stats.num_unit,
                Tusize::NumRecord => self.ext.len(),
            }
        }
    }
}

pub use self::property::Tusize;

#[cfg(test)]
pub(crate) mod tests {
    use {super::*, crate::proof::ProofLog};

    pub(crate) fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|i| Lit::from(*i)).collect()
    }

    pub(crate) fn setup(nv: usize, clauses: &[&[i32]]) -> EngineContext {
        let cnf = CNFDescription {
            num_of_variables: nv,
            num_of_clauses: clauses.len(),
        };
        let mut ctx = EngineContext::instantiate(&Config::default(), &cnf);
        for c in clauses {
            ctx.import_clause(lits(c), false).expect("consistent");
        }
        ctx
    }

    /// return the live clauses as sorted DIMACS vectors.
    pub(crate) fn live(ctx: &EngineContext) -> Vec<Vec<i32>> {
        let mut v = ctx.clauses_as_i32();
        for c in v.iter_mut() {
            c.sort_unstable();
        }
        v.sort_unstable();
        v
    }

    /// find a model of the live clauses under the root assignment by
    /// enumeration. Vars out of the clauses keep their root values or `None`.
    pub(crate) fn brute_force_model(ctx: &EngineContext) -> Option<Vec<Option<bool>>> {
        let clauses = ctx.clauses_as_i32();
        let mut vars = clauses
            .iter()
            .flatten()
            .map(|l| l.unsigned_abs() as usize)
            .collect::<Vec<_>>();
        vars.sort_unstable();
        vars.dedup();
        assert!(vars.len() <= 20, "too many vars for enumeration");
        let mut model = ctx.asg.assign_ref().to_vec();
        for bits in 0..(1usize << vars.len()) {
            for (i, vi) in vars.iter().enumerate() {
                model[*vi] = Some(bits & (1 << i) != 0);
            }
            if clauses
                .iter()
                .all(|c| c.iter().any(|l| model[l.unsigned_abs() as usize] == Some(0 < *l)))
            {
                return Some(model);
            }
        }
        None
    }

    /// return `true` if `model` satisfies all `clauses`.
    pub(crate) fn satisfies(model: &[Option<bool>], clauses: &[&[i32]]) -> bool {
        clauses.iter().all(|c| {
            c.iter()
                .any(|l| model[l.unsigned_abs() as usize] == Some(0 < *l))
        })
    }

    #[test]
    fn test_budget_penalty() {
        let mut b = Budget::default();
        assert!(b.perform());
        b.unsuccessful();
        assert!(!b.perform());
        assert!(b.perform());
        b.unsuccessful();
        assert!(!b.perform());
        assert!(!b.perform());
        assert!(b.perform());
    }
    #[test]
    fn test_budget_steps_and_interrupt() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut b = Budget::default();
        b.start(10, &flag);
        assert!(b.spend(5));
        assert!(!b.spend(5));
        assert!(b.is_exhausted());
        b.start(10, &flag);
        flag.store(true, Ordering::Relaxed);
        assert!(!b.spend(1));
        assert!(b.is_exhausted());
    }
    #[test]
    fn test_add_clause() {
        let mut ctx = setup(4, &[]);
        assert_eq!(ctx.add_clause(lits(&[1, -1, 2]), false), Ok(None));
        assert!(ctx.add_clause(lits(&[2, 1, 2]), false).expect("").is_some());
        assert_eq!(ctx.add_clause(lits(&[3]), false), Ok(None));
        assert_eq!(ctx.asg.assigned(Lit::from(3i32)), Some(true));
        assert_eq!(ctx.add_clause(lits(&[3, 4]), false), Ok(None));
        let cr = ctx.add_clause(lits(&[-3, 4, 1]), false).expect("").expect("");
        assert_eq!(Vec::<i32>::from(&ctx.cdb[cr]), vec![1, 4]);
        assert_eq!(ctx.add_clause(lits(&[-3]), false), Err(SolverError::EmptyClause));
        assert_eq!(
            ctx.assign_unit(Lit::from(-3i32)),
            Err(SolverError::RootLevelConflict(Lit::from(-3i32)))
        );
        assert_eq!(ctx.add_clause(lits(&[5]), false), Err(SolverError::OutOfRange));
        assert!(ctx.check_consistency().is_ok());
    }
    #[test]
    fn test_strengthen_and_proof() {
        let mut ctx = setup(3, &[&[1, 2, 3], &[-1, 2]]);
        let log = ProofLog::default();
        ctx.proof = Some(Box::new(log.clone()));
        let cr = ctx.cdb.refs()[0];
        ctx.strengthen(cr, Lit::from(3i32)).expect("");
        assert_eq!(Vec::<i32>::from(&ctx.cdb[cr]), vec![1, 2]);
        ctx.strengthen(cr, Lit::from(1i32)).expect("");
        assert!(ctx.cdb[cr].is_dead());
        assert_eq!(ctx.asg.assigned(Lit::from(2i32)), Some(true));
        assert_eq!(
            log.steps(),
            vec![
                (true, vec![1, 2]),
                (false, vec![1, 2, 3]),
                (true, vec![2]),
                (false, vec![1, 2]),
            ]
        );
        assert!(ctx.check_consistency().is_ok());
    }
    #[test]
    fn test_conclude() {
        let mut ctx = setup(2, &[&[1, 2]]);
        assert_eq!(ctx.conclude(Ok(())), Status::Unknown);
        assert_eq!(ctx.conclude(Err(SolverError::Interrupted)), Status::Unknown);
        assert!(!ctx.is_unsat());
        assert_eq!(ctx.conclude(Err(SolverError::EmptyClause)), Status::Unsat);
        assert!(ctx.is_unsat());
    }
    #[test]
    fn test_compaction_keeps_index() {
        let mut ctx = setup(3, &[&[1, 2], &[-1, 2, 3], &[-2, -3]]);
        let crs = ctx.cdb.refs();
        ctx.remove_clause(crs[1]);
        let mut held = vec![crs[2]];
        ctx.compact(&mut [&mut held]);
        assert_eq!(Vec::<i32>::from(&ctx.cdb[held[0]]), vec![-2, -3]);
        assert!(ctx.check_consistency().is_ok());
    }
}
