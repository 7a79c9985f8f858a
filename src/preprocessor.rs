//! Module `preprocessor` provides the top-level API: it owns the formula and
//! the techniques, runs them to a fixed point, and hands the result to a
//! solver and a model back to the caller.
use {
    crate::{
        assign::AssignIF,
        cdb::{ClauseDBIF, ClauseIF, Relocation},
        processor::{
            BlockedClause, Densifier, Eliminator, EngineContext, Equivalence, ParallelEliminator,
            Prober, Subsumer, Technique, TwoSat, UnitPropagator,
        },
        proof::ProofSink,
        types::*,
    },
    std::sync::{atomic::AtomicBool, Arc},
};

/// API of a CDCL solver which receives the simplified formula.
///
/// Literals are DIMACS integers in the numbering exported by
/// [`Preprocessor::dump_formula`].
pub trait SolverIF {
    /// return the number of vars.
    fn num_vars(&self) -> usize;
    /// return `false` if the solver has found its formula inconsistent.
    fn is_ok(&self) -> bool;
    /// return the literals assigned at root level.
    fn current_trail(&self) -> Vec<i32>;
    /// assign a literal at root level.
    fn assign(&mut self, lit: i32) -> MaybeInconsistent;
    /// propagate root level assignments.
    fn propagate(&mut self) -> MaybeInconsistent;
    /// remove all clauses from the solver and return them.
    fn take_clauses(&mut self) -> Vec<Vec<i32>>;
    /// add a clause.
    fn add_clause(&mut self, lits: &[i32]) -> MaybeInconsistent;
    /// suggest the polarity of a var found by 2-SAT.
    fn suggest_phase(&mut self, _lit: i32) {}
}

/// A stage of a pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Step {
    Units,
    TwoSat,
    Subsume,
    Equivalence,
    Probe,
    Eliminate,
    Blocked,
}

const PIPELINE: [Step; 7] = [
    Step::Units,
    Step::TwoSat,
    Step::Subsume,
    Step::Equivalence,
    Step::Probe,
    Step::Eliminate,
    Step::Blocked,
];

/// One instance of each technique.
#[derive(Clone, Debug)]
struct Techniques {
    units: UnitPropagator,
    twosat: TwoSat,
    subsumer: Subsumer,
    equivalence: Equivalence,
    prober: Prober,
    eliminator: Eliminator,
    parallel: ParallelEliminator,
    blocked: BlockedClause,
    dense: Densifier,
}

impl Instantiate for Techniques {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Self {
        Techniques {
            units: UnitPropagator::instantiate(config, cnf),
            twosat: TwoSat::instantiate(config, cnf),
            subsumer: Subsumer::instantiate(config, cnf),
            equivalence: Equivalence::instantiate(config, cnf),
            prober: Prober::instantiate(config, cnf),
            eliminator: Eliminator::instantiate(config, cnf),
            parallel: ParallelEliminator::instantiate(config, cnf),
            blocked: BlockedClause::instantiate(config, cnf),
            dense: Densifier::instantiate(config, cnf),
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        self.units.handle(e);
        self.twosat.handle(e);
        self.subsumer.handle(e);
        self.equivalence.handle(e);
        self.prober.handle(e);
        self.eliminator.handle(e);
        self.parallel.handle(e);
        self.blocked.handle(e);
        self.dense.handle(e);
    }
}

impl Techniques {
    /// return the technique for a step if it's enabled.
    fn select(&mut self, step: Step, config: &Config) -> Option<&mut dyn Technique> {
        match step {
            Step::Units => Some(&mut self.units),
            Step::TwoSat if config.enable_twosat => Some(&mut self.twosat),
            Step::Subsume if config.enable_subsume => Some(&mut self.subsumer),
            Step::Equivalence if config.enable_ee => Some(&mut self.equivalence),
            Step::Probe if config.enable_probe => Some(&mut self.prober),
            Step::Eliminate if config.enable_bve && 1 < config.bve_threads => {
                Some(&mut self.parallel)
            }
            Step::Eliminate if config.enable_bve => Some(&mut self.eliminator),
            Step::Blocked if config.enable_bce => Some(&mut self.blocked),
            _ => None,
        }
    }
    /// the techniques run in passes; the densifier isn't one of them.
    fn passes(&mut self) -> [&mut dyn Technique; 8] {
        [
            &mut self.units,
            &mut self.twosat,
            &mut self.subsumer,
            &mut self.equivalence,
            &mut self.prober,
            &mut self.eliminator,
            &mut self.parallel,
            &mut self.blocked,
        ]
    }
    fn relocate(&mut self, map: &Relocation) {
        for t in self.passes() {
            t.relocate(map);
        }
    }
    fn destroy(&mut self) {
        for t in self.passes() {
            t.destroy();
        }
    }
}

/// The preprocessor consisting of a context and the techniques.
///
/// ```
/// use sprep::{preprocessor::Preprocessor, types::*};
///
/// let mut pp = Preprocessor::try_from(vec![vec![1, 2, 3], vec![-1, 2], vec![-2, 3]])
///     .expect("valid");
/// assert_eq!(pp.preprocess(), Status::Sat);
/// let mut model = Vec::new();
/// pp.extend_model(&mut model).expect("no bug");
/// assert_eq!(model.len(), 3);
/// assert!(0 < model[2]);
/// ```
#[derive(Debug)]
pub struct Preprocessor {
    /// everything techniques touch
    pub ctx: EngineContext,
    tech: Techniques,
    num_runs: usize,
}

impl Instantiate for Preprocessor {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Preprocessor {
        Preprocessor {
            ctx: EngineContext::instantiate(config, cnf),
            tech: Techniques::instantiate(config, cnf),
            num_runs: 0,
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        self.ctx.handle(e);
        self.tech.handle(e);
    }
}

impl<V> TryFrom<(Config, &[V])> for Preprocessor
where
    V: AsRef<[i32]>,
{
    type Error = SolverError;
    /// build a preprocessor from clauses. An inconsistent formula isn't an
    /// error; it makes the first run return `Status::Unsat`.
    fn try_from((config, vec): (Config, &[V])) -> Result<Self, Self::Error> {
        let cnf = CNFDescription::from(vec);
        let mut pp = Preprocessor::instantiate(&config, &cnf);
        for c in vec.iter() {
            match pp.add_clause(c) {
                Ok(_) => (),
                Err(e) if e.is_unsat() => (),
                Err(e) => return Err(e),
            }
        }
        Ok(pp)
    }
}

impl<V: AsRef<[i32]>> TryFrom<Vec<V>> for Preprocessor {
    type Error = SolverError;
    fn try_from(vec: Vec<V>) -> Result<Self, Self::Error> {
        Preprocessor::try_from((Config::default(), vec.as_slice()))
    }
}

impl Preprocessor {
    /// return the number of vars in the original numbering.
    pub fn num_vars(&self) -> usize {
        self.ctx.num_vars()
    }
    /// add a var and return its id in the original numbering.
    pub fn new_var(&mut self) -> VarId {
        self.handle(ProcessorEvent::NewVar);
        let vi = self.ctx.num_vars();
        if self.tech.dense.is_active() {
            self.tech.dense.push_var(vi);
        }
        vi
    }
    /// add a clause in the original numbering. Vars are added on demand.
    ///
    /// # Errors
    ///
    /// * `SolverError::InvalidLiteral` if it contains 0 or a removed var.
    /// * `SolverError::EmptyClause` or `SolverError::RootLevelConflict` if the
    ///   formula became inconsistent; the next run returns `Status::Unsat`.
    pub fn add_clause<V>(&mut self, vec: V) -> Result<&mut Preprocessor, SolverError>
    where
        V: AsRef<[i32]>,
    {
        let mut lits = Vec::with_capacity(vec.as_ref().len());
        for i in vec.as_ref().iter() {
            if *i == 0 {
                return Err(SolverError::InvalidLiteral);
            }
            let l = Lit::from(*i);
            while self.ctx.num_vars() < l.vi() {
                self.new_var();
            }
            self.check_live(l)?;
            lits.push(l);
        }
        match self.ctx.import_clause(lits, false) {
            Ok(_) => Ok(self),
            Err(e) => {
                self.ctx.conclude(Err(e.clone()));
                Err(e)
            }
        }
    }
    /// protect var `vi` from elimination, substitution and renumbering.
    ///
    /// # Errors
    ///
    /// * `SolverError::OutOfRange` if `vi` isn't a var.
    /// * `SolverError::InvalidLiteral` if `vi` was removed already.
    pub fn freeze(&mut self, vi: VarId) -> MaybeInconsistent {
        if vi == 0 || self.ctx.num_vars() < vi {
            return Err(SolverError::OutOfRange);
        }
        self.check_live(Lit::from((vi, true)))?;
        self.ctx.asg.set(vi, FlagVar::FROZEN, true);
        Ok(())
    }
    /// allow var `vi` to be removed again.
    pub fn unfreeze(&mut self, vi: VarId) -> MaybeInconsistent {
        if vi == 0 || self.ctx.num_vars() < vi {
            return Err(SolverError::OutOfRange);
        }
        self.ctx.asg.set(vi, FlagVar::FROZEN, false);
        Ok(())
    }
    /// set the receiver of clause additions and deletions.
    pub fn set_proof_sink(&mut self, sink: Box<dyn ProofSink + Send>) {
        self.ctx.proof = Some(sink);
    }
    /// close and return the proof sink.
    pub fn take_proof_sink(&mut self) -> Option<Box<dyn ProofSink + Send>> {
        let mut sink = self.ctx.proof.take();
        if let Some(ref mut p) = sink {
            p.close();
        }
        sink
    }
    /// return the flag which stops a run when raised.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.ctx.interrupted)
    }
    /// simplify the formula before search.
    pub fn preprocess(&mut self) -> Status {
        self.run(false)
    }
    /// simplify the formula during search with scaled step limits.
    pub fn inprocess(&mut self) -> Status {
        self.run(true)
    }
    /// move the formula out of a solver, preprocess it, and move it back.
    pub fn preprocess_solver<S: SolverIF>(&mut self, solver: &mut S) -> Status {
        self.round_trip(solver, false)
    }
    /// move the formula out of a solver, inprocess it, and move it back.
    pub fn inprocess_solver<S: SolverIF>(&mut self, solver: &mut S) -> Status {
        self.round_trip(solver, true)
    }
    /// return the formula as a DIMACS literal stream; every clause, root
    /// units included, ends with 0. An inconsistent formula is the empty clause.
    pub fn dump_formula(&self) -> Vec<i32> {
        if self.ctx.is_unsat() {
            return vec![0];
        }
        let mut vec = Vec::new();
        for l in self.ctx.asg.iter_root() {
            if let Some(n) = self.export_lit(*l) {
                vec.push(i32::from(n));
                vec.push(0);
            }
        }
        for c in self.ctx.cdb.iter().filter(|c| !c.is_dead()) {
            let len = vec.len();
            vec.extend(c.iter().filter_map(|l| self.export_lit(*l)).map(i32::from));
            debug_assert_eq!(vec.len() - len, c.len(), "a var lost its number: {c}");
            vec.push(0);
        }
        vec
    }
    /// return the literal exported for `l`, or `None` if its var was removed.
    pub fn give_new_literal(&self, l: Lit) -> Option<Lit> {
        let vi = l.vi();
        if vi == 0
            || self.ctx.num_vars() < vi
            || self.ctx.asg.is(vi, FlagVar::ELIMINATED)
            || self.ctx.asg.is(vi, FlagVar::SUBSTITUTED)
        {
            return None;
        }
        self.export_lit(l)
    }
    /// convert a model of the exported formula to a model of the original one.
    ///
    /// `model` holds literals in the exported numbering; missing vars are
    /// free. On return it holds a literal for every original var, sorted by var.
    ///
    /// # Errors
    ///
    /// * `SolverError::SolverBug` if an invariant was broken during a run.
    /// * `SolverError::Inconsistent` if the formula is unsatisfiable.
    /// * `SolverError::InvalidLiteral` or `SolverError::OutOfRange` on a bad literal.
    pub fn extend_model(&self, model: &mut Vec<i32>) -> MaybeInconsistent {
        if let Some(msg) = self.ctx.poisoned() {
            return Err(SolverError::SolverBug(msg.to_string()));
        }
        if self.ctx.is_unsat() {
            return Err(SolverError::Inconsistent);
        }
        let nv = self.ctx.num_vars();
        let num_exported = self.num_exported();
        let mut assign: Vec<Option<bool>> = vec![None; num_exported + 1];
        for i in model.iter() {
            let vi = i.unsigned_abs() as usize;
            if vi == 0 {
                return Err(SolverError::InvalidLiteral);
            }
            if num_exported < vi {
                return Err(SolverError::OutOfRange);
            }
            assign[vi] = Some(0 < *i);
        }
        if self.tech.dense.is_active() {
            assign = self.tech.dense.decompress(&assign, nv);
        }
        for l in self.ctx.asg.iter_root() {
            assign[l.vi()] = Some(l.is_positive());
        }
        self.ctx.ext.extend_model(&mut assign);
        *model = (1..=nv)
            .map(|vi| {
                if assign[vi] == Some(true) {
                    vi as i32
                } else {
                    -(vi as i32)
                }
            })
            .collect();
        Ok(())
    }
}

impl Preprocessor {
    fn run(&mut self, inprocessing: bool) -> Status {
        self.num_runs += 1;
        if self.ctx.is_unsat() {
            return Status::Unsat;
        }
        if let Some(msg) = self.ctx.poisoned() {
            log::error!("refuse to run after an invariant violation: {msg}");
            return Status::Unknown;
        }
        self.ctx.inprocessing = inprocessing;
        self.ctx.cancel_to_root();
        log::info!(
            "{} #{}: {} vars, {} clauses",
            if inprocessing { "inprocess" } else { "preprocess" },
            self.num_runs,
            self.ctx.num_vars(),
            self.ctx.cdb.derefer(crate::cdb::property::Tusize::NumActive),
        );
        let status = self.run_passes();
        if status != Status::Unsat {
            self.finish(inprocessing);
        }
        self.tech.destroy();
        self.collect_garbage();
        self.ctx.inprocessing = false;
        let status = if self.ctx.is_unsat() {
            Status::Unsat
        } else if self.ctx.poisoned().is_none() && self.ctx.cdb.is_empty() {
            Status::Sat
        } else {
            Status::Unknown
        };
        self.log_summary(status);
        status
    }
    fn run_passes(&mut self) -> Status {
        for pass in 1..=self.ctx.config.max_passes {
            let changes = self.ctx.num_changes();
            for step in PIPELINE {
                if self.ctx.is_interrupted() {
                    log::info!("interrupted at pass {pass}");
                    return Status::Unknown;
                }
                let Preprocessor { ctx, tech, .. } = self;
                let Some(t) = tech.select(step, &ctx.config) else {
                    continue;
                };
                match run_step(ctx, t) {
                    Some(Status::Unsat) => return Status::Unsat,
                    Some(Status::Sat) => return Status::Sat,
                    _ => (),
                }
                #[cfg(feature = "boundary_check")]
                if let Err(e) = self.ctx.check_consistency() {
                    self.ctx.conclude(Err(e));
                    return Status::Unknown;
                }
                if self.ctx.poisoned().is_some() {
                    return Status::Unknown;
                }
                self.collect_garbage();
            }
            log::debug!(
                "pass {pass}: {} changes",
                self.ctx.num_changes() - changes
            );
            if self.ctx.num_changes() == changes {
                break;
            }
        }
        Status::Unknown
    }
    /// refresh phases by 2-SAT on the final formula, and renumber vars once.
    fn finish(&mut self, inprocessing: bool) {
        if self.ctx.config.enable_twosat && !self.ctx.is_interrupted() {
            self.tech.twosat.process(&mut self.ctx);
        }
        if !inprocessing
            && self.ctx.config.enable_dense
            && !self.ctx.is_unsat()
            && !self.tech.dense.is_active()
        {
            self.tech.dense.process(&mut self.ctx);
        }
    }
    /// compact the arena if it holds more dead slots than live ones.
    fn collect_garbage(&mut self) {
        let garbage = self.ctx.cdb.num_garbage();
        if 0 < garbage && self.ctx.cdb.len() < 2 * garbage {
            let map = self.ctx.compact(&mut []);
            self.tech.relocate(&map);
        }
    }
    fn log_summary(&self, status: Status) {
        let asg = &self.ctx.asg;
        log::info!(
            "{status}: {} vars ({} assigned, {} eliminated, {} substituted), {} clauses, {} records",
            self.ctx.num_vars(),
            asg.num_asserted_vars(),
            asg.num_eliminated_vars,
            asg.num_substituted_vars,
            self.ctx.cdb.derefer(crate::cdb::property::Tusize::NumActive),
            self.ctx.ext.len(),
        );
    }
    /// return the number of vars in the exported numbering.
    fn num_exported(&self) -> usize {
        if self.tech.dense.is_active() {
            self.tech.dense.num_vars()
        } else {
            self.ctx.num_vars()
        }
    }
    /// add vars until the exported numbering has `n` vars.
    fn reserve_exported(&mut self, n: usize) {
        while self.num_exported() < n {
            self.new_var();
        }
    }
    fn export_lit(&self, l: Lit) -> Option<Lit> {
        if self.tech.dense.is_active() {
            self.tech.dense.new_lit(l)
        } else {
            Some(l)
        }
    }
    /// map an exported literal to the internal one; vars are added on demand.
    fn import_lit(&mut self, i: i32) -> Result<Lit, SolverError> {
        if i == 0 {
            return Err(SolverError::InvalidLiteral);
        }
        let l = Lit::from(i);
        self.reserve_exported(l.vi());
        let l = if self.tech.dense.is_active() {
            self.tech.dense.old_lit(l).ok_or(SolverError::OutOfRange)?
        } else {
            l
        };
        self.check_live(l)?;
        Ok(l)
    }
    fn check_live(&self, l: Lit) -> MaybeInconsistent {
        if self.ctx.asg.is(l.vi(), FlagVar::ELIMINATED)
            || self.ctx.asg.is(l.vi(), FlagVar::SUBSTITUTED)
        {
            return Err(SolverError::InvalidLiteral);
        }
        Ok(())
    }
    fn round_trip<S: SolverIF>(&mut self, solver: &mut S, inprocessing: bool) -> Status {
        if !solver.is_ok() || solver.propagate().is_err() {
            self.ctx.conclude(Err(SolverError::Inconsistent));
            return Status::Unsat;
        }
        if let Err(e) = self.import_from(solver) {
            let status = self.ctx.conclude(Err(e));
            if status == Status::Unsat {
                // the clauses were taken; leave the empty clause behind
                if let Err(e) = self.export_to(solver) {
                    log::warn!("failed to export the empty clause: {e}");
                }
            }
            return status;
        }
        let status = self.run(inprocessing);
        let exported = self.export_to(solver);
        // the solver's vars out of the exported formula become fresh vars
        self.reserve_exported(solver.num_vars());
        match exported {
            Ok(()) => status,
            Err(e) if e.is_unsat() => {
                self.ctx.conclude(Err(e));
                Status::Unsat
            }
            Err(e) => {
                log::warn!("failed to export the formula: {e}");
                status
            }
        }
    }
    /// replace the formula with the one held by `solver`.
    fn import_from<S: SolverIF>(&mut self, solver: &mut S) -> MaybeInconsistent {
        self.reserve_exported(solver.num_vars());
        let trail = solver.current_trail();
        let clauses = solver.take_clauses();
        let (units, imported) = match self.import_clauses(&trail, &clauses) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("failed to import the formula: {e}");
                for c in clauses.iter() {
                    solver.add_clause(c)?;
                }
                return Err(e);
            }
        };
        self.ctx.release_clauses();
        self.collect_garbage();
        for l in units {
            self.ctx.import_clause(vec![l], false)?;
        }
        for v in imported {
            self.ctx.import_clause(v, false)?;
        }
        Ok(())
    }
    #[allow(clippy::type_complexity)]
    fn import_clauses(
        &mut self,
        trail: &[i32],
        clauses: &[Vec<i32>],
    ) -> Result<(Vec<Lit>, Vec<Vec<Lit>>), SolverError> {
        let mut units = Vec::with_capacity(trail.len());
        for i in trail.iter() {
            units.push(self.import_lit(*i)?);
        }
        let mut imported = Vec::with_capacity(clauses.len());
        for c in clauses.iter() {
            let mut v = Vec::with_capacity(c.len());
            for i in c.iter() {
                v.push(self.import_lit(*i)?);
            }
            imported.push(v);
        }
        Ok((units, imported))
    }
    /// give the formula and the phases to `solver`.
    fn export_to<S: SolverIF>(&self, solver: &mut S) -> MaybeInconsistent {
        let mut clause = Vec::new();
        for i in self.dump_formula() {
            if i != 0 {
                clause.push(i);
                continue;
            }
            if clause.len() == 1 {
                solver.assign(clause[0])?;
            } else {
                solver.add_clause(&clause)?;
            }
            clause.clear();
        }
        solver.propagate()?;
        for vi in 1..=self.ctx.num_vars() {
            if let Some(b) = self.ctx.asg.phase(vi) {
                if let Some(l) = self.give_new_literal(Lit::from((vi, b))) {
                    solver.suggest_phase(i32::from(l));
                }
            }
        }
        Ok(())
    }
}

/// run a technique unless its penalty blocks it.
/// Return its status if it ran.
fn run_step(ctx: &mut EngineContext, t: &mut dyn Technique) -> Option<Status> {
    if !t.budget().perform() {
        log::trace!("{} skipped by penalty", t.name());
        return None;
    }
    let changes = ctx.num_changes();
    let status = t.process(ctx);
    let changed = ctx.num_changes() - changes;
    if 0 < changed {
        t.budget().clear_penalty();
    } else {
        t.budget().unsuccessful();
    }
    let budget = t.budget();
    let (used, limit) = (budget.steps_used(), budget.steps_limit());
    log::info!(
        "{}: {status}, {changed} changes, {used}/{limit} steps",
        t.name()
    );
    Some(status)
}
