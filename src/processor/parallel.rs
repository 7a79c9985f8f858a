/// Module `parallel` implements variable elimination by a pool of workers.
///
/// The arena and the occurrence index are moved out of the context into
/// reader-writer locks for a pass. A worker locks every var of the clauses an
/// elimination touches with `try_lock` in ascending order; on contention it
/// releases everything and postpones the var. Removals only decrement counts
/// and mark lists dirty. After the pass a single thread purges the lists,
/// reports the removals to the proof sink, and runs subsumption over the
/// resolvents.
use {
    super::{
        eliminate::{merge, resolvent_is_tautology, resolvent_len, skip_by_occurrences},
        heap::{VarOccHeap, VarOrderIF},
        Budget, EngineContext, ProcessorEvent, Subsumer, Technique,
    },
    crate::{
        cdb::{ClauseDB, ClauseDBIF, ClauseIF, OccurIndex, Relocation},
        extend::ExtensionStack,
        proof::ProofSink,
        types::*,
    },
    parking_lot::{Mutex, MutexGuard, RwLock},
    std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicBool, AtomicUsize, Ordering},
            Arc,
        },
    },
};

/// Multi-threaded bounded variable elimination
#[derive(Clone, Debug, Default)]
pub struct ParallelEliminator {
    budget: Budget,
    subsumer: Subsumer,
    num_runs: usize,
}

impl Instantiate for ParallelEliminator {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Self {
        ParallelEliminator {
            subsumer: Subsumer::instantiate(config, cnf),
            ..ParallelEliminator::default()
        }
    }
}

impl Technique for ParallelEliminator {
    fn name(&self) -> &'static str {
        "parallel variable elimination"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        let limit = ctx.step_limit(ctx.config.bve_steps);
        self.budget.start(limit, &ctx.interrupted);
        let eliminated = ctx.stats.num_eliminated_var;
        let r = self.run(ctx);
        log::debug!(
            "parallel elimination #{} by {} threads: {} vars eliminated, {} postponed, {} steps",
            self.num_runs,
            ctx.config.bve_threads.max(1),
            ctx.stats.num_eliminated_var - eliminated,
            ctx.stats.num_postponed,
            self.budget.steps_used(),
        );
        ctx.conclude(r)
    }
    fn reset(&mut self) {
        self.subsumer.reset();
    }
    fn relocate(&mut self, map: &Relocation) {
        self.subsumer.relocate(map);
    }
}

/// The result of an attempt on a var.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Attempt {
    Eliminated,
    Declined,
    Contended,
}

/// Everything shared by workers in a pass.
struct WorkerPool {
    config: Config,
    interrupted: Arc<AtomicBool>,
    cdb: RwLock<ClauseDB>,
    occur: RwLock<OccurIndex>,
    ext: Mutex<ExtensionStack>,
    proof: Mutex<Option<Box<dyn ProofSink + Send>>>,
    queue: Mutex<VecDeque<(VarId, usize)>>,
    var_locks: Vec<Mutex<()>>,
    removable: Vec<AtomicBool>,
    /// removed clauses waiting for the sweep
    deleted: Mutex<Vec<ClauseRef>>,
    resolvents: Mutex<Vec<ClauseRef>>,
    eliminated: Mutex<Vec<VarId>>,
    steps: AtomicUsize,
    steps_limit: usize,
    grown: AtomicUsize,
    num_blocked: AtomicUsize,
    num_postponed: AtomicUsize,
    num_postpone_overflow: AtomicUsize,
}

/// What an elimination will do, computed under read locks.
#[derive(Debug, Default)]
struct Plan {
    /// blocked clauses and their blocking literals
    blocked: Vec<(ClauseRef, Lit)>,
    eliminate: bool,
    pos: Vec<ClauseRef>,
    neg: Vec<ClauseRef>,
    redundant: Vec<ClauseRef>,
    resolvents: Vec<Vec<Lit>>,
}

impl WorkerPool {
    /// consume steps; return `false` if workers should stop.
    fn spend(&self, n: usize) -> bool {
        let used = self.steps.fetch_add(n, Ordering::Relaxed) + n;
        !self.interrupted.load(Ordering::Relaxed) && used < self.steps_limit
    }
    fn work(&self) {
        while self.spend(1) {
            let Some((vi, tries)) = self.queue.lock().pop_front() else {
                break;
            };
            if !self.removable[vi].load(Ordering::Acquire) {
                continue;
            }
            if self.try_eliminate(vi) == Attempt::Contended {
                if tries < self.config.bve_postpone_limit {
                    self.num_postponed.fetch_add(1, Ordering::Relaxed);
                    self.queue.lock().push_back((vi, tries + 1));
                } else {
                    self.num_postpone_overflow.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }
    /// return the sorted vars of all clauses containing var `vi`.
    fn neighborhood(&self, vi: VarId) -> Vec<VarId> {
        let cdb = self.cdb.read();
        let occur = self.occur.read();
        let p = Lit::from((vi, true));
        let mut vars = vec![vi];
        for l in [p, !p] {
            for cr in occur.list(l).iter() {
                match cdb.get(*cr) {
                    Some(c) if !c.is_dead() && c.contains(l) => {
                        vars.extend(c.iter().map(|l| l.vi()));
                    }
                    _ => (),
                }
            }
        }
        vars.sort_unstable();
        vars.dedup();
        vars
    }
    fn lock_vars(&self, vars: &[VarId]) -> Option<Vec<MutexGuard<'_, ()>>> {
        let mut guards = Vec::with_capacity(vars.len());
        for vi in vars.iter() {
            guards.push(self.var_locks[*vi].try_lock()?);
        }
        Some(guards)
    }
    fn try_eliminate(&self, vi: VarId) -> Attempt {
        let vars = self.neighborhood(vi);
        let Some(_guards) = self.lock_vars(&vars) else {
            return Attempt::Contended;
        };
        // the neighborhood may have grown before the locks were taken
        if self
            .neighborhood(vi)
            .iter()
            .any(|v| vars.binary_search(v).is_err())
        {
            return Attempt::Contended;
        }
        let Some(plan) = self.make_plan(vi) else {
            return Attempt::Declined;
        };
        self.commit(vi, plan)
    }
    /// compute blocked clauses and resolvents without changing anything.
    fn make_plan(&self, vi: VarId) -> Option<Plan> {
        let cdb = self.cdb.read();
        let occur = self.occur.read();
        let p = Lit::from((vi, true));
        let mut plan = Plan::default();
        let mut all = [Vec::new(), Vec::new()];
        for (i, l) in [p, !p].iter().enumerate() {
            for cr in occur.list(*l).iter() {
                match cdb.get(*cr) {
                    Some(c) if !c.is_dead() && c.contains(*l) => {
                        all[i].push(*cr);
                        if c.is_redundant() {
                            plan.redundant.push(*cr);
                        } else if i == 0 {
                            plan.pos.push(*cr);
                        } else {
                            plan.neg.push(*cr);
                        }
                    }
                    _ => (),
                }
            }
        }
        if skip_by_occurrences(&self.config, plan.pos.len(), plan.neg.len()) {
            return None;
        }
        if self.config.bve_blocked {
            for (i, l) in [p, !p].iter().enumerate() {
                let side = if i == 0 { &mut plan.pos } else { &mut plan.neg };
                let partners = &all[1 - i];
                let mut j = 0;
                while j < side.len() {
                    let c = cdb[side[j]].lits();
                    if !self.spend(c.len() * partners.len().max(1)) {
                        return None;
                    }
                    if partners
                        .iter()
                        .filter(|dr| !plan.blocked.iter().any(|(b, _)| b == *dr))
                        .all(|dr| resolvent_is_tautology(c, cdb[*dr].lits(), vi))
                    {
                        plan.blocked.push((side[j], *l));
                        side.swap_remove(j);
                    } else {
                        j += 1;
                    }
                }
            }
        }
        plan.eliminate = self.anticipate(&cdb, &mut plan, vi);
        if plan.blocked.is_empty() && !plan.eliminate {
            return None;
        }
        Some(plan)
    }
    /// build the resolvents into `plan`; return `false` if the elimination
    /// should be declined.
    fn anticipate(&self, cdb: &ClauseDB, plan: &mut Plan, vi: VarId) -> bool {
        let limit = self.config.bve_resolvent_limit;
        let num_old = plan.pos.len() + plan.neg.len();
        let mut resolvent = Vec::new();
        for pr in plan.pos.iter() {
            let c = cdb[*pr].lits();
            for nr in plan.neg.iter() {
                let d = cdb[*nr].lits();
                if !self.spend(c.len() + d.len()) {
                    return false;
                }
                match resolvent_len(c, d, vi) {
                    None => continue,
                    // units and empty clauses need the root assignment
                    Some(n) if n < 2 => return false,
                    Some(n) if limit != 0 && limit < n => return false,
                    Some(_) => (),
                }
                merge(c, d, vi, &mut resolvent);
                plan.resolvents.push(std::mem::take(&mut resolvent));
                if num_old + self.config.bve_grow < plan.resolvents.len() {
                    return false;
                }
            }
        }
        let growth = plan.resolvents.len().saturating_sub(num_old);
        let total = self.config.bve_grow_total;
        self.grown
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |g| {
                g.checked_add(growth).filter(|n| *n <= total)
            })
            .is_ok()
    }
    fn commit(&self, vi: VarId, plan: Plan) -> Attempt {
        let p = Lit::from((vi, true));
        let mut cdb = self.cdb.write();
        let mut occur = self.occur.write();
        let mut removed: Vec<ClauseRef> = Vec::new();
        {
            let mut ext = self.ext.lock();
            for (cr, l) in plan.blocked.iter() {
                ext.push_record(*l, cdb[*cr].lits());
                removed.push(*cr);
            }
            if plan.eliminate {
                let mut proof = self.proof.lock();
                let mut new_refs = self.resolvents.lock();
                for lits in plan.resolvents {
                    if let Some(ref mut sink) = *proof {
                        sink.on_clause_added(&lits);
                    }
                    let cr = cdb.new_clause(lits, false);
                    occur.add(cr, cdb[cr].lits());
                    new_refs.push(cr);
                }
                for cr in plan.pos.iter() {
                    ext.push_record(p, cdb[*cr].lits());
                }
                for cr in plan.neg.iter() {
                    ext.push_record(!p, cdb[*cr].lits());
                }
                removed.extend(plan.pos.iter().chain(plan.neg.iter()).chain(plan.redundant.iter()));
            }
        }
        self.num_blocked.fetch_add(plan.blocked.len(), Ordering::Relaxed);
        for cr in removed.iter() {
            occur.remove_lazily(cdb[*cr].lits());
            cdb.remove_clause(*cr);
        }
        self.deleted.lock().append(&mut removed);
        if !plan.eliminate {
            return Attempt::Declined;
        }
        self.removable[vi].store(false, Ordering::Release);
        self.eliminated.lock().push(vi);
        #[cfg(feature = "trace_elimination")]
        println!("# eliminate_var {vi} by {:?}", std::thread::current().id());
        Attempt::Eliminated
    }
}

impl ParallelEliminator {
    fn run(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        ctx.propagate_units()?;
        if ctx.occur.is_dirty() {
            ctx.occur.clean_dirty(&ctx.cdb);
        }
        let nv = ctx.num_vars();
        let mut heap = VarOccHeap::new(nv);
        for vi in 1..=nv {
            if ctx.is_removable(vi) {
                heap.insert(&ctx.occur, vi);
            }
        }
        let mut queue = VecDeque::with_capacity(heap.len());
        while let Some(vi) = heap.select_var(&ctx.occur) {
            queue.push_back((vi, 0));
        }
        let pool = WorkerPool {
            config: ctx.config.clone(),
            interrupted: Arc::clone(&ctx.interrupted),
            cdb: RwLock::new(std::mem::take(&mut ctx.cdb)),
            occur: RwLock::new(std::mem::take(&mut ctx.occur)),
            ext: Mutex::new(std::mem::take(&mut ctx.ext)),
            proof: Mutex::new(ctx.proof.take()),
            queue: Mutex::new(queue),
            var_locks: (0..=nv).map(|_| Mutex::new(())).collect(),
            removable: (0..=nv)
                .map(|vi| AtomicBool::new(0 < vi && ctx.is_removable(vi)))
                .collect(),
            deleted: Mutex::new(Vec::new()),
            resolvents: Mutex::new(Vec::new()),
            eliminated: Mutex::new(Vec::new()),
            steps: AtomicUsize::new(0),
            steps_limit: self.budget.steps_limit(),
            grown: AtomicUsize::new(0),
            num_blocked: AtomicUsize::new(0),
            num_postponed: AtomicUsize::new(0),
            num_postpone_overflow: AtomicUsize::new(0),
        };
        let threads = ctx.config.bve_threads.max(1);
        std::thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| pool.work());
            }
        });
        self.budget.spend(pool.steps.load(Ordering::Relaxed));
        let WorkerPool {
            cdb,
            occur,
            ext,
            proof,
            deleted,
            resolvents,
            eliminated,
            num_blocked,
            num_postponed,
            num_postpone_overflow,
            ..
        } = pool;
        ctx.cdb = cdb.into_inner();
        ctx.occur = occur.into_inner();
        ctx.ext = ext.into_inner();
        ctx.proof = proof.into_inner();
        ctx.occur.clean_dirty(&ctx.cdb);
        let resolvents = resolvents.into_inner();
        ctx.stats.num_resolvents += resolvents.len();
        ctx.stats.num_blocked += num_blocked.into_inner();
        ctx.stats.num_postponed += num_postponed.into_inner();
        ctx.stats.num_postpone_overflow += num_postpone_overflow.into_inner();
        for cr in deleted.into_inner() {
            let lits = ctx.cdb[cr].lits().to_vec();
            ctx.notify_removed(&lits);
            ctx.touch();
        }
        for vi in eliminated.into_inner() {
            ctx.handle(ProcessorEvent::Eliminate(vi));
            ctx.stats.num_eliminated_var += 1;
        }
        let limit = ctx.step_limit(ctx.config.subsume_steps);
        self.subsumer.start(ctx, limit);
        for cr in resolvents {
            if ctx.cdb.get(cr).map_or(false, |c| !c.is_dead()) {
                self.subsumer.enqueue(ctx, cr);
            }
        }
        self.subsumer.drain(ctx)?;
        ctx.propagate_units()
    }
}
