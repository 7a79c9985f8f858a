/// Module `subsume` implements clause subsumption and self-subsuming resolution.
use {
    super::{Budget, EngineContext, Technique},
    crate::{
        big::BIG,
        cdb::{ClauseDBIF, ClauseIF, Relocation, RelocateIF},
        types::*,
    },
    std::collections::VecDeque,
};

/// The relation between two clauses found by [`subsume_check`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Subsumption {
    /// the first clause is a subset of the second.
    Subsumes,
    /// the first clause with a flipped literal is a subset of the second;
    /// the second can lose the complement of it.
    Strengthens(Lit),
    Unrelated,
}

/// check `c` against `d` by a merge scan over their sorted literals.
fn subsume_check(c: &[Lit], d: &[Lit]) -> Subsumption {
    if d.len() < c.len() {
        return Subsumption::Unrelated;
    }
    let mut flipped: Option<Lit> = None;
    let mut j = 0;
    for l in c.iter() {
        loop {
            let Some(k) = d.get(j) else {
                return Subsumption::Unrelated;
            };
            if k.vi() < l.vi() {
                j += 1;
                continue;
            }
            if l.vi() < k.vi() {
                return Subsumption::Unrelated;
            }
            j += 1;
            if k == l {
                break;
            }
            if flipped.is_none() {
                flipped = Some(*l);
                break;
            }
            return Subsumption::Unrelated;
        }
    }
    match flipped {
        None => Subsumption::Subsumes,
        Some(l) => Subsumption::Strengthens(l),
    }
}

/// Subsumption and self-subsuming resolution over a clause queue.
///
/// Each queued clause is checked as a subsumer of the clauses sharing its
/// least frequent var, and as a subsumee of the clauses sharing any of its
/// literals. With the binary implication graph, hidden tautologies and hidden
/// literals are removed as well.
#[derive(Clone, Debug, Default)]
pub struct Subsumer {
    budget: Budget,
    queue: VecDeque<ClauseRef>,
    big: BIG,
    use_big: bool,
    num_runs: usize,
}

impl Instantiate for Subsumer {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        Subsumer {
            big: BIG::new(cnf.num_of_variables),
            ..Subsumer::default()
        }
    }
}

impl Technique for Subsumer {
    fn name(&self) -> &'static str {
        "subsumption"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        let limit = ctx.step_limit(ctx.config.subsume_steps);
        self.start(ctx, limit);
        let (subsumed, strengthened) = (ctx.stats.num_subsumed, ctx.stats.num_strengthened);
        let r = self.run(ctx);
        log::debug!(
            "subsumption #{}: {} subsumed, {} strengthened, {} steps",
            self.num_runs,
            ctx.stats.num_subsumed - subsumed,
            ctx.stats.num_strengthened - strengthened,
            self.budget.steps_used(),
        );
        ctx.conclude(r)
    }
    fn reset(&mut self) {
        self.queue.clear();
    }
    fn relocate(&mut self, map: &Relocation) {
        self.queue.relocate(map);
    }
}

impl Subsumer {
    /// start a run with a fresh budget.
    pub fn start(&mut self, ctx: &EngineContext, limit: usize) {
        self.budget.start(limit, &ctx.interrupted);
        self.use_big = false;
    }
    fn run(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        ctx.propagate_units()?;
        if 0 < ctx.cdb.derefer(crate::cdb::property::Tusize::NumBiClause) {
            self.big.build(&ctx.asg, &ctx.cdb, &mut ctx.rng);
            self.use_big = true;
        }
        // units may flag clauses outside of the queue
        loop {
            self.gather(ctx);
            if self.queue.is_empty() || self.budget.is_exhausted() {
                return Ok(());
            }
            self.drain(ctx)?;
        }
    }
    /// queue all clauses marked as candidates, shorter ones first.
    pub fn gather(&mut self, ctx: &mut EngineContext) {
        let mut v = ctx
            .cdb
            .refs()
            .into_iter()
            .filter(|cr| {
                let c = &ctx.cdb[*cr];
                c.is(FlagClause::SUBSUME) || c.is(FlagClause::STRENGTHEN)
            })
            .collect::<Vec<_>>();
        v.sort_by_key(|cr| ctx.cdb[*cr].len());
        for cr in v {
            self.enqueue(ctx, cr);
        }
    }
    /// add a clause to the queue.
    pub fn enqueue(&mut self, ctx: &mut EngineContext, cr: ClauseRef) {
        if let Some(c) = ctx.cdb.get_mut(cr) {
            if !c.is_dead() && !c.is(FlagClause::ENQUEUED) {
                c.turn_on(FlagClause::ENQUEUED);
                self.queue.push_back(cr);
            }
        }
    }
    /// return `true` if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
    /// process queued clauses until the queue is empty or the budget runs out.
    /// Clauses left in the queue stay flagged for the next run.
    pub fn drain(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        while let Some(cr) = self.queue.pop_front() {
            let Some(c) = ctx.cdb.get_mut(cr) else {
                continue;
            };
            c.turn_off(FlagClause::ENQUEUED);
            if c.is_dead() {
                continue;
            }
            if !self.budget.spend(c.len()) {
                break;
            }
            if ctx.config.subsume_literal_limit < c.len() {
                c.turn_off(FlagClause::SUBSUME | FlagClause::STRENGTHEN);
                continue;
            }
            if self.use_big && self.hidden_check(ctx, cr)? {
                ctx.propagate_units()?;
                continue;
            }
            self.forward(ctx, cr)?;
            if ctx.cdb[cr].is_dead() {
                ctx.propagate_units()?;
                continue;
            }
            self.backward(ctx, cr)?;
            if let Some(c) = ctx.cdb.get_mut(cr) {
                c.turn_off(FlagClause::SUBSUME | FlagClause::STRENGTHEN);
            }
            ctx.propagate_units()?;
        }
        if !self.queue.is_empty() {
            for cr in self.queue.drain(..) {
                if let Some(c) = ctx.cdb.get_mut(cr) {
                    c.turn_off(FlagClause::ENQUEUED);
                }
            }
        }
        Ok(())
    }
    /// use clause `cr` to subsume or strengthen others.
    fn backward(&mut self, ctx: &mut EngineContext, cr: ClauseRef) -> MaybeInconsistent {
        let lits = ctx.cdb[cr].lits().to_vec();
        let Some(best) = lits
            .iter()
            .copied()
            .min_by_key(|l| ctx.occur.count(*l) + ctx.occur.count(!*l))
        else {
            return Ok(());
        };
        let mut candidates = ctx.occur.list(best).to_vec();
        candidates.extend_from_slice(ctx.occur.list(!best));
        for dr in candidates {
            if dr == cr {
                continue;
            }
            let Some(d) = ctx.cdb.get(dr) else {
                continue;
            };
            if d.is_dead() || d.len() < lits.len() {
                continue;
            }
            if !self.budget.spend(d.len()) {
                return Ok(());
            }
            match subsume_check(&lits, d.lits()) {
                Subsumption::Subsumes => {
                    #[cfg(feature = "trace_elimination")]
                    println!("BackSubsC    => {} {} subsumed completely by {} {:?}", dr, d, cr, lits);
                    if !d.is_redundant() {
                        ctx.make_irredundant(cr);
                    }
                    ctx.remove_clause(dr);
                    ctx.stats.num_subsumed += 1;
                }
                Subsumption::Strengthens(l) => {
                    #[cfg(feature = "trace_elimination")]
                    println!("BackSubC subsumes {} from {} and {}", l, cr, dr);
                    ctx.strengthen(dr, !l)?;
                    self.enqueue(ctx, dr);
                }
                Subsumption::Unrelated => (),
            }
        }
        Ok(())
    }
    /// check whether clause `cr` is subsumed or strengthened by others.
    fn forward(&mut self, ctx: &mut EngineContext, cr: ClauseRef) -> MaybeInconsistent {
        if ctx.cdb[cr].is_dead() {
            return Ok(());
        }
        let lits = ctx.cdb[cr].lits().to_vec();
        for l in lits.iter() {
            for polarity in [*l, !*l] {
                let candidates = ctx.occur.list(polarity).to_vec();
                for dr in candidates {
                    if dr == cr {
                        continue;
                    }
                    let Some(d) = ctx.cdb.get(dr) else {
                        continue;
                    };
                    if d.is_dead() || lits.len() < d.len() {
                        continue;
                    }
                    if !self.budget.spend(d.len()) {
                        return Ok(());
                    }
                    let c = &ctx.cdb[cr];
                    if c.is_dead() {
                        return Ok(());
                    }
                    match subsume_check(d.lits(), c.lits()) {
                        Subsumption::Subsumes => {
                            if !c.is_redundant() {
                                ctx.make_irredundant(dr);
                            }
                            ctx.remove_clause(cr);
                            ctx.stats.num_subsumed += 1;
                            return Ok(());
                        }
                        Subsumption::Strengthens(k) => {
                            ctx.strengthen(cr, !k)?;
                            if let Some(c) = ctx.cdb.get_mut(cr) {
                                if !c.is_dead() {
                                    c.turn_on(FlagClause::SUBSUME | FlagClause::STRENGTHEN);
                                }
                            }
                            return self.forward(ctx, cr);
                        }
                        Subsumption::Unrelated => (),
                    }
                }
            }
        }
        Ok(())
    }
    /// remove a hidden tautology or hidden literals from clause `cr`.
    /// Return `true` if the clause was removed.
    fn hidden_check(&mut self, ctx: &mut EngineContext, cr: ClauseRef) -> Result<bool, SolverError> {
        'restart: loop {
            let lits = ctx.cdb[cr].lits().to_vec();
            if lits.len() < 3 || !self.budget.spend(lits.len() * lits.len()) {
                return Ok(false);
            }
            for (i, a) in lits.iter().enumerate() {
                for b in lits[i + 1..].iter() {
                    if self.big.implies(!*a, *b) {
                        #[cfg(feature = "trace_elimination")]
                        println!(" - hidden tautology {} by {} -> {}", ctx.cdb[cr], !*a, b);
                        ctx.remove_clause(cr);
                        ctx.stats.num_hidden_tautology += 1;
                        return Ok(true);
                    }
                }
            }
            for a in lits.iter() {
                for b in lits.iter() {
                    if a != b && self.big.implies(*a, *b) {
                        #[cfg(feature = "trace_elimination")]
                        println!(" - hidden literal {} in {} by {}", a, ctx.cdb[cr], b);
                        ctx.strengthen(cr, *a)?;
                        ctx.stats.num_hidden_literal += 1;
                        continue 'restart;
                    }
                }
            }
            return Ok(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::processor::tests::{lits, live, setup},
    };

    #[test]
    fn test_subsume_check() {
        assert_eq!(subsume_check(&lits(&[1, 2]), &lits(&[1, 2, 3])), Subsumption::Subsumes);
        assert_eq!(
            subsume_check(&lits(&[1, -2]), &lits(&[1, 2, 3])),
            Subsumption::Strengthens(Lit::from(-2i32))
        );
        assert_eq!(
            subsume_check(&lits(&[-1, -2]), &lits(&[1, 2, 3])),
            Subsumption::Unrelated
        );
        assert_eq!(subsume_check(&lits(&[1, 4]), &lits(&[1, 2, 3])), Subsumption::Unrelated);
        assert_eq!(subsume_check(&lits(&[1, 2, 3]), &lits(&[1, 2])), Subsumption::Unrelated);
    }
    #[test]
    fn test_subsumption_and_strengthening() {
        let mut ctx = setup(
            4,
            &[&[1, 2], &[1, 2, 3], &[-1, 2, 4], &[1, -2, 3, 4]],
        );
        let mut sub = Subsumer::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(sub.process(&mut ctx), Status::Unknown);
        // (1 2) subsumes (1 2 3); (1 2) strengthens (-1 2 4) to (2 4)
        // and (1 -2 3 4) to (1 3 4)
        assert_eq!(live(&ctx), vec![vec![1, 2], vec![1, 3, 4], vec![2, 4]]);
        assert!(ctx.check_consistency().is_ok());
    }
    #[test]
    fn test_subsumption_is_idempotent() {
        let mut ctx = setup(
            5,
            &[&[1, 2, 3], &[1, 2], &[-2, 3, 5], &[2, 3, 5], &[-1, -3, 4], &[1, 4, -5]],
        );
        let mut sub = Subsumer::instantiate(&ctx.config, &CNFDescription::default());
        sub.process(&mut ctx);
        let once = live(&ctx);
        let changes = ctx.num_changes();
        sub.process(&mut ctx);
        assert_eq!(live(&ctx), once);
        assert_eq!(ctx.num_changes(), changes);
    }
    #[test]
    fn test_redundant_subsumer_becomes_irredundant() {
        let mut ctx = setup(3, &[&[1, 2, 3]]);
        let cr = ctx
            .add_clause(lits(&[1, 2]), true)
            .expect("consistent")
            .expect("stored");
        let mut sub = Subsumer::instantiate(&ctx.config, &CNFDescription::default());
        sub.process(&mut ctx);
        assert_eq!(live(&ctx), vec![vec![1, 2]]);
        assert!(!ctx.cdb[cr].is_redundant());
    }
    #[test]
    fn test_hidden_tautology() {
        // 1 -> 2 -> 3, so (-1 3 4) is implied by binary clauses.
        let mut ctx = setup(4, &[&[-1, 2], &[-2, 3], &[-1, 3, 4], &[1, 4, -3]]);
        let mut sub = Subsumer::instantiate(&ctx.config, &CNFDescription::default());
        sub.process(&mut ctx);
        assert_eq!(live(&ctx), vec![vec![-3, 1, 4], vec![-2, 3], vec![-1, 2]]);
        assert_eq!(ctx.stats.num_hidden_tautology, 1);
    }
    #[test]
    fn test_hidden_literal() {
        // 1 -> 2 -> 3, so 1 is redundant in (1 3 4).
        let mut ctx = setup(4, &[&[-1, 2], &[-2, 3], &[1, 3, 4]]);
        let mut sub = Subsumer::instantiate(&ctx.config, &CNFDescription::default());
        sub.process(&mut ctx);
        assert_eq!(live(&ctx), vec![vec![-2, 3], vec![-1, 2], vec![3, 4]]);
    }
}
