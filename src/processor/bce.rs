/// Module `bce` implements blocked clause elimination.
use {
    super::{eliminate::resolvent_is_tautology, Budget, EngineContext, Technique},
    crate::{
        cdb::{ClauseDBIF, ClauseIF},
        types::*,
    },
    std::collections::VecDeque,
};

/// Blocked clause elimination
///
/// A clause `c` is blocked on `l` if every resolvent of `c` on `l` is a
/// tautology. The clause is moved to the extension stack with `l` chosen.
/// Learnt clauses count as resolution partners but are never removed here.
#[derive(Clone, Debug, Default)]
pub struct BlockedClause {
    budget: Budget,
    queue: VecDeque<Lit>,
    queued: Vec<bool>,
    num_runs: usize,
}

impl Instantiate for BlockedClause {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        BlockedClause {
            queued: vec![false; 2 * (cnf.num_of_variables + 1)],
            ..BlockedClause::default()
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        if e == ProcessorEvent::NewVar {
            self.queued.push(false);
            self.queued.push(false);
        }
    }
}

impl Technique for BlockedClause {
    fn name(&self) -> &'static str {
        "blocked clause elimination"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        let limit = ctx.step_limit(ctx.config.bce_steps);
        self.budget.start(limit, &ctx.interrupted);
        let blocked = ctx.stats.num_blocked;
        let r = self.run(ctx);
        self.reset();
        log::debug!(
            "blocked clause elimination #{}: {} clauses, {} steps",
            self.num_runs,
            ctx.stats.num_blocked - blocked,
            self.budget.steps_used(),
        );
        ctx.conclude(r)
    }
    fn reset(&mut self) {
        for l in self.queue.drain(..) {
            self.queued[l] = false;
        }
    }
}

impl BlockedClause {
    fn run(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        ctx.propagate_units()?;
        self.queued.resize(2 * (ctx.num_vars() + 1), false);
        let mut lits = Vec::new();
        for vi in 1..=ctx.num_vars() {
            if ctx.is_removable(vi) {
                lits.push(Lit::from((vi, true)));
                lits.push(Lit::from((vi, false)));
            }
        }
        lits.sort_by_key(|l| ctx.occur.count(!*l));
        for l in lits {
            self.enqueue(l);
        }
        while let Some(l) = self.queue.pop_front() {
            self.queued[l] = false;
            if !ctx.is_removable(l.vi()) || ctx.occur.count(l) == 0 {
                continue;
            }
            let partners = ctx
                .occur
                .list(!l)
                .iter()
                .copied()
                .filter(|cr| ctx.cdb.get(*cr).map_or(false, |c| !c.is_dead()))
                .collect::<Vec<_>>();
            for cr in ctx.occur.list(l).to_vec() {
                let c = match ctx.cdb.get(cr) {
                    Some(c) if !c.is_dead() && !c.is_redundant() && c.contains(l) => c,
                    _ => continue,
                };
                if !self.budget.spend(c.len() * partners.len().max(1)) {
                    return Ok(());
                }
                if !partners
                    .iter()
                    .all(|dr| resolvent_is_tautology(c.lits(), ctx.cdb[*dr].lits(), l.vi()))
                {
                    continue;
                }
                let others = c.lits().to_vec();
                #[cfg(feature = "trace_elimination")]
                println!(" - blocked clause {} on {}", c, l);
                ctx.remove_clause_with_record(cr, l);
                ctx.stats.num_blocked += 1;
                for x in others {
                    if ctx.is_removable(x.vi()) {
                        self.enqueue(!x);
                    }
                }
            }
        }
        Ok(())
    }
    fn enqueue(&mut self, l: Lit) {
        if !self.queued[l] {
            self.queued[l] = true;
            self.queue.push_back(l);
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            assign::AssignIF,
            processor::tests::{live, satisfies, setup},
        },
    };

    #[test]
    fn test_blocked_clauses_are_removed() {
        let clauses: &[&[i32]] = &[&[1, 2, 3], &[-1, -2], &[-1, -3]];
        let mut ctx = setup(3, clauses);
        let mut bce = BlockedClause::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(bce.process(&mut ctx), Status::Sat);
        assert_eq!(ctx.stats.num_blocked, 3);
        let mut model = vec![None; 4];
        ctx.ext.extend_model(&mut model);
        assert!(satisfies(&model, clauses));
    }
    #[test]
    fn test_non_blocked_clauses_stay() {
        let clauses: &[&[i32]] = &[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2, 3], &[-3, 1]];
        let mut ctx = setup(3, clauses);
        ctx.asg.set(3, FlagVar::FROZEN, true);
        let mut bce = BlockedClause::instantiate(&ctx.config, &CNFDescription::default());
        bce.process(&mut ctx);
        assert_eq!(ctx.stats.num_blocked, 0);
        assert_eq!(live(&ctx).len(), 5);
    }
    #[test]
    fn test_frozen_vars_are_kept() {
        let clauses: &[&[i32]] = &[&[1, 2, 3], &[-1, -2], &[-1, -3]];
        let mut ctx = setup(3, clauses);
        for vi in 1..=3 {
            ctx.asg.set(vi, FlagVar::FROZEN, true);
        }
        let mut bce = BlockedClause::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(bce.process(&mut ctx), Status::Unknown);
        assert_eq!(ctx.stats.num_blocked, 0);
        assert!(ctx.ext.is_empty());
    }
}
