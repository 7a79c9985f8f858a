/// Module `probe` implements failed literal probing.
use {
    super::{Budget, EngineContext, Technique},
    crate::{
        assign::{AssignIF, PropagateIF},
        big::BIG,
        types::*,
    },
};

/// Failed literal probing and necessary assignments
///
/// Each literal is assigned at level one and propagated. A conflict makes the
/// complement a root unit. A literal implied by both polarities of a var is a
/// root unit too.
#[derive(Clone, Debug, Default)]
pub struct Prober {
    budget: Budget,
    big: BIG,
    mark: Vec<bool>,
    num_runs: usize,
}

impl Instantiate for Prober {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        Prober {
            big: BIG::new(cnf.num_of_variables),
            mark: vec![false; 2 * (cnf.num_of_variables + 1)],
            ..Prober::default()
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        if e == ProcessorEvent::NewVar {
            self.mark.push(false);
            self.mark.push(false);
        }
    }
}

impl Technique for Prober {
    fn name(&self) -> &'static str {
        "failed literal probing"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        let limit = ctx.step_limit(ctx.config.probe_steps);
        self.budget.start(limit, &ctx.interrupted);
        let (failed, necessary) = (ctx.stats.num_failed_lit, ctx.stats.num_necessary_assign);
        let r = self.run(ctx);
        ctx.cancel_to_root();
        log::debug!(
            "probing #{}: {} failed literals, {} necessary assignments",
            self.num_runs,
            ctx.stats.num_failed_lit - failed,
            ctx.stats.num_necessary_assign - necessary,
        );
        ctx.conclude(r)
    }
}

impl Prober {
    fn run(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        ctx.cancel_to_root();
        ctx.propagate_units()?;
        self.big.build(&ctx.asg, &ctx.cdb, &mut ctx.rng);
        for vi in self.probing_order(ctx.num_vars()) {
            if !self.budget.spend(1) {
                break;
            }
            if ctx.asg.assign(vi).is_some() {
                continue;
            }
            self.probe_var(ctx, vi)?;
        }
        Ok(())
    }
    /// vars having a root literal of the graph come first, then the other
    /// vars in binary clauses.
    fn probing_order(&self, num_vars: usize) -> Vec<VarId> {
        let mut roots = Vec::new();
        let mut others = Vec::new();
        for vi in 1..=num_vars {
            let p = Lit::from((vi, true));
            if self.big.children(p).is_empty() && self.big.children(!p).is_empty() {
                continue;
            }
            if self.big.is_root(p) || self.big.is_root(!p) {
                roots.push(vi);
            } else {
                others.push(vi);
            }
        }
        roots.append(&mut others);
        roots
    }
    fn probe_var(&mut self, ctx: &mut EngineContext, vi: VarId) -> MaybeInconsistent {
        self.mark.resize(2 * (ctx.num_vars() + 1), false);
        let p = Lit::from((vi, true));
        let Some(pos) = self.probe(ctx, p)? else {
            return Ok(());
        };
        let Some(neg) = self.probe(ctx, !p)? else {
            return Ok(());
        };
        for l in pos.iter() {
            self.mark[*l] = true;
        }
        let necessary = neg
            .iter()
            .copied()
            .filter(|l| self.mark[*l])
            .collect::<Vec<_>>();
        for l in pos.iter() {
            self.mark[*l] = false;
        }
        for l in necessary {
            if ctx.asg.assigned(l).is_some() {
                continue;
            }
            // (!p | l) and (p | l) make the unit derivable by propagation
            let helpers = [vec![!p, l], vec![p, l]];
            for h in helpers.iter() {
                ctx.notify_added(h);
            }
            ctx.assign_unit(l)?;
            for h in helpers.iter() {
                ctx.notify_removed(h);
            }
            ctx.stats.num_necessary_assign += 1;
        }
        ctx.propagate_units()
    }
    /// assign `l` at level one and propagate.
    /// Return the implied literals, or `None` if `l` failed.
    fn probe(&mut self, ctx: &mut EngineContext, l: Lit) -> Result<Option<Vec<Lit>>, SolverError> {
        ctx.propagate_units()?;
        let root = ctx.asg.stack_len();
        ctx.asg.propagate_at_root_level(&ctx.cdb, &ctx.occur)?;
        if root < ctx.asg.stack_len() {
            for u in ctx.asg.trail()[root..].to_vec() {
                ctx.notify_added(&[u]);
                ctx.stats.num_unit += 1;
                ctx.handle(ProcessorEvent::Assert(u.vi()));
            }
            ctx.propagate_units()?;
        }
        let start = ctx.asg.stack_len();
        ctx.asg.assign_by_decision(l);
        let conflict = ctx.asg.propagate(&ctx.cdb, &ctx.occur);
        let implied = ctx.asg.trail()[start + 1..].to_vec();
        self.budget.spend(implied.len() + 1);
        ctx.asg.cancel_until(0);
        if conflict.is_some() {
            #[cfg(feature = "trace_elimination")]
            println!(" - failed literal {l}");
            ctx.stats.num_failed_lit += 1;
            ctx.assign_unit(!l)?;
            ctx.propagate_units()?;
            return Ok(None);
        }
        Ok(Some(implied))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            processor::tests::{live, setup},
            proof::ProofLog,
        },
    };

    #[test]
    fn test_failed_literal() {
        let mut ctx = setup(4, &[&[-1, 2], &[-2, 3], &[-2, -3], &[1, 3, 4]]);
        let mut prober = Prober::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(prober.process(&mut ctx), Status::Unknown);
        assert!(0 < ctx.stats.num_failed_lit);
        assert_eq!(ctx.asg.assigned(Lit::from(-1i32)), Some(true));
        assert_eq!(ctx.asg.assigned(Lit::from(-2i32)), Some(true));
        assert_eq!(ctx.asg.decision_level(), 0);
        assert_eq!(live(&ctx), vec![vec![3, 4]]);
    }
    #[test]
    fn test_necessary_assignment() {
        let mut ctx = setup(5, &[&[-1, 2], &[1, 3], &[-3, 2], &[3, 4, 5]]);
        let log = ProofLog::default();
        ctx.proof = Some(Box::new(log.clone()));
        let mut prober = Prober::instantiate(&ctx.config, &CNFDescription::default());
        prober.budget.start(1_000, &ctx.interrupted);
        prober.probe_var(&mut ctx, 1).expect("no conflict");
        assert_eq!(ctx.stats.num_necessary_assign, 1);
        assert_eq!(ctx.asg.assigned(Lit::from(2i32)), Some(true));
        assert_eq!(live(&ctx), vec![vec![1, 3], vec![3, 4, 5]]);
        assert_eq!(
            log.steps()[..4],
            [
                (true, vec![-1, 2]),
                (true, vec![1, 2]),
                (true, vec![2]),
                (false, vec![-1, 2]),
            ]
        );
    }
    #[test]
    fn test_root_units_reach_the_proof() {
        let mut ctx = setup(
            6,
            &[&[-1, 2], &[-2, 3], &[-2, -3], &[1, 5], &[-5, 6], &[1, 3, 4]],
        );
        let log = ProofLog::default();
        ctx.proof = Some(Box::new(log.clone()));
        let mut prober = Prober::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(prober.process(&mut ctx), Status::Unknown);
        let steps = log.steps();
        for l in [-1, -2, 5, 6] {
            assert_eq!(ctx.asg.assigned(Lit::from(l)), Some(true));
        }
        for l in ctx.asg.trail().iter() {
            assert!(steps.contains(&(true, vec![i32::from(*l)])), "{l} isn't in the proof");
        }
    }
    #[test]
    fn test_both_polarities_fail() {
        let mut ctx = setup(2, &[&[1, 2], &[1, -2], &[-1, 2], &[-1, -2]]);
        let mut prober = Prober::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(prober.process(&mut ctx), Status::Unsat);
    }
}
