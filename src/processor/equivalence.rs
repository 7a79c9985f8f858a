/// Module `equivalence` substitutes equivalent literals found as strongly
/// connected components of the binary implication graph.
use {
    super::{Budget, EngineContext, ProcessorEvent, Technique},
    crate::{
        big::BIG,
        cdb::{ClauseDBIF, ClauseIF},
        types::*,
    },
    ahash::AHashSet,
};

/// Equivalent literal substitution
#[derive(Clone, Debug, Default)]
pub struct Equivalence {
    budget: Budget,
    big: BIG,
    num_runs: usize,
}

impl Instantiate for Equivalence {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        Equivalence {
            big: BIG::new(cnf.num_of_variables),
            ..Equivalence::default()
        }
    }
}

impl Technique for Equivalence {
    fn name(&self) -> &'static str {
        "equivalence elimination"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        let limit = ctx.step_limit(ctx.config.ee_steps);
        self.budget.start(limit, &ctx.interrupted);
        let substituted = ctx.stats.num_substituted_var;
        let r = self.run(ctx);
        log::debug!(
            "equivalence #{}: {} vars substituted, {} steps",
            self.num_runs,
            ctx.stats.num_substituted_var - substituted,
            self.budget.steps_used(),
        );
        ctx.conclude(r)
    }
}

impl Equivalence {
    fn run(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        ctx.propagate_units()?;
        self.big.build(&ctx.asg, &ctx.cdb, &mut ctx.rng);
        if self.big.num_edges() == 0 {
            return Ok(());
        }
        let Some(sccs) = self.find_sccs(ctx.num_vars()) else {
            return Ok(());
        };
        let mut repr: Vec<Option<Lit>> = vec![None; 2 * (ctx.num_vars() + 1)];
        let mut handled = vec![false; ctx.num_vars() + 1];
        let mut targets: Vec<(Lit, Lit)> = Vec::new();
        for mut scc in sccs {
            scc.sort_unstable();
            if let Some(w) = scc.windows(2).find(|w| w[0].vi() == w[1].vi()) {
                #[cfg(feature = "trace_equivalency")]
                println!("# SCC {:?} contains a complementary pair", i32s(&scc));
                // `l` implies `!l` through the component
                ctx.assign_unit(!w[0])?;
                return Err(SolverError::Inconsistent);
            }
            // the mirror component was processed already
            if handled[scc[0].vi()] {
                continue;
            }
            let r = scc
                .iter()
                .copied()
                .find(|l| ctx.is_frozen(l.vi()))
                .unwrap_or(scc[0]);
            #[cfg(feature = "trace_equivalency")]
            println!("# SCC {:?} represented by {}", i32s(&scc), r);
            for e in scc.iter().copied() {
                handled[e.vi()] = true;
                if e == r || !ctx.is_removable(e.vi()) {
                    continue;
                }
                repr[e] = Some(r);
                repr[!e] = Some(!r);
                targets.push((e, r));
            }
        }
        if targets.is_empty() {
            return Ok(());
        }
        self.substitute(ctx, &repr, &targets)?;
        ctx.propagate_units()
    }
    /// Tarjan's algorithm without recursion. Return components with two or
    /// more literals, or `None` if the budget runs out.
    fn find_sccs(&mut self, num_vars: usize) -> Option<Vec<Vec<Lit>>> {
        let n = 2 * (num_vars + 1);
        let mut index: Vec<u32> = vec![0; n];
        let mut low: Vec<u32> = vec![0; n];
        let mut on_stack: Vec<bool> = vec![false; n];
        let mut stack: Vec<Lit> = Vec::new();
        let mut call: Vec<(Lit, usize)> = Vec::new();
        let mut counter: u32 = 1;
        let mut sccs: Vec<Vec<Lit>> = Vec::new();
        for root in 2..n {
            let root = Lit::from(root);
            if index[root] != 0 || self.big.children(root).is_empty() {
                continue;
            }
            index[root] = counter;
            low[root] = counter;
            counter += 1;
            stack.push(root);
            on_stack[root] = true;
            call.push((root, 0));
            while let Some(frame) = call.last_mut() {
                let v = frame.0;
                let children = self.big.children(v);
                if frame.1 < children.len() {
                    let w = children[frame.1];
                    frame.1 += 1;
                    if !self.budget.spend(1) {
                        return None;
                    }
                    if index[w] == 0 {
                        index[w] = counter;
                        low[w] = counter;
                        counter += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        call.push((w, 0));
                    } else if on_stack[w] {
                        low[v] = low[v].min(index[w]);
                    }
                    continue;
                }
                call.pop();
                if let Some(&(u, _)) = call.last() {
                    low[u] = low[u].min(low[v]);
                }
                if low[v] == index[v] {
                    let mut scc = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        scc.push(w);
                        if w == v {
                            break;
                        }
                    }
                    if 1 < scc.len() {
                        sccs.push(scc);
                    }
                }
            }
        }
        Some(sccs)
    }
    /// rewrite every clause containing a substituted var, then remove the
    /// originals. New clauses are added before any deletion. Once started,
    /// the rewriting runs to the end regardless of the budget.
    fn substitute(
        &mut self,
        ctx: &mut EngineContext,
        repr: &[Option<Lit>],
        targets: &[(Lit, Lit)],
    ) -> MaybeInconsistent {
        let mut affected: AHashSet<ClauseRef> = AHashSet::new();
        for (e, _) in targets.iter() {
            affected.extend(ctx.occur.list(*e).iter().copied());
            affected.extend(ctx.occur.list(!*e).iter().copied());
        }
        let mut affected = affected
            .into_iter()
            .filter(|cr| ctx.cdb.get(*cr).map_or(false, |c| !c.is_dead()))
            .collect::<Vec<_>>();
        affected.sort_unstable();
        for cr in affected.iter() {
            let c = &ctx.cdb[*cr];
            let redundant = c.is_redundant();
            let mut lits = c
                .iter()
                .map(|l| repr[usize::from(*l)].unwrap_or(*l))
                .collect::<Vec<_>>();
            self.budget.spend(lits.len());
            lits.sort_unstable();
            lits.dedup();
            if lits.windows(2).any(|w| w[0] == !w[1]) {
                continue;
            }
            if let Some(dup) = find_duplicate(ctx, &lits) {
                if !redundant && ctx.cdb[dup].is_redundant() {
                    ctx.make_irredundant(dup);
                }
                continue;
            }
            #[cfg(feature = "trace_equivalency")]
            println!(" - rewrite {} to {:?}", ctx.cdb[*cr], i32s(&lits));
            ctx.add_clause(lits, redundant)?;
        }
        for cr in affected.iter() {
            if !ctx.cdb[*cr].is_dead() {
                ctx.remove_clause(*cr);
            }
        }
        for (e, r) in targets.iter().copied() {
            debug_assert_eq!(ctx.occur.count(e), 0);
            debug_assert_eq!(ctx.occur.count(!e), 0);
            ctx.push_record(e, &[e, !r]);
            ctx.push_record(!e, &[!e, r]);
            ctx.handle(ProcessorEvent::Substitute(e.vi()));
            ctx.stats.num_substituted_var += 1;
        }
        Ok(())
    }
}

/// return a live clause consisting of `lits` exactly.
fn find_duplicate(ctx: &EngineContext, lits: &[Lit]) -> Option<ClauseRef> {
    let pivot = lits.iter().copied().min_by_key(|l| ctx.occur.count(*l))?;
    ctx.occur.list(pivot).iter().copied().find(|cr| {
        ctx.cdb
            .get(*cr)
            .map_or(false, |c| !c.is_dead() && c.lits() == lits)
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            assign::AssignIF,
            processor::tests::{live, setup},
        },
    };

    #[test]
    fn test_substitution_and_extension() {
        // p <-> q
        let mut ctx = setup(4, &[&[-1, 2], &[-2, 1], &[2, 3], &[-2, -3, 4]]);
        let mut ee = Equivalence::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(ee.process(&mut ctx), Status::Unknown);
        assert!(ctx.asg.is(2, FlagVar::SUBSTITUTED));
        assert_eq!(ctx.stats.num_substituted_var, 1);
        assert_eq!(live(&ctx), vec![vec![-3, -1, 4], vec![1, 3]]);
        assert_eq!(ctx.ext.len(), 2);
        assert!(ctx.check_consistency().is_ok());
        for v1 in [false, true] {
            let mut model = vec![None, Some(v1), None, Some(!v1), Some(true)];
            ctx.ext.extend_model(&mut model);
            assert_eq!(model[2], Some(v1));
        }
    }
    #[test]
    fn test_frozen_member_is_representative() {
        let mut ctx = setup(3, &[&[-1, 2], &[-2, 1], &[1, 3]]);
        ctx.asg.set(2, FlagVar::FROZEN, true);
        let mut ee = Equivalence::instantiate(&ctx.config, &CNFDescription::default());
        ee.process(&mut ctx);
        assert!(ctx.asg.is(1, FlagVar::SUBSTITUTED));
        assert!(!ctx.asg.is(2, FlagVar::SUBSTITUTED));
        assert_eq!(live(&ctx), vec![vec![2, 3]]);
    }
    #[test]
    fn test_both_frozen_stay() {
        let mut ctx = setup(3, &[&[-1, 2], &[-2, 1], &[1, 3]]);
        ctx.asg.set(1, FlagVar::FROZEN, true);
        ctx.asg.set(2, FlagVar::FROZEN, true);
        let mut ee = Equivalence::instantiate(&ctx.config, &CNFDescription::default());
        ee.process(&mut ctx);
        assert_eq!(ctx.stats.num_substituted_var, 0);
        assert_eq!(live(&ctx).len(), 3);
    }
    #[test]
    fn test_complementary_scc() {
        let mut ctx = setup(2, &[&[1, 2], &[-1, -2], &[-1, 2], &[1, -2]]);
        let mut ee = Equivalence::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(ee.process(&mut ctx), Status::Unsat);
        assert!(ctx.is_unsat());
    }
    #[test]
    fn test_rewritten_duplicate_is_merged() {
        // (1 | 3) and (2 | 3) become the same clause
        let mut ctx = setup(3, &[&[-1, 2], &[-2, 1], &[1, 3], &[2, 3]]);
        let mut ee = Equivalence::instantiate(&ctx.config, &CNFDescription::default());
        ee.process(&mut ctx);
        assert_eq!(live(&ctx), vec![vec![1, 3]]);
    }
}
