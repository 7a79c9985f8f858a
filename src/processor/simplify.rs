/// Module `simplify` applies root level assignments to clauses.
use {
    super::{Budget, EngineContext, Technique},
    crate::{
        assign::AssignIF,
        cdb::{ClauseDBIF, ClauseIF},
        types::*,
    },
};

impl EngineContext {
    /// apply the root level assignments on the trail to the formula:
    /// satisfied clauses are removed and falsified literals are dropped.
    /// Units found on the way are propagated to a fixed point.
    ///
    /// # Errors
    ///
    /// `RootLevelConflict` if a clause becomes empty.
    pub fn propagate_units(&mut self) -> MaybeInconsistent {
        debug_assert_eq!(self.asg.decision_level(), 0);
        while let Some(l) = self.asg.trail().get(self.num_applied).copied() {
            self.num_applied += 1;
            for cr in self.occur.list(l).to_vec() {
                if self.cdb.get(cr).map_or(false, |c| !c.is_dead() && c.contains(l)) {
                    #[cfg(feature = "trace_elimination")]
                    println!(" - {} is satisfied by {}", self.cdb[cr], l);
                    self.remove_clause(cr);
                }
            }
            let false_lit = !l;
            for cr in self.occur.list(false_lit).to_vec() {
                if self
                    .cdb
                    .get(cr)
                    .map_or(false, |c| !c.is_dead() && c.contains(false_lit))
                {
                    self.strengthen(cr, false_lit)?;
                }
            }
        }
        Ok(())
    }
}

/// Unit propagation over the whole formula.
#[derive(Clone, Debug, Default)]
pub struct UnitPropagator {
    budget: Budget,
    num_runs: usize,
}

impl Instantiate for UnitPropagator {
    fn instantiate(_config: &Config, _cnf: &CNFDescription) -> Self {
        UnitPropagator::default()
    }
}

impl Technique for UnitPropagator {
    fn name(&self) -> &'static str {
        "unit propagation"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        ctx.cancel_to_root();
        let before = ctx.asg.stack_len();
        let r = ctx.propagate_units();
        log::trace!(
            "unit propagation #{}: {} new units",
            self.num_runs,
            ctx.asg.stack_len() - before
        );
        ctx.conclude(r)
    }
}
