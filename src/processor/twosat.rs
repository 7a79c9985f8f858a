/// Module `twosat` solves the binary sub-formula.
///
/// Assignments live in two layers. A decision and its implications go to the
/// temporary layer; if they conflict, the negation of the decision is implied
/// by the formula and becomes permanent, and the temporary layer is thrown
/// away. With no free literal left, both layers together satisfy every binary
/// clause and are exported as phase hints.
use {
    super::{Budget, EngineContext, Technique},
    crate::{assign::AssignIF, big::BIG, types::*},
};

/// 2-SAT solver over the binary implication graph
#[derive(Clone, Debug, Default)]
pub struct TwoSat {
    budget: Budget,
    big: BIG,
    /// literals true in the permanent layer
    perm: Vec<bool>,
    /// literals true in the temporary layer
    temp: Vec<bool>,
    temp_trail: Vec<Lit>,
    /// permanent literals in the order of derivation
    units: Vec<Lit>,
    num_runs: usize,
}

impl Instantiate for TwoSat {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        TwoSat {
            big: BIG::new(cnf.num_of_variables),
            ..TwoSat::default()
        }
    }
}

impl Technique for TwoSat {
    fn name(&self) -> &'static str {
        "2-SAT"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        let limit = ctx.step_limit(ctx.config.twosat_steps);
        self.budget.start(limit, &ctx.interrupted);
        let units = ctx.stats.num_twosat_unit;
        let r = self.run(ctx);
        log::debug!(
            "2-SAT #{}: {} units, {} steps",
            self.num_runs,
            ctx.stats.num_twosat_unit - units,
            self.budget.steps_used(),
        );
        ctx.conclude(r)
    }
    fn reset(&mut self) {
        self.perm.clear();
        self.temp.clear();
        self.temp_trail.clear();
        self.units.clear();
    }
}

impl TwoSat {
    fn run(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        ctx.propagate_units()?;
        self.big.build(&ctx.asg, &ctx.cdb, &mut ctx.rng);
        if self.big.num_edges() == 0 {
            return Ok(());
        }
        let nv = ctx.num_vars();
        self.reset();
        self.perm.resize(2 * (nv + 1), false);
        self.temp.resize(2 * (nv + 1), false);
        let solved = match self.solve(ctx) {
            Ok(solved) => solved,
            Err(e) => {
                // the units lead to the conflict by binary propagation
                for l in std::mem::take(&mut self.units) {
                    ctx.assign_unit(l)?;
                }
                return Err(e);
            }
        };
        for l in std::mem::take(&mut self.units) {
            if ctx.asg.assigned(l).is_none() {
                ctx.assign_unit(l)?;
                ctx.stats.num_twosat_unit += 1;
            }
        }
        if solved {
            for vi in 1..=nv {
                let p = Lit::from((vi, true));
                if self.is_true(p) {
                    ctx.asg.set_phase(vi, true);
                } else if self.is_true(!p) {
                    ctx.asg.set_phase(vi, false);
                }
            }
        }
        ctx.propagate_units()
    }
    /// Return `Ok(true)` if every var in the graph got a value.
    fn solve(&mut self, ctx: &EngineContext) -> Result<bool, SolverError> {
        let nv = ctx.num_vars();
        let mut vi = 1;
        while vi <= nv {
            if !self.budget.spend(1) {
                return Ok(false);
            }
            let p = Lit::from((vi, true));
            if ctx.asg.assign(vi).is_some()
                || (self.big.children(p).is_empty() && self.big.children(!p).is_empty())
                || self.is_true(p)
                || self.is_true(!p)
            {
                vi += 1;
                continue;
            }
            let l = if ctx.asg.phase(vi).unwrap_or(false) {
                p
            } else {
                !p
            };
            if self.propagate_temporarily(l) {
                vi += 1;
                continue;
            }
            for x in self.temp_trail.drain(..) {
                self.temp[x] = false;
            }
            if !self.propagate_permanently(!l) {
                return Err(SolverError::Inconsistent);
            }
            vi = 1;
        }
        Ok(true)
    }
    fn is_true(&self, l: Lit) -> bool {
        self.perm[l] || self.temp[l]
    }
    /// Return `false` if a conflict was found.
    fn propagate_temporarily(&mut self, l: Lit) -> bool {
        let mut i = self.temp_trail.len();
        self.temp[l] = true;
        self.temp_trail.push(l);
        while let Some(x) = self.temp_trail.get(i).copied() {
            i += 1;
            for c in self.big.children(x).iter().copied() {
                self.budget.spend(1);
                if self.is_true(c) {
                    continue;
                }
                if self.is_true(!c) {
                    return false;
                }
                self.temp[c] = true;
                self.temp_trail.push(c);
            }
        }
        true
    }
    /// Return `false` if a conflict was found.
    fn propagate_permanently(&mut self, l: Lit) -> bool {
        if self.perm[!l] {
            return false;
        }
        if self.perm[l] {
            return true;
        }
        let mut i = self.units.len();
        self.perm[l] = true;
        self.units.push(l);
        while let Some(x) = self.units.get(i).copied() {
            i += 1;
            for c in self.big.children(x).iter().copied() {
                self.budget.spend(1);
                if self.perm[c] {
                    continue;
                }
                if self.perm[!c] {
                    return false;
                }
                self.perm[c] = true;
                self.units.push(c);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::processor::tests::{live, setup},
    };

    #[test]
    fn test_witness_as_phases() {
        let clauses: &[&[i32]] = &[&[1, 2], &[-1, 2], &[-2, 3], &[-3, -4]];
        let mut ctx = setup(4, clauses);
        let mut ts = TwoSat::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(ts.process(&mut ctx), Status::Unknown);
        assert_eq!(ctx.stats.num_twosat_unit, 0);
        for c in clauses.iter() {
            assert!(c
                .iter()
                .any(|l| ctx.asg.phase(l.unsigned_abs() as usize) == Some(0 < *l)));
        }
    }
    #[test]
    fn test_failed_decision_becomes_unit() {
        let mut ctx = setup(4, &[&[1, 2], &[1, -2], &[3, 4]]);
        let mut ts = TwoSat::instantiate(&ctx.config, &CNFDescription::default());
        ts.process(&mut ctx);
        assert_eq!(ctx.asg.assigned(Lit::from(1i32)), Some(true));
        assert_eq!(ctx.stats.num_twosat_unit, 1);
        assert_eq!(live(&ctx), vec![vec![3, 4]]);
    }
    #[test]
    fn test_unsat_binary_formula() {
        let mut ctx = setup(3, &[&[1, 2], &[1, -2], &[-1, 3], &[-1, -3]]);
        let mut ts = TwoSat::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(ts.process(&mut ctx), Status::Unsat);
    }
}
