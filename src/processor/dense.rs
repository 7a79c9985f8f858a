/// Module `dense` renumbers vars compactly for export.
///
/// The internal formula keeps its numbering; only the exported formula, the
/// literal lookup and the model decompression use the dense one.
use {
    super::{Budget, EngineContext, Technique},
    crate::{
        assign::AssignIF,
        cdb::{ClauseDBIF, ClauseIF},
        types::*,
    },
    ahash::AHashMap,
};

/// Var renumbering: vars in live clauses, frozen vars and root assigned vars
/// get consecutive numbers from 1 in the original order.
#[derive(Clone, Debug, Default)]
pub struct Densifier {
    budget: Budget,
    /// old var -> new var
    forward: AHashMap<VarId, VarId>,
    /// new var -> old var; index 0 is unused.
    backward: Vec<VarId>,
    num_runs: usize,
}

impl Instantiate for Densifier {
    fn instantiate(_config: &Config, _cnf: &CNFDescription) -> Self {
        Densifier::default()
    }
}

impl Technique for Densifier {
    fn name(&self) -> &'static str {
        "densing"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        self.budget.start(usize::MAX, &ctx.interrupted);
        self.build(ctx);
        log::debug!(
            "densing #{}: {} vars to {} vars",
            self.num_runs,
            ctx.num_vars(),
            self.num_vars(),
        );
        ctx.conclude(Ok(()))
    }
    fn destroy(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}

impl Densifier {
    /// compute the mapping from the current formula.
    pub fn build(&mut self, ctx: &EngineContext) {
        let nv = ctx.num_vars();
        let mut used = vec![false; nv + 1];
        for c in ctx.cdb.iter().filter(|c| !c.is_dead()) {
            self.budget.spend(c.len());
            for l in c.iter() {
                used[l.vi()] = true;
            }
        }
        for vi in 1..=nv {
            if ctx.is_frozen(vi) || ctx.asg.assign(vi).is_some() {
                used[vi] = true;
            }
        }
        self.forward.clear();
        self.backward.clear();
        self.backward.push(0);
        for (vi, _) in used.iter().enumerate().skip(1).filter(|(_, u)| **u) {
            self.backward.push(vi);
            self.forward.insert(vi, self.backward.len() - 1);
        }
    }
    /// return `true` if a mapping is in effect.
    pub fn is_active(&self) -> bool {
        !self.backward.is_empty()
    }
    /// return the number of vars after renumbering.
    pub fn num_vars(&self) -> usize {
        self.backward.len().saturating_sub(1)
    }
    /// return the new number of an original var, if it survives.
    pub fn new_var(&self, vi: VarId) -> Option<VarId> {
        self.forward.get(&vi).copied()
    }
    /// return the new literal of an original literal, if its var survives.
    pub fn new_lit(&self, l: Lit) -> Option<Lit> {
        self.new_var(l.vi())
            .map(|vi| Lit::from((vi, l.is_positive())))
    }
    /// return the original var of a renumbered one.
    pub fn old_var(&self, vi: VarId) -> Option<VarId> {
        self.backward.get(vi).copied().filter(|v| 0 < *v)
    }
    /// return the original literal of a renumbered one.
    pub fn old_lit(&self, l: Lit) -> Option<Lit> {
        self.old_var(l.vi())
            .map(|vi| Lit::from((vi, l.is_positive())))
    }
    /// map a model indexed by new vars to one indexed by original vars.
    /// Vars without a new number stay unassigned.
    pub fn decompress(&self, model: &[Option<bool>], num_vars: usize) -> Vec<Option<bool>> {
        let mut v = vec![None; num_vars + 1];
        for (new, old) in self.backward.iter().enumerate().skip(1) {
            if let Some(b) = model.get(new).copied().flatten() {
                v[*old] = Some(b);
            }
        }
        v
    }
    /// append a new var to the mapping; return its new number.
    pub fn push_var(&mut self, vi: VarId) -> VarId {
        if self.backward.is_empty() {
            self.backward.push(0);
        }
        self.backward.push(vi);
        let new = self.backward.len() - 1;
        self.forward.insert(vi, new);
        new
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::processor::tests::setup};

    #[test]
    fn test_renumbering() {
        let mut ctx = setup(6, &[&[2, -4], &[-2, 4, 6]]);
        ctx.assign_unit(Lit::from(1i32)).expect("consistent");
        ctx.asg.set(5, FlagVar::FROZEN, true);
        let mut dense = Densifier::instantiate(&ctx.config, &CNFDescription::default());
        assert!(!dense.is_active());
        dense.process(&mut ctx);
        assert!(dense.is_active());
        assert_eq!(dense.num_vars(), 5);
        assert_eq!(dense.new_var(1), Some(1));
        assert_eq!(dense.new_var(3), None);
        assert_eq!(dense.new_lit(Lit::from(-4i32)), Some(Lit::from(-3i32)));
        assert_eq!(dense.new_var(6), Some(5));
        assert_eq!(dense.old_lit(Lit::from(-4i32)), Some(Lit::from(-5i32)));
        assert_eq!(dense.old_var(0), None);
        let model = vec![None, Some(true), Some(false), Some(true), Some(false), Some(true)];
        assert_eq!(
            dense.decompress(&model, 6),
            vec![None, Some(true), Some(false), None, Some(true), Some(false), Some(true)]
        );
        assert_eq!(dense.push_var(7), 6);
        assert_eq!(dense.old_var(6), Some(7));
    }
}
