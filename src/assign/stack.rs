/// main struct AssignStack
use {
    super::AssignIF,
    crate::types::*,
    std::{fmt, slice::Iter},
};

/// A record of assignment. It's called 'trail' in Glucose.
/// Only decision level 0 and the probing level 1 are used.
#[derive(Clone, Debug, Default)]
pub struct AssignStack {
    /// var values indexed by var
    pub(super) assign: Vec<Option<bool>>,
    pub(super) level: Vec<DecisionLevel>,
    pub(super) flags: Vec<FlagVar>,
    /// polarity hints made by 2-SAT; exported to the solver as phases
    pub(super) phase: Vec<Option<bool>>,
    /// record of assignment
    pub(super) trail: Vec<Lit>,
    pub(super) trail_lim: Vec<usize>,
    /// the-number-of-assigned-and-propagated-vars + 1
    pub(super) q_head: usize,

    //
    //## Statistics
    //
    /// the number of vars.
    pub num_vars: usize,
    /// the number of eliminated vars.
    pub num_eliminated_vars: usize,
    /// the number of substituted vars.
    pub num_substituted_vars: usize,
    pub(super) num_propagation: usize,
}

impl Instantiate for AssignStack {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> AssignStack {
        let nv = cnf.num_of_variables;
        AssignStack {
            assign: vec![None; 1 + nv],
            level: vec![0; 1 + nv],
            flags: vec![FlagVar::empty(); 1 + nv],
            phase: vec![None; 1 + nv],
            trail: Vec::with_capacity(nv),
            num_vars: nv,
            ..AssignStack::default()
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        match e {
            ProcessorEvent::NewVar => {
                self.assign.push(None);
                self.level.push(0);
                self.flags.push(FlagVar::empty());
                self.phase.push(None);
                self.num_vars += 1;
            }
            ProcessorEvent::Eliminate(vi) => {
                debug_assert!(self.assign[vi].is_none());
                self.flags[vi].insert(FlagVar::ELIMINATED);
                self.num_eliminated_vars += 1;
            }
            ProcessorEvent::Substitute(vi) => {
                debug_assert!(self.assign[vi].is_none());
                self.flags[vi].insert(FlagVar::SUBSTITUTED);
                self.num_substituted_vars += 1;
            }
            ProcessorEvent::Reinitialize => {
                for p in self.phase.iter_mut() {
                    *p = None;
                }
            }
            _ => (),
        }
    }
}

impl AssignIF for AssignStack {
    fn num_vars(&self) -> usize {
        self.num_vars
    }
    #[inline]
    fn assign(&self, vi: VarId) -> Option<bool> {
        self.assign[vi]
    }
    #[inline]
    fn assigned(&self, l: Lit) -> Option<bool> {
        l.value_under(self.assign[l.vi()])
    }
    fn level(&self, vi: VarId) -> DecisionLevel {
        self.level[vi]
    }
    fn decision_level(&self) -> DecisionLevel {
        self.trail_lim.len() as DecisionLevel
    }
    fn trail(&self) -> &[Lit] {
        &self.trail
    }
    fn stack(&self, n: usize) -> Lit {
        self.trail[n]
    }
    fn stack_len(&self) -> usize {
        self.trail.len()
    }
    fn satisfies(&self, lits: &[Lit]) -> bool {
        lits.iter().any(|l| self.assigned(*l) == Some(true))
    }
    #[inline]
    fn is(&self, vi: VarId, flag: FlagVar) -> bool {
        self.flags[vi].contains(flag)
    }
    fn set(&mut self, vi: VarId, flag: FlagVar, b: bool) {
        self.flags[vi].set(flag, b);
    }
    #[inline]
    fn is_removable(&self, vi: VarId) -> bool {
        self.flags[vi].is_removable()
    }
    fn phase(&self, vi: VarId) -> Option<bool> {
        self.phase[vi]
    }
    fn set_phase(&mut self, vi: VarId, b: bool) {
        self.phase[vi] = Some(b);
    }
}

impl AssignStack {
    /// return an iterator over the root level assignments.
    pub fn iter_root(&self) -> Iter<'_, Lit> {
        let end = self.trail_lim.first().copied().unwrap_or(self.trail.len());
        self.trail[..end].iter()
    }
    /// return the number of vars assigned at root level.
    pub fn num_asserted_vars(&self) -> usize {
        self.trail_lim.first().copied().unwrap_or(self.trail.len())
    }
    /// return the number of vars which are neither assigned nor removed.
    pub fn num_unasserted_vars(&self) -> usize {
        self.num_vars
            - self.num_asserted_vars()
            - self.num_eliminated_vars
            - self.num_substituted_vars
    }
    /// return the var values (index 0 is unused).
    pub fn assign_ref(&self) -> &[Option<bool>] {
        &self.assign
    }
}

impl fmt::Display for AssignStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.trail.iter().map(|l| i32::from(*l)).collect::<Vec<_>>();
        let levels = self.trail_lim.len();
        let c = |i| {
            let a = self.trail_lim[i];
            let b = if i + 1 < levels {
                self.trail_lim[i + 1]
            } else {
                self.trail.len()
            };
            (i + 1, &v[a..b])
        };
        if 0 < levels {
            write!(f, "ASG:: trail({}):{:?}\n      {:?}", self.trail.len(), &v[..self.trail_lim[0]], (0..levels).map(c).collect::<Vec<_>>())
        } else {
            write!(f, "ASG:: trail({}):{:?}", self.trail.len(), &v)
        }
    }
}
