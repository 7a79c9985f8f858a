/// implement boolean constraint propagation and backjump
use {
    super::{AssignIF, AssignStack},
    crate::{
        cdb::{ClauseDB, ClauseDBIF, ClauseIF, ClauseRef, OccurIndex},
        types::*,
    },
};

/// API for Boolean Constraint Propagation like
/// [`propagate`](`crate::assign::PropagateIF::propagate`),
/// [`assign_by_decision`](`crate::assign::PropagateIF::assign_by_decision`),
/// [`cancel_until`](`crate::assign::PropagateIF::cancel_until`), and so on.
pub trait PropagateIF {
    /// add an assignment at root level as a precondition.
    ///
    /// # Errors
    ///
    /// emit `SolverError::RootLevelConflict` if the complement is assigned.
    fn assign_at_root_level(&mut self, l: Lit) -> MaybeInconsistent;
    /// unsafe enqueue (assign by implication); doesn't emit an exception.
    fn assign_by_implication(&mut self, l: Lit);
    /// unsafe assume (assign by decision); doesn't emit an exception.
    fn assign_by_decision(&mut self, l: Lit);
    /// execute *backjump*.
    fn cancel_until(&mut self, lv: DecisionLevel);
    /// execute *boolean constraint propagation* over the occurrence index.
    /// Return a falsified clause if one is found.
    fn propagate(&mut self, cdb: &ClauseDB, occur: &OccurIndex) -> Option<ClauseRef>;
    /// execute propagation at root level.
    ///
    /// # Errors
    ///
    /// emit `SolverError::Inconsistent` if a conflict is found.
    fn propagate_at_root_level(&mut self, cdb: &ClauseDB, occur: &OccurIndex) -> MaybeInconsistent;
}

macro_rules! set_assign {
    ($asg: expr, $lit: expr) => {
        $asg.assign[$lit.vi()] = Some(bool::from($lit));
    };
}

macro_rules! unset_assign {
    ($asg: expr, $var: expr) => {
        $asg.assign[$var] = None;
    };
}

impl PropagateIF for AssignStack {
    fn assign_at_root_level(&mut self, l: Lit) -> MaybeInconsistent {
        self.cancel_until(0);
        let vi = l.vi();
        if self.num_vars < vi {
            return Err(SolverError::OutOfRange);
        }
        debug_assert!(!self.flags[vi].contains(FlagVar::ELIMINATED));
        match self.assign[vi] {
            None => {
                set_assign!(self, l);
                self.level[vi] = 0;
                debug_assert!(!self.trail.contains(&!l));
                self.trail.push(l);
                Ok(())
            }
            Some(x) if x == bool::from(l) => Ok(()),
            _ => Err(SolverError::RootLevelConflict(l)),
        }
    }
    fn assign_by_implication(&mut self, l: Lit) {
        let vi = l.vi();
        debug_assert!(!self.flags[vi].contains(FlagVar::ELIMINATED));
        debug_assert!(self.assign[vi].is_none());
        set_assign!(self, l);
        self.level[vi] = self.decision_level();
        self.trail.push(l);
    }
    fn assign_by_decision(&mut self, l: Lit) {
        debug_assert!(self.assign[l.vi()].is_none());
        debug_assert_eq!(self.q_head, self.trail.len());
        self.trail_lim.push(self.trail.len());
        let vi = l.vi();
        set_assign!(self, l);
        self.level[vi] = self.decision_level();
        self.trail.push(l);
    }
    fn cancel_until(&mut self, lv: DecisionLevel) {
        if self.trail_lim.len() as u32 <= lv {
            return;
        }
        let lim = self.trail_lim[lv as usize];
        for l in self.trail[lim..].iter() {
            let vi = l.vi();
            debug_assert!(lv < self.level[vi]);
            unset_assign!(self, vi);
        }
        self.trail.truncate(lim);
        self.trail_lim.truncate(lv as usize);
        self.q_head = self.q_head.min(lim);
    }
    fn propagate(&mut self, cdb: &ClauseDB, occur: &OccurIndex) -> Option<ClauseRef> {
        while let Some(p) = self.trail.get(self.q_head).copied() {
            self.q_head += 1;
            self.num_propagation += 1;
            let false_lit = !p;
            'next_clause: for cr in occur.list(false_lit).iter() {
                let Some(c) = cdb.get(*cr) else {
                    continue;
                };
                if c.is_dead() || !c.contains(false_lit) {
                    continue;
                }
                let mut unit: Option<Lit> = None;
                for l in c.iter() {
                    match self.assigned(*l) {
                        Some(true) => continue 'next_clause,
                        Some(false) => (),
                        None if unit.is_none() => unit = Some(*l),
                        None => continue 'next_clause,
                    }
                }
                match unit {
                    Some(u) => self.assign_by_implication(u),
                    None => {
                        self.q_head = self.trail.len();
                        return Some(*cr);
                    }
                }
            }
        }
        None
    }
    fn propagate_at_root_level(&mut self, cdb: &ClauseDB, occur: &OccurIndex) -> MaybeInconsistent {
        debug_assert_eq!(self.decision_level(), 0);
        match self.propagate(cdb, occur) {
            None => Ok(()),
            Some(_) => Err(SolverError::Inconsistent),
        }
    }
}
