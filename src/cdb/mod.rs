/// methods on clause
mod clause;
/// clause handles and relocation
mod cref;
/// occurrence index
pub mod occur;

pub use self::{
    clause::{normalize, Clause, ClauseIF},
    cref::{ClauseRef, RelocateIF, Relocation},
    occur::OccurIndex,
};

use {
    crate::types::*,
    std::{ops::Index, slice::Iter},
};

/// API for clause management like [`new_clause`](`crate::cdb::ClauseDBIF::new_clause`),
/// [`remove_clause`](`crate::cdb::ClauseDBIF::remove_clause`) and
/// [`compact`](`crate::cdb::ClauseDBIF::compact`).
pub trait ClauseDBIF: Index<ClauseRef, Output = Clause> {
    /// return the number of slots including dead ones.
    fn len(&self) -> usize;
    /// return true if there's no live clause.
    fn is_empty(&self) -> bool;
    /// return an iterator over all slots.
    fn iter(&self) -> Iter<'_, Clause>;
    /// return the clause if the handle is valid.
    fn get(&self, cr: ClauseRef) -> Option<&Clause>;
    /// return the clause if the handle is valid.
    fn get_mut(&mut self, cr: ClauseRef) -> Option<&mut Clause>;
    /// return handles of all live clauses.
    fn refs(&self) -> Vec<ClauseRef>;
    /// allocate a new clause. `lits` must be free from duplicates and tautologies
    /// and hold at least two literals.
    fn new_clause(&mut self, lits: Vec<Lit>, redundant: bool) -> ClauseRef;
    /// mark a clause dead. The slot is reclaimed by the next compaction.
    fn remove_clause(&mut self, cr: ClauseRef);
    /// remove a literal from a clause in place; return the new length.
    fn strengthen_clause(&mut self, cr: ClauseRef, lit: Lit) -> usize;
    /// make a redundant clause irredundant.
    fn make_irredundant(&mut self, cr: ClauseRef);
    /// rebuild the arena with live clauses only and relocate all handles held by
    /// `holders`. Handles not included there become stale.
    fn compact(&mut self, holders: &mut [&mut dyn RelocateIF]) -> Relocation;
}

/// Clause database
///
///```
/// use sprep::{config::Config, types::*};
/// use sprep::cdb::{ClauseDB, ClauseDBIF};
/// let mut cdb = ClauseDB::instantiate(&Config::default(), &CNFDescription::default());
/// let cr = cdb.new_clause(vec![Lit::from(1i32), Lit::from(-2i32)], false);
/// assert_eq!(Vec::<i32>::from(&cdb[cr]), vec![1, -2]);
///```
#[derive(Clone, Debug, Default)]
pub struct ClauseDB {
    clause: Vec<Clause>,
    epoch: u32,
    num_active: usize,
    num_redundant: usize,
    num_bi_clause: usize,
    num_lits: usize,
    num_compaction: usize,
}

impl Index<ClauseRef> for ClauseDB {
    type Output = Clause;
    #[inline]
    fn index(&self, cr: ClauseRef) -> &Clause {
        assert_eq!(
            cr.epoch, self.epoch,
            "dereferencing a stale handle {cr} (arena epoch {})",
            self.epoch
        );
        &self.clause[cr.index as usize]
    }
}

impl Instantiate for ClauseDB {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        ClauseDB {
            clause: Vec::with_capacity(cnf.num_of_clauses),
            ..ClauseDB::default()
        }
    }
}

impl ClauseDBIF for ClauseDB {
    fn len(&self) -> usize {
        self.clause.len()
    }
    fn is_empty(&self) -> bool {
        self.num_active == 0
    }
    fn iter(&self) -> Iter<'_, Clause> {
        self.clause.iter()
    }
    fn get(&self, cr: ClauseRef) -> Option<&Clause> {
        if cr.epoch == self.epoch {
            self.clause.get(cr.index as usize)
        } else {
            None
        }
    }
    fn get_mut(&mut self, cr: ClauseRef) -> Option<&mut Clause> {
        if cr.epoch == self.epoch {
            self.clause.get_mut(cr.index as usize)
        } else {
            None
        }
    }
    fn refs(&self) -> Vec<ClauseRef> {
        let epoch = self.epoch;
        self.clause
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_dead())
            .map(|(i, _)| ClauseRef {
                epoch,
                index: i as u32,
            })
            .collect()
    }
    fn new_clause(&mut self, lits: Vec<Lit>, redundant: bool) -> ClauseRef {
        let c = Clause::new(lits, redundant);
        debug_assert!(1 < c.len(), "too short clause {c}");
        debug_assert!(
            c.lits.windows(2).all(|w| w[0] != !w[1]),
            "a tautology {c}"
        );
        self.num_active += 1;
        self.num_lits += c.len();
        if c.len() == 2 {
            self.num_bi_clause += 1;
        }
        if redundant {
            self.num_redundant += 1;
        }
        let cr = ClauseRef {
            epoch: self.epoch,
            index: self.clause.len() as u32,
        };
        self.clause.push(c);
        cr
    }
    fn remove_clause(&mut self, cr: ClauseRef) {
        let epoch = self.epoch;
        let c = &mut self.clause[cr.index as usize];
        assert_eq!(cr.epoch, epoch, "removing through a stale handle {cr}");
        debug_assert!(!c.is_dead(), "double removal of {cr}{c}");
        c.turn_on(FlagClause::DEAD);
        self.num_active -= 1;
        self.num_lits -= c.len();
        if c.len() == 2 {
            self.num_bi_clause -= 1;
        }
        if c.is(FlagClause::REDUNDANT) {
            self.num_redundant -= 1;
        }
    }
    fn strengthen_clause(&mut self, cr: ClauseRef, lit: Lit) -> usize {
        assert_eq!(cr.epoch, self.epoch, "strengthening through a stale handle {cr}");
        let c = &mut self.clause[cr.index as usize];
        debug_assert!(!c.is_dead());
        if c.remove_lit(lit) {
            self.num_lits -= 1;
            if c.len() == 2 {
                self.num_bi_clause += 1;
            }
            c.turn_on(FlagClause::SUBSUME | FlagClause::STRENGTHEN);
        }
        c.len()
    }
    fn make_irredundant(&mut self, cr: ClauseRef) {
        let c = &mut self.clause[cr.index as usize];
        if c.is(FlagClause::REDUNDANT) {
            c.turn_off(FlagClause::REDUNDANT);
            self.num_redundant -= 1;
        }
    }
    fn compact(&mut self, holders: &mut [&mut dyn RelocateIF]) -> Relocation {
        let from_epoch = self.epoch;
        let to_epoch = from_epoch.wrapping_add(1);
        let mut map = Vec::with_capacity(self.clause.len());
        let mut next = 0u32;
        for c in self.clause.iter() {
            if c.is_dead() {
                map.push(u32::MAX);
            } else {
                map.push(next);
                next += 1;
            }
        }
        self.clause.retain(|c| !c.is_dead());
        self.epoch = to_epoch;
        self.num_compaction += 1;
        let relocation = Relocation {
            from_epoch,
            to_epoch,
            map,
        };
        for h in holders.iter_mut() {
            h.relocate(&relocation);
        }
        relocation
    }
}

impl ClauseDB {
    /// return the number of dead slots waiting for compaction.
    pub fn num_garbage(&self) -> usize {
        self.clause.len() - self.num_active
    }
    /// return the current epoch.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }
    /// return the first clause which isn't satisfied by `assign` indexed by var.
    pub fn validate(&self, assign: &[Option<bool>]) -> Option<ClauseRef> {
        self.refs().into_iter().find(|cr| {
            !self[*cr]
                .iter()
                .any(|l| l.value_under(assign.get(l.vi()).copied().flatten()) == Some(true))
        })
    }
}

pub mod property {
    use super::ClauseDB;
    use crate::types::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Tusize {
        NumActive,
        NumBiClause,
        NumCompaction,
        NumLiteral,
        NumRedundant,
    }

    impl PropertyDereference<Tusize, usize> for ClauseDB {
        #[inline]
        fn derefer(&self, k: Tusize) -> usize {
            match k {
                Tusize::NumActive => self.num_active,
                Tusize::NumBiClause => self.num_bi_clause,
                Tusize::NumCompaction => self.num_compaction,
                Tusize::NumLiteral => self.num_lits,
                Tusize::NumRedundant => self.num_redundant,
            }
        }
    }
}
