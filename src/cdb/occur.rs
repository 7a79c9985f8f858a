//! Occurrence index: literal to clause handles.
use {
    super::{ClauseDB, ClauseDBIF, ClauseIF, ClauseRef, RelocateIF, Relocation},
    crate::types::*,
};

/// Mapping from Literal to Clauses.
///
/// `count` is co-maintained with `lists`. In the concurrent path a removal only
/// decrements counts and marks the lists dirty; the stale handles are purged
/// by [`clean_dirty`](`OccurIndex::clean_dirty`).
#[derive(Clone, Debug, Default)]
pub struct OccurIndex {
    lists: Vec<Vec<ClauseRef>>,
    count: Vec<i32>,
    dirty: Vec<bool>,
    dirty_lits: Vec<Lit>,
}

impl Instantiate for OccurIndex {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> Self {
        let n = 2 * (cnf.num_of_variables + 1);
        OccurIndex {
            lists: vec![Vec::new(); n],
            count: vec![0; n],
            dirty: vec![false; n],
            dirty_lits: Vec::new(),
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        if e == ProcessorEvent::NewVar {
            for _ in 0..2 {
                self.lists.push(Vec::new());
                self.count.push(0);
                self.dirty.push(false);
            }
        }
    }
}

impl OccurIndex {
    /// return the handles of clauses containing `lit`; may contain stale ones
    /// if the list is dirty.
    #[inline]
    pub fn list(&self, lit: Lit) -> &[ClauseRef] {
        &self.lists[usize::from(lit)]
    }
    /// return the number of live clauses containing `lit`.
    #[inline]
    pub fn count(&self, lit: Lit) -> i32 {
        self.count[lit]
    }
    /// return the number of live clauses containing var `vi` in any polarity.
    #[inline]
    pub fn var_count(&self, vi: VarId) -> usize {
        (self.count(Lit::from((vi, true))).max(0) + self.count(Lit::from((vi, false))).max(0))
            as usize
    }
    /// register a clause to all lists of its literals.
    pub fn add(&mut self, cr: ClauseRef, lits: &[Lit]) {
        for l in lits {
            debug_assert!(
                !self.lists[usize::from(*l)].contains(&cr),
                "duplicated occurrence of {cr} in {l}"
            );
            self.lists[usize::from(*l)].push(cr);
            self.count[*l] += 1;
        }
    }
    /// unregister a clause from all lists of its literals.
    pub fn remove(&mut self, cr: ClauseRef, lits: &[Lit]) {
        for l in lits {
            self.remove_lit(cr, *l);
        }
    }
    /// unregister a clause from the list of `lit`, after the literal was removed from it.
    pub fn remove_lit(&mut self, cr: ClauseRef, lit: Lit) {
        let list = &mut self.lists[usize::from(lit)];
        debug_assert!(
            self.dirty[lit] || list.iter().filter(|c| **c == cr).count() == 1,
            "{cr} occurs {} times in {lit}",
            list.iter().filter(|c| **c == cr).count()
        );
        list.delete_unstable(|c| *c == cr);
        self.count[lit] -= 1;
    }
    /// unregister a clause lazily: counts are updated but lists are only marked dirty.
    pub fn remove_lazily(&mut self, lits: &[Lit]) {
        for l in lits {
            self.count[*l] -= 1;
            self.mark_dirty(*l);
        }
    }
    /// mark the list of `lit` as dirty.
    pub fn mark_dirty(&mut self, lit: Lit) {
        if !self.dirty[lit] {
            self.dirty[lit] = true;
            self.dirty_lits.push(lit);
        }
    }
    /// return `true` if some lists hold stale handles.
    pub fn is_dirty(&self) -> bool {
        !self.dirty_lits.is_empty()
    }
    /// purge dead clauses and clauses not containing the literal from dirty lists.
    pub fn clean_dirty(&mut self, cdb: &ClauseDB) {
        for l in std::mem::take(&mut self.dirty_lits) {
            let list = &mut self.lists[usize::from(l)];
            list.retain(|cr| cdb.get(*cr).map_or(false, |c| !c.is_dead() && c.contains(l)));
            list.sort_unstable();
            list.dedup();
            self.count[l] = list.len() as i32;
            self.dirty[l] = false;
        }
    }
    /// drop every handle.
    pub fn clear(&mut self) {
        for list in self.lists.iter_mut() {
            list.clear();
        }
        for c in self.count.iter_mut() {
            *c = 0;
        }
        for d in self.dirty.iter_mut() {
            *d = false;
        }
        self.dirty_lits.clear();
    }
    /// rebuild all lists from the live clauses.
    pub fn rebuild(&mut self, cdb: &ClauseDB) {
        self.clear();
        for cr in cdb.refs() {
            self.add(cr, cdb[cr].lits());
        }
    }
    /// an invariant walk: every live clause occurs exactly once in the list of
    /// each of its literals, and counts match list lengths of clean lists.
    pub fn check_consistency(&self, cdb: &ClauseDB) -> Result<(), String> {
        for cr in cdb.refs() {
            for l in cdb[cr].iter() {
                let n = self.list(*l).iter().filter(|c| **c == cr).count();
                if n != 1 {
                    return Err(format!("{cr}{} occurs {n} times in {l}", cdb[cr]));
                }
            }
        }
        for (i, list) in self.lists.iter().enumerate().skip(2) {
            if self.dirty[i] {
                continue;
            }
            let l = Lit::from(i);
            for cr in list {
                match cdb.get(*cr) {
                    Some(c) if !c.is_dead() && c.contains(l) => (),
                    _ => return Err(format!("{l} holds a stale or dead handle {cr}")),
                }
            }
            if self.count[i] != list.len() as i32 {
                return Err(format!("{l}: count {} != {}", self.count[i], list.len()));
            }
        }
        Ok(())
    }
}

impl RelocateIF for OccurIndex {
    fn relocate(&mut self, map: &Relocation) {
        for list in self.lists.iter_mut() {
            list.relocate(map);
        }
    }
}
