use std::fmt;

/// Clause handle: an index into [`ClauseDB`](`crate::cdb::ClauseDB`) and the
/// epoch of the arena when the handle was issued.
/// Compaction bumps the arena's epoch, so a handle which wasn't relocated is
/// detected as stale rather than silently pointing to another clause.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClauseRef {
    pub(super) epoch: u32,
    pub(super) index: u32,
}

impl ClauseRef {
    /// return the slot position in the arena.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
    /// return the epoch of the arena which issued this handle.
    #[inline]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

impl fmt::Debug for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}C@{}", self.index, self.epoch)
    }
}

impl fmt::Display for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}C@{}", self.index, self.epoch)
    }
}

/// old slot to new slot mapping made by a compaction.
#[derive(Clone, Debug)]
pub struct Relocation {
    pub(super) from_epoch: u32,
    pub(super) to_epoch: u32,
    /// `u32::MAX` marks a reclaimed slot.
    pub(super) map: Vec<u32>,
}

impl Relocation {
    /// return the new handle, or `None` if the clause was reclaimed.
    ///
    /// # Panics
    ///
    /// if `cr` doesn't belong to the arena before compaction.
    pub fn apply(&self, cr: ClauseRef) -> Option<ClauseRef> {
        assert_eq!(
            cr.epoch, self.from_epoch,
            "relocating a stale handle {cr} (arena epoch {})",
            self.from_epoch
        );
        match self.map.get(cr.index as usize) {
            Some(&i) if i != u32::MAX => Some(ClauseRef {
                epoch: self.to_epoch,
                index: i,
            }),
            _ => None,
        }
    }
    /// return the number of surviving clauses.
    pub fn num_survivors(&self) -> usize {
        self.map.iter().filter(|i| **i != u32::MAX).count()
    }
}

/// API for collections holding clause handles. Every such collection must be
/// passed to [`compact`](`crate::cdb::ClauseDBIF::compact`).
pub trait RelocateIF {
    /// rewrite all handles; handles to reclaimed clauses are dropped.
    fn relocate(&mut self, map: &Relocation);
}

impl RelocateIF for Vec<ClauseRef> {
    fn relocate(&mut self, map: &Relocation) {
        let mut j = 0;
        for i in 0..self.len() {
            if let Some(cr) = map.apply(self[i]) {
                self[j] = cr;
                j += 1;
            }
        }
        self.truncate(j);
    }
}

impl RelocateIF for std::collections::VecDeque<ClauseRef> {
    fn relocate(&mut self, map: &Relocation) {
        let mut v: std::collections::VecDeque<ClauseRef> =
            self.drain(..).filter_map(|cr| map.apply(cr)).collect();
        std::mem::swap(self, &mut v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_vec() {
        let map = Relocation {
            from_epoch: 0,
            to_epoch: 1,
            map: vec![0, u32::MAX, 1],
        };
        let mut v = vec![
            ClauseRef { epoch: 0, index: 2 },
            ClauseRef { epoch: 0, index: 1 },
            ClauseRef { epoch: 0, index: 0 },
        ];
        v.relocate(&map);
        assert_eq!(
            v,
            vec![ClauseRef { epoch: 1, index: 1 }, ClauseRef { epoch: 1, index: 0 }]
        );
        assert_eq!(map.num_survivors(), 2);
    }
    #[test]
    #[should_panic]
    fn test_relocate_stale_handle() {
        let map = Relocation {
            from_epoch: 3,
            to_epoch: 4,
            map: vec![0],
        };
        let _ = map.apply(ClauseRef { epoch: 2, index: 0 });
    }
}
