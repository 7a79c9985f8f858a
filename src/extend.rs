//! Module `extend` provides the model extension stack.
//!
//! A record is a clause removed from the formula together with a literal which
//! should be made true if the clause isn't satisfied by the partial model at
//! the time the record is replayed. Records are stored in a flat vector:
//!
//! ```text
//! [NULL_LIT][chosen][rest of the clause]...[NULL_LIT][chosen][rest]
//! ```
//!
//! and replayed from the last one to the first one.
use {
    crate::types::*,
    std::{fmt, iter::Rev},
};

/// A view of a record on [`ExtensionStack`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Record<'a> {
    lits: &'a [Lit],
}

impl<'a> Record<'a> {
    /// return the literal forced to be true if the clause is falsified.
    pub fn chosen(&self) -> Lit {
        self.lits[0]
    }
    /// return the whole clause; the chosen literal comes first.
    pub fn lits(&self) -> &'a [Lit] {
        self.lits
    }
}

/// Model extension stack
#[derive(Clone, Debug, Default)]
pub struct ExtensionStack {
    lits: Vec<Lit>,
    num_records: usize,
}

impl fmt::Display for ExtensionStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Extension[")?;
        for r in self.iter_records_reverse() {
            write!(f, "{}:{:?} ", r.chosen(), i32s(r.lits()))?;
        }
        write!(f, "]")
    }
}

impl ExtensionStack {
    /// append a record. `clause` may contain `chosen` or not.
    /// The whole record is written by one call, so a record is never left incomplete.
    pub fn push_record(&mut self, chosen: Lit, clause: &[Lit]) {
        debug_assert!(clause.iter().all(|l| *l != NULL_LIT));
        debug_assert!(clause.iter().all(|l| *l != !chosen));
        self.lits.reserve(clause.len() + 2);
        self.lits.push(NULL_LIT);
        self.lits.push(chosen);
        self.lits.extend(clause.iter().copied().filter(|l| *l != chosen));
        self.num_records += 1;
    }
    /// return an iterator from the last record to the first one.
    pub fn iter_records_reverse(&self) -> RecordIter<'_> {
        RecordIter {
            chunks: self
                .lits
                .split(is_separator as fn(&Lit) -> bool)
                .rev(),
        }
    }
    /// return the number of records.
    pub fn len(&self) -> usize {
        self.num_records
    }
    /// return `true` if there's no record.
    pub fn is_empty(&self) -> bool {
        self.num_records == 0
    }
    /// return the number of stored literals including separators.
    pub fn num_lits(&self) -> usize {
        self.lits.len()
    }
    /// discard all records.
    pub fn clear(&mut self) {
        self.lits.clear();
        self.num_records = 0;
    }
    /// extend a partial model indexed by var to a total one.
    ///
    /// `model[vi]` is the value of var `vi`; `None` means unassigned and will be
    /// fixed to `true` before replaying records.
    pub fn extend_model(&self, model: &mut [Option<bool>]) {
        for v in model.iter_mut().skip(1) {
            if v.is_none() {
                *v = Some(true);
            }
        }
        for r in self.iter_records_reverse() {
            let satisfied = r
                .lits()
                .iter()
                .any(|l| l.value_under(model[l.vi()]) == Some(true));
            if !satisfied {
                let chosen = r.chosen();
                model[chosen.vi()] = Some(chosen.is_positive());
            }
        }
    }
}

fn is_separator(l: &Lit) -> bool {
    *l == NULL_LIT
}

/// An iterator over records from the last one.
pub struct RecordIter<'a> {
    chunks: Rev<std::slice::Split<'a, Lit, fn(&Lit) -> bool>>,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Record<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        for chunk in self.chunks.by_ref() {
            if !chunk.is_empty() {
                return Some(Record { lits: chunk });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(i: i32) -> Lit {
        Lit::from(i)
    }

    #[test]
    fn test_records_in_reverse_order() {
        let mut ext = ExtensionStack::default();
        ext.push_record(lit(1), &[lit(1), lit(2)]);
        ext.push_record(lit(-3), &[lit(4), lit(-3)]);
        assert_eq!(ext.len(), 2);
        let v = ext
            .iter_records_reverse()
            .map(|r| i32s(r.lits()))
            .collect::<Vec<_>>();
        assert_eq!(v, vec![vec![-3, 4], vec![1, 2]]);
    }
    #[test]
    fn test_extend_model() {
        // eliminate b from (a | b | c), (-a | b), (-b | c)
        let mut ext = ExtensionStack::default();
        ext.push_record(lit(2), &[lit(1), lit(2), lit(3)]);
        ext.push_record(lit(2), &[lit(-1), lit(2)]);
        // a model of the resolvents (a | c), (-a | c)
        let mut model = vec![None, Some(true), None, Some(true)];
        ext.extend_model(&mut model);
        assert_eq!(model[2], Some(true));
        // the record isn't used because it's satisfied
        let mut model = vec![None, Some(false), Some(false), Some(true)];
        ext.extend_model(&mut model);
        assert_eq!(model[2], Some(false));
    }
    #[test]
    fn test_later_records_are_replayed_first() {
        let mut ext = ExtensionStack::default();
        // x2 <-> x1 by substitution
        ext.push_record(lit(2), &[lit(2), lit(-1)]);
        ext.push_record(lit(-2), &[lit(-2), lit(1)]);
        // then x1 was eliminated with a unit like constraint (x1 | -x3)
        ext.push_record(lit(1), &[lit(1), lit(-3)]);
        let mut model = vec![None, None, None, Some(true)];
        ext.extend_model(&mut model);
        assert_eq!(model[1], Some(true));
        assert_eq!(model[2], Some(true));
        let mut model = vec![None, Some(false), Some(true), Some(false)];
        ext.extend_model(&mut model);
        assert_eq!(model[2], Some(false));
    }
}
