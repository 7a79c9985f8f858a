use {
    crate::types::*,
    std::{fmt, ops::Index, slice::Iter},
};

/// A representation of 'clause'
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Clause {
    /// The literals in a clause, sorted by their encodings.
    pub(crate) lits: Vec<Lit>,
    /// Flags (8 bits)
    pub(crate) flags: FlagClause,
}

/// API for Clause, providing literal accessors.
pub trait ClauseIF {
    /// return true if it contains no literals; a clause after unit propagation.
    fn is_empty(&self) -> bool;
    /// return true if the clause is logically deleted.
    fn is_dead(&self) -> bool;
    /// return an iterator over its literals.
    fn iter(&self) -> Iter<'_, Lit>;
    /// return the number of literals.
    fn len(&self) -> usize;
    /// return `true` if the clause contains the literal.
    fn contains(&self, lit: Lit) -> bool;
    /// return the literal of var `vi` if the clause has it.
    fn lit_of(&self, vi: VarId) -> Option<Lit>;
}

impl Index<usize> for Clause {
    type Output = Lit;
    #[inline]
    fn index(&self, i: usize) -> &Lit {
        &self.lits[i]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;
    type IntoIter = Iter<'a, Lit>;
    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl From<&Clause> for Vec<i32> {
    fn from(c: &Clause) -> Vec<i32> {
        c.lits.iter().map(|l| i32::from(*l)).collect::<Vec<i32>>()
    }
}

impl ClauseIF for Clause {
    fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }
    fn is_dead(&self) -> bool {
        self.flags.contains(FlagClause::DEAD)
    }
    fn iter(&self) -> Iter<'_, Lit> {
        self.lits.iter()
    }
    fn len(&self) -> usize {
        self.lits.len()
    }
    fn contains(&self, lit: Lit) -> bool {
        self.lits.binary_search(&lit).is_ok()
    }
    fn lit_of(&self, vi: VarId) -> Option<Lit> {
        let p = Lit::from((vi, true));
        match self.lits.binary_search(&p) {
            Ok(_) => Some(p),
            Err(i) => self.lits.get(i).copied().filter(|l| l.vi() == vi),
        }
    }
}

impl FlagIF for Clause {
    type FlagType = FlagClause;
    #[inline]
    fn is(&self, flag: Self::FlagType) -> bool {
        self.flags.contains(flag)
    }
    #[inline]
    fn set(&mut self, f: Self::FlagType, b: bool) {
        self.flags.set(f, b);
    }
    #[inline]
    fn turn_off(&mut self, flag: Self::FlagType) {
        self.flags.remove(flag);
    }
    #[inline]
    fn turn_on(&mut self, flag: Self::FlagType) {
        self.flags.insert(flag);
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let st = |flag, mes| if self.is(flag) { mes } else { "" };
        write!(
            f,
            "{{{:?}{}{}}}",
            i32s(&self.lits),
            st(FlagClause::REDUNDANT, ", redundant"),
            st(FlagClause::DEAD, ", dead"),
        )
    }
}

impl Clause {
    /// make a clause from literals; they are sorted and deduplicated.
    pub fn new(mut lits: Vec<Lit>, redundant: bool) -> Self {
        lits.sort_unstable();
        lits.dedup();
        let mut flags = FlagClause::SUBSUME | FlagClause::STRENGTHEN;
        if redundant {
            flags.insert(FlagClause::REDUNDANT);
        }
        Clause { lits, flags }
    }
    /// return the literals.
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }
    /// return `true` if the clause is a learnt one.
    pub fn is_redundant(&self) -> bool {
        self.flags.contains(FlagClause::REDUNDANT)
    }
    /// remove a literal, keeping the order. Return `false` if it isn't in the clause.
    pub(crate) fn remove_lit(&mut self, lit: Lit) -> bool {
        match self.lits.binary_search(&lit) {
            Ok(i) => {
                self.lits.remove(i);
                true
            }
            Err(_) => false,
        }
    }
}

/// normalize a literal vector; return `true` if it's a tautology.
pub fn normalize(lits: &mut Vec<Lit>) -> bool {
    lits.sort_unstable();
    lits.dedup();
    lits.windows(2).any(|w| w[0] == !w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(i: i32) -> Lit {
        Lit::from(i)
    }

    #[test]
    fn test_clause_new_sorts() {
        let c = Clause::new(vec![lit(3), lit(-1), lit(3), lit(2)], false);
        assert_eq!(Vec::<i32>::from(&c), vec![-1, 2, 3]);
        assert!(c.is(FlagClause::SUBSUME));
        assert!(!c.is_redundant());
        assert!(c.contains(lit(2)));
        assert!(!c.contains(lit(-2)));
        assert_eq!(c.lit_of(1), Some(lit(-1)));
        assert_eq!(c.lit_of(4), None);
    }
    #[test]
    fn test_remove_lit() {
        let mut c = Clause::new(vec![lit(1), lit(2), lit(-3)], true);
        assert!(c.remove_lit(lit(2)));
        assert!(!c.remove_lit(lit(2)));
        assert_eq!(Vec::<i32>::from(&c), vec![1, -3]);
        assert_eq!(format!("{c}"), "{[1, -3], redundant}");
    }
    #[test]
    fn test_normalize() {
        let mut v = vec![lit(2), lit(1), lit(2)];
        assert!(!normalize(&mut v));
        assert_eq!(v.len(), 2);
        let mut w = vec![lit(2), lit(1), lit(-2)];
        assert!(normalize(&mut w));
    }
}
