use std::fmt;

/// Data storage about a problem.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CNFDescription {
    pub num_of_variables: usize,
    pub num_of_clauses: usize,
}

impl fmt::Display for CNFDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let CNFDescription {
            num_of_variables: nv,
            num_of_clauses: nc,
        } = &self;
        write!(f, "CNF({nv}, {nc})")
    }
}

impl<V: AsRef<[i32]>> From<&[V]> for CNFDescription {
    fn from(vec: &[V]) -> Self {
        let num_of_variables = vec
            .iter()
            .map(|clause| clause.as_ref().iter().map(|l| l.unsigned_abs()).max().unwrap_or(0))
            .max()
            .unwrap_or(0) as usize;
        CNFDescription {
            num_of_variables,
            num_of_clauses: vec.len(),
        }
    }
}
