//! Helpers shared by integration tests: a brute force checker, a forward
//! RUP proof checker and a tiny DPLL solver behind `SolverIF`.
#![allow(dead_code)]
use sprep::{preprocessor::SolverIF, types::*};

/// return `true` if `model` (DIMACS literals) satisfies all `clauses`.
pub fn satisfies(model: &[i32], clauses: &[Vec<i32>]) -> bool {
    clauses.iter().all(|c| {
        c.iter()
            .any(|l| model.get(l.unsigned_abs() as usize - 1) == Some(l))
    })
}

/// return a model of `clauses` over vars `1..=num_vars` by enumeration.
pub fn brute_force(num_vars: usize, clauses: &[Vec<i32>]) -> Option<Vec<i32>> {
    assert!(num_vars <= 20, "too many vars for enumeration");
    (0..(1u32 << num_vars)).find_map(|bits| {
        let model = (1..=num_vars as i32)
            .map(|v| if bits & (1 << (v - 1)) != 0 { v } else { -v })
            .collect::<Vec<_>>();
        satisfies(&model, clauses).then_some(model)
    })
}

/// split a DIMACS literal stream into clauses.
pub fn split_stream(stream: &[i32]) -> Vec<Vec<i32>> {
    let mut v = Vec::new();
    let mut clause = Vec::new();
    for i in stream.iter() {
        if *i == 0 {
            v.push(std::mem::take(&mut clause));
        } else {
            clause.push(*i);
        }
    }
    v
}

/// return `true` if unit propagation on `clauses` with the negation of
/// `lemma` yields a conflict.
pub fn is_rup(clauses: &[Vec<i32>], lemma: &[i32]) -> bool {
    let mut assign: Vec<i32> = lemma.iter().map(|l| -l).collect();
    loop {
        let mut progress = false;
        for c in clauses.iter() {
            if c.iter().any(|l| assign.contains(l)) {
                continue;
            }
            let free = c
                .iter()
                .filter(|l| !assign.contains(&-**l))
                .collect::<Vec<_>>();
            match free.len() {
                0 => return true,
                1 => {
                    assign.push(*free[0]);
                    progress = true;
                }
                _ => (),
            }
        }
        if !progress {
            return false;
        }
    }
}

/// check every addition in `steps` against the clauses alive at that point.
/// Return the index of the first step which isn't RUP.
pub fn check_proof(original: &[Vec<i32>], steps: &[(bool, Vec<i32>)]) -> Result<(), usize> {
    let mut clauses = original
        .iter()
        .map(|c| {
            let mut c = c.clone();
            c.sort_unstable();
            c.dedup();
            c
        })
        .collect::<Vec<_>>();
    for (i, (add, lits)) in steps.iter().enumerate() {
        let mut lits = lits.clone();
        lits.sort_unstable();
        if *add {
            if !is_rup(&clauses, &lits) {
                return Err(i);
            }
            clauses.push(lits);
        } else if let Some(j) = clauses.iter().position(|c| *c == lits) {
            clauses.swap_remove(j);
        }
    }
    Ok(())
}

/// A DPLL solver which is just enough to talk to the preprocessor.
#[derive(Clone, Debug, Default)]
pub struct Dpll {
    pub num_vars: usize,
    pub clauses: Vec<Vec<i32>>,
    pub trail: Vec<i32>,
    pub phases: Vec<i32>,
    pub inconsistent: bool,
}

impl Dpll {
    pub fn new(num_vars: usize, clauses: &[Vec<i32>]) -> Self {
        Dpll {
            num_vars,
            clauses: clauses.to_vec(),
            ..Dpll::default()
        }
    }
    fn grow(&mut self, lit: i32) {
        self.num_vars = self.num_vars.max(lit.unsigned_abs() as usize);
    }
    /// return a model over all vars, or `None` if unsatisfiable.
    pub fn solve(&self) -> Option<Vec<i32>> {
        if self.inconsistent {
            return None;
        }
        let mut assign = vec![0i32; self.num_vars + 1];
        for l in self.trail.iter() {
            assign[l.unsigned_abs() as usize] = l.signum();
        }
        if !search(&self.clauses, &mut assign) {
            return None;
        }
        Some(
            (1..=self.num_vars as i32)
                .map(|v| if assign[v as usize] < 0 { -v } else { v })
                .collect(),
        )
    }
}

fn value(assign: &[i32], l: i32) -> i32 {
    assign[l.unsigned_abs() as usize] * l.signum()
}

fn search(clauses: &[Vec<i32>], assign: &mut Vec<i32>) -> bool {
    let saved = assign.clone();
    loop {
        let mut progress = false;
        for c in clauses.iter() {
            if c.iter().any(|l| value(assign, *l) == 1) {
                continue;
            }
            let free = c
                .iter()
                .filter(|l| value(assign, **l) == 0)
                .collect::<Vec<_>>();
            match free.len() {
                0 => {
                    *assign = saved;
                    return false;
                }
                1 => {
                    assign[free[0].unsigned_abs() as usize] = free[0].signum();
                    progress = true;
                }
                _ => (),
            }
        }
        if !progress {
            break;
        }
    }
    let Some(v) = clauses
        .iter()
        .flatten()
        .map(|l| l.unsigned_abs() as usize)
        .find(|v| assign[*v] == 0)
    else {
        return true;
    };
    for sign in [1, -1] {
        assign[v] = sign;
        if search(clauses, assign) {
            return true;
        }
    }
    *assign = saved;
    false
}

impl SolverIF for Dpll {
    fn num_vars(&self) -> usize {
        self.num_vars
    }
    fn is_ok(&self) -> bool {
        !self.inconsistent
    }
    fn current_trail(&self) -> Vec<i32> {
        self.trail.clone()
    }
    fn assign(&mut self, lit: i32) -> MaybeInconsistent {
        self.grow(lit);
        if self.trail.contains(&-lit) {
            self.inconsistent = true;
            return Err(SolverError::RootLevelConflict(Lit::from(lit)));
        }
        if !self.trail.contains(&lit) {
            self.trail.push(lit);
        }
        Ok(())
    }
    fn propagate(&mut self) -> MaybeInconsistent {
        loop {
            let mut progress = false;
            for i in 0..self.clauses.len() {
                let c = &self.clauses[i];
                if c.iter().any(|l| self.trail.contains(l)) {
                    continue;
                }
                let free = c
                    .iter()
                    .copied()
                    .filter(|l| !self.trail.contains(&-*l))
                    .collect::<Vec<_>>();
                match free.len() {
                    0 => {
                        self.inconsistent = true;
                        return Err(SolverError::Inconsistent);
                    }
                    1 => {
                        self.trail.push(free[0]);
                        progress = true;
                    }
                    _ => (),
                }
            }
            if !progress {
                return Ok(());
            }
        }
    }
    fn take_clauses(&mut self) -> Vec<Vec<i32>> {
        std::mem::take(&mut self.clauses)
    }
    fn add_clause(&mut self, lits: &[i32]) -> MaybeInconsistent {
        if lits.is_empty() {
            self.inconsistent = true;
            return Err(SolverError::EmptyClause);
        }
        for l in lits.iter() {
            self.grow(*l);
        }
        self.clauses.push(lits.to_vec());
        Ok(())
    }
    fn suggest_phase(&mut self, lit: i32) {
        self.phases.push(lit);
    }
}
