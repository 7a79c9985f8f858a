//! Module `big` provides the binary implication graph.
//!
//! A binary clause `(a | b)` makes two edges `!a -> b` and `!b -> a`.
//! Each literal is stamped with a `(start, stop)` interval by a randomized
//! depth first traversal. If `a`'s interval contains `b`'s, `b` was visited
//! while `a` was on the DFS stack, so there is a path from `a` to `b`.
//! The converse doesn't hold: a path may exist without nesting. Thus
//! [`BIG::implies`] has no false positives but has false negatives.
//! Stamps are valid only for the graph they were computed on; every rebuild
//! recomputes all of them.
use {
    crate::{
        assign::AssignIF,
        cdb::{ClauseDB, ClauseDBIF, ClauseIF},
        types::*,
    },
    rand::{seq::SliceRandom, Rng},
};

/// Binary implication graph
#[derive(Clone, Debug, Default)]
pub struct BIG {
    adj: Vec<Vec<Lit>>,
    start: Vec<u32>,
    stop: Vec<u32>,
    num_vars: usize,
    num_edges: usize,
}

impl BIG {
    /// make an empty graph over `num_vars` vars.
    pub fn new(num_vars: usize) -> Self {
        let n = 2 * (num_vars + 1);
        BIG {
            adj: vec![Vec::new(); n],
            start: vec![0; n],
            stop: vec![0; n],
            num_vars,
            num_edges: 0,
        }
    }
    /// build the graph from the live irredundant binary clauses of unassigned
    /// literals and stamp it.
    pub fn build<A, R>(&mut self, asg: &A, cdb: &ClauseDB, rng: &mut R)
    where
        A: AssignIF,
        R: Rng,
    {
        self.reset(asg.num_vars());
        for c in cdb.iter() {
            if c.is_dead() || c.is_redundant() || c.len() != 2 {
                continue;
            }
            let (a, b) = (c[0], c[1]);
            if asg.assigned(a).is_some() || asg.assigned(b).is_some() {
                continue;
            }
            self.add_edge(!a, b);
            self.add_edge(!b, a);
        }
        self.stamp(rng);
    }
    /// build the graph from binary clauses given as literal pairs and stamp it.
    pub fn build_from<R, I>(&mut self, num_vars: usize, binaries: I, rng: &mut R)
    where
        R: Rng,
        I: IntoIterator<Item = (Lit, Lit)>,
    {
        self.reset(num_vars);
        for (a, b) in binaries {
            self.add_edge(!a, b);
            self.add_edge(!b, a);
        }
        self.stamp(rng);
    }
    fn reset(&mut self, num_vars: usize) {
        let n = 2 * (num_vars + 1);
        self.adj.resize(n, Vec::new());
        self.start.resize(n, 0);
        self.stop.resize(n, 0);
        for a in self.adj.iter_mut() {
            a.clear();
        }
        self.num_vars = num_vars;
        self.num_edges = 0;
    }
    fn add_edge(&mut self, from: Lit, to: Lit) {
        self.adj[from].push(to);
        self.num_edges += 1;
    }
    /// return the number of edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }
    /// return the number of vars.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }
    /// return the literals implied directly by `l`.
    pub fn children(&self, l: Lit) -> &[Lit] {
        &self.adj[l]
    }
    /// return `true` if there's an edge `from -> to`. This check is exact.
    pub fn is_child(&self, from: Lit, to: Lit) -> bool {
        self.adj[from].contains(&to)
    }
    /// return `true` if a path from `a` to `b` is proved by the stamps.
    /// `false` means unknown.
    pub fn implies(&self, a: Lit, b: Lit) -> bool {
        if a == b {
            return false;
        }
        let (sa, ea, sb, eb) = (self.start[a], self.stop[a], self.start[b], self.stop[b]);
        if sa < sb && eb < ea {
            return true;
        }
        let (na, nb) = (!a, !b);
        self.start[nb] < self.start[na] && self.stop[na] < self.stop[nb]
    }
    /// return `true` if `l` has no incoming edge.
    pub fn is_root(&self, l: Lit) -> bool {
        self.adj[!l].is_empty()
    }
    /// return the stamp interval of a literal.
    pub fn stamps(&self, l: Lit) -> (u32, u32) {
        (self.start[l], self.stop[l])
    }
    /// compute DFS intervals: from roots first, then from all unstamped literals.
    fn stamp<R: Rng>(&mut self, rng: &mut R) {
        for s in self.start.iter_mut() {
            *s = 0;
        }
        for s in self.stop.iter_mut() {
            *s = 0;
        }
        let mut roots: Vec<Lit> = Vec::new();
        for vi in 1..=self.num_vars {
            let p = Lit::from((vi, true));
            if self.adj[p].is_empty() {
                roots.push(!p);
            }
            if self.adj[!p].is_empty() {
                roots.push(p);
            }
        }
        roots.shuffle(rng);
        let mut counter: u32 = 0;
        for r in roots.iter() {
            self.dfs(*r, &mut counter, rng);
        }
        let mut rest = (1..=self.num_vars)
            .flat_map(|vi| [Lit::from((vi, true)), Lit::from((vi, false))])
            .collect::<Vec<_>>();
        rest.shuffle(rng);
        for l in rest.iter() {
            self.dfs(*l, &mut counter, rng);
        }
    }
    fn dfs<R: Rng>(&mut self, root: Lit, counter: &mut u32, rng: &mut R) {
        if self.start[root] != 0 {
            return;
        }
        *counter += 1;
        self.start[root] = *counter;
        self.adj[root].shuffle(rng);
        let mut stack: Vec<(Lit, usize)> = vec![(root, 0)];
        while let Some((l, i)) = stack.last_mut() {
            let l = *l;
            if let Some(&child) = self.adj[l].get(*i) {
                *i += 1;
                if self.start[child] == 0 {
                    *counter += 1;
                    self.start[child] = *counter;
                    self.adj[child].shuffle(rng);
                    stack.push((child, 0));
                }
            } else {
                *counter += 1;
                self.stop[l] = *counter;
                stack.pop();
            }
        }
    }
}
