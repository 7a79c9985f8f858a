/// Module `eliminate` implements bounded variable elimination.
use {
    super::{
        heap::{VarOccHeap, VarOrderIF},
        Budget, EngineContext, ProcessorEvent, Subsumer, Technique,
    },
    crate::{
        cdb::{ClauseDBIF, ClauseIF, Relocation},
        types::*,
    },
    ahash::AHashMap,
};

/// Bounded variable elimination with blocked clause short-circuit
///
/// Vars are tried in the order of `min(|pos|, |neg|)`. A var is eliminated if
/// the number of non-tautological resolvents doesn't exceed the number of
/// clauses containing it by more than `bve_grow`. If the var is the output of
/// an AND gate, only resolvents between gate and non-gate clauses are built;
/// the others are implied by them.
#[derive(Clone, Debug, Default)]
pub struct Eliminator {
    budget: Budget,
    heap: VarOccHeap,
    subsumer: Subsumer,
    /// the sum of clause increases in the current run
    grown: usize,
    resolvent: Vec<Lit>,
    num_runs: usize,
}

impl Instantiate for Eliminator {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Self {
        Eliminator {
            heap: VarOccHeap::new(cnf.num_of_variables),
            subsumer: Subsumer::instantiate(config, cnf),
            ..Eliminator::default()
        }
    }
    fn handle(&mut self, e: ProcessorEvent) {
        if e == ProcessorEvent::NewVar {
            let n = self.heap.num_vars() + 1;
            self.heap.expand(n);
        }
    }
}

impl Technique for Eliminator {
    fn name(&self) -> &'static str {
        "variable elimination"
    }
    fn budget(&mut self) -> &mut Budget {
        &mut self.budget
    }
    fn process(&mut self, ctx: &mut EngineContext) -> Status {
        self.num_runs += 1;
        let limit = ctx.step_limit(ctx.config.bve_steps);
        self.budget.start(limit, &ctx.interrupted);
        let limit = ctx.step_limit(ctx.config.subsume_steps);
        self.subsumer.start(ctx, limit);
        let (eliminated, gates, blocked) = (
            ctx.stats.num_eliminated_var,
            ctx.stats.num_gates,
            ctx.stats.num_blocked,
        );
        let r = self.run(ctx);
        log::debug!(
            "elimination #{}: {} vars eliminated ({} by gates), {} blocked clauses, {} steps",
            self.num_runs,
            ctx.stats.num_eliminated_var - eliminated,
            ctx.stats.num_gates - gates,
            ctx.stats.num_blocked - blocked,
            self.budget.steps_used(),
        );
        ctx.conclude(r)
    }
    fn reset(&mut self) {
        self.heap.clear();
        self.subsumer.reset();
    }
    fn relocate(&mut self, map: &Relocation) {
        self.subsumer.relocate(map);
    }
}

impl Eliminator {
    fn run(&mut self, ctx: &mut EngineContext) -> MaybeInconsistent {
        ctx.propagate_units()?;
        self.heap.expand(ctx.num_vars());
        self.heap.clear();
        self.grown = 0;
        for vi in 1..=ctx.num_vars() {
            if ctx.is_removable(vi) {
                self.heap.insert(&ctx.occur, vi);
            }
        }
        if self.heap.is_empty() {
            return Ok(());
        }
        while let Some(vi) = self.heap.select_var(&ctx.occur) {
            if !self.budget.spend(1) {
                break;
            }
            if !ctx.is_removable(vi) {
                continue;
            }
            let touched = self.eliminate(ctx, vi)?;
            if touched.is_empty() {
                continue;
            }
            ctx.propagate_units()?;
            self.subsumer.drain(ctx)?;
            for vj in touched {
                if vj != vi && ctx.is_removable(vj) {
                    self.heap.insert(&ctx.occur, vj);
                }
            }
        }
        self.heap.clear();
        Ok(())
    }
    /// try to eliminate var `vi`. Return the vars whose occurrences changed;
    /// an empty vector means nothing happened.
    ///
    /// # Errors
    ///
    /// if a unit resolvent conflicts with the root assignment.
    pub fn eliminate(
        &mut self,
        ctx: &mut EngineContext,
        vi: VarId,
    ) -> Result<Vec<VarId>, SolverError> {
        let p = Lit::from((vi, true));
        let mut touched: Vec<VarId> = Vec::new();
        let (mut pos, pos_red) = split_by_redundancy(ctx, p);
        let (mut neg, neg_red) = split_by_redundancy(ctx, !p);
        let mut gate = None;
        if ctx.config.bve_gates {
            if !self.budget.spend(pos.len() + neg.len()) {
                return Ok(touched);
            }
            gate = find_and_gate(ctx, &mut pos, &mut neg, vi);
        }
        // a gate makes the resolvents few enough to try any var
        if gate.is_none() && skip_by_occurrences(&ctx.config, pos.len(), neg.len()) {
            return Ok(touched);
        }
        if ctx.config.bve_blocked {
            // blocked clauses are checked against every clause including learnts
            for (side, l) in [(&mut pos, p), (&mut neg, !p)] {
                let mut others = ctx.occur.list(!l).to_vec();
                others.retain(|cr| ctx.cdb.get(*cr).map_or(false, |c| !c.is_dead()));
                let mut i = 0;
                while i < side.len() {
                    let cr = side[i];
                    let c = ctx.cdb[cr].lits();
                    if !self.budget.spend(c.len() * others.len().max(1)) {
                        return Ok(touched);
                    }
                    if others
                        .iter()
                        .all(|dr| resolvent_is_tautology(c, ctx.cdb[*dr].lits(), vi))
                    {
                        #[cfg(feature = "trace_elimination")]
                        println!(" - blocked clause {} on {}", ctx.cdb[cr], l);
                        touched.extend(c.iter().map(|l| l.vi()));
                        ctx.remove_clause_with_record(cr, l);
                        ctx.stats.num_blocked += 1;
                        side.swap_remove(i);
                    } else {
                        i += 1;
                    }
                }
            }
            if gate.is_some() {
                gate = find_and_gate(ctx, &mut pos, &mut neg, vi);
            }
        }
        let Some((num_clauses, _num_lits, _num_tautologies)) =
            self.anticipate(ctx, &pos, &neg, vi, gate)
        else {
            return Ok(touched);
        };
        let num_old = pos.len() + neg.len();
        let growth = num_clauses.saturating_sub(num_old);
        if num_old + ctx.config.bve_grow < num_clauses
            || ctx.config.bve_grow_total < self.grown + growth
        {
            return Ok(touched);
        }
        self.grown += growth;
        #[cfg(feature = "trace_elimination")]
        println!("# eliminate_var {vi}: {num_old} clauses to {num_clauses} resolvents, gate {gate:?}");
        for (i, pr) in pos.iter().enumerate() {
            for (j, nr) in neg.iter().enumerate() {
                if !is_resolved(gate, i, j) {
                    continue;
                }
                if merge(ctx.cdb[*pr].lits(), ctx.cdb[*nr].lits(), vi, &mut self.resolvent) {
                    let lits = std::mem::take(&mut self.resolvent);
                    touched.extend(lits.iter().map(|l| l.vi()));
                    ctx.stats.num_resolvents += 1;
                    if let Some(cr) = ctx.add_clause(lits, false)? {
                        self.subsumer.enqueue(ctx, cr);
                    }
                }
            }
        }
        for (side, l) in [(&pos, p), (&neg, !p)] {
            for cr in side.iter() {
                if ctx.cdb[*cr].is_dead() {
                    continue;
                }
                touched.extend(ctx.cdb[*cr].iter().map(|l| l.vi()));
                ctx.remove_clause_with_record(*cr, l);
            }
        }
        for cr in pos_red.iter().chain(neg_red.iter()) {
            if !ctx.cdb[*cr].is_dead() {
                ctx.remove_clause(*cr);
            }
        }
        debug_assert_eq!(ctx.occur.count(p), 0);
        debug_assert_eq!(ctx.occur.count(!p), 0);
        ctx.handle(ProcessorEvent::Eliminate(vi));
        ctx.stats.num_eliminated_var += 1;
        if gate.is_some() {
            ctx.stats.num_gates += 1;
        }
        touched.push(vi);
        touched.sort_unstable();
        touched.dedup();
        Ok(touched)
    }
    /// count resolvents without building them. With `gate`, only the pairs
    /// of a gate clause and a non-gate clause are counted.
    /// Return `(clauses, literals, tautologies)`, or `None` if a resolvent is
    /// too long, empty, or the budget runs out.
    pub fn anticipate(
        &mut self,
        ctx: &EngineContext,
        pos: &[ClauseRef],
        neg: &[ClauseRef],
        vi: VarId,
        gate: Option<(usize, usize)>,
    ) -> Option<(usize, usize, usize)> {
        let limit = ctx.config.bve_resolvent_limit;
        let bound = pos.len() + neg.len() + ctx.config.bve_grow;
        let mut num_clauses = 0;
        let mut num_lits = 0;
        let mut num_tautologies = 0;
        for (i, pr) in pos.iter().enumerate() {
            let c = ctx.cdb[*pr].lits();
            for (j, nr) in neg.iter().enumerate() {
                if !is_resolved(gate, i, j) {
                    continue;
                }
                let d = ctx.cdb[*nr].lits();
                if !self.budget.spend(c.len() + d.len()) {
                    return None;
                }
                match resolvent_len(c, d, vi) {
                    None => num_tautologies += 1,
                    Some(0) => return None,
                    Some(n) if limit != 0 && limit < n => return None,
                    Some(n) => {
                        num_clauses += 1;
                        num_lits += n;
                        if bound < num_clauses {
                            return None;
                        }
                    }
                }
            }
        }
        Some((num_clauses, num_lits, num_tautologies))
    }
}

/// return the live irredundant and redundant clauses containing `l`.
pub(super) fn split_by_redundancy(
    ctx: &EngineContext,
    l: Lit,
) -> (Vec<ClauseRef>, Vec<ClauseRef>) {
    let mut irredundant = Vec::new();
    let mut redundant = Vec::new();
    for cr in ctx.occur.list(l) {
        match ctx.cdb.get(*cr) {
            Some(c) if !c.is_dead() && c.contains(l) => {
                if c.is_redundant() {
                    redundant.push(*cr);
                } else {
                    irredundant.push(*cr);
                }
            }
            _ => (),
        }
    }
    (irredundant, redundant)
}

/// Find an AND gate `g <-> (a1 & .. & an)` on var `vi` among the irredundant
/// clauses `pos` and `neg`, where `g` is `vi` or its negation. The gate consists
/// of `(g | !a1 | .. | !an)` and the binaries `(!g | ai)`.
///
/// The gate clauses are moved to the front of `pos` and `neg`.
/// Return their numbers on each side.
pub(super) fn find_and_gate(
    ctx: &EngineContext,
    pos: &mut [ClauseRef],
    neg: &mut [ClauseRef],
    vi: VarId,
) -> Option<(usize, usize)> {
    let p = Lit::from((vi, true));
    if let Some((long, bins)) = gate_on(ctx, pos, neg, p) {
        return Some((long, bins));
    }
    gate_on(ctx, neg, pos, !p).map(|(long, bins)| (bins, long))
}

/// find a clause in `long` whose other literals are all negations of
/// literals implied by `!g` through binaries in `bin`.
fn gate_on(
    ctx: &EngineContext,
    long: &mut [ClauseRef],
    bin: &mut [ClauseRef],
    g: Lit,
) -> Option<(usize, usize)> {
    let mut implied: AHashMap<Lit, usize> = AHashMap::new();
    for (i, cr) in bin.iter().enumerate() {
        let c = &ctx.cdb[*cr];
        if c.len() == 2 {
            let a = if c[0] == !g { c[1] } else { c[0] };
            implied.entry(a).or_insert(i);
        }
    }
    if implied.is_empty() {
        return None;
    }
    let found = long.iter().position(|cr| {
        ctx.cdb[*cr]
            .iter()
            .all(|l| *l == g || implied.contains_key(&!*l))
    })?;
    long.swap(0, found);
    let mut inputs = ctx.cdb[long[0]]
        .iter()
        .filter(|l| **l != g)
        .map(|l| implied[&!*l])
        .collect::<Vec<usize>>();
    inputs.sort_unstable();
    // every index left unplaced is at or after `i`
    for (k, i) in inputs.iter().enumerate() {
        bin.swap(k, *i);
    }
    #[cfg(feature = "trace_elimination")]
    println!(" - AND gate on {g}: {}", ctx.cdb[long[0]]);
    Some((1, inputs.len()))
}

/// return `true` if the pair of the `i`-th positive clause and the `j`-th
/// negative one should be resolved. Without a gate every pair is.
fn is_resolved(gate: Option<(usize, usize)>, i: usize, j: usize) -> bool {
    gate.map_or(true, |(num_pos, num_neg)| (i < num_pos) != (j < num_neg))
}

/// return `true` if a var has too many occurrences to try.
pub(super) fn skip_by_occurrences(config: &Config, pos: usize, neg: usize) -> bool {
    !config.bve_unlimited && ((10 < pos && 10 < neg) || (15 < pos + neg && (5 < pos || 5 < neg)))
}

/// return `true` if the resolvent of `c` and `d` on var `vi` is a tautology.
pub(super) fn resolvent_is_tautology(c: &[Lit], d: &[Lit], vi: VarId) -> bool {
    resolvent_len(c, d, vi).is_none()
}

/// Return the length of the resolvent of `c` and `d` on var `vi` by a merge scan,
/// or `None` if it's a tautology.
pub(super) fn resolvent_len(c: &[Lit], d: &[Lit], vi: VarId) -> Option<usize> {
    let (mut i, mut j) = (0, 0);
    let mut len = 0;
    while i < c.len() || j < d.len() {
        match (c.get(i), d.get(j)) {
            (Some(a), _) if a.vi() == vi => i += 1,
            (_, Some(b)) if b.vi() == vi => j += 1,
            (Some(a), Some(b)) if a.vi() == b.vi() => {
                if a != b {
                    return None;
                }
                len += 1;
                i += 1;
                j += 1;
            }
            (Some(a), Some(b)) if a.vi() < b.vi() => {
                len += 1;
                i += 1;
            }
            (Some(_), Some(_)) => {
                len += 1;
                j += 1;
            }
            (Some(_), None) => {
                len += 1;
                i += 1;
            }
            (None, Some(_)) => {
                len += 1;
                j += 1;
            }
            (None, None) => break,
        }
    }
    Some(len)
}

/// Build the resolvent of `c` and `d` on var `vi` into `vec`.
/// Return `false` if it's a tautology; `vec` is undefined then.
pub(super) fn merge(c: &[Lit], d: &[Lit], vi: VarId, vec: &mut Vec<Lit>) -> bool {
    vec.clear();
    let (mut i, mut j) = (0, 0);
    loop {
        match (c.get(i), d.get(j)) {
            (Some(a), _) if a.vi() == vi => i += 1,
            (_, Some(b)) if b.vi() == vi => j += 1,
            (Some(a), Some(b)) if a.vi() == b.vi() => {
                if a != b {
                    return false;
                }
                vec.push(*a);
                i += 1;
                j += 1;
            }
            (Some(a), Some(b)) if a.vi() < b.vi() => {
                vec.push(*a);
                i += 1;
            }
            (Some(_), Some(b)) => {
                vec.push(*b);
                j += 1;
            }
            (Some(a), None) => {
                vec.push(*a);
                i += 1;
            }
            (None, Some(b)) => {
                vec.push(*b);
                j += 1;
            }
            (None, None) => return true,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            assign::AssignIF,
            processor::tests::{lits, live, satisfies, setup},
        },
    };

    #[test]
    fn test_resolvent() {
        let mut vec = Vec::new();
        let (c, d) = (lits(&[1, 2, 3]), lits(&[-2, 3, 4]));
        assert_eq!(resolvent_len(&c, &d, 2), Some(3));
        assert!(merge(&c, &d, 2, &mut vec));
        assert_eq!(i32s(&vec), vec![1, 3, 4]);
        let d = lits(&[-1, -2]);
        assert_eq!(resolvent_len(&c, &d, 2), None);
        assert!(!merge(&c, &d, 2, &mut vec));
        assert!(resolvent_is_tautology(&c, &d, 2));
    }
    #[test]
    fn test_skip_by_occurrences() {
        let config = Config::default();
        assert!(skip_by_occurrences(&config, 10, 10));
        assert!(!skip_by_occurrences(&config, 10, 5));
        assert!(skip_by_occurrences(&config, 11, 11));
        assert!(skip_by_occurrences(&config, 10, 6));
        assert!(!skip_by_occurrences(&config, 12, 3));
        assert!(skip_by_occurrences(&config, 13, 3));
        let config = Config {
            bve_unlimited: true,
            ..Config::default()
        };
        assert!(!skip_by_occurrences(&config, 20, 20));
    }
    #[test]
    fn test_eliminate_middle_var() {
        // (a | b | c), (-a | b), (-b | c) with b eliminated
        let mut ctx = setup(3, &[&[1, 2, 3], &[-1, 2], &[-2, 3]]);
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        elim.budget.start(1_000, &ctx.interrupted);
        let touched = elim.eliminate(&mut ctx, 2).expect("no conflict");
        assert!(touched.contains(&2));
        assert!(ctx.asg.is(2, FlagVar::ELIMINATED));
        assert_eq!(live(&ctx), vec![vec![-1, 3], vec![1, 3]]);
        assert_eq!(ctx.ext.len(), 3);
        assert!(ctx.check_consistency().is_ok());
        // any model of the resolvents extends to a model of the original
        let mut model = vec![None, Some(false), None, Some(true)];
        ctx.ext.extend_model(&mut model);
        let original = [vec![1i32, 2, 3], vec![-1, 2], vec![-2, 3]];
        assert!(original.iter().all(|c| c
            .iter()
            .any(|l| model[l.unsigned_abs() as usize] == Some(0 < *l))));
    }
    #[test]
    fn test_growth_bound() {
        // eliminating 1 makes 4 resolvents from 4 clauses
        let mut ctx = setup(
            5,
            &[&[1, 2], &[1, 3], &[-1, 4], &[-1, 5], &[2, 3, 4, 5]],
        );
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        elim.budget.start(1_000, &ctx.interrupted);
        elim.eliminate(&mut ctx, 1).expect("no conflict");
        assert!(ctx.asg.is(1, FlagVar::ELIMINATED));
        // 8 resolvents from 6 clauses
        let mut ctx = setup(
            6,
            &[&[1, 2], &[1, 3], &[1, 6], &[-1, 4], &[-1, 5], &[-1, -6, 2]],
        );
        elim.budget.start(1_000, &ctx.interrupted);
        let before = ctx.cdb.derefer(crate::cdb::property::Tusize::NumActive);
        assert!(elim.eliminate(&mut ctx, 1).expect("no conflict").is_empty());
        assert!(!ctx.asg.is(1, FlagVar::ELIMINATED));
        assert_eq!(ctx.cdb.derefer(crate::cdb::property::Tusize::NumActive), before);
    }
    #[test]
    fn test_blocked_clause() {
        // (-1 | -2) is blocked on -1: its only resolvent, with (1 | 2), is a tautology
        let mut ctx = setup(3, &[&[1, 2], &[-1, -2], &[-1, 3], &[2, 3], &[-2, -3]]);
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        elim.budget.start(1_000, &ctx.interrupted);
        elim.eliminate(&mut ctx, 1).expect("no conflict");
        assert!(ctx.stats.num_blocked == 1);
        assert!(ctx.asg.is(1, FlagVar::ELIMINATED));
        // the resolvent (2 | 3) duplicates a clause until subsumption runs
        assert_eq!(live(&ctx), vec![vec![-3, -2], vec![2, 3], vec![2, 3]]);
    }
    #[test]
    fn test_and_gate() {
        // 1 <-> (2 & 3) with (1 | 4 | 5) and (-1 | 6 | 7) outside the gate
        let original: [&[i32]; 5] = [&[1, -2, -3], &[-1, 2], &[-1, 3], &[1, 4, 5], &[-1, 6, 7]];
        let mut ctx = setup(7, &original);
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        elim.budget.start(1_000, &ctx.interrupted);
        elim.eliminate(&mut ctx, 1).expect("no conflict");
        assert!(ctx.asg.is(1, FlagVar::ELIMINATED));
        assert_eq!(ctx.stats.num_gates, 1);
        // (4 | 5 | 6 | 7) from the two non-gate clauses isn't built
        assert_eq!(
            live(&ctx),
            vec![vec![-3, -2, 6, 7], vec![2, 4, 5], vec![3, 4, 5]]
        );
        // every model of the resolvents extends to a model of the original
        let remaining = live(&ctx);
        for bits in 0..(1usize << 6) {
            let mut model = vec![None; 8];
            for vi in 2..=7 {
                model[vi] = Some(bits & (1 << (vi - 2)) != 0);
            }
            if !remaining
                .iter()
                .all(|c| c.iter().any(|l| model[l.unsigned_abs() as usize] == Some(0 < *l)))
            {
                continue;
            }
            ctx.ext.extend_model(&mut model);
            assert!(satisfies(&model, &original));
        }
        // without gate detection all four resolvents are built
        let mut ctx = setup(7, &original);
        ctx.config.bve_gates = false;
        elim.budget.start(1_000, &ctx.interrupted);
        elim.eliminate(&mut ctx, 1).expect("no conflict");
        assert!(ctx.asg.is(1, FlagVar::ELIMINATED));
        assert_eq!(live(&ctx).len(), 4);
    }
    #[test]
    fn test_gate_bypasses_occurrence_limit() {
        // -1 <-> (2 & 3), and 1 occurs in 16 clauses
        let mut clauses: Vec<Vec<i32>> = vec![vec![-1, -2, -3], vec![1, 2], vec![1, 3]];
        for i in 0..14 {
            clauses.push(vec![1, 4 + i, 5 + i]);
        }
        clauses.push(vec![-1, 18]);
        let refs = clauses.iter().map(|c| c.as_slice()).collect::<Vec<_>>();
        let mut ctx = setup(18, &refs);
        assert!(skip_by_occurrences(&ctx.config, 16, 2));
        ctx.config.bve_grow = 100;
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        elim.budget.start(10_000, &ctx.interrupted);
        elim.eliminate(&mut ctx, 1).expect("no conflict");
        assert!(ctx.asg.is(1, FlagVar::ELIMINATED));
        assert_eq!(ctx.stats.num_gates, 1);
        let mut ctx = setup(18, &refs);
        ctx.config.bve_gates = false;
        elim.budget.start(10_000, &ctx.interrupted);
        assert!(elim.eliminate(&mut ctx, 1).expect("no conflict").is_empty());
        assert!(!ctx.asg.is(1, FlagVar::ELIMINATED));
    }
    #[test]
    fn test_frozen_var_is_kept() {
        let mut ctx = setup(3, &[&[1, 2, 3], &[-1, 2], &[-2, 3]]);
        ctx.asg.set(2, FlagVar::FROZEN, true);
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(elim.process(&mut ctx), Status::Sat);
        assert!(!ctx.asg.is(2, FlagVar::ELIMINATED));
        assert!(ctx.asg.is(1, FlagVar::ELIMINATED));
        assert!(ctx.asg.is(3, FlagVar::ELIMINATED));
    }
    #[test]
    fn test_no_candidate() {
        let mut ctx = setup(2, &[&[1, 2], &[-1, -2]]);
        for vi in [1, 2] {
            ctx.asg.set(vi, FlagVar::FROZEN, true);
        }
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        assert_eq!(elim.process(&mut ctx), Status::Unknown);
        assert_eq!(elim.budget.steps_used(), 0);
        assert_eq!(live(&ctx), vec![vec![-2, -1], vec![1, 2]]);
    }
    #[test]
    fn test_redundant_clauses_are_dropped() {
        let mut ctx = setup(3, &[&[1, 2], &[-1, 3]]);
        ctx.add_clause(lits(&[-1, 2, 3]), true).expect("consistent");
        let mut elim = Eliminator::instantiate(&ctx.config, &CNFDescription::default());
        elim.budget.start(1_000, &ctx.interrupted);
        elim.eliminate(&mut ctx, 1).expect("no conflict");
        assert!(ctx.asg.is(1, FlagVar::ELIMINATED));
        assert_eq!(live(&ctx), vec![vec![2, 3]]);
        // records are made only for the irredundant ones
        assert_eq!(ctx.ext.len(), 2);
    }
}
