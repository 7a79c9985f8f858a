/// Configuration of the preprocessor.
///
/// Step limits count the number of literal visits a technique may spend in a
/// single run of [`preprocess`](`crate::preprocessor::Preprocessor::preprocess`);
/// [`inprocess`](`crate::preprocessor::Preprocessor::inprocess`) scales them by
/// `inprocess_scale`.
///
/// # Example
///
/// ```
/// use sprep::config::Config;
/// let config = Config {
///     bve_grow: 2,
///     bve_threads: 4,
///     ..Config::default()
/// };
/// assert!(config.enable_bve);
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    //
    //## switches
    //
    /// run subsumption and self-subsuming resolution.
    pub enable_subsume: bool,
    /// run bounded variable elimination.
    pub enable_bve: bool,
    /// run blocked clause elimination.
    pub enable_bce: bool,
    /// run equivalence elimination on the binary implication graph.
    pub enable_ee: bool,
    /// solve the binary sub-formula and seed phases.
    pub enable_twosat: bool,
    /// run failed literal probing.
    pub enable_probe: bool,
    /// renumber vars densely at the end of preprocessing.
    pub enable_dense: bool,

    //
    //## subsumption
    //
    /// Stop subsumption if the size of a clause is over this
    pub subsume_literal_limit: usize,
    pub subsume_steps: usize,

    //
    //## variable elimination
    //
    /// Stop elimination if the increase of clauses is over this
    pub bve_grow: usize,
    /// Stop elimination if the sum of increases over a run is over this
    pub bve_grow_total: usize,
    /// Stop elimination if a generated resolvent is larger than this.
    /// 0 means no limit.
    pub bve_resolvent_limit: usize,
    /// try vars even with many occurrences
    pub bve_unlimited: bool,
    /// remove blocked clauses found during elimination
    pub bve_blocked: bool,
    /// resolve only gate clauses against the others if a var is defined by an AND gate
    pub bve_gates: bool,
    pub bve_steps: usize,
    /// the number of worker threads; 1 or less selects the sequential eliminator.
    pub bve_threads: usize,
    /// how many times a contended var is postponed before it is skipped in a pass.
    pub bve_postpone_limit: usize,

    //
    //## other techniques
    //
    pub bce_steps: usize,
    pub ee_steps: usize,
    pub twosat_steps: usize,
    pub probe_steps: usize,

    //
    //## orchestration
    //
    /// scale of step limits for inprocessing
    pub inprocess_scale: f64,
    /// the maximum number of passes over all techniques in a run.
    pub max_passes: usize,
    /// seed for the shuffles in the implication graph stamping
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            enable_subsume: true,
            #[cfg(feature = "clause_elimination")]
            enable_bve: true,
            #[cfg(not(feature = "clause_elimination"))]
            enable_bve: false,
            #[cfg(feature = "clause_elimination")]
            enable_bce: true,
            #[cfg(not(feature = "clause_elimination"))]
            enable_bce: false,
            #[cfg(feature = "equivalence_elimination")]
            enable_ee: true,
            #[cfg(not(feature = "equivalence_elimination"))]
            enable_ee: false,
            enable_twosat: true,
            #[cfg(feature = "failed_literal_probing")]
            enable_probe: true,
            #[cfg(not(feature = "failed_literal_probing"))]
            enable_probe: false,
            enable_dense: false,

            subsume_literal_limit: 100,
            subsume_steps: 2_000_000,

            bve_grow: 0,
            bve_grow_total: usize::MAX,
            bve_resolvent_limit: 80,
            bve_unlimited: false,
            bve_blocked: true,
            bve_gates: true,
            bve_steps: 8_000_000,
            bve_threads: 1,
            bve_postpone_limit: 8,

            bce_steps: 4_000_000,
            ee_steps: 4_000_000,
            twosat_steps: 4_000_000,
            probe_steps: 2_000_000,

            inprocess_scale: 0.1,
            max_passes: 16,
            seed: 0,
        }
    }
}

impl Config {
    /// return a step limit for a run; inprocessing runs get a scaled one.
    pub fn step_limit(&self, base: usize, inprocessing: bool) -> usize {
        if inprocessing {
            ((base as f64) * self.inprocess_scale).max(1.0) as usize
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit() {
        let config = Config::default();
        assert_eq!(config.step_limit(1000, false), 1000);
        assert_eq!(config.step_limit(1000, true), 100);
        assert_eq!(config.step_limit(0, true), 1);
    }
}
