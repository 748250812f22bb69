//! Solver configuration: every tunable named by the improvement driver,
//! collected in one place with documented defaults.

/// Tunables controlling candidate lists, the improvement driver, and
/// simulated-annealing acceptance.
///
/// Built with defaults, then customized via `with_*` methods, in the style
/// of a builder.
///
/// # Examples
///
/// ```
/// use vrptw_core::config::SolverConfig;
///
/// let cfg = SolverConfig::default().with_seed(7).with_enable_polish(false);
/// assert_eq!(cfg.seed, 7);
/// assert!(!cfg.enable_polish);
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Fraction of n used to size candidate lists: `k = min(max_candidates, max(min_candidates, n * candidate_ratio))`.
    pub candidate_ratio: f64,
    /// Lower bound on candidate-list size.
    pub min_candidates: usize,
    /// Upper bound on candidate-list size.
    pub max_candidates: usize,
    /// Outer passes in the fleet-reduction phase. `None` lets `solve` pick
    /// 80 for instances with >= 50 customers, 50 otherwise.
    pub fleet_passes: Option<usize>,
    /// Iterations in the SA-refinement phase. `None` lets `solve` pick
    /// `200 + 20 * n`, capped at 5000.
    pub max_iterations: Option<usize>,
    /// Range of "top-N critical routes" refined each SA iteration.
    pub top_n_critical: std::ops::Range<usize>,
    /// Consecutive non-improving iterations before early termination.
    pub early_termination: usize,
    /// Consecutive iterations without a new best before termination.
    pub no_best_improvement_limit: usize,
    /// RNG seed. Fixed by default for reproducibility; vary for independent runs.
    pub seed: u64,
    /// Fleet-size penalty weight λ. `None` means "compute from the cost formula".
    pub vehicle_penalty: Option<f64>,
    /// Whether `solve` tries merge passes at decreasing load thresholds.
    pub enable_merge_passes: bool,
    /// Whether `solve` runs the post-driver controlled fleet-reduction polish.
    pub enable_polish: bool,
    /// Fraction of customers removed by one LNS destroy step, sampled in
    /// `[lns_removal_min, lns_removal_max]`.
    pub lns_removal_min: f64,
    /// See `lns_removal_min`.
    pub lns_removal_max: f64,
    /// SA initial temperature.
    pub initial_temperature: f64,
    /// SA cooling factor applied each iteration.
    pub cooling_rate: f64,
    /// SA floor temperature.
    pub min_temperature: f64,
    /// Temperature restored on reheat.
    pub reheat_temperature: f64,
    /// Consecutive non-best iterations before a reheat.
    pub reheat_after: usize,
    /// Maximum restorations granted to a single customer before it is
    /// logged and skipped.
    pub max_restorations_per_customer: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            candidate_ratio: 1.0 / 3.0,
            min_candidates: 20,
            max_candidates: 50,
            fleet_passes: None,
            max_iterations: None,
            top_n_critical: 2..5,
            early_termination: 40,
            no_best_improvement_limit: 25,
            seed: 42,
            vehicle_penalty: None,
            enable_merge_passes: true,
            enable_polish: true,
            lns_removal_min: 0.25,
            lns_removal_max: 0.40,
            initial_temperature: 100.0,
            cooling_rate: 0.92,
            min_temperature: 0.5,
            reheat_temperature: 50.0,
            reheat_after: 8,
            max_restorations_per_customer: 3,
        }
    }
}

impl SolverConfig {
    /// Resolves `fleet_passes` for an instance of `n` customers.
    pub fn resolved_fleet_passes(&self, n: usize) -> usize {
        self.fleet_passes.unwrap_or(if n >= 50 { 80 } else { 50 })
    }

    /// Resolves `max_iterations` for an instance of `n` customers.
    pub fn resolved_max_iterations(&self, n: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| (200 + 20 * n).min(5000))
    }

    /// Resolves candidate-list size for an instance of `n` customers.
    pub fn resolved_candidate_k(&self, n: usize) -> usize {
        let raw = (n as f64 * self.candidate_ratio).round() as usize;
        raw.clamp(self.min_candidates, self.max_candidates)
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets an explicit fleet-size penalty, overriding the computed formula.
    pub fn with_vehicle_penalty(mut self, penalty: f64) -> Self {
        self.vehicle_penalty = Some(penalty);
        self
    }

    /// Enables or disables the post-driver polish pass.
    pub fn with_enable_polish(mut self, enable: bool) -> Self {
        self.enable_polish = enable;
        self
    }

    /// Enables or disables the merge passes run after the driver.
    pub fn with_enable_merge_passes(mut self, enable: bool) -> Self {
        self.enable_merge_passes = enable;
        self
    }

    /// Overrides the SA-refinement iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Overrides the fleet-reduction outer pass cap.
    pub fn with_fleet_passes(mut self, passes: usize) -> Self {
        self.fleet_passes = Some(passes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidate_k() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.resolved_candidate_k(30), 20); // clamped up
        assert_eq!(cfg.resolved_candidate_k(300), 50); // clamped down
        assert_eq!(cfg.resolved_candidate_k(90), 30); // 90/3 = 30
    }

    #[test]
    fn test_fleet_passes_default() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.resolved_fleet_passes(100), 80);
        assert_eq!(cfg.resolved_fleet_passes(10), 50);
    }

    #[test]
    fn test_max_iterations_default_and_cap() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.resolved_max_iterations(10), 400);
        assert_eq!(cfg.resolved_max_iterations(1000), 5000);
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = SolverConfig::default()
            .with_seed(1)
            .with_vehicle_penalty(4000.0)
            .with_max_iterations(10)
            .with_fleet_passes(5);
        assert_eq!(cfg.seed, 1);
        assert_eq!(cfg.vehicle_penalty, Some(4000.0));
        assert_eq!(cfg.resolved_max_iterations(1000), 10);
        assert_eq!(cfg.resolved_fleet_passes(1000), 5);
    }
}
