//! Multi-start pairwise swap descent.
//!
//! # Algorithm
//!
//! Each restart deals the teams into equal-size divisions in random order,
//! then repeatedly applies the best swap of two teams from different
//! divisions until no swap lowers the total intra-division distance. Swapping
//! keeps every division at exactly `k` teams, so each visited state already
//! satisfies the degree and transitivity rows of the model.
//!
//! For team `t` and division `D`, `attach(t, D) = Σ_{u ∈ D} d(t, u)`. Swapping
//! `t ∈ A` with `u ∈ B` changes the objective by
//!
//! ```text
//! Δ = attach(t, B) - attach(t, A) + attach(u, A) - attach(u, B) - 2·d(t, u)
//! ```
//!
//! and the table is updated in O(n) after each accepted swap.
//!
//! # Complexity
//!
//! O(n²) per pass, with at most `max_passes` passes per restart.
//!
//! The result is a local optimum, not a certified global one; use
//! [`MipSolver`](super::MipSolver) when proof of optimality matters.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::error::Result;
use crate::formulation::{Assignment, PartitionModel};
use crate::models::Partition;

use super::PartitionSolver;

/// Configuration for [`SwapSearchSolver`].
///
/// # Examples
///
/// ```
/// use u_divisions::solver::SwapSearchConfig;
///
/// let config = SwapSearchConfig::default()
///     .with_restarts(20)
///     .with_seed(7);
/// assert_eq!(config.restarts, 20);
/// assert_eq!(config.seed, 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SwapSearchConfig {
    /// Number of random starts (at least one always runs).
    pub restarts: usize,
    /// Maximum improving passes per start.
    pub max_passes: usize,
    /// RNG seed; equal seeds give equal results.
    pub seed: u64,
    /// Stop starting new restarts or passes after this much wall-clock time.
    pub time_limit: Option<Duration>,
}

impl Default for SwapSearchConfig {
    fn default() -> Self {
        Self {
            restarts: 16,
            max_passes: 10_000,
            seed: 42,
            time_limit: None,
        }
    }
}

impl SwapSearchConfig {
    /// Sets the number of random starts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Sets the pass limit per start.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Heuristic backend for leagues too large for the cubic exact model.
///
/// An exhausted time budget is not an error here: the best partition found
/// so far is returned.
///
/// # Examples
///
/// ```
/// use u_divisions::distance::DistanceMatrix;
/// use u_divisions::formulation::PartitionModel;
/// use u_divisions::solver::{PartitionSolver, SwapSearchSolver};
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 1.0, 10.0],
///     vec![10.0, 0.0, 10.0, 1.0],
///     vec![1.0, 10.0, 0.0, 10.0],
///     vec![10.0, 1.0, 10.0, 0.0],
/// ])
/// .unwrap();
/// let model = PartitionModel::build(&dm, 2).unwrap();
/// let a = SwapSearchSolver::default().solve(&model).unwrap();
/// assert!(a.is_set(0, 2) && a.is_set(1, 3));
/// assert_eq!(a.objective(), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SwapSearchSolver {
    config: SwapSearchConfig,
}

impl SwapSearchSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: SwapSearchConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &SwapSearchConfig {
        &self.config
    }
}

impl PartitionSolver for SwapSearchSolver {
    fn name(&self) -> &'static str {
        "swap-search"
    }

    fn solve(&self, model: &PartitionModel) -> Result<Assignment> {
        let n = model.num_teams();
        let k = model.teams_per_division();

        // one division or all singletons: nothing to search
        if k == 1 || k == n {
            let p = Partition::contiguous(n, k)?;
            let cost = partition_cost(model, &p);
            return Ok(Assignment::from_partition(n, &p, cost));
        }

        let started = Instant::now();
        let out_of_time = |cfg: &SwapSearchConfig| {
            cfg.time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
        };

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut teams: Vec<usize> = (0..n).collect();
        let mut best: Option<(Vec<usize>, f64)> = None;

        for restart in 0..self.config.restarts.max(1) {
            if restart > 0 && out_of_time(&self.config) {
                debug!(restart, "swap search out of time");
                break;
            }
            teams.shuffle(&mut rng);
            let mut labels = vec![0; n];
            for (slot, &t) in teams.iter().enumerate() {
                labels[t] = slot / k;
            }

            let mut search = Descent::new(model, labels);
            let mut passes = 0;
            while passes < self.config.max_passes && !out_of_time(&self.config) {
                if !search.apply_best_swap() {
                    break;
                }
                passes += 1;
            }

            let cost = search.cost();
            debug!(restart, passes, cost, "swap search restart finished");
            if best.as_ref().map_or(true, |(_, c)| cost < *c - 1e-9) {
                best = Some((search.labels, cost));
            }
        }

        // restarts.max(1) guarantees at least one start ran
        let (labels, _) = best.unwrap_or_else(|| ((0..n).map(|t| t / k).collect(), f64::INFINITY));
        let partition = partition_from_labels(&labels, model.num_divisions());
        let cost = partition_cost(model, &partition);
        info!(
            cost,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "swap search finished"
        );
        Ok(Assignment::from_partition(n, &partition, cost))
    }
}

/// Local-search state for one restart.
struct Descent<'a> {
    model: &'a PartitionModel,
    labels: Vec<usize>,
    /// `attach[t * divisions + d]`: summed distance from `t` to division `d`.
    attach: Vec<f64>,
    divisions: usize,
}

impl<'a> Descent<'a> {
    fn new(model: &'a PartitionModel, labels: Vec<usize>) -> Self {
        let n = model.num_teams();
        let divisions = model.num_divisions();
        let mut attach = vec![0.0; n * divisions];
        for t in 0..n {
            for u in 0..n {
                if t != u {
                    attach[t * divisions + labels[u]] += model.cost(t, u);
                }
            }
        }
        Self {
            model,
            labels,
            attach,
            divisions,
        }
    }

    fn dist(&self, a: usize, b: usize) -> f64 {
        if a == b {
            0.0
        } else {
            self.model.cost(a, b)
        }
    }

    fn attach(&self, team: usize, division: usize) -> f64 {
        self.attach[team * self.divisions + division]
    }

    /// Applies the most improving swap; returns `false` at a local optimum.
    fn apply_best_swap(&mut self) -> bool {
        let n = self.labels.len();
        let mut best: Option<(usize, usize, f64)> = None;

        for t in 0..n {
            for u in (t + 1)..n {
                let (a, b) = (self.labels[t], self.labels[u]);
                if a == b {
                    continue;
                }
                let delta = self.attach(t, b) - self.attach(t, a) + self.attach(u, a)
                    - self.attach(u, b)
                    - 2.0 * self.dist(t, u);
                if delta < -1e-10 && best.map_or(true, |(_, _, d)| delta < d) {
                    best = Some((t, u, delta));
                }
            }
        }

        let Some((t, u, _)) = best else {
            return false;
        };
        let (a, b) = (self.labels[t], self.labels[u]);
        for w in 0..n {
            let (dt, du) = (self.dist(w, t), self.dist(w, u));
            self.attach[w * self.divisions + a] += du - dt;
            self.attach[w * self.divisions + b] += dt - du;
        }
        self.labels.swap(t, u);
        true
    }

    fn cost(&self) -> f64 {
        let n = self.labels.len();
        // each pair is counted from both ends
        (0..n).map(|t| self.attach(t, self.labels[t])).sum::<f64>() / 2.0
    }
}

fn partition_from_labels(labels: &[usize], divisions: usize) -> Partition {
    let mut groups = vec![Vec::new(); divisions];
    for (team, &d) in labels.iter().enumerate() {
        groups[d].push(team);
    }
    // order divisions by their smallest member for stable output
    groups.sort_by_key(|g| g.first().copied());
    Partition::new(groups)
}

fn partition_cost(model: &PartitionModel, partition: &Partition) -> f64 {
    partition
        .intra_pairs()
        .map(|(a, b)| model.cost(a, b))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn clustered() -> DistanceMatrix {
        // three tight clusters of three, interleaved by index
        let cluster = [0, 1, 2, 0, 1, 2, 0, 1, 2];
        let mut dm = DistanceMatrix::new(9);
        for i in 0..9 {
            for j in 0..9 {
                if i != j {
                    let d = if cluster[i] == cluster[j] { 1.0 } else { 50.0 };
                    dm.set(i, j, d);
                }
            }
        }
        dm
    }

    #[test]
    fn test_finds_clusters() {
        let model = PartitionModel::build(&clustered(), 3).unwrap();
        let a = SwapSearchSolver::default().solve(&model).unwrap();
        assert_eq!(a.objective(), 9.0);
        assert!(a.is_set(0, 3) && a.is_set(3, 6));
        assert!(a.is_set(1, 4) && a.is_set(4, 7));
        assert!(a.verify(&model).is_ok());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let model = PartitionModel::build(&clustered(), 3).unwrap();
        let solver = SwapSearchSolver::new(SwapSearchConfig::default().with_restarts(3).with_seed(9));
        let a = solver.solve(&model).unwrap();
        let b = solver.solve(&model).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_descent_cost_tracks_swaps() {
        let model = PartitionModel::build(&clustered(), 3).unwrap();
        let mut search = Descent::new(&model, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
        let start = search.cost();
        assert_eq!(start, 3.0 * (50.0 * 3.0));
        while search.apply_best_swap() {}
        let p = partition_from_labels(&search.labels, 3);
        assert_eq!(search.cost(), partition_cost(&model, &p));
        assert_eq!(search.cost(), 9.0);
    }

    #[test]
    fn test_trivial_sizes() {
        let model = PartitionModel::build(&clustered(), 9).unwrap();
        let a = SwapSearchSolver::default().solve(&model).unwrap();
        assert!(a.values().iter().all(|&v| v == 1.0));

        let model = PartitionModel::build(&clustered(), 1).unwrap();
        let a = SwapSearchSolver::default().solve(&model).unwrap();
        assert_eq!(a.objective(), 0.0);
    }

    #[test]
    fn test_zero_passes_returns_feasible_start() {
        let model = PartitionModel::build(&clustered(), 3).unwrap();
        let solver = SwapSearchSolver::new(
            SwapSearchConfig::default()
                .with_restarts(1)
                .with_max_passes(0),
        );
        let a = solver.solve(&model).unwrap();
        assert!(a.verify(&model).is_ok());
    }

    #[test]
    fn test_zero_budget_returns_feasible_start() {
        let model = PartitionModel::build(&clustered(), 3).unwrap();
        let solver =
            SwapSearchSolver::new(SwapSearchConfig::default().with_time_limit(Duration::ZERO));
        let a = solver.solve(&model).unwrap();
        assert!(a.verify(&model).is_ok());
        assert!(a.violated_triples().is_empty());
    }
}
