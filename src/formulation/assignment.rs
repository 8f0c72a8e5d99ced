//! Solver output: values of every pair indicator.

use crate::error::{DivisionError, Result};
use crate::models::Partition;

use super::{PairIndex, PartitionModel};

/// Threshold above which a (possibly fractional) indicator counts as set.
pub const SET_THRESHOLD: f64 = 0.5;

/// Values of every co-division indicator plus the solver's objective value.
///
/// Values are stored as returned by the backend, so MIP output such as
/// `0.9999999` is kept as-is and interpreted with [`SET_THRESHOLD`].
///
/// # Examples
///
/// ```
/// use u_divisions::formulation::Assignment;
/// use u_divisions::models::Partition;
///
/// let p = Partition::new(vec![vec![0, 3], vec![1, 2]]);
/// let a = Assignment::from_partition(4, &p, 7.0);
/// assert!(a.is_set(0, 3));
/// assert!(a.is_set(2, 1));
/// assert!(!a.is_set(0, 1));
/// assert!(a.violated_triples().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pairs: PairIndex,
    values: Vec<f64>,
    objective: f64,
}

impl Assignment {
    /// Wraps raw variable values for `num_teams` teams.
    ///
    /// Fails if `values` does not hold exactly one entry per pair.
    pub fn new(num_teams: usize, values: Vec<f64>, objective: f64) -> Result<Self> {
        let pairs = PairIndex::new(num_teams);
        if values.len() != pairs.len() {
            return Err(DivisionError::integrity(format!(
                "expected {} pair values for {num_teams} teams, got {}",
                pairs.len(),
                values.len()
            )));
        }
        Ok(Self {
            pairs,
            values,
            objective,
        })
    }

    /// Encodes a partition as 0/1 pair indicators.
    ///
    /// Team indices `>= num_teams` are ignored.
    pub fn from_partition(num_teams: usize, partition: &Partition, objective: f64) -> Self {
        let pairs = PairIndex::new(num_teams);
        let mut values = vec![0.0; pairs.len()];
        for (a, b) in partition.intra_pairs() {
            if a < num_teams && b < num_teams && a != b {
                values[pairs.index(a, b)] = 1.0;
            }
        }
        Self {
            pairs,
            values,
            objective,
        }
    }

    /// Number of teams.
    pub fn num_teams(&self) -> usize {
        self.pairs.num_teams()
    }

    /// Raw value of the indicator for `{a, b}`.
    pub fn value(&self, a: usize, b: usize) -> f64 {
        self.values[self.pairs.index(a, b)]
    }

    /// Returns `true` if teams `a` and `b` are assigned the same division.
    pub fn is_set(&self, a: usize, b: usize) -> bool {
        self.value(a, b) > SET_THRESHOLD
    }

    /// All raw values in pair-index order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Objective value reported by the solver.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Number of co-division partners of `team`.
    pub fn degree(&self, team: usize) -> usize {
        (0..self.num_teams())
            .filter(|&other| other != team && self.is_set(team, other))
            .count()
    }

    /// Triples `i < j < l` where exactly two of the three pairs are set.
    pub fn violated_triples(&self) -> Vec<(usize, usize, usize)> {
        let n = self.num_teams();
        let mut out = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                for l in (j + 1)..n {
                    let set = [self.is_set(i, j), self.is_set(j, l), self.is_set(i, l)]
                        .iter()
                        .filter(|&&s| s)
                        .count();
                    if set == 2 {
                        out.push((i, j, l));
                    }
                }
            }
        }
        out
    }

    /// Checks these values against every row of `model`, rounding to 0/1 first.
    pub fn verify(&self, model: &PartitionModel) -> Result<()> {
        if self.num_teams() != model.num_teams() {
            return Err(DivisionError::integrity(format!(
                "assignment covers {} teams, model has {}",
                self.num_teams(),
                model.num_teams()
            )));
        }
        let rounded: Vec<f64> = self
            .values
            .iter()
            .map(|&v| if v > SET_THRESHOLD { 1.0 } else { 0.0 })
            .collect();
        match model.first_violation(&rounded, 1e-9) {
            Some(row) => Err(DivisionError::integrity(format!(
                "solver assignment violates {:?}",
                row.kind
            ))),
            None => Ok(()),
        }
    }
}
