//! Binary optimization model over pairwise co-division indicators.
//!
//! # Formulation
//!
//! One binary variable `x[i,j]` per unordered pair `i < j` means "teams `i`
//! and `j` share a division". With `k` teams per division:
//!
//! ```text
//! minimise   Σ_{i<j} d(i,j) · x[i,j]
//! subject to Σ_{j≠i} x[i,j]                 = k - 1     for every team i
//!            x[i,j] + x[j,l] - x[i,l]        ≤ 1         for every i < j < l
//!            x[i,j] + x[i,l] - x[j,l]        ≤ 1
//!            x[i,l] + x[j,l] - x[i,j]        ≤ 1
//! ```
//!
//! The degree rows fix every division's size. The transitivity rows make the
//! co-division relation an equivalence relation: whenever two pairs of a
//! triple are set, the third must be too.
//!
//! # Complexity
//!
//! `n(n-1)/2` variables, `n` degree rows, and `3·C(n,3)` transitivity rows.
//! The cubic row count limits exact solving to a few dozen teams.

use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::{DivisionError, Result};
use crate::models::check_sizes;

use super::PairIndex;

/// Direction of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `Σ a·x = rhs`
    Equal,
    /// `Σ a·x ≤ rhs`
    LessEqual,
}

/// What a constraint row encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Team `team` has exactly `k - 1` co-division partners.
    Degree {
        /// Constrained team.
        team: usize,
    },
    /// Closure of the triple `i < j < l`; `pivot` is the pair forced to 1.
    Transitivity {
        /// The triple in ascending order.
        triple: (usize, usize, usize),
        /// Pair on the right-hand side of `a + b ≤ pivot + 1`.
        pivot: (usize, usize),
    },
}

/// A linear constraint over pair variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// `(variable index, coefficient)` terms.
    pub terms: Vec<(usize, f64)>,
    /// Constraint direction.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: f64,
    /// What the row encodes.
    pub kind: ConstraintKind,
}

impl LinearConstraint {
    /// Left-hand side value under the given variable values.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, a)| a * values[v]).sum()
    }

    /// Returns `true` if `values` satisfies this row within `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::Equal => (lhs - self.rhs).abs() <= tol,
            Sense::LessEqual => lhs <= self.rhs + tol,
        }
    }
}

/// The division-partition model, ready to hand to a solver.
///
/// Immutable once built.
///
/// # Examples
///
/// ```
/// use u_divisions::distance::DistanceMatrix;
/// use u_divisions::formulation::PartitionModel;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 10.0, 10.0],
///     vec![1.0, 0.0, 10.0, 10.0],
///     vec![10.0, 10.0, 0.0, 1.0],
///     vec![10.0, 10.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let model = PartitionModel::build(&dm, 2).unwrap();
/// assert_eq!(model.num_variables(), 6);
/// assert_eq!(model.num_constraints(), 4 + 3 * 4);
/// ```
#[derive(Debug, Clone)]
pub struct PartitionModel {
    pairs: PairIndex,
    teams_per_division: usize,
    objective: Vec<f64>,
    constraints: Vec<LinearConstraint>,
}

impl PartitionModel {
    /// Builds the model for `dist.size()` teams in divisions of `teams_per_division`.
    ///
    /// Fails with [`DivisionError::InvalidInput`] if the matrix is malformed or
    /// the team count is not a multiple of the division size.
    pub fn build(dist: &DistanceMatrix, teams_per_division: usize) -> Result<Self> {
        let n = dist.size();
        check_sizes(n, teams_per_division)?;
        dist.validate()?;

        let pairs = PairIndex::new(n);
        let objective: Vec<f64> = pairs.iter().map(|(i, j)| dist.get(i, j)).collect();

        let mut constraints = Vec::with_capacity(n + 3 * n * (n - 1) * n.saturating_sub(2) / 6);

        for team in 0..n {
            let terms = (0..n)
                .filter(|&other| other != team)
                .map(|other| (pairs.index(team, other), 1.0))
                .collect();
            constraints.push(LinearConstraint {
                terms,
                sense: Sense::Equal,
                rhs: (teams_per_division - 1) as f64,
                kind: ConstraintKind::Degree { team },
            });
        }

        for i in 0..n {
            for j in (i + 1)..n {
                for l in (j + 1)..n {
                    let ij = pairs.index(i, j);
                    let il = pairs.index(i, l);
                    let jl = pairs.index(j, l);
                    for (a, b, pivot, pivot_pair) in [
                        (ij, jl, il, (i, l)),
                        (ij, il, jl, (j, l)),
                        (il, jl, ij, (i, j)),
                    ] {
                        constraints.push(LinearConstraint {
                            terms: vec![(a, 1.0), (b, 1.0), (pivot, -1.0)],
                            sense: Sense::LessEqual,
                            rhs: 1.0,
                            kind: ConstraintKind::Transitivity {
                                triple: (i, j, l),
                                pivot: pivot_pair,
                            },
                        });
                    }
                }
            }
        }

        debug!(
            teams = n,
            teams_per_division,
            variables = pairs.len(),
            constraints = constraints.len(),
            "built partition model"
        );

        Ok(Self {
            pairs,
            teams_per_division,
            objective,
            constraints,
        })
    }

    /// Number of teams.
    pub fn num_teams(&self) -> usize {
        self.pairs.num_teams()
    }

    /// Teams per division, `k`.
    pub fn teams_per_division(&self) -> usize {
        self.teams_per_division
    }

    /// Number of divisions, `n / k`.
    pub fn num_divisions(&self) -> usize {
        self.num_teams() / self.teams_per_division
    }

    /// Pair-to-variable index.
    pub fn pairs(&self) -> &PairIndex {
        &self.pairs
    }

    /// Number of binary variables, `n(n-1)/2`.
    pub fn num_variables(&self) -> usize {
        self.pairs.len()
    }

    /// Objective coefficients, one per variable (the pair's distance).
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Objective coefficient of the pair `{a, b}`.
    pub fn cost(&self, a: usize, b: usize) -> f64 {
        self.objective[self.pairs.index(a, b)]
    }

    /// All constraint rows: degree rows first, then transitivity rows.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Total number of constraint rows.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// First constraint violated by `values`, if any.
    pub fn first_violation(&self, values: &[f64], tol: f64) -> Option<&LinearConstraint> {
        if values.len() != self.num_variables() {
            return None;
        }
        self.constraints
            .iter()
            .find(|c| !c.is_satisfied(values, tol))
    }

    /// Objective value `Σ c·x` of the given variable values.
    pub fn evaluate(&self, values: &[f64]) -> Result<f64> {
        if values.len() != self.num_variables() {
            return Err(DivisionError::integrity(format!(
                "expected {} variable values, got {}",
                self.num_variables(),
                values.len()
            )));
        }
        Ok(self.objective.iter().zip(values).map(|(c, x)| c * x).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_team() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 1.0, 10.0, 10.0],
            vec![1.0, 0.0, 10.0, 10.0],
            vec![10.0, 10.0, 0.0, 1.0],
            vec![10.0, 10.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_model_dimensions() {
        let dm = DistanceMatrix::new(6);
        let model = PartitionModel::build(&dm, 3).unwrap();
        assert_eq!(model.num_variables(), 15);
        // 6 degree rows + 3 * C(6,3)
        assert_eq!(model.num_constraints(), 6 + 3 * 20);
        assert_eq!(model.num_divisions(), 2);
    }

    #[test]
    fn test_objective_coefficients() {
        let model = PartitionModel::build(&four_team(), 2).unwrap();
        assert_eq!(model.objective(), &[1.0, 10.0, 10.0, 10.0, 10.0, 1.0]);
        assert_eq!(model.cost(3, 2), 1.0);
    }

    #[test]
    fn test_degree_rows() {
        let model = PartitionModel::build(&four_team(), 2).unwrap();
        let degree: Vec<_> = model
            .constraints()
            .iter()
            .filter(|c| matches!(c.kind, ConstraintKind::Degree { .. }))
            .collect();
        assert_eq!(degree.len(), 4);
        for row in degree {
            assert_eq!(row.sense, Sense::Equal);
            assert_eq!(row.rhs, 1.0);
            assert_eq!(row.terms.len(), 3);
        }
    }

    #[test]
    fn test_transitivity_rejects_open_triple() {
        let model = PartitionModel::build(&four_team(), 2).unwrap();
        // x01 = x12 = 1 but x02 = 0
        let mut values = vec![0.0; 6];
        values[model.pairs().index(0, 1)] = 1.0;
        values[model.pairs().index(1, 2)] = 1.0;
        let broken = model
            .constraints()
            .iter()
            .filter(|c| !c.is_satisfied(&values, 1e-9))
            .find(|c| matches!(c.kind, ConstraintKind::Transitivity { .. }))
            .expect("transitivity row violated");
        assert_eq!(
            broken.kind,
            ConstraintKind::Transitivity {
                triple: (0, 1, 2),
                pivot: (0, 2)
            }
        );
    }

    #[test]
    fn test_valid_assignment_satisfies_all_rows() {
        let model = PartitionModel::build(&four_team(), 2).unwrap();
        let mut values = vec![0.0; 6];
        values[model.pairs().index(0, 1)] = 1.0;
        values[model.pairs().index(2, 3)] = 1.0;
        assert!(model.first_violation(&values, 1e-9).is_none());
        assert_eq!(model.evaluate(&values).unwrap(), 2.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            PartitionModel::build(&DistanceMatrix::new(5), 2),
            Err(DivisionError::InvalidInput(_))
        ));
        assert!(PartitionModel::build(&DistanceMatrix::new(4), 0).is_err());
        assert!(PartitionModel::build(&DistanceMatrix::new(1), 1).is_err());
        let mut asym = DistanceMatrix::new(2);
        asym.set(0, 1, 1.0);
        assert!(PartitionModel::build(&asym, 2).is_err());
    }

    #[test]
    fn test_single_division_degree() {
        let model = PartitionModel::build(&four_team(), 4).unwrap();
        assert!(model
            .constraints()
            .iter()
            .filter(|c| matches!(c.kind, ConstraintKind::Degree { .. }))
            .all(|c| c.rhs == 3.0));
    }
}
