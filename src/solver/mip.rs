//! Exact solve through `good_lp`.
//!
//! Every pair indicator becomes a binary column and every model row a linear
//! constraint. The pure-Rust `microlp` backend runs branch-and-bound, so no
//! native solver library is required.

use std::time::{Duration, Instant};

use good_lp::solvers::microlp::microlp;
use good_lp::solvers::{SolutionStatus, WithTimeLimit};
use good_lp::{variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable};
use tracing::{debug, info, warn};

use crate::error::{DivisionError, Result};
use crate::formulation::{Assignment, PartitionModel, Sense};

use super::{PartitionSolver, SolveOptions};

/// Mixed-integer backend.
///
/// A time limit is handed to `microlp`, which stops branch-and-bound when the
/// budget expires. The best feasible incumbent found by then is returned;
/// without one the call fails with [`DivisionError::Timeout`].
///
/// # Examples
///
/// ```
/// use u_divisions::distance::DistanceMatrix;
/// use u_divisions::formulation::PartitionModel;
/// use u_divisions::solver::{MipSolver, PartitionSolver};
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 10.0, 10.0],
///     vec![1.0, 0.0, 10.0, 10.0],
///     vec![10.0, 10.0, 0.0, 1.0],
///     vec![10.0, 10.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let model = PartitionModel::build(&dm, 2).unwrap();
/// let assignment = MipSolver::new().solve(&model).unwrap();
/// assert!(assignment.is_set(0, 1));
/// assert!(assignment.is_set(2, 3));
/// assert!((assignment.objective() - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MipSolver {
    options: SolveOptions,
}

impl MipSolver {
    /// Creates a solver with no time limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given options.
    pub fn with_options(options: SolveOptions) -> Self {
        Self { options }
    }

    /// Current options.
    pub fn options(&self) -> &SolveOptions {
        &self.options
    }
}

impl PartitionSolver for MipSolver {
    fn name(&self) -> &'static str {
        "mip"
    }

    fn solve(&self, model: &PartitionModel) -> Result<Assignment> {
        info!(
            teams = model.num_teams(),
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            "starting MIP solve"
        );
        let started = Instant::now();

        let result = solve_mip(model, self.options.time_limit());

        match &result {
            Ok(a) => info!(
                objective = a.objective(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "MIP solve finished"
            ),
            Err(e) => warn!(error = %e, "MIP solve failed"),
        }
        result
    }
}

fn solve_mip(model: &PartitionModel, time_limit: Option<Duration>) -> Result<Assignment> {
    let mut vars = variables!();
    let x: Vec<Variable> = (0..model.num_variables())
        .map(|_| vars.add(variable().binary()))
        .collect();

    let mut objective = Expression::with_capacity(x.len());
    for (&cost, &var) in model.objective().iter().zip(&x) {
        objective.add_mul(cost, var);
    }

    let mut problem = vars.minimise(objective).using(microlp);
    for row in model.constraints() {
        let mut lhs = Expression::with_capacity(row.terms.len());
        for &(v, coef) in &row.terms {
            lhs.add_mul(coef, x[v]);
        }
        problem = problem.with(match row.sense {
            Sense::Equal => lhs.eq(row.rhs),
            Sense::LessEqual => lhs.leq(row.rhs),
        });
    }

    if let Some(limit) = time_limit {
        problem = problem.with_time_limit(limit.as_secs_f64());
    }

    let solution = problem
        .solve()
        .map_err(|e| from_resolution_error(e, time_limit))?;
    if let SolutionStatus::TimeLimit = solution.status() {
        warn!(?time_limit, "MIP budget expired, returning best incumbent");
    }
    let values: Vec<f64> = x.iter().map(|&v| solution.value(v)).collect();
    let objective = model.evaluate(&values)?;
    debug!(objective, "decoded MIP solution");

    Assignment::new(model.num_teams(), values, objective)
}

/// Maps a `good_lp` failure onto the crate's error kinds.
///
/// `microlp` reports an expired budget with no incumbent as
/// `ResolutionError::Other`; that case becomes [`DivisionError::Timeout`].
fn from_resolution_error(err: ResolutionError, time_limit: Option<Duration>) -> DivisionError {
    match (err, time_limit) {
        (ResolutionError::Infeasible, _) => DivisionError::Infeasible,
        (ResolutionError::Unbounded, _) => DivisionError::Unbounded,
        (ResolutionError::Other(msg), Some(limit)) if msg.starts_with("Time limit") => {
            DivisionError::Timeout(limit)
        }
        (other, _) => DivisionError::Solver(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn line(n: usize) -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                dm.set(i, j, (i as f64 - j as f64).abs());
            }
        }
        dm
    }

    #[test]
    fn test_line_groups_neighbours() {
        let model = PartitionModel::build(&line(6), 3).unwrap();
        let a = MipSolver::new().solve(&model).unwrap();
        assert!(a.is_set(0, 1) && a.is_set(1, 2) && a.is_set(0, 2));
        assert!(a.is_set(3, 4) && a.is_set(4, 5) && a.is_set(3, 5));
        assert!(!a.is_set(2, 3));
        // each block: 1 + 1 + 2
        assert!((a.objective() - 8.0).abs() < 1e-6);
        assert!(a.violated_triples().is_empty());
        assert!(a.verify(&model).is_ok());
    }

    #[test]
    fn test_singletons() {
        let model = PartitionModel::build(&line(4), 1).unwrap();
        let a = MipSolver::new().solve(&model).unwrap();
        assert!(a.values().iter().all(|&v| v < 0.5));
        assert!(a.objective().abs() < 1e-9);
    }

    #[test]
    fn test_generous_time_limit() {
        let model = PartitionModel::build(&line(4), 2).unwrap();
        let solver =
            MipSolver::with_options(SolveOptions::default().with_time_limit(Duration::from_secs(60)));
        let a = solver.solve(&model).unwrap();
        assert!(a.is_set(0, 1) && a.is_set(2, 3));
    }

    #[test]
    fn test_tight_budget_bounds_the_solve() {
        // 18 teams on a scrambled line: 153 columns, 2448 rows
        let n = 18;
        let mut dm = DistanceMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                let (a, b) = ((i * 7) % n, (j * 7) % n);
                dm.set(i, j, (a as f64 - b as f64).abs());
            }
        }
        let model = PartitionModel::build(&dm, 3).unwrap();
        let limit = Duration::from_millis(50);
        let solver = MipSolver::with_options(SolveOptions::default().with_time_limit(limit));

        let started = Instant::now();
        let result = solver.solve(&model);
        assert!(started.elapsed() < Duration::from_secs(30));
        match result {
            Err(DivisionError::Timeout(d)) => assert_eq!(d, limit),
            Ok(a) => assert!(a.verify(&model).is_ok()),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_resolution_error_mapping() {
        let limit = Some(Duration::from_secs(1));
        assert_eq!(
            from_resolution_error(ResolutionError::Infeasible, None),
            DivisionError::Infeasible
        );
        assert_eq!(
            from_resolution_error(ResolutionError::Unbounded, limit),
            DivisionError::Unbounded
        );
        assert_eq!(
            from_resolution_error(
                ResolutionError::Other("Time limit reached before finding a feasible solution"),
                limit
            ),
            DivisionError::Timeout(Duration::from_secs(1))
        );
        assert!(matches!(
            from_resolution_error(ResolutionError::Other("boom"), limit),
            DivisionError::Solver(_)
        ));
    }
}
