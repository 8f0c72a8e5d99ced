//! End-to-end reorganization: build, solve, extract, evaluate.

use std::fmt;

use tracing::{info, warn};

use crate::config::LeagueConfig;
use crate::distance::DistanceMatrix;
use crate::error::{DivisionError, Result};
use crate::evaluation::{round_distance, CostEvaluator};
use crate::extraction::extract_divisions;
use crate::formulation::PartitionModel;
use crate::models::{Partition, Team};
use crate::solver::{MipSolver, PartitionSolver};

/// Result of one reorganization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Reorganization {
    divisions: Partition,
    total_distance: i64,
    objective: f64,
}

impl Reorganization {
    /// The new divisions, ordered by smallest team index.
    pub fn divisions(&self) -> &Partition {
        &self.divisions
    }

    /// Total intra-division distance, rounded half-to-even.
    pub fn total_distance(&self) -> i64 {
        self.total_distance
    }

    /// Objective value reported by the solver.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// `(divisions, total_distance)` as plain values.
    pub fn into_parts(self) -> (Vec<Vec<usize>>, i64) {
        (self.divisions.into_divisions(), self.total_distance)
    }

    /// Text rendering that lists team names instead of indices.
    pub fn describe<'a>(&'a self, names: &'a [String]) -> Report<'a> {
        Report {
            title: "Optimal divisions",
            divisions: &self.divisions,
            division_names: None,
            team_names: Some(names),
            total_distance: self.total_distance,
        }
    }
}

impl fmt::Display for Reorganization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = Report {
            title: "Optimal divisions",
            divisions: &self.divisions,
            division_names: None,
            team_names: None,
            total_distance: self.total_distance,
        };
        write!(f, "{report}")
    }
}

/// Plain-text listing of a partition.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    title: &'a str,
    divisions: &'a Partition,
    division_names: Option<&'a [String]>,
    team_names: Option<&'a [String]>,
    total_distance: i64,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}km", self.title, self.total_distance)?;
        for (d, members) in self.divisions.divisions().iter().enumerate() {
            match self.division_names.and_then(|n| n.get(d)) {
                Some(name) => writeln!(f, "{name}:")?,
                None => writeln!(f, "Division {d}:")?,
            }
            for &team in members {
                match self.team_names.and_then(|n| n.get(team)) {
                    Some(name) => writeln!(f, "  {name}")?,
                    None => writeln!(f, "  team {team}")?,
                }
            }
        }
        Ok(())
    }
}

/// Runs the full pipeline with a chosen solver backend.
///
/// # Examples
///
/// ```
/// use u_divisions::distance::DistanceMatrix;
/// use u_divisions::pipeline::Reorganizer;
/// use u_divisions::solver::MipSolver;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 10.0, 10.0],
///     vec![1.0, 0.0, 10.0, 10.0],
///     vec![10.0, 10.0, 0.0, 1.0],
///     vec![10.0, 10.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let result = Reorganizer::new(MipSolver::new()).reorganize(&dm, 2).unwrap();
/// assert_eq!(result.divisions().divisions(), &[vec![0, 1], vec![2, 3]]);
/// assert_eq!(result.total_distance(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reorganizer<S> {
    solver: S,
}

impl<S: PartitionSolver> Reorganizer<S> {
    /// Creates a pipeline around `solver`.
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    /// The solver backend.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Finds divisions of `teams_per_division` teams minimizing travel distance.
    pub fn reorganize(
        &self,
        distances: &DistanceMatrix,
        teams_per_division: usize,
    ) -> Result<Reorganization> {
        let model = PartitionModel::build(distances, teams_per_division)?;
        info!(
            solver = self.solver.name(),
            teams = model.num_teams(),
            divisions = model.num_divisions(),
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            "solving division model"
        );

        let assignment = self.solver.solve(&model)?;
        if let Err(e) = assignment.verify(&model) {
            warn!(solver = self.solver.name(), error = %e, "rejecting solver assignment");
            return Err(e);
        }
        let divisions = extract_divisions(&assignment, teams_per_division)?;

        let raw = CostEvaluator::new(distances).raw_total(&divisions);
        let objective = assignment.objective();
        if (raw - objective).abs() > 1e-6 * raw.max(1.0) {
            warn!(
                objective,
                evaluated = raw,
                "solver objective differs from evaluated distance"
            );
        }

        let total_distance = round_distance(raw);
        info!(total_distance, "reorganization complete");
        Ok(Reorganization {
            divisions,
            total_distance,
            objective,
        })
    }

    /// Reorganizes a league and evaluates its current grouping for comparison.
    pub fn compare(&self, league: &LeagueConfig) -> Result<Comparison> {
        let teams = league.teams()?;
        let distances = league.distance_matrix()?;
        let optimal = self.reorganize(&distances, league.teams_per_division()?)?;

        let current = league.current_partition()?.map(|divisions| {
            let total_distance = CostEvaluator::new(&distances).total_distance(&divisions);
            let mut labels: Vec<String> = teams
                .iter()
                .filter_map(Team::division)
                .map(str::to_string)
                .collect();
            labels.sort();
            labels.dedup();
            Baseline {
                divisions,
                labels,
                total_distance,
            }
        });
        if let Some(baseline) = &current {
            info!(
                optimal = optimal.total_distance,
                current = baseline.total_distance,
                "compared against current divisions"
            );
        }

        Ok(Comparison {
            league: league.league.clone(),
            team_names: teams.iter().map(|t| t.name().to_string()).collect(),
            optimal,
            current,
        })
    }
}

impl Reorganizer<MipSolver> {
    /// Exact pipeline bounded by the league file's solver budget.
    pub fn for_league(league: &LeagueConfig) -> Self {
        Self::new(MipSolver::with_options(league.solver.clone()))
    }
}

/// An existing grouping with its evaluated cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    divisions: Partition,
    labels: Vec<String>,
    total_distance: i64,
}

impl Baseline {
    /// Divisions, ordered by label.
    pub fn divisions(&self) -> &Partition {
        &self.divisions
    }

    /// Division labels, sorted, aligned with [`divisions`](Self::divisions).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Total intra-division distance, rounded half-to-even.
    pub fn total_distance(&self) -> i64 {
        self.total_distance
    }
}

/// Optimal divisions next to the league's current ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    league: String,
    team_names: Vec<String>,
    optimal: Reorganization,
    current: Option<Baseline>,
}

impl Comparison {
    /// League name.
    pub fn league(&self) -> &str {
        &self.league
    }

    /// The optimized result.
    pub fn optimal(&self) -> &Reorganization {
        &self.optimal
    }

    /// The current grouping, if every team had a division label.
    pub fn current(&self) -> Option<&Baseline> {
        self.current.as_ref()
    }

    /// Distance saved by switching to the optimal divisions.
    pub fn saving(&self) -> Option<i64> {
        self.current
            .as_ref()
            .map(|c| c.total_distance - self.optimal.total_distance)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.league)?;
        write!(f, "{}", self.optimal.describe(&self.team_names))?;
        if let Some(current) = &self.current {
            writeln!(f)?;
            let report = Report {
                title: "Current divisions",
                divisions: &current.divisions,
                division_names: Some(current.labels.as_slice()),
                team_names: Some(self.team_names.as_slice()),
                total_distance: current.total_distance,
            };
            write!(f, "{report}")?;
        }
        Ok(())
    }
}

/// Optimal divisions for `num_teams` teams with the exact MIP backend.
///
/// Returns `(divisions, total_distance)`. `num_teams` must match the matrix.
pub fn optimize_divisions(
    distances: &DistanceMatrix,
    num_teams: usize,
    teams_per_division: usize,
) -> Result<(Vec<Vec<usize>>, i64)> {
    if distances.size() != num_teams {
        return Err(DivisionError::invalid(format!(
            "distance matrix is {0}x{0} but {num_teams} teams were given",
            distances.size()
        )));
    }
    Ok(Reorganizer::new(MipSolver::new())
        .reorganize(distances, teams_per_division)?
        .into_parts())
}
