//! Solver backends for the partition model.
//!
//! A solver takes a [`PartitionModel`] and returns an [`Assignment`] of every
//! pair indicator plus an objective value. Backends are interchangeable;
//! extraction and cost evaluation never depend on which one ran.
//!
//! - [`MipSolver`]: Exact mixed-integer solve via `good_lp` (pure-Rust `microlp`)
//! - [`SwapSearchSolver`]: Multi-start pairwise swap descent for larger leagues

mod mip;
mod swap_search;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formulation::{Assignment, PartitionModel};

pub use mip::MipSolver;
pub use swap_search::{SwapSearchConfig, SwapSearchSolver};

/// A backend able to solve a [`PartitionModel`].
///
/// # Examples
///
/// ```
/// use u_divisions::formulation::{Assignment, PartitionModel};
/// use u_divisions::models::Partition;
/// use u_divisions::solver::PartitionSolver;
/// use u_divisions::Result;
///
/// /// Always answers with consecutive blocks.
/// struct Blocks;
///
/// impl PartitionSolver for Blocks {
///     fn name(&self) -> &'static str { "blocks" }
///     fn solve(&self, model: &PartitionModel) -> Result<Assignment> {
///         let n = model.num_teams();
///         let p = Partition::contiguous(n, model.teams_per_division())?;
///         let cost = p.intra_pairs().map(|(a, b)| model.cost(a, b)).sum();
///         Ok(Assignment::from_partition(n, &p, cost))
///     }
/// }
/// ```
pub trait PartitionSolver {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Solves `model`, returning a value for every pair indicator.
    ///
    /// Errors: [`Infeasible`](crate::DivisionError::Infeasible),
    /// [`Unbounded`](crate::DivisionError::Unbounded),
    /// [`Timeout`](crate::DivisionError::Timeout), or
    /// [`Solver`](crate::DivisionError::Solver). Never retried internally.
    fn solve(&self, model: &PartitionModel) -> Result<Assignment>;
}

impl<S: PartitionSolver + ?Sized> PartitionSolver for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, model: &PartitionModel) -> Result<Assignment> {
        (**self).solve(model)
    }
}

impl<S: PartitionSolver + ?Sized> PartitionSolver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, model: &PartitionModel) -> Result<Assignment> {
        (**self).solve(model)
    }
}

/// Budget options shared by solver backends.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_divisions::solver::SolveOptions;
///
/// let opts = SolveOptions::default().with_time_limit(Duration::from_secs(30));
/// assert_eq!(opts.time_limit(), Some(Duration::from_secs(30)));
/// assert_eq!(SolveOptions::default().time_limit(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Wall-clock budget in seconds; `None` means unlimited.
    pub time_limit_secs: Option<f64>,
}

impl SolveOptions {
    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = Some(limit.as_secs_f64());
        self
    }

    /// The wall-clock budget, if a valid one is set.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }
}
