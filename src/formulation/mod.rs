//! Pairwise co-division formulation.
//!
//! - [`PairIndex`]: Dense numbering of unordered team pairs
//! - [`PartitionModel`]: Objective, degree rows, and transitivity rows
//! - [`Assignment`]: Indicator values returned by a solver

mod assignment;
mod model;
mod pairs;

pub use assignment::{Assignment, SET_THRESHOLD};
pub use model::{ConstraintKind, LinearConstraint, PartitionModel, Sense};
pub use pairs::PairIndex;
