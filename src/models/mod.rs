//! Domain model types for division reorganization.
//!
//! Provides teams with their home locations and partitions of team indices
//! into divisions.

mod partition;
mod team;

pub(crate) use partition::check_sizes;
pub use partition::Partition;
pub use team::Team;
