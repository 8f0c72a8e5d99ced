//! # u-divisions
//!
//! Reorganizes a league's teams into equal-size, geographically compact
//! divisions by minimizing total intra-division travel distance.
//!
//! The problem is modelled with one binary "same division" indicator per
//! pair of teams, a degree constraint fixing every division's size, and
//! transitivity constraints that force the indicators to describe a genuine
//! partition.
//!
//! ## Modules
//!
//! - [`distance`]: Distance matrix and great-circle distances
//! - [`models`]: Domain model types (Team, Partition)
//! - [`formulation`]: Pairwise co-division model and solver assignments
//! - [`solver`]: Solver backends (exact MIP, swap-search heuristic)
//! - [`extraction`]: Decoding assignments into divisions
//! - [`evaluation`]: Intra-division cost of any partition
//! - [`pipeline`]: Build → solve → extract → evaluate, plus baseline comparison
//! - [`config`]: League files
//!
//! ## Example
//!
//! ```
//! use u_divisions::distance::DistanceMatrix;
//! use u_divisions::optimize_divisions;
//!
//! let dm = DistanceMatrix::from_rows(&[
//!     vec![0.0, 1.0, 10.0, 10.0],
//!     vec![1.0, 0.0, 10.0, 10.0],
//!     vec![10.0, 10.0, 0.0, 1.0],
//!     vec![10.0, 10.0, 1.0, 0.0],
//! ])
//! .unwrap();
//! let (divisions, total) = optimize_divisions(&dm, 4, 2).unwrap();
//! assert_eq!(divisions, vec![vec![0, 1], vec![2, 3]]);
//! assert_eq!(total, 2);
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod extraction;
pub mod formulation;
pub mod models;
pub mod pipeline;
pub mod solver;

pub use error::{DivisionError, Result};
pub use pipeline::{optimize_divisions, Reorganizer};
