//! Cost evaluation of partitions.
//!
//! Computes total intra-division distance for optimized or existing
//! groupings.

mod evaluator;

pub use evaluator::{round_distance, total_distance, CostEvaluator};
