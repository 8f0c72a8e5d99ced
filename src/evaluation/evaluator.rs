//! Intra-division travel cost.

use crate::distance::DistanceMatrix;
use crate::models::Partition;

/// Computes intra-division travel distance for any partition.
///
/// Works equally for a solver's result and for an existing grouping, so both
/// can be compared without solving again. Every intra-division pair is summed
/// exactly once; the cost of a division of `k` teams has `k(k-1)/2` terms and
/// is not normalized.
///
/// # Examples
///
/// ```
/// use u_divisions::distance::DistanceMatrix;
/// use u_divisions::evaluation::CostEvaluator;
/// use u_divisions::models::Partition;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 10.0, 10.0],
///     vec![1.0, 0.0, 10.0, 10.0],
///     vec![10.0, 10.0, 0.0, 1.0],
///     vec![10.0, 10.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let evaluator = CostEvaluator::new(&dm);
/// let p = Partition::new(vec![vec![0, 2], vec![1, 3]]);
/// assert_eq!(evaluator.division_costs(&p), vec![10.0, 10.0]);
/// assert_eq!(evaluator.total_distance(&p), 20);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CostEvaluator<'a> {
    distances: &'a DistanceMatrix,
}

impl<'a> CostEvaluator<'a> {
    /// Creates an evaluator over the given distances.
    pub fn new(distances: &'a DistanceMatrix) -> Self {
        Self { distances }
    }

    /// Sum of pairwise distances inside one division.
    pub fn division_cost(&self, members: &[usize]) -> f64 {
        let mut total = 0.0;
        for (p, &a) in members.iter().enumerate() {
            for &b in &members[p + 1..] {
                total += self.distances.get(a, b);
            }
        }
        total
    }

    /// Per-division costs, in division order.
    pub fn division_costs(&self, partition: &Partition) -> Vec<f64> {
        partition
            .divisions()
            .iter()
            .map(|d| self.division_cost(d))
            .collect()
    }

    /// Unrounded total intra-division distance.
    pub fn raw_total(&self, partition: &Partition) -> f64 {
        self.division_costs(partition).iter().sum()
    }

    /// Total intra-division distance, rounded half-to-even.
    pub fn total_distance(&self, partition: &Partition) -> i64 {
        round_distance(self.raw_total(partition))
    }
}

/// Total intra-division distance of `partition`, rounded half-to-even.
///
/// Shorthand for [`CostEvaluator::total_distance`].
pub fn total_distance(partition: &Partition, distances: &DistanceMatrix) -> i64 {
    CostEvaluator::new(distances).total_distance(partition)
}

/// Rounds a distance to whole units, ties to even.
pub fn round_distance(distance: f64) -> i64 {
    distance.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 2.5, 4.0, 7.0],
            vec![2.5, 0.0, 3.0, 6.0],
            vec![4.0, 3.0, 0.0, 1.25],
            vec![7.0, 6.0, 1.25, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_division_cost_counts_each_pair_once() {
        let dm = sample();
        let ev = CostEvaluator::new(&dm);
        assert_eq!(ev.division_cost(&[0, 1, 2]), 2.5 + 4.0 + 3.0);
        assert_eq!(ev.division_cost(&[3]), 0.0);
        assert_eq!(ev.division_cost(&[]), 0.0);
    }

    #[test]
    fn test_rounding_half_to_even() {
        let dm = sample();
        // 2.5 + 1.25 = 3.75
        let p = Partition::new(vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(total_distance(&p, &dm), 4);
        assert_eq!(round_distance(2.5), 2);
        assert_eq!(round_distance(3.5), 4);
        assert_eq!(round_distance(0.49), 0);
    }

    #[test]
    fn test_single_division_is_sum_of_all_pairs() {
        let dm = sample();
        let p = Partition::new(vec![vec![0, 1, 2, 3]]);
        assert_eq!(CostEvaluator::new(&dm).raw_total(&p), dm.total_pairwise());
    }

    #[test]
    fn test_idempotent() {
        let dm = sample();
        let p = Partition::new(vec![vec![0, 3], vec![1, 2]]);
        let first = total_distance(&p, &dm);
        assert_eq!(first, total_distance(&p, &dm));
        assert_eq!(first, 10);
    }
}
