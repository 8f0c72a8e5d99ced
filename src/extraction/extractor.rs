//! Chain decoding of pair indicators.

use tracing::{debug, warn};

use crate::error::{DivisionError, Result};
use crate::formulation::Assignment;
use crate::models::Partition;

/// Decodes a solved assignment into divisions of `teams_per_division` teams.
///
/// Teams are scanned in ascending order. For team `i`, only its first partner
/// `j > i` counts: `j` is appended to the division currently ending in `i`,
/// or starts a new division `[i, j]` if none does. Under transitivity every
/// division `a < b < c < …` is therefore discovered as the chain
/// `a→b, b→c, …`. Teams that are never linked become singletons, which is
/// only valid when `teams_per_division == 1`.
///
/// The result is checked strictly: `n / k` divisions of exactly `k` teams
/// covering everyone once, and every indicator must agree with the decoded
/// grouping. Any mismatch is a [`DivisionError::PartitionIntegrity`].
///
/// # Examples
///
/// ```
/// use u_divisions::extraction::extract_divisions;
/// use u_divisions::formulation::Assignment;
///
/// // pairs in order: 01 02 03 12 13 23
/// let a = Assignment::new(4, vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0], 0.0).unwrap();
/// let p = extract_divisions(&a, 2).unwrap();
/// assert_eq!(p.divisions(), &[vec![0, 2], vec![1, 3]]);
/// ```
pub fn extract_divisions(assignment: &Assignment, teams_per_division: usize) -> Result<Partition> {
    let n = assignment.num_teams();
    let mut divisions: Vec<Vec<usize>> = Vec::new();
    let mut placed = vec![false; n];

    for i in 0..n {
        let Some(j) = ((i + 1)..n).find(|&j| assignment.is_set(i, j)) else {
            if !placed[i] {
                divisions.push(vec![i]);
                placed[i] = true;
            }
            continue;
        };

        match divisions.iter_mut().find(|d| d.last() == Some(&i)) {
            Some(division) => division.push(j),
            None => {
                if placed[i] {
                    // i sits mid-chain yet links forward: the chain forked
                    return Err(DivisionError::integrity(format!(
                        "team {i} links to {j} but does not end its division"
                    )));
                }
                divisions.push(vec![i, j]);
                placed[i] = true;
            }
        }
        if std::mem::replace(&mut placed[j], true) {
            return Err(DivisionError::integrity(format!(
                "team {j} was reached from two different chains"
            )));
        }
    }

    let partition = Partition::new(divisions);
    if let Some(defect) = partition.defect(n, teams_per_division) {
        warn!(%defect, "decoded divisions are malformed");
        return Err(DivisionError::PartitionIntegrity(defect));
    }
    check_agreement(assignment, &partition)?;

    debug!(divisions = partition.num_divisions(), "extracted divisions");
    Ok(partition)
}

/// Every indicator must be set exactly when its pair shares a division.
fn check_agreement(assignment: &Assignment, partition: &Partition) -> Result<()> {
    let n = assignment.num_teams();
    let labels = partition.labels(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let together = labels[i].is_some() && labels[i] == labels[j];
            if assignment.is_set(i, j) != together {
                return Err(DivisionError::integrity(format!(
                    "indicator ({i}, {j}) = {} disagrees with decoded divisions",
                    assignment.value(i, j)
                )));
            }
        }
    }
    Ok(())
}
