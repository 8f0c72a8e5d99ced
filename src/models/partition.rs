//! Divisions and partitions of teams.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DivisionError, Result};

/// An ordered collection of disjoint divisions, each a list of team indices.
///
/// A `Partition` is a plain container; [`Partition::defect`] reports whether it
/// is a complete equal-size partition of a given number of teams.
///
/// # Examples
///
/// ```
/// use u_divisions::models::Partition;
///
/// let p = Partition::contiguous(6, 3).unwrap();
/// assert_eq!(p.divisions(), &[vec![0, 1, 2], vec![3, 4, 5]]);
/// assert!(p.same_division(1, 2));
/// assert!(!p.same_division(2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Partition {
    divisions: Vec<Vec<usize>>,
}

impl Partition {
    /// Wraps the given divisions without checking them.
    pub fn new(divisions: Vec<Vec<usize>>) -> Self {
        Self { divisions }
    }

    /// Consecutive blocks `[0..k), [k..2k), …` covering `num_teams` teams.
    ///
    /// This is the current grouping when teams are listed sorted by their
    /// division label.
    pub fn contiguous(num_teams: usize, teams_per_division: usize) -> Result<Self> {
        check_sizes(num_teams, teams_per_division)?;
        let divisions = (0..num_teams / teams_per_division)
            .map(|d| (d * teams_per_division..(d + 1) * teams_per_division).collect())
            .collect();
        Ok(Self { divisions })
    }

    /// Groups team indices by their division label.
    ///
    /// Divisions are ordered by label; members keep ascending index order.
    /// Fails if the labelled divisions differ in size.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (team, label) in labels.iter().enumerate() {
            groups.entry(label.as_ref()).or_default().push(team);
        }

        let divisions: Vec<Vec<usize>> = groups.into_values().collect();
        if let Some(first) = divisions.first() {
            if let Some(bad) = divisions.iter().find(|d| d.len() != first.len()) {
                return Err(DivisionError::invalid(format!(
                    "labelled divisions differ in size ({} vs {})",
                    first.len(),
                    bad.len()
                )));
            }
        }
        Ok(Self { divisions })
    }

    /// The divisions in order.
    pub fn divisions(&self) -> &[Vec<usize>] {
        &self.divisions
    }

    /// Consumes the partition, returning the raw division lists.
    pub fn into_divisions(self) -> Vec<Vec<usize>> {
        self.divisions
    }

    /// Number of divisions.
    pub fn num_divisions(&self) -> usize {
        self.divisions.len()
    }

    /// Total number of team slots across all divisions.
    pub fn num_teams(&self) -> usize {
        self.divisions.iter().map(Vec::len).sum()
    }

    /// Returns `true` if teams `a` and `b` share a division.
    pub fn same_division(&self, a: usize, b: usize) -> bool {
        self.divisions
            .iter()
            .any(|d| d.contains(&a) && d.contains(&b))
    }

    /// Division index of every team, or `None` for teams not placed.
    pub fn labels(&self, num_teams: usize) -> Vec<Option<usize>> {
        let mut labels = vec![None; num_teams];
        for (d, members) in self.divisions.iter().enumerate() {
            for &t in members {
                if t < num_teams {
                    labels[t] = Some(d);
                }
            }
        }
        labels
    }

    /// Every unordered intra-division pair `(a, b)`, each exactly once.
    pub fn intra_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.divisions.iter().flat_map(|d| {
            d.iter()
                .enumerate()
                .flat_map(move |(p, &a)| d[p + 1..].iter().map(move |&b| (a, b)))
        })
    }

    /// Describes the first way this fails to be an equal-size partition.
    ///
    /// Returns `None` when there are exactly `num_teams / teams_per_division`
    /// divisions, each of size `teams_per_division`, covering every team in
    /// `0..num_teams` exactly once.
    pub fn defect(&self, num_teams: usize, teams_per_division: usize) -> Option<String> {
        if teams_per_division == 0 || num_teams % teams_per_division != 0 {
            return Some(format!(
                "{num_teams} teams cannot form divisions of {teams_per_division}"
            ));
        }
        let expected = num_teams / teams_per_division;
        if self.divisions.len() != expected {
            return Some(format!(
                "expected {expected} divisions, found {}",
                self.divisions.len()
            ));
        }
        if let Some((d, members)) = self
            .divisions
            .iter()
            .enumerate()
            .find(|(_, m)| m.len() != teams_per_division)
        {
            return Some(format!(
                "division {d} has {} teams, expected {teams_per_division}",
                members.len()
            ));
        }

        let mut seen = vec![false; num_teams];
        for &t in self.divisions.iter().flatten() {
            if t >= num_teams {
                return Some(format!("team {t} is out of range 0..{num_teams}"));
            }
            if std::mem::replace(&mut seen[t], true) {
                return Some(format!("team {t} appears in more than one slot"));
            }
        }
        // sizes sum to num_teams and there are no duplicates, so coverage holds
        None
    }
}

/// Validates a team count and division size pair.
pub(crate) fn check_sizes(num_teams: usize, teams_per_division: usize) -> Result<()> {
    if num_teams < 2 {
        return Err(DivisionError::invalid(format!(
            "need at least 2 teams, got {num_teams}"
        )));
    }
    if teams_per_division < 1 || teams_per_division > num_teams {
        return Err(DivisionError::invalid(format!(
            "teams per division must be in 1..={num_teams}, got {teams_per_division}"
        )));
    }
    if num_teams % teams_per_division != 0 {
        return Err(DivisionError::invalid(format!(
            "{num_teams} teams cannot be split into divisions of {teams_per_division}"
        )));
    }
    Ok(())
}
