//! League configuration loaded from JSON.
//!
//! ```json
//! {
//!   "league": "NHL",
//!   "divisions": 4,
//!   "solver": { "time_limit_secs": 120.0 },
//!   "teams": [
//!     { "name": "Boston Bruins", "latitude": 42.366, "longitude": -71.062,
//!       "division": "Atlantic" }
//!   ]
//! }
//! ```
//!
//! `divisions` may be omitted for the leagues known to [`preset_divisions`].
//! Unknown fields, such as an arena name, are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::{DistanceMatrix, GeoPoint};
use crate::error::{DivisionError, Result};
use crate::models::{check_sizes, Partition, Team};
use crate::solver::SolveOptions;

/// Standard number of divisions for well-known leagues.
///
/// # Examples
///
/// ```
/// use u_divisions::config::preset_divisions;
///
/// assert_eq!(preset_divisions("NFL"), Some(8));
/// assert_eq!(preset_divisions("nhl"), Some(4));
/// assert_eq!(preset_divisions("MLS"), None);
/// ```
pub fn preset_divisions(league: &str) -> Option<usize> {
    match league.to_ascii_uppercase().as_str() {
        "NFL" => Some(8),
        "NBA" | "MLB" => Some(6),
        "NHL" => Some(4),
        _ => None,
    }
}

/// One team entry of a league file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Display name.
    pub name: String,
    /// Arena latitude in degrees.
    pub latitude: f64,
    /// Arena longitude in degrees.
    pub longitude: f64,
    /// Current division label.
    #[serde(default)]
    pub division: Option<String>,
}

/// A league to reorganize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// League name, also used to look up a preset division count.
    pub league: String,
    /// Number of divisions; falls back to [`preset_divisions`].
    #[serde(default)]
    pub divisions: Option<usize>,
    /// Solver budget, applied by [`Reorganizer::for_league`](crate::pipeline::Reorganizer::for_league).
    #[serde(default)]
    pub solver: SolveOptions,
    /// Teams in any order.
    pub teams: Vec<TeamRecord>,
}

impl LeagueConfig {
    /// Parses and validates a league from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DivisionError::Config(format!("malformed league JSON: {e}")))?;
        config.validate()?;
        debug!(
            league = %config.league,
            teams = config.teams.len(),
            "loaded league configuration"
        );
        Ok(config)
    }

    /// Reads, parses, and validates a league file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DivisionError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Checks coordinates and that the teams split evenly into divisions.
    pub fn validate(&self) -> Result<()> {
        self.teams()?;
        self.teams_per_division()?;
        Ok(())
    }

    /// Number of divisions, explicit or from the league preset.
    pub fn num_divisions(&self) -> Result<usize> {
        self.divisions
            .or_else(|| preset_divisions(&self.league))
            .ok_or_else(|| {
                DivisionError::Config(format!(
                    "no division count given and no preset for league '{}'",
                    self.league
                ))
            })
    }

    /// Teams per division, `teams / divisions`.
    pub fn teams_per_division(&self) -> Result<usize> {
        let divisions = self.num_divisions()?;
        let n = self.teams.len();
        if divisions == 0 || n % divisions != 0 {
            return Err(DivisionError::invalid(format!(
                "the number of divisions ({divisions}) must divide the number of teams ({n})"
            )));
        }
        let k = n / divisions;
        check_sizes(n, k)?;
        Ok(k)
    }

    /// Team models with validated locations, in file order.
    pub fn teams(&self) -> Result<Vec<Team>> {
        self.teams
            .iter()
            .map(|r| -> Result<Team> {
                let location = GeoPoint::new(r.latitude, r.longitude).map_err(|e| {
                    DivisionError::invalid(format!("team '{}': {e}", r.name))
                })?;
                let team = Team::new(r.name.clone(), location);
                Ok(match &r.division {
                    Some(division) => team.with_division(division.clone()),
                    None => team,
                })
            })
            .collect()
    }

    /// Great-circle distances (km) between all arenas.
    pub fn distance_matrix(&self) -> Result<DistanceMatrix> {
        let points: Vec<GeoPoint> = self.teams()?.iter().map(Team::location).collect();
        Ok(DistanceMatrix::from_coordinates(&points))
    }

    /// The current grouping by division label, if every team has one.
    ///
    /// Fails with `InvalidInput` when the labelled grouping does not have the
    /// league's division count and size.
    pub fn current_partition(&self) -> Result<Option<Partition>> {
        let teams = self.teams()?;
        let Some(labels) = teams.iter().map(Team::division).collect::<Option<Vec<&str>>>() else {
            return Ok(None);
        };
        let partition = Partition::from_labels(&labels)?;
        if let Some(defect) = partition.defect(teams.len(), self.teams_per_division()?) {
            return Err(DivisionError::invalid(format!(
                "current divisions do not fit the league: {defect}"
            )));
        }
        Ok(Some(partition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "league": "Test",
        "divisions": 2,
        "teams": [
            { "name": "A", "latitude": 40.0, "longitude": -74.0, "division": "East" },
            { "name": "B", "latitude": 34.0, "longitude": -118.0, "division": "West" },
            { "name": "C", "latitude": 41.0, "longitude": -73.0, "division": "East" },
            { "name": "D", "latitude": 37.0, "longitude": -122.0, "division": "West" }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let cfg = LeagueConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(cfg.num_divisions().unwrap(), 2);
        assert_eq!(cfg.teams_per_division().unwrap(), 2);
        assert_eq!(cfg.solver, SolveOptions::default());
        let names: Vec<&str> = cfg.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);

        let current = cfg.current_partition().unwrap().unwrap();
        assert_eq!(current.divisions(), &[vec![0, 2], vec![1, 3]]);

        let dm = cfg.distance_matrix().unwrap();
        assert_eq!(dm.size(), 4);
        assert!(dm.get(0, 2) < dm.get(0, 1));
    }

    #[test]
    fn test_preset_fallback() {
        let json = SAMPLE.replace("\"divisions\": 2,", "").replace("Test", "NHL");
        let cfg = LeagueConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.num_divisions().unwrap(), 4);
        assert_eq!(cfg.teams_per_division().unwrap(), 1);
    }

    #[test]
    fn test_missing_division_count() {
        let json = SAMPLE.replace("\"divisions\": 2,", "");
        assert!(matches!(
            LeagueConfig::from_json_str(&json),
            Err(DivisionError::Config(_))
        ));
    }

    #[test]
    fn test_indivisible_rejected() {
        let json = SAMPLE.replace("\"divisions\": 2", "\"divisions\": 3");
        assert!(matches!(
            LeagueConfig::from_json_str(&json),
            Err(DivisionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_coordinates_rejected() {
        let json = SAMPLE.replace("40.0", "140.0");
        assert!(LeagueConfig::from_json_str(&json).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LeagueConfig::from_json_str("{ not json"),
            Err(DivisionError::Config(_))
        ));
    }

    #[test]
    fn test_unlabelled_team_has_no_current_partition() {
        let json = SAMPLE.replacen(", \"division\": \"East\"", "", 1);
        let cfg = LeagueConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.current_partition().unwrap(), None);
    }

    #[test]
    fn test_time_limit_option() {
        let json = SAMPLE.replace(
            "\"divisions\": 2,",
            "\"divisions\": 2, \"solver\": { \"time_limit_secs\": 1.5 },",
        );
        let cfg = LeagueConfig::from_json_str(&json).unwrap();
        assert_eq!(
            cfg.solver.time_limit(),
            Some(std::time::Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_current_partition_must_match_division_count() {
        // four labels for a two-division league
        let json = SAMPLE
            .replacen("\"East\"", "\"North\"", 1)
            .replacen("\"West\"", "\"South\"", 1);
        let cfg = LeagueConfig::from_json_str(&json).unwrap();
        assert!(matches!(
            cfg.current_partition(),
            Err(DivisionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_arena_field_ignored() {
        let json = SAMPLE.replace("\"name\": \"A\",", "\"name\": \"A\", \"arena\": \"Garden\",");
        let cfg = LeagueConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.teams().unwrap()[0].name(), "A");
    }
}
