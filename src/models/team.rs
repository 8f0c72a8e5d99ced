//! Team type.

use crate::distance::GeoPoint;

/// A team with its home location.
///
/// The optimization core only ever sees team indices; names and current
/// division labels are carried for reporting and baselines.
///
/// # Examples
///
/// ```
/// use u_divisions::distance::GeoPoint;
/// use u_divisions::models::Team;
///
/// let team = Team::new("Boston Celtics", GeoPoint::new(42.366, -71.062).unwrap())
///     .with_division("Atlantic");
/// assert_eq!(team.name(), "Boston Celtics");
/// assert_eq!(team.division(), Some("Atlantic"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    name: String,
    location: GeoPoint,
    division: Option<String>,
}

impl Team {
    /// Creates a team located at `location`.
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            location,
            division: None,
        }
    }

    /// Sets the team's current division label.
    pub fn with_division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }

    /// Team display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Home arena location.
    pub fn location(&self) -> GeoPoint {
        self.location
    }

    /// Current division label, if known.
    pub fn division(&self) -> Option<&str> {
        self.division.as_deref()
    }
}
