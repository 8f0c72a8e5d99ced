//! Geographic coordinates and great-circle distance.

use serde::Serialize;

use crate::error::{DivisionError, Result};

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A point on the Earth's surface in decimal degrees.
///
/// # Examples
///
/// ```
/// use u_divisions::distance::GeoPoint;
///
/// let msg = GeoPoint::new(40.7505, -73.9934).unwrap();
/// let td = GeoPoint::new(42.3662, -71.0621).unwrap();
/// let km = msg.great_circle_km(&td);
/// assert!((km - 302.9).abs() < 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DivisionError::invalid(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DivisionError::invalid(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine great-circle distance to `other`, in kilometres.
    pub fn great_circle_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        // clamp guards against a > 1 from rounding on antipodal points
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_zero_distance_to_self() {
        let p = GeoPoint::new(45.5, -73.6).unwrap();
        assert_eq!(p.great_circle_km(&p), 0.0);
    }

    #[test]
    fn test_quarter_meridian() {
        let equator = GeoPoint::new(0.0, 0.0).unwrap();
        let pole = GeoPoint::new(90.0, 0.0).unwrap();
        let expected = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM;
        assert!((equator.great_circle_km(&pole) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(34.043, -118.267).unwrap();
        let b = GeoPoint::new(47.622, -122.354).unwrap();
        assert!((a.great_circle_km(&b) - b.great_circle_km(&a)).abs() < 1e-9);
    }
}
