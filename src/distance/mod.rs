//! Distance matrices between team home locations.
//!
//! Provides a dense distance matrix plus great-circle construction from
//! geographic coordinates.

mod geo;
mod matrix;

pub use geo::{GeoPoint, EARTH_RADIUS_KM};
pub use matrix::DistanceMatrix;
