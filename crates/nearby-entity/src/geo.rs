//! Geographic coordinate value object.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// A `GeoPoint` only exists for usable coordinates: both axes finite,
/// latitude within ±90 and longitude within ±180. Anything else is
/// represented as an absent location on the owning entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, returning `None` when the pair is not usable.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let usable = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        usable.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Build a point from nullable columns; a missing axis yields `None`.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => None,
        }
    }
}
