//! Haversine distance evaluator.

use nearby_entity::GeoPoint;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two coordinates in degrees.
///
/// Inputs are used as given; validating them is the caller's job.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two validated points.
pub fn distance_between(a: GeoPoint, b: GeoPoint) -> f64 {
    distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAO_PAULO: (f64, f64) = (-23.5505, -46.6333);
    const RIO: (f64, f64) = (-22.9068, -43.1729);

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(distance_km(SAO_PAULO.0, SAO_PAULO.1, SAO_PAULO.0, SAO_PAULO.1), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (SAO_PAULO, RIO),
            ((0.0, 0.0), (45.0, 90.0)),
            ((89.9, -179.9), (-89.9, 179.9)),
            ((-23.56, -46.64), (-23.5505, -46.6333)),
        ];
        for (a, b) in pairs {
            let ab = distance_km(a.0, a.1, b.0, b.1);
            let ba = distance_km(b.0, b.1, a.0, a.1);
            assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
        }
    }

    #[test]
    fn test_sao_paulo_to_rio() {
        let d = distance_km(SAO_PAULO.0, SAO_PAULO.1, RIO.0, RIO.1);
        assert!((355.0..365.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_short_hop_within_sao_paulo() {
        let d = distance_km(SAO_PAULO.0, SAO_PAULO.1, -23.5600, -46.6400);
        assert!((1.2..1.35).contains(&d), "got {d}");
    }

    #[test]
    fn test_quarter_meridian() {
        let d = distance_km(0.0, 0.0, 90.0, 0.0);
        let expected = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM;
        assert!((d - expected).abs() < 1e-6);
    }
}
