//! Great-circle geometry and the straight-line trip estimate.
//!
//! The estimate ignores roads entirely; it is the offline fallback used when
//! no routing engine is reachable.

use serde::{Deserialize, Serialize};

/// Average driving speed assumption (~55 mph) for straight-line estimates.
pub const DEFAULT_SPEED_KMH: f64 = 88.5;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other) * 1000.0
    }
}

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Straight-line distance and duration between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub start: GeoPoint,
    pub destination: GeoPoint,
    pub distance_km: f64,
    pub duration_h: f64,
}

/// Estimates trips as a straight line driven at a constant speed.
#[derive(Debug, Clone)]
pub struct StraightLineEstimate {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineEstimate {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineEstimate {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn estimate(&self, start: GeoPoint, destination: GeoPoint) -> Estimate {
        let distance_km = haversine_km(start, destination);
        Estimate {
            start,
            destination,
            distance_km,
            duration_h: distance_km / self.speed_kmh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = GeoPoint::new(38.9, -77.0);
        assert!(haversine_km(p, p) < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_short_hop() {
        // ~11 km east along the 38.9 parallel
        let km = haversine_km(GeoPoint::new(38.9, -77.03), GeoPoint::new(38.9, -76.9));
        assert!(km > 8.0 && km < 20.0, "expected ~11km, got {}", km);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Las Vegas to Los Angeles is ~370 km
        let km = haversine_km(GeoPoint::new(36.17, -115.14), GeoPoint::new(34.05, -118.24));
        assert!(km > 350.0 && km < 400.0, "LV to LA should be ~370km, got {}", km);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = GeoPoint::new(36.1, -115.1);
        let b = GeoPoint::new(36.2, -115.2);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_m_scales_km() {
        let a = GeoPoint::new(38.9, -77.0);
        let b = GeoPoint::new(38.91, -77.01);
        assert!((a.distance_m(&b) - haversine_km(a, b) * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_duration_uses_speed() {
        let estimator = StraightLineEstimate::new(100.0);
        let start = GeoPoint::new(0.0, 0.0);
        let dest = GeoPoint::new(0.0, 1.0);
        let est = estimator.estimate(start, dest);
        assert!((est.duration_h - est.distance_km / 100.0).abs() < 1e-12);
        assert_eq!(est.start, start);
        assert_eq!(est.destination, dest);
    }
}
