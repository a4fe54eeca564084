//! Collaborator seams for the trip planner.
//!
//! The planner owns no transport. Routing and POI providers hand back raw
//! response bodies; parsing stays in the core so every provider gets the same
//! validation. Implement these for HTTP clients, fixtures, or caches.

use crate::error::TripError;
use crate::haversine::GeoPoint;

/// Resolves free-text addresses to points.
pub trait Geocoder {
    /// Fails with [`TripError::GeocodeFailed`] when the address has no match.
    fn geocode(&self, address: &str) -> Result<GeoPoint, TripError>;
}

/// Computes driving routes through ordered waypoints.
pub trait RouteProvider {
    /// `waypoints` holds at least two points; the body is handed to
    /// [`crate::route::parse_route`].
    fn route(&self, waypoints: &[GeoPoint]) -> Result<String, TripError>;
}

/// Searches for points of interest around a location.
pub trait PoiSearch {
    /// The body is handed to [`crate::poi::parse_pois`].
    fn search(&self, center: GeoPoint, radius_m: u32, limit: usize) -> Result<String, TripError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<GeoPoint, TripError> {
        (**self).geocode(address)
    }
}

impl<T: RouteProvider + ?Sized> RouteProvider for &T {
    fn route(&self, waypoints: &[GeoPoint]) -> Result<String, TripError> {
        (**self).route(waypoints)
    }
}

impl<T: PoiSearch + ?Sized> PoiSearch for &T {
    fn search(&self, center: GeoPoint, radius_m: u32, limit: usize) -> Result<String, TripError> {
        (**self).search(center, radius_m, limit)
    }
}

/// Ensure a waypoint list is routable.
pub fn check_waypoints(waypoints: &[GeoPoint]) -> Result<(), TripError> {
    if waypoints.len() < 2 {
        return Err(TripError::InvalidRequest(format!(
            "need at least 2 waypoints, got {}",
            waypoints.len()
        )));
    }
    Ok(())
}
