//! Test fixtures for trip-planner.
//!
//! Provides:
//! - payload builders producing OSRM- and Overpass-shaped bodies
//! - stub geocoding, routing and POI collaborators that record their calls

#![allow(dead_code)]

use std::sync::Mutex;

use serde_json::json;

use trip_planner::error::{Service, TripError};
use trip_planner::haversine::GeoPoint;
use trip_planner::traits::{Geocoder, PoiSearch, RouteProvider};

// ============================================================================
// Locations
// ============================================================================

pub const LA_PLATA: GeoPoint = GeoPoint::new(38.53, -76.98);
pub const DC_ZOO: GeoPoint = GeoPoint::new(38.9296, -77.0497);

// ============================================================================
// Payload builders
// ============================================================================

/// OSRM route body with `points` evenly spaced along a parallel and every
/// segment taking `segment_s` seconds.
pub fn straight_route_body(start: GeoPoint, points: usize, segment_s: f64) -> String {
    let coordinates: Vec<[f64; 2]> = (0..points)
        .map(|i| [start.lon + i as f64 * 0.1, start.lat])
        .collect();
    let durations = vec![segment_s; points.saturating_sub(1)];
    let duration = segment_s * durations.len() as f64;
    json!({
        "code": "Ok",
        "routes": [{
            "distance": duration * 25.0,
            "duration": duration,
            "geometry": {"type": "LineString", "coordinates": coordinates},
            "legs": [{"annotation": {"duration": durations}}]
        }],
        "waypoints": []
    })
    .to_string()
}

/// OSRM route body whose geometry runs through `waypoints` exactly.
pub fn via_route_body(waypoints: &[GeoPoint], distance_m: f64, duration_s: f64) -> String {
    let coordinates: Vec<[f64; 2]> = waypoints.iter().map(|p| [p.lon, p.lat]).collect();
    json!({
        "code": "Ok",
        "routes": [{
            "distance": distance_m,
            "duration": duration_s,
            "geometry": {"type": "LineString", "coordinates": coordinates},
            "legs": []
        }]
    })
    .to_string()
}

/// Overpass body with one amenity node per `(name, amenity, point)`.
pub fn overpass_body(nodes: &[(&str, &str, GeoPoint)]) -> String {
    let elements: Vec<_> = nodes
        .iter()
        .enumerate()
        .map(|(i, (name, amenity, point))| {
            json!({
                "type": "node",
                "id": i + 1,
                "lat": point.lat,
                "lon": point.lon,
                "tags": {"name": name, "amenity": amenity}
            })
        })
        .collect();
    json!({"version": 0.6, "elements": elements}).to_string()
}

pub fn empty_overpass_body() -> String {
    overpass_body(&[])
}

pub fn transport_error(service: Service) -> TripError {
    TripError::TransportFailed {
        service,
        message: "connection refused".to_string(),
    }
}

// ============================================================================
// Stub collaborators
// ============================================================================

/// Resolves a fixed set of addresses by substring match.
pub struct StubGeocoder {
    known: Vec<(&'static str, GeoPoint)>,
    pub calls: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn new(known: Vec<(&'static str, GeoPoint)>) -> Self {
        Self {
            known,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, address: &str) -> Result<GeoPoint, TripError> {
        self.calls.lock().unwrap().push(address.to_string());
        let lowered = address.to_lowercase();
        self.known
            .iter()
            .find(|(needle, _)| lowered.contains(needle))
            .map(|(_, point)| *point)
            .ok_or_else(|| TripError::GeocodeFailed {
                query: address.to_string(),
                reason: "no result".to_string(),
            })
    }
}

type RouteResponder = Box<dyn Fn(&[GeoPoint]) -> Result<String, TripError> + Send + Sync>;

/// Routing stub answering through a closure and recording each waypoint list.
pub struct StubRouter {
    respond: RouteResponder,
    pub calls: Mutex<Vec<Vec<GeoPoint>>>,
}

impl StubRouter {
    pub fn new(respond: impl Fn(&[GeoPoint]) -> Result<String, TripError> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Serves `base` for two-point requests and a geometry through the
    /// requested waypoints for via requests.
    pub fn with_base(base: String) -> Self {
        Self::new(move |waypoints| {
            if waypoints.len() == 2 {
                Ok(base.clone())
            } else {
                Ok(via_route_body(waypoints, 999_000.0, 40_000.0))
            }
        })
    }

    pub fn calls(&self) -> Vec<Vec<GeoPoint>> {
        self.calls.lock().unwrap().clone()
    }
}

impl RouteProvider for StubRouter {
    fn route(&self, waypoints: &[GeoPoint]) -> Result<String, TripError> {
        self.calls.lock().unwrap().push(waypoints.to_vec());
        (self.respond)(waypoints)
    }
}

type PoiResponder = Box<dyn Fn(GeoPoint, u32) -> Result<String, TripError> + Send + Sync>;

/// POI stub answering through a closure and recording `(center, radius)`.
pub struct StubPoiSearch {
    respond: PoiResponder,
    pub calls: Mutex<Vec<(GeoPoint, u32)>>,
}

impl StubPoiSearch {
    pub fn new(respond: impl Fn(GeoPoint, u32) -> Result<String, TripError> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(|_, _| Ok(empty_overpass_body()))
    }

    pub fn radii(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(_, r)| *r).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl PoiSearch for StubPoiSearch {
    fn search(&self, center: GeoPoint, radius_m: u32, _limit: usize) -> Result<String, TripError> {
        self.calls.lock().unwrap().push((center, radius_m));
        (self.respond)(center, radius_m)
    }
}
