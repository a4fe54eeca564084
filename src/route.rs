//! Routes and the routing-engine response parser.
//!
//! Payloads follow the OSRM `route` service shape with GeoJSON geometry and
//! per-edge duration annotations:
//!
//! ```json
//! {"code": "Ok", "routes": [{
//!     "distance": 1234.5, "duration": 456.7,
//!     "geometry": {"type": "LineString", "coordinates": [[-77.0, 38.9], [-77.01, 38.91]]},
//!     "legs": [{"annotation": {"duration": [456.7]}}]
//! }]}
//! ```
//!
//! Only the first route is used. Its summary figures, geometry and the first
//! leg's annotation are all read from that same route record.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Service, TripError};
use crate::haversine::GeoPoint;
use crate::numeric::{coerce_f64, optional_f64};
use crate::polyline::Polyline;

/// A parsed driving route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    distance_m: f64,
    duration_s: f64,
    geometry: Polyline,
    segment_durations_s: Vec<f64>,
}

impl Route {
    /// Builds a route; `segment_durations_s` is fitted to the geometry
    /// (truncated when long, zero-padded when short, left empty when empty).
    /// Negative or non-finite durations count as zero.
    pub fn new(
        distance_m: f64,
        duration_s: f64,
        coordinates: Vec<GeoPoint>,
        segment_durations_s: Vec<f64>,
    ) -> Self {
        let segments = coordinates.len().saturating_sub(1);
        let segment_durations_s = fit_segments(segment_durations_s, segments);
        Self {
            distance_m,
            duration_s,
            geometry: Polyline::new(coordinates),
            segment_durations_s,
        }
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Route points in `(lat, lon)` order, first = start.
    pub fn coordinates(&self) -> &[GeoPoint] {
        self.geometry.points()
    }

    /// Per-segment durations; empty when the engine sent no annotation.
    pub fn segment_durations_s(&self) -> &[f64] {
        &self.segment_durations_s
    }

    /// Elapsed seconds at each coordinate index. Same length as
    /// [`Route::coordinates`], starts at zero, and is all zeros when segment
    /// durations are unavailable.
    pub fn cumulative_seconds(&self) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(self.coordinates().len());
        let mut elapsed = 0.0;
        for i in 0..self.coordinates().len() {
            if i > 0 {
                elapsed += self.segment_durations_s.get(i - 1).copied().unwrap_or(0.0);
            }
            cumulative.push(elapsed);
        }
        cumulative
    }
}

fn fit_segments(mut durations: Vec<f64>, segments: usize) -> Vec<f64> {
    if durations.is_empty() {
        return durations;
    }
    durations.resize(segments, 0.0);
    for duration in &mut durations {
        if !(duration.is_finite() && *duration >= 0.0) {
            *duration = 0.0;
        }
    }
    durations
}

/// Parse a routing-engine response body into a [`Route`].
pub fn parse_route(body: &str) -> Result<Route, TripError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|err| TripError::malformed(Service::Routing, format!("invalid JSON: {err}")))?;
    if !root.is_object() {
        return Err(TripError::malformed(Service::Routing, "payload is not an object"));
    }

    if let Some(code) = root.get("code").and_then(Value::as_str) {
        if code != "Ok" {
            let message = root.get("message").and_then(Value::as_str).unwrap_or_default();
            return Err(TripError::malformed(
                Service::Routing,
                format!("engine returned {code}: {message}"),
            ));
        }
    }

    let record = select_route_record(&root)?;

    let distance_m = required_non_negative(record, "distance")?;
    let duration_s = required_non_negative(record, "duration")?;
    let coordinates = parse_coordinates(record)?;
    let segments = parse_first_leg_durations(record)?;

    debug!(
        points = coordinates.len(),
        annotated_segments = segments.len(),
        distance_m,
        duration_s,
        "parsed route"
    );

    Ok(Route::new(distance_m, duration_s, coordinates, segments))
}

fn select_route_record(root: &Value) -> Result<&Value, TripError> {
    match root.get("routes") {
        None | Some(Value::Null) => Ok(root),
        Some(Value::Array(routes)) => match routes.first() {
            Some(route) if route.is_object() => Ok(route),
            Some(_) => Err(TripError::malformed(Service::Routing, "first route is not an object")),
            None => Err(TripError::malformed(Service::Routing, "routes array is empty")),
        },
        Some(_) => Err(TripError::malformed(Service::Routing, "routes is not an array")),
    }
}

fn required_non_negative(record: &Value, key: &str) -> Result<f64, TripError> {
    let value = optional_f64(record, key)?
        .ok_or_else(|| TripError::malformed(Service::Routing, format!("missing {key}")))?;
    if value < 0.0 {
        return Err(TripError::malformed(
            Service::Routing,
            format!("negative {key}: {value}"),
        ));
    }
    Ok(value)
}

fn parse_coordinates(record: &Value) -> Result<Vec<GeoPoint>, TripError> {
    let geometry = record
        .get("geometry")
        .ok_or_else(|| TripError::malformed(Service::Routing, "missing geometry"))?;
    if geometry.is_string() {
        return Err(TripError::malformed(
            Service::Routing,
            "encoded polyline geometry is not supported, request geojson",
        ));
    }

    let pairs = match geometry.get("coordinates") {
        Some(Value::Array(pairs)) => pairs,
        Some(_) => {
            return Err(TripError::malformed(Service::Routing, "coordinates is not an array"));
        }
        None => return Err(TripError::malformed(Service::Routing, "missing coordinates")),
    };
    if pairs.is_empty() {
        return Err(TripError::malformed(Service::Routing, "no coordinate pairs found"));
    }

    pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| match pair.as_array().map(Vec::as_slice) {
            Some([lon, lat, ..]) => Ok(GeoPoint::new(
                coerce_f64(lat, "coordinates.lat")?,
                coerce_f64(lon, "coordinates.lon")?,
            )),
            _ => Err(TripError::malformed(
                Service::Routing,
                format!("coordinate {i} is not a [lon, lat] pair"),
            )),
        })
        .collect()
}

fn parse_first_leg_durations(record: &Value) -> Result<Vec<f64>, TripError> {
    let durations = record
        .get("legs")
        .and_then(|legs| legs.get(0))
        .and_then(|leg| leg.get("annotation"))
        .and_then(|annotation| annotation.get("duration"));

    let values = match durations {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(values)) => values,
        Some(_) => {
            return Err(TripError::malformed(
                Service::Routing,
                "annotation.duration is not an array",
            ));
        }
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let seconds = coerce_f64(value, "annotation.duration")?;
            if seconds < 0.0 {
                return Err(TripError::malformed(
                    Service::Routing,
                    format!("negative segment duration at {i}: {seconds}"),
                ));
            }
            Ok(seconds)
        })
        .collect()
}
