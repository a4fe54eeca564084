//! Stop candidates and the POI-search response parser.
//!
//! Payloads follow the Overpass JSON output format:
//!
//! ```json
//! {"elements": [
//!     {"type": "node", "id": 1, "lat": 38.9, "lon": -77.0,
//!      "tags": {"name": "Sheetz", "amenity": "fuel"}}
//! ]}
//! ```
//!
//! Individual records are never fatal: a node without usable coordinates is
//! skipped, a node without a name or category gets a placeholder.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Service, TripError};
use crate::haversine::GeoPoint;
use crate::numeric::optional_f64;

pub const PLACEHOLDER_NAME: &str = "Stop";
pub const PLACEHOLDER_CATEGORY: &str = "amenity";

/// A nearby point of interest that could serve as a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopCandidate {
    pub name: String,
    pub category: String,
    pub location: GeoPoint,
}

impl StopCandidate {
    /// Display label, e.g. `"Sheetz (fuel)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.category)
    }
}

/// Parse a POI-search response body into candidates, in payload order.
pub fn parse_pois(body: &str) -> Result<Vec<StopCandidate>, TripError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|err| TripError::malformed(Service::PoiSearch, format!("invalid JSON: {err}")))?;
    if !root.is_object() {
        return Err(TripError::malformed(Service::PoiSearch, "payload is not an object"));
    }

    let Some(elements) = root.get("elements").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut candidates = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        if element.get("type").and_then(Value::as_str) != Some("node") {
            continue;
        }
        match parse_node(element) {
            Ok(Some(candidate)) => candidates.push(candidate),
            Ok(None) => debug!(element = i, "skipping node without coordinates"),
            Err(err) => debug!(element = i, error = %err, "skipping node with malformed coordinates"),
        }
    }

    debug!(
        elements = elements.len(),
        candidates = candidates.len(),
        "parsed POI response"
    );
    Ok(candidates)
}

fn parse_node(node: &Value) -> Result<Option<StopCandidate>, TripError> {
    let (Some(lat), Some(lon)) = (optional_f64(node, "lat")?, optional_f64(node, "lon")?) else {
        return Ok(None);
    };

    let tags = node.get("tags");
    let name = tags
        .and_then(|tags| tags.get("name"))
        .or_else(|| node.get("name"))
        .and_then(Value::as_str);
    let category = tags
        .and_then(|tags| tags.get("amenity"))
        .and_then(Value::as_str);

    Ok(Some(StopCandidate {
        name: non_blank_or(name, PLACEHOLDER_NAME),
        category: non_blank_or(category, PLACEHOLDER_CATEGORY),
        location: GeoPoint::new(lat, lon),
    }))
}

fn non_blank_or(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Sort candidates by distance to `center` (stable, so equidistant records
/// keep payload order) and keep at most `limit`.
pub fn rank_by_distance(
    mut candidates: Vec<StopCandidate>,
    center: GeoPoint,
    limit: usize,
) -> Vec<StopCandidate> {
    candidates.sort_by(|a, b| {
        center
            .distance_m(&a.location)
            .total_cmp(&center.distance_m(&b.location))
    });
    candidates.truncate(limit);
    candidates
}
