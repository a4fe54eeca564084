//! Polyline representation for route geometries.
//!
//! Coordinates are stored decoded and in `(lat, lon)` order; the engine's
//! `[lon, lat]` ordering is swapped once, at parse time.

use serde::{Deserialize, Serialize};

use crate::haversine::GeoPoint;

/// A route geometry as an ordered sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }
}
