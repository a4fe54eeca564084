//! Overpass HTTP adapter for nearby stop candidates.

use std::time::Duration;

use crate::error::{Service, TripError};
use crate::haversine::GeoPoint;
use crate::http::{send_for_text, DEFAULT_USER_AGENT};
use crate::traits::PoiSearch;

/// Amenity tags considered useful for a driving break.
pub const DEFAULT_AMENITIES: &[&str] = &[
    "fuel",
    "restaurant",
    "fast_food",
    "cafe",
    "rest_area",
    "parking",
    "charging_station",
];

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub amenities: Vec<String>,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            amenities: DEFAULT_AMENITIES.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

impl OverpassConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    /// Overpass QL for amenity nodes within `radius_m` of `center`.
    ///
    /// The server-side cap is generous; ranking and truncation to the
    /// caller's limit happen after parsing.
    pub fn query(&self, center: GeoPoint, radius_m: u32, limit: usize) -> String {
        format!(
            "[out:json][timeout:{timeout}];\n(\n  node[\"amenity\"~\"^({tags})$\"](around:{radius_m},{lat},{lon});\n);\nout {cap};\n",
            timeout = self.config.timeout_secs,
            tags = self.config.amenities.join("|"),
            lat = center.lat,
            lon = center.lon,
            cap = limit.max(50),
        )
    }
}

impl PoiSearch for OverpassClient {
    fn search(&self, center: GeoPoint, radius_m: u32, limit: usize) -> Result<String, TripError> {
        let query = self.query(center, radius_m, limit);
        tracing::debug!(lat = center.lat, lon = center.lon, radius_m, "searching POIs");
        let request = self
            .client
            .post(&self.config.endpoint)
            .form(&[("data", query.as_str())]);
        send_for_text(Service::PoiSearch, request)
    }
}
