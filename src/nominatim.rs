//! Nominatim HTTP geocoder.

use std::time::Duration;

use serde_json::Value;

use crate::error::{Service, TripError};
use crate::haversine::GeoPoint;
use crate::http::{send_for_text, DEFAULT_USER_AGENT};
use crate::numeric::optional_f64;
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_secs: 6,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NominatimConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
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
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, address: &str) -> Result<GeoPoint, TripError> {
        if address.trim().is_empty() {
            return Err(TripError::GeocodeFailed {
                query: address.to_string(),
                reason: "empty address".to_string(),
            });
        }
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let request = self
            .client
            .get(url)
            .query(&[("format", "jsonv2"), ("limit", "1"), ("q", address)]);
        let body = send_for_text(Service::Geocoding, request)?;
        parse_geocode(&body, address)
    }
}

/// Take the first search result's position. Nominatim sends `lat`/`lon` as
/// strings; numbers are accepted too.
pub fn parse_geocode(body: &str, query: &str) -> Result<GeoPoint, TripError> {
    let failed = |reason: String| TripError::GeocodeFailed {
        query: query.to_string(),
        reason,
    };

    let root: Value =
        serde_json::from_str(body).map_err(|err| failed(format!("invalid JSON: {err}")))?;
    let first = match &root {
        Value::Array(results) => results.first(),
        Value::Object(_) => Some(&root),
        _ => None,
    }
    .ok_or_else(|| failed("no result".to_string()))?;

    let lat = optional_f64(first, "lat").map_err(|err| failed(err.to_string()))?;
    let lon = optional_f64(first, "lon").map_err(|err| failed(err.to_string()))?;
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(GeoPoint::new(lat, lon)),
        _ => Err(failed("result has no position".to_string())),
    }
}
