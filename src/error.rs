//! Error taxonomy shared by the parsers, collaborators and the trip planner.

use std::fmt;

use thiserror::Error;

/// External collaborator a failure or response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Geocoding,
    Routing,
    PoiSearch,
}

impl Service {
    /// Short machine-friendly name, used for log fields and dump file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Geocoding => "geocoding",
            Service::Routing => "routing",
            Service::PoiSearch => "poi-search",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TripError {
    /// The destination address could not be resolved to a point.
    #[error("could not resolve {query:?}: {reason}")]
    GeocodeFailed { query: String, reason: String },

    /// Non-2xx status, timeout or network fault talking to a collaborator.
    #[error("{service} request failed: {message}")]
    TransportFailed { service: Service, message: String },

    /// Payload is missing required structure.
    #[error("malformed {service} response: {reason}")]
    MalformedResponse { service: Service, reason: String },

    /// A numeric token could not be coerced even after cleaning.
    #[error("malformed number {token:?} in field {field}")]
    MalformedNumber { field: String, token: String },

    /// Caller supplied arguments the operation cannot work with.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TripError {
    pub(crate) fn malformed(service: Service, reason: impl Into<String>) -> Self {
        TripError::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(service: Service, message: impl Into<String>) -> Self {
        TripError::TransportFailed {
            service,
            message: message.into(),
        }
    }

    /// Service this error is attributed to, if any.
    pub fn service(&self) -> Option<Service> {
        match self {
            TripError::GeocodeFailed { .. } => Some(Service::Geocoding),
            TripError::TransportFailed { service, .. } => Some(*service),
            TripError::MalformedResponse { service, .. } => Some(*service),
            TripError::MalformedNumber { .. } | TripError::InvalidRequest(_) => None,
        }
    }
}
