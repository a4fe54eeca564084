//! Shared blocking request plumbing for the HTTP collaborators.

use reqwest::blocking::RequestBuilder;
use tracing::debug;

use crate::error::{Service, TripError};

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "trip-planner/0.1";

/// Send `request` and return the body of a 2xx response as text.
pub(crate) fn send_for_text(service: Service, request: RequestBuilder) -> Result<String, TripError> {
    let response = request
        .send()
        .and_then(|resp| resp.error_for_status())
        .map_err(|err| convert_reqwest_error(service, &err))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|err| convert_reqwest_error(service, &err))?;
    debug!(%service, status = status.as_u16(), bytes = body.len(), "response received");
    Ok(body)
}

fn convert_reqwest_error(service: Service, error: &reqwest::Error) -> TripError {
    let message = if error.is_timeout() {
        format!("timed out: {error}")
    } else if let Some(status) = error.status() {
        format!("HTTP {}", status.as_u16())
    } else {
        error.to_string()
    };
    TripError::transport(service, message)
}
