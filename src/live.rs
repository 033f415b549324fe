//! Live flight lookup against the AviationStack `/v1/flights` endpoint.
//!
//! The API is treated as an opaque collaborator: origin and destination are
//! forwarded as `dep_iata` / `arr_iata`, and the nested listing objects are
//! flattened into [`LiveFlight`] rows. No retries.

use crate::config;
use crate::error::{AirlineDemandError, Result};
use crate::models::{normalize_code, FlightListing, LiveFlight};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Blocking client for live flight listings.
///
/// Constructed without an API key it stays usable but every lookup fails
/// with [`AirlineDemandError::MissingApiKey`]; check
/// [`is_enabled`](Self::is_enabled) to hide the feature instead.
pub struct LiveFlightClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl LiveFlightClient {
    pub fn new(api_key: Option<String>, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.unwrap_or_else(|| config::AVIATIONSTACK_FLIGHTS_URL.to_string()),
            client,
        })
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch up to `limit` live flights from `origin` to `destination`.
    pub fn lookup(&self, origin: &str, destination: &str, limit: usize) -> Result<FlightListing> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(AirlineDemandError::MissingApiKey)?;

        let origin = normalize_code(origin);
        let destination = normalize_code(destination);
        if origin.is_empty() || destination.is_empty() {
            return Err(AirlineDemandError::InvalidArgument(
                "origin and destination codes are required".into(),
            ));
        }

        log::info!("Fetching live flights {} -> {}", origin, destination);
        let limit = limit.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("access_key", key),
                ("dep_iata", origin.as_str()),
                ("arr_iata", destination.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| api_error_message(&v))
                .or_else(|| status.canonical_reason().map(|s| s.to_string()))
                .unwrap_or_else(|| "request failed".to_string());
            log::warn!("Flight API returned {}: {}", status, message);
            return Err(AirlineDemandError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = resp.json()?;
        parse_listing(&payload, origin, destination, status.as_u16())
    }
}

/// Turn a successful API payload into a [`FlightListing`].
///
/// The API reports some failures (bad key, quota) with a 200 status and an
/// `error` object; those become [`AirlineDemandError::Api`].
pub fn parse_listing(
    payload: &Value,
    origin: String,
    destination: String,
    status: u16,
) -> Result<FlightListing> {
    if let Some(message) = api_error_message(payload) {
        log::warn!("Flight API reported an error: {}", message);
        return Err(AirlineDemandError::Api { status, message });
    }

    let flights = payload
        .get("data")
        .and_then(|d| d.as_array())
        .map(|items| items.iter().map(flatten_flight).collect())
        .unwrap_or_default();

    let total = payload
        .pointer("/pagination/total")
        .and_then(|v| v.as_u64());

    Ok(FlightListing {
        origin,
        destination,
        flights,
        total,
    })
}

fn api_error_message(payload: &Value) -> Option<String> {
    let error = payload.get("error")?;
    if let Some(s) = error.as_str() {
        return Some(s.to_string());
    }
    let message = text_at(error, "/message");
    let code = text_at(error, "/code");
    match (code, message) {
        (Some(c), Some(m)) => Some(format!("{}: {}", c, m)),
        (None, Some(m)) => Some(m),
        (Some(c), None) => Some(c),
        (None, None) => Some(error.to_string()),
    }
}

fn flatten_flight(item: &Value) -> LiveFlight {
    LiveFlight {
        airline_name: text_at(item, "/airline/name"),
        flight_number: text_at(item, "/flight/number"),
        flight_iata: text_at(item, "/flight/iata"),
        departure_iata: text_at(item, "/departure/iata"),
        arrival_iata: text_at(item, "/arrival/iata"),
        departure_scheduled: text_at(item, "/departure/scheduled"),
        arrival_scheduled: text_at(item, "/arrival/scheduled"),
        flight_status: text_at(item, "/flight_status"),
    }
}

fn text_at(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
