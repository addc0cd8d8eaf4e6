use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
// Nominatim rejects requests without an identifying user agent.
const USER_AGENT: &str = "intake-pipeline/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Outcome of an address lookup. Failure is recoverable: the caller keeps the
/// message (shown to the reviewer) and falls back to manual coordinate entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geocoded {
    Found {
        lat: f64,
        lng: f64,
        display_name: String,
    },
    Failed(String),
}

impl Geocoded {
    /// `(lat, lng, formatted_address_or_message)` view of the outcome.
    pub fn into_parts(self) -> (Option<f64>, Option<f64>, String) {
        match self {
            Geocoded::Found {
                lat,
                lng,
                display_name,
            } => (Some(lat), Some(lng), display_name),
            Geocoded::Failed(msg) => (None, None, msg),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Geocoded::Found { .. })
    }
}

enum LookupError {
    /// Timeout or temporary unavailability; worth one more attempt.
    Transient(String),
    /// The service rejected the request; retrying won't help.
    Service(String),
}

/// Address-to-coordinates resolver over OpenStreetMap Nominatim.
pub struct GeoResolver {
    client: reqwest::Client,
}

impl GeoResolver {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(GeoResolver { client })
    }

    /// Resolve a free-form address string. Empty input short-circuits without
    /// a network call; transient failures get one retry after a fixed delay;
    /// an empty result set is re-queried once without the delay.
    pub async fn resolve(&self, address: &str) -> Geocoded {
        if address.trim().is_empty() {
            return Geocoded::Failed("No address provided".to_string());
        }

        for attempt in 0..MAX_ATTEMPTS {
            match self.lookup(address).await {
                Ok(Some((lat, lng, display_name))) => {
                    info!("Geocoded '{}' -> ({:.6}, {:.6})", address, lat, lng);
                    return Geocoded::Found {
                        lat,
                        lng,
                        display_name,
                    };
                }
                Ok(None) => {
                    // Not found; Nominatim is occasionally flaky on the first
                    // query, so use up the remaining attempts before giving up.
                }
                Err(LookupError::Transient(e)) => {
                    warn!(
                        "Transient geocoding failure for '{}' (attempt {}/{}): {}",
                        address,
                        attempt + 1,
                        MAX_ATTEMPTS,
                        e
                    );
                    if attempt + 1 < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
                Err(LookupError::Service(e)) => {
                    return Geocoded::Failed(format!("Geocoding service error: {}", e));
                }
            }
        }

        Geocoded::Failed("Address not found".to_string())
    }

    async fn lookup(&self, address: &str) -> std::result::Result<Option<(f64, f64, String)>, LookupError> {
        let response = self
            .client
            .get(NOMINATIM_URL)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(LookupError::Transient(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(LookupError::Service(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transient(e.to_string()))?;
        parse_places(&body).map_err(LookupError::Service)
    }
}

fn classify_request_error(e: reqwest::Error) -> LookupError {
    if e.is_timeout() || e.is_connect() {
        LookupError::Transient(e.to_string())
    } else {
        LookupError::Service(e.to_string())
    }
}

// Nominatim returns coordinates as strings.
#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

/// Parse a Nominatim search response body. `Ok(None)` means a well-formed
/// empty result set ("not found"); malformed bodies are service errors.
fn parse_places(body: &str) -> std::result::Result<Option<(f64, f64, String)>, String> {
    let places: Vec<Place> =
        serde_json::from_str(body).map_err(|e| format!("unexpected response: {}", e))?;
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|_| format!("unexpected latitude: {}", place.lat))?;
    let lng = place
        .lon
        .parse::<f64>()
        .map_err(|_| format!("unexpected longitude: {}", place.lon))?;
    Ok(Some((lat, lng, place.display_name)))
}
