/// HTTP client for the external geocoding/places provider.
///
/// The provider speaks a Google-Maps-style web service API: a geocoding
/// endpoint that turns a free-text address into a coordinate, and a nearby
/// search endpoint that ranks places around a coordinate. Both wrap their
/// payload in an envelope carrying a `status` string; anything other than
/// `OK`/`ZERO_RESULTS` is surfaced as an opaque provider error.
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Clone, Debug)]
pub struct PlacesClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub default_timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
}

impl PlacesClientConfig {
    /// Build from environment. `PLACES_API_KEY` is the caller's problem to
    /// validate; everything else has a default.
    pub fn from_env(api_key: String) -> Self {
        let base_url = std::env::var("PLACES_BASE_URL")
            .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api".to_string());

        let default_timeout = std::env::var("PLACES_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        let max_retries = std::env::var("PLACES_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(3);

        let initial_backoff = std::env::var("PLACES_RETRY_INITIAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(200));

        let max_backoff = std::env::var("PLACES_RETRY_MAX_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(5_000));

        let max_error_body_bytes = std::env::var("PLACES_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            default_timeout,
            max_retries,
            initial_backoff,
            max_backoff,
            max_error_body_bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlacesClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("provider returned status {provider_status}: {message}")]
    Provider {
        provider_status: String,
        message: String,
    },

    #[error("provider returned error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

/// A latitude/longitude pair as the provider reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Result of geocoding a free-text address.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Geocoded {
    pub formatted_address: String,
    pub location: Coordinate,
}

/// One nearby place from the ranked search results.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NearbyPlace {
    pub name: String,
    /// Short human-readable address. The provider fills `vicinity` for nearby
    /// searches and `formatted_address` for text searches; whichever is
    /// present wins.
    pub address: Option<String>,
    pub location: Coordinate,
}

#[derive(Clone)]
pub struct PlacesClient {
    config: PlacesClientConfig,
    http: reqwest::Client,
}

impl PlacesClient {
    pub fn new(config: PlacesClientConfig) -> Result<Self, PlacesClientError> {
        let http = reqwest::Client::builder()
            .user_agent("waste-sort-mcp/waste-guide")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &PlacesClientConfig {
        &self.config
    }

    /// Geocode a free-text address to a coordinate. The first (best) result
    /// wins; `ZERO_RESULTS` maps to `None`.
    pub async fn geocode(&self, address: &str) -> Result<Option<Geocoded>, PlacesClientError> {
        let url = format!("{}/geocode/json", self.config.base_url);
        let envelope: GeocodeEnvelope = self
            .request_with_retry(|| async {
                let resp = self
                    .http
                    .get(&url)
                    .timeout(self.config.default_timeout)
                    .query(&[("address", address), ("key", self.config.api_key.as_str())])
                    .send()
                    .await?;
                Self::parse_json_response(resp, self.config.max_error_body_bytes).await
            })
            .await?;

        let results = check_provider_status(envelope.status, envelope.error_message, envelope.results)?;
        Ok(results.into_iter().next().map(|r| Geocoded {
            formatted_address: r.formatted_address,
            location: r.geometry.location,
        }))
    }

    /// Rank places matching `keyword` within `radius_meters` of `center`.
    /// An empty vec means the provider found nothing, not a failure.
    pub async fn nearby_search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<Vec<NearbyPlace>, PlacesClientError> {
        let url = format!("{}/place/nearbysearch/json", self.config.base_url);
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_meters.to_string();
        let envelope: NearbyEnvelope = self
            .request_with_retry(|| async {
                let resp = self
                    .http
                    .get(&url)
                    .timeout(self.config.default_timeout)
                    .query(&[
                        ("location", location.as_str()),
                        ("radius", radius.as_str()),
                        ("keyword", keyword),
                        ("key", self.config.api_key.as_str()),
                    ])
                    .send()
                    .await?;
                Self::parse_json_response(resp, self.config.max_error_body_bytes).await
            })
            .await?;

        let results = check_provider_status(envelope.status, envelope.error_message, envelope.results)?;
        Ok(results.into_iter().map(NearbyPlace::from).collect())
    }

    async fn parse_json_response<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> Result<T, PlacesClientError> {
        if resp.status().is_success() {
            let body = resp.text().await?;
            return decode_body(&body);
        }
        let status = resp.status();
        let body = read_limited_text(resp, max_error_body_bytes).await;
        Err(PlacesClientError::UpstreamBody { status, body })
    }

    async fn request_with_retry<T, Fut, F>(&self, mut f: F) -> Result<T, PlacesClientError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PlacesClientError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    if attempt > self.config.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    let delay = backoff_delay(
                        self.config.initial_backoff,
                        self.config.max_backoff,
                        attempt - 1,
                    );
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "places request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Decode a successful body. A malformed payload is `InvalidJson`, which is
/// never retried.
fn decode_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, PlacesClientError> {
    Ok(serde_json::from_str(body)?)
}

/// Map the provider's envelope status to results or an opaque error.
/// `ZERO_RESULTS` is an empty answer, not a fault.
fn check_provider_status<T>(
    status: String,
    error_message: Option<String>,
    results: Vec<T>,
) -> Result<Vec<T>, PlacesClientError> {
    match status.as_str() {
        STATUS_OK => Ok(results),
        STATUS_ZERO_RESULTS => Ok(Vec::new()),
        _ => Err(PlacesClientError::Provider {
            provider_status: status,
            message: error_message.unwrap_or_else(|| "no detail from provider".to_string()),
        }),
    }
}

fn should_retry(err: &PlacesClientError) -> bool {
    match err {
        PlacesClientError::Request(e) => {
            e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() || e.is_decode()
        }
        PlacesClientError::UpstreamBody { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        PlacesClientError::Provider { provider_status, .. } => {
            // OVER_QUERY_LIMIT is the only envelope status worth another try.
            provider_status == "OVER_QUERY_LIMIT"
        }
        PlacesClientError::InvalidJson(_) => false,
    }
}

fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let mult = 1u128.checked_shl(exponent).unwrap_or(u128::MAX);
    let base_ms = initial.as_millis().saturating_mul(mult);
    let capped_ms = std::cmp::min(base_ms, max.as_millis()) as u64;
    let jitter_cap = std::cmp::max(1, capped_ms / 4);
    let jitter_ms = pseudo_jitter_ms(jitter_cap);
    Duration::from_millis(capped_ms.saturating_add(jitter_ms))
}

fn pseudo_jitter_ms(max_inclusive: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0));
    let nanos = now.subsec_nanos() as u64;
    nanos % (max_inclusive + 1)
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct GeocodeEnvelope {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct NearbyEnvelope {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<NearbyCandidate>,
}

#[derive(Debug, Deserialize)]
struct NearbyCandidate {
    name: String,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinate,
}

impl From<NearbyCandidate> for NearbyPlace {
    fn from(c: NearbyCandidate) -> Self {
        NearbyPlace {
            name: c.name,
            address: c.vicinity.or(c.formatted_address),
            location: c.geometry.location,
        }
    }
}
