use std::time::Duration;

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    /// API key for the external geocoding/places provider.
    pub places_api_key: String,
    /// Radius for the nearby-center search, in meters.
    pub search_radius_meters: u32,
    /// Keyword the nearby search ranks places against.
    pub center_keyword: String,
    /// Artificial delay before the mock identification answers.
    pub identify_delay: Duration,
}

impl Config {
    /// Required:
    /// - `PLACES_API_KEY`: key for the places/geocoding provider
    ///
    /// Optional:
    /// - `REDIS_URL`: Redis connection string
    /// - `SEARCH_RADIUS_METERS` (default: 5000)
    /// - `CENTER_KEYWORD` (default: "recycling center")
    /// - `IDENTIFY_DELAY_MS` (default: 1500)
    pub fn from_env() -> Result<Self, AppError> {
        let places_api_key = std::env::var("PLACES_API_KEY").map_err(|_| {
            AppError::Config("PLACES_API_KEY environment variable is required".to_string())
        })?;

        let search_radius_meters = std::env::var("SEARCH_RADIUS_METERS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5_000);

        let center_keyword = std::env::var("CENTER_KEYWORD")
            .unwrap_or_else(|_| "recycling center".to_string());

        let identify_delay = std::env::var("IDENTIFY_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(crate::identify::DEFAULT_DELAY);

        Ok(Self {
            redis_url: std::env::var("REDIS_URL").ok(),
            places_api_key,
            search_radius_meters,
            center_keyword,
            identify_delay,
        })
    }
}
