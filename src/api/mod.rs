//! Clients for the third-party APIs behind the showcase panels
//!
//! Each API family sits behind a trait so panels can be driven by fakes in
//! tests. All clients share [`HttpClient`], which maps HTTP failures onto
//! [`ErrorCode`]s and never retries: every retry is user-initiated.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use crate::models::{
    CityCandidate, Coordinates, ForecastSeries, MovieDetail, MovieListing, WeatherSample,
};
use crate::{ErrorCode, Result, ShowcaseError};

pub mod coingecko;
pub mod nominatim;
pub mod openweather;
pub mod tmdb;

pub use coingecko::{CoinGeckoClient, PriceEntry};
pub use nominatim::{NominatimClient, PlaceLabels};
pub use openweather::OpenWeatherClient;
pub use tmdb::TmdbClient;

const USER_AGENT: &str = concat!("showcase/", env!("CARGO_PKG_VERSION"));

static SECRET_PARAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(appid|api_key)=[^&]*").expect("static regex"));

/// Current weather, forecasts and city search
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at the candidate's coordinates. The candidate's
    /// name and country label the sample when present.
    async fn current(&self, city: &CityCandidate) -> Result<WeatherSample>;
    async fn forecast(&self, coordinates: Coordinates) -> Result<ForecastSeries>;
    async fn search_cities(&self, query: &str, limit: u32) -> Result<Vec<CityCandidate>>;
}

/// Coordinates to place labels
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<PlaceLabels>;
}

/// Asset prices and USD exchange rates
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    async fn prices(&self, ids: &[String]) -> Result<HashMap<String, PriceEntry>>;
    /// How many units of `currency` one USD buys
    async fn usd_rate(&self, currency: &str) -> Result<f64>;
}

/// Movie catalog listings and details
#[async_trait]
pub trait MovieProvider: Send + Sync {
    async fn popular(&self) -> Result<MovieListing>;
    async fn search(&self, query: &str) -> Result<MovieListing>;
    async fn detail(&self, id: u64) -> Result<MovieDetail>;
}

/// Hide credentials in URLs before they reach the logs
#[must_use]
pub fn redact_url(url: &str) -> String {
    SECRET_PARAMS
        .replace_all(url, "$1=API_KEY_HIDDEN")
        .into_owned()
}

pub(crate) fn require_key<'a>(service: &str, key: Option<&'a str>) -> Result<&'a str> {
    key.filter(|k| !k.is_empty()).ok_or_else(|| {
        ShowcaseError::config(format!("{service} API key is not configured"))
    })
}

/// Thin JSON-over-GET wrapper shared by all API clients
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    service: &'static str,
}

impl HttpClient {
    pub fn new(service: &'static str, timeout_seconds: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ShowcaseError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, service })
    }

    /// GET `url` and decode the body as JSON
    #[instrument(skip(self, url), fields(service = self.service, url = %redact_url(url)))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let start_time = Instant::now();
        debug!("Sending request");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Network error after {:.3}s: {}", start_time.elapsed().as_secs_f64(), e);
            ShowcaseError::api_with_context(
                format!("{} request failed: {e}", self.service),
                ErrorCode::ApiNetworkError,
                HashMap::from([("error".to_string(), e.to_string())]),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = match status.as_u16() {
                401 => ErrorCode::ApiUnauthorized,
                404 => ErrorCode::ApiNotFound,
                429 => ErrorCode::ApiRateLimit,
                _ => ErrorCode::ApiNetworkError,
            };
            warn!("{} API error {}: {}", self.service, status, body);
            return Err(ShowcaseError::api_with_context(
                format!("{} API error: {}", self.service, status.as_u16()),
                code,
                HashMap::from([
                    ("status_code".to_string(), status.as_u16().to_string()),
                    ("body".to_string(), body.chars().take(200).collect()),
                ]),
            ));
        }

        let parse_start = Instant::now();
        let parsed = response.json::<T>().await.map_err(|e| {
            error!("Failed to parse {} response: {}", self.service, e);
            ShowcaseError::api_with_context(
                format!("Invalid data received from {} API", self.service),
                ErrorCode::ApiInvalidResponse,
                HashMap::from([("error".to_string(), e.to_string())]),
            )
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "{} request succeeded in {:.3}s (parse: {:.3}s)",
            self.service,
            total_duration.as_secs_f64(),
            parse_start.elapsed().as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(parsed)
    }
}
