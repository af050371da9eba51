use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use super::{HttpClient, ReverseGeocoder};
use crate::Result;
use crate::config::GeocodingConfig;
use crate::models::location::{UNKNOWN_CITY, UNKNOWN_COUNTRY};

/// Place labels for a coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceLabels {
    pub city: String,
    pub country: String,
    pub state: Option<String>,
}

impl Default for PlaceLabels {
    fn default() -> Self {
        Self {
            city: UNKNOWN_CITY.to_string(),
            country: UNKNOWN_COUNTRY.to_string(),
            state: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
    state: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Address,
}

impl From<Address> for PlaceLabels {
    fn from(address: Address) -> Self {
        Self {
            city: address
                .city
                .or(address.town)
                .or(address.village)
                .unwrap_or_else(|| UNKNOWN_CITY.to_string()),
            country: address
                .country
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            state: address.state.or(address.region),
        }
    }
}

/// Nominatim-style reverse geocoder
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: HttpClient,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("Geocoding", config.timeout_seconds)?,
            base_url: config.reverse_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    #[instrument(skip(self))]
    async fn reverse(&self, lat: f64, lon: f64) -> Result<PlaceLabels> {
        let url = format!(
            "{}/reverse?format=json&lat={lat}&lon={lon}&zoom=10&addressdetails=1",
            self.base_url
        );
        let response: ReverseResponse = self.http.get_json(&url).await?;
        Ok(response.address.into())
    }
}
