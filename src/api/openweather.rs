use async_trait::async_trait;
use chrono::FixedOffset;
use tracing::instrument;

use super::{HttpClient, WeatherProvider, require_key};
use crate::config::WeatherConfig;
use crate::models::{CityCandidate, Coordinates, ForecastSeries, WeatherSample};
use crate::{Result, ShowcaseError};

/// OpenWeatherMap client for current conditions, forecasts and city search
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: HttpClient,
    api_key: Option<String>,
    current_url: String,
    forecast_url: String,
    geo_url: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("Weather", config.timeout_seconds)?,
            api_key: config.api_key.clone(),
            current_url: config.current_url.clone(),
            forecast_url: config.forecast_url.clone(),
            geo_url: config.geo_url.clone(),
        })
    }

    fn key(&self) -> Result<&str> {
        require_key("Weather", self.api_key.as_deref())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self), fields(city = %city.name))]
    async fn current(&self, city: &CityCandidate) -> Result<WeatherSample> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}&units=metric",
            self.current_url,
            city.lat,
            city.lon,
            self.key()?
        );
        let response: owm::CurrentResponse = self.http.get_json(&url).await?;
        let mut sample = response.into_sample()?;

        // Labels from the search hit are more precise than the station name
        if !city.name.is_empty() {
            sample.city_name.clone_from(&city.name);
        }
        if !city.country.is_empty() {
            sample.country.clone_from(&city.country);
        }
        Ok(sample)
    }

    #[instrument(skip(self))]
    async fn forecast(&self, coordinates: Coordinates) -> Result<ForecastSeries> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}&units=metric",
            self.forecast_url,
            coordinates.lat,
            coordinates.lon,
            self.key()?
        );
        let response: owm::ForecastResponse = self.http.get_json(&url).await?;
        response.into_series()
    }

    #[instrument(skip(self))]
    async fn search_cities(&self, query: &str, limit: u32) -> Result<Vec<CityCandidate>> {
        let url = format!(
            "{}?q={}&limit={}&appid={}",
            self.geo_url,
            urlencoding::encode(query),
            limit,
            self.key()?
        );
        let hits: Vec<owm::GeoHit> = self.http.get_json(&url).await?;
        Ok(hits.into_iter().map(CityCandidate::from).collect())
    }
}

/// OpenWeatherMap response structures
mod owm {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    use super::{CityCandidate, FixedOffset, ForecastSeries, Result, ShowcaseError, WeatherSample};
    use crate::ErrorCode;
    use crate::models::{Coordinates, ForecastSample};

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: f64,
        pub feels_like: f64,
        pub temp_min: f64,
        pub temp_max: f64,
        pub pressure: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct Sys {
        #[serde(default)]
        pub country: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub coord: Coord,
        pub weather: Vec<Condition>,
        pub main: Main,
        pub wind: Wind,
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub sys: Sys,
    }

    fn first_condition(conditions: Vec<Condition>) -> Result<Condition> {
        conditions.into_iter().next().ok_or_else(|| {
            ShowcaseError::api_with_context(
                "Weather response has no conditions",
                ErrorCode::ApiInvalidResponse,
                Default::default(),
            )
        })
    }

    impl CurrentResponse {
        pub fn into_sample(self) -> Result<WeatherSample> {
            let condition = first_condition(self.weather)?;
            Ok(WeatherSample {
                city_name: self.name,
                country: self.sys.country.unwrap_or_default(),
                temperature: self.main.temp,
                feels_like: self.main.feels_like,
                temp_min: self.main.temp_min,
                temp_max: self.main.temp_max,
                humidity: self.main.humidity,
                wind_speed: self.wind.speed,
                pressure: self.main.pressure,
                description: condition.description,
                icon_id: condition.icon,
                coordinates: Coordinates {
                    lat: self.coord.lat,
                    lon: self.coord.lon,
                },
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastMain {
        pub temp_min: f64,
        pub temp_max: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastEntry {
        pub dt: i64,
        pub main: ForecastMain,
        pub weather: Vec<Condition>,
        pub wind: Wind,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastCity {
        /// Shift from UTC in seconds
        #[serde(default)]
        pub timezone: i32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastEntry>,
        pub city: ForecastCity,
    }

    impl ForecastResponse {
        pub fn into_series(self) -> Result<ForecastSeries> {
            let invalid = |message: String| {
                ShowcaseError::api_with_context(
                    message,
                    ErrorCode::ApiInvalidResponse,
                    Default::default(),
                )
            };

            let utc_offset = FixedOffset::east_opt(self.city.timezone)
                .ok_or_else(|| invalid(format!("Invalid UTC offset: {}", self.city.timezone)))?;

            let samples = self
                .list
                .into_iter()
                .map(|entry| {
                    let timestamp = DateTime::<Utc>::from_timestamp(entry.dt, 0)
                        .ok_or_else(|| invalid(format!("Invalid forecast timestamp: {}", entry.dt)))?;
                    let condition = first_condition(entry.weather)?;
                    Ok(ForecastSample {
                        timestamp,
                        temp_min: entry.main.temp_min,
                        temp_max: entry.main.temp_max,
                        humidity: entry.main.humidity,
                        wind_speed: entry.wind.speed,
                        icon_id: condition.icon,
                        description: condition.description,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(ForecastSeries {
                samples,
                utc_offset,
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct GeoHit {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
        #[serde(default)]
        pub country: String,
        #[serde(default)]
        pub state: Option<String>,
    }

    impl From<GeoHit> for CityCandidate {
        fn from(hit: GeoHit) -> Self {
            CityCandidate {
                name: hit.name,
                country: hit.country,
                state: hit.state,
                lat: hit.lat,
                lon: hit.lon,
            }
        }
    }
}
