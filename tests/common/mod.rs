#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};

use showcase::api::{
    CryptoProvider, MovieProvider, PlaceLabels, PriceEntry, ReverseGeocoder, WeatherProvider,
};
use showcase::models::{
    CityCandidate, Coordinates, ForecastSample, ForecastSeries, MovieDetail, MovieListing,
    MovieSummary, WeatherSample,
};
use showcase::storage::{MemoryPreferenceStore, PreferenceStore};
use showcase::{Dashboard, Providers, Result, ShowcaseConfig, ShowcaseError};

#[derive(Default)]
pub struct FakeWeather {
    pub hits: Vec<CityCandidate>,
    pub searches: Mutex<Vec<(String, u32)>>,
    pub current_calls: AtomicUsize,
    pub forecast_calls: AtomicUsize,
    pub forecast_delay: Option<Duration>,
}

impl FakeWeather {
    pub fn with_hits(hits: Vec<CityCandidate>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    pub fn searched(&self) -> Vec<(String, u32)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, city: &CityCandidate) -> Result<WeatherSample> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        Ok(WeatherSample {
            city_name: city.name.clone(),
            country: city.country.clone(),
            temperature: 11.4,
            feels_like: 9.8,
            temp_min: 9.0,
            temp_max: 13.0,
            humidity: 71,
            wind_speed: 4.2,
            pressure: 1009.0,
            description: "light rain".to_string(),
            icon_id: "10d".to_string(),
            coordinates: city.coordinates(),
        })
    }

    async fn forecast(&self, _coordinates: Coordinates) -> Result<ForecastSeries> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.forecast_delay {
            tokio::time::sleep(delay).await;
        }
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let samples = (0..24)
            .map(|i| ForecastSample {
                timestamp: start + chrono::Duration::hours(i * 3),
                temp_min: 2.0 + i as f64,
                temp_max: 4.0 + i as f64,
                humidity: 80,
                wind_speed: 3.0,
                icon_id: "04d".to_string(),
                description: "overcast clouds".to_string(),
            })
            .collect();
        Ok(ForecastSeries {
            samples,
            utc_offset: FixedOffset::east_opt(3600).unwrap(),
        })
    }

    async fn search_cities(&self, query: &str, limit: u32) -> Result<Vec<CityCandidate>> {
        self.searches.lock().unwrap().push((query.to_string(), limit));
        Ok(self.hits.clone())
    }
}

/// Movie catalog whose searches can be slowed down per query
#[derive(Default)]
pub struct FakeMovies {
    pub delays: HashMap<String, Duration>,
    /// Queries that find nothing
    pub misses: Vec<String>,
    pub detail_delay: Option<Duration>,
    pub searches: Mutex<Vec<String>>,
    pub popular_calls: AtomicUsize,
}

pub fn movie(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        year: Some("2014".to_string()),
        poster_path: None,
        rating: Some(8.4),
        genres: vec!["Adventure".to_string(), "Drama".to_string()],
        overview: format!("{title} overview"),
    }
}

#[async_trait]
impl MovieProvider for FakeMovies {
    async fn popular(&self) -> Result<MovieListing> {
        self.popular_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MovieListing {
            items: (1..=20).map(|i| movie(i, &format!("Popular {i}"))).collect(),
            total_results: 10_000,
        })
    }

    async fn search(&self, query: &str) -> Result<MovieListing> {
        self.searches.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.misses.iter().any(|miss| miss == query) {
            return Ok(MovieListing {
                items: Vec::new(),
                total_results: 0,
            });
        }
        Ok(MovieListing {
            items: vec![movie(100, &format!("{query} result"))],
            total_results: 1,
        })
    }

    async fn detail(&self, id: u64) -> Result<MovieDetail> {
        if let Some(delay) = self.detail_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(MovieDetail {
            id,
            title: "Interstellar".to_string(),
            year: Some("2014".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            rating: Some(8.4),
            genres: vec!["Adventure".to_string(), "Sci-Fi".to_string()],
            overview: "A team travels through a wormhole.".to_string(),
            vote_count: 36_000,
            runtime: Some(169),
            budget: Some(165_000_000),
            revenue: None,
            production_countries: vec!["United States of America".to_string()],
        })
    }
}

pub struct FakeCrypto;

#[async_trait]
impl CryptoProvider for FakeCrypto {
    async fn prices(&self, _ids: &[String]) -> Result<HashMap<String, PriceEntry>> {
        Ok(HashMap::from([(
            "bitcoin".to_string(),
            PriceEntry {
                usd: 60_000.0,
                usd_24h_change: Some(2.5),
                usd_market_cap: Some(1.2e12),
            },
        )]))
    }

    async fn usd_rate(&self, _currency: &str) -> Result<f64> {
        Ok(0.9)
    }
}

pub struct OfflineGeocoder;

#[async_trait]
impl ReverseGeocoder for OfflineGeocoder {
    async fn reverse(&self, _lat: f64, _lon: f64) -> Result<PlaceLabels> {
        Err(ShowcaseError::api("geocoder offline"))
    }
}

pub fn dashboard_with(
    weather: Arc<FakeWeather>,
    movies: Arc<FakeMovies>,
    store: Arc<dyn PreferenceStore>,
) -> Dashboard {
    let providers = Providers {
        geocoder: Arc::new(OfflineGeocoder),
        weather,
        crypto: Arc::new(FakeCrypto),
        movies,
    };
    Dashboard::new(&ShowcaseConfig::default(), providers, store)
}

pub fn dashboard(weather: Arc<FakeWeather>) -> Dashboard {
    dashboard_with(
        weather,
        Arc::new(FakeMovies::default()),
        Arc::new(MemoryPreferenceStore::new()),
    )
}
