//! Data models for the showcase panels
//!
//! - Location: device readings and resolved places
//! - Weather: current conditions and city candidates
//! - Forecast: 3-hour samples and their daily aggregation
//! - Crypto: price quotes in USD and the local currency
//! - Movie: catalog listings and detail records

pub mod crypto;
pub mod forecast;
pub mod location;
pub mod movie;
pub mod weather;

pub use crypto::CryptoQuote;
pub use forecast::{Forecast, ForecastDay, ForecastSample, ForecastSeries, aggregate_daily};
pub use location::{GeoPosition, LocationResult};
pub use movie::{MovieDetail, MovieListing, MovieSummary};
pub use weather::{CityCandidate, Coordinates, WeatherSample};
