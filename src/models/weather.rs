//! Current conditions and city search candidates

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One hit from the city search endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityCandidate {
    pub name: String,
    /// ISO 3166-1 alpha-2 code
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl CityCandidate {
    #[must_use]
    pub fn new(name: &str, country: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            state: None,
            lat,
            lon,
        }
    }

    /// Identity used for deduplication: administrative variants of one
    /// place share name and country
    #[must_use]
    pub fn dedup_key(&self) -> (String, String) {
        (self.name.clone(), self.country.clone())
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Current weather for one city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSample {
    pub city_name: String,
    /// ISO 3166-1 alpha-2 code
    pub country: String,
    /// Temperature in Celsius
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Pressure in hPa
    pub pressure: f64,
    pub description: String,
    pub icon_id: String,
    pub coordinates: Coordinates,
}

impl WeatherSample {
    /// Wind speed converted to km/h
    #[must_use]
    pub fn wind_kmh(&self) -> f64 {
        self.wind_speed * 3.6
    }

    /// Description with the first letter upper-cased
    #[must_use]
    pub fn format_description(&self) -> String {
        capitalize(&self.description)
    }
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherSample {
        WeatherSample {
            city_name: "Bern".to_string(),
            country: "CH".to_string(),
            temperature: 12.4,
            feels_like: 11.0,
            temp_min: 10.0,
            temp_max: 14.0,
            humidity: 71,
            wind_speed: 2.5,
            pressure: 1018.0,
            description: "scattered clouds".to_string(),
            icon_id: "03d".to_string(),
            coordinates: Coordinates { lat: 46.9481, lon: 7.4474 },
        }
    }

    #[test]
    fn test_wind_kmh() {
        assert!((sample().wind_kmh() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_description() {
        assert_eq!(sample().format_description(), "Scattered clouds");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_dedup_key_ignores_coordinates() {
        let a = CityCandidate::new("London", "GB", 51.5, -0.12);
        let b = CityCandidate::new("London", "GB", 51.6, -0.10);
        let c = CityCandidate::new("London", "CA", 42.98, -81.24);
        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_ne!(a.dedup_key(), c.dedup_key());
    }
}
