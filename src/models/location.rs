//! Device readings and the places they resolve to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_CITY: &str = "Unknown City";
pub const UNKNOWN_COUNTRY: &str = "Unknown Country";

/// A single geolocation reading as reported by the device
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeoPosition {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Accuracy radius in meters
    pub accuracy: f64,
    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
    /// IANA timezone reported alongside the reading
    pub timezone: Option<String>,
}

impl GeoPosition {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp: Utc::now(),
            timezone: None,
        }
    }

    /// Whether both coordinates are on the globe
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A reading combined with its reverse-geocoded place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationResult {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub city: String,
    pub country: String,
    pub state: Option<String>,
    /// IANA timezone name
    pub timezone: String,
}

impl LocationResult {
    /// Location with placeholder labels, for when the lookup is unavailable
    #[must_use]
    pub fn unresolved(position: &GeoPosition, timezone: String) -> Self {
        Self {
            latitude: position.latitude,
            longitude: position.longitude,
            accuracy: position.accuracy,
            city: UNKNOWN_CITY.to_string(),
            country: UNKNOWN_COUNTRY.to_string(),
            state: None,
            timezone,
        }
    }

    /// Last segment of the timezone name, e.g. "Zurich" for "Europe/Zurich"
    #[must_use]
    pub fn timezone_short(&self) -> &str {
        self.timezone
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("Local Time")
    }

    /// Whether the place labels are real lookups rather than placeholders
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.city != UNKNOWN_CITY || self.country != UNKNOWN_COUNTRY
    }
}
