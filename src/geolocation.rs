//! Device position readings
//!
//! The device reports its own position; [`Geolocator`] adds the single-shot
//! timeout and reuses a recent reading instead of asking again.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::GeocodingConfig;
use crate::error::GeolocationFailure;
use crate::models::GeoPosition;
use crate::{Result, ShowcaseError};

/// Produces one position reading per call
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    async fn current_position(&self) -> Result<GeoPosition>;
}

/// Timing rules for a position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// How long to wait for a reading
    pub timeout: Duration,
    /// Readings younger than this are reused
    pub maximum_age: Duration,
}

impl PositionOptions {
    #[must_use]
    pub fn from_config(config: &GeocodingConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.position_timeout_seconds.into()),
            maximum_age: Duration::from_secs(config.position_max_age_seconds.into()),
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from_config(&GeocodingConfig::default())
    }
}

/// What the client reported about its position, as sent with a panel
/// request. No coordinates and no error means the client cannot locate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PositionReport {
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default, alias = "tz")]
    pub timezone: Option<String>,
    /// `permission_denied`, `position_unavailable` or `timeout`
    #[serde(default)]
    pub error: Option<String>,
}

impl PositionReport {
    #[must_use]
    pub fn at(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            accuracy: Some(accuracy),
            ..Self::default()
        }
    }

    /// Whether the report carries anything at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none() && self.error.is_none()
    }

    fn reading(&self) -> Result<GeoPosition> {
        if let Some(error) = &self.error {
            let failure = match error.as_str() {
                "permission_denied" | "denied" => GeolocationFailure::PermissionDenied,
                "timeout" => GeolocationFailure::Timeout,
                "unsupported" => GeolocationFailure::Unsupported,
                _ => GeolocationFailure::PositionUnavailable,
            };
            return Err(ShowcaseError::geolocation(failure));
        }

        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(ShowcaseError::geolocation(GeolocationFailure::Unsupported));
        };

        let mut position = GeoPosition::new(latitude, longitude, self.accuracy.unwrap_or(0.0));
        position.timezone.clone_from(&self.timezone);
        if !position.is_valid() {
            return Err(ShowcaseError::geolocation(
                GeolocationFailure::PositionUnavailable,
            ));
        }
        Ok(position)
    }
}

#[async_trait]
impl GeolocationSource for PositionReport {
    async fn current_position(&self) -> Result<GeoPosition> {
        self.reading()
    }
}

/// Single-shot locator with a maximum-age cache
#[derive(Debug)]
pub struct Geolocator {
    options: PositionOptions,
    last: Mutex<Option<GeoPosition>>,
}

impl Geolocator {
    #[must_use]
    pub fn new(options: PositionOptions) -> Self {
        Self {
            options,
            last: Mutex::new(None),
        }
    }

    /// One position attempt: a fresh enough cached reading, or exactly one
    /// request to `source` bounded by the timeout
    pub async fn locate(&self, source: &dyn GeolocationSource) -> Result<GeoPosition> {
        if let Some(cached) = self.last.lock().await.as_ref() {
            let age = (Utc::now() - cached.timestamp).to_std().unwrap_or_default();
            if age <= self.options.maximum_age {
                debug!("Reusing position from {:?} ago", age);
                return Ok(cached.clone());
            }
        }

        let position = tokio::time::timeout(self.options.timeout, source.current_position())
            .await
            .map_err(|_| {
                warn!("No position within {:?}", self.options.timeout);
                ShowcaseError::geolocation(GeolocationFailure::Timeout)
            })??;

        *self.last.lock().await = Some(position.clone());
        Ok(position)
    }

    /// Forget the cached reading
    pub async fn reset(&self) {
        *self.last.lock().await = None;
    }
}
