use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{PanelSlot, Tab};
use crate::api::ReverseGeocoder;
use crate::document::Document;
use crate::geolocation::{GeolocationSource, Geolocator, PositionOptions};
use crate::html::{error_block, escape_html, loading_block, round_half_up};
use crate::models::{GeoPosition, LocationResult};
use crate::widget::RenderState;

/// Locates the visitor and shows where and when they are
pub struct WorldPanel {
    slot: PanelSlot,
    locator: Geolocator,
    geocoder: Arc<dyn ReverseGeocoder>,
    default_timezone: String,
}

impl WorldPanel {
    pub fn new(
        geocoder: Arc<dyn ReverseGeocoder>,
        options: PositionOptions,
        default_timezone: impl Into<String>,
    ) -> Self {
        Self {
            slot: PanelSlot::new(Tab::World),
            locator: Geolocator::new(options),
            geocoder,
            default_timezone: default_timezone.into(),
        }
    }

    pub async fn state(&self) -> RenderState {
        self.slot.state().await
    }

    /// Position → place labels. Never fails: lookup problems degrade to
    /// placeholder labels with the true coordinates.
    #[instrument(skip(self, position), fields(lat = position.latitude, lon = position.longitude))]
    pub async fn resolve(&self, position: &GeoPosition) -> LocationResult {
        let timezone = position
            .timezone
            .clone()
            .unwrap_or_else(|| self.default_timezone.clone());

        match self
            .geocoder
            .reverse(position.latitude, position.longitude)
            .await
        {
            Ok(labels) => LocationResult {
                latitude: position.latitude,
                longitude: position.longitude,
                accuracy: position.accuracy,
                city: labels.city,
                country: labels.country,
                state: labels.state,
                timezone,
            },
            Err(err) => {
                warn!("Reverse geocoding failed, using placeholders: {}", err);
                LocationResult::unresolved(position, timezone)
            }
        }
    }

    /// One locate-and-render attempt
    pub async fn load(
        &self,
        doc: &Mutex<Document>,
        source: &dyn GeolocationSource,
    ) -> RenderState {
        let ticket = self.slot.begin();
        self.slot
            .commit(doc, ticket, RenderState::Loading, loading_block("Finding your location..."))
            .await;

        let (state, html) = match self.locator.locate(source).await {
            Ok(position) => {
                let location = self.resolve(&position).await;
                info!(city = %location.city, resolved = location.is_resolved(), "Location resolved");
                (RenderState::Content, render_location(&location))
            }
            Err(err) => {
                warn!("Geolocation failed: {}", err);
                (
                    RenderState::Error,
                    error_block("🌍", "Location Unavailable", &err.user_message(), Some("world")),
                )
            }
        };

        self.slot.commit(doc, ticket, state, html).await;
        self.slot.state().await
    }
}

fn render_location(location: &LocationResult) -> String {
    let tz: Tz = location.timezone.parse().unwrap_or(Tz::UTC);
    let now = Utc::now().with_timezone(&tz);
    let time = now.format("%I:%M:%S %p");
    let date = now.format("%A, %B %-d, %Y");

    let state = location
        .state
        .as_deref()
        .map(|s| format!(r#"<span class="state-name">{}</span>"#, escape_html(s)))
        .unwrap_or_default();

    format!(
        r#"<div id="world-map" class="map-mount" data-lat="{lat}" data-lon="{lon}" data-label="{city}"></div>
<div class="location-info-grid">
<div class="info-card primary"><div class="card-header"><span class="card-icon">📍</span><h4>Current Location</h4></div>
<div class="card-content"><div class="location-name"><strong>{city}</strong><span class="country-name">{country}</span>{state}</div>
<div class="accuracy-info"><span class="accuracy-icon">🎯</span>Accuracy: ±{accuracy}m</div></div></div>
<div class="info-card"><div class="card-header"><span class="card-icon">🕒</span><h4>Current Time</h4></div>
<div class="card-content"><div class="time-display" id="live-time">{time}</div><div class="date-display">{date}</div></div></div>
<div class="info-card"><div class="card-header"><span class="card-icon">🌐</span><h4>Coordinates</h4></div>
<div class="card-content"><div class="coord-pair"><span class="coord-type">Lat:</span><span class="coord-val">{lat:.4}°</span></div>
<div class="coord-pair"><span class="coord-type">Lng:</span><span class="coord-val">{lon:.4}°</span></div></div></div>
<div class="info-card"><div class="card-header"><span class="card-icon">🌍</span><h4>Time Zone</h4></div>
<div class="card-content"><div class="timezone-info">{tz_short}</div><div class="timezone-full">{tz_full}</div></div></div>
</div>"#,
        lat = location.latitude,
        lon = location.longitude,
        city = escape_html(&location.city),
        country = escape_html(&location.country),
        accuracy = round_half_up(location.accuracy),
        tz_short = escape_html(location.timezone_short()),
        tz_full = escape_html(&location.timezone),
    )
}
