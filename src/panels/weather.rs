use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{PanelSlot, Tab};
use crate::api::WeatherProvider;
use crate::config::SearchConfig;
use crate::document::{Document, SharedDocument};
use crate::html::{error_block, escape_html, loading_block, no_results, round_half_up};
use crate::lookup::country_name;
use crate::modal::{self, ModalKind, ModalView};
use crate::models::forecast::FORECAST_DAYS;
use crate::models::{CityCandidate, Coordinates, Forecast, WeatherSample, aggregate_daily};
use crate::widget::{Debouncer, QueryMode, RenderState, RequestSequence, dedup_by_key, fan_out};
use crate::{Result, ShowcaseError};

/// Cities shown while the search box holds no usable query
pub const DEFAULT_CITIES: [(&str, f64, f64); 6] = [
    ("Visp", 46.2937, 7.8842),
    ("Bern", 46.9481, 7.4474),
    ("Zurich", 47.3769, 8.5417),
    ("Geneva", 46.2044, 6.1432),
    ("Basel", 47.5596, 7.5886),
    ("Lugano", 46.0037, 8.9511),
];

fn default_candidates() -> Vec<CityCandidate> {
    DEFAULT_CITIES
        .iter()
        .map(|(name, lat, lon)| CityCandidate::new(name, "CH", *lat, *lon))
        .collect()
}

/// A "5-Day Forecast" click
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Weather search panel with the 5-day forecast modal
pub struct WeatherPanel {
    slot: PanelSlot,
    provider: Arc<dyn WeatherProvider>,
    search: SearchConfig,
    icon_base_url: String,
    debouncer: Debouncer,
    forecast_sequence: RequestSequence,
}

impl WeatherPanel {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        search: SearchConfig,
        icon_base_url: impl Into<String>,
    ) -> Self {
        let debouncer = Debouncer::new(Duration::from_millis(search.debounce_ms));
        Self {
            slot: PanelSlot::new(Tab::Weather),
            provider,
            search,
            icon_base_url: icon_base_url.into(),
            debouncer,
            forecast_sequence: RequestSequence::new(),
        }
    }

    pub async fn state(&self) -> RenderState {
        self.slot.state().await
    }

    /// Tab activation: show the default cities
    pub async fn load(&self, doc: &Mutex<Document>) -> RenderState {
        self.debouncer.cancel();
        self.search(doc, "").await
    }

    /// A keystroke in the search box; the search runs once typing pauses
    pub fn input(self: &Arc<Self>, doc: SharedDocument, raw: String) {
        let panel = Arc::clone(self);
        self.debouncer.call(async move {
            panel.search(&doc, &raw).await;
        });
    }

    /// Run one search for `raw` and render the outcome
    #[instrument(skip(self, doc))]
    pub async fn search(&self, doc: &Mutex<Document>, raw: &str) -> RenderState {
        let mode = QueryMode::classify(raw, self.search.min_query_len);
        let query = match &mode {
            QueryMode::Default => "",
            QueryMode::Search(q) => q.as_str(),
        };

        let ticket = self.slot.begin();
        self.slot
            .commit(
                doc,
                ticket,
                RenderState::Loading,
                self.render_interface(query, "Loading weather...", &loading_block("Loading weather...")),
            )
            .await;

        let (state, html) = match self.fetch(&mode).await {
            Ok((info, entries)) if entries.is_empty() => (
                RenderState::Empty,
                self.render_interface(
                    query,
                    &info,
                    &no_results("🌍 No cities found", "Try searching for a different city..."),
                ),
            ),
            Ok((info, entries)) => (
                RenderState::Content,
                self.render_interface(query, &info, &self.render_cards(&entries)),
            ),
            Err(err) => {
                warn!("Weather search failed: {}", err);
                (
                    RenderState::Error,
                    self.render_interface(
                        query,
                        "Weather unavailable",
                        &error_block("⚠️", "Weather API Error", &err.user_message(), Some("weather")),
                    ),
                )
            }
        };

        self.slot.commit(doc, ticket, state, html).await;
        self.slot.state().await
    }

    async fn fetch(
        &self,
        mode: &QueryMode,
    ) -> Result<(String, Vec<(CityCandidate, Result<WeatherSample>)>)> {
        let (info, candidates) = match mode {
            QueryMode::Default => ("Showing popular Swiss cities".to_string(), default_candidates()),
            QueryMode::Search(query) => {
                let hits = self
                    .provider
                    .search_cities(query, self.search.city_search_limit)
                    .await?;
                let found = hits.len();
                let unique = dedup_by_key(hits, self.search.max_weather_results, CityCandidate::dedup_key);
                info!("{} cities for {:?}, {} after dedup", found, query, unique.len());
                (
                    format!("Found weather for {} cities matching \"{}\"", unique.len(), query),
                    unique,
                )
            }
        };

        let provider = Arc::clone(&self.provider);
        let batch = fan_out(candidates, |city| {
            let provider = Arc::clone(&provider);
            let city = city.clone();
            async move { provider.current(&city).await }
        })
        .await;

        Ok((info, batch.into_partial()?))
    }

    fn render_interface(&self, query: &str, info: &str, body: &str) -> String {
        format!(
            r#"<div class="weather-header"><h3>🌤️ Weather Search Engine</h3>
<div class="weather-search"><input type="text" id="weather-search" value="{query}" placeholder="Search any city... (e.g. 'London', 'Paris', 'Tokyo')"><span class="search-icon">🔍</span></div>
<p class="search-info" id="weather-search-info">{info}</p></div>
<div class="weather-cards" id="weather-cards">{body}</div>
<div class="weather-footer"><p class="weather-disclaimer">🌤️ Real-time weather data from OpenWeatherMap API</p></div>"#,
            query = escape_html(query),
            info = escape_html(info),
        )
    }

    fn icon_url(&self, icon_id: &str) -> String {
        format!("{}/{}@2x.png", self.icon_base_url.trim_end_matches('/'), icon_id)
    }

    fn render_cards(&self, entries: &[(CityCandidate, Result<WeatherSample>)]) -> String {
        entries
            .iter()
            .map(|(city, result)| match result {
                Ok(sample) => self.render_card(sample),
                Err(err) => render_failed_card(city, err),
            })
            .collect()
    }

    fn render_card(&self, w: &WeatherSample) -> String {
        format!(
            r#"<div class="weather-card enhanced">
<div class="weather-card-header"><div class="weather-location"><h4>{city}</h4><span class="weather-country">{country}</span></div>
<div class="weather-icon"><img src="{icon}" alt="{desc}"></div></div>
<div class="weather-temp"><span class="temp-main">{temp}°C</span><span class="temp-feels">Feels like {feels}°C</span></div>
<div class="weather-description">{description}</div>
<div class="weather-details">
<div class="detail-item"><span class="detail-icon">💧</span><span class="detail-value">{humidity}%</span><span class="detail-label">Humidity</span></div>
<div class="detail-item"><span class="detail-icon">💨</span><span class="detail-value">{wind} km/h</span><span class="detail-label">Wind</span></div>
<div class="detail-item"><span class="detail-icon">🌡️</span><span class="detail-value">{pressure} hPa</span><span class="detail-label">Pressure</span></div></div>
<div class="weather-minmax"><span class="temp-min">Min: {min}°C</span><span class="temp-max">Max: {max}°C</span></div>
<div class="weather-actions"><button class="weather-btn primary full-width" data-forecast-lat="{lat}" data-forecast-lon="{lon}" data-forecast-city="{city}" data-forecast-country="{code}"><span class="btn-icon">📊</span><span class="btn-text">5-Day Forecast</span></button></div>
</div>"#,
            city = escape_html(&w.city_name),
            country = escape_html(country_name(&w.country)),
            code = escape_html(&w.country),
            icon = escape_html(&self.icon_url(&w.icon_id)),
            desc = escape_html(&w.description),
            description = escape_html(&w.format_description()),
            temp = round_half_up(w.temperature),
            feels = round_half_up(w.feels_like),
            humidity = w.humidity,
            wind = round_half_up(w.wind_kmh()),
            pressure = round_half_up(w.pressure),
            min = round_half_up(w.temp_min),
            max = round_half_up(w.temp_max),
            lat = w.coordinates.lat,
            lon = w.coordinates.lon,
        )
    }

    /// Open the forecast modal for one city
    #[instrument(skip(self, doc), fields(city = %request.city))]
    pub async fn forecast(&self, doc: &Mutex<Document>, request: &ForecastRequest) -> RenderState {
        let ticket = self.forecast_sequence.issue();
        modal::show(&mut *doc.lock().await, ModalKind::Weather, &ModalView::Loading);

        let coordinates = Coordinates {
            lat: request.lat,
            lon: request.lon,
        };
        let outcome = self.provider.forecast(coordinates).await.map(|series| Forecast {
            city_name: request.city.clone(),
            country: request.country.clone(),
            days: aggregate_daily(&series.samples, series.utc_offset, FORECAST_DAYS),
        });

        if !self.forecast_sequence.is_current(ticket) {
            return RenderState::Loading;
        }

        let mut doc = doc.lock().await;
        // Closed while loading
        if doc.modal(ModalKind::Weather.id()).is_none() {
            return RenderState::Idle;
        }
        match outcome {
            Ok(forecast) => {
                modal::show(&mut doc, ModalKind::Weather, &ModalView::Content(self.render_forecast(&forecast)));
                RenderState::Content
            }
            Err(err) => {
                warn!("Forecast failed: {}", err);
                modal::show(&mut doc, ModalKind::Weather, &ModalView::Error);
                RenderState::Error
            }
        }
    }

    fn render_forecast(&self, forecast: &Forecast) -> String {
        let mut html = format!(
            r#"<div class="weather-modal-header"><h2>🌤️ {}, {}</h2><p class="forecast-subtitle">5-Day Weather Forecast</p></div><div class="forecast-grid">"#,
            escape_html(&forecast.city_name),
            escape_html(country_name(&forecast.country)),
        );
        for day in &forecast.days {
            html.push_str(&format!(
                r#"<div class="forecast-day"><div class="forecast-date"><span class="day-name">{}</span><span class="day-date">{}</span></div><div class="forecast-icon"><img src="{}" alt="{desc}"></div><div class="forecast-temps"><span class="forecast-high">{}°</span><span class="forecast-low">{}°</span></div><div class="forecast-desc">{desc}</div><div class="forecast-details"><div class="forecast-detail"><span class="detail-icon">💧</span><span>{}%</span></div><div class="forecast-detail"><span class="detail-icon">💨</span><span>{} km/h</span></div></div></div>"#,
                day.day_name,
                day.date_label(),
                escape_html(&self.icon_url(&day.icon_id)),
                round_half_up(day.temp_max),
                round_half_up(day.temp_min),
                day.humidity,
                round_half_up(day.wind_kmh()),
                desc = escape_html(&day.description),
            ));
        }
        html.push_str("</div>");
        html
    }
}

fn render_failed_card(city: &CityCandidate, err: &ShowcaseError) -> String {
    format!(
        r#"<div class="weather-card failed"><div class="weather-card-header"><div class="weather-location"><h4>{}</h4><span class="weather-country">{}</span></div></div><p class="weather-error">{}</p></div>"#,
        escape_html(&city.name),
        escape_html(country_name(&city.country)),
        escape_html(&err.user_message()),
    )
}
