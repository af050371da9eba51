//! Tab dispatcher and the wiring between panels, modals, theme and host
//!
//! The dashboard owns the shared document and one controller per panel.
//! Activating a tab moves the `active` class to that tab's button and panel
//! and runs the panel's load routine. Panels only ever write their own
//! container, so a slow response for a tab the user already left lands in
//! that (hidden) container and nowhere else.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::Result;
use crate::api::{
    CoinGeckoClient, CryptoProvider, MovieProvider, NominatimClient, OpenWeatherClient,
    ReverseGeocoder, TmdbClient, WeatherProvider,
};
use crate::config::{ContactConfig, ShowcaseConfig};
use crate::contact::{self, ContactForm, ContactOutcome};
use crate::document::{Document, SharedDocument};
use crate::geolocation::{GeolocationSource, PositionOptions};
use crate::modal::{self, Dismissal, ModalKind};
use crate::navigation;
use crate::panels::weather::ForecastRequest;
use crate::panels::{CryptoPanel, MoviePanel, Tab, WeatherPanel, WorldPanel};
use crate::storage::PreferenceStore;
use crate::theme::{Theme, ThemeController, ThemeState};
use crate::widget::RenderState;

const ACTIVE_CLASS: &str = "active";

/// Data sources behind the panels
#[derive(Clone)]
pub struct Providers {
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub weather: Arc<dyn WeatherProvider>,
    pub crypto: Arc<dyn CryptoProvider>,
    pub movies: Arc<dyn MovieProvider>,
}

impl Providers {
    /// HTTP clients for every configured API
    pub fn from_config(config: &ShowcaseConfig) -> Result<Self> {
        Ok(Self {
            geocoder: Arc::new(NominatimClient::new(&config.geocoding)?),
            weather: Arc::new(OpenWeatherClient::new(&config.weather)?),
            crypto: Arc::new(CoinGeckoClient::new(&config.crypto)?),
            movies: Arc::new(TmdbClient::new(&config.movies)?),
        })
    }
}

pub struct Dashboard {
    doc: SharedDocument,
    world: WorldPanel,
    weather: Arc<WeatherPanel>,
    crypto: CryptoPanel,
    movies: Arc<MoviePanel>,
    theme: ThemeController,
    contact: ContactConfig,
    active: Mutex<Option<Tab>>,
}

impl Dashboard {
    pub fn new(
        config: &ShowcaseConfig,
        providers: Providers,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            doc: Document::shared(),
            world: WorldPanel::new(
                providers.geocoder,
                PositionOptions::from_config(&config.geocoding),
                config.geocoding.default_timezone.clone(),
            ),
            weather: Arc::new(WeatherPanel::new(
                providers.weather,
                config.search.clone(),
                config.weather.icon_base_url.clone(),
            )),
            crypto: CryptoPanel::new(providers.crypto, &config.crypto),
            movies: Arc::new(MoviePanel::new(
                providers.movies,
                config.search.clone(),
                config.movies.image_base_url.clone(),
            )),
            theme: ThemeController::new(store),
            contact: config.contact.clone(),
            active: Mutex::new(None),
        }
    }

    /// Dashboard backed by the real HTTP clients
    pub fn from_config(config: &ShowcaseConfig, store: Arc<dyn PreferenceStore>) -> Result<Self> {
        Ok(Self::new(config, Providers::from_config(config)?, store))
    }

    pub fn document(&self) -> SharedDocument {
        Arc::clone(&self.doc)
    }

    pub async fn active_tab(&self) -> Option<Tab> {
        *self.active.lock().await
    }

    /// Activate the tab named `name`. Unknown names fail without touching
    /// the document.
    pub async fn select(&self, name: &str, source: &dyn GeolocationSource) -> Result<RenderState> {
        let tab: Tab = name.parse()?;
        Ok(self.activate(tab, source).await)
    }

    /// Make `tab` the only active tab and load its panel
    #[instrument(skip(self, source))]
    pub async fn activate(&self, tab: Tab, source: &dyn GeolocationSource) -> RenderState {
        {
            let mut doc = self.doc.lock().await;
            for other in Tab::ALL {
                doc.remove_node_class(&other.button_id(), ACTIVE_CLASS);
                doc.remove_node_class(&other.panel_id(), ACTIVE_CLASS);
            }
            doc.add_node_class(&tab.button_id(), ACTIVE_CLASS);
            doc.add_node_class(&tab.panel_id(), ACTIVE_CLASS);
        }
        *self.active.lock().await = Some(tab);
        info!(tab = %tab, "Tab activated");

        match tab {
            Tab::World => self.world.load(&self.doc, source).await,
            Tab::Weather => self.weather.load(&self.doc).await,
            Tab::Crypto => self.crypto.load(&self.doc).await,
            Tab::Movies => self.movies.load(&self.doc).await,
        }
    }

    pub async fn panel_state(&self, tab: Tab) -> RenderState {
        match tab {
            Tab::World => self.world.state().await,
            Tab::Weather => self.weather.state().await,
            Tab::Crypto => self.crypto.state().await,
            Tab::Movies => self.movies.state().await,
        }
    }

    /// Current HTML of the tab's container
    pub async fn view(&self, tab: Tab) -> String {
        self.doc
            .lock()
            .await
            .container(tab.container_id())
            .unwrap_or_default()
            .to_string()
    }

    pub fn weather_input(&self, raw: String) {
        self.weather.input(self.document(), raw);
    }

    pub fn movie_input(&self, raw: String) {
        self.movies.input(self.document(), raw);
    }

    pub async fn forecast(&self, request: &ForecastRequest) -> RenderState {
        self.weather.forecast(&self.doc, request).await
    }

    pub async fn movie_detail(&self, id: u64) -> RenderState {
        self.movies.detail(&self.doc, id).await
    }

    /// HTML of the open modal of `kind`, if any
    pub async fn modal_html(&self, kind: ModalKind) -> Option<String> {
        self.doc
            .lock()
            .await
            .modal(kind.id())
            .map(|node| node.html.clone())
    }

    pub async fn dismiss(&self, kind: ModalKind, dismissal: &Dismissal) -> bool {
        modal::dismiss(&mut *self.doc.lock().await, kind, dismissal)
    }

    pub async fn key(&self, key: &str) -> Vec<ModalKind> {
        modal::key_pressed(&mut *self.doc.lock().await, key)
    }

    /// Drop every modal, as on a page session reset
    pub async fn reset_modals(&self) {
        modal::cleanup_all(&mut *self.doc.lock().await);
    }

    pub async fn load_theme(&self, os_preference: Option<Theme>) -> ThemeState {
        let mut doc = self.doc.lock().await;
        self.theme.load(&mut doc, os_preference).await
    }

    pub async fn toggle_theme(&self) -> Result<ThemeState> {
        let mut doc = self.doc.lock().await;
        self.theme.toggle(&mut doc).await
    }

    pub async fn os_theme_changed(&self, theme: Theme) -> ThemeState {
        let mut doc = self.doc.lock().await;
        self.theme.os_changed(&mut doc, theme).await
    }

    pub async fn clear_theme(&self) -> Result<ThemeState> {
        self.theme.clear().await
    }

    pub async fn theme_state(&self) -> ThemeState {
        self.theme.state().await
    }

    pub async fn toggle_nav(&self) -> bool {
        navigation::toggle(&mut *self.doc.lock().await)
    }

    /// A page click; `path` lists the ids from the target up to the root
    pub async fn page_clicked(&self, path: &[String]) -> bool {
        navigation::page_clicked(&mut *self.doc.lock().await, path)
    }

    pub fn contact(&self, form: &ContactForm) -> ContactOutcome {
        contact::submit(form, &self.contact)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::ShowcaseError;
    use crate::api::{PlaceLabels, PriceEntry};
    use crate::geolocation::PositionReport;
    use crate::models::{
        CityCandidate, Coordinates, ForecastSeries, MovieDetail, MovieListing, WeatherSample,
    };
    use crate::storage::MemoryPreferenceStore;

    struct Offline;

    #[async_trait]
    impl ReverseGeocoder for Offline {
        async fn reverse(&self, _lat: f64, _lon: f64) -> Result<PlaceLabels> {
            Err(ShowcaseError::api("offline"))
        }
    }

    #[async_trait]
    impl WeatherProvider for Offline {
        async fn current(&self, _city: &CityCandidate) -> Result<WeatherSample> {
            Err(ShowcaseError::api("offline"))
        }
        async fn forecast(&self, _at: Coordinates) -> Result<ForecastSeries> {
            Err(ShowcaseError::api("offline"))
        }
        async fn search_cities(&self, _query: &str, _limit: u32) -> Result<Vec<CityCandidate>> {
            Err(ShowcaseError::api("offline"))
        }
    }

    #[async_trait]
    impl CryptoProvider for Offline {
        async fn prices(&self, _ids: &[String]) -> Result<HashMap<String, PriceEntry>> {
            Err(ShowcaseError::api("offline"))
        }
        async fn usd_rate(&self, _currency: &str) -> Result<f64> {
            Err(ShowcaseError::api("offline"))
        }
    }

    #[async_trait]
    impl MovieProvider for Offline {
        async fn popular(&self) -> Result<MovieListing> {
            Err(ShowcaseError::api("offline"))
        }
        async fn search(&self, _query: &str) -> Result<MovieListing> {
            Err(ShowcaseError::api("offline"))
        }
        async fn detail(&self, _id: u64) -> Result<MovieDetail> {
            Err(ShowcaseError::api("offline"))
        }
    }

    fn dashboard() -> Dashboard {
        let offline = Arc::new(Offline);
        let providers = Providers {
            geocoder: offline.clone(),
            weather: offline.clone(),
            crypto: offline.clone(),
            movies: offline,
        };
        Dashboard::new(
            &ShowcaseConfig::default(),
            providers,
            Arc::new(MemoryPreferenceStore::new()),
        )
    }

    #[tokio::test]
    async fn test_only_one_tab_active() {
        let dash = dashboard();
        let none = PositionReport::default();

        dash.activate(Tab::Crypto, &none).await;
        dash.activate(Tab::Movies, &none).await;

        let doc = dash.document();
        let doc = doc.lock().await;
        assert!(doc.node_has_class("movies-tab", ACTIVE_CLASS));
        assert!(doc.node_has_class("movies-panel", ACTIVE_CLASS));
        assert!(!doc.node_has_class("crypto-tab", ACTIVE_CLASS));
        assert!(!doc.node_has_class("crypto-panel", ACTIVE_CLASS));
        assert_eq!(dash.active_tab().await, Some(Tab::Movies));
    }

    #[tokio::test]
    async fn test_unknown_tab_changes_nothing() {
        let dash = dashboard();
        let none = PositionReport::default();
        dash.activate(Tab::Weather, &none).await;

        let result = dash.select("settings", &none).await;

        assert!(matches!(result, Err(ShowcaseError::Validation { .. })));
        assert_eq!(dash.active_tab().await, Some(Tab::Weather));
        assert!(dash.document().lock().await.node_has_class("weather-tab", ACTIVE_CLASS));
    }

    #[tokio::test]
    async fn test_failures_stay_in_their_panel() {
        let dash = dashboard();

        let state = dash.activate(Tab::Crypto, &PositionReport::default()).await;

        assert_eq!(state, RenderState::Error);
        assert!(dash.view(Tab::Crypto).await.contains("Crypto data unavailable"));
        assert!(dash.view(Tab::Weather).await.is_empty());
        assert_eq!(dash.panel_state(Tab::Weather).await, RenderState::Idle);
    }
}
