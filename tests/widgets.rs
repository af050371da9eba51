mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeMovies, FakeWeather, dashboard, dashboard_with};
use showcase::models::CityCandidate;
use showcase::panels::MoviePanel;
use showcase::panels::weather::ForecastRequest;
use showcase::storage::{MemoryPreferenceStore, PreferenceStore};
use showcase::{
    Document, ModalKind, PositionReport, RenderState, ShowcaseConfig, ShowcaseError, Tab, Theme,
};

fn london_hits() -> Vec<CityCandidate> {
    vec![
        CityCandidate::new("London", "GB", 51.5073, -0.1276),
        CityCandidate::new("London", "GB", 51.5085, -0.1257),
        CityCandidate::new("London", "CA", 42.9832, -81.2434),
        CityCandidate::new("Londrina", "BR", -23.3045, -51.1696),
        CityCandidate::new("Londonderry", "GB", 54.9966, -7.3086),
        CityCandidate::new("London Colney", "GB", 51.7260, -0.3000),
        CityCandidate::new("Londiani", "KE", -0.1667, 35.6000),
        CityCandidate::new("Londerzeel", "BE", 51.0050, 4.3010),
    ]
}

async fn wait_for_debounce() {
    tokio::time::sleep(Duration::from_millis(600)).await;
}

#[tokio::test(start_paused = true)]
async fn test_typing_lond_renders_deduplicated_cities() {
    let weather = Arc::new(FakeWeather::with_hits(london_hits()));
    let dash = dashboard(weather.clone());
    let none = PositionReport::default();

    assert_eq!(dash.activate(Tab::Weather, &none).await, RenderState::Content);
    assert_eq!(weather.current_calls(), 6);

    for typed in ["L", "Lo", "Lon", "Lond"] {
        dash.weather_input(typed.to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(weather.searched().is_empty());
    wait_for_debounce().await;

    assert_eq!(weather.searched(), vec![("Lond".to_string(), 12)]);
    assert_eq!(weather.current_calls(), 12);
    assert_eq!(dash.panel_state(Tab::Weather).await, RenderState::Content);

    let html = dash.view(Tab::Weather).await;
    assert!(html.contains(r#"Found weather for 6 cities matching &quot;Lond&quot;"#));
    assert_eq!(html.matches("weather-card enhanced").count(), 6);
    assert_eq!(html.matches("<h4>London</h4>").count(), 2);
    assert!(html.contains("United Kingdom"));
    assert!(html.contains("Canada"));
    assert!(html.contains("<h4>Londiani</h4>"));
    assert!(!html.contains("Londerzeel"));
    assert!(!html.contains("<h4>Visp</h4>"));
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_keystrokes_sends_one_request() {
    let weather = Arc::new(FakeWeather::with_hits(london_hits()));
    let dash = dashboard(weather.clone());

    for typed in ["Z", "Zu", "Zur", "Zuri", "Zurich"] {
        dash.weather_input(typed.to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    wait_for_debounce().await;
    wait_for_debounce().await;

    assert_eq!(weather.searched(), vec![("Zurich".to_string(), 12)]);
}

#[tokio::test(start_paused = true)]
async fn test_short_query_never_searches() {
    let weather = Arc::new(FakeWeather::with_hits(london_hits()));
    let dash = dashboard(weather.clone());

    dash.weather_input(" L ".to_string());
    wait_for_debounce().await;

    assert!(weather.searched().is_empty());
    assert_eq!(weather.current_calls(), 6);
    assert!(dash.view(Tab::Weather).await.contains("Showing popular Swiss cities"));
}

#[tokio::test(start_paused = true)]
async fn test_stale_search_is_discarded() {
    let movies = Arc::new(FakeMovies {
        delays: [("Dune".to_string(), Duration::from_secs(2))].into(),
        misses: vec!["Xyzzy".to_string()],
        ..FakeMovies::default()
    });
    let config = ShowcaseConfig::default();
    let panel = MoviePanel::new(movies.clone(), config.search.clone(), config.movies.image_base_url);
    let doc = Document::shared();

    let (slow, fast) = tokio::join!(panel.search(&doc, "Dune"), panel.search(&doc, "Xyzzy"));

    // the late result is dropped and the caller sees what is on screen
    assert_eq!(fast, RenderState::Empty);
    assert_eq!(slow, RenderState::Empty);
    assert_eq!(panel.state().await, RenderState::Empty);
    let doc = doc.lock().await;
    let html = doc.container(Tab::Movies.container_id()).unwrap();
    assert!(html.contains("No movies found"));
    assert!(!html.contains("Dune result"));
    assert_eq!(movies.searches.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_forecast_closed_while_loading_stays_closed() {
    let weather = Arc::new(FakeWeather {
        forecast_delay: Some(Duration::from_secs(2)),
        ..FakeWeather::default()
    });
    let dash = dashboard(weather.clone());
    let request = ForecastRequest {
        lat: 47.3769,
        lon: 8.5417,
        city: "Zurich".to_string(),
        country: "CH".to_string(),
    };

    let (state, closed) = tokio::join!(dash.forecast(&request), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(dash.modal_html(ModalKind::Weather).await.unwrap().contains("spinner"));
        dash.key("Escape").await
    });

    assert_eq!(closed, vec![ModalKind::Weather]);
    assert_eq!(state, RenderState::Idle);
    assert!(dash.modal_html(ModalKind::Weather).await.is_none());
    let doc = dash.document();
    let doc = doc.lock().await;
    assert_eq!(doc.key_listener_count(), 0);
    assert!(!doc.body_has_class("modal-open"));
}

#[tokio::test(start_paused = true)]
async fn test_movie_detail_closed_while_loading_stays_closed() {
    let movies = Arc::new(FakeMovies {
        detail_delay: Some(Duration::from_secs(2)),
        ..FakeMovies::default()
    });
    let dash = dashboard_with(
        Arc::new(FakeWeather::default()),
        movies,
        Arc::new(MemoryPreferenceStore::new()),
    );

    let (state, dismissed) = tokio::join!(dash.movie_detail(157_336), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        dash.dismiss(ModalKind::Movie, &showcase::modal::Dismissal::Backdrop { on_content: false })
            .await
    });

    assert!(dismissed);
    assert_eq!(state, RenderState::Idle);
    assert!(dash.modal_html(ModalKind::Movie).await.is_none());
    let doc = dash.document();
    assert!(!doc.lock().await.body_has_class("modal-open"));
}

#[tokio::test]
async fn test_popular_movies_capped_at_twelve() {
    let dash = dashboard(Arc::new(FakeWeather::default()));

    dash.activate(Tab::Movies, &PositionReport::default()).await;

    let html = dash.view(Tab::Movies).await;
    assert!(html.contains("Showing popular movies"));
    assert_eq!(html.matches(r#"class="movie-card""#).count(), 12);
}

#[tokio::test]
async fn test_modal_is_single_instance() {
    let weather = Arc::new(FakeWeather::default());
    let dash = dashboard(weather.clone());
    let request = ForecastRequest {
        lat: 46.9481,
        lon: 7.4474,
        city: "Bern".to_string(),
        country: "CH".to_string(),
    };

    assert_eq!(dash.forecast(&request).await, RenderState::Content);
    assert_eq!(dash.forecast(&request).await, RenderState::Content);

    {
        let doc = dash.document();
        let doc = doc.lock().await;
        assert_eq!(doc.modal_count(), 1);
        assert_eq!(doc.key_listener_count(), 1);
        assert!(doc.body_has_class("modal-open"));
    }
    let html = dash.modal_html(ModalKind::Weather).await.unwrap();
    assert!(html.contains("Bern, Switzerland"));
    assert_eq!(html.matches(r#"class="forecast-day""#).count(), 3);

    assert_eq!(dash.key("Escape").await, vec![ModalKind::Weather]);
    assert!(dash.key("Escape").await.is_empty());

    let doc = dash.document();
    let doc = doc.lock().await;
    assert_eq!(doc.modal_count(), 0);
    assert_eq!(doc.key_listener_count(), 0);
    assert!(!doc.body_has_class("modal-open"));
}

#[tokio::test]
async fn test_movie_modal_dismissal_paths() {
    let dash = dashboard(Arc::new(FakeWeather::default()));

    assert_eq!(dash.movie_detail(157_336).await, RenderState::Content);
    let html = dash.modal_html(ModalKind::Movie).await.unwrap();
    assert!(html.contains("Interstellar"));
    assert!(html.contains("$165,000,000"));
    assert!(!html.contains("Revenue"));

    let on_content = showcase::modal::Dismissal::Backdrop { on_content: true };
    assert!(!dash.dismiss(ModalKind::Movie, &on_content).await);
    assert!(dash.modal_html(ModalKind::Movie).await.is_some());

    let close = showcase::modal::Dismissal::CloseButton;
    assert!(dash.dismiss(ModalKind::Movie, &close).await);
    assert!(dash.modal_html(ModalKind::Movie).await.is_none());

    // nothing left to close
    assert!(dash.dismiss(ModalKind::Movie, &close).await);
}

#[tokio::test]
async fn test_theme_precedence() {
    let store = Arc::new(MemoryPreferenceStore::new());
    store.put("theme", "dark").await.unwrap();
    let dash = dashboard_with(
        Arc::new(FakeWeather::default()),
        Arc::new(FakeMovies::default()),
        store.clone(),
    );

    let state = dash.load_theme(Some(Theme::Light)).await;
    assert_eq!(state.theme, Theme::Dark);
    assert!(state.stored);

    assert_eq!(dash.os_theme_changed(Theme::Light).await.theme, Theme::Dark);

    dash.clear_theme().await.unwrap();
    assert_eq!(dash.os_theme_changed(Theme::Light).await.theme, Theme::Light);

    let doc = dash.document();
    let doc = doc.lock().await;
    assert_eq!(doc.root_attribute("data-theme"), Some("light"));
    assert_eq!(doc.text("theme-icon"), Some("🌙"));
}

#[tokio::test]
async fn test_unknown_tab_is_rejected() {
    let dash = dashboard(Arc::new(FakeWeather::default()));
    let none = PositionReport::default();
    dash.activate(Tab::Crypto, &none).await;

    let err = dash.select("stocks", &none).await.unwrap_err();

    assert!(matches!(err, ShowcaseError::Validation { .. }));
    assert_eq!(dash.active_tab().await, Some(Tab::Crypto));
    assert!(dash.view(Tab::Crypto).await.contains("1 USD = 0.90 CHF"));
}

#[tokio::test]
async fn test_world_panel_degrades_to_placeholders() {
    let dash = dashboard(Arc::new(FakeWeather::default()));
    let position = PositionReport::at(46.948, 7.4474, 20.0);

    assert_eq!(dash.activate(Tab::World, &position).await, RenderState::Content);

    let html = dash.view(Tab::World).await;
    assert!(html.contains("Unknown City"));
    assert!(html.contains("46.9480°"));
}
