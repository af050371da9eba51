use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::ShowcaseError;
use crate::config::ServerConfig;
use crate::contact::{ContactForm, ContactOutcome, MessageKind};
use crate::dashboard::Dashboard;
use crate::geolocation::PositionReport;
use crate::modal::{Dismissal, ModalKind};
use crate::panels::Tab;
use crate::panels::weather::ForecastRequest;
use crate::theme::{Theme, ThemeState};

const BODY_LIMIT_BYTES: usize = 16 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

/// Library errors as HTTP responses
#[derive(Debug)]
pub struct AppError(ShowcaseError);

impl From<ShowcaseError> for AppError {
    fn from(err: ShowcaseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ShowcaseError::Validation { .. } => StatusCode::BAD_REQUEST,
            ShowcaseError::Api { .. } => StatusCode::BAD_GATEWAY,
            ShowcaseError::Geolocation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ShowcaseError::Config { .. }
            | ShowcaseError::Storage { .. }
            | ShowcaseError::Io { .. }
            | ShowcaseError::General { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        let body = json!({
            "error": self.0.user_message(),
            "code": self.0.code().map(|code| code.to_string()),
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, AppError>;

#[derive(Deserialize)]
struct SearchInput {
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
struct OsPreference {
    os: Option<Theme>,
}

#[derive(Deserialize)]
struct OsChange {
    theme: Theme,
}

#[derive(Deserialize)]
struct PageClick {
    #[serde(default)]
    path: Vec<String>,
}

#[derive(Serialize)]
struct NavState {
    open: bool,
}

#[derive(Serialize)]
struct Closed {
    closed: Vec<&'static str>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/panels/{tab}", get(activate_panel))
        .route("/panels/{tab}/view", get(panel_view))
        .route("/weather/input", post(weather_input))
        .route("/weather/forecast", get(weather_forecast))
        .route("/movies/input", post(movie_input))
        .route("/movies/{id}", get(movie_detail))
        .route("/modals/{kind}/dismiss", post(dismiss_modal))
        .route("/modals", delete(reset_modals))
        .route("/keys/{key}", post(key_pressed))
        .route("/theme", get(load_theme).post(toggle_theme).delete(clear_theme))
        .route("/theme/os", post(os_theme_changed))
        .route("/nav/toggle", post(toggle_nav))
        .route("/nav/click", post(page_clicked))
        .route("/contact", post(contact))
        .with_state(state)
}

/// Full application: `/api` routes plus the static site
pub fn app(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", router(state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
                .layer(cors)
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                )),
        )
}

pub async fn run(config: &ServerConfig, dashboard: Arc<Dashboard>) -> anyhow::Result<()> {
    let app = app(AppState { dashboard }, &config.static_dir);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn activate_panel(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Query(position): Query<PositionReport>,
) -> ApiResult<Html<String>> {
    let tab: Tab = tab.parse()?;
    state.dashboard.activate(tab, &position).await;
    Ok(Html(state.dashboard.view(tab).await))
}

async fn panel_view(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> ApiResult<Html<String>> {
    let tab: Tab = tab.parse()?;
    Ok(Html(state.dashboard.view(tab).await))
}

async fn weather_input(State(state): State<AppState>, Json(input): Json<SearchInput>) -> StatusCode {
    state.dashboard.weather_input(input.value);
    StatusCode::ACCEPTED
}

async fn movie_input(State(state): State<AppState>, Json(input): Json<SearchInput>) -> StatusCode {
    state.dashboard.movie_input(input.value);
    StatusCode::ACCEPTED
}

async fn modal_fragment(state: &AppState, kind: ModalKind) -> Html<String> {
    Html(state.dashboard.modal_html(kind).await.unwrap_or_default())
}

async fn weather_forecast(
    State(state): State<AppState>,
    Query(request): Query<ForecastRequest>,
) -> Html<String> {
    state.dashboard.forecast(&request).await;
    modal_fragment(&state, ModalKind::Weather).await
}

async fn movie_detail(State(state): State<AppState>, Path(id): Path<u64>) -> Html<String> {
    state.dashboard.movie_detail(id).await;
    modal_fragment(&state, ModalKind::Movie).await
}

async fn dismiss_modal(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(dismissal): Json<Dismissal>,
) -> ApiResult<Json<Closed>> {
    let kind: ModalKind = kind.parse()?;
    let closed = if state.dashboard.dismiss(kind, &dismissal).await {
        vec![kind.id()]
    } else {
        Vec::new()
    };
    Ok(Json(Closed { closed }))
}

async fn reset_modals(State(state): State<AppState>) -> StatusCode {
    state.dashboard.reset_modals().await;
    StatusCode::NO_CONTENT
}

async fn key_pressed(State(state): State<AppState>, Path(key): Path<String>) -> Json<Closed> {
    let closed = state
        .dashboard
        .key(&key)
        .await
        .into_iter()
        .map(ModalKind::id)
        .collect();
    Json(Closed { closed })
}

async fn load_theme(
    State(state): State<AppState>,
    Query(query): Query<OsPreference>,
) -> Json<ThemeState> {
    Json(state.dashboard.load_theme(query.os).await)
}

async fn toggle_theme(State(state): State<AppState>) -> ApiResult<Json<ThemeState>> {
    Ok(Json(state.dashboard.toggle_theme().await?))
}

async fn clear_theme(State(state): State<AppState>) -> ApiResult<Json<ThemeState>> {
    Ok(Json(state.dashboard.clear_theme().await?))
}

async fn os_theme_changed(
    State(state): State<AppState>,
    Json(change): Json<OsChange>,
) -> Json<ThemeState> {
    Json(state.dashboard.os_theme_changed(change.theme).await)
}

async fn toggle_nav(State(state): State<AppState>) -> Json<NavState> {
    Json(NavState {
        open: state.dashboard.toggle_nav().await,
    })
}

async fn page_clicked(State(state): State<AppState>, Json(click): Json<PageClick>) -> Json<NavState> {
    Json(NavState {
        open: state.dashboard.page_clicked(&click.path).await,
    })
}

async fn contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> (StatusCode, Json<ContactOutcome>) {
    let outcome = state.dashboard.contact(&form);
    let status = match outcome.kind {
        MessageKind::Success => StatusCode::OK,
        MessageKind::Error => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(outcome))
}
