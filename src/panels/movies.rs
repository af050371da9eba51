use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{PanelSlot, Tab};
use crate::Result;
use crate::api::MovieProvider;
use crate::config::SearchConfig;
use crate::document::{Document, SharedDocument};
use crate::html::{error_block, escape_html, format_count, loading_block, no_results};
use crate::modal::{self, ModalKind, ModalView};
use crate::models::{MovieDetail, MovieListing, MovieSummary};
use crate::widget::{Debouncer, QueryMode, RenderState, RequestSequence};

const NO_POSTER_CARD: &str = "https://via.placeholder.com/500x750/cccccc/666666?text=No+Poster";
const NO_POSTER_MODAL: &str = "https://via.placeholder.com/300x450/cccccc/666666?text=No+Poster";

/// Movie search panel with the detail modal
pub struct MoviePanel {
    slot: PanelSlot,
    provider: Arc<dyn MovieProvider>,
    search: SearchConfig,
    image_base_url: String,
    debouncer: Debouncer,
    detail_sequence: RequestSequence,
}

impl MoviePanel {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        search: SearchConfig,
        image_base_url: impl Into<String>,
    ) -> Self {
        let debouncer = Debouncer::new(Duration::from_millis(search.debounce_ms));
        Self {
            slot: PanelSlot::new(Tab::Movies),
            provider,
            search,
            image_base_url: image_base_url.into(),
            debouncer,
            detail_sequence: RequestSequence::new(),
        }
    }

    pub async fn state(&self) -> RenderState {
        self.slot.state().await
    }

    /// Tab activation: show popular movies
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
                render_interface(query, "Loading movies...", &loading_block("Loading movies...")),
            )
            .await;

        let (state, html) = match self.fetch(&mode).await {
            Ok((info, movies)) if movies.is_empty() => (
                RenderState::Empty,
                render_interface(
                    query,
                    &info,
                    &no_results("🎭 No movies found", "Try searching for something else..."),
                ),
            ),
            Ok((info, movies)) => (
                RenderState::Content,
                render_interface(query, &info, &self.render_cards(&movies)),
            ),
            Err(err) => {
                warn!("Movie search failed: {}", err);
                (
                    RenderState::Error,
                    render_interface(
                        query,
                        "Movies unavailable",
                        &error_block("⚠️", "Movie API unavailable", &err.user_message(), Some("movies")),
                    ),
                )
            }
        };

        self.slot.commit(doc, ticket, state, html).await;
        self.slot.state().await
    }

    async fn fetch(&self, mode: &QueryMode) -> Result<(String, Vec<MovieSummary>)> {
        let (info, listing): (String, MovieListing) = match mode {
            QueryMode::Default => (
                "Showing popular movies".to_string(),
                self.provider.popular().await?,
            ),
            QueryMode::Search(query) => {
                let listing = self.provider.search(query).await?;
                info!("{} movies for {:?}", listing.total_results, query);
                (
                    format!("Found {} movies for \"{}\"", listing.total_results, query),
                    listing,
                )
            }
        };

        let mut movies = listing.items;
        movies.truncate(self.search.max_movie_results);
        Ok((info, movies))
    }

    fn poster_url(&self, poster_path: Option<&str>, fallback: &str) -> String {
        match poster_path {
            Some(path) => format!("{}{}", self.image_base_url, path),
            None => fallback.to_string(),
        }
    }

    fn render_cards(&self, movies: &[MovieSummary]) -> String {
        movies.iter().map(|movie| self.render_card(movie)).collect()
    }

    fn render_card(&self, movie: &MovieSummary) -> String {
        let genres = if movie.genres.is_empty() {
            "Unknown Genre".to_string()
        } else {
            movie.genres.join(", ")
        };
        format!(
            r#"<div class="movie-card">
<div class="movie-poster"><img src="{poster}" alt="{title} Poster" class="poster-img"><div class="movie-rating"><span class="rating-star">⭐</span><span class="rating-value">{rating}</span></div></div>
<div class="movie-info"><div class="movie-title"><h4>{title}</h4><span class="movie-year">{year}</span></div>
<div class="movie-genre">{genres}</div>
<div class="movie-overview">{overview}</div>
<div class="movie-actions"><button class="movie-btn primary full-width" data-movie-id="{id}"><span class="btn-icon">📖</span><span class="btn-text">View Details</span></button></div></div>
</div>"#,
            poster = escape_html(&self.poster_url(movie.poster_path.as_deref(), NO_POSTER_CARD)),
            title = escape_html(&movie.title),
            rating = movie
                .rating
                .filter(|r| *r > 0.0)
                .map_or_else(|| "N/A".to_string(), |r| format!("{r:.1}")),
            year = escape_html(movie.year.as_deref().unwrap_or("N/A")),
            genres = escape_html(&genres),
            overview = escape_html(&movie.short_overview()),
            id = movie.id,
        )
    }

    /// Open the detail modal for one movie
    #[instrument(skip(self, doc))]
    pub async fn detail(&self, doc: &Mutex<Document>, id: u64) -> RenderState {
        let ticket = self.detail_sequence.issue();
        modal::show(&mut *doc.lock().await, ModalKind::Movie, &ModalView::Loading);

        let outcome = self.provider.detail(id).await;

        if !self.detail_sequence.is_current(ticket) {
            return RenderState::Loading;
        }

        let mut doc = doc.lock().await;
        // Closed while loading
        if doc.modal(ModalKind::Movie.id()).is_none() {
            return RenderState::Idle;
        }
        match outcome {
            Ok(movie) => {
                modal::show(&mut doc, ModalKind::Movie, &ModalView::Content(self.render_detail(&movie)));
                RenderState::Content
            }
            Err(err) => {
                warn!("Movie detail failed: {}", err);
                modal::show(&mut doc, ModalKind::Movie, &ModalView::Error);
                RenderState::Error
            }
        }
    }

    fn render_detail(&self, movie: &MovieDetail) -> String {
        let genres: String = movie
            .genres
            .iter()
            .map(|g| format!(r#"<span class="genre-tag">{}</span>"#, escape_html(g)))
            .collect();

        let mut stats = format!(
            r#"<div class="stat-item"><span class="stat-label">Votes</span><span class="stat-value">{}</span></div>"#,
            format_count(movie.vote_count)
        );
        for (label, amount) in [("Budget", movie.budget), ("Revenue", movie.revenue)] {
            if let Some(amount) = amount {
                stats.push_str(&format!(
                    r#"<div class="stat-item"><span class="stat-label">{label}</span><span class="stat-value">${}</span></div>"#,
                    format_count(amount)
                ));
            }
        }

        let countries = if movie.production_countries.is_empty() {
            String::new()
        } else {
            format!(
                r#"<div class="modal-countries"><span class="countries-label">Production:</span><span class="countries-list">{}</span></div>"#,
                escape_html(&movie.production_countries.join(", "))
            )
        };

        format!(
            r#"<div class="modal-movie-info"><div class="modal-poster"><img src="{poster}" alt="{title} Poster"></div>
<div class="modal-details"><h2>{title}</h2>
<div class="modal-meta"><span class="modal-year">{year}</span><span class="modal-runtime">{runtime}</span><span class="modal-rating">⭐ {rating}/10</span></div>
<div class="modal-genres">{genres}</div>
<div class="modal-overview"><h4>Overview</h4><p>{overview}</p></div>
<div class="modal-stats">{stats}</div>{countries}</div></div>"#,
            poster = escape_html(&self.poster_url(movie.poster_path.as_deref(), NO_POSTER_MODAL)),
            title = escape_html(&movie.title),
            year = escape_html(movie.year.as_deref().unwrap_or("N/A")),
            runtime = movie
                .runtime
                .map_or_else(|| "Unknown".to_string(), |m| format!("{m} min")),
            rating = movie
                .rating
                .map_or_else(|| "N/A".to_string(), |r| format!("{r:.1}")),
            overview = escape_html(if movie.overview.is_empty() {
                "No description available."
            } else {
                movie.overview.as_str()
            }),
        )
    }
}

fn render_interface(query: &str, info: &str, body: &str) -> String {
    format!(
        r#"<div class="movies-header"><h3>🎬 Movie Search Engine</h3>
<div class="movies-search"><input type="text" id="movie-search" value="{query}" placeholder="Search any movie... (e.g. 'Avengers', 'Batman', 'Star Wars')"><span class="search-icon">🔍</span></div>
<p class="search-info" id="search-info">{info}</p></div>
<div class="movies-cards" id="movies-cards">{body}</div>
<div class="movies-footer"><p class="movies-disclaimer">🎬 Real-time movie data from The Movie Database (TMDB) API</p></div>"#,
        query = escape_html(query),
        info = escape_html(info),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCode, ShowcaseError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeMovies {
        search_results: Vec<MovieSummary>,
        search_calls: AtomicUsize,
    }

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            year: Some("2008".to_string()),
            poster_path: Some(format!("/{id}.jpg")),
            rating: Some(8.5),
            genres: vec!["Action".to_string(), "Crime".to_string()],
            overview: "x".repeat(150),
        }
    }

    #[async_trait]
    impl MovieProvider for FakeMovies {
        async fn popular(&self) -> Result<MovieListing> {
            Ok(MovieListing {
                items: (1..=20).map(|i| movie(i, &format!("Popular {i}"))).collect(),
                total_results: 10_000,
            })
        }

        async fn search(&self, _query: &str) -> Result<MovieListing> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(MovieListing {
                items: self.search_results.clone(),
                total_results: 57,
            })
        }

        async fn detail(&self, id: u64) -> Result<MovieDetail> {
            if id == 404 {
                return Err(ShowcaseError::api_with_context(
                    "missing",
                    ErrorCode::ApiNotFound,
                    HashMap::new(),
                ));
            }
            Ok(MovieDetail {
                id,
                title: "The Dark Knight".to_string(),
                year: Some("2008".to_string()),
                poster_path: None,
                rating: Some(8.52),
                genres: vec!["Drama".to_string(), "Action".to_string()],
                overview: String::new(),
                vote_count: 33_100,
                runtime: Some(152),
                budget: Some(185_000_000),
                revenue: None,
                production_countries: vec!["United Kingdom".to_string()],
            })
        }
    }

    fn panel(results: Vec<MovieSummary>) -> (MoviePanel, Arc<FakeMovies>) {
        let fake = Arc::new(FakeMovies {
            search_results: results,
            search_calls: AtomicUsize::new(0),
        });
        let panel = MoviePanel::new(fake.clone(), SearchConfig::default(), "https://image.tmdb.org/t/p/w500");
        (panel, fake)
    }

    #[tokio::test]
    async fn test_popular_limited_to_twelve() {
        let (movies, fake) = panel(vec![]);
        let doc = Mutex::new(Document::new());

        assert_eq!(movies.load(&doc).await, RenderState::Content);

        assert_eq!(fake.search_calls.load(Ordering::SeqCst), 0);
        let doc = doc.lock().await;
        let html = doc.container("movies-grid").unwrap();
        assert_eq!(html.matches(r#"class="movie-card""#).count(), 12);
        assert!(html.contains("Showing popular movies"));
        assert!(html.contains("https://image.tmdb.org/t/p/w500/1.jpg"));
    }

    #[tokio::test]
    async fn test_search_info_uses_total_results() {
        let (movies, _fake) = panel(vec![movie(155, "The Dark Knight")]);
        let doc = Mutex::new(Document::new());

        assert_eq!(movies.search(&doc, "dark knight").await, RenderState::Content);

        let doc = doc.lock().await;
        let html = doc.container("movies-grid").unwrap();
        assert!(html.contains("Found 57 movies for &quot;dark knight&quot;"));
        assert!(html.contains("Action, Crime"));
        assert!(html.contains(&format!("{}...", "x".repeat(120))));
    }

    #[tokio::test]
    async fn test_no_matches_is_empty() {
        let (movies, _fake) = panel(vec![]);
        let doc = Mutex::new(Document::new());

        assert_eq!(movies.search(&doc, "qqqq").await, RenderState::Empty);
        assert!(doc.lock().await.container("movies-grid").unwrap().contains("No movies found"));
    }

    #[tokio::test]
    async fn test_detail_modal() {
        let (movies, _fake) = panel(vec![]);
        let doc = Mutex::new(Document::new());

        assert_eq!(movies.detail(&doc, 155).await, RenderState::Content);
        {
            let doc = doc.lock().await;
            let html = &doc.modal("movie-modal").unwrap().html;
            assert!(html.contains("152 min"));
            assert!(html.contains("⭐ 8.5/10"));
            assert!(html.contains("$185,000,000"));
            assert!(!html.contains("Revenue"));
            assert!(html.contains("33,100"));
            assert!(html.contains("No description available."));
        }

        assert_eq!(movies.detail(&doc, 404).await, RenderState::Error);
        let doc = doc.lock().await;
        assert!(doc.modal("movie-modal").unwrap().html.contains("couldn't load movie details"));
        assert_eq!(doc.modal_count(), 1);
    }
}
