use async_trait::async_trait;
use tracing::instrument;

use super::{HttpClient, MovieProvider, require_key};
use crate::Result;
use crate::config::MovieConfig;
use crate::models::{MovieDetail, MovieListing};

/// TMDB client for popular listings, search and detail records
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: &MovieConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("Movies", config.timeout_seconds)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str, extra: &str) -> Result<String> {
        let key = require_key("Movies", self.api_key.as_deref())?;
        Ok(format!(
            "{}{endpoint}?api_key={key}&language=en-US{extra}",
            self.base_url
        ))
    }
}

#[async_trait]
impl MovieProvider for TmdbClient {
    #[instrument(skip(self))]
    async fn popular(&self) -> Result<MovieListing> {
        let url = self.url("/movie/popular", "&page=1")?;
        let page: tmdb::Page = self.http.get_json(&url).await?;
        Ok(page.into())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<MovieListing> {
        let extra = format!("&query={}&page=1", urlencoding::encode(query));
        let url = self.url("/search/movie", &extra)?;
        let page: tmdb::Page = self.http.get_json(&url).await?;
        Ok(page.into())
    }

    #[instrument(skip(self))]
    async fn detail(&self, id: u64) -> Result<MovieDetail> {
        let url = self.url(&format!("/movie/{id}"), "")?;
        let detail: tmdb::Detail = self.http.get_json(&url).await?;
        Ok(detail.into())
    }
}

/// TMDB response structures
mod tmdb {
    use serde::Deserialize;

    use crate::lookup::genre_names;
    use crate::models::movie::release_year;
    use crate::models::{MovieDetail, MovieListing, MovieSummary};

    #[derive(Debug, Deserialize)]
    pub struct Movie {
        pub id: u64,
        pub title: String,
        #[serde(default)]
        pub release_date: Option<String>,
        #[serde(default)]
        pub poster_path: Option<String>,
        #[serde(default)]
        pub vote_average: Option<f64>,
        #[serde(default)]
        pub genre_ids: Vec<u32>,
        #[serde(default)]
        pub overview: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Page {
        #[serde(default)]
        pub results: Vec<Movie>,
        #[serde(default)]
        pub total_results: u64,
    }

    impl From<Movie> for MovieSummary {
        fn from(movie: Movie) -> Self {
            MovieSummary {
                id: movie.id,
                year: release_year(movie.release_date.as_deref()),
                title: movie.title,
                poster_path: movie.poster_path,
                rating: movie.vote_average,
                genres: genre_names(&movie.genre_ids),
                overview: movie.overview.unwrap_or_default(),
            }
        }
    }

    impl From<Page> for MovieListing {
        fn from(page: Page) -> Self {
            MovieListing {
                items: page.results.into_iter().map(MovieSummary::from).collect(),
                total_results: page.total_results,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct Genre {
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Country {
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Detail {
        pub id: u64,
        pub title: String,
        #[serde(default)]
        pub release_date: Option<String>,
        #[serde(default)]
        pub poster_path: Option<String>,
        #[serde(default)]
        pub vote_average: Option<f64>,
        #[serde(default)]
        pub vote_count: u64,
        #[serde(default)]
        pub genres: Vec<Genre>,
        #[serde(default)]
        pub overview: Option<String>,
        #[serde(default)]
        pub runtime: Option<u32>,
        #[serde(default)]
        pub budget: u64,
        #[serde(default)]
        pub revenue: u64,
        #[serde(default)]
        pub production_countries: Vec<Country>,
    }

    impl From<Detail> for MovieDetail {
        fn from(detail: Detail) -> Self {
            MovieDetail {
                id: detail.id,
                year: release_year(detail.release_date.as_deref()),
                title: detail.title,
                poster_path: detail.poster_path,
                rating: detail.vote_average,
                genres: detail.genres.into_iter().map(|g| g.name).collect(),
                overview: detail.overview.unwrap_or_default(),
                vote_count: detail.vote_count,
                runtime: detail.runtime.filter(|&minutes| minutes > 0),
                budget: Some(detail.budget).filter(|&b| b > 0),
                revenue: Some(detail.revenue).filter(|&r| r > 0),
                production_countries: detail
                    .production_countries
                    .into_iter()
                    .map(|c| c.name)
                    .collect(),
            }
        }
    }
}
