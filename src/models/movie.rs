//! Movie catalog listings and detail records

use serde::{Deserialize, Serialize};

/// Overview length on a card before it is cut
pub const CARD_OVERVIEW_CHARS: usize = 120;

/// A movie as it appears in a listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub year: Option<String>,
    pub poster_path: Option<String>,
    pub rating: Option<f64>,
    /// Up to three genre labels
    pub genres: Vec<String>,
    pub overview: String,
}

impl MovieSummary {
    /// Overview trimmed for a card, with an ellipsis when cut
    #[must_use]
    pub fn short_overview(&self) -> String {
        if self.overview.is_empty() {
            return "No description available.".to_string();
        }
        if self.overview.chars().count() > CARD_OVERVIEW_CHARS {
            let cut: String = self.overview.chars().take(CARD_OVERVIEW_CHARS).collect();
            format!("{cut}...")
        } else {
            self.overview.clone()
        }
    }
}

/// A page of movies plus the total hit count reported by the catalog
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MovieListing {
    pub items: Vec<MovieSummary>,
    pub total_results: u64,
}

/// Full record shown in the detail modal
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub year: Option<String>,
    pub poster_path: Option<String>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_count: u64,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    /// Budget in USD, absent when unknown
    pub budget: Option<u64>,
    /// Revenue in USD, absent when unknown
    pub revenue: Option<u64>,
    pub production_countries: Vec<String>,
}

/// Year part of a `YYYY-MM-DD` release date
#[must_use]
pub fn release_year(release_date: Option<&str>) -> Option<String> {
    release_date
        .and_then(|date| date.split('-').next())
        .filter(|year| !year.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(overview: &str) -> MovieSummary {
        MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            year: Some("1999".to_string()),
            poster_path: None,
            rating: Some(8.2),
            genres: vec!["Action".to_string()],
            overview: overview.to_string(),
        }
    }

    #[test]
    fn test_short_overview() {
        assert_eq!(summary("").short_overview(), "No description available.");
        assert_eq!(summary("Short.").short_overview(), "Short.");

        let long = "x".repeat(200);
        let short = summary(&long).short_overview();
        assert_eq!(short.chars().count(), CARD_OVERVIEW_CHARS + 3);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year(Some("1999-03-30")).as_deref(), Some("1999"));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(None), None);
    }
}
