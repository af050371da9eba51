//! Static display tables: country codes, movie genres and crypto assets

use crate::{Result, ShowcaseError};

/// Display metadata for a tracked crypto asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub emoji: &'static str,
}

pub const CRYPTO_ASSETS: &[CryptoAsset] = &[
    CryptoAsset { id: "bitcoin", name: "Bitcoin", symbol: "BTC", emoji: "₿" },
    CryptoAsset { id: "ethereum", name: "Ethereum", symbol: "ETH", emoji: "Ξ" },
    CryptoAsset { id: "binancecoin", name: "BNB", symbol: "BNB", emoji: "🔶" },
    CryptoAsset { id: "ripple", name: "XRP", symbol: "XRP", emoji: "〰️" },
    CryptoAsset { id: "cardano", name: "Cardano", symbol: "ADA", emoji: "🔵" },
    CryptoAsset { id: "solana", name: "Solana", symbol: "SOL", emoji: "🟣" },
    CryptoAsset { id: "polkadot", name: "Polkadot", symbol: "DOT", emoji: "🔴" },
    CryptoAsset { id: "dogecoin", name: "Dogecoin", symbol: "DOGE", emoji: "🐕" },
    CryptoAsset { id: "chainlink", name: "Chainlink", symbol: "LINK", emoji: "🔗" },
];

/// Every genre id TMDB returns for movies
pub const TMDB_MOVIE_GENRE_IDS: &[u32] = &[
    28, 12, 16, 35, 80, 99, 18, 10751, 14, 36, 27, 10402, 9648, 10749, 878, 10770, 53, 10752, 37,
];

/// Genres shown on a movie card
pub const MAX_CARD_GENRES: usize = 3;

/// Full country name for an ISO 3166-1 alpha-2 code, or the code itself
#[must_use]
pub fn country_name(code: &str) -> &str {
    match code {
        "CH" => "Switzerland",
        "DE" => "Germany",
        "FR" => "France",
        "IT" => "Italy",
        "AT" => "Austria",
        "US" => "United States",
        "GB" => "United Kingdom",
        "CA" => "Canada",
        "AU" => "Australia",
        "JP" => "Japan",
        "CN" => "China",
        "IN" => "India",
        "BR" => "Brazil",
        "RU" => "Russia",
        "ES" => "Spain",
        "NL" => "Netherlands",
        "BE" => "Belgium",
        "SE" => "Sweden",
        "NO" => "Norway",
        "DK" => "Denmark",
        "FI" => "Finland",
        "IS" => "Iceland",
        "IE" => "Ireland",
        "PT" => "Portugal",
        other => other,
    }
}

/// Genre label for a TMDB genre id
#[must_use]
pub fn genre_name(id: u32) -> Option<&'static str> {
    let name = match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Sci-Fi",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        _ => return None,
    };
    Some(name)
}

/// Card genre labels: at most three, unmapped ids become "Unknown"
#[must_use]
pub fn genre_names(ids: &[u32]) -> Vec<String> {
    ids.iter()
        .take(MAX_CARD_GENRES)
        .map(|id| genre_name(*id).unwrap_or("Unknown").to_string())
        .collect()
}

#[must_use]
pub fn crypto_asset(id: &str) -> Option<&'static CryptoAsset> {
    CRYPTO_ASSETS.iter().find(|asset| asset.id == id)
}

/// Check the tables cover the value domains the panels will meet.
///
/// Run once at startup so an unmapped asset shows up as a config error
/// instead of a card labelled with a raw id.
pub fn validate(crypto_ids: &[String]) -> Result<()> {
    let missing_genres: Vec<String> = TMDB_MOVIE_GENRE_IDS
        .iter()
        .filter(|id| genre_name(**id).is_none())
        .map(ToString::to_string)
        .collect();
    if !missing_genres.is_empty() {
        return Err(ShowcaseError::config(format!(
            "Genre table is missing ids: {}",
            missing_genres.join(", ")
        )));
    }

    let missing_assets: Vec<&str> = crypto_ids
        .iter()
        .map(String::as_str)
        .filter(|id| crypto_asset(id).is_none())
        .collect();
    if !missing_assets.is_empty() {
        return Err(ShowcaseError::config(format!(
            "No display metadata for crypto ids: {}",
            missing_assets.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("GB", "United Kingdom")]
    #[case("CH", "Switzerland")]
    #[case("US", "United States")]
    #[case("XK", "XK")]
    fn test_country_name(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(country_name(code), expected);
    }

    #[test]
    fn test_genre_names_limit_and_fallback() {
        assert_eq!(genre_names(&[28, 1, 35, 18]), vec!["Action", "Unknown", "Comedy"]);
        assert!(genre_names(&[]).is_empty());
    }

    #[test]
    fn test_crypto_asset_lookup() {
        let asset = crypto_asset("cardano").unwrap();
        assert_eq!(asset.symbol, "ADA");
        assert!(crypto_asset("tether").is_none());
    }

    #[test]
    fn test_validate_default_domain() {
        let ids: Vec<String> = CRYPTO_ASSETS.iter().map(|a| a.id.to_string()).collect();
        assert!(validate(&ids).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_asset() {
        let err = validate(&["bitcoin".to_string(), "tether".to_string()]).unwrap_err();
        assert!(err.to_string().contains("tether"));
    }
}
