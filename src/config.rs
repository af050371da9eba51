//! Configuration management for the showcase host
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ShowcaseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the showcase host
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShowcaseConfig {
    /// HTTP host settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Movie catalog API configuration
    #[serde(default)]
    pub movies: MovieConfig,
    /// Crypto pricing configuration
    #[serde(default)]
    pub crypto: CryptoConfig,
    /// Reverse geocoding configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Search widget behavior
    #[serde(default)]
    pub search: SearchConfig,
    /// Preference storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Contact form settings
    #[serde(default)]
    pub contact: ContactConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory with the static site
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Current weather endpoint
    #[serde(default = "default_weather_url")]
    pub current_url: String,
    /// 5-day/3-hour forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Direct geocoding (city search) endpoint
    #[serde(default = "default_geo_url")]
    pub geo_url: String,
    /// Base URL for condition icons
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Movie catalog configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieConfig {
    /// TMDB API key
    pub api_key: Option<String>,
    /// API base URL
    #[serde(default = "default_movie_base_url")]
    pub base_url: String,
    /// Poster image base URL
    #[serde(default = "default_movie_image_base")]
    pub image_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Crypto pricing configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// Price API base URL
    #[serde(default = "default_crypto_base_url")]
    pub base_url: String,
    /// Exchange rate endpoint (USD base)
    #[serde(default = "default_exchange_url")]
    pub exchange_url: String,
    /// Asset ids in display order
    #[serde(default = "default_crypto_ids")]
    pub ids: Vec<String>,
    /// Currency code prices are converted into
    #[serde(default = "default_local_currency")]
    pub local_currency: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Reverse geocoding configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Reverse geocoding base URL
    #[serde(default = "default_reverse_url")]
    pub reverse_url: String,
    /// Timezone used when the client does not report one
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    /// How long to wait for a device reading, in seconds
    #[serde(default = "default_position_timeout")]
    pub position_timeout_seconds: u32,
    /// How old a cached device reading may be, in seconds
    #[serde(default = "default_position_max_age")]
    pub position_max_age_seconds: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Search widget configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet time before a keystroke triggers a request
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Queries shorter than this fall back to the default set
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Number of city candidates requested from the geocoder
    #[serde(default = "default_city_search_limit")]
    pub city_search_limit: u32,
    /// Cities kept after deduplication
    #[serde(default = "default_max_weather_results")]
    pub max_weather_results: usize,
    /// Movies shown per listing
    #[serde(default = "default_max_movie_results")]
    pub max_movie_results: usize,
}

/// Preference storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the preference database
    #[serde(default = "default_storage_location")]
    pub location: String,
}

/// Contact form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Address the generated mailto link points at
    #[serde(default = "default_contact_recipient")]
    pub recipient: String,
    /// Name used in the greeting line
    #[serde(default = "default_contact_owner")]
    pub owner_name: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "site".to_string()
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_forecast_url() -> String {
    "https://api.openweathermap.org/data/2.5/forecast".to_string()
}

fn default_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0/direct".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

fn default_timeout() -> u32 {
    15
}

fn default_movie_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_movie_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_crypto_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_exchange_url() -> String {
    "https://api.exchangerate-api.com/v4/latest/USD".to_string()
}

fn default_crypto_ids() -> Vec<String> {
    [
        "bitcoin",
        "ethereum",
        "binancecoin",
        "ripple",
        "cardano",
        "solana",
        "polkadot",
        "dogecoin",
        "chainlink",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_local_currency() -> String {
    "CHF".to_string()
}

fn default_reverse_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timezone() -> String {
    "Europe/Zurich".to_string()
}

fn default_position_timeout() -> u32 {
    10
}

fn default_position_max_age() -> u32 {
    300
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    2
}

fn default_city_search_limit() -> u32 {
    12
}

fn default_max_weather_results() -> usize {
    6
}

fn default_max_movie_results() -> usize {
    12
}

fn default_storage_location() -> String {
    "~/.local/share/showcase".to_string()
}

fn default_contact_recipient() -> String {
    "hello@example.com".to_string()
}

fn default_contact_owner() -> String {
    "there".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            current_url: default_weather_url(),
            forecast_url: default_forecast_url(),
            geo_url: default_geo_url(),
            icon_base_url: default_icon_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for MovieConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_movie_base_url(),
            image_base_url: default_movie_image_base(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            base_url: default_crypto_base_url(),
            exchange_url: default_exchange_url(),
            ids: default_crypto_ids(),
            local_currency: default_local_currency(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            reverse_url: default_reverse_url(),
            default_timezone: default_timezone(),
            position_timeout_seconds: default_position_timeout(),
            position_max_age_seconds: default_position_max_age(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            city_search_limit: default_city_search_limit(),
            max_weather_results: default_max_weather_results(),
            max_movie_results: default_max_movie_results(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: default_storage_location(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: default_contact_recipient(),
            owner_name: default_contact_owner(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ShowcaseConfig {
    /// Load configuration from `config_path`, or the default locations when
    /// none is given, then apply environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SHOWCASE_WEATHER__API_KEY=... style overrides
        builder = builder.add_source(
            Environment::with_prefix("SHOWCASE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("crypto.ids"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ShowcaseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("showcase").join("config.toml"))
    }

    /// Storage location with a leading `~` expanded
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        match self.storage.location.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(rest)),
            None => PathBuf::from(&self.storage.location),
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.movies.timeout_seconds == 0 {
            self.movies.timeout_seconds = default_timeout();
        }
        if self.crypto.timeout_seconds == 0 {
            self.crypto.timeout_seconds = default_timeout();
        }
        if self.crypto.local_currency.is_empty() {
            self.crypto.local_currency = default_local_currency();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.geocoding.default_timezone.is_empty() {
            self.geocoding.default_timezone = default_timezone();
        }
        if self.search.debounce_ms == 0 {
            self.search.debounce_ms = default_debounce_ms();
        }
        if self.search.min_query_len == 0 {
            self.search.min_query_len = default_min_query_len();
        }
        if self.storage.location.is_empty() {
            self.storage.location = default_storage_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        Self::validate_api_key("Weather", self.weather.api_key.as_deref())?;
        Self::validate_api_key("Movie", self.movies.api_key.as_deref())?;
        Ok(())
    }

    fn validate_api_key(service: &str, api_key: Option<&str>) -> Result<()> {
        // Keys are optional: panels without one fail at request time
        if let Some(api_key) = api_key {
            if api_key.is_empty() {
                return Err(ShowcaseError::config(format!(
                    "{service} API key cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }

            if api_key.len() < 8 {
                return Err(ShowcaseError::config(format!(
                    "{service} API key appears to be invalid (too short). Please check your API key."
                ))
                .into());
            }

            if api_key.len() > 100 {
                return Err(ShowcaseError::config(format!(
                    "{service} API key appears to be invalid (too long). Please check your API key."
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (service, timeout) in [
            ("Weather", self.weather.timeout_seconds),
            ("Movie", self.movies.timeout_seconds),
            ("Crypto", self.crypto.timeout_seconds),
            ("Geocoding", self.geocoding.timeout_seconds),
        ] {
            if timeout > 300 {
                return Err(ShowcaseError::config(format!(
                    "{service} API timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        if !(50..=5000).contains(&self.search.debounce_ms) {
            return Err(
                ShowcaseError::config("Search debounce must be between 50 and 5000 ms").into(),
            );
        }

        if self.search.max_weather_results == 0 || self.search.max_weather_results > 20 {
            return Err(
                ShowcaseError::config("Weather results must be between 1 and 20").into(),
            );
        }

        if self.search.max_movie_results == 0 || self.search.max_movie_results > 20 {
            return Err(ShowcaseError::config("Movie results must be between 1 and 20").into());
        }

        if self.search.city_search_limit < self.search.max_weather_results as u32 {
            return Err(ShowcaseError::config(
                "City search limit cannot be smaller than the number of weather results",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ShowcaseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ShowcaseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather", &self.weather.current_url),
            ("Forecast", &self.weather.forecast_url),
            ("City search", &self.weather.geo_url),
            ("Movie", &self.movies.base_url),
            ("Crypto", &self.crypto.base_url),
            ("Exchange rate", &self.crypto.exchange_url),
            ("Reverse geocoding", &self.geocoding.reverse_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ShowcaseError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.crypto.ids.is_empty() {
            return Err(ShowcaseError::config("At least one crypto id must be configured").into());
        }

        if self.geocoding.default_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ShowcaseError::config(format!(
                "Unknown default timezone '{}'",
                self.geocoding.default_timezone
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ShowcaseConfig::default();
        assert_eq!(
            config.weather.current_url,
            "https://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.search.max_weather_results, 6);
        assert_eq!(config.crypto.ids.len(), 9);
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = ShowcaseConfig::default();
        config.weather.api_key = Some("valid_api_key_123".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = ShowcaseConfig::default();
        config.movies.api_key = Some("short".to_string());
        let result = config.validate_api_keys();
        assert!(result.unwrap_err().to_string().contains("Movie API key"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ShowcaseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = ShowcaseConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = ShowcaseConfig::default();
        config.search.debounce_ms = 10_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_unknown_timezone() {
        let mut config = ShowcaseConfig::default();
        config.geocoding.default_timezone = "Mars/Olympus".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timezone"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = ShowcaseConfig::default();
        config.logging.format = String::new();
        config.search.debounce_ms = 0;
        config.apply_defaults();
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.search.debounce_ms, 500);
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[search]\ndebounce_ms = 250\n\n[crypto]\nids = [\"bitcoin\"]"
        )
        .unwrap();

        let config = ShowcaseConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.crypto.ids, vec!["bitcoin".to_string()]);
        assert_eq!(config.search.min_query_len, 2);
    }

    #[test]
    fn test_environment_variable_override() {
        let dir = tempfile::tempdir().unwrap();

        // SAFETY: no other test reads this variable
        unsafe {
            std::env::set_var("SHOWCASE_MOVIES__IMAGE_BASE_URL", "https://img.example/w300");
        }
        let result = ShowcaseConfig::load_from_path(Some(dir.path().join("missing.toml")));
        // SAFETY: as above
        unsafe {
            std::env::remove_var("SHOWCASE_MOVIES__IMAGE_BASE_URL");
        }

        let config = result.unwrap();
        assert_eq!(config.movies.image_base_url, "https://img.example/w300");
        assert_eq!(config.server.port, ServerConfig::default().port);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = ShowcaseConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("showcase"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }

    #[test]
    fn test_storage_path_expands_home() {
        let mut config = ShowcaseConfig::default();
        config.storage.location = "/tmp/showcase-prefs".to_string();
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/showcase-prefs"));
    }
}
