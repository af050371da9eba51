//! Error types and handling for the showcase widgets

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Classification of failures talking to an external API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Transport failure or non-success status without a more specific code
    ApiNetworkError,
    /// Response body could not be decoded into the expected shape
    ApiInvalidResponse,
    /// HTTP 404
    ApiNotFound,
    /// HTTP 401
    ApiUnauthorized,
    /// HTTP 429
    ApiRateLimit,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::ApiNetworkError => "API_NETWORK_ERROR",
            ErrorCode::ApiInvalidResponse => "API_INVALID_RESPONSE",
            ErrorCode::ApiNotFound => "API_NOT_FOUND",
            ErrorCode::ApiUnauthorized => "API_UNAUTHORIZED",
            ErrorCode::ApiRateLimit => "API_RATE_LIMIT",
        };
        f.write_str(code)
    }
}

/// Why a geolocation reading could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationFailure {
    /// The user refused access
    PermissionDenied,
    /// The device could not determine a position
    PositionUnavailable,
    /// No reading within the allowed time
    Timeout,
    /// The client has no geolocation capability
    Unsupported,
}

impl fmt::Display for GeolocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GeolocationFailure::PermissionDenied => "permission denied",
            GeolocationFailure::PositionUnavailable => "position unavailable",
            GeolocationFailure::Timeout => "timed out",
            GeolocationFailure::Unsupported => "geolocation not supported",
        };
        f.write_str(text)
    }
}

/// Main error type for the showcase library
#[derive(Error, Debug)]
pub enum ShowcaseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error ({code}): {message}")]
    Api {
        message: String,
        code: ErrorCode,
        context: HashMap<String, String>,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Preference store errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Device location could not be obtained
    #[error("Geolocation error: {failure}")]
    Geolocation { failure: GeolocationFailure },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl ShowcaseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error with a network error code and no context
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::api_with_context(message, ErrorCode::ApiNetworkError, HashMap::new())
    }

    /// Create a new API error with an explicit code and diagnostic context
    pub fn api_with_context<S: Into<String>>(
        message: S,
        code: ErrorCode,
        context: HashMap<String, String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            code,
            context,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new geolocation error
    #[must_use]
    pub fn geolocation(failure: GeolocationFailure) -> Self {
        Self::Geolocation { failure }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// API error code, if this is an API error
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ShowcaseError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ShowcaseError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            ShowcaseError::Api { code, .. } => match code {
                ErrorCode::ApiUnauthorized => {
                    "The service rejected our API key. Please check the configuration.".to_string()
                }
                ErrorCode::ApiRateLimit => {
                    "Too many requests right now. Please try again in a moment.".to_string()
                }
                ErrorCode::ApiNotFound => "Nothing was found for this request.".to_string(),
                _ => "Unable to connect to external services. Please check your internet connection."
                    .to_string(),
            },
            ShowcaseError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ShowcaseError::Storage { .. } => {
                "Saving your preferences failed. They will reset on the next visit.".to_string()
            }
            ShowcaseError::Geolocation { failure } => match failure {
                GeolocationFailure::Unsupported => {
                    "Your browser does not support geolocation.".to_string()
                }
                _ => "Unable to access your location. Please check your browser settings."
                    .to_string(),
            },
            ShowcaseError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            ShowcaseError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = ShowcaseError::config("missing API key");
        assert!(matches!(config_err, ShowcaseError::Config { .. }));

        let api_err = ShowcaseError::api("connection failed");
        assert_eq!(api_err.code(), Some(ErrorCode::ApiNetworkError));

        let validation_err = ShowcaseError::validation("unknown tab");
        assert!(matches!(validation_err, ShowcaseError::Validation { .. }));
        assert_eq!(validation_err.code(), None);
    }

    #[test]
    fn test_user_messages() {
        let config_err = ShowcaseError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = ShowcaseError::api("test");
        assert!(api_err.user_message().contains("Unable to connect"));

        let limited = ShowcaseError::api_with_context(
            "slow down",
            ErrorCode::ApiRateLimit,
            HashMap::new(),
        );
        assert!(limited.user_message().contains("Too many requests"));

        let validation_err = ShowcaseError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let geo = ShowcaseError::geolocation(GeolocationFailure::Unsupported);
        assert!(geo.user_message().contains("does not support"));
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let err = ShowcaseError::api_with_context(
            "Weather API error: 401",
            ErrorCode::ApiUnauthorized,
            HashMap::from([("status_code".to_string(), "401".to_string())]),
        );
        assert_eq!(
            err.to_string(),
            "API error (API_UNAUTHORIZED): Weather API error: 401"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ShowcaseError = io_err.into();
        assert!(matches!(err, ShowcaseError::Io { .. }));
    }
}
