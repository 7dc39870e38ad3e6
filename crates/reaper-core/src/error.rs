//! Centralized error types for the Reaper application.
//!
//! This module provides a typed error hierarchy that:
//! - Lets each library crate map its own errors into one application type
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use std::path::PathBuf;

use thiserror::Error;

/// Top-level application error type.
///
/// Errors from config loading and the weather and game crates convert into
/// this type.
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Game(e) => e.user_message(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Loading, saving or validating the app's own config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No platform configuration directory")]
    NoConfigDir,

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NoConfigDir => "No settings folder is available. Pass --config FILE.",
            ConfigError::Read { .. } | ConfigError::Write { .. } => {
                "Could not access the settings file. Check its permissions."
            }
            ConfigError::Parse { .. } => "Settings file is malformed. Fix or delete it.",
            ConfigError::Serialize(_) => "Could not save settings. Please try again.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound(_) => "Location not found. Check and try again.",
            WeatherError::ApiError(_) => "Weather service error. Please try again.",
            WeatherError::ServiceUnavailable => {
                "Weather unavailable. Please try again later."
            }
        }
    }
}

/// Game installation and preset errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Steam installation not found")]
    ClientNotFound,

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Invalid catalog data: {0}")]
    InvalidCatalog(String),

    #[error("Game config file error: {0}")]
    ConfigFile(String),
}

impl GameError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GameError::ClientNotFound => "Steam was not found. Is it installed?",
            GameError::PresetNotFound(_) => "That preset does not exist.",
            GameError::InvalidCatalog(_) => "Built-in data is damaged. Reinstall the app.",
            GameError::ConfigFile(_) => {
                "Could not access the game config file. Check the game folder."
            }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<AppError> = vec![
            NetworkError::Timeout.into(),
            ConfigError::Invalid("test".into()).into(),
            ConfigError::NoConfigDir.into(),
            WeatherError::ServiceUnavailable.into(),
            GameError::ClientNotFound.into(),
            GameError::PresetNotFound("x".into()).into(),
            ConfigError::Parse {
                path: "config.toml".into(),
                source: toml::from_str::<toml::Value>("x = [").unwrap_err(),
            }
            .into(),
        ];

        for e in errors {
            assert!(!e.user_message().is_empty(), "empty message for {e:?}");
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = GameError::ClientNotFound.into();
        assert!(matches!(app_err, AppError::Game(GameError::ClientNotFound)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherError::ServiceUnavailable);
        assert_eq!(
            app_err.user_message(),
            "Weather unavailable. Please try again later."
        );
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let server = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let client = NetworkError::ServerError {
            status: 404,
            message: "missing".into(),
        };
        assert_ne!(server.user_message(), client.user_message());
    }
}
