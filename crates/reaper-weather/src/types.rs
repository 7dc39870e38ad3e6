use chrono::{DateTime, Utc};
use reaper_core::{AppError, ReqwestErrorExt};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather condition labels shown in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Foggy,
    Drizzle,
    Rain,
    Snow,
    Showers,
    Thunderstorm,
    #[default]
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            45 | 48 => Self::Foggy,
            51 | 53 | 55 => Self::Drizzle,
            61 | 63 | 65 => Self::Rain,
            71 | 73 | 75 => Self::Snow,
            80..=82 => Self::Showers,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Map a free-text description (e.g. "Light rain shower") to a condition.
    ///
    /// Keywords are checked from most to least severe so that
    /// "Patchy rain with thunder" lands on Thunderstorm, not Rain.
    pub fn from_description(text: &str) -> Self {
        let text = text.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if has(&["thunder"]) {
            Self::Thunderstorm
        } else if has(&["snow", "sleet", "blizzard", "ice pellets"]) {
            Self::Snow
        } else if has(&["shower"]) {
            Self::Showers
        } else if has(&["drizzle"]) {
            Self::Drizzle
        } else if has(&["rain"]) {
            Self::Rain
        } else if has(&["fog", "mist", "haze"]) {
            Self::Foggy
        } else if has(&["cloud", "overcast"]) {
            Self::PartlyCloudy
        } else if has(&["clear", "sunny"]) {
            Self::Clear
        } else {
            Self::Unknown
        }
    }

    /// Get a human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Foggy => "Foggy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Showers => "Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coordinates plus a place name, as reported by a geolocation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

/// Current conditions, already rounded to whole degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub condition: WeatherCondition,
}

/// One successful weather lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub condition: WeatherCondition,
    pub city: String,
    pub country: String,
    /// Name of the source that answered
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReading {
    pub fn new(
        current: CurrentConditions,
        city: impl Into<String>,
        country: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            temperature_c: current.temperature_c,
            feels_like_c: current.feels_like_c,
            condition: current.condition,
            city: city.into(),
            country: country.into(),
            source: source.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Round a temperature the way the display expects (half to even).
pub(crate) fn whole_degrees(value: f64) -> i32 {
    value.round_ties_even() as i32
}

pub(crate) const UNKNOWN_PLACE: &str = "Unknown";

/// Place names come back as missing, null or blank depending on the service.
pub(crate) fn place_or_unknown(name: Option<String>) -> String {
    name.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_PLACE.to_string())
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("All weather sources failed")]
    Unavailable,
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Parse(s) => AppError::Weather(reaper_core::WeatherError::ApiError(s)),
            WeatherError::LocationNotFound(s) => {
                AppError::Weather(reaper_core::WeatherError::LocationNotFound(s))
            }
            WeatherError::Unavailable => {
                AppError::Weather(reaper_core::WeatherError::ServiceUnavailable)
            }
        }
    }
}
