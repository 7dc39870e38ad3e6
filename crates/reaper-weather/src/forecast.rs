//! Open-Meteo current conditions for a coordinate pair.

use reqwest::Client;
use serde::Deserialize;

use crate::http::get_json;
use crate::types::{whole_degrees, CurrentConditions, GeoFix, WeatherCondition, WeatherError};

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,weather_code";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    apparent_temperature: f64,
    weather_code: i32,
}

/// Fetch current temperature, apparent temperature and condition in Celsius.
pub async fn fetch_current(
    client: &Client,
    url: &str,
    fix: &GeoFix,
) -> Result<CurrentConditions, WeatherError> {
    tracing::debug!(
        "Fetching weather from Open-Meteo for coordinates: {}, {}",
        fix.latitude,
        fix.longitude
    );

    let latitude = fix.latitude.to_string();
    let longitude = fix.longitude.to_string();
    let body: ForecastResponse = get_json(
        client,
        url,
        &[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", CURRENT_FIELDS),
            ("temperature_unit", "celsius"),
        ],
    )
    .await?;

    let current = CurrentConditions {
        temperature_c: whole_degrees(body.current.temperature_2m),
        feels_like_c: whole_degrees(body.current.apparent_temperature),
        condition: WeatherCondition::from_wmo_code(body.current.weather_code),
    };

    tracing::debug!(
        "Weather: {}°C, {}",
        current.temperature_c,
        current.condition
    );
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_response_ignores_extra_fields() {
        let body: ForecastResponse = serde_json::from_str(
            r#"{
                "latitude": 51.5,
                "current_units": {"temperature_2m": "°C"},
                "current": {
                    "time": "2026-10-18T12:00",
                    "temperature_2m": 11.4,
                    "apparent_temperature": 9.6,
                    "weather_code": 3
                }
            }"#,
        )
        .unwrap();
        assert_eq!(body.current.weather_code, 3);
    }

    #[test]
    fn forecast_response_without_current_is_rejected() {
        let result = serde_json::from_str::<ForecastResponse>(r#"{"error": true}"#);
        assert!(result.is_err());
    }
}
