//! Forward geocoding: convert a place name into coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use reqwest::Client;
use serde::Deserialize;

use crate::http::get_json;
use crate::types::{place_or_unknown, GeoFix, WeatherError};

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// Omitted entirely when nothing matches
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

/// Look up the best match for `name`.
pub async fn lookup(client: &Client, url: &str, name: &str) -> Result<GeoFix, WeatherError> {
    tracing::debug!("Geocoding place name: {}", name);

    let body: GeocodingResponse = get_json(
        client,
        url,
        &[("name", name), ("count", "1"), ("language", "en"), ("format", "json")],
    )
    .await?;

    let best = body
        .results
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| WeatherError::LocationNotFound(name.to_string()))?;

    let city = best.name.or_else(|| Some(name.to_string()));
    tracing::info!(
        "Geocoded {:?} to ({}, {})",
        name,
        best.latitude,
        best.longitude
    );

    Ok(GeoFix {
        latitude: best.latitude,
        longitude: best.longitude,
        city: place_or_unknown(city),
        country: place_or_unknown(best.country),
    })
}
