//! IP geolocation probes. Each service answers "where is this machine" in its
//! own JSON shape; all of them normalize to a [`GeoFix`].

use reqwest::Client;
use serde::Deserialize;

use crate::http::get_json;
use crate::types::{place_or_unknown, GeoFix, WeatherError};

#[derive(Debug, Deserialize)]
struct IpApiCoResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
    /// Set on rate limiting and reserved ranges
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    /// "lat,lon"
    loc: Option<String>,
    city: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpApiComResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

/// ipapi.co: flat latitude/longitude fields.
pub async fn ipapi_co(client: &Client, url: &str) -> Result<GeoFix, WeatherError> {
    tracing::debug!("Fetching location from ipapi.co");
    let body: IpApiCoResponse = get_json(client, url, &[]).await?;

    if body.error {
        return Err(WeatherError::Parse(format!(
            "ipapi.co refused lookup: {}",
            body.reason.as_deref().unwrap_or("no reason given")
        )));
    }

    let (latitude, longitude) = body
        .latitude
        .zip(body.longitude)
        .ok_or_else(|| WeatherError::Parse("ipapi.co response missing coordinates".into()))?;

    Ok(GeoFix {
        latitude,
        longitude,
        city: place_or_unknown(body.city),
        country: place_or_unknown(body.country_name),
    })
}

/// ipinfo.io: coordinates packed into one `loc` string.
pub async fn ipinfo(client: &Client, url: &str) -> Result<GeoFix, WeatherError> {
    tracing::debug!("Fetching location from ipinfo.io");
    let body: IpInfoResponse = get_json(client, url, &[]).await?;

    let loc = body.loc.unwrap_or_default();
    let (latitude, longitude) = parse_loc(&loc)
        .ok_or_else(|| WeatherError::Parse(format!("invalid ipinfo.io loc: {loc:?}")))?;

    Ok(GeoFix {
        latitude,
        longitude,
        city: place_or_unknown(body.city),
        country: place_or_unknown(body.country),
    })
}

/// ip-api.com: `status` must be "success".
pub async fn ip_api_com(client: &Client, url: &str) -> Result<GeoFix, WeatherError> {
    tracing::debug!("Fetching location from ip-api.com");
    let body: IpApiComResponse = get_json(client, url, &[]).await?;

    if body.status != "success" {
        return Err(WeatherError::Parse(format!(
            "ip-api.com status {}: {}",
            body.status,
            body.message.as_deref().unwrap_or("")
        )));
    }

    let (latitude, longitude) = body
        .lat
        .zip(body.lon)
        .ok_or_else(|| WeatherError::Parse("ip-api.com response missing coordinates".into()))?;

    Ok(GeoFix {
        latitude,
        longitude,
        city: place_or_unknown(body.city),
        country: place_or_unknown(body.country),
    })
}

/// Parse "lat,lon". Anything other than exactly two numbers is rejected.
fn parse_loc(loc: &str) -> Option<(f64, f64)> {
    let mut parts = loc.split(',');
    let lat = parts.next()?.trim().parse().ok()?;
    let lon = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_loc_accepts_pair() {
        assert_eq!(parse_loc("47.6062,-122.3321"), Some((47.6062, -122.3321)));
        assert_eq!(parse_loc(" 1.5 , 2 "), Some((1.5, 2.0)));
    }

    #[test]
    fn parse_loc_rejects_malformed() {
        assert_eq!(parse_loc(""), None);
        assert_eq!(parse_loc("47.6"), None);
        assert_eq!(parse_loc("1,2,3"), None);
        assert_eq!(parse_loc("north,south"), None);
    }

    #[test]
    fn ipapi_co_error_flag_deserializes() {
        let body: IpApiCoResponse =
            serde_json::from_str(r#"{"error": true, "reason": "RateLimited"}"#).unwrap();
        assert!(body.error);
        assert!(body.latitude.is_none());
    }
}
