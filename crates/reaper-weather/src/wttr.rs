//! wttr.in one-line format: weather and location in a single request.
//!
//! The response is `temp|feels like|condition|place`, e.g.
//! `+12°C|+10°C|Partly cloudy|London, United Kingdom`.

use reqwest::Client;

use crate::http::get_text;
use crate::types::{
    place_or_unknown, whole_degrees, CurrentConditions, WeatherCondition, WeatherError,
};

pub const FORMAT: &str = "%t|%f|%C|%l";

/// Conditions plus the place wttr.in resolved the caller's IP to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WttrReport {
    pub current: CurrentConditions,
    pub city: String,
    pub country: String,
}

pub async fn fetch(client: &Client, url: &str) -> Result<WttrReport, WeatherError> {
    tracing::debug!("Fetching weather and location from wttr.in");
    let body = get_text(client, url, &[("format", FORMAT)]).await?;
    parse_line(&body)
}

fn parse_line(body: &str) -> Result<WttrReport, WeatherError> {
    let line = body.trim();
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [temp, feels, condition, place] = fields.as_slice() else {
        return Err(WeatherError::Parse(format!("unexpected wttr.in line: {line:?}")));
    };

    let (city, country) = match place.rsplit_once(',') {
        Some((city, country)) => (city.trim(), country.trim()),
        None => (*place, ""),
    };

    Ok(WttrReport {
        current: CurrentConditions {
            temperature_c: parse_temperature(temp)?,
            feels_like_c: parse_temperature(feels)?,
            condition: WeatherCondition::from_description(condition),
        },
        city: place_or_unknown(Some(city.to_string())),
        country: place_or_unknown(Some(country.to_string())),
    })
}

/// "+12°C", "-3°C" or "54°F" to whole degrees Celsius.
fn parse_temperature(raw: &str) -> Result<i32, WeatherError> {
    let raw = raw.trim();
    let (number, fahrenheit) = if let Some(n) = raw.strip_suffix('F') {
        (n, true)
    } else {
        (raw.strip_suffix('C').unwrap_or(raw), false)
    };
    let number = number.trim_end_matches('°').trim();

    let value: f64 = number
        .parse()
        .map_err(|_| WeatherError::Parse(format!("bad wttr.in temperature: {raw:?}")))?;

    let celsius = if fahrenheit {
        (value - 32.0) * 5.0 / 9.0
    } else {
        value
    };
    Ok(whole_degrees(celsius))
}
