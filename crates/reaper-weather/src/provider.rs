//! Weather resolution with ordered fallback across public services.
//!
//! Sources are tried one at a time in a fixed order. Any failure (transport,
//! HTTP status, response shape) moves on to the next source; the first
//! reading wins and the remaining sources are never contacted.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reaper_core::{WeatherConfig, WeatherEndpoints};
use reqwest::Client;

use crate::types::{WeatherError, WeatherReading};
use crate::{forecast, geocode, geolocate, wttr};

const USER_AGENT: &str = concat!("Reaper/", env!("CARGO_PKG_VERSION"));

/// One step of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherSource {
    /// Geocode a place name, then ask Open-Meteo
    NamedPlace(String),
    /// ipapi.co location, then Open-Meteo
    IpApiCo,
    /// ipinfo.io location, then Open-Meteo
    IpInfo,
    /// ip-api.com location, then Open-Meteo
    IpApiCom,
    /// wttr.in text line, location and weather together
    Wttr,
}

impl WeatherSource {
    /// The IP-based chain, in priority order.
    pub const IP_CHAIN: [WeatherSource; 4] = [
        WeatherSource::IpApiCo,
        WeatherSource::IpInfo,
        WeatherSource::IpApiCom,
        WeatherSource::Wttr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeatherSource::NamedPlace(_) => "open-meteo geocoding",
            WeatherSource::IpApiCo => "ipapi.co",
            WeatherSource::IpInfo => "ipinfo.io",
            WeatherSource::IpApiCom => "ip-api.com",
            WeatherSource::Wttr => "wttr.in",
        }
    }
}

impl fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherSource::NamedPlace(city) => write!(f, "{} ({})", self.name(), city),
            _ => f.write_str(self.name()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    endpoints: WeatherEndpoints,
    default_city: Option<String>,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, config.endpoints.clone())
            .with_default_city(config.default_city.clone()))
    }

    /// Build around an existing client, e.g. one pointed at a mock server.
    pub fn with_client(client: Client, endpoints: WeatherEndpoints) -> Self {
        Self {
            client: Arc::new(client),
            endpoints,
            default_city: None,
        }
    }

    /// City to use when `resolve` is called without one.
    pub fn with_default_city(mut self, city: Option<String>) -> Self {
        self.default_city = city;
        self
    }

    /// The chain `resolve` walks for the given override.
    ///
    /// A non-blank city (or the configured default) puts a geocoding lookup
    /// first; the IP-based sources always follow.
    pub fn sources(&self, city: Option<&str>) -> Vec<WeatherSource> {
        let city = city
            .or(self.default_city.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let mut chain = Vec::with_capacity(WeatherSource::IP_CHAIN.len() + 1);
        if let Some(city) = city {
            chain.push(WeatherSource::NamedPlace(city.to_string()));
        }
        chain.extend(WeatherSource::IP_CHAIN);
        chain
    }

    /// Walk the fallback chain and return the first reading.
    ///
    /// Returns `WeatherError::Unavailable` only once every source has failed.
    pub async fn resolve(&self, city: Option<&str>) -> Result<WeatherReading, WeatherError> {
        let sources = self.sources(city);
        tracing::info!("Fetching weather data ({} sources)", sources.len());

        for source in &sources {
            match self.fetch_from(source).await {
                Ok(reading) => {
                    tracing::info!(
                        "Weather from {}: {}°C, {} in {}, {}",
                        source,
                        reading.temperature_c,
                        reading.condition,
                        reading.city,
                        reading.country
                    );
                    return Ok(reading);
                }
                Err(e) => {
                    tracing::warn!("Weather source {} failed, trying next: {}", source, e);
                }
            }
        }

        tracing::error!("All weather sources failed");
        Err(WeatherError::Unavailable)
    }

    /// Like [`resolve`](Self::resolve), but absent instead of an error.
    pub async fn current(&self, city: Option<&str>) -> Option<WeatherReading> {
        self.resolve(city).await.ok()
    }

    /// Query a single source with no fallback.
    pub async fn fetch_from(&self, source: &WeatherSource) -> Result<WeatherReading, WeatherError> {
        let endpoints = &self.endpoints;
        let client = self.client.as_ref();

        let fix = match source {
            WeatherSource::NamedPlace(city) => {
                geocode::lookup(client, &endpoints.geocoding, city).await?
            }
            WeatherSource::IpApiCo => geolocate::ipapi_co(client, &endpoints.ipapi_co).await?,
            WeatherSource::IpInfo => geolocate::ipinfo(client, &endpoints.ipinfo).await?,
            WeatherSource::IpApiCom => geolocate::ip_api_com(client, &endpoints.ip_api_com).await?,
            WeatherSource::Wttr => {
                let report = wttr::fetch(client, &endpoints.wttr).await?;
                return Ok(WeatherReading::new(
                    report.current,
                    report.city,
                    report.country,
                    source.name(),
                ));
            }
        };

        tracing::debug!(
            "Location: {}, {} ({}, {})",
            fix.city,
            fix.country,
            fix.latitude,
            fix.longitude
        );

        let current = forecast::fetch_current(client, &endpoints.forecast, &fix).await?;
        Ok(WeatherReading::new(current, fix.city, fix.country, source.name()))
    }
}
