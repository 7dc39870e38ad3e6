//! Weather service for Reaper
//!
//! Resolves current conditions by trying a fixed chain of public
//! geolocation/weather services until one answers.

pub mod forecast;
pub mod geocode;
pub mod geolocate;
mod http;
pub mod provider;
pub mod types;
pub mod wttr;

pub use provider::{WeatherProvider, WeatherSource};
pub use types::*;
