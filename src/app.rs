//! Application service container.
//!
//! Builds every service once from the loaded config and ties the user
//! actions together: each action reports through the activity feed and the
//! notice broadcaster the way the desktop front end expects.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast;

use reaper_core::{AppError, Config};
use reaper_game::{
    ConfigPreset, GameConfigFile, InstallLocation, InstallPathResolver, PresetCatalog,
    TextureCatalog,
};
use reaper_services::{ActivityKind, ActivityTracker, Notifier};
use reaper_weather::{WeatherProvider, WeatherReading};

pub struct App {
    config: Arc<Config>,
    resolver: Arc<InstallPathResolver>,
    presets: PresetCatalog,
    textures: TextureCatalog,
    config_file: GameConfigFile,
    weather: WeatherProvider,
    activity: ActivityTracker,
    notifier: Notifier,
    shutdown_tx: broadcast::Sender<()>,
}

impl App {
    /// Build the app around the real registry, filesystem and network.
    pub fn new(config: Config) -> Result<Self> {
        let resolver = InstallPathResolver::new(config.ark.clone());
        Self::with_resolver(config, resolver)
    }

    /// Build the app with a caller-supplied install resolver.
    pub fn with_resolver(config: Config, resolver: InstallPathResolver) -> Result<Self> {
        let weather = WeatherProvider::new(&config.weather)
            .context("Failed to create weather client")?;
        Self::with_parts(config, resolver, weather)
    }

    pub fn with_parts(
        config: Config,
        resolver: InstallPathResolver,
        weather: WeatherProvider,
    ) -> Result<Self> {
        let textures = TextureCatalog::builtin().context("Built-in texture table is invalid")?;
        let resolver = Arc::new(resolver);
        let (shutdown_tx, _) = broadcast::channel(16);

        let app = Self {
            activity: ActivityTracker::from_config(&config.monitoring),
            notifier: Notifier::from_config(&config.notifications),
            config_file: GameConfigFile::new(resolver.clone()),
            presets: PresetCatalog::builtin(),
            textures,
            weather,
            resolver,
            config: Arc::new(config),
            shutdown_tx,
        };

        app.activity.record("Reaper started", ActivityKind::Info);
        tracing::info!("Application initialized successfully");
        Ok(app)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &InstallPathResolver {
        &self.resolver
    }

    pub fn presets(&self) -> &PresetCatalog {
        &self.presets
    }

    pub fn textures(&self) -> &TextureCatalog {
        &self.textures
    }

    pub fn config_file(&self) -> &GameConfigFile {
        &self.config_file
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Detect the install and report the outcome.
    pub fn detect_install(&self) -> Result<InstallLocation, AppError> {
        match self.resolver.resolve() {
            Ok(location @ InstallLocation::Validated(_)) => {
                self.activity
                    .record("ARK installation detected", ActivityKind::Success);
                Ok(location)
            }
            Ok(location) => {
                self.activity
                    .record("ARK path not verified, using default", ActivityKind::Warning);
                self.notifier.warning(format!(
                    "Could not verify the ARK install. Using {}",
                    location.path().display()
                ));
                Ok(location)
            }
            Err(e) => {
                let e = AppError::from(e);
                self.activity
                    .record("Steam installation not found", ActivityKind::Error);
                self.notifier.error(e.user_message());
                Err(e)
            }
        }
    }

    pub fn find_preset(&self, name: &str) -> Result<&ConfigPreset, AppError> {
        self.presets.require(name).map_err(|e| {
            let e = AppError::from(e);
            self.notifier.error(e.user_message());
            e
        })
    }

    /// Write the named preset to the game config file.
    pub fn apply_preset(&self, name: &str) -> Result<PathBuf, AppError> {
        let preset = self.find_preset(name)?;

        match self.config_file.apply_preset(preset) {
            Ok(path) => {
                self.activity
                    .record(format!("Applied preset: {}", preset.name), ActivityKind::Success);
                self.notifier
                    .success(format!("{} preset applied", preset.name));
                Ok(path)
            }
            Err(e) => {
                tracing::error!("Failed to apply preset {}: {}", preset.name, e);
                let e = AppError::from(e);
                self.activity.record(
                    format!("Failed to apply preset: {}", preset.name),
                    ActivityKind::Error,
                );
                self.notifier.error(e.user_message());
                Err(e)
            }
        }
    }

    /// Open the game config file in the system editor.
    pub fn open_config_file(&self) -> Result<PathBuf, AppError> {
        match self.config_file.open_in_editor() {
            Ok(path) => {
                self.activity
                    .record("Opened game config file", ActivityKind::Info);
                Ok(path)
            }
            Err(e) => {
                let e = AppError::from(e);
                self.notifier.error(e.user_message());
                Err(e)
            }
        }
    }

    /// Current weather; absent when every source failed.
    pub async fn refresh_weather(&self, city: Option<&str>) -> Option<WeatherReading> {
        match self.weather.current(city).await {
            Some(reading) => {
                self.activity.record(
                    format!("Weather updated: {}, {}", reading.city, reading.country),
                    ActivityKind::Info,
                );
                Some(reading)
            }
            None => {
                self.activity
                    .record("Weather unavailable", ActivityKind::Warning);
                self.notifier.warning(
                    AppError::Weather(reaper_core::WeatherError::ServiceUnavailable)
                        .user_message(),
                );
                None
            }
        }
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown(&self) {
        tracing::info!("Shutting down application");
        let _ = self.shutdown_tx.send(());
    }
}
