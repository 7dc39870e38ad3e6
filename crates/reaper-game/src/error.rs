use std::path::PathBuf;

use reaper_core::{AppError, GameError};

/// Locating the game install failed.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// No Steam client root was found in the registry or on disk
    #[error("distribution client not found")]
    ClientNotFound,
}

/// Preset catalog errors
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("preset not found: {0}")]
    NotFound(String),
    #[error("duplicate preset name: {0}")]
    Duplicate(String),
}

/// Texture catalog errors
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("invalid texture table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate texture category: {0}")]
    DuplicateCategory(String),
}

/// Reading, writing or opening the game's config file failed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error(transparent)]
    Install(#[from] InstallError),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl From<InstallError> for AppError {
    fn from(e: InstallError) -> Self {
        match e {
            InstallError::ClientNotFound => AppError::Game(GameError::ClientNotFound),
        }
    }
}

impl From<PresetError> for AppError {
    fn from(e: PresetError) -> Self {
        match e {
            PresetError::NotFound(name) => AppError::Game(GameError::PresetNotFound(name)),
            PresetError::Duplicate(name) => AppError::Game(GameError::InvalidCatalog(format!(
                "duplicate preset name: {name}"
            ))),
        }
    }
}

impl From<TextureError> for AppError {
    fn from(e: TextureError) -> Self {
        AppError::Game(GameError::InvalidCatalog(e.to_string()))
    }
}

impl From<ConfigFileError> for AppError {
    fn from(e: ConfigFileError) -> Self {
        match e {
            ConfigFileError::Install(e) => e.into(),
            other => AppError::Game(GameError::ConfigFile(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_not_found_maps_to_game_error() {
        let app: AppError = InstallError::ClientNotFound.into();
        assert!(matches!(app, AppError::Game(GameError::ClientNotFound)));
        assert_eq!(app.user_message(), "Steam was not found. Is it installed?");
    }

    #[test]
    fn preset_not_found_keeps_name() {
        let app: AppError = PresetError::NotFound("Nope".into()).into();
        match app {
            AppError::Game(GameError::PresetNotFound(name)) => assert_eq!(name, "Nope"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn config_file_install_error_unwraps() {
        let app: AppError = ConfigFileError::Install(InstallError::ClientNotFound).into();
        assert!(matches!(app, AppError::Game(GameError::ClientNotFound)));
    }

    #[test]
    fn install_error_display() {
        assert_eq!(
            InstallError::ClientNotFound.to_string(),
            "distribution client not found"
        );
    }
}
