//! The game's device profile config file: read, overwrite, open.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::error::ConfigFileError;
use crate::paths::{InstallLocation, InstallPathResolver};
use crate::presets::ConfigPreset;

/// Platform program used to open a file with its default handler.
pub fn opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

#[derive(Debug, Clone)]
pub struct GameConfigFile {
    resolver: Arc<InstallPathResolver>,
}

impl GameConfigFile {
    pub fn new(resolver: Arc<InstallPathResolver>) -> Self {
        Self { resolver }
    }

    fn locate(&self) -> Result<(InstallLocation, PathBuf), ConfigFileError> {
        let location = self.resolver.resolve()?;
        let path = location.path().join(self.resolver.ark().config_path());
        Ok((location, path))
    }

    pub fn path(&self) -> Result<PathBuf, ConfigFileError> {
        Ok(self.resolver.config_file_path()?)
    }

    pub fn read_current(&self) -> Result<String, ConfigFileError> {
        let path = self.path()?;
        self.resolver
            .file_system()
            .read_to_string(&path)
            .map_err(|source| ConfigFileError::Io { path, source })
    }

    /// Overwrite the config file with `text` exactly as given.
    pub fn write_text(&self, text: &str) -> Result<PathBuf, ConfigFileError> {
        let (_, path) = self.locate()?;
        self.write_to(&path, text)?;
        Ok(path)
    }

    /// Write a preset's content to the config file.
    ///
    /// Writes to the best-guess location too, with a warning, so a user
    /// with a non-standard install still gets the file.
    pub fn apply_preset(&self, preset: &ConfigPreset) -> Result<PathBuf, ConfigFileError> {
        let (location, path) = self.locate()?;
        if !location.is_validated() {
            tracing::warn!(
                "Applying preset {:?} to unverified install at {}",
                preset.name,
                location.path().display()
            );
        }

        self.write_to(&path, &preset.raw_text)?;
        tracing::info!("Applied preset {:?} to {}", preset.name, path.display());
        Ok(path)
    }

    /// Open the config file with the platform's default handler.
    ///
    /// Returns once the opener has been spawned.
    pub fn open_in_editor(&self) -> Result<PathBuf, ConfigFileError> {
        let path = self.path()?;
        let program = opener();

        Command::new(program)
            .arg(&path)
            .spawn()
            .map_err(|source| ConfigFileError::Launch { program, source })?;

        tracing::info!("Opened {} with {}", path.display(), program);
        Ok(path)
    }

    fn write_to(&self, path: &Path, text: &str) -> Result<(), ConfigFileError> {
        self.resolver
            .file_system()
            .write(path, text)
            .map_err(|source| ConfigFileError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_for_platform() {
        let program = opener();
        #[cfg(target_os = "linux")]
        assert_eq!(program, "xdg-open");
        assert!(!program.is_empty());
    }
}
