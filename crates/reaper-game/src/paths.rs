//! Locating the ARK install directory.
//!
//! The Steam client root comes from the registry on Windows and from the
//! well-known home directory roots elsewhere. From there the default library
//! and every library listed in `libraryfolders.vdf` are probed for the game
//! executable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reaper_core::ArkConfig;

use crate::error::InstallError;
use crate::fs::{FileSystem, StdFileSystem};
use crate::library::library_roots;
use crate::registry::{RegistryReader, SystemRegistry};

/// Registry keys holding Steam's `InstallPath`, 64-bit view first.
pub const STEAM_REGISTRY_KEYS: [&str; 2] =
    [r"SOFTWARE\WOW6432Node\Valve\Steam", r"SOFTWARE\Valve\Steam"];
pub const STEAM_REGISTRY_VALUE: &str = "InstallPath";

const GAME_DIR: &str = "ARK";

/// Where the game lives, and whether that was confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallLocation {
    /// The directory contains the game executable
    Validated(PathBuf),
    /// Nothing validated; this is the default library location
    BestGuess(PathBuf),
}

impl InstallLocation {
    pub fn path(&self) -> &Path {
        match self {
            InstallLocation::Validated(p) | InstallLocation::BestGuess(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            InstallLocation::Validated(p) | InstallLocation::BestGuess(p) => p,
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, InstallLocation::Validated(_))
    }
}

/// `<library>/steamapps/common/ARK`
fn game_dir_in(library: &Path) -> PathBuf {
    library.join("steamapps").join("common").join(GAME_DIR)
}

/// Steam roots under a Unix home directory, in probe order.
pub fn unix_steam_roots(home: &Path) -> [PathBuf; 3] {
    [
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
    ]
}

pub struct InstallPathResolver {
    registry: Arc<dyn RegistryReader>,
    fs: Arc<dyn FileSystem>,
    home: Option<PathBuf>,
    ark: ArkConfig,
}

impl InstallPathResolver {
    /// Resolver over the real registry, filesystem and home directory.
    pub fn new(ark: ArkConfig) -> Self {
        Self::with_parts(
            Arc::new(SystemRegistry),
            Arc::new(StdFileSystem),
            dirs::home_dir(),
            ark,
        )
    }

    pub fn with_parts(
        registry: Arc<dyn RegistryReader>,
        fs: Arc<dyn FileSystem>,
        home: Option<PathBuf>,
        ark: ArkConfig,
    ) -> Self {
        Self {
            registry,
            fs,
            home,
            ark,
        }
    }

    pub fn ark(&self) -> &ArkConfig {
        &self.ark
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Find the Steam client root.
    pub fn locate_client(&self) -> Result<PathBuf, InstallError> {
        for key in STEAM_REGISTRY_KEYS {
            if let Some(path) = self.registry.read_string(key, STEAM_REGISTRY_VALUE) {
                let path = path.trim();
                if !path.is_empty() {
                    tracing::debug!("Steam path found in registry: {}", path);
                    return Ok(PathBuf::from(path));
                }
            }
        }

        if let Some(home) = &self.home {
            if let Some(root) = unix_steam_roots(home)
                .into_iter()
                .find(|root| self.fs.is_dir(root))
            {
                tracing::debug!("Steam path found: {}", root.display());
                return Ok(root);
            }
        }

        tracing::warn!("Steam installation path not found");
        Err(InstallError::ClientNotFound)
    }

    /// Directories that may hold the game: the client's own library first,
    /// then one per library listed in the manifest.
    pub fn candidates(&self, client_root: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![game_dir_in(client_root)];

        let manifest = client_root.join("steamapps").join("libraryfolders.vdf");
        if !self.fs.is_file(&manifest) {
            return candidates;
        }

        match self.fs.read_to_string(&manifest) {
            Ok(text) => {
                let roots = library_roots(&text);
                tracing::debug!("Found {} additional Steam library folders", roots.len());
                candidates.extend(roots.iter().map(|root| game_dir_in(root)));
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read {}, only checking the default Steam library: {}",
                    manifest.display(),
                    e
                );
            }
        }

        candidates
    }

    pub fn is_valid_install(&self, path: &Path) -> bool {
        if !self.fs.is_dir(path) {
            return false;
        }

        let valid = self.fs.is_file(&path.join(self.ark.executable_path()));
        if !valid {
            tracing::debug!(
                "{} is not a valid ARK installation, executable not found",
                path.display()
            );
        }
        valid
    }

    /// Resolve the install directory.
    ///
    /// Falls back to [`InstallLocation::BestGuess`] when no candidate holds
    /// the executable. Fails only when Steam itself can't be found.
    pub fn resolve(&self) -> Result<InstallLocation, InstallError> {
        tracing::info!("Attempting to find ARK installation path");

        if let Some(dir) = self.override_dir() {
            return Ok(if self.is_valid_install(&dir) {
                tracing::info!("Using configured ARK path: {}", dir.display());
                InstallLocation::Validated(dir)
            } else {
                tracing::warn!(
                    "Configured ARK path {} has no game executable",
                    dir.display()
                );
                InstallLocation::BestGuess(dir)
            });
        }

        let client_root = self.locate_client()?;
        let candidates = self.candidates(&client_root);

        if let Some(found) = candidates.iter().find(|c| self.is_valid_install(c)) {
            tracing::info!("ARK installation found at: {}", found.display());
            return Ok(InstallLocation::Validated(found.clone()));
        }

        tracing::warn!("No valid ARK installation found, returning default path");
        Ok(InstallLocation::BestGuess(game_dir_in(&client_root)))
    }

    /// [`resolve`](Self::resolve) without the error detail.
    pub fn find_install_dir(&self) -> Option<PathBuf> {
        match self.resolve() {
            Ok(location) => Some(location.into_path()),
            Err(e) => {
                tracing::error!("Could not find ARK installation: {}", e);
                None
            }
        }
    }

    /// Path of `BaseDeviceProfiles.ini` (or the configured equivalent).
    pub fn config_file_path(&self) -> Result<PathBuf, InstallError> {
        let location = self.resolve()?;
        let path = location.path().join(self.ark.config_path());
        tracing::debug!("Game config path: {}", path.display());
        Ok(path)
    }

    /// Content root that texture paths are relative to.
    pub fn texture_root(&self) -> Result<PathBuf, InstallError> {
        let location = self.resolve()?;
        Ok(location.path().join(self.ark.texture_root_path()))
    }

    fn override_dir(&self) -> Option<PathBuf> {
        self.ark.install_dir_override().map(PathBuf::from)
    }
}

impl std::fmt::Debug for InstallPathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallPathResolver")
            .field("home", &self.home)
            .field("ark", &self.ark)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_dir_layout() {
        assert_eq!(
            game_dir_in(Path::new("/steam")),
            PathBuf::from("/steam/steamapps/common/ARK")
        );
    }

    #[test]
    fn unix_roots_order() {
        let roots = unix_steam_roots(Path::new("/home/deck"));
        assert_eq!(roots[0], PathBuf::from("/home/deck/.steam/steam"));
        assert_eq!(roots[1], PathBuf::from("/home/deck/.local/share/Steam"));
        assert_eq!(
            roots[2],
            PathBuf::from("/home/deck/.var/app/com.valvesoftware.Steam/.steam/steam")
        );
    }

    #[test]
    fn location_accessors() {
        let v = InstallLocation::Validated(PathBuf::from("/a"));
        let g = InstallLocation::BestGuess(PathBuf::from("/b"));
        assert!(v.is_validated());
        assert!(!g.is_validated());
        assert_eq!(g.path(), Path::new("/b"));
        assert_eq!(v.into_path(), PathBuf::from("/a"));
    }
}
