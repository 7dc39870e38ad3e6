//! Game-side data for Reaper: where ARK is installed, the built-in config
//! presets, the texture catalog, and the device profile config file.

pub mod config_file;
pub mod error;
pub mod fs;
pub mod library;
pub mod paths;
pub mod presets;
pub mod registry;
pub mod textures;

pub use config_file::GameConfigFile;
pub use error::{ConfigFileError, InstallError, PresetError, TextureError};
pub use fs::{FileSystem, StdFileSystem};
pub use paths::{InstallLocation, InstallPathResolver};
pub use presets::{ConfigPreset, PresetCatalog};
pub use registry::{RegistryReader, SystemRegistry};
pub use textures::{TextureCatalog, TextureCategory, TextureEntry, TextureGroup};
