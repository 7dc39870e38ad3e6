use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

type Result<T> = std::result::Result<T, ConfigError>;

const APP_DIR_NAME: &str = "reaper";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable that pins the game install directory for one run.
pub const ARK_DIR_ENV: &str = "REAPER_ARK_DIR";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Activity feed settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Game install and file layout
    #[serde(default)]
    pub ark: ArkConfig,

    /// Toast durations
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// City used when the caller does not name one. `None` means IP-based lookup.
    #[serde(default)]
    pub default_city: Option<String>,

    /// Refresh interval in minutes
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,

    /// Per-request timeout for every weather/geolocation call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub endpoints: WeatherEndpoints,
}

fn default_refresh_minutes() -> u32 {
    30
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_city: None,
            refresh_minutes: default_refresh_minutes(),
            request_timeout_secs: default_request_timeout_secs(),
            endpoints: WeatherEndpoints::default(),
        }
    }
}

/// Base URLs for each weather and geolocation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherEndpoints {
    pub ipapi_co: String,
    pub ipinfo: String,
    pub ip_api_com: String,
    pub wttr: String,
    pub forecast: String,
    pub geocoding: String,
}

impl Default for WeatherEndpoints {
    fn default() -> Self {
        Self {
            ipapi_co: "https://ipapi.co/json/".to_string(),
            ipinfo: "https://ipinfo.io/json".to_string(),
            // ip-api.com serves its free tier over plain http only
            ip_api_com: "http://ip-api.com/json/".to_string(),
            wttr: "https://wttr.in/".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
            geocoding: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
        }
    }
}

impl WeatherEndpoints {
    /// Every endpoint paired with its config key, in fallback order.
    pub fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("weather.endpoints.geocoding", &self.geocoding),
            ("weather.endpoints.ipapi_co", &self.ipapi_co),
            ("weather.endpoints.ipinfo", &self.ipinfo),
            ("weather.endpoints.ip_api_com", &self.ip_api_com),
            ("weather.endpoints.wttr", &self.wttr),
            ("weather.endpoints.forecast", &self.forecast),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Maximum number of recent activities kept in memory
    #[serde(default = "default_max_recent_activities")]
    pub max_recent_activities: usize,
}

fn default_max_recent_activities() -> usize {
    50
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            max_recent_activities: default_max_recent_activities(),
        }
    }
}

/// Game layout. Relative paths accept either `/` or `\` as separator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArkConfig {
    /// Skip detection and use this directory
    #[serde(default)]
    pub install_dir: Option<String>,

    /// Set from `REAPER_ARK_DIR` at load time; wins over `install_dir`
    /// and is never written back to the file.
    #[serde(skip)]
    pub env_install_dir: Option<String>,

    #[serde(default = "default_executable_relative_path")]
    pub executable_relative_path: String,

    /// BaseDeviceProfiles.ini, relative to the install directory
    #[serde(default = "default_config_relative_path")]
    pub config_relative_path: String,

    /// Root the texture catalog's directories hang off
    #[serde(default = "default_texture_root_relative_path")]
    pub texture_root_relative_path: String,
}

fn default_executable_relative_path() -> String {
    "ShooterGame/Binaries/Win64/ShooterGame.exe".to_string()
}

fn default_config_relative_path() -> String {
    "Engine/Config/BaseDeviceProfiles.ini".to_string()
}

fn default_texture_root_relative_path() -> String {
    "ShooterGame/Content".to_string()
}

impl Default for ArkConfig {
    fn default() -> Self {
        Self {
            install_dir: None,
            env_install_dir: None,
            executable_relative_path: default_executable_relative_path(),
            config_relative_path: default_config_relative_path(),
            texture_root_relative_path: default_texture_root_relative_path(),
        }
    }
}

impl ArkConfig {
    /// Install directory override in effect, if any. Blank values count as unset.
    pub fn install_dir_override(&self) -> Option<&str> {
        [&self.env_install_dir, &self.install_dir]
            .into_iter()
            .flatten()
            .map(|dir| dir.trim())
            .find(|dir| !dir.is_empty())
    }

    pub fn executable_path(&self) -> PathBuf {
        relative_path(&self.executable_relative_path)
    }

    pub fn config_path(&self) -> PathBuf {
        relative_path(&self.config_relative_path)
    }

    pub fn texture_root_path(&self) -> PathBuf {
        relative_path(&self.texture_root_relative_path)
    }
}

/// Build a platform path from a `/`- or `\`-separated relative path.
pub fn relative_path(raw: &str) -> PathBuf {
    raw.split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub success_ms: u64,
    pub error_ms: u64,
    pub warning_ms: u64,
    pub info_ms: u64,
    /// Buffered events per subscriber before it starts lagging
    pub channel_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_ms: 5000,
            error_ms: 7000,
            warning_ms: 6000,
            info_ms: 5000,
            channel_capacity: 64,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            monitoring: MonitoringConfig::default(),
            ark: ArkConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    ///
    /// Environment overrides are applied after the file is read or written,
    /// so they last for this run only.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                    path: config_path.to_path_buf(),
                    source,
                })?;

            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?
        } else {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            config
        };

        Ok(config.with_env_overrides())
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings for the caller
    /// to log. Fails with `ConfigError::Invalid` on critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load_validated_from(&Self::config_path()?)
    }

    /// [`Config::load_validated`] for an explicit path.
    pub fn load_validated_from(config_path: &Path) -> Result<(Self, ValidationResult)> {
        let config = Self::load_from(config_path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        Ok((config, validation))
    }

    fn with_env_overrides(mut self) -> Self {
        self.ark.env_install_dir = std::env::var(ARK_DIR_ENV)
            .ok()
            .filter(|dir| !dir.trim().is_empty());
        self
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        for (field, url) in self.weather.endpoints.named() {
            self.validate_url(url, field, &mut result);
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Each unresponsive source waits out the full timeout",
            );
        }

        if self.weather.refresh_minutes == 0 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather refresh disabled (0 minutes)",
            );
        } else if self.weather.refresh_minutes > 1440 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather refresh interval is more than 24 hours",
            );
        }

        if matches!(&self.weather.default_city, Some(city) if city.trim().is_empty()) {
            result.add_warning("weather.default_city", "Default city is blank");
        }

        if self.monitoring.max_recent_activities == 0 {
            result.add_warning(
                "monitoring.max_recent_activities",
                "Activity feed disabled (0 entries kept)",
            );
        }

        for (field, raw) in [
            ("ark.executable_relative_path", &self.ark.executable_relative_path),
            ("ark.config_relative_path", &self.ark.config_relative_path),
            ("ark.texture_root_relative_path", &self.ark.texture_root_relative_path),
        ] {
            if raw.trim().is_empty() {
                result.add_error(field, "Path must not be empty");
            } else if Path::new(raw).is_absolute() || raw.starts_with(['/', '\\']) {
                result.add_error(field, "Path must be relative to the install directory");
            }
        }

        if let Some(dir) = self.ark.install_dir_override() {
            let dir = PathBuf::from(dir);
            if !dir.is_dir() {
                result.add_warning(
                    "ark.install_dir",
                    format!("Directory does not exist: {}", dir.display()),
                );
            }
        }

        let n = &self.notifications;
        if [n.success_ms, n.error_ms, n.warning_ms, n.info_ms].contains(&0) {
            result.add_warning(
                "notifications",
                "A zero duration hides that notification immediately",
            );
        }
        if n.channel_capacity == 0 {
            result.add_error(
                "notifications.channel_capacity",
                "Channel capacity must be greater than 0",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let write_error = |source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_path, contents).map_err(write_error)?;

        Ok(())
    }

    /// Directory the rolling log files are written to
    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join(APP_DIR_NAME);

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_endpoint_url() {
        let mut config = Config::default();
        config.weather.endpoints.ipinfo = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.endpoints.ipinfo"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.endpoints.wttr = "ftp://wttr.in".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.weather.request_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.request_timeout_secs"));
    }

    #[test]
    fn test_zero_activity_cap_is_warning() {
        let mut config = Config::default();
        config.monitoring.max_recent_activities = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "monitoring.max_recent_activities"));
    }

    #[test]
    fn test_absolute_relative_path_is_error() {
        let mut config = Config::default();
        config.ark.config_relative_path = "/etc/BaseDeviceProfiles.ini".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "ark.config_relative_path"));
    }

    #[test]
    fn test_relative_path_accepts_both_separators() {
        let expected: PathBuf = ["Engine", "Config", "BaseDeviceProfiles.ini"].iter().collect();
        assert_eq!(relative_path(r"Engine\Config\BaseDeviceProfiles.ini"), expected);
        assert_eq!(relative_path("Engine/Config/BaseDeviceProfiles.ini"), expected);
        assert_eq!(relative_path("Engine//Config/BaseDeviceProfiles.ini"), expected);
    }

    #[test]
    fn test_load_creates_default_then_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reaper").join("config.toml");

        let mut created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.config_dir, dir.path().join("reaper"));

        created.weather.default_city = Some("Oslo".to_string());
        created.monitoring.max_recent_activities = 7;
        created.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.weather.default_city.as_deref(), Some("Oslo"));
        assert_eq!(loaded.monitoring.max_recent_activities, 7);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/reaper\"\n\n[weather]\ndefault_city = \"Lima\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.default_city.as_deref(), Some("Lima"));
        assert_eq!(config.weather.request_timeout_secs, 15);
        assert_eq!(config.weather.endpoints, WeatherEndpoints::default());
        assert_eq!(config.monitoring.max_recent_activities, 50);
        assert_eq!(config.notifications.error_ms, 7000);
    }

    #[test]
    fn test_env_install_dir_applies_per_run_and_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::env::set_var(ARK_DIR_ENV, "/first/run");
        let first = Config::load_from(&path).unwrap();
        assert_eq!(first.ark.install_dir_override(), Some("/first/run"));
        assert!(!std::fs::read_to_string(&path).unwrap().contains("/first/run"));

        std::env::set_var(ARK_DIR_ENV, "/second/run");
        let second = Config::load_from(&path).unwrap();
        assert_eq!(second.ark.install_dir, None);
        assert_eq!(second.ark.install_dir_override(), Some("/second/run"));

        std::env::remove_var(ARK_DIR_ENV);
        let third = Config::load_from(&path).unwrap();
        assert_eq!(third.ark.install_dir_override(), None);
    }

    #[test]
    fn test_install_dir_override_precedence() {
        let mut ark = ArkConfig {
            install_dir: Some("/from/file".to_string()),
            ..ArkConfig::default()
        };
        assert_eq!(ark.install_dir_override(), Some("/from/file"));

        ark.env_install_dir = Some("  ".to_string());
        assert_eq!(ark.install_dir_override(), Some("/from/file"));

        ark.env_install_dir = Some("/from/env".to_string());
        assert_eq!(ark.install_dir_override(), Some("/from/env"));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "config_dir = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_file_fails_validated_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/reaper\"\n\n[weather]\nrequest_timeout_secs = 0\n",
        )
        .unwrap();

        let err = Config::load_validated_from(&path).unwrap_err();
        assert!(
            matches!(&err, ConfigError::Invalid(summary) if summary.contains("request_timeout_secs"))
        );
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
