//! Configuration loading, environment profiles, and constants.
//!
//! Loads application configuration from a base TOML file and deep-merges an
//! optional per-environment overlay file next to it (for example
//! `config/development.toml` over `config/default.toml`). `AppConfig` is the
//! root configuration struct containing all settings.

use std::fmt;
use std::path::{Path, PathBuf};

use const_format::formatcp;
use serde::Deserialize;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Forecasts are generated fresh per request and must never be served from a cache
pub const CACHE_CONTROL_FORECAST: &str = "no-store";

/// Response header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Forecast Defaults
// =============================================================================

/// Number of forecast records returned per request
pub const DEFAULT_FORECAST_DAYS: usize = 5;

/// Upper bound on forecast length accepted from configuration
pub const MAX_FORECAST_DAYS: usize = 366;

/// Lowest generated temperature in degrees Celsius (inclusive)
pub const DEFAULT_MIN_TEMPERATURE_C: i32 = -20;

/// Highest generated temperature in degrees Celsius (exclusive)
pub const DEFAULT_MAX_TEMPERATURE_C: i32 = 55;

/// Summary words picked at random for each forecast record
pub const DEFAULT_SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Default bind address (all interfaces, so the container port mapping works)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listening port, matching the port exposed by the container image
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Grace period for in-flight connections on shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Configuration installed by the Debian package, tried when the relative path is absent
pub const SYSTEM_CONFIG_PATH: &str = "/etc/forecast-api/default.toml";

/// Environment variable naming the active environment profile
pub const ENVIRONMENT_VAR: &str = "FORECAST_ENVIRONMENT";

/// Tracing target of this crate
pub const LOG_TARGET: &str = "forecast_api";

/// Default log filter for the Development profile
pub const DEVELOPMENT_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=debug", LOG_TARGET);

/// Default log filter for every other profile
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", LOG_TARGET);

/// Named environment profile, selected by `FORECAST_ENVIRONMENT` or `--environment`.
///
/// The profile only affects diagnostics and which overlay file is merged into
/// the configuration. It never changes the shape of HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
    Custom(String),
}

impl Environment {
    /// Parse a profile name case-insensitively. Empty names select Production.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            "staging" => Self::Staging,
            "production" | "prod" | "" => Self::Production,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Production => "Production",
            Self::Custom(name) => name,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Log filter used when neither `--log-level` nor `RUST_LOG` is set
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_development() {
            DEVELOPMENT_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }

    /// Log format used when `logging.format` is not configured
    pub fn default_log_format(&self) -> LogFormat {
        if self.is_development() {
            LogFormat::Text
        } else {
            LogFormat::Json
        }
    }

    /// Overlay file sitting next to the base config, e.g. `development.toml`
    fn overlay_path(&self, base: &Path) -> PathBuf {
        base.with_file_name(format!("{}.toml", self.name().to_ascii_lowercase()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Forecast generation settings
    #[serde(default)]
    pub forecast: ForecastSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Seconds to wait for open connections after SIGTERM/SIGINT
    #[serde(default = "HttpServerConfig::default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_timeout_seconds: Self::default_shutdown_timeout(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_timeout() -> u64 {
        DEFAULT_SHUTDOWN_TIMEOUT_SECS
    }
}

/// Forecast generation settings.
///
/// The temperature range is half-open: `min_temperature_c` can be generated,
/// `max_temperature_c` cannot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForecastSettings {
    /// Number of records per response (default: 5)
    #[serde(default = "ForecastSettings::default_days")]
    pub days: usize,
    #[serde(default = "ForecastSettings::default_min_temperature")]
    pub min_temperature_c: i32,
    #[serde(default = "ForecastSettings::default_max_temperature")]
    pub max_temperature_c: i32,
    /// Summary words; an empty list yields `null` summaries
    #[serde(default = "ForecastSettings::default_summaries")]
    pub summaries: Vec<String>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            days: Self::default_days(),
            min_temperature_c: Self::default_min_temperature(),
            max_temperature_c: Self::default_max_temperature(),
            summaries: Self::default_summaries(),
        }
    }
}

impl ForecastSettings {
    fn default_days() -> usize {
        DEFAULT_FORECAST_DAYS
    }

    fn default_min_temperature() -> i32 {
        DEFAULT_MIN_TEMPERATURE_C
    }

    fn default_max_temperature() -> i32 {
        DEFAULT_MAX_TEMPERATURE_C
    }

    fn default_summaries() -> Vec<String> {
        DEFAULT_SUMMARIES.iter().map(|s| s.to_string()).collect()
    }

    /// Check the settings can produce a forecast
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days == 0 || self.days > MAX_FORECAST_DAYS {
            return Err(ConfigError::Validation(format!(
                "forecast.days must be between 1 and {}, got {}",
                MAX_FORECAST_DAYS, self.days
            )));
        }
        if self.min_temperature_c >= self.max_temperature_c {
            return Err(ConfigError::Validation(format!(
                "forecast.min_temperature_c ({}) must be lower than forecast.max_temperature_c ({})",
                self.min_temperature_c, self.max_temperature_c
            )));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log format; when unset the environment profile decides
    pub format: Option<LogFormat>,
}

impl LoggingConfig {
    pub fn effective_format(&self, environment: &Environment) -> LogFormat {
        self.format.unwrap_or_else(|| environment.default_log_format())
    }
}

impl AppConfig {
    /// Load the base config at `path` and merge the environment overlay if present.
    pub fn load<P: AsRef<Path>>(path: P, environment: &Environment) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut table: toml::Table = toml::from_str(&contents)?;

        let overlay_path = environment.overlay_path(path);
        if overlay_path != path && overlay_path.is_file() {
            let overlay: toml::Table = toml::from_str(&std::fs::read_to_string(&overlay_path)?)?;
            merge_tables(&mut table, overlay);
        }

        let config: AppConfig = toml::Value::Table(table).try_into()?;
        config.forecast.validate()?;

        Ok(config)
    }
}

/// Pick the config file: an explicit `--config` wins, then the first default that exists.
///
/// Falls back to `DEFAULT_CONFIG_PATH` so a missing file is reported against it.
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(
            first_existing(&[DEFAULT_CONFIG_PATH, SYSTEM_CONFIG_PATH]).unwrap_or(DEFAULT_CONFIG_PATH),
        ),
    }
}

fn first_existing<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|candidate| Path::new(candidate).is_file())
}

/// Recursively merge `overlay` into `base`; overlay values win, nested tables merge.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => {
                if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
                    merge_tables(base_table, overlay_table);
                    continue;
                }
                base.insert(key, toml::Value::Table(overlay_table));
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("Development"), Environment::Development);
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name(" STAGING "), Environment::Staging);
        assert_eq!(Environment::from_name("prod"), Environment::Production);
        assert_eq!(Environment::from_name(""), Environment::Production);
        assert_eq!(
            Environment::from_name("Testing"),
            Environment::Custom("Testing".to_string())
        );
        assert_eq!(Environment::from_name("Testing").to_string(), "Testing");
    }

    #[test]
    fn test_environment_profile_defaults() {
        assert_eq!(Environment::Development.default_log_filter(), DEVELOPMENT_LOG_FILTER);
        assert_eq!(Environment::Production.default_log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(Environment::Development.default_log_format(), LogFormat::Text);
        assert_eq!(Environment::Staging.default_log_format(), LogFormat::Json);
        assert_eq!(DEFAULT_LOG_FILTER, "forecast_api=info,tower_http=info");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "default.toml", "");

        let config = AppConfig::load(&path, &Environment::Production).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.shutdown_timeout_seconds, 30);
        assert_eq!(config.forecast, ForecastSettings::default());
        assert_eq!(config.forecast.summaries.len(), 10);
        assert!(config.logging.format.is_none());
    }

    #[test]
    fn test_overlay_merges_over_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "default.toml",
            r#"
[http]
host = "0.0.0.0"
port = 8080

[forecast]
days = 5
summaries = ["Mild"]
"#,
        );
        write_file(
            dir.path(),
            "development.toml",
            r#"
[http]
host = "127.0.0.1"

[logging]
format = "text"
"#,
        );

        let config = AppConfig::load(&path, &Environment::Development).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        // Untouched keys in a merged table survive
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.forecast.summaries, vec!["Mild".to_string()]);
        assert_eq!(config.logging.format, Some(LogFormat::Text));

        // Other profiles ignore the development overlay
        let config = AppConfig::load(&path, &Environment::Production).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert!(config.logging.format.is_none());
    }

    #[test]
    fn test_missing_overlay_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "default.toml", "[http]\nport = 9000\n");

        let config = AppConfig::load(&path, &Environment::Staging).unwrap();
        assert_eq!(config.http.port, 9000);
    }

    #[test]
    fn test_missing_base_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(dir.path().join("nope.toml"), &Environment::Production);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "default.toml", "[http\nport = ");
        let result = AppConfig::load(&path, &Environment::Production);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "default.toml",
            "[forecast]\nmin_temperature_c = 10\nmax_temperature_c = 10\n",
        );
        let result = AppConfig::load(&path, &Environment::Production);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_zero_days() {
        let settings = ForecastSettings {
            days: 0,
            ..ForecastSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Validation(_))
        ));
        assert!(ForecastSettings::default().validate().is_ok());
    }

    #[test]
    fn test_resolve_config_path_prefers_explicit() {
        assert_eq!(
            resolve_config_path(Some("/srv/forecast.toml")),
            PathBuf::from("/srv/forecast.toml")
        );
    }

    #[test]
    fn test_first_existing_falls_through_to_installed_path() {
        let dir = tempfile::tempdir().unwrap();
        let installed = write_file(dir.path(), "default.toml", "");
        let missing = dir.path().join("config").join("default.toml");

        let missing = missing.to_str().unwrap();
        let installed = installed.to_str().unwrap();
        assert_eq!(first_existing(&[missing, installed]), Some(installed));
        assert_eq!(first_existing(&[installed, missing]), Some(installed));
        assert_eq!(first_existing(&[missing]), None);
    }

    #[test]
    fn test_effective_log_format() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.effective_format(&Environment::Development), LogFormat::Text);
        assert_eq!(logging.effective_format(&Environment::Production), LogFormat::Json);

        let logging = LoggingConfig {
            format: Some(LogFormat::Text),
        };
        assert_eq!(logging.effective_format(&Environment::Production), LogFormat::Text);
    }
}
