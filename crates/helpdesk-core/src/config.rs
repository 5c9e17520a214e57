use crate::error::{Error, Result};
use crate::route::Route;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HELPDESK_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub tickets: TicketsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            seed: None,
        }
    }
}

impl LogsConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TicketsConfig {
    /// JSON fixture replacing the built-in ticket set.
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_start_route")]
    pub start_route: String,
    #[serde(default = "default_saved_indicator_secs")]
    pub saved_indicator_secs: u64,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_route: default_start_route(),
            saved_indicator_secs: default_saved_indicator_secs(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl UiConfig {
    #[must_use]
    pub const fn saved_indicator(&self) -> Duration {
        Duration::from_secs(self.saved_indicator_secs)
    }

    #[must_use]
    pub const fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

const fn default_interval_ms() -> u64 {
    2000
}

fn default_start_route() -> String {
    Route::Tickets.path().to_string()
}

const fn default_saved_indicator_secs() -> u64 {
    3
}

const fn default_tick_rate_ms() -> u64 {
    250
}

impl AppConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML and
    /// [`Error::InvalidConfig`] for out-of-range values.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| Error::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        if self.logs.interval_ms == 0 {
            return Err(Error::InvalidConfig {
                key: "logs.interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(Error::InvalidConfig {
                key: "ui.tick_rate_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if Route::resolve(&self.ui.start_route).is_none() {
            return Err(Error::InvalidConfig {
                key: "ui.start_route",
                reason: format!("'{}' is not a known route", self.ui.start_route),
            });
        }
        Ok(())
    }

    /// The route the console opens on.
    #[must_use]
    pub fn start_route(&self) -> Route {
        Route::resolve(&self.ui.start_route).unwrap_or_default()
    }
}

/// Default per-user config location, `<config_dir>/helpdesk/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("helpdesk/config.toml"))
}

/// Read a config file that must exist.
///
/// # Errors
///
/// Returns [`Error::ConfigRead`] if the file cannot be read, plus anything
/// [`AppConfig::from_toml`] reports.
pub fn load_config_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    AppConfig::from_toml(&content, path)
}

/// Resolve the effective config.
///
/// Precedence: `explicit` path, then the `HELPDESK_CONFIG` value passed in
/// as `env_path`, then the per-user default file if it exists, then built-in
/// defaults. Explicit and environment paths must exist.
///
/// # Errors
///
/// Returns any error from [`load_config_file`].
pub fn resolve_config(explicit: Option<&Path>, env_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit.or(env_path) {
        return load_config_file(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => Ok(AppConfig::default()),
    }
}
