//! Configuration management.
//!
//! Values are layered: built-in defaults, then a TOML file, then environment
//! overrides. Command-line flags are applied last by the binary.

use crate::directory::DirectoryHttpConfig;
use crate::session::SessionSettings;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ROSTER_CONFIG_PATH";

/// Main configuration for roster.
#[derive(Debug, Clone, Default)]
pub struct RosterConfig {
    /// Snapshot locations.
    pub snapshot: SnapshotSettings,
    /// Directory API settings.
    pub directory: DirectorySettings,
    /// Interactive session settings.
    pub session: SessionOptions,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Where the primary and backup snapshots live.
#[derive(Debug, Clone)]
pub struct SnapshotSettings {
    /// Current snapshot.
    pub primary: PathBuf,
    /// Previous generation.
    pub backup: PathBuf,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("data/recursers.json"),
            backup: PathBuf::from("data/recursers_backup.json"),
        }
    }
}

/// Directory API settings.
#[derive(Debug, Clone)]
pub struct DirectorySettings {
    /// Prefix joined with a slug to build a profile URL.
    pub base_url: String,
    /// Profiles endpoint.
    pub api_url: String,
    /// Page size per request.
    pub page_limit: u64,
    /// Offset to fetch from when bootstrapping or updating.
    pub initial_offset: u64,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        let http = DirectoryHttpConfig::default();
        Self {
            base_url: "https://www.recurse.com/directory/".to_string(),
            api_url: http.api_url,
            page_limit: http.page_limit,
            initial_offset: 1700,
            timeout_ms: http.timeout_ms,
            connect_timeout_ms: http.connect_timeout_ms,
        }
    }
}

/// Interactive session options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Whether to open each profile in a browser.
    pub open_browser: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { open_browser: true }
    }
}

/// Logging settings from the config file.
#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    /// Filter directive such as `info` or `roster=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Snapshot section.
    pub snapshot: Option<ConfigFileSnapshot>,
    /// Directory section.
    pub directory: Option<ConfigFileDirectory>,
    /// Session section.
    pub session: Option<ConfigFileSession>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Snapshot section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSnapshot {
    /// Primary snapshot path.
    pub primary: Option<String>,
    /// Backup snapshot path.
    pub backup: Option<String>,
}

/// Directory section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDirectory {
    /// Profile URL prefix.
    pub base_url: Option<String>,
    /// Profiles endpoint.
    pub api_url: Option<String>,
    /// Page size.
    pub page_limit: Option<u64>,
    /// Fetch offset.
    pub initial_offset: Option<u64>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

/// Session section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSession {
    /// Open profiles in a browser.
    pub open_browser: Option<bool>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Filter directive.
    pub level: Option<String>,
    /// Output format.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl RosterConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::load_from_str(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML.
    pub fn load_from_str(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from `explicit`, else `$ROSTER_CONFIG_PATH`, else
    /// the default locations, then applies environment overrides.
    ///
    /// Missing default files are not an error; an explicitly named file that
    /// can't be read is.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file can't be read or parsed, or if an
    /// environment override is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let path = explicit
            .map(Path::to_path_buf)
            .or(from_env)
            .or_else(Self::default_path);

        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::load_from_file(&path)?
            },
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// First existing default config file, if any.
    ///
    /// Checks the platform config dir (`~/Library/Application Support/roster/`
    /// on macOS), then `~/.config/roster/` for Unix compatibility.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        let base_dirs = directories::BaseDirs::new()?;

        let platform_config = base_dirs.config_dir().join("roster").join("config.toml");
        if platform_config.exists() {
            return Some(platform_config);
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("roster")
            .join("config.toml");
        xdg_config.exists().then_some(xdg_config)
    }

    /// Applies `ROSTER_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a numeric override doesn't parse.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ROSTER_SNAPSHOT_PATH") {
            self.snapshot.primary = PathBuf::from(path);
        }
        if let Some(path) = lookup("ROSTER_BACKUP_PATH") {
            self.snapshot.backup = PathBuf::from(path);
        }
        if let Some(offset) = lookup("ROSTER_INITIAL_OFFSET") {
            self.directory.initial_offset = parse_env_number("ROSTER_INITIAL_OFFSET", &offset)?;
        }
        if let Some(timeout) = lookup("ROSTER_HTTP_TIMEOUT_MS") {
            self.directory.timeout_ms = parse_env_number("ROSTER_HTTP_TIMEOUT_MS", &timeout)?;
        }
        Ok(())
    }

    /// Converts a `ConfigFile` to `RosterConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(snapshot) = file.snapshot {
            if let Some(primary) = snapshot.primary {
                config.snapshot.primary = PathBuf::from(primary);
            }
            if let Some(backup) = snapshot.backup {
                config.snapshot.backup = PathBuf::from(backup);
            }
        }
        if let Some(directory) = file.directory {
            let target = &mut config.directory;
            if let Some(v) = directory.base_url {
                target.base_url = v;
            }
            if let Some(v) = directory.api_url {
                target.api_url = v;
            }
            if let Some(v) = directory.page_limit {
                target.page_limit = v;
            }
            if let Some(v) = directory.initial_offset {
                target.initial_offset = v;
            }
            if let Some(v) = directory.timeout_ms {
                target.timeout_ms = v;
            }
            if let Some(v) = directory.connect_timeout_ms {
                target.connect_timeout_ms = v;
            }
        }
        if let Some(session) = file.session {
            if let Some(v) = session.open_browser {
                config.session.open_browser = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging.level = logging.level;
            config.logging.format = logging.format;
            config.logging.file = logging.file.map(PathBuf::from);
        }

        config
    }

    /// Sets the primary snapshot path.
    #[must_use]
    pub fn with_primary_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot.primary = path.into();
        self
    }

    /// Sets the backup snapshot path.
    #[must_use]
    pub fn with_backup_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot.backup = path.into();
        self
    }

    /// Sets the directory fetch offset.
    #[must_use]
    pub const fn with_initial_offset(mut self, offset: u64) -> Self {
        self.directory.initial_offset = offset;
        self
    }

    /// HTTP settings for the directory client.
    #[must_use]
    pub fn directory_http(&self) -> DirectoryHttpConfig {
        DirectoryHttpConfig {
            api_url: self.directory.api_url.clone(),
            page_limit: self.directory.page_limit,
            timeout_ms: self.directory.timeout_ms,
            connect_timeout_ms: self.directory.connect_timeout_ms,
        }
    }

    /// Settings for a triage session.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            base_url: self.directory.base_url.clone(),
            initial_offset: self.directory.initial_offset,
        }
    }
}

fn parse_env_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        Error::InvalidInput(format!("{key} must be a non-negative integer, got '{value}'"))
    })
}
