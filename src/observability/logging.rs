//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Project-specific filter variable, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "ROSTER_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, falling back to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Event filter.
    pub filter: EnvFilter,
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Resolves settings against the environment.
    ///
    /// Filter priority: `ROSTER_LOG`, then `RUST_LOG`, then `--verbose`
    /// (debug), then the configured level, then `warn`.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        let directive = std::env::var(LOG_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok());
        Self::resolve(settings, verbose, directive.as_deref())
    }

    fn resolve(settings: &LoggingSettings, verbose: bool, env_directive: Option<&str>) -> Self {
        let fallback = if verbose {
            "debug"
        } else {
            settings.level.as_deref().unwrap_or("warn")
        };

        let filter = env_directive
            .and_then(|d| EnvFilter::try_new(d).ok())
            .or_else(|| EnvFilter::try_new(fallback).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"));

        Self {
            filter,
            format: settings
                .format
                .as_deref()
                .map(LogFormat::parse)
                .unwrap_or_default(),
            file: settings.file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("json", LogFormat::Json ; "json")]
    #[test_case(" JSON ", LogFormat::Json ; "json case and whitespace")]
    #[test_case("pretty", LogFormat::Pretty ; "pretty")]
    #[test_case("yaml", LogFormat::Pretty ; "unknown falls back")]
    fn test_log_format_parse(input: &str, expected: LogFormat) {
        assert_eq!(LogFormat::parse(input), expected);
    }

    #[test]
    fn test_resolve_defaults_to_warn() {
        let config = LoggingConfig::resolve(&LoggingSettings::default(), false, None);
        assert_eq!(config.filter.to_string(), "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_resolve_priority() {
        let settings = LoggingSettings {
            level: Some("info".to_string()),
            format: Some("json".to_string()),
            file: Some(PathBuf::from("roster.log")),
        };

        let configured = LoggingConfig::resolve(&settings, false, None);
        assert_eq!(configured.filter.to_string(), "info");
        let verbose = LoggingConfig::resolve(&settings, true, None);
        assert_eq!(verbose.filter.to_string(), "debug");
        let from_env = LoggingConfig::resolve(&settings, true, Some("roster=trace"));
        assert_eq!(from_env.filter.to_string(), "roster=trace");
        assert_eq!(from_env.format, LogFormat::Json);
        assert_eq!(from_env.file, Some(PathBuf::from("roster.log")));
    }

    #[test]
    fn test_resolve_ignores_unparseable_env() {
        let config =
            LoggingConfig::resolve(&LoggingSettings::default(), false, Some("roster=notalevel"));
        assert_eq!(config.filter.to_string(), "warn");
    }
}
