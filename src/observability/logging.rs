//! Structured logging configuration.

use crate::config::{LoggingSettings, expand_home};
use std::path::PathBuf;

/// Environment override for the filter directive.
pub const LOG_LEVEL_ENV: &str = "GRAPHITI_GUARD_LOG";
/// Environment override for the output format.
pub const LOG_FORMAT_ENV: &str = "GRAPHITI_GUARD_LOG_FORMAT";
/// Environment override for the log file.
pub const LOG_FILE_ENV: &str = "GRAPHITI_GUARD_LOG_FILE";

/// Filter used when nothing is configured. Hooks stay quiet unless asked.
const DEFAULT_LEVEL: &str = "warn";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; unknown names yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when `None`. Stdout is reserved for hook responses.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds logging config from file settings and process environment.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_settings_with_env(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Builds logging config reading environment overrides through `lookup`.
    #[must_use]
    pub fn from_settings_with_env(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut filter = settings
            .and_then(|cfg| cfg.level.clone())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let mut format = settings
            .and_then(|cfg| cfg.format.as_deref())
            .and_then(LogFormat::parse)
            .unwrap_or_default();
        let mut file = settings.and_then(|cfg| cfg.file.clone());

        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            filter = level;
        }
        if let Some(parsed) = lookup(LOG_FORMAT_ENV).as_deref().and_then(LogFormat::parse) {
            format = parsed;
        }
        if let Some(path) = lookup(LOG_FILE_ENV).filter(|v| !v.is_empty()) {
            file = Some(expand_home(&path));
        }
        if verbose {
            filter = "debug".to_string();
        }

        Self {
            filter,
            format,
            file,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LEVEL.to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::from_settings_with_env(None, false, no_env);
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_settings_then_env_then_verbose() {
        let settings = LoggingSettings {
            level: Some("info".to_string()),
            format: Some("json".to_string()),
            file: None,
        };

        let config = LoggingConfig::from_settings_with_env(Some(&settings), false, no_env);
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);

        let config = LoggingConfig::from_settings_with_env(Some(&settings), false, |key| {
            (key == LOG_FORMAT_ENV).then(|| "pretty".to_string())
        });
        assert_eq!(config.format, LogFormat::Pretty);

        let config = LoggingConfig::from_settings_with_env(Some(&settings), true, no_env);
        assert_eq!(config.filter, "debug");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
