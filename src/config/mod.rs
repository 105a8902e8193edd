//! Configuration management.
//!
//! Configuration is read from a TOML file and then overridden by environment
//! variables. Every field has a default, so a missing file is not an error.
//!
//! ```toml
//! state_dir = "/tmp"
//! lock_timeout_ms = 2000
//! bridge_tool = "mcp__mcp-funnel__bridge_tool_request"
//! tool_marker = "graphiti"
//! default_group_id = "main"
//!
//! [logging]
//! level = "warn"
//! format = "json"
//! file = "~/.local/state/graphiti-guard/guard.log"  # `~` expands to the home directory
//! ```

use crate::models::SessionId;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable carrying the host's session id.
pub const SESSION_ID_ENV: &str = "CLAUDE_SESSION_ID";
/// Environment override for [`GuardConfig::state_dir`].
pub const STATE_DIR_ENV: &str = "GRAPHITI_GUARD_STATE_DIR";
/// Environment override for [`GuardConfig::lock_timeout_ms`].
pub const LOCK_TIMEOUT_ENV: &str = "GRAPHITI_GUARD_LOCK_TIMEOUT_MS";

/// Bridge tool the host uses to forward calls to other MCP servers.
pub const DEFAULT_BRIDGE_TOOL: &str = "mcp__mcp-funnel__bridge_tool_request";
/// Marker identifying Graphiti tools behind the bridge.
pub const DEFAULT_TOOL_MARKER: &str = "graphiti";
/// Group that holds long-lived, cross-project knowledge.
pub const DEFAULT_GROUP_ID: &str = "main";
/// Default wait for the session lock, in milliseconds.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 2000;

/// Main configuration for the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Directory holding session state and lock files.
    pub state_dir: PathBuf,
    /// Explicit session id; `None` falls back to the per-day id.
    pub session_id: Option<String>,
    /// Maximum wait for the session lock, in milliseconds.
    pub lock_timeout_ms: u64,
    /// Tool name of the MCP bridge.
    pub bridge_tool: String,
    /// Substring identifying governed tools behind the bridge.
    pub tool_marker: String,
    /// Group id assumed when a write names none.
    pub default_group_id: String,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section.
///
/// Raw values; [`crate::observability::LoggingConfig`] resolves them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `warn` or `graphiti_guard=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Expands a leading `~` to the home directory.
///
/// Paths without the prefix, and all paths when no home directory is known,
/// are returned as given.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => rest,
            None => return PathBuf::from(path),
        },
        None => return PathBuf::from(path),
    };
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(path),
        |dirs| dirs.home_dir().join(rest),
    )
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// State directory.
    pub state_dir: Option<String>,
    /// Session id.
    pub session_id: Option<String>,
    /// Lock timeout.
    pub lock_timeout_ms: Option<u64>,
    /// Bridge tool name.
    pub bridge_tool: Option<String>,
    /// Governed tool marker.
    pub tool_marker: Option<String>,
    /// Default group id.
    pub default_group_id: Option<String>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            state_dir: std::env::temp_dir(),
            session_id: None,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            bridge_tool: DEFAULT_BRIDGE_TOOL.to_string(),
            tool_marker: DEFAULT_TOOL_MARKER.to_string(),
            default_group_id: DEFAULT_GROUP_ID.to_string(),
            logging: LoggingSettings::default(),
        }
    }
}

impl GuardConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `path` if given, otherwise from the default
    /// locations, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::operation("read_config_file", format!("{}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration file.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/graphiti-guard/` on macOS)
    /// 2. XDG config dir (`~/.config/graphiti-guard/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("graphiti-guard").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("graphiti-guard")
                .join("config.toml"),
        ];

        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(path).ok())
            .unwrap_or_default()
    }

    /// Converts a `ConfigFile` to `GuardConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(state_dir) = file.state_dir {
            config.state_dir = expand_home(&state_dir);
        }
        config.session_id = file.session_id.filter(|id| !id.trim().is_empty());
        if let Some(timeout) = file.lock_timeout_ms {
            config.lock_timeout_ms = timeout;
        }
        if let Some(bridge_tool) = file.bridge_tool {
            config.bridge_tool = bridge_tool;
        }
        if let Some(marker) = file.tool_marker {
            config.tool_marker = marker;
        }
        if let Some(group) = file.default_group_id.filter(|g| !g.trim().is_empty()) {
            config.default_group_id = group.trim().to_string();
        }
        if let Some(mut logging) = file.logging {
            logging.file = logging
                .file
                .map(|path| expand_home(&path.to_string_lossy()));
            config.logging = logging;
        }

        config
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Unparseable numeric values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(session) = lookup(SESSION_ID_ENV).filter(|id| !id.trim().is_empty()) {
            self.session_id = Some(session);
        }
        if let Some(dir) = lookup(STATE_DIR_ENV).filter(|dir| !dir.is_empty()) {
            self.state_dir = expand_home(&dir);
        }
        if let Some(timeout) = lookup(LOCK_TIMEOUT_ENV).and_then(|v| v.trim().parse().ok()) {
            self.lock_timeout_ms = timeout;
        }
        self
    }

    /// Sets the state directory.
    #[must_use]
    pub fn with_state_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_dir = path.into();
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Resolves the session id, falling back to today's per-day id.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        SessionId::resolve(self.session_id.as_deref())
    }

    /// Lock timeout as a `Duration`.
    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/var/log/guard.log"), PathBuf::from("/var/log/guard.log"));
        assert_eq!(expand_home("~user/guard.log"), PathBuf::from("~user/guard.log"));

        if let Some(dirs) = directories::BaseDirs::new() {
            assert_eq!(
                expand_home("~/.local/state/guard.log"),
                dirs.home_dir().join(".local/state/guard.log")
            );
            assert_eq!(expand_home("~"), dirs.home_dir());
        }
    }

    #[test]
    fn test_tilde_paths_in_file_are_expanded() {
        let config = GuardConfig::from_toml(
            r#"
            state_dir = "~/guard-state"

            [logging]
            file = "~/.local/state/graphiti-guard/guard.log"
            "#,
        )
        .unwrap();

        assert!(!config.state_dir.starts_with("~"));
        assert!(config.logging.file.as_ref().is_some_and(|f| !f.starts_with("~")));
        assert!(config.logging.file.unwrap().ends_with(".local/state/graphiti-guard/guard.log"));
    }

    #[test]
    fn test_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.bridge_tool, DEFAULT_BRIDGE_TOOL);
        assert_eq!(config.tool_marker, "graphiti");
        assert_eq!(config.default_group_id, "main");
        assert_eq!(config.lock_timeout(), Duration::from_millis(2000));
        assert_eq!(config.session_id, None);
    }

    #[test]
    fn test_from_toml() {
        let config = GuardConfig::from_toml(
            r#"
            state_dir = "/var/tmp/guard"
            lock_timeout_ms = 500
            default_group_id = " knowledge "

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.state_dir, PathBuf::from("/var/tmp/guard"));
        assert_eq!(config.lock_timeout_ms, 500);
        assert_eq!(config.default_group_id, "knowledge");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.bridge_tool, DEFAULT_BRIDGE_TOOL);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(GuardConfig::from_toml("lock_timeout_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = GuardConfig::load_from_file(Path::new("/nonexistent/graphiti-guard.toml"));
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let config = GuardConfig::default().with_env_overrides(env(&[
            (SESSION_ID_ENV, "sess-42"),
            (STATE_DIR_ENV, "/run/guard"),
            (LOCK_TIMEOUT_ENV, "250"),
        ]));

        assert_eq!(config.session_id().as_str(), "sess-42");
        assert_eq!(config.state_dir, PathBuf::from("/run/guard"));
        assert_eq!(config.lock_timeout_ms, 250);
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let config = GuardConfig::default()
            .with_env_overrides(env(&[(SESSION_ID_ENV, "  "), (LOCK_TIMEOUT_ENV, "later")]));

        assert_eq!(config.session_id, None);
        assert_eq!(config.lock_timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    }
}
