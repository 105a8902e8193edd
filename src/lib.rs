//! # Graphiti Guard
//!
//! A `PreToolUse` policy guard for Graphiti knowledge-graph calls made by AI
//! coding assistants.
//!
//! Graphiti operations (`add_memory`, `search_nodes`, `clear_graph`) reach the
//! knowledge graph through an MCP bridge tool. This crate inspects each
//! intercepted call before the host forwards it and enforces a small set of
//! data-governance rules:
//!
//! - every `add_memory` call names its source
//! - credentials never land in an episode body
//! - writes to the default `main` group need a second, deliberate submission
//! - `clear_graph` is only allowed after a review search for learnings,
//!   decisions or concepts
//!
//! Multi-step rules keep their state in a per-session document shared by
//! every hook process of the session (see [`storage`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use graphiti_guard::hooks::{GraphitiGuard, HookHandler};
//! use graphiti_guard::storage::MemorySessionStore;
//!
//! let guard = GraphitiGuard::new(MemorySessionStore::new());
//! let response = guard.handle(r#"{"tool_name": "Read", "tool_input": {}}"#)?;
//! assert_eq!(response, r#"{"decision":"approve"}"#);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod hooks;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;

pub use config::{GuardConfig, LoggingSettings};
pub use hooks::{GraphitiGuard, HookHandler};
pub use models::{HookDecision, PendingConfirmation, SessionId, StateDocument};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreExt};

/// Error type for guard operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Hook payload is not JSON, config values are malformed |
/// | `OperationFailed` | State file I/O, JSON encoding, logging setup fail |
/// | `LockTimeout` | The session lock stays held past the configured wait |
///
/// None of these reach the host runtime from the hook path: the guard turns
/// every error into an `approve` decision.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - The hook payload on stdin is not valid JSON
    /// - The payload is valid JSON but not an object
    /// - A configuration value cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Reading, writing or renaming the state file fails
    /// - The lock file cannot be created or opened
    /// - The configuration file cannot be read
    /// - The tracing subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The session lock could not be acquired in time.
    #[error("lock '{path}' not acquired within {waited_ms}ms")]
    LockTimeout {
        /// Path of the lock file.
        path: String,
        /// How long acquisition was attempted.
        waited_ms: u64,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for guard operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::operation("write_state", "disk full");
        assert_eq!(err.to_string(), "operation 'write_state' failed: disk full");

        let err = Error::LockTimeout {
            path: "/tmp/claude-session-x.json.lock".to_string(),
            waited_ms: 2000,
        };
        assert_eq!(
            err.to_string(),
            "lock '/tmp/claude-session-x.json.lock' not acquired within 2000ms"
        );
    }
}
