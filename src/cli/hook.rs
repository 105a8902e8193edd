//! Hook CLI command.
//!
//! Provides the `graphiti-guard hook` subcommand for Claude Code integration.
//!
//! # Configuration
//!
//! Hooks are configured in `.claude/settings.json`:
//!
//! ```json
//! {
//!   "hooks": {
//!     "PreToolUse": [{
//!       "matcher": "mcp__mcp-funnel__bridge_tool_request",
//!       "hooks": [{ "type": "command", "command": "graphiti-guard hook pre-tool-use" }]
//!     }]
//!   }
//! }
//! ```

use crate::config::GuardConfig;
use crate::hooks::{GraphitiGuard, HookHandler};
use crate::models::HookDecision;
use crate::storage::FileSessionStore;
use std::io::Read;
use tracing::warn;

/// Response printed when no decision could be encoded.
const FALLBACK_RESPONSE: &str = r#"{"decision":"approve"}"#;

/// Hook command handler.
///
/// Entry point for Claude Code hook integrations.
pub struct HookCommand {
    config: GuardConfig,
}

impl HookCommand {
    /// Creates a hook command for `config`.
    #[must_use]
    pub const fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Runs the `PreToolUse` guard on `input` against the session's file
    /// store and returns the response line.
    ///
    /// Always yields a decision; errors become an approval.
    #[must_use]
    pub fn run_pre_tool_use(&self, input: &str) -> String {
        let store = FileSessionStore::from_config(&self.config);
        let guard = GraphitiGuard::from_config(store, &self.config);

        guard.handle(input).unwrap_or_else(|e| {
            warn!(error = %e, "failed to encode hook response, approving");
            HookDecision::approve()
                .to_json()
                .unwrap_or_else(|_| FALLBACK_RESPONSE.to_string())
        })
    }
}

impl Default for HookCommand {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

/// Reads the hook payload once.
///
/// A read failure yields an empty payload, which the guard approves.
#[must_use]
pub fn read_hook_input(mut reader: impl Read) -> String {
    let mut input = String::new();
    if let Err(e) = reader.read_to_string(&mut input) {
        warn!(error = %e, "failed to read hook input");
        input.clear();
    }
    input
}
