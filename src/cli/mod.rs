//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hook pre-tool-use` | Evaluate one intercepted tool call from stdin |
//! | `state show` | Print the session state document |
//! | `state path` | Print the state and lock file paths |
//! | `state clear` | Reset the session state document |
//!
//! # Example Usage
//!
//! ```bash
//! # Called by Claude Code for every matching tool call
//! echo '{"tool_name": "...", "tool_input": {...}}' | graphiti-guard hook pre-tool-use
//!
//! # Inspect what the guard remembers for a session
//! graphiti-guard state show --session "$CLAUDE_SESSION_ID"
//! ```

mod hook;
mod state;

pub use hook::{HookCommand, read_hook_input};
pub use state::StateCommand;
