//! Claude Code hooks.
//!
//! Implements handlers for Claude Code hook events.
//!
//! # Hook Response JSON Format
//!
//! `PreToolUse` hooks answer with a decision record on stdout:
//!
//! | Decision | Fields | Host behaviour |
//! |----------|--------|----------------|
//! | Approve | `{"decision": "approve"}` | Call proceeds |
//! | Approve with advisory | `{"decision": "approve", "message": "..."}` | Call proceeds, message shown |
//! | Block | `{"decision": "block", "reason": "..."}` | Call refused, reason shown |
//!
//! # Failure Policy
//!
//! Handlers fail open. A payload that cannot be parsed, a state file that
//! cannot be read, or a lock that cannot be taken all end in a well-formed
//! decision; no handler error may abort the surrounding session.

mod messages;
mod pre_tool_use;

pub use pre_tool_use::{GraphitiGuard, HOOK_NAME, REVIEW_CATEGORIES};

use crate::Result;

/// Trait for hook handlers.
pub trait HookHandler: Send + Sync {
    /// The hook event type this handler processes.
    fn event_type(&self) -> &'static str;

    /// Handles the hook event.
    ///
    /// # Errors
    ///
    /// Returns an error if the response cannot be encoded.
    fn handle(&self, input: &str) -> Result<String>;
}
