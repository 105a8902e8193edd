//! Hook decision record written to stdout.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Decision returned to the host runtime for one intercepted tool call.
///
/// Serialized with an internal `decision` tag:
///
/// ```json
/// {"decision": "approve"}
/// {"decision": "approve", "message": "advisory text"}
/// {"decision": "block", "reason": "why the call was refused"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum HookDecision {
    /// The call may proceed, optionally with a non-blocking advisory.
    Approve {
        /// Advisory shown to the caller.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// The call is refused.
    Block {
        /// Explanation shown to the caller.
        reason: String,
    },
}

impl HookDecision {
    /// Plain approval.
    #[must_use]
    pub const fn approve() -> Self {
        Self::Approve { message: None }
    }

    /// Approval carrying an advisory message.
    #[must_use]
    pub fn approve_with_message(message: impl Into<String>) -> Self {
        Self::Approve {
            message: Some(message.into()),
        }
    }

    /// Block with a reason.
    #[must_use]
    pub fn block(reason: impl Into<String>) -> Self {
        Self::Block {
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`HookDecision::Block`].
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// Returns `true` for [`HookDecision::Approve`].
    #[must_use]
    pub const fn is_approve(&self) -> bool {
        matches!(self, Self::Approve { .. })
    }

    /// The block reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Block { reason } => Some(reason),
            Self::Approve { .. } => None,
        }
    }

    /// The advisory message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Approve { message } => message.as_deref(),
            Self::Block { .. } => None,
        }
    }

    /// Serializes the decision as a single-line JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::operation("encode_decision", e))
    }
}

impl Default for HookDecision {
    fn default() -> Self {
        Self::approve()
    }
}
