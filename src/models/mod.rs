//! Data models for the guard.
//!
//! Hook wire types, session identity and the persisted state document.

mod decision;
mod hook_input;
mod session;
mod state;

pub use decision::HookDecision;
pub use hook_input::{BridgeRequest, GraphitiOperation, PreToolUseInput};
pub use session::SessionId;
pub use state::{PendingConfirmation, StateDocument, keys, state_flag};
