//! Pre tool use hook handler for Graphiti calls.
//!
//! Rules, by operation:
//!
//! | Operation | Rule | Outcome |
//! |-----------|------|---------|
//! | `add_memory` | `source_description` blank | Block |
//! | `add_memory` | `episode_body` mentions a credential term | Block |
//! | `add_memory` | Default group, first attempt for `name` | Block, remember fingerprint |
//! | `add_memory` | Default group, resubmission of pending `name` | Approve (advisory if body unchanged) |
//! | `add_memory` | Project group | Approve |
//! | `clear_graph` | No review search this session | Block |
//! | `search_nodes` | Always | Approve; entity types naming a review category mark the review done |
//! | anything else | Always | Approve |
//!
//! Only one default-group confirmation is tracked per session: a first
//! attempt for a different `name` replaces the pending one.

use super::HookHandler;
use super::messages;
use crate::Result;
use crate::config::GuardConfig;
use crate::models::{
    BridgeRequest, GraphitiOperation, HookDecision, PendingConfirmation, PreToolUseInput, keys,
    state_flag,
};
use crate::security::CredentialScreen;
use crate::services::ContentFingerprint;
use crate::storage::{SessionStore, SessionStoreExt};
use chrono::Local;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Name this guard registers under `hooks_active`.
pub const HOOK_NAME: &str = "graphiti";

/// Entity types whose search counts as a pre-clear review.
pub const REVIEW_CATEGORIES: &[&str] = &["learning", "decision", "concept"];

/// Result of checking a default-group write against the pending slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmation {
    /// First attempt; the write is now pending.
    Requested,
    /// Resubmission of the pending write.
    Confirmed {
        /// Body fingerprint matches the pending one.
        unchanged: bool,
    },
}

/// Handles `PreToolUse` events for Graphiti calls behind the MCP bridge.
pub struct GraphitiGuard<S> {
    store: S,
    bridge_tool: String,
    tool_marker: String,
    default_group_id: String,
    screen: CredentialScreen,
}

impl<S: SessionStore> GraphitiGuard<S> {
    /// Creates a guard with default settings over `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::from_config(store, &GuardConfig::default())
    }

    /// Creates a guard using the tool names and default group from `config`.
    #[must_use]
    pub fn from_config(store: S, config: &GuardConfig) -> Self {
        Self {
            store,
            bridge_tool: config.bridge_tool.clone(),
            tool_marker: config.tool_marker.to_lowercase(),
            default_group_id: config.default_group_id.clone(),
            screen: CredentialScreen::new(),
        }
    }

    /// The session store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Evaluates one raw hook payload.
    ///
    /// Unparseable payloads are approved without touching state.
    #[instrument(skip_all, fields(hook = "PreToolUse"))]
    pub fn evaluate(&self, input: &str) -> HookDecision {
        let request = match PreToolUseInput::parse(input) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "unparseable hook payload, approving");
                return HookDecision::approve();
            },
        };

        self.store.register_hook(HOOK_NAME);
        self.evaluate_request(&request)
    }

    /// Evaluates a parsed request.
    pub fn evaluate_request(&self, request: &PreToolUseInput) -> HookDecision {
        if request.tool_name != self.bridge_tool {
            return HookDecision::approve();
        }

        let bridge = &request.bridge;
        if !bridge.tool.to_lowercase().contains(&self.tool_marker) {
            return HookDecision::approve();
        }

        let operation = bridge.operation();
        let decision = match operation {
            GraphitiOperation::AddMemory => self.check_add_memory(bridge),
            GraphitiOperation::ClearGraph => self.check_clear_graph(),
            GraphitiOperation::SearchNodes => self.track_search(bridge),
            GraphitiOperation::Other => HookDecision::approve(),
        };

        info!(
            operation = operation.as_str(),
            tool = %bridge.tool,
            blocked = decision.is_block(),
            advisory = decision.message().is_some(),
            "graphiti call evaluated"
        );
        decision
    }

    fn check_add_memory(&self, bridge: &BridgeRequest) -> HookDecision {
        if bridge.non_blank_arg("source_description").is_none() {
            return HookDecision::block(messages::missing_source(Local::now().date_naive()));
        }

        let body = bridge.str_arg("episode_body").unwrap_or_default();
        let terms = self.screen.matched_terms(body);
        if !terms.is_empty() {
            return HookDecision::block(messages::credentials_detected(&terms));
        }

        let group_id = bridge
            .non_blank_arg("group_id")
            .unwrap_or(self.default_group_id.as_str());
        if group_id != self.default_group_id.as_str() {
            return HookDecision::approve();
        }

        let name = bridge.arg("name").cloned().unwrap_or(Value::Null);
        self.confirm_default_group_write(&name, body)
    }

    /// Two-round confirmation for writes to the default group.
    ///
    /// The pending slot is checked and rewritten inside a single store
    /// update, so one pending record confirms at most one write. If the
    /// update cannot run, the write is treated as a first attempt.
    fn confirm_default_group_write(&self, name: &Value, body: &str) -> HookDecision {
        let fingerprint = ContentFingerprint::of(body);
        let mut outcome = Confirmation::Requested;

        self.store.update(&mut |doc| {
            outcome = match PendingConfirmation::from_document(doc) {
                Some(pending) if pending.name == *name => {
                    doc.insert(keys::MAIN_PENDING.to_string(), PendingConfirmation::cleared());
                    Confirmation::Confirmed {
                        unchanged: pending.content_hash == fingerprint,
                    }
                },
                _ => {
                    doc.insert(
                        keys::MAIN_PENDING.to_string(),
                        PendingConfirmation::new(name.clone(), fingerprint.as_str()).to_value(),
                    );
                    Confirmation::Requested
                },
            };
        });

        let display_name = match name {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        match outcome {
            Confirmation::Confirmed { unchanged: true } => HookDecision::approve_with_message(
                messages::unchanged_resubmission(&display_name, &self.default_group_id),
            ),
            Confirmation::Confirmed { unchanged: false } => HookDecision::approve(),
            Confirmation::Requested => HookDecision::block(messages::confirm_default_group(
                &display_name,
                &self.default_group_id,
            )),
        }
    }

    fn check_clear_graph(&self) -> HookDecision {
        if state_flag(&self.store.read(), keys::REVIEW_DONE) {
            HookDecision::approve()
        } else {
            HookDecision::block(messages::review_required(&self.default_group_id))
        }
    }

    fn track_search(&self, bridge: &BridgeRequest) -> HookDecision {
        let entity_types = bridge
            .arg("entity_types")
            .map(|value| match value {
                Value::String(s) => s.to_lowercase(),
                other => other.to_string().to_lowercase(),
            })
            .unwrap_or_default();
        let is_review = REVIEW_CATEGORIES
            .iter()
            .any(|category| entity_types.contains(category));

        self.store.update(&mut |doc| {
            if is_review {
                doc.insert(keys::REVIEW_DONE.to_string(), Value::Bool(true));
            }
            doc.insert(keys::SEARCHED.to_string(), Value::Bool(true));
        });

        HookDecision::approve()
    }
}

impl<S: SessionStore> HookHandler for GraphitiGuard<S> {
    fn event_type(&self) -> &'static str {
        "PreToolUse"
    }

    fn handle(&self, input: &str) -> Result<String> {
        self.evaluate(input).to_json()
    }
}
