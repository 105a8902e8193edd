//! Guard integration tests.
//!
//! Each test drives the guard the way the host does: one fresh guard per
//! tool call, sharing state only through the file store.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use graphiti_guard::config::DEFAULT_BRIDGE_TOOL;
use graphiti_guard::models::keys;
use graphiti_guard::{
    FileSessionStore, GraphitiGuard, HookDecision, SessionId, SessionStore, SessionStoreExt,
};
use serde_json::{Value, json};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Runs one invocation with a fresh guard, as a separate hook process would.
fn invoke(dir: &TempDir, session: &str, tool: &str, arguments: &Value) -> HookDecision {
    let store = FileSessionStore::new(dir.path(), &SessionId::new(session));
    let input = json!({
        "tool_name": DEFAULT_BRIDGE_TOOL,
        "tool_input": {"tool": tool, "arguments": arguments}
    })
    .to_string();
    GraphitiGuard::new(store).evaluate(&input)
}

fn main_write(name: &str, body: &str) -> Value {
    json!({
        "name": name,
        "episode_body": body,
        "source_description": "User statement 2026-10-18"
    })
}

// ============================================================================
// Default-group confirmation
// ============================================================================

#[test]
fn test_confirmation_with_unchanged_body_warns() {
    let dir = TempDir::new().unwrap();

    let first = invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1"));
    assert!(first.is_block());

    let second = invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1"));
    assert!(second.is_approve());
    assert!(second.message().is_some());
}

#[test]
fn test_confirmation_with_changed_body_is_silent() {
    let dir = TempDir::new().unwrap();

    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1")).is_block());

    let second = invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B2"));
    assert_eq!(second, HookDecision::approve());
}

#[test]
fn test_third_write_starts_over() {
    let dir = TempDir::new().unwrap();

    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1")).is_block());
    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B2")).is_approve());
    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B3")).is_block());
}

#[test]
fn test_different_name_replaces_pending() {
    let dir = TempDir::new().unwrap();

    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1")).is_block());
    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("Y", "C1")).is_block());
    // X was displaced, so it is a first attempt again
    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1")).is_block());
    // and now Y is displaced
    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("Y", "C1")).is_block());
}

#[test]
fn test_project_write_ignores_pending_state() {
    let dir = TempDir::new().unwrap();

    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1")).is_block());

    let mut project = main_write("X", "B1");
    project["group_id"] = json!("project-foo");
    assert_eq!(
        invoke(&dir, "s", "graphiti__add_memory", &project),
        HookDecision::approve()
    );

    // The pending main-group record is untouched by project writes
    assert!(invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1")).is_approve());
}

#[test]
fn test_project_write_without_source_still_blocks() {
    let dir = TempDir::new().unwrap();
    let args = json!({"name": "X", "episode_body": "b", "group_id": "project-foo"});

    assert!(invoke(&dir, "s", "graphiti__add_memory", &args).is_block());
}

// ============================================================================
// Review before clear
// ============================================================================

#[test]
fn test_clear_graph_after_review_search() {
    let dir = TempDir::new().unwrap();
    let clear = json!({"group_ids": ["project-foo"]});

    assert!(invoke(&dir, "s", "graphiti__clear_graph", &clear).is_block());

    invoke(
        &dir,
        "s",
        "graphiti__search_nodes",
        &json!({"query": "auth", "entity_types": ["Learning", "Procedure"]}),
    );

    for _ in 0..3 {
        assert!(invoke(&dir, "s", "graphiti__clear_graph", &clear).is_approve());
    }
}

#[test]
fn test_sessions_do_not_interfere() {
    let dir = TempDir::new().unwrap();

    invoke(
        &dir,
        "reviewed",
        "graphiti__search_nodes",
        &json!({"entity_types": ["Concept"]}),
    );

    assert!(invoke(&dir, "reviewed", "graphiti__clear_graph", &json!({})).is_approve());
    assert!(invoke(&dir, "fresh", "graphiti__clear_graph", &json!({})).is_block());
}

// ============================================================================
// State bookkeeping
// ============================================================================

#[test]
fn test_state_document_layout() {
    let dir = TempDir::new().unwrap();

    invoke(&dir, "s", "graphiti__add_memory", &main_write("X", "B1"));
    invoke(&dir, "s", "graphiti__search_nodes", &json!({"query": "q"}));

    let raw = std::fs::read_to_string(dir.path().join("claude-session-s.json")).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(doc[keys::HOOKS_ACTIVE], json!({"graphiti": true}));
    assert_eq!(doc[keys::SEARCHED], json!(true));
    assert_eq!(doc[keys::MAIN_PENDING]["name"], json!("X"));
    assert_eq!(doc[keys::MAIN_PENDING]["content_hash"].as_str().unwrap().len(), 16);
    assert!(doc.get(keys::REVIEW_DONE).is_none());
}

#[test]
fn test_guard_preserves_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path(), &SessionId::new("s"));
    store.write_key("context_loaded", json!(["repo-a"]));
    store.register_hook("context");

    invoke(&dir, "s", "graphiti__search_nodes", &json!({"entity_types": ["Decision"]}));

    let doc = store.read();
    assert_eq!(doc.get("context_loaded"), Some(&json!(["repo-a"])));
    assert!(store.is_hook_active("context"));
    assert!(store.is_hook_active("graphiti"));
}

#[test]
fn test_parallel_invocations_keep_all_flags() {
    let dir = Arc::new(TempDir::new().unwrap());

    let handles: Vec<_> = ["Learning", "Decision", "Concept", "Preference"]
        .into_iter()
        .map(|entity| {
            let dir = Arc::clone(&dir);
            thread::spawn(move || {
                let store = FileSessionStore::new(dir.path(), &SessionId::new("p"))
                    .with_lock_timeout(Duration::from_secs(10));
                store.register_hook(&format!("worker-{entity}"));
                invoke(&dir, "p", "graphiti__search_nodes", &json!({"entity_types": [entity]}))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_approve());
    }

    let store = FileSessionStore::new(dir.path(), &SessionId::new("p"));
    for entity in ["Learning", "Decision", "Concept", "Preference"] {
        assert!(store.is_hook_active(&format!("worker-{entity}")));
    }
    assert!(invoke(&dir, "p", "graphiti__clear_graph", &json!({})).is_approve());
}

#[test]
fn test_concurrent_resubmissions_confirm_once() {
    let dir = Arc::new(TempDir::new().unwrap());
    assert!(invoke(&dir, "race", "graphiti__add_memory", &main_write("X", "B1")).is_block());

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                invoke(&dir, "race", "graphiti__add_memory", &main_write("X", "B1"))
            })
        })
        .collect();

    let approvals = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(HookDecision::is_approve)
        .count();
    assert_eq!(approvals, 1);
}
