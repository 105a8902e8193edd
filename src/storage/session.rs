//! Session store traits.

use crate::models::{StateDocument, keys};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Atomic key/value access to one session's state document.
///
/// Implementations never report failures to the caller. State is advisory
/// bookkeeping: a lost update makes the guard repeat a prompt, it never
/// makes a call fail.
pub trait SessionStore: Send + Sync {
    /// Returns the current document, or an empty one if none exists or it
    /// cannot be read.
    fn read(&self) -> StateDocument;

    /// Applies `transform` to the current document and persists the result
    /// as one atomic step. Concurrent updates are serialized.
    ///
    /// If the document cannot be locked or loaded the transform is not run.
    fn update(&self, transform: &mut dyn FnMut(&mut StateDocument));

    /// Merges `{key: value}` into the document.
    fn write_key(&self, key: &str, value: Value) {
        self.update(&mut |doc| {
            doc.insert(key.to_string(), value.clone());
        });
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn read(&self) -> StateDocument {
        (**self).read()
    }

    fn update(&self, transform: &mut dyn FnMut(&mut StateDocument)) {
        (**self).update(transform);
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn read(&self) -> StateDocument {
        (**self).read()
    }

    fn update(&self, transform: &mut dyn FnMut(&mut StateDocument)) {
        (**self).update(transform);
    }
}

/// Hook bookkeeping built on [`SessionStore`].
pub trait SessionStoreExt: SessionStore {
    /// Marks `hook_name` as having run this session.
    ///
    /// Sibling entries in `hooks_active` are preserved; a non-object value is
    /// replaced.
    fn register_hook(&self, hook_name: &str) {
        self.update(&mut |doc| {
            let hooks = doc
                .entry(keys::HOOKS_ACTIVE)
                .or_insert_with(|| Value::Object(Map::new()));
            if !hooks.is_object() {
                *hooks = Value::Object(Map::new());
            }
            if let Value::Object(hooks) = hooks {
                hooks.insert(hook_name.to_string(), Value::Bool(true));
            }
        });
    }

    /// Returns `true` if `hook_name` has run this session.
    fn is_hook_active(&self, hook_name: &str) -> bool {
        self.read()
            .get(keys::HOOKS_ACTIVE)
            .and_then(|hooks| hooks.get(hook_name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Resets the document to `{}`.
    fn clear(&self) {
        self.update(&mut |doc: &mut StateDocument| doc.clear());
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}
