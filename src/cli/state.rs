//! State CLI command.
//!
//! Operator tooling for the session state the guard keeps between calls.

use crate::config::GuardConfig;
use crate::models::{SessionId, StateDocument};
use crate::storage::{FileSessionStore, SessionStoreExt};
use crate::{Error, Result};

/// State command handler.
pub struct StateCommand {
    session: SessionId,
    store: FileSessionStore,
}

impl StateCommand {
    /// Creates a state command for `session`, or the configured session when
    /// `None`.
    #[must_use]
    pub fn new(config: &GuardConfig, session: Option<&str>) -> Self {
        let session = session.map_or_else(|| config.session_id(), |id| SessionId::resolve(Some(id)));
        let store = FileSessionStore::new(&config.state_dir, &session)
            .with_lock_timeout(config.lock_timeout());
        Self { session, store }
    }

    /// The session this command operates on.
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Returns the state document as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired or the file cannot be
    /// read, so the operator sees the cause instead of an empty document.
    pub fn show(&self) -> Result<String> {
        let doc: StateDocument = self.store.try_read()?;
        serde_json::to_string_pretty(&doc).map_err(|e| Error::operation("encode_state", e))
    }

    /// Returns the data and lock file paths, one per line.
    #[must_use]
    pub fn paths(&self) -> String {
        format!(
            "state: {}\nlock:  {}",
            self.store.data_path().display(),
            self.store.lock_path().display()
        )
    }

    /// Resets the session document to `{}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be replaced.
    pub fn clear(&self) -> Result<()> {
        self.store.try_update(&mut |doc: &mut StateDocument| doc.clear())
    }

    /// Returns `true` if `hook_name` has run this session.
    #[must_use]
    pub fn is_hook_active(&self, hook_name: &str) -> bool {
        self.store.is_hook_active(hook_name)
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &FileSessionStore {
        &self.store
    }
}
