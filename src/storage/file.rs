//! File-backed session store.
//!
//! Layout for session `<id>` under `state_dir`:
//!
//! ```text
//! <state_dir>/claude-session-<id>.json       state document
//! <state_dir>/claude-session-<id>.json.lock  advisory lock, never deleted
//! ```
//!
//! Readers take a shared lock, writers an exclusive one. Writes go to a temp
//! file in `state_dir` which is renamed over the document, so a reader (or a
//! crash) never sees half a document.

use super::lock::{LockMode, SessionLock};
use super::session::SessionStore;
use crate::config::GuardConfig;
use crate::models::{SessionId, StateDocument};
use crate::{Error, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Default wait for the session lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(2000);

/// State documents larger than this are treated as corrupt (1 MiB).
pub const MAX_STATE_FILE_SIZE: u64 = 1024 * 1024;

/// Session store persisted as a JSON file guarded by a lock file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    data_path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

impl FileSessionStore {
    /// Creates a store for `session` under `state_dir`.
    ///
    /// Nothing is touched on disk until the first read or write.
    #[must_use]
    pub fn new(state_dir: impl AsRef<Path>, session: &SessionId) -> Self {
        let data_path = state_dir
            .as_ref()
            .join(format!("claude-session-{}.json", session.as_file_component()));
        let mut lock_name = data_path.clone().into_os_string();
        lock_name.push(".lock");

        Self {
            data_path,
            lock_path: PathBuf::from(lock_name),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Creates the store for the configured session.
    #[must_use]
    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(&config.state_dir, &config.session_id())
            .with_lock_timeout(config.lock_timeout())
    }

    /// Sets how long to wait for the session lock.
    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Path of the state document.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Path of the lock file.
    #[must_use]
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Reads the document under a shared lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired or the file cannot be
    /// read. A malformed document is not an error; it reads as empty.
    pub fn try_read(&self) -> Result<StateDocument> {
        let _lock = SessionLock::acquire(&self.lock_path, LockMode::Shared, self.lock_timeout)?;
        self.load()
    }

    /// Runs `transform` on the document under an exclusive lock and persists
    /// the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created, the lock
    /// cannot be acquired, or the document cannot be read or replaced. On
    /// error the previous document is left as it was.
    pub fn try_update(&self, transform: &mut dyn FnMut(&mut StateDocument)) -> Result<()> {
        if let Some(parent) = self.data_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::operation("create_state_dir", format!("{}: {e}", parent.display()))
            })?;
        }

        let _lock = SessionLock::acquire(&self.lock_path, LockMode::Exclusive, self.lock_timeout)?;
        let mut doc = self.load()?;
        transform(&mut doc);
        self.persist(&doc)
    }

    /// Loads the document. Caller must hold the lock.
    fn load(&self) -> Result<StateDocument> {
        let metadata = match fs::metadata(&self.data_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StateDocument::new()),
            Err(e) => {
                return Err(Error::operation(
                    "read_state_metadata",
                    format!("{}: {e}", self.data_path.display()),
                ));
            },
        };

        if metadata.len() > MAX_STATE_FILE_SIZE {
            warn!(
                path = %self.data_path.display(),
                size = metadata.len(),
                "state document exceeds {MAX_STATE_FILE_SIZE} bytes, treating as empty"
            );
            return Ok(StateDocument::new());
        }

        let contents = fs::read_to_string(&self.data_path).map_err(|e| {
            Error::operation("read_state", format!("{}: {e}", self.data_path.display()))
        })?;

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(doc)) => Ok(doc),
            Ok(_) => {
                warn!(path = %self.data_path.display(), "state document is not an object, treating as empty");
                Ok(StateDocument::new())
            },
            Err(e) => {
                warn!(path = %self.data_path.display(), error = %e, "state document is corrupt, treating as empty");
                Ok(StateDocument::new())
            },
        }
    }

    /// Atomically replaces the document. Caller must hold the exclusive lock.
    fn persist(&self, doc: &StateDocument) -> Result<()> {
        let parent = self
            .data_path
            .parent()
            .ok_or_else(|| Error::operation("persist_state", "state path has no parent"))?;
        let encoded = serde_json::to_string_pretty(doc)
            .map_err(|e| Error::operation("encode_state", e))?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
            Error::operation("create_state_temp", format!("{}: {e}", parent.display()))
        })?;
        temp.write_all(encoded.as_bytes())
            .map_err(|e| Error::operation("write_state_temp", e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| Error::operation("sync_state_temp", e))?;
        temp.persist(&self.data_path).map_err(|e| {
            Error::operation(
                "replace_state",
                format!("{}: {}", self.data_path.display(), e.error),
            )
        })?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> StateDocument {
        self.try_read().unwrap_or_else(|e| {
            debug!(path = %self.data_path.display(), error = %e, "session state unreadable, using empty state");
            StateDocument::new()
        })
    }

    fn update(&self, transform: &mut dyn FnMut(&mut StateDocument)) {
        if let Err(e) = self.try_update(transform) {
            warn!(path = %self.data_path.display(), error = %e, "session state update dropped");
        }
    }
}
