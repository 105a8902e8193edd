//! Advisory lock on a session's lock file.
//!
//! The lock lives on a sibling `.lock` file rather than the data file so the
//! data file can be replaced by rename while the lock is held. Locks are
//! released when the [`SessionLock`] is dropped, and by the OS when the
//! process dies, so a crashed hook never leaves the session wedged.

use crate::{Error, Result};
use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval while waiting for a contended lock.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lock flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Many holders at once; excludes [`LockMode::Exclusive`].
    Shared,
    /// Single holder.
    Exclusive,
}

/// RAII guard for a held session lock.
#[derive(Debug)]
pub struct SessionLock {
    /// Held open for the lifetime of the guard.
    _file: File,
    path: PathBuf,
    mode: LockMode,
}

impl SessionLock {
    /// Acquires the lock on `path`, creating the file if needed.
    ///
    /// Polls until `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the lock stays contended, or
    /// [`Error::OperationFailed`] if the lock file cannot be opened or locked.
    pub fn acquire(path: &Path, mode: LockMode, timeout: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::operation("open_lock_file", format!("{}: {e}", path.display())))?;

        let start = Instant::now();
        loop {
            let attempt = match mode {
                LockMode::Shared => file.try_lock_shared(),
                LockMode::Exclusive => file.try_lock(),
            };
            match attempt {
                Ok(()) => {
                    return Ok(Self {
                        _file: file,
                        path: path.to_path_buf(),
                        mode,
                    });
                },
                Err(TryLockError::WouldBlock) => {},
                Err(TryLockError::Error(e)) => {
                    return Err(Error::operation(
                        "lock_session_state",
                        format!("{}: {e}", path.display()),
                    ));
                },
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(Error::LockTimeout {
                    path: path.display().to_string(),
                    waited_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                });
            }
            thread::sleep(LOCK_POLL_INTERVAL);
        }
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the lock is held in.
    #[must_use]
    pub const fn mode(&self) -> LockMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHORT: Duration = Duration::from_millis(50);

    #[test]
    fn test_creates_missing_lock_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json.lock");

        let lock = SessionLock::acquire(&path, LockMode::Exclusive, SHORT).unwrap();
        assert!(path.exists());
        assert_eq!(lock.path(), path);
        assert_eq!(lock.mode(), LockMode::Exclusive);
    }

    #[test]
    fn test_shared_locks_coexist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json.lock");

        let first = SessionLock::acquire(&path, LockMode::Shared, SHORT).unwrap();
        let second = SessionLock::acquire(&path, LockMode::Shared, SHORT);
        assert!(second.is_ok());
        drop(first);
    }

    #[test]
    fn test_exclusive_excludes_shared() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json.lock");

        let held = SessionLock::acquire(&path, LockMode::Exclusive, SHORT).unwrap();
        let result = SessionLock::acquire(&path, LockMode::Shared, SHORT);
        assert!(matches!(result, Err(Error::LockTimeout { .. })));

        drop(held);
        assert!(SessionLock::acquire(&path, LockMode::Shared, SHORT).is_ok());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("state.json.lock");

        let result = SessionLock::acquire(&path, LockMode::Shared, SHORT);
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }
}
