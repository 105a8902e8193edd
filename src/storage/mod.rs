//! Session state storage.
//!
//! Hooks are short-lived processes, so state that must survive from one tool
//! call to the next lives outside the process. Each session owns one JSON
//! document; [`SessionStore`] exposes atomic read-modify-write over it.
//!
//! | Backend | Scope | Concurrency |
//! |---------|-------|-------------|
//! | [`FileSessionStore`] | Cross-process | Advisory file lock (shared reads, exclusive writes) |
//! | [`MemorySessionStore`] | In-process | `Mutex` |
//!
//! Both backends are best-effort: failures are logged and swallowed, reads
//! degrade to an empty document, and a failed write leaves the previous
//! document intact.

mod file;
mod lock;
mod memory;
mod session;

pub use file::{DEFAULT_LOCK_TIMEOUT, FileSessionStore, MAX_STATE_FILE_SIZE};
pub use lock::{LockMode, SessionLock};
pub use memory::MemorySessionStore;
pub use session::{SessionStore, SessionStoreExt};
