//! Session identity.

use chrono::{Local, NaiveDate};
use std::fmt;

/// Identifier of one interactive session.
///
/// Hooks run as separate processes, so the id is what ties their state
/// together. The host passes it through `CLAUDE_SESSION_ID`; when that is
/// missing every hook of the same calendar day shares one id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an explicit identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Uses `explicit` when it has content, otherwise today's per-day id.
    #[must_use]
    pub fn resolve(explicit: Option<&str>) -> Self {
        explicit
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(|| Self::for_date(Local::now().date_naive()), Self::new)
    }

    /// The per-day fallback id (`YYYYMMDD`).
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self(date.format("%Y%m%d").to_string())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier with every character outside `[A-Za-z0-9_-]`
    /// replaced by `_`, safe to embed in a file name.
    #[must_use]
    pub fn as_file_component(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
