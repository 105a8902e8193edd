//! Credential term screening.
// Allow expect() on the static term set - the patterns are escaped literals
#![allow(clippy::expect_used)]
//!
//! Episodes written to the knowledge graph outlive the session and are shared
//! across projects, so any body that even mentions a credential is refused.
//! This is plain case-insensitive substring matching on a fixed term list,
//! not secret detection: "pin" also matches "spinning". False positives are
//! accepted; a listed term is never let through.

use regex::RegexSet;
use std::sync::LazyLock;

/// Terms that mark an episode body as credential-bearing.
pub const CREDENTIAL_TERMS: &[&str] = &[
    "password",
    "api_key",
    "api-key",
    "apikey",
    "token",
    "secret",
    "pin",
    "credentials",
    "private_key",
    "private-key",
    "privatekey",
    "access_token",
    "access-token",
    "accesstoken",
    "auth_token",
    "auth-token",
    "authtoken",
];

static CREDENTIAL_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(
        CREDENTIAL_TERMS
            .iter()
            .map(|term| format!("(?i){}", regex::escape(term))),
    )
    .expect("static regex set: escaped credential terms")
});

/// Screens text for credential terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialScreen;

impl CredentialScreen {
    /// Creates a screen over [`CREDENTIAL_TERMS`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `true` if `text` contains any credential term.
    #[must_use]
    pub fn contains_credentials(&self, text: &str) -> bool {
        CREDENTIAL_SET.is_match(text)
    }

    /// Returns every term found in `text`, in list order.
    #[must_use]
    pub fn matched_terms(&self, text: &str) -> Vec<&'static str> {
        CREDENTIAL_SET
            .matches(text)
            .into_iter()
            .map(|index| CREDENTIAL_TERMS[index])
            .collect()
    }
}
