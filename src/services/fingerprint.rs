//! Content fingerprints for resubmission detection.

use sha2::{Digest, Sha256};

/// Hex characters kept from the SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 16;

/// Short fingerprint of an episode body.
///
/// The raw body is hashed without normalization: any edit, whitespace
/// included, counts as a change.
///
/// # Example
///
/// ```rust
/// use graphiti_guard::services::ContentFingerprint;
///
/// let fingerprint = ContentFingerprint::of("Use PostgreSQL for primary storage");
/// assert_eq!(fingerprint.len(), 16);
/// assert_eq!(fingerprint, ContentFingerprint::of("Use PostgreSQL for primary storage"));
/// ```
pub struct ContentFingerprint;

impl ContentFingerprint {
    /// Returns the first [`FINGERPRINT_LEN`] lowercase hex characters of the
    /// SHA-256 of `content`.
    #[must_use]
    pub fn of(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(FINGERPRINT_LEN);
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest_prefix() {
        // sha256("") = e3b0c44298fc1c149afbf4c8996fb924...
        assert_eq!(ContentFingerprint::of(""), "e3b0c44298fc1c14");
    }

    #[test]
    fn test_whitespace_changes_fingerprint() {
        assert_ne!(
            ContentFingerprint::of("Prefer small PRs"),
            ContentFingerprint::of("Prefer small PRs ")
        );
    }
}
