//! Shared services.

mod fingerprint;

pub use fingerprint::{ContentFingerprint, FINGERPRINT_LEN};
