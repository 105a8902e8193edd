//! Security features.
//!
//! Credential term screening for knowledge-graph writes.

mod credentials;

pub use credentials::{CREDENTIAL_TERMS, CredentialScreen};
