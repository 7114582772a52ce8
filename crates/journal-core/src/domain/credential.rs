//! Stored password classification.
//!
//! Rows written before passwords were hashed still hold the cleartext value.
//! Those are routed through [`LegacyCredential`] so the normal verification
//! path only ever compares against a real hash.

use subtle::ConstantTimeEq;

use crate::ports::PasswordService;

/// Outcome of checking a candidate password against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The candidate matched the stored hash.
    Verified,
    /// The candidate matched a legacy cleartext value, which has been
    /// replaced by a fresh hash. The owner must be persisted.
    Rehashed,
    Rejected,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        !matches!(self, Verification::Rejected)
    }
}

/// The stored password column, classified.
#[derive(Debug)]
pub enum StoredCredential<'a> {
    Hashed(&'a str),
    Legacy(LegacyCredential<'a>),
}

impl<'a> StoredCredential<'a> {
    pub fn classify(stored: &'a str, hasher: &dyn PasswordService) -> Self {
        if hasher.is_hash(stored) {
            StoredCredential::Hashed(stored)
        } else {
            StoredCredential::Legacy(LegacyCredential(stored))
        }
    }
}

/// A cleartext password left over from an old record.
#[derive(Debug)]
pub struct LegacyCredential<'a>(&'a str);

impl LegacyCredential<'_> {
    /// Compare without short-circuiting on the first differing byte.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}
