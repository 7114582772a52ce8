use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credential::{StoredCredential, Verification};
use crate::ports::{AuthError, PasswordService};

/// Maximum length of a username, enforced by the schema and the form.
pub const USERNAME_MAX_LEN: usize = 255;

/// User entity - someone who can log in and write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Salted hash. Only legacy rows hold anything else.
    #[serde(skip_serializing)]
    pub password: String,
    pub last_logged: DateTime<Utc>,
}

impl User {
    /// Check `candidate` against the stored credential.
    ///
    /// A legacy cleartext match replaces the stored value with a hash and
    /// reports [`Verification::Rehashed`]; the caller persists the user.
    pub fn verify_password(
        &mut self,
        candidate: &str,
        hasher: &dyn PasswordService,
    ) -> Result<Verification, AuthError> {
        let legacy_match = match StoredCredential::classify(&self.password, hasher) {
            StoredCredential::Hashed(hash) => {
                return Ok(if hasher.verify(candidate, hash)? {
                    Verification::Verified
                } else {
                    Verification::Rejected
                });
            }
            StoredCredential::Legacy(legacy) => legacy.matches(candidate),
        };

        if !legacy_match {
            return Ok(Verification::Rejected);
        }
        self.set_password(candidate, hasher)?;
        Ok(Verification::Rehashed)
    }

    /// Replace the stored credential with a fresh salted hash.
    pub fn set_password(
        &mut self,
        candidate: &str,
        hasher: &dyn PasswordService,
    ) -> Result<(), AuthError> {
        self.password = hasher.hash(candidate)?;
        Ok(())
    }
}

/// A user that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub last_logged: DateTime<Utc>,
}

impl NewUser {
    /// Hash `password` and stamp the account with the current time.
    pub fn register(
        username: impl Into<String>,
        password: &str,
        hasher: &dyn PasswordService,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            username: username.into(),
            password: hasher.hash(password)?,
            last_logged: Utc::now(),
        })
    }
}
