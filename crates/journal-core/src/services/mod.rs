//! Journal operations layered on the repository ports.
//!
//! Every function takes the repositories it touches explicitly. Callers pass
//! repositories bound to one transaction and decide when to commit.

pub mod accounts;
pub mod comments;
pub mod posts;

use crate::error::{DomainError, RepoError};

/// Map a unique-constraint failure on `field` to [`DomainError::Duplicate`].
fn unique(field: &'static str) -> impl Fn(RepoError) -> DomainError {
    move |err| match err {
        RepoError::Constraint(_) => DomainError::Duplicate(field),
        other => DomainError::Repository(other),
    }
}
