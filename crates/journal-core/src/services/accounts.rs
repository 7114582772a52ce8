//! Registration and login.

use crate::domain::{NewUser, User, Verification};
use crate::error::DomainError;
use crate::forms::Credentials;
use crate::ports::{BaseRepository, PasswordService, UserRepository};

use super::unique;

/// Create an account. A taken username fails with `Duplicate("username")`.
pub async fn register(
    users: &dyn UserRepository,
    hasher: &dyn PasswordService,
    credentials: Credentials,
) -> Result<User, DomainError> {
    if users
        .find_by_username(&credentials.username)
        .await?
        .is_some()
    {
        return Err(DomainError::Duplicate("username"));
    }

    let new_user = NewUser::register(credentials.username, &credentials.password, hasher)?;
    users.insert(new_user).await.map_err(unique("username"))
}

/// The user these credentials belong to, or `None` if they do not check out.
///
/// Unknown usernames and wrong passwords are indistinguishable to the caller.
/// A legacy cleartext password that matches is rehashed and saved.
pub async fn authenticate(
    users: &dyn UserRepository,
    hasher: &dyn PasswordService,
    credentials: &Credentials,
) -> Result<Option<User>, DomainError> {
    let Some(mut user) = users.find_by_username(&credentials.username).await? else {
        return Ok(None);
    };

    match user.verify_password(&credentials.password, hasher)? {
        Verification::Verified => Ok(Some(user)),
        Verification::Rehashed => Ok(Some(users.update(user).await?)),
        Verification::Rejected => Ok(None),
    }
}
