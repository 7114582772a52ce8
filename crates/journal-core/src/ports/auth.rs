//! Authentication ports.

/// Claims carried by a signed identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: i32,
    pub username: String,
}

/// Issues and checks the signed identity token kept in the session cookie.
pub trait TokenService: Send + Sync {
    /// Generate a token for a logged-in user.
    fn generate_token(&self, user_id: i32, username: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// Whether `stored` is a hash this service understands.
    fn is_hash(&self, stored: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Not logged in")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
