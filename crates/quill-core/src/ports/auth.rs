//! Authentication ports.

use uuid::Uuid;

/// Identity claim carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub exp: i64,
}

/// Token service trait for signed, time-limited bearer tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for a user.
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Check signature and expiry and return the embedded identity.
    ///
    /// Every failure collapses to [`AuthError::InvalidToken`].
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token missing")]
    MissingToken,

    #[error("token invalid or expired")]
    InvalidToken,

    #[error("Token encoding error: {0}")]
    Encoding(String),

    #[error("Hashing error: {0}")]
    Hashing(String),
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
