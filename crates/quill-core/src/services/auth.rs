//! Credential verification, login and administrator provisioning.

use std::sync::{Arc, OnceLock};

use uuid::Uuid;

use crate::domain::{PASSWORD_MIN_CHARS, USERNAME_CHARS, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, TokenService, UserRepository};

/// A successful login: the issued token and the public part of the user.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub expires_in: i64,
}

/// Password hashed once and verified against when the username is unknown.
const DECOY_PASSWORD: &str = "quill-decoy-password";

/// Login and provisioning on top of the credential store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    decoy_hash: Arc<OnceLock<Option<String>>>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Spend the same hashing work a real password check costs, so response
    /// time does not reveal whether the username exists.
    fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.passwords.hash(DECOY_PASSWORD).ok());
        if let Some(hash) = decoy {
            let _ = self.passwords.verify(password, hash);
        }
    }

    /// Verify credentials and issue a token.
    ///
    /// An unknown username and a wrong password fail identically with
    /// [`DomainError::InvalidCredentials`].
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            self.verify_decoy(password);
            tracing::debug!("Login rejected: unknown user");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(user.id, &user.username)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            token,
            user_id: user.id,
            username: user.username,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Create the account if it does not exist yet.
    ///
    /// Returns `true` when a user was created and `false` when the username
    /// was already taken.
    pub async fn provision(&self, username: &str, password: &str) -> Result<bool, DomainError> {
        let username = username.trim();
        let mut errors = Vec::new();
        if !USERNAME_CHARS.contains(&username.chars().count()) {
            errors.push(format!(
                "username must be between {} and {} characters",
                USERNAME_CHARS.start(),
                USERNAME_CHARS.end()
            ));
        }
        if password.chars().count() < PASSWORD_MIN_CHARS {
            errors.push(format!(
                "password must be at least {PASSWORD_MIN_CHARS} characters"
            ));
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let hash = self.passwords.hash(password)?;
        match self.users.create(User::new(username.to_string(), hash)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "User provisioned");
                Ok(true)
            }
            Err(RepoError::Constraint(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
