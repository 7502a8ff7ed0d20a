//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService, extract_bearer_token};
pub use rate_limit::{RateLimitResult, RateLimiter};
pub use repository::{PostRepository, UserRepository};
pub use storage::{FileStore, StorageError};
