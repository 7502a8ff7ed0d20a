//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - without `postgres` - in-memory repositories only

pub mod auth;
pub mod database;
pub mod memory;
pub mod rate_limit;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, DatabaseConnections};
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
pub use storage::LocalFileStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};
