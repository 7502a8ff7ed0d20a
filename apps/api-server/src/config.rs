//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use quill_infra::{DatabaseConfig, JwtConfig, RateLimitConfig};

/// Default upload directory, relative to the working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "./public/uploads";

/// Administrator account seeded at start-up.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub upload_dir: PathBuf,
    pub jwt: JwtConfig,
    pub login_rate_limit: RateLimitConfig,
    pub admin: Option<AdminCredentials>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut db = DatabaseConfig::new(url);
            if let Some(max) = env::var("DB_MAX_CONNECTIONS").ok().and_then(|s| s.parse().ok()) {
                db.max_connections = max;
            }
            if let Some(min) = env::var("DB_MIN_CONNECTIONS").ok().and_then(|s| s.parse().ok()) {
                db.min_connections = min;
            }
            db
        });

        // Seeding only happens when a password is explicitly provided.
        let admin = env::var("ADMIN_PASSWORD").ok().map(|password| AdminCredentials {
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password,
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            jwt: JwtConfig::from_env(),
            login_rate_limit: RateLimitConfig::from_env(),
            admin,
        }
    }
}
