//! Application state - shared across all handlers.

use std::sync::Arc;

use actix_web::web;

use quill_core::ports::{
    FileStore, PasswordService, PostRepository, RateLimiter, TokenService, UserRepository,
};
use quill_core::services::{AuthService, PostService, UploadService};
use quill_infra::{
    Argon2PasswordService, DatabaseConnections, InMemoryPostRepository, InMemoryRateLimiter,
    InMemoryUserRepository, JwtTokenService, LocalFileStore,
};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresPostRepository, PostgresUserRepository};

use crate::config::{AdminCredentials, AppConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub auth: AuthService,
    pub uploads: UploadService,
    pub tokens: Arc<dyn TokenService>,
    pub login_limiter: Arc<dyn RateLimiter>,
    pub db: Option<Arc<DatabaseConnections>>,
}

/// Storage and security adapters the services are built from.
pub struct StatePorts {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub passwords: Arc<dyn PasswordService>,
    pub tokens: Arc<dyn TokenService>,
    pub files: Arc<dyn FileStore>,
    pub login_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Fails if `DATABASE_URL` is set but the pool cannot be opened.
    pub async fn new(config: &AppConfig) -> Result<Self, String> {
        #[cfg(feature = "postgres")]
        let (db, users, posts): (
            Option<Arc<DatabaseConnections>>,
            Arc<dyn UserRepository>,
            Arc<dyn PostRepository>,
        ) = match &config.database {
            Some(db_config) => {
                let connections = DatabaseConnections::init(db_config)
                    .await
                    .map_err(|e| format!("Failed to connect to database: {e}"))?;
                let users = Arc::new(PostgresUserRepository::new(connections.main.clone()));
                let posts = Arc::new(PostgresPostRepository::new(connections.main.clone()));
                (Some(Arc::new(connections)), users, posts)
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (
                    None,
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryPostRepository::new()),
                )
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, users, posts): (
            Option<Arc<DatabaseConnections>>,
            Arc<dyn UserRepository>,
            Arc<dyn PostRepository>,
        ) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (
                None,
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryPostRepository::new()),
            )
        };

        tracing::info!(upload_dir = %config.upload_dir.display(), "Upload directory configured");

        let mut state = Self::from_ports(StatePorts {
            users,
            posts,
            passwords: Arc::new(Argon2PasswordService::new()),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            files: Arc::new(LocalFileStore::new(&config.upload_dir)),
            login_limiter: Arc::new(InMemoryRateLimiter::new(config.login_rate_limit.clone())),
        });
        state.db = db;

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Wire the services from explicit adapters.
    pub fn from_ports(ports: StatePorts) -> Self {
        Self {
            posts: PostService::new(ports.posts),
            auth: AuthService::new(ports.users, ports.passwords, ports.tokens.clone()),
            uploads: UploadService::new(ports.files),
            tokens: ports.tokens,
            login_limiter: ports.login_limiter,
            db: None,
        }
    }

    /// Register the state and the pieces extractors/middleware look up.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .app_data(web::Data::new(self.login_limiter.clone()));
    }

    /// Seed the administrator account if it is missing.
    pub async fn provision_admin(&self, admin: &AdminCredentials) {
        match self.auth.provision(&admin.username, &admin.password).await {
            Ok(true) => tracing::info!(username = %admin.username, "Administrator account created"),
            Ok(false) => {
                tracing::info!(username = %admin.username, "Administrator account already exists")
            }
            Err(e) => tracing::error!(error = %e, "Failed to provision administrator account"),
        }
    }
}
