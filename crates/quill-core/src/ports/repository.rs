use async_trait::async_trait;

use crate::domain::{Post, PostFilter, User};
use crate::error::RepoError;

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user. A taken username yields [`RepoError::Constraint`].
    async fn create(&self, user: User) -> Result<User, RepoError>;
}

/// Post store, keyed by slug.
///
/// Implementations must enforce slug uniqueness themselves and report a
/// collision as [`RepoError::Constraint`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Posts matching `filter`, newest `created_at` first.
    async fn list(&self, filter: PostFilter, skip: u64, limit: u64)
    -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Replace the stored post with the same `id`.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete by slug. [`RepoError::NotFound`] when nothing matched.
    async fn delete_by_slug(&self, slug: &str) -> Result<(), RepoError>;
}
