//! Post lifecycle: listing, lookup and authenticated mutation.

use std::sync::Arc;

use crate::domain::{NewPost, Page, PageInfo, PageRequest, Post, PostFilter, PostUpdate};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, TokenClaims};

/// Message returned when a slug is already in use.
pub const SLUG_TAKEN: &str = "a post with this slug already exists";

/// Enforces slug uniqueness, required fields and partial-update rules.
///
/// The uniqueness pre-checks are a fast path only; the repository's unique
/// constraint is authoritative and its violation is reported the same way.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

fn conflict_or(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Conflict(SLUG_TAKEN.to_string()),
        other => other.into(),
    }
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Page through posts, newest first.
    pub async fn list(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let items = self
            .posts
            .list(filter, request.skip(), request.limit())
            .await?;
        let total = self.posts.count(filter).await?;

        Ok(Page {
            items,
            info: PageInfo::new(request, total),
        })
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", slug))
    }

    pub async fn create(&self, data: NewPost, actor: &TokenClaims) -> Result<Post, DomainError> {
        let post = data.into_post().map_err(DomainError::Validation)?;

        if self.posts.find_by_slug(&post.slug).await?.is_some() {
            return Err(DomainError::Conflict(SLUG_TAKEN.to_string()));
        }

        let saved = self.posts.insert(post).await.map_err(conflict_or)?;
        tracing::info!(slug = %saved.slug, actor = %actor.username, "Post created");
        Ok(saved)
    }

    pub async fn update(
        &self,
        slug: &str,
        update: PostUpdate,
        actor: &TokenClaims,
    ) -> Result<Post, DomainError> {
        let mut post = self.get_by_slug(slug).await?;

        if let Some(Ok(new_slug)) = update.normalized_slug() {
            if new_slug != post.slug && self.posts.find_by_slug(&new_slug).await?.is_some() {
                return Err(DomainError::Conflict(SLUG_TAKEN.to_string()));
            }
        }

        post.apply(update).map_err(DomainError::Validation)?;

        let saved = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", slug),
            other => conflict_or(other),
        })?;
        tracing::info!(slug = %slug, new_slug = %saved.slug, actor = %actor.username, "Post updated");
        Ok(saved)
    }

    pub async fn delete(&self, slug: &str, actor: &TokenClaims) -> Result<(), DomainError> {
        self.posts.delete_by_slug(slug).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", slug),
            other => other.into(),
        })?;
        tracing::info!(slug = %slug, actor = %actor.username, "Post deleted");
        Ok(())
    }
}
