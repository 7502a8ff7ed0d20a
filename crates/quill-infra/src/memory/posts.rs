use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::{Post, PostFilter};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

/// In-memory post store. The slug check runs under the write lock, so it
/// behaves like a unique index.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_taken(slug: &str) -> RepoError {
    RepoError::Constraint(format!("slug '{slug}' already exists"))
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(
        &self,
        filter: PostFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut matching: Vec<&Post> = posts
            .iter()
            .filter(|p| !filter.published_only || p.published)
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(to_usize(skip))
            .take(to_usize(limit))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        let total = posts
            .iter()
            .filter(|p| !filter.published_only || p.published)
            .count();
        Ok(total as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(slug_taken(&post.slug));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.slug == post.slug && p.id != post.id) {
            return Err(slug_taken(&post.slug));
        }
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.slug != slug);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
