//! In-process doubles for the ports, used by the service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostFilter, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, FileStore, PasswordService, PostRepository, StorageError, TokenClaims,
    TokenService, UserRepository,
};

pub fn admin_claims() -> TokenClaims {
    TokenClaims {
        user_id: Uuid::nil(),
        username: "admin".to_string(),
        exp: i64::MAX,
    }
}

#[derive(Default)]
pub struct FakePostRepository {
    posts: Mutex<Vec<Post>>,
    constraint_on_write: AtomicBool,
}

impl FakePostRepository {
    pub fn len(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    /// Simulate a concurrent writer winning the unique index race.
    pub fn fail_next_write_with_constraint(&self) {
        self.constraint_on_write.store(true, Ordering::SeqCst);
    }

    fn take_constraint_failure(&self) -> Result<(), RepoError> {
        if self.constraint_on_write.swap(false, Ordering::SeqCst) {
            return Err(RepoError::Constraint("posts_slug_key".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn list(
        &self,
        filter: PostFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !filter.published_only || p.published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts
            .iter()
            .filter(|p| !filter.published_only || p.published)
            .count() as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.take_constraint_failure()?;
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint("posts_slug_key".to_string()));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        self.take_constraint_failure()?;
        let mut posts = self.posts.lock().unwrap();
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.slug != slug);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("users_username_key".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }
}

/// Stores `hashed:<password>`; enough to exercise the service flow.
#[derive(Default)]
pub struct PlainPasswordService {
    verifies: AtomicUsize,
}

impl PlainPasswordService {
    pub fn verify_calls(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

impl PasswordService for PlainPasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Issues `token:<user_id>:<username>`.
pub struct FakeTokenService;

impl TokenService for FakeTokenService {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        Ok(format!("token:{user_id}:{username}"))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut parts = token.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("token"), Some(id), Some(username)) => Ok(TokenClaims {
                user_id: Uuid::parse_str(id).map_err(|_| AuthError::InvalidToken)?,
                username: username.to_string(),
                exp: i64::MAX,
            }),
            _ => Err(AuthError::InvalidToken),
        }
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

#[derive(Default)]
pub struct FakeFileStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeFileStore {
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.get(name))
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.files.lock().unwrap().remove(name).is_some())
    }
}
