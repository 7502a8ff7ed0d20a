use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

/// In-memory credential store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        users.push(user.clone());
        Ok(user)
    }
}
