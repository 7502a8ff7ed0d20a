//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, SqlErr,
};

use quill_core::domain::{Post, PostFilter, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn query_err(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(err) => RepoError::Connection(err.to_string()),
        DbErr::ConnectionAcquire(err) => RepoError::Connection(err.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

/// Unique index violations become [`RepoError::Constraint`]; this is what
/// turns a lost slug race into a conflict instead of a 500.
fn write_err(e: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        return RepoError::Constraint(detail);
    }
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint(err_str)
    } else {
        query_err(e)
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = user.into();
        let model = active_model.insert(&self.db).await.map_err(write_err)?;
        Ok(model.into())
    }
}

/// PostgreSQL post repository. Slug uniqueness is backed by the
/// `posts.slug` unique index.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn filtered(filter: PostFilter) -> Select<PostEntity> {
        let query = PostEntity::find();
        if filter.published_only {
            query.filter(post::Column::Published.eq(true))
        } else {
            query
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(
        &self,
        filter: PostFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = Self::filtered(filter)
            .order_by_desc(post::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        Self::filtered(filter)
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = post.into();
        let model = active_model.insert(&self.db).await.map_err(write_err)?;
        Ok(model.into())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = post.into();
        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => write_err(other),
        })?;
        Ok(model.into())
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
