//! Post handlers: public reads and gated mutations.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::domain::{NewPost, PageInfo, PageRequest, Post, PostFilter, PostUpdate};
use quill_shared::dto::ListPostsQuery;
use quill_shared::{ApiResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Serialize)]
struct PostListBody {
    posts: Vec<Post>,
    pagination: PageInfo,
}

#[derive(Serialize)]
struct PostBody {
    post: Post,
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let filter = if query.published_only() {
        PostFilter::published()
    } else {
        PostFilter::all()
    };
    let page = state
        .posts
        .list(filter, PageRequest::new(query.page(), query.limit()))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListBody {
        posts: page.items,
        pagination: page.info,
    })))
}

/// GET /api/posts/{slug}
pub async fn get_post(state: web::Data<AppState>, slug: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostBody { post })))
}

/// POST /api/posts
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<NewPost>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(body.into_inner(), &identity).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(PostBody { post })))
}

/// PUT /api/posts/{slug}
pub async fn update_post(
    identity: Identity,
    state: web::Data<AppState>,
    slug: web::Path<String>,
    body: web::Json<PostUpdate>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(&slug, body.into_inner(), &identity)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostBody { post })))
}

/// DELETE /api/posts/{slug}
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&slug, &identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageResponse::new(
        "Post deleted successfully",
    ))))
}
