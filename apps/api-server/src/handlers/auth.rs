//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;
use quill_shared::dto::{LoginRequest, LoginResponse, TokenIdentity, UserInfo, VerifyResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let username = req.username.as_deref().map(str::trim).unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let outcome = state.auth.login(username, password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(LoginResponse {
        token: outcome.token,
        user: UserInfo {
            id: outcome.user_id.to_string(),
            username: outcome.username,
        },
        expires_in: outcome.expires_in,
    })))
}

/// GET /api/auth/verify
pub async fn verify(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(VerifyResponse {
        user: TokenIdentity {
            user_id: identity.user_id.to_string(),
            username: identity.username.clone(),
        },
    }))
}
