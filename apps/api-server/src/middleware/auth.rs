//! Authorization gate: the bearer-token extractor every mutating handler
//! takes as its first argument.

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use std::ops::Deref;
use std::sync::Arc;

use quill_core::ports::{AuthError, TokenClaims, TokenService, extract_bearer_token};
use quill_shared::ErrorResponse;

/// Authenticated user identity extractor.
///
/// Rejection happens before the request body is read, so a handler taking
/// `Identity` never runs (and never writes anything) without a valid token.
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(TokenClaims);

impl Deref for Identity {
    type Target = TokenClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self(claims)
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::MissingToken | AuthError::InvalidToken => {
                actix_web::http::StatusCode::UNAUTHORIZED
            }
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.0 {
            AuthError::MissingToken | AuthError::InvalidToken => {
                ErrorResponse::unauthorized(self.0.to_string())
            }
            other => {
                tracing::error!("Authentication failure: {}", other);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(token_service) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
            tracing::error!("TokenService not found in app data");
            return ready(Err(AuthenticationError(AuthError::Encoding(
                "token service not configured".to_string(),
            ))));
        };

        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let Some(token) = extract_bearer_token(header_value) else {
            return ready(Err(AuthenticationError(AuthError::MissingToken)));
        };

        ready(
            token_service
                .validate_token(token)
                .map(Identity::from)
                .map_err(|_| AuthenticationError(AuthError::InvalidToken)),
        )
    }
}
