//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod uploads;

#[cfg(test)]
mod tests;

use actix_web::{error, web};

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// JSON body ceiling. Post content has no length rule of its own, so this
/// is set well above the actix default of 2 MiB.
pub const MAX_JSON_BYTES: usize = 32 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().limit(MAX_JSON_BYTES).error_handler(
                |err, _req| {
                    let detail = match &err {
                        error::JsonPayloadError::Deserialize(e) => e.to_string(),
                        other => other.to_string(),
                    };
                    AppError::BadRequest(detail).into()
                },
            ))
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
            )
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            .wrap(RateLimitMiddleware)
                            .route(web::post().to(auth::login)),
                    )
                    .route("/verify", web::get().to(auth::verify)),
            )
            // Post routes
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{slug}")
                    .route(web::get().to(posts::get_post))
                    .route(web::put().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            )
            // Upload routes
            .service(
                web::resource("/upload")
                    .route(web::post().to(uploads::upload_image))
                    .route(web::delete().to(uploads::delete_upload)),
            ),
    )
    .route("/uploads/{filename}", web::get().to(uploads::serve_upload));
}
