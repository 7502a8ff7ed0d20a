use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};

use quill_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryRateLimiter, InMemoryUserRepository,
    JwtConfig, JwtTokenService, LocalFileStore, RateLimitConfig,
};

use super::configure_routes;
use crate::state::{AppState, StatePorts};

const BOUNDARY: &str = "quill-test-boundary";

fn test_state(upload_dir: &Path, login_limit: RateLimitConfig) -> AppState {
    AppState::from_ports(StatePorts {
        users: Arc::new(InMemoryUserRepository::new()),
        posts: Arc::new(InMemoryPostRepository::new()),
        passwords: Arc::new(Argon2PasswordService::new()),
        tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
        files: Arc::new(LocalFileStore::new(upload_dir)),
        login_limiter: Arc::new(InMemoryRateLimiter::new(login_limit)),
    })
}

async fn admin_state(upload_dir: &Path) -> AppState {
    let state = test_state(upload_dir, RateLimitConfig::default());
    state.auth.provision("admin", "admin123").await.unwrap();
    state
}

macro_rules! app {
    ($state:expr) => {{
        let state: AppState = $state;
        test::init_service(
            App::new()
                .configure(|cfg| state.register(cfg))
                .configure(configure_routes),
        )
        .await
    }};
}

macro_rules! login {
    ($app:expr) => {{
        let body: Value = test::call_and_read_body_json(
            &$app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": "admin", "password": "admin123"}))
                .to_request(),
        )
        .await;
        format!("Bearer {}", body["token"].as_str().unwrap())
    }};
}

fn post_payload(slug: &str) -> Value {
    json!({
        "slug": slug,
        "title": {"es": "Hola mundo", "en": "Hello world"},
        "excerpt": {"es": "Resumen", "en": "Summary"},
        "content": {"es": "Contenido", "en": "Content"},
        "author": {"name": "Ana", "role": {"es": "Editora", "en": "Editor"}}
    })
}

fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

#[actix_rt::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path(), RateLimitConfig::default()));

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;

    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[actix_rt::test]
async fn test_admin_login_create_and_public_read() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);

    let login: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "admin", "password": "admin123"}))
            .to_request(),
    )
    .await;
    assert_eq!(login["success"], true);
    assert_eq!(login["user"]["username"], "admin");
    assert!(login["expiresIn"].as_i64().unwrap() > 0);
    assert!(login["user"].get("password_hash").is_none());
    let bearer = format!("Bearer {}", login["token"].as_str().unwrap());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(post_payload("hello-world"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/posts/hello-world").to_request(),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["post"]["slug"], "hello-world");
    assert_eq!(body["post"]["published"], true);
    assert_eq!(body["post"]["title"]["en"], "Hello world");
    assert_eq!(body["post"]["image"], "/placeholder.svg");
    assert!(body["post"]["createdAt"].is_string());
}

#[actix_rt::test]
async fn test_login_failures() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "admin"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for (username, password) in [("admin", "wrong-password"), ("nobody", "admin123")] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": username, "password": password}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["detail"], "invalid credentials");
    }
}

#[actix_rt::test]
async fn test_login_is_rate_limited() {
    let dir = tempfile::tempdir().unwrap();
    let limit = RateLimitConfig {
        max_requests: 1,
        window: Duration::from_secs(60),
    };
    let app = app!(test_state(dir.path(), limit));

    let request = || {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "admin", "password": "admin123"}))
            .to_request()
    };

    let first = test::call_service(&app, request()).await;
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let second = test::call_service(&app, request()).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key("retry-after"));
}

#[actix_rt::test]
async fn test_login_limit_ignores_forwarded_for() {
    let dir = tempfile::tempdir().unwrap();
    let limit = RateLimitConfig {
        max_requests: 1,
        window: Duration::from_secs(60),
    };
    let app = app!(test_state(dir.path(), limit));
    let peer: SocketAddr = "10.0.0.9:40000".parse().unwrap();

    let mut statuses = Vec::new();
    for i in 0..5 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .peer_addr(peer)
                .insert_header(("X-Forwarded-For", format!("1.2.3.{i}")))
                .set_json(json!({"username": "admin", "password": "wrong"}))
                .to_request(),
        )
        .await;
        statuses.push(resp.status());
    }

    assert_eq!(statuses[0], StatusCode::UNAUTHORIZED);
    assert!(
        statuses[1..]
            .iter()
            .all(|status| *status == StatusCode::TOO_MANY_REQUESTS)
    );
}

#[actix_rt::test]
async fn test_verify_returns_identity() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);
    let bearer = login!(app);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/verify")
            .insert_header(("Authorization", bearer.as_str()))
            .to_request(),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "admin");
    assert!(body["user"]["userId"].is_string());
}

#[actix_rt::test]
async fn test_mutations_without_valid_token_have_no_effect() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);

    let missing = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_payload("sneaky"))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(missing).await;
    assert_eq!(body["detail"], "token missing");

    let forged = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .set_json(post_payload("sneaky"))
            .to_request(),
    )
    .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(forged).await;
    assert_eq!(body["detail"], "token invalid or expired");

    let upload = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(multipart_body("image", "a.png", "image/png", b"png"))
            .to_request(),
    )
    .await;
    assert_eq!(upload.status(), StatusCode::UNAUTHORIZED);

    for request in [
        test::TestRequest::put()
            .uri("/api/posts/sneaky")
            .set_json(json!({"published": false})),
        test::TestRequest::delete().uri("/api/posts/sneaky"),
        test::TestRequest::delete()
            .uri("/api/upload")
            .set_json(json!({"filename": "a.png"})),
    ] {
        let resp = test::call_service(&app, request.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let listing: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/posts?published=false")
            .to_request(),
    )
    .await;
    assert_eq!(listing["pagination"]["total"], 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[actix_rt::test]
async fn test_create_validation_and_duplicate_slug() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);
    let bearer = login!(app);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"slug": "incomplete", "title": {"es": "Hola"}}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let details = body["details"].as_array().unwrap();
    assert!(details.contains(&json!("title.en")));
    assert!(details.contains(&json!("content.es")));

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(("Authorization", bearer.as_str()))
                .set_json(post_payload("twice"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_rt::test]
async fn test_create_accepts_content_above_default_json_limit() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);
    let bearer = login!(app);

    let long_body = "a".repeat(3 * 1024 * 1024);
    let mut payload = post_payload("long-read");
    payload["content"] = json!({"es": long_body, "en": long_body});

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/posts/long-read").to_request(),
    )
    .await;
    assert_eq!(body["post"]["content"]["en"].as_str().unwrap().len(), 3 * 1024 * 1024);
}

#[actix_rt::test]
async fn test_listing_filters_and_paginates() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);
    let bearer = login!(app);

    for (slug, published) in [("one", true), ("two", true), ("draft", false)] {
        let mut payload = post_payload(slug);
        payload["published"] = json!(published);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(("Authorization", bearer.as_str()))
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let public: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/posts").to_request(),
    )
    .await;
    assert_eq!(public["pagination"]["total"], 2);
    assert!(
        public["posts"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["published"] == true)
    );

    let everything: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/posts?published=false&limit=2&page=2")
            .to_request(),
    )
    .await;
    assert_eq!(everything["pagination"]["total"], 3);
    assert_eq!(everything["pagination"]["pages"], 2);
    assert_eq!(everything["posts"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_update_and_delete_post() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);
    let bearer = login!(app);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(post_payload("editable"))
            .to_request(),
    )
    .await;

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri("/api/posts/editable")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"published": false, "title": {"en": "Edited"}}))
            .to_request(),
    )
    .await;
    assert_eq!(updated["post"]["published"], false);
    assert_eq!(updated["post"]["title"]["en"], "Edited");
    assert_eq!(updated["post"]["title"]["es"], "Hola mundo");
    assert_eq!(updated["post"]["content"]["en"], "Content");

    let missing = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/posts/nope")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"published": true}))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let deleted: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::delete()
            .uri("/api/posts/editable")
            .insert_header(("Authorization", bearer.as_str()))
            .to_request(),
    )
    .await;
    assert_eq!(deleted["success"], true);
    assert!(deleted["message"].is_string());

    let gone = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts/editable").to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_upload_serve_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);
    let bearer = login!(app);

    let uploaded: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header(("Authorization", bearer.as_str()))
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(multipart_body("image", "cover.png", "image/png", b"\x89PNG data"))
            .to_request(),
    )
    .await;
    assert_eq!(uploaded["success"], true);
    assert_eq!(uploaded["type"], "image/png");
    assert_eq!(uploaded["size"], 9);
    let filename = uploaded["filename"].as_str().unwrap().to_string();
    assert!(filename.starts_with("blog-"));
    assert_eq!(uploaded["url"], format!("/uploads/{filename}"));

    let served = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/uploads/{filename}"))
            .to_request(),
    )
    .await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(
        served.headers().get("cache-control").unwrap(),
        "public, max-age=31536000, immutable"
    );
    assert_eq!(test::read_body(served).await.as_ref(), b"\x89PNG data");

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/upload")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"filename": filename}))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/uploads/{filename}"))
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_upload_rejections() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(admin_state(dir.path()).await);
    let bearer = login!(app);

    let spoofed = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header(("Authorization", bearer.as_str()))
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(multipart_body("image", "payload.exe", "image/png", b"MZ"))
            .to_request(),
    )
    .await;
    assert_eq!(spoofed.status(), StatusCode::BAD_REQUEST);

    let oversized = vec![0u8; 6 * 1024 * 1024];
    let too_big = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header(("Authorization", bearer.as_str()))
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(multipart_body("image", "big.jpg", "image/jpeg", &oversized))
            .to_request(),
    )
    .await;
    assert_eq!(too_big.status(), StatusCode::BAD_REQUEST);

    let wrong_field = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header(("Authorization", bearer.as_str()))
            .insert_header(("Content-Type", multipart_content_type()))
            .set_payload(multipart_body("file", "a.png", "image/png", b"png"))
            .to_request(),
    )
    .await;
    assert_eq!(wrong_field.status(), StatusCode::BAD_REQUEST);

    let traversal = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/upload")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"filename": "../secret.png"}))
            .to_request(),
    )
    .await;
    assert_eq!(traversal.status(), StatusCode::BAD_REQUEST);

    let unknown = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/upload")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"filename": "blog-1-2.png"}))
            .to_request(),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
