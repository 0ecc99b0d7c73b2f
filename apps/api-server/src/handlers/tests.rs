//! Handler round-trips over in-memory state.

use std::path::Path;
use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use pressroom_core::ports::{PasswordService, TokenService};
use pressroom_infra::{Argon2PasswordService, JwtConfig, JwtTokenService, UploadConfig};

use super::configure_routes;
use crate::state::AppState;

struct TestContext {
    state: AppState,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl TestContext {
    fn new(upload_dir: &Path) -> Self {
        Self::with_upload_limit(upload_dir, 1024)
    }

    fn with_upload_limit(upload_dir: &Path, max_bytes: usize) -> Self {
        let upload = UploadConfig {
            dir: upload_dir.to_path_buf(),
            public_prefix: "/uploads".to_string(),
            max_bytes,
        };

        Self {
            state: AppState::in_memory(&upload),
            tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    fn configure(self) -> impl FnOnce(&mut web::ServiceConfig) {
        let Self {
            state,
            tokens,
            passwords,
        } = self;

        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens))
                .app_data(web::Data::new(passwords));
            configure_routes(cfg);
        }
    }
}

/// Register a user and return their bearer header value.
macro_rules! register {
    ($app:expr, $name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": $name,
                "email": format!("{}@example.com", $name),
                "password": "correct-horse",
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        format!("Bearer {}", body["token"].as_str().unwrap())
    }};
}

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }};
}

const BOUNDARY: &str = "PRESSROOMBOUNDARY";

/// A `multipart/form-data` body with text `fields` and an optional PNG
/// `featuredImage` part.
fn multipart_body(fields: &[(&str, &str)], image: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(data) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"featuredImage\"; \
                 filename=\"cover.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_content_type() -> (header::HeaderName, String) {
    (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
}

fn stored_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[actix_web::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_protected_route_requires_token() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/pages")
            .set_json(json!({"title": "About", "slug": "about"}))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/pages/my-pages")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_auth_login_and_me() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    register!(app, "jane");

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "jane@example.com", "password": "wrong-password"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "jane@example.com", "password": "correct-horse"}))
    );
    assert_eq!(status, StatusCode::OK);
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((header::AUTHORIZATION, bearer))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "jane");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/auth/register").set_json(json!({
            "username": "jane2",
            "email": "jane@example.com",
            "password": "correct-horse",
        }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_page_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let owner = register!(app, "owner");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/pages")
            .insert_header((header::AUTHORIZATION, owner.clone()))
            .set_json(json!({
                "title": "About",
                "slug": "about",
                "components": [{"id": "comp-1", "type": "text", "content": "<p>Hi</p>"}]
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["page"]["isPublished"], false);
    let id = body["page"]["id"].as_str().unwrap().to_string();

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/pages/about"));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/pages/{id}"))
            .insert_header((header::AUTHORIZATION, owner.clone()))
            .set_json(json!({"isPublished": true}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["isPublished"], true);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/pages/about"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["components"][0]["content"], "<p>Hi</p>");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/pages/my-pages")
            .insert_header((header::AUTHORIZATION, owner.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pages"].as_array().unwrap().len(), 1);

    let (status, body) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/pages/{id}"))
            .insert_header((header::AUTHORIZATION, owner))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Page deleted successfully");
}

#[actix_web::test]
async fn test_page_ownership_and_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let owner = register!(app, "owner");
    let stranger = register!(app, "stranger");

    let (_, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/pages")
            .insert_header((header::AUTHORIZATION, owner.clone()))
            .set_json(json!({"title": "Home", "slug": "home"}))
    );
    let id = body["page"]["id"].as_str().unwrap().to_string();

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/pages/{id}"))
            .insert_header((header::AUTHORIZATION, stranger.clone()))
            .set_json(json!({"title": "Mine now"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Page not found");

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/pages/{id}"))
            .insert_header((header::AUTHORIZATION, stranger.clone()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/pages/not-a-uuid")
            .insert_header((header::AUTHORIZATION, owner.clone()))
            .set_json(json!({"title": "x"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/pages")
            .insert_header((header::AUTHORIZATION, stranger))
            .set_json(json!({"title": "Other Home", "slug": "home"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/pages")
            .insert_header((header::AUTHORIZATION, owner))
            .set_json(json!({"title": "  ", "slug": "blank"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_post_views_and_listing() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let author = register!(app, "author");

    for title in ["First Post", "Second Post", "Third Post"] {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header((header::AUTHORIZATION, author.clone()))
                .set_json(json!({
                    "title": title,
                    "content": "<p>Body</p>",
                    "tags": "rust, web",
                    "isPublished": true
                }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    call!(app, test::TestRequest::get().uri("/api/posts/first-post"));
    let (status, body) = call!(app, test::TestRequest::get().uri("/api/posts/first-post"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["views"], 2);
    assert_eq!(body["post"]["author"]["username"], "author");
    assert_eq!(body["post"]["tags"], json!(["rust", "web"]));

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?page=2&limit=2")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["currentPage"], 2);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/posts/user/my-posts")
            .insert_header((header::AUTHORIZATION, author))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_post_validation_and_missing_slug() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let author = register!(app, "author");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author))
            .set_json(json!({"title": "", "content": "<p>Body</p>"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title is required");

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/posts/nothing-here"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_multipart_post_with_featured_image() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let author = register!(app, "author");

    let (status, json) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author))
            .insert_header(multipart_content_type())
            .set_payload(multipart_body(
                &[
                    ("title", "With Cover"),
                    ("content", "<p>Body</p>"),
                    ("isPublished", "true"),
                ],
                Some(b"fake-png-bytes".as_slice()),
            ))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["post"]["slug"], "with-cover");
    assert_eq!(json["post"]["isPublished"], true);

    let image = json["post"]["featuredImage"].as_str().unwrap();
    assert!(image.starts_with("/uploads/"));
    let stored = dir.path().join(image.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"fake-png-bytes");
}

#[actix_web::test]
async fn test_bodies_over_default_payload_limit_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::with_upload_limit(dir.path(), 5 * 1024 * 1024);
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let author = register!(app, "author");

    let image = vec![7u8; 300 * 1024];
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author.clone()))
            .insert_header(multipart_content_type())
            .set_payload(multipart_body(
                &[("title", "Big Cover"), ("content", "<p>Body</p>")],
                Some(image.as_slice()),
            ))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let path = body["post"]["featuredImage"].as_str().unwrap();
    let stored = dir.path().join(path.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::metadata(stored).unwrap().len(), image.len() as u64);

    let long_content = format!("<p>{}</p>", "a".repeat(300 * 1024));
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author.clone()))
            .set_json(json!({"title": "Long Read", "content": long_content}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let oversized = format!("<p>{}</p>", "a".repeat(5 * 1024 * 1024));
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author))
            .set_json(json!({"title": "Too Long", "content": oversized}))
    );
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("exceeds"));
}

#[actix_web::test]
async fn test_rejected_post_writes_leave_no_upload_behind() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let author = register!(app, "author");
    let stranger = register!(app, "stranger");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author.clone()))
            .insert_header(multipart_content_type())
            .set_payload(multipart_body(
                &[("title", "Taken"), ("content", "<p>Body</p>")],
                Some(b"first".as_slice()),
            ))
    );
    assert_eq!(status, StatusCode::CREATED);
    let id = body["post"]["id"].as_str().unwrap().to_string();
    assert_eq!(stored_files(dir.path()), 1);

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .insert_header((header::AUTHORIZATION, stranger))
            .insert_header(multipart_content_type())
            .set_payload(multipart_body(&[("title", "Hijacked")], Some(b"second".as_slice())))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(stored_files(dir.path()), 1);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author))
            .insert_header(multipart_content_type())
            .set_payload(multipart_body(
                &[("title", "Taken"), ("content", "<p>Again</p>")],
                Some(b"third".as_slice()),
            ))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(stored_files(dir.path()), 1);
}

#[actix_web::test]
async fn test_post_update_ownership_and_image_replacement() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = TestContext::new(dir.path());
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let author = register!(app, "author");
    let stranger = register!(app, "stranger");

    let (_, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author.clone()))
            .set_json(json!({"title": "Original", "content": "<p>Body</p>", "isPublished": true}))
    );
    let id = body["post"]["id"].as_str().unwrap().to_string();

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .insert_header((header::AUTHORIZATION, stranger))
            .set_json(json!({"title": "Defaced", "content": "<p>Gone</p>"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/posts/original"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Original");
    assert_eq!(body["post"]["content"], "<p>Body</p>");

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .insert_header((header::AUTHORIZATION, author))
            .insert_header(multipart_content_type())
            .set_payload(multipart_body(&[("excerpt", "Now with a cover")], Some(b"cover".as_slice())))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Original");
    assert_eq!(body["post"]["excerpt"], "Now with a cover");
    let image = body["post"]["featuredImage"].as_str().unwrap();
    let stored = dir.path().join(image.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"cover");
}
