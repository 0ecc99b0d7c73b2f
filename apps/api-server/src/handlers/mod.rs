//! HTTP handlers and route configuration.

mod auth;
mod form;
mod health;
mod pages;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::error::JsonPayloadError;
use actix_web::http::header;
use actix_web::{guard, web};

use crate::middleware::error::AppError;

/// Largest accepted JSON body.
const JSON_LIMIT: usize = 4 * 1024 * 1024;

/// Extractor settings so malformed input yields the standard error body.
/// A path segment that fails to parse (e.g. a non-UUID id) is a 404.
fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _req| json_error(err).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Resource not found".to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

fn json_error(err: JsonPayloadError) -> AppError {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            AppError::PayloadTooLarge(format!("JSON body exceeds {JSON_LIMIT} bytes"))
        }
        other => AppError::BadRequest(other.to_string()),
    }
}

/// Matches `multipart/form-data` requests. Those are routed to handlers that
/// stream the body instead of buffering it.
fn multipart_form() -> impl guard::Guard {
    guard::fn_guard(|ctx| {
        ctx.head()
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value
                    .trim_start()
                    .to_ascii_lowercase()
                    .starts_with("multipart/form-data")
            })
    })
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_extractors(cfg);

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/pages")
                    .route("", web::post().to(pages::create))
                    // Registered before `/{slug}` so it is not read as a slug.
                    .route("/my-pages", web::get().to(pages::my_pages))
                    .route("/{slug}", web::get().to(pages::get_published))
                    .route("/{id}", web::put().to(pages::update))
                    .route("/{id}", web::delete().to(pages::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().guard(multipart_form()).to(posts::create_form))
                    .route("", web::post().to(posts::create))
                    .route("/user/my-posts", web::get().to(posts::my_posts))
                    .route("/{slug}", web::get().to(posts::get_published))
                    .route("/{id}", web::put().guard(multipart_form()).to(posts::update_form))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            ),
    );
}
