//! Page handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use pressroom_shared::ApiResponse;
use pressroom_shared::dto::{CreatePageRequest, MessageBody, PageBody, PagesBody, UpdatePageRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/pages
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePageRequest>,
) -> AppResult<HttpResponse> {
    let page = state
        .pages
        .create(identity.user_id, body.into_inner().into())
        .await?;
    tracing::info!(page_id = %page.id, slug = %page.slug, "Page created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(PageBody { page })))
}

/// PUT /api/pages/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePageRequest>,
) -> AppResult<HttpResponse> {
    let page = state
        .pages
        .update(path.into_inner(), identity.user_id, body.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PageBody { page })))
}

/// GET /api/pages/my-pages
pub async fn my_pages(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let pages = state.pages.list_owned(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PagesBody { pages })))
}

/// DELETE /api/pages/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.pages.delete(id, identity.user_id).await?;
    tracing::info!(page_id = %id, "Page deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageBody::new(
        "Page deleted successfully",
    ))))
}

/// GET /api/pages/{slug}
pub async fn get_published(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let page = state.pages.get_published(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PageBody { page })))
}
