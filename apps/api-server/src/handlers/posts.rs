//! Post handlers. Create and update accept JSON or `multipart/form-data`
//! with an optional `featuredImage` file part; the route table picks the
//! handler by content type.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use pressroom_core::domain::PageRequest;
use pressroom_core::ports::UploadedFile;
use pressroom_shared::ApiResponse;
use pressroom_shared::dto::{
    CreatePostRequest, ListPostsQuery, MessageBody, PostBody, PostListBody, PostsBody,
    UpdatePostRequest,
};

use super::form::PostForm;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=&limit=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let window = PageRequest::new(query.page, query.limit);
    let listing = state.posts.list_published(window).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListBody {
        posts: listing.items,
        total: listing.total,
        pages: listing.page_count,
        current_page: listing.current_page,
    })))
}

/// GET /api/posts/{slug} - counts one view.
pub async fn get_published(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_published(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostBody { post })))
}

/// POST /api/posts (JSON)
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    create_post(&state, identity, body.into_inner(), None).await
}

/// POST /api/posts (multipart)
pub async fn create_form(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (request, upload) = PostForm::read(payload, state.upload_max_bytes)
        .await?
        .into_create();
    create_post(&state, identity, request, upload).await
}

async fn create_post(
    state: &AppState,
    identity: Identity,
    request: CreatePostRequest,
    upload: Option<UploadedFile>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.user_id, request.into(), upload)
        .await?;
    tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(PostBody { post })))
}

/// GET /api/posts/user/my-posts
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_owned(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostsBody { posts })))
}

/// PUT /api/posts/{id} (JSON)
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    update_post(&state, identity, path.into_inner(), body.into_inner(), None).await
}

/// PUT /api/posts/{id} (multipart)
pub async fn update_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (request, upload) = PostForm::read(payload, state.upload_max_bytes)
        .await?
        .into_update();
    update_post(&state, identity, path.into_inner(), request, upload).await
}

async fn update_post(
    state: &AppState,
    identity: Identity,
    id: Uuid,
    request: UpdatePostRequest,
    upload: Option<UploadedFile>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(id, identity.user_id, request.into(), upload)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostBody { post })))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id, identity.user_id).await?;
    tracing::info!(post_id = %id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageBody::new(
        "Post deleted successfully",
    ))))
}
