//! Authentication handlers.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use pressroom_core::domain::User;
use pressroom_core::ports::{BaseRepository, PasswordService, TokenService};
use pressroom_shared::ApiResponse;
use pressroom_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserBody, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn issue(token_service: &dyn TokenService, user: User) -> AppResult<AuthResponse> {
    let token = token_service
        .generate_token(user.id, &user.username, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: u64::try_from(token_service.expiration_seconds()).unwrap_or_default(),
        user: UserResponse::from(user),
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .users
        .insert(User::new(username, email, password_hash))
        .await?;
    tracing::info!(user_id = %user.id, "User registered");

    let auth = issue(token_service.get_ref().as_ref(), user)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(auth)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .users
        .find_by_email(&req.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return Err(invalid());
    }

    let auth = issue(token_service.get_ref().as_ref(), user)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth)))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserBody {
        user: UserResponse::from(user),
    })))
}
