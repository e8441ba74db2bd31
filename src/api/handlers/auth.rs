use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::json::JsonBody;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use std::sync::Arc;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.authenticate(&payload.email, &payload.password).await?;
    let token = state.auth_service.issue_token(&user)?;

    info!("User logged in: {}", user.id);
    Ok(Json(AuthResponse::new(token, user)))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(payload.into()).await?;
    let token = state.auth_service.issue_token(&user)?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(token, user))))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.find_user(&principal.id).await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized("Account no longer exists".into()),
            other => other,
        })?;

    Ok(Json(UserProfile::from(user)))
}
