use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{requests::PurchaseRequest, responses::MessageResponse};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_my_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.ticket_service.list_by_user(&user).await?))
}

pub async fn purchase_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<PurchaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.ticket_service
        .purchase(&payload.event_id, &payload.ticket_type_id, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.ticket_service.get_by_id(&id, &user).await?))
}

pub async fn cancel_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.ticket_service.cancel(&id, &user).await?;
    Ok(Json(MessageResponse::new("Ticket cancelled successfully")))
}

pub async fn confirm_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.ticket_service.confirm(&id, &user).await?))
}

pub async fn list_event_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.ticket_service.list_by_event(&event_id, &user).await?))
}
