use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{
    requests::{EventQuery, EventRequest, ScheduleItemRequest, TicketTypeRequest},
    responses::MessageResponse,
};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventQuery>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_service.list(&query.into()).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_service.get_detail(&id).await?))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<EventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.event_service.create(payload.into(), &user).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<EventRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_service.update(&id, payload.into(), &user).await?))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_service.delete(&id, &user).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

pub async fn list_organizer_events(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_service.list_by_organizer(&user).await?))
}

pub async fn list_featured_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_service.list_featured().await?))
}

pub async fn list_upcoming_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_service.list_upcoming().await?))
}

pub async fn add_ticket_type(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TicketTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ticket_type = state.event_service.add_ticket_type(&id, payload.into(), &user).await?;
    Ok((StatusCode::CREATED, Json(ticket_type)))
}

pub async fn update_ticket_type(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, ticket_type_id)): Path<(String, String)>,
    JsonBody(payload): JsonBody<TicketTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_service.update_ticket_type(&id, &ticket_type_id, payload.into(), &user).await?))
}

pub async fn remove_ticket_type(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, ticket_type_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.event_service.remove_ticket_type(&id, &ticket_type_id, &user).await?;
    Ok(Json(MessageResponse::new("Ticket type deleted successfully")))
}

pub async fn add_schedule_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ScheduleItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.event_service.add_schedule_item(&id, payload.into(), &user).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_schedule_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, item_id)): Path<(String, String)>,
    JsonBody(payload): JsonBody<ScheduleItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_service.update_schedule_item(&id, &item_id, payload.into(), &user).await?))
}

pub async fn remove_schedule_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.event_service.remove_schedule_item(&id, &item_id, &user).await?;
    Ok(Json(MessageResponse::new("Schedule item deleted successfully")))
}
