use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, event, health, ticket};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/me", get(auth::me))

        // Events
        .route("/api/events", get(event::list_events).post(event::create_event))
        .route("/api/events/organizer", get(event::list_organizer_events))
        .route("/api/events/featured", get(event::list_featured_events))
        .route("/api/events/upcoming", get(event::list_upcoming_events))
        .route("/api/events/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))

        // Event sub-resources
        .route("/api/events/{id}/ticket-types", post(event::add_ticket_type))
        .route("/api/events/{id}/ticket-types/{ticket_type_id}", put(event::update_ticket_type).delete(event::remove_ticket_type))
        .route("/api/events/{id}/schedule", post(event::add_schedule_item))
        .route("/api/events/{id}/schedule/{item_id}", put(event::update_schedule_item).delete(event::remove_schedule_item))

        // Tickets
        .route("/api/tickets", get(ticket::list_my_tickets))
        .route("/api/tickets/purchase", post(ticket::purchase_ticket))
        .route("/api/tickets/event/{event_id}", get(ticket::list_event_tickets))
        .route("/api/tickets/{id}", get(ticket::get_ticket).delete(ticket::cancel_ticket))
        .route("/api/tickets/{id}/confirm", post(ticket::confirm_ticket))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
