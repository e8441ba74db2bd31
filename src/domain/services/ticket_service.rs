use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use crate::domain::models::{
    auth::Principal,
    event::Event,
    ticket::{NewTicketParams, Ticket, TicketStatus, TicketView},
};
use crate::domain::ports::{EventRepository, TicketRepository, TicketTypeRepository};
use crate::domain::services::event_service::can_manage;
use crate::error::AppError;
use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

const BACKOFF_STEP_MS: u64 = 15;

pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
    events: Arc<dyn EventRepository>,
    ticket_types: Arc<dyn TicketTypeRepository>,
    auto_confirm: bool,
    max_attempts: u32,
}

impl TicketService {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        events: Arc<dyn EventRepository>,
        ticket_types: Arc<dyn TicketTypeRepository>,
        auto_confirm: bool,
        max_attempts: u32,
    ) -> Self {
        Self { tickets, events, ticket_types, auto_confirm, max_attempts: max_attempts.max(1) }
    }

    pub async fn purchase(&self, event_id: &str, ticket_type_id: &str, buyer: &Principal) -> Result<TicketView, AppError> {
        let event = self.find_event(event_id).await?;
        let ticket_type = self.ticket_types.find_by_id(ticket_type_id).await?
            .filter(|tt| tt.event_id == event.id)
            .ok_or(AppError::NotFound("Ticket type not found".into()))?;

        let status = if self.auto_confirm { TicketStatus::Confirmed } else { TicketStatus::Pending };

        let result = with_retry(self.max_attempts, || {
            // Fresh id and code per attempt so a code collision can be retried.
            let ticket = Ticket::new(NewTicketParams {
                event_id: event.id.clone(),
                user_id: buyer.id.clone(),
                ticket_type_id: ticket_type.id.clone(),
                price: ticket_type.price,
                status,
            });
            let tickets = Arc::clone(&self.tickets);
            async move { tickets.purchase(&ticket).await }
        })
        .await;

        let ticket = match result {
            Ok(ticket) => ticket,
            Err(AppError::CapacityExceeded(msg)) => {
                warn!(event_id = %event.id, ticket_type_id = %ticket_type.id, user_id = %buyer.id, "Purchase rejected: sold out");
                return Err(AppError::CapacityExceeded(msg));
            }
            Err(e) => return Err(e),
        };

        info!(
            ticket_id = %ticket.id,
            event_id = %ticket.event_id,
            ticket_type_id = %ticket_type.id,
            user_id = %buyer.id,
            status = %ticket.status,
            "Ticket purchased"
        );
        self.view(&ticket.id).await
    }

    pub async fn cancel(&self, id: &str, actor: &Principal) -> Result<Ticket, AppError> {
        let ticket = self.find_ticket(id).await?;
        if !actor.is_admin() && ticket.user_id != actor.id {
            return Err(AppError::Forbidden("You can only cancel your own tickets".into()));
        }
        if !ticket.status.can_transition_to(TicketStatus::Cancelled) {
            return Err(AppError::InvalidState("Ticket is already cancelled".into()));
        }

        let cancelled = self.tickets.cancel(id, Utc::now()).await?
            .ok_or(AppError::InvalidState("Ticket is already cancelled".into()))?;
        info!(ticket_id = %cancelled.id, user_id = %actor.id, "Ticket cancelled");
        Ok(cancelled)
    }

    pub async fn confirm(&self, id: &str, actor: &Principal) -> Result<TicketView, AppError> {
        let ticket = self.find_ticket(id).await?;
        let event = self.find_event(&ticket.event_id).await?;
        if !can_manage(&event, actor) {
            return Err(AppError::Forbidden("You are not allowed to confirm tickets for this event".into()));
        }
        if !ticket.status.can_transition_to(TicketStatus::Confirmed) {
            return Err(AppError::InvalidState(format!("Ticket is {} and cannot be confirmed", ticket.status)));
        }

        self.tickets.confirm(id, Utc::now()).await?
            .ok_or(AppError::InvalidState("Ticket is no longer pending".into()))?;
        info!(ticket_id = %id, "Ticket confirmed");
        self.view(id).await
    }

    pub async fn get_by_id(&self, id: &str, actor: &Principal) -> Result<TicketView, AppError> {
        let view = self.view(id).await?;
        if actor.is_admin() || view.ticket.user_id == actor.id {
            return Ok(view);
        }

        let event = self.find_event(&view.ticket.event_id).await?;
        if event.organizer_id == actor.id {
            return Ok(view);
        }
        Err(AppError::Forbidden("You are not allowed to view this ticket".into()))
    }

    pub async fn list_by_user(&self, actor: &Principal) -> Result<Vec<TicketView>, AppError> {
        self.tickets.list_by_user(&actor.id).await
    }

    pub async fn list_by_event(&self, event_id: &str, actor: &Principal) -> Result<Vec<TicketView>, AppError> {
        let event = self.find_event(event_id).await?;
        if !can_manage(&event, actor) {
            return Err(AppError::Forbidden("You are not allowed to view tickets for this event".into()));
        }
        self.tickets.list_by_event(event_id).await
    }

    async fn find_event(&self, id: &str) -> Result<Event, AppError> {
        self.events.find_by_id(id).await?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn find_ticket(&self, id: &str) -> Result<Ticket, AppError> {
        self.tickets.find_by_id(id).await?
            .ok_or(AppError::NotFound("Ticket not found".into()))
    }

    async fn view(&self, id: &str) -> Result<TicketView, AppError> {
        self.tickets.find_view(id).await?
            .ok_or(AppError::NotFound("Ticket not found".into()))
    }
}

fn is_retryable(err: &AppError) -> bool {
    matches!(err, AppError::Contention) || err.is_unique_violation()
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or
/// `max_attempts` is spent. Exhausted retries surface as `Conflict`.
async fn with_retry<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if is_retryable(&e) => {
                if attempt >= max_attempts {
                    warn!(attempts = attempt, "Purchase retries exhausted");
                    return Err(AppError::Conflict("Too many concurrent purchases, please try again".into()));
                }
                let jitter = rand::thread_rng().gen_range(0..BACKOFF_STEP_MS);
                let delay = BACKOFF_STEP_MS * u64::from(attempt) + jitter;
                warn!(attempt, delay_ms = delay, "Purchase hit store contention, retrying");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
