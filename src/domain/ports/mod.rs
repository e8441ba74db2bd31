use crate::domain::models::{
    event::{Event, EventFilter},
    schedule_item::ScheduleItem,
    ticket::{Ticket, TicketView},
    ticket_type::{TicketType, TicketTypeAvailability},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event and its initial children in one transaction.
    async fn create(&self, event: &Event, ticket_types: &[TicketType], schedule: &[ScheduleItem]) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    async fn list_featured(&self) -> Result<Vec<Event>, AppError>;
    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Deletes the event (children cascade) unless it still has active
    /// tickets, in which case `InvalidState` is returned. Check and delete
    /// are atomic.
    async fn delete_if_no_active_tickets(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TicketTypeRepository: Send + Sync {
    async fn create(&self, ticket_type: &TicketType) -> Result<TicketType, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<TicketType>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<TicketTypeAvailability>, AppError>;
    /// Persists the new fields unless the new quantity is below the number
    /// of active tickets (`InvalidState`). Check and update are atomic.
    async fn update_checked(&self, ticket_type: &TicketType) -> Result<TicketType, AppError>;
    async fn delete_if_no_active_tickets(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, item: &ScheduleItem) -> Result<ScheduleItem, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleItem>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<ScheduleItem>, AppError>;
    async fn update(&self, item: &ScheduleItem) -> Result<ScheduleItem, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Inserts the ticket only if its ticket type still has remaining
    /// capacity. Price is taken from the ticket type at insert time.
    ///
    /// Fails with `CapacityExceeded` when sold out, `NotFound` when the event
    /// or ticket type is gone, and `Contention` when the store reports lock
    /// contention (the caller may retry).
    async fn purchase(&self, ticket: &Ticket) -> Result<Ticket, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError>;
    async fn find_view(&self, id: &str) -> Result<Option<TicketView>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<TicketView>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<TicketView>, AppError>;
    /// Moves an active ticket to CANCELLED. `None` if it was already cancelled.
    async fn cancel(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Ticket>, AppError>;
    /// Moves a PENDING ticket to CONFIRMED. `None` if it was not pending.
    async fn confirm(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Ticket>, AppError>;
}
