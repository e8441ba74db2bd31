pub mod sqlite_event_repo;
pub mod sqlite_schedule_repo;
pub mod sqlite_ticket_repo;
pub mod sqlite_ticket_type_repo;
pub mod sqlite_user_repo;

pub mod postgres_event_repo;
pub mod postgres_schedule_repo;
pub mod postgres_ticket_repo;
pub mod postgres_ticket_type_repo;
pub mod postgres_user_repo;
