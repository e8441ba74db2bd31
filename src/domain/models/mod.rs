pub mod auth;
pub mod event;
pub mod schedule_item;
pub mod ticket;
pub mod ticket_type;
pub mod user;

use thiserror::Error;

/// Returned when a stored enum column holds a value this build does not know.
#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
