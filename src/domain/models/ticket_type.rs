use crate::domain::validation::{optional_text, require_price, require_text, MAX_LONG_TEXT, MAX_SHORT_TEXT};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A priced, capacity-bounded inventory pool within an event.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TicketTypeDraft {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub description: Option<String>,
}

impl TicketTypeDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("ticket type name", &self.name, MAX_SHORT_TEXT)?;
        require_price("ticket type price", self.price)?;
        if self.quantity < 0 {
            return Err(AppError::Validation("ticket type quantity must not be negative".into()));
        }
        optional_text("ticket type description", self.description.as_deref(), MAX_LONG_TEXT)
    }
}

impl TicketType {
    pub fn new(event_id: String, draft: &TicketTypeDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            name: draft.name.trim().to_string(),
            price: draft.price,
            quantity: draft.quantity,
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, draft: &TicketTypeDraft) {
        self.name = draft.name.trim().to_string();
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.description = draft.description.clone();
        self.updated_at = Utc::now();
    }
}

/// A ticket type together with how much of it is sold and left.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TicketTypeAvailability {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ticket_type: TicketType,
    pub sold: i64,
    pub remaining: i64,
}
