use super::UnknownVariant;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};
use std::fmt;
use std::str::FromStr;

const TICKET_CODE_PREFIX: &str = "TKT-";
const TICKET_CODE_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "PENDING",
            TicketStatus::Confirmed => "CONFIRMED",
            TicketStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Pending, TicketStatus::Confirmed)
                | (TicketStatus::Pending, TicketStatus::Cancelled)
                | (TicketStatus::Confirmed, TicketStatus::Cancelled)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TicketStatus::Pending),
            "CONFIRMED" => Ok(TicketStatus::Confirmed),
            "CANCELLED" => Ok(TicketStatus::Cancelled),
            _ => Err(UnknownVariant { kind: "ticket status", value: s.to_string() }),
        }
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub ticket_type_id: Option<String>,
    pub price: f64,
    pub purchase_date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: TicketStatus,
    pub ticket_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewTicketParams {
    pub event_id: String,
    pub user_id: String,
    pub ticket_type_id: String,
    pub price: f64,
    pub status: TicketStatus,
}

impl Ticket {
    pub fn new(params: NewTicketParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            user_id: params.user_id,
            ticket_type_id: Some(params.ticket_type_id),
            price: params.price,
            purchase_date: now,
            status: params.status,
            ticket_code: generate_ticket_code(),
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn generate_ticket_code() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TICKET_CODE_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{}{}", TICKET_CODE_PREFIX, code)
}

/// A ticket joined with the names a client needs to render it.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ticket: Ticket,
    pub event_title: String,
    pub ticket_type_name: Option<String>,
}
