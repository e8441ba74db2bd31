use crate::domain::models::{
    event::{EventDraft, EventFilter},
    schedule_item::ScheduleItemDraft,
    ticket_type::TicketTypeDraft,
};
use crate::domain::services::auth_service::RegisterUser;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        Self { name: req.name, email: req.email, password: req.password, role: req.role }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTypeRequest {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub description: Option<String>,
}

impl From<TicketTypeRequest> for TicketTypeDraft {
    fn from(req: TicketTypeRequest) -> Self {
        Self { name: req.name, price: req.price, quantity: req.quantity, description: req.description }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItemRequest {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
    pub speaker: Option<String>,
    pub location: Option<String>,
}

impl From<ScheduleItemRequest> for ScheduleItemDraft {
    fn from(req: ScheduleItemRequest) -> Self {
        Self {
            title: req.title,
            start_time: req.start_time,
            end_time: req.end_time,
            description: req.description,
            speaker: req.speaker,
            location: req.location,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(alias = "startDate")]
    pub date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: String,
    pub ticket_price: f64,
    pub featured: Option<bool>,
    pub category: String,
    #[serde(default, alias = "tickets")]
    pub ticket_types: Vec<TicketTypeRequest>,
    #[serde(default)]
    pub schedule: Vec<ScheduleItemRequest>,
}

impl From<EventRequest> for EventDraft {
    fn from(req: EventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            location: req.location,
            start_date: req.date,
            end_date: req.end_date,
            image_url: req.image_url,
            ticket_price: req.ticket_price,
            featured: req.featured,
            category: req.category,
            ticket_types: req.ticket_types.into_iter().map(Into::into).collect(),
            schedule: req.schedule.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct EventQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl From<EventQuery> for EventFilter {
    fn from(query: EventQuery) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self { category: non_empty(query.category), search: non_empty(query.search) }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub event_id: String,
    pub ticket_type_id: String,
}
