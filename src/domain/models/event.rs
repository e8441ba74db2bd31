use super::schedule_item::{ScheduleItem, ScheduleItemDraft};
use super::ticket_type::{TicketTypeAvailability, TicketTypeDraft};
use super::auth::UserProfile;
use crate::domain::validation::{
    optional_text, require_ordered, require_price, require_text, MAX_LONG_TEXT, MAX_SHORT_TEXT,
};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: String,
    pub organizer_id: String,
    pub ticket_price: f64,
    pub featured: bool,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Organizer-supplied event content, used for both creation and update.
/// Nested ticket types and schedule items are only honoured on creation.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: String,
    pub ticket_price: f64,
    pub featured: Option<bool>,
    pub category: String,
    pub ticket_types: Vec<TicketTypeDraft>,
    pub schedule: Vec<ScheduleItemDraft>,
}

impl EventDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("title", &self.title, MAX_SHORT_TEXT)?;
        optional_text("description", Some(&self.description), MAX_LONG_TEXT)?;
        require_text("location", &self.location, MAX_SHORT_TEXT)?;
        require_text("imageUrl", &self.image_url, 2048)?;
        require_text("category", &self.category, 64)?;
        require_price("ticketPrice", self.ticket_price)?;
        require_ordered("date", self.start_date, "endDate", self.end_date)?;

        for ticket_type in &self.ticket_types {
            ticket_type.validate()?;
        }
        for item in &self.schedule {
            item.validate()?;
        }
        Ok(())
    }
}

impl Event {
    pub fn new(draft: &EventDraft, organizer_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            description: draft.description.clone(),
            location: draft.location.trim().to_string(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            image_url: draft.image_url.trim().to_string(),
            organizer_id,
            ticket_price: draft.ticket_price,
            featured: draft.featured.unwrap_or(false),
            category: draft.category.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the scalar fields with the draft's. `featured` is kept when
    /// the draft leaves it unset.
    pub fn apply(&mut self, draft: &EventDraft) {
        self.title = draft.title.trim().to_string();
        self.description = draft.description.clone();
        self.location = draft.location.trim().to_string();
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.image_url = draft.image_url.trim().to_string();
        self.ticket_price = draft.ticket_price;
        if let Some(featured) = draft.featured {
            self.featured = featured;
        }
        self.category = draft.category.trim().to_string();
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub organizer: UserProfile,
    pub ticket_types: Vec<TicketTypeAvailability>,
    pub schedule: Vec<ScheduleItem>,
}
