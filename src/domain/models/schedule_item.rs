use crate::domain::validation::{optional_text, require_ordered, require_text, MAX_LONG_TEXT, MAX_SHORT_TEXT};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
    pub speaker: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ScheduleItemDraft {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
    pub speaker: Option<String>,
    pub location: Option<String>,
}

impl ScheduleItemDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("schedule title", &self.title, MAX_SHORT_TEXT)?;
        require_ordered("startTime", self.start_time, "endTime", Some(self.end_time))?;
        optional_text("schedule description", self.description.as_deref(), MAX_LONG_TEXT)?;
        optional_text("speaker", self.speaker.as_deref(), MAX_SHORT_TEXT)?;
        optional_text("schedule location", self.location.as_deref(), MAX_SHORT_TEXT)
    }
}

impl ScheduleItem {
    pub fn new(event_id: String, draft: &ScheduleItemDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            title: draft.title.trim().to_string(),
            start_time: draft.start_time,
            end_time: draft.end_time,
            description: draft.description.clone(),
            speaker: draft.speaker.clone(),
            location: draft.location.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, draft: &ScheduleItemDraft) {
        self.title = draft.title.trim().to_string();
        self.start_time = draft.start_time;
        self.end_time = draft.end_time;
        self.description = draft.description.clone();
        self.speaker = draft.speaker.clone();
        self.location = draft.location.clone();
        self.updated_at = Utc::now();
    }
}
