use std::sync::Arc;
use crate::domain::models::{
    auth::{Principal, UserProfile},
    event::{Event, EventDetail, EventDraft, EventFilter},
    schedule_item::{ScheduleItem, ScheduleItemDraft},
    ticket_type::{TicketType, TicketTypeDraft},
    user::Role,
};
use crate::domain::ports::{EventRepository, ScheduleRepository, TicketTypeRepository, UserRepository};
use crate::error::AppError;
use chrono::Utc;
use tracing::info;

/// Organizers manage their own events; admins manage every event.
pub fn can_manage(event: &Event, actor: &Principal) -> bool {
    actor.is_admin() || event.organizer_id == actor.id
}

pub struct EventService {
    events: Arc<dyn EventRepository>,
    ticket_types: Arc<dyn TicketTypeRepository>,
    schedule: Arc<dyn ScheduleRepository>,
    users: Arc<dyn UserRepository>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        ticket_types: Arc<dyn TicketTypeRepository>,
        schedule: Arc<dyn ScheduleRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { events, ticket_types, schedule, users }
    }

    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        self.events.list(filter).await
    }

    pub async fn list_by_organizer(&self, actor: &Principal) -> Result<Vec<Event>, AppError> {
        self.events.list_by_organizer(&actor.id).await
    }

    pub async fn list_featured(&self) -> Result<Vec<Event>, AppError> {
        self.events.list_featured().await
    }

    pub async fn list_upcoming(&self) -> Result<Vec<Event>, AppError> {
        self.events.list_upcoming(Utc::now()).await
    }

    pub async fn get_detail(&self, id: &str) -> Result<EventDetail, AppError> {
        let event = self.find(id).await?;
        self.detail(event).await
    }

    pub async fn create(&self, draft: EventDraft, actor: &Principal) -> Result<EventDetail, AppError> {
        if !matches!(actor.role, Role::Organizer | Role::Admin) {
            return Err(AppError::Forbidden("Only organizers can create events".into()));
        }
        draft.validate()?;

        let event = Event::new(&draft, actor.id.clone());
        let ticket_types: Vec<TicketType> = draft.ticket_types.iter()
            .map(|tt| TicketType::new(event.id.clone(), tt))
            .collect();
        let schedule: Vec<ScheduleItem> = draft.schedule.iter()
            .map(|item| ScheduleItem::new(event.id.clone(), item))
            .collect();

        let created = self.events.create(&event, &ticket_types, &schedule).await?;
        info!(
            event_id = %created.id,
            organizer_id = %created.organizer_id,
            ticket_types = ticket_types.len(),
            "Event created"
        );
        self.detail(created).await
    }

    pub async fn update(&self, id: &str, draft: EventDraft, actor: &Principal) -> Result<EventDetail, AppError> {
        let mut event = self.find_managed(id, actor).await?;
        draft.validate()?;

        event.apply(&draft);
        let updated = self.events.update(&event).await?;
        info!(event_id = %updated.id, "Event updated");
        self.detail(updated).await
    }

    pub async fn delete(&self, id: &str, actor: &Principal) -> Result<(), AppError> {
        self.find_managed(id, actor).await?;
        self.events.delete_if_no_active_tickets(id).await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    pub async fn add_ticket_type(&self, event_id: &str, draft: TicketTypeDraft, actor: &Principal) -> Result<TicketType, AppError> {
        let event = self.find_managed(event_id, actor).await?;
        draft.validate()?;

        let created = self.ticket_types.create(&TicketType::new(event.id, &draft)).await?;
        info!(event_id = %event_id, ticket_type_id = %created.id, quantity = created.quantity, "Ticket type added");
        Ok(created)
    }

    pub async fn update_ticket_type(
        &self,
        event_id: &str,
        ticket_type_id: &str,
        draft: TicketTypeDraft,
        actor: &Principal,
    ) -> Result<TicketType, AppError> {
        self.find_managed(event_id, actor).await?;
        draft.validate()?;

        let mut ticket_type = self.find_ticket_type(event_id, ticket_type_id).await?;
        ticket_type.apply(&draft);
        let updated = self.ticket_types.update_checked(&ticket_type).await?;
        info!(ticket_type_id = %updated.id, quantity = updated.quantity, "Ticket type updated");
        Ok(updated)
    }

    pub async fn remove_ticket_type(&self, event_id: &str, ticket_type_id: &str, actor: &Principal) -> Result<(), AppError> {
        self.find_managed(event_id, actor).await?;
        self.find_ticket_type(event_id, ticket_type_id).await?;
        self.ticket_types.delete_if_no_active_tickets(ticket_type_id).await?;
        info!(ticket_type_id = %ticket_type_id, "Ticket type removed");
        Ok(())
    }

    pub async fn add_schedule_item(&self, event_id: &str, draft: ScheduleItemDraft, actor: &Principal) -> Result<ScheduleItem, AppError> {
        let event = self.find_managed(event_id, actor).await?;
        draft.validate()?;
        self.schedule.create(&ScheduleItem::new(event.id, &draft)).await
    }

    pub async fn update_schedule_item(
        &self,
        event_id: &str,
        item_id: &str,
        draft: ScheduleItemDraft,
        actor: &Principal,
    ) -> Result<ScheduleItem, AppError> {
        self.find_managed(event_id, actor).await?;
        draft.validate()?;

        let mut item = self.find_schedule_item(event_id, item_id).await?;
        item.apply(&draft);
        self.schedule.update(&item).await
    }

    pub async fn remove_schedule_item(&self, event_id: &str, item_id: &str, actor: &Principal) -> Result<(), AppError> {
        self.find_managed(event_id, actor).await?;
        self.find_schedule_item(event_id, item_id).await?;
        self.schedule.delete(item_id).await
    }

    async fn find(&self, id: &str) -> Result<Event, AppError> {
        self.events.find_by_id(id).await?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn find_managed(&self, id: &str, actor: &Principal) -> Result<Event, AppError> {
        let event = self.find(id).await?;
        if !can_manage(&event, actor) {
            return Err(AppError::Forbidden("You are not allowed to manage this event".into()));
        }
        Ok(event)
    }

    async fn find_ticket_type(&self, event_id: &str, id: &str) -> Result<TicketType, AppError> {
        self.ticket_types.find_by_id(id).await?
            .filter(|tt| tt.event_id == event_id)
            .ok_or(AppError::NotFound("Ticket type not found".into()))
    }

    async fn find_schedule_item(&self, event_id: &str, id: &str) -> Result<ScheduleItem, AppError> {
        self.schedule.find_by_id(id).await?
            .filter(|item| item.event_id == event_id)
            .ok_or(AppError::NotFound("Schedule item not found".into()))
    }

    async fn detail(&self, event: Event) -> Result<EventDetail, AppError> {
        let organizer = self.users.find_by_id(&event.organizer_id).await?
            .ok_or_else(|| AppError::InternalWithMsg(format!("Organizer {} of event {} is missing", event.organizer_id, event.id)))?;
        let ticket_types = self.ticket_types.list_by_event(&event.id).await?;
        let schedule = self.schedule.list_by_event(&event.id).await?;

        Ok(EventDetail {
            event,
            organizer: UserProfile::from(organizer),
            ticket_types,
            schedule,
        })
    }
}
