use std::sync::Arc;
use crate::domain::ports::{
    EventRepository, ScheduleRepository, TicketRepository, TicketTypeRepository, UserRepository,
};
use crate::domain::services::{
    auth_service::AuthService, event_service::EventService, ticket_service::TicketService,
};
use crate::config::Config;
use crate::error::StartupError;

/// One store's worth of repository implementations.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub ticket_types: Arc<dyn TicketTypeRepository>,
    pub schedule: Arc<dyn ScheduleRepository>,
    pub tickets: Arc<dyn TicketRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub event_service: Arc<EventService>,
    pub ticket_service: Arc<TicketService>,
}

impl AppState {
    pub fn build(config: Config, repos: Repositories) -> Result<Self, StartupError> {
        let auth_service = Arc::new(AuthService::new(repos.users.clone(), config.clone())?);

        let event_service = Arc::new(EventService::new(
            repos.events.clone(),
            repos.ticket_types.clone(),
            repos.schedule.clone(),
            repos.users.clone(),
        ));

        let ticket_service = Arc::new(TicketService::new(
            repos.tickets,
            repos.events,
            repos.ticket_types,
            config.auto_confirm_purchases,
            config.purchase_max_attempts,
        ));

        Ok(Self {
            config,
            user_repo: repos.users,
            auth_service,
            event_service,
            ticket_service,
        })
    }
}
