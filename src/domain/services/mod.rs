pub mod auth_service;
pub mod event_service;
pub mod ticket_service;
