use crate::domain::models::{
    ticket::{Ticket, TicketStatus, TicketView},
    ticket_type::TicketType,
};
use crate::domain::ports::TicketRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const VIEW_SELECT: &str = r#"SELECT t.*, e.title AS event_title, tt.name AS ticket_type_name
    FROM tickets t
    JOIN events e ON e.id = t.event_id
    LEFT JOIN ticket_types tt ON tt.id = t.ticket_type_id"#;

pub struct PostgresTicketRepo {
    pool: PgPool,
}

impl PostgresTicketRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepo {
    async fn purchase(&self, ticket: &Ticket) -> Result<Ticket, AppError> {
        let ticket_type_id = ticket.ticket_type_id.as_deref()
            .ok_or(AppError::Validation("Ticket type is required".into()))?;

        let mut tx = self.pool.begin().await.map_err(AppError::from_write)?;

        // Lock order is always event then ticket type. Event deletion takes
        // FOR UPDATE on the same event row.
        let event = sqlx::query_scalar::<_, String>("SELECT id FROM events WHERE id = $1 FOR SHARE")
            .bind(&ticket.event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        if event.is_none() {
            return Err(AppError::NotFound("Event not found".into()));
        }

        let ticket_type = sqlx::query_as::<_, TicketType>(
            "SELECT * FROM ticket_types WHERE id = $1 AND event_id = $2 FOR UPDATE"
        )
            .bind(ticket_type_id)
            .bind(&ticket.event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::from_write)?
            .ok_or(AppError::NotFound("Ticket type not found".into()))?;

        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets WHERE ticket_type_id = $1 AND status != 'CANCELLED'"
        )
            .bind(&ticket_type.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        if active >= i64::from(ticket_type.quantity) {
            return Err(AppError::CapacityExceeded("Tickets of this type are sold out".into()));
        }

        let created = sqlx::query_as::<_, Ticket>(
            r#"INSERT INTO tickets (id, event_id, user_id, ticket_type_id, price, purchase_date, status, ticket_code, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING *"#
        )
            .bind(&ticket.id)
            .bind(&ticket.event_id)
            .bind(&ticket.user_id)
            .bind(&ticket_type.id)
            .bind(ticket_type.price)
            .bind(ticket.purchase_date)
            .bind(ticket.status.as_str())
            .bind(&ticket.ticket_code)
            .bind(ticket.created_at)
            .bind(ticket.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        tx.commit().await.map_err(AppError::from_write)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_view(&self, id: &str) -> Result<Option<TicketView>, AppError> {
        sqlx::query_as::<_, TicketView>(&format!("{} WHERE t.id = $1", VIEW_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<TicketView>, AppError> {
        sqlx::query_as::<_, TicketView>(&format!("{} WHERE t.user_id = $1 ORDER BY t.purchase_date DESC", VIEW_SELECT))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<TicketView>, AppError> {
        sqlx::query_as::<_, TicketView>(&format!("{} WHERE t.event_id = $1 ORDER BY t.purchase_date ASC", VIEW_SELECT))
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = $1, updated_at = $2 WHERE id = $3 AND status != 'CANCELLED' RETURNING *"
        )
            .bind(TicketStatus::Cancelled.as_str())
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_write)
    }

    async fn confirm(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = $1, updated_at = $2 WHERE id = $3 AND status = 'PENDING' RETURNING *"
        )
            .bind(TicketStatus::Confirmed.as_str())
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_write)
    }
}
