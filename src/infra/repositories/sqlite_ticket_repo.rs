use crate::domain::models::ticket::{Ticket, TicketStatus, TicketView};
use crate::domain::ports::TicketRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const VIEW_SELECT: &str = r#"SELECT t.*, e.title AS event_title, tt.name AS ticket_type_name
    FROM tickets t
    JOIN events e ON e.id = t.event_id
    LEFT JOIN ticket_types tt ON tt.id = t.ticket_type_id"#;

pub struct SqliteTicketRepo {
    pool: SqlitePool,
}

impl SqliteTicketRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepo {
    async fn purchase(&self, ticket: &Ticket) -> Result<Ticket, AppError> {
        let ticket_type_id = ticket.ticket_type_id.as_deref()
            .ok_or(AppError::Validation("Ticket type is required".into()))?;

        // A single INSERT ... SELECT: SQLite acquires the write lock before
        // evaluating the capacity subquery, so concurrent purchasers serialize
        // here and the count cannot go stale between check and insert.
        let created = sqlx::query_as::<_, Ticket>(
            r#"INSERT INTO tickets (id, event_id, user_id, ticket_type_id, price, purchase_date, status, ticket_code, created_at, updated_at)
               SELECT ?, tt.event_id, ?, tt.id, tt.price, ?, ?, ?, ?, ?
               FROM ticket_types tt
               WHERE tt.id = ?
                 AND tt.event_id = ?
                 AND (SELECT COUNT(*) FROM tickets WHERE ticket_type_id = tt.id AND status != 'CANCELLED') < tt.quantity
               RETURNING *"#
        )
            .bind(&ticket.id)
            .bind(&ticket.user_id)
            .bind(ticket.purchase_date)
            .bind(ticket.status.as_str())
            .bind(&ticket.ticket_code)
            .bind(ticket.created_at)
            .bind(ticket.updated_at)
            .bind(ticket_type_id)
            .bind(&ticket.event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_write)?;

        if let Some(created) = created {
            return Ok(created);
        }

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ticket_types WHERE id = ? AND event_id = ?")
            .bind(ticket_type_id)
            .bind(&ticket.event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if exists == 0 {
            Err(AppError::NotFound("Ticket type not found".into()))
        } else {
            Err(AppError::CapacityExceeded("Tickets of this type are sold out".into()))
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_view(&self, id: &str) -> Result<Option<TicketView>, AppError> {
        sqlx::query_as::<_, TicketView>(&format!("{} WHERE t.id = ?", VIEW_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<TicketView>, AppError> {
        sqlx::query_as::<_, TicketView>(&format!("{} WHERE t.user_id = ? ORDER BY t.purchase_date DESC", VIEW_SELECT))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<TicketView>, AppError> {
        sqlx::query_as::<_, TicketView>(&format!("{} WHERE t.event_id = ? ORDER BY t.purchase_date ASC", VIEW_SELECT))
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = ?, updated_at = ? WHERE id = ? AND status != 'CANCELLED' RETURNING *"
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
            "UPDATE tickets SET status = ?, updated_at = ? WHERE id = ? AND status = 'PENDING' RETURNING *"
        )
            .bind(TicketStatus::Confirmed.as_str())
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_write)
    }
}
