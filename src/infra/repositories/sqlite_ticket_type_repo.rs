use crate::domain::models::ticket_type::{TicketType, TicketTypeAvailability};
use crate::domain::ports::TicketTypeRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTicketTypeRepo {
    pool: SqlitePool,
}

impl SqliteTicketTypeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketTypeRepository for SqliteTicketTypeRepo {
    async fn create(&self, ticket_type: &TicketType) -> Result<TicketType, AppError> {
        sqlx::query_as::<_, TicketType>(
            "INSERT INTO ticket_types (id, event_id, name, price, quantity, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&ticket_type.id)
            .bind(&ticket_type.event_id)
            .bind(&ticket_type.name)
            .bind(ticket_type.price)
            .bind(ticket_type.quantity)
            .bind(&ticket_type.description)
            .bind(ticket_type.created_at)
            .bind(ticket_type.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_write)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TicketType>, AppError> {
        sqlx::query_as::<_, TicketType>("SELECT * FROM ticket_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<TicketTypeAvailability>, AppError> {
        sqlx::query_as::<_, TicketTypeAvailability>(
            r#"SELECT tt.*,
                      (SELECT COUNT(*) FROM tickets t WHERE t.ticket_type_id = tt.id AND t.status != 'CANCELLED') AS sold,
                      tt.quantity - (SELECT COUNT(*) FROM tickets t WHERE t.ticket_type_id = tt.id AND t.status != 'CANCELLED') AS remaining
               FROM ticket_types tt
               WHERE tt.event_id = ?
               ORDER BY tt.price ASC, tt.created_at ASC"#
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_checked(&self, ticket_type: &TicketType) -> Result<TicketType, AppError> {
        let updated = sqlx::query_as::<_, TicketType>(
            r#"UPDATE ticket_types SET name = ?, price = ?, quantity = ?, description = ?, updated_at = ?
               WHERE id = ?
                 AND ? >= (SELECT COUNT(*) FROM tickets WHERE ticket_type_id = ? AND status != 'CANCELLED')
               RETURNING *"#
        )
            .bind(&ticket_type.name)
            .bind(ticket_type.price)
            .bind(ticket_type.quantity)
            .bind(&ticket_type.description)
            .bind(ticket_type.updated_at)
            .bind(&ticket_type.id)
            .bind(ticket_type.quantity)
            .bind(&ticket_type.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_write)?;

        match updated {
            Some(tt) => Ok(tt),
            None if self.find_by_id(&ticket_type.id).await?.is_some() => Err(AppError::InvalidState(
                "Quantity cannot be lower than the number of tickets already sold".into(),
            )),
            None => Err(AppError::NotFound("Ticket type not found".into())),
        }
    }

    async fn delete_if_no_active_tickets(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"DELETE FROM ticket_types
               WHERE id = ?
                 AND NOT EXISTS (SELECT 1 FROM tickets WHERE ticket_type_id = ? AND status != 'CANCELLED')"#
        )
            .bind(id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_write)?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.find_by_id(id).await? {
            Some(_) => Err(AppError::InvalidState("Ticket type has active tickets and cannot be deleted".into())),
            None => Err(AppError::NotFound("Ticket type not found".into())),
        }
    }
}
