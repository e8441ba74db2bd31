use crate::domain::models::ticket_type::{TicketType, TicketTypeAvailability};
use crate::domain::ports::TicketTypeRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresTicketTypeRepo {
    pool: PgPool,
}

impl PostgresTicketTypeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Locks the ticket type row and returns its active ticket count. Purchases
    /// take the same row lock, so the count holds until the transaction ends.
    async fn lock_and_count(tx: &mut Transaction<'_, Postgres>, id: &str) -> Result<i64, AppError> {
        let locked = sqlx::query_scalar::<_, String>("SELECT id FROM ticket_types WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::from_write)?;

        if locked.is_none() {
            return Err(AppError::NotFound("Ticket type not found".into()));
        }

        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE ticket_type_id = $1 AND status != 'CANCELLED'")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
            .map_err(AppError::from_write)
    }
}

#[async_trait]
impl TicketTypeRepository for PostgresTicketTypeRepo {
    async fn create(&self, ticket_type: &TicketType) -> Result<TicketType, AppError> {
        sqlx::query_as::<_, TicketType>(
            "INSERT INTO ticket_types (id, event_id, name, price, quantity, description, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *"
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
        sqlx::query_as::<_, TicketType>("SELECT * FROM ticket_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<TicketTypeAvailability>, AppError> {
        sqlx::query_as::<_, TicketTypeAvailability>(
            r#"SELECT tt.*, COALESCE(s.sold, 0) AS sold, tt.quantity - COALESCE(s.sold, 0) AS remaining
               FROM ticket_types tt
               LEFT JOIN (
                   SELECT ticket_type_id, COUNT(*) AS sold
                   FROM tickets
                   WHERE status != 'CANCELLED'
                   GROUP BY ticket_type_id
               ) s ON s.ticket_type_id = tt.id
               WHERE tt.event_id = $1
               ORDER BY tt.price ASC, tt.created_at ASC"#
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_checked(&self, ticket_type: &TicketType) -> Result<TicketType, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from_write)?;

        let active = Self::lock_and_count(&mut tx, &ticket_type.id).await?;
        if i64::from(ticket_type.quantity) < active {
            return Err(AppError::InvalidState(
                "Quantity cannot be lower than the number of tickets already sold".into(),
            ));
        }

        let updated = sqlx::query_as::<_, TicketType>(
            r#"UPDATE ticket_types SET name = $1, price = $2, quantity = $3, description = $4, updated_at = $5
               WHERE id = $6
               RETURNING *"#
        )
            .bind(&ticket_type.name)
            .bind(ticket_type.price)
            .bind(ticket_type.quantity)
            .bind(&ticket_type.description)
            .bind(ticket_type.updated_at)
            .bind(&ticket_type.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        tx.commit().await.map_err(AppError::from_write)?;
        Ok(updated)
    }

    async fn delete_if_no_active_tickets(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from_write)?;

        if Self::lock_and_count(&mut tx, id).await? > 0 {
            return Err(AppError::InvalidState("Ticket type has active tickets and cannot be deleted".into()));
        }

        sqlx::query("DELETE FROM ticket_types WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        tx.commit().await.map_err(AppError::from_write)?;
        Ok(())
    }
}
