use crate::domain::models::{
    event::{Event, EventFilter},
    schedule_item::ScheduleItem,
    ticket_type::TicketType,
};
use crate::domain::{ports::EventRepository, validation::like_pattern};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event, ticket_types: &[TicketType], schedule: &[ScheduleItem]) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from_write)?;

        let created = sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, location, start_date, end_date, image_url,
                organizer_id, ticket_price, featured, category, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(&event.image_url)
            .bind(&event.organizer_id)
            .bind(event.ticket_price)
            .bind(event.featured)
            .bind(&event.category)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        for tt in ticket_types {
            sqlx::query(
                "INSERT INTO ticket_types (id, event_id, name, price, quantity, description, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            )
                .bind(&tt.id).bind(&tt.event_id).bind(&tt.name).bind(tt.price).bind(tt.quantity)
                .bind(&tt.description).bind(tt.created_at).bind(tt.updated_at)
                .execute(&mut *tx).await.map_err(AppError::from_write)?;
        }

        for item in schedule {
            sqlx::query(
                "INSERT INTO schedule_items (id, event_id, title, start_time, end_time, description, speaker, location, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
            )
                .bind(&item.id).bind(&item.event_id).bind(&item.title).bind(item.start_time).bind(item.end_time)
                .bind(&item.description).bind(&item.speaker).bind(&item.location).bind(item.created_at).bind(item.updated_at)
                .execute(&mut *tx).await.map_err(AppError::from_write)?;
        }

        tx.commit().await.map_err(AppError::from_write)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let category = filter.category.as_deref().map(|c| c.trim().to_lowercase());
        let pattern = filter.search.as_deref().map(like_pattern);

        sqlx::query_as::<_, Event>(
            r#"SELECT * FROM events
               WHERE ($1::TEXT IS NULL OR LOWER(category) = $1)
                 AND ($2::TEXT IS NULL OR LOWER(title) LIKE $2 ESCAPE '\' OR LOWER(description) LIKE $2 ESCAPE '\')
               ORDER BY start_date ASC, created_at ASC"#
        )
            .bind(&category)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE organizer_id = $1 ORDER BY start_date ASC, created_at ASC")
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_featured(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE featured ORDER BY start_date ASC, created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE start_date >= $1 ORDER BY start_date ASC, created_at ASC")
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, description=$2, location=$3, start_date=$4, end_date=$5, image_url=$6,
                ticket_price=$7, featured=$8, category=$9, updated_at=$10
               WHERE id=$11
               RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(&event.image_url)
            .bind(event.ticket_price)
            .bind(event.featured)
            .bind(&event.category)
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_write)?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn delete_if_no_active_tickets(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from_write)?;

        // Purchases hold FOR SHARE on the event row, so this lock waits for
        // in-flight purchases and blocks new ones until commit.
        let locked = sqlx::query_scalar::<_, String>("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        if locked.is_none() {
            return Err(AppError::NotFound("Event not found".into()));
        }

        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets WHERE event_id = $1 AND status != 'CANCELLED'"
        )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        if active > 0 {
            return Err(AppError::InvalidState("Event has active tickets and cannot be deleted".into()));
        }

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_write)?;

        tx.commit().await.map_err(AppError::from_write)?;
        Ok(())
    }
}
