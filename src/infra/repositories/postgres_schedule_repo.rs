use crate::domain::{models::schedule_item::ScheduleItem, ports::ScheduleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresScheduleRepo {
    pool: PgPool,
}

impl PostgresScheduleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepo {
    async fn create(&self, item: &ScheduleItem) -> Result<ScheduleItem, AppError> {
        sqlx::query_as::<_, ScheduleItem>(
            r#"INSERT INTO schedule_items (id, event_id, title, start_time, end_time, description, speaker, location, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING *"#
        )
            .bind(&item.id)
            .bind(&item.event_id)
            .bind(&item.title)
            .bind(item.start_time)
            .bind(item.end_time)
            .bind(&item.description)
            .bind(&item.speaker)
            .bind(&item.location)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_write)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleItem>, AppError> {
        sqlx::query_as::<_, ScheduleItem>("SELECT * FROM schedule_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<ScheduleItem>, AppError> {
        sqlx::query_as::<_, ScheduleItem>("SELECT * FROM schedule_items WHERE event_id = $1 ORDER BY start_time ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, item: &ScheduleItem) -> Result<ScheduleItem, AppError> {
        sqlx::query_as::<_, ScheduleItem>(
            r#"UPDATE schedule_items SET title=$1, start_time=$2, end_time=$3, description=$4, speaker=$5, location=$6, updated_at=$7
               WHERE id=$8
               RETURNING *"#
        )
            .bind(&item.title)
            .bind(item.start_time)
            .bind(item.end_time)
            .bind(&item.description)
            .bind(&item.speaker)
            .bind(&item.location)
            .bind(item.updated_at)
            .bind(&item.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_write)?
            .ok_or(AppError::NotFound("Schedule item not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedule_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Schedule item not found".into()));
        }
        Ok(())
    }
}
