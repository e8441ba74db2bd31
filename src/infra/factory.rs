use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::StartupError;
use crate::state::{AppState, Repositories};
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_schedule_repo::PostgresScheduleRepo,
    postgres_ticket_repo::PostgresTicketRepo, postgres_ticket_type_repo::PostgresTicketTypeRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_schedule_repo::SqliteScheduleRepo,
    sqlite_ticket_repo::SqliteTicketRepo, sqlite_ticket_type_repo::SqliteTicketTypeRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, StartupError> {
    let database_url = &config.database_url;

    let repos = if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");
        let pool = connect_postgres(database_url).await?;
        run_postgres_migrations(&pool).await?;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");
        let pool = connect_sqlite(database_url).await?;
        run_sqlite_migrations(&pool).await?;
        sqlite_repositories(pool)
    };

    AppState::build(config.clone(), repos)
}

pub async fn connect_postgres(database_url: &str) -> Result<PgPool, StartupError> {
    let opts: PgConnectOptions = database_url.parse()?;
    let opts = opts.log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, StartupError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PostgresUserRepo::new(pool.clone())),
        events: Arc::new(PostgresEventRepo::new(pool.clone())),
        ticket_types: Arc::new(PostgresTicketTypeRepo::new(pool.clone())),
        schedule: Arc::new(PostgresScheduleRepo::new(pool.clone())),
        tickets: Arc::new(PostgresTicketRepo::new(pool)),
    }
}

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        users: Arc::new(SqliteUserRepo::new(pool.clone())),
        events: Arc::new(SqliteEventRepo::new(pool.clone())),
        ticket_types: Arc::new(SqliteTicketTypeRepo::new(pool.clone())),
        schedule: Arc::new(SqliteScheduleRepo::new(pool.clone())),
        tickets: Arc::new(SqliteTicketRepo::new(pool)),
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), StartupError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await?;
    Ok(())
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), StartupError> {
    sqlx::migrate!("./migrations/sqlite").run(pool).await?;
    Ok(())
}
