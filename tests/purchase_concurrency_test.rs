mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{event_payload, ticket_type_id, TestApp};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;
use ticketing_backend::{
    config::Config,
    domain::models::{
        auth::Principal,
        event::EventDraft,
        ticket_type::TicketTypeDraft,
        user::{Role, User},
    },
    error::AppError,
    infra::factory::{connect_postgres, postgres_repositories, run_postgres_migrations},
    state::AppState,
};
use uuid::Uuid;

#[tokio::test]
async fn test_concurrent_purchases_never_oversell_sqlite() {
    let app = Arc::new(TestApp::with_settings(true, 5).await);
    let (organizer, _) = app.seed_user(Role::Organizer).await;

    let capacity = 5;
    let buyers = 20;

    let detail = app.create_event(&organizer, event_payload("Hot Show", 10, json!([
        { "name": "Floor", "price": 80.0, "quantity": capacity }
    ]))).await;
    let event_id = detail["id"].as_str().unwrap().to_string();
    let tt_id = ticket_type_id(&detail, "Floor");

    let mut tokens = Vec::with_capacity(buyers);
    for _ in 0..buyers {
        tokens.push(app.seed_user(Role::Attendee).await.0);
    }

    let mut set = JoinSet::new();
    for token in tokens {
        let app = app.clone();
        let event_id = event_id.clone();
        let tt_id = tt_id.clone();
        set.spawn(async move { app.purchase(&token, &event_id, &tt_id).await.0 });
    }

    let mut created = 0;
    let mut sold_out = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => sold_out += 1,
            other => panic!("Unexpected purchase status {}", other),
        }
    }

    assert_eq!(created, capacity);
    assert_eq!(sold_out, buyers as i64 - capacity);
    assert_eq!(app.active_tickets(&tt_id).await, capacity);
}

#[tokio::test]
async fn test_concurrent_purchases_never_oversell_postgres() {
    let db_url = std::env::var("DATABASE_URL").unwrap_or_default();
    if !db_url.starts_with("postgres") {
        println!("Skipping Postgres concurrency test (DATABASE_URL is not Postgres)");
        return;
    }

    let pool = connect_postgres(&db_url).await.expect("Failed to connect to DB");
    run_postgres_migrations(&pool).await.expect("Failed to migrate DB");

    let config = Config {
        database_url: db_url.clone(),
        port: 0,
        jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
        jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
        auth_issuer: "test-issuer".to_string(),
        jwt_ttl_minutes: 60,
        auto_confirm_purchases: true,
        purchase_max_attempts: 5,
        log_dir: "./logs".to_string(),
    };
    let state = Arc::new(AppState::build(config, postgres_repositories(pool.clone())).unwrap());

    let organizer = seed(&state, Role::Organizer).await;
    let capacity = 7;
    let buyers = 40;

    let detail = state.event_service.create(EventDraft {
        title: format!("Race {}", Uuid::new_v4()),
        description: String::new(),
        location: "Arena".into(),
        start_date: Utc::now() + Duration::days(3),
        end_date: None,
        image_url: "https://img.example/race.png".into(),
        ticket_price: 20.0,
        featured: None,
        category: "Sports".into(),
        ticket_types: vec![TicketTypeDraft { name: "GA".into(), price: 20.0, quantity: capacity, description: None }],
        schedule: vec![],
    }, &organizer).await.unwrap();

    let event_id = detail.event.id.clone();
    let tt_id = detail.ticket_types[0].ticket_type.id.clone();

    let mut set = JoinSet::new();
    for _ in 0..buyers {
        let state = state.clone();
        let buyer = seed(&state, Role::Attendee).await;
        let event_id = event_id.clone();
        let tt_id = tt_id.clone();
        set.spawn(async move { state.ticket_service.purchase(&event_id, &tt_id, &buyer).await });
    }

    let mut created = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::CapacityExceeded(_)) => {}
            Err(e) => panic!("Unexpected purchase error: {:?}", e),
        }
    }

    let active: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE ticket_type_id = $1 AND status != 'CANCELLED'")
        .bind(&tt_id)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(created, capacity);
    assert_eq!(active, i64::from(capacity));
}

async fn seed(state: &AppState, role: Role) -> Principal {
    let id = Uuid::new_v4();
    let user = User::new(
        format!("User {}", id),
        format!("{}@example.com", id),
        "$argon2id$v=19$m=19456,t=2,p=1$unused$unused".to_string(),
        role,
    );
    let user = state.user_repo.create(&user).await.unwrap();
    Principal::from(&user)
}
