use ticketing_backend::{
    api::router::create_router,
    config::Config,
    domain::models::user::{Role, User},
    infra::factory::{connect_sqlite, run_sqlite_migrations, sqlite_repositories},
    state::AppState,
};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use chrono::{Duration, Utc};
use tower::ServiceExt;
use serde_json::{json, Value};

#[allow(dead_code)]
pub const PASSWORD: &str = "s3cret-password";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(true, 3).await
    }

    pub async fn with_settings(auto_confirm_purchases: bool, purchase_max_attempts: u32) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let pool = connect_sqlite(&db_url).await.expect("Failed to connect to test db");
        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            jwt_ttl_minutes: 60,
            auto_confirm_purchases,
            purchase_max_attempts,
            log_dir: "./logs".to_string(),
        };

        let state = Arc::new(
            AppState::build(config, sqlite_repositories(pool.clone())).expect("Failed to build state"),
        );
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a request through the router and returns status plus JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let raw = body.map(|body| body.to_string());
        self.send_raw(method, uri, token, raw.as_deref()).await
    }

    /// Like `send`, but with the body passed through verbatim as JSON.
    pub async fn send_raw(&self, method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    /// Registers through the API and returns `(token, user_id)`.
    pub async fn register(&self, name: &str, email: &str, role: &str) -> (String, String) {
        let (status, body) = self.send("POST", "/api/auth/register", None, Some(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "role": role,
        }))).await;

        if status != StatusCode::CREATED {
            panic!("Register failed in test helper: status {} body {}", status, body);
        }
        (body["token"].as_str().unwrap().to_string(), body["userId"].as_str().unwrap().to_string())
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self.send("POST", "/api/auth/login", None, Some(json!({
            "email": email,
            "password": password,
        }))).await;

        if !status.is_success() {
            panic!("Login failed in test helper: status {}", status);
        }
        body["token"].as_str().expect("No token in body").to_string()
    }

    /// Inserts a user straight into the store (skipping password hashing)
    /// and returns `(token, user_id)`.
    pub async fn seed_user(&self, role: Role) -> (String, String) {
        let id = Uuid::new_v4();
        let user = User::new(
            format!("User {}", id),
            format!("{}@example.com", id),
            "$argon2id$v=19$m=19456,t=2,p=1$unused$unused".to_string(),
            role,
        );
        let user = self.state.user_repo.create(&user).await.unwrap();
        let token = self.state.auth_service.issue_token(&user).unwrap();
        (token, user.id)
    }

    /// Creates an event and returns its detail body.
    pub async fn create_event(&self, token: &str, payload: Value) -> Value {
        let (status, body) = self.send("POST", "/api/events", Some(token), Some(payload)).await;
        if status != StatusCode::CREATED {
            panic!("Create event failed in test helper: status {} body {}", status, body);
        }
        body
    }

    pub async fn purchase(&self, token: &str, event_id: &str, ticket_type_id: &str) -> (StatusCode, Value) {
        self.send("POST", "/api/tickets/purchase", Some(token), Some(json!({
            "eventId": event_id,
            "ticketTypeId": ticket_type_id,
        }))).await
    }

    pub async fn active_tickets(&self, ticket_type_id: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE ticket_type_id = ? AND status != 'CANCELLED'")
            .bind(ticket_type_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[allow(dead_code)]
pub fn event_payload(title: &str, days_ahead: i64, ticket_types: Value) -> Value {
    json!({
        "title": title,
        "description": format!("{} description", title),
        "location": "Main Hall",
        "date": (Utc::now() + Duration::days(days_ahead)).to_rfc3339(),
        "imageUrl": "https://img.example/event.png",
        "ticketPrice": 50.0,
        "category": "Technology",
        "ticketTypes": ticket_types,
    })
}

#[allow(dead_code)]
pub fn ticket_type_id(detail: &Value, name: &str) -> String {
    detail["ticketTypes"].as_array().unwrap()
        .iter()
        .find(|tt| tt["name"] == name)
        .unwrap_or_else(|| panic!("No ticket type named {}", name))["id"]
        .as_str()
        .unwrap()
        .to_string()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
