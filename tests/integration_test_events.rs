mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{event_payload, ticket_type_id, TestApp};
use serde_json::{json, Value};
use ticketing_backend::domain::models::user::Role;

fn titles(body: &Value) -> Vec<String> {
    body.as_array().unwrap().iter().map(|e| e["title"].as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn test_organizer_creates_event_with_children() {
    let app = TestApp::new().await;
    let (token, organizer_id) = app.seed_user(Role::Organizer).await;

    let start = Utc::now() + Duration::days(30);
    let mut payload = event_payload("RustConf", 30, json!([
        { "name": "General", "price": 50.0, "quantity": 100 },
        { "name": "VIP", "price": 150.0, "quantity": 10, "description": "Front row" },
    ]));
    payload["schedule"] = json!([
        { "title": "Closing", "startTime": (start + Duration::hours(6)).to_rfc3339(), "endTime": (start + Duration::hours(7)).to_rfc3339() },
        { "title": "Keynote", "startTime": start.to_rfc3339(), "endTime": (start + Duration::hours(1)).to_rfc3339(), "speaker": "Ferris" },
    ]);

    let detail = app.create_event(&token, payload).await;

    assert_eq!(detail["title"], "RustConf");
    assert_eq!(detail["featured"], false);
    assert_eq!(detail["organizerId"], organizer_id.as_str());
    assert_eq!(detail["organizer"]["id"], organizer_id.as_str());

    let ticket_types = detail["ticketTypes"].as_array().unwrap();
    assert_eq!(ticket_types.len(), 2);
    assert_eq!(ticket_types[0]["name"], "General");
    assert_eq!(ticket_types[0]["remaining"], 100);
    assert_eq!(ticket_types[1]["sold"], 0);

    let schedule = detail["schedule"].as_array().unwrap();
    assert_eq!(schedule[0]["title"], "Keynote");
    assert_eq!(schedule[0]["speaker"], "Ferris");
    assert_eq!(schedule[1]["title"], "Closing");

    let (status, fetched) = app.send("GET", &format!("/api/events/{}", detail["id"].as_str().unwrap()), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["ticketTypes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_attendee_cannot_create_event() {
    let app = TestApp::new().await;
    let (token, _) = app.seed_user(Role::Attendee).await;

    let (status, _) = app.send("POST", "/api/events", Some(&token), Some(event_payload("Nope", 5, json!([])))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_event_drafts_are_rejected() {
    let app = TestApp::new().await;
    let (token, _) = app.seed_user(Role::Organizer).await;

    let mut ends_before_start = event_payload("Backwards", 10, json!([]));
    ends_before_start["endDate"] = json!((Utc::now() + Duration::days(9)).to_rfc3339());

    let negative_quantity = event_payload("Negative", 10, json!([{ "name": "GA", "price": 10.0, "quantity": -1 }]));

    let mut blank_title = event_payload("x", 10, json!([]));
    blank_title["title"] = json!("  ");

    for payload in [ends_before_start, negative_quantity, blank_title] {
        let (status, _) = app.send("POST", "/api/events", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, events) = app.send("GET", "/api/events", None, None).await;
    assert!(events.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_is_ordered_and_filterable() {
    let app = TestApp::new().await;
    let (token, _) = app.seed_user(Role::Organizer).await;

    app.create_event(&token, event_payload("Later Meetup", 20, json!([]))).await;
    app.create_event(&token, event_payload("Sooner Summit", 5, json!([]))).await;

    let mut music = event_payload("Jazz 100% Night", 10, json!([]));
    music["category"] = json!("Music");
    app.create_event(&token, music).await;

    let (status, all) = app.send("GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&all), vec!["Sooner Summit", "Jazz 100% Night", "Later Meetup"]);

    let (_, by_category) = app.send("GET", "/api/events?category=music", None, None).await;
    assert_eq!(titles(&by_category), vec!["Jazz 100% Night"]);

    let (_, by_search) = app.send("GET", "/api/events?search=SUMMIT", None, None).await;
    assert_eq!(titles(&by_search), vec!["Sooner Summit"]);

    // '%' is matched literally, not as a wildcard
    let (_, literal) = app.send("GET", "/api/events?search=100%25", None, None).await;
    assert_eq!(titles(&literal), vec!["Jazz 100% Night"]);

    let (_, none) = app.send("GET", "/api/events?search=%25%25nothing", None, None).await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_featured_upcoming_and_organizer_projections() {
    let app = TestApp::new().await;
    let (token, _) = app.seed_user(Role::Organizer).await;
    let (other_token, _) = app.seed_user(Role::Organizer).await;

    let mut featured = event_payload("Featured Fest", 3, json!([]));
    featured["featured"] = json!(true);
    app.create_event(&token, featured).await;
    app.create_event(&token, event_payload("Yesterday Expo", -1, json!([]))).await;
    app.create_event(&other_token, event_payload("Someone Else", 7, json!([]))).await;

    let (_, featured) = app.send("GET", "/api/events/featured", None, None).await;
    assert_eq!(titles(&featured), vec!["Featured Fest"]);

    let (_, upcoming) = app.send("GET", "/api/events/upcoming", None, None).await;
    assert_eq!(titles(&upcoming), vec!["Featured Fest", "Someone Else"]);

    let (status, mine) = app.send("GET", "/api/events/organizer", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&mine), vec!["Yesterday Expo", "Featured Fest"]);
}

#[tokio::test]
async fn test_only_owner_or_admin_can_update() {
    let app = TestApp::new().await;
    let (owner, _) = app.seed_user(Role::Organizer).await;
    let (stranger, _) = app.seed_user(Role::Organizer).await;
    let (admin, _) = app.seed_user(Role::Admin).await;

    let detail = app.create_event(&owner, event_payload("Original", 10, json!([]))).await;
    let uri = format!("/api/events/{}", detail["id"].as_str().unwrap());

    let (status, _) = app.send("PUT", &uri, Some(&stranger), Some(event_payload("Hijacked", 10, json!([])))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app.send("PUT", &uri, Some(&owner), Some(event_payload("Renamed", 12, json!([])))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["createdAt"], detail["createdAt"]);
    assert_ne!(updated["updatedAt"], detail["updatedAt"]);

    let (status, updated) = app.send("PUT", &uri, Some(&admin), Some(event_payload("Admin Edit", 12, json!([])))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Admin Edit");

    let (status, _) = app.send("PUT", "/api/events/does-not-exist", Some(&owner), Some(event_payload("X", 1, json!([])))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/api/events/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");
}

#[tokio::test]
async fn test_delete_cascades_children() {
    let app = TestApp::new().await;
    let (owner, _) = app.seed_user(Role::Organizer).await;
    let (stranger, _) = app.seed_user(Role::Organizer).await;

    let start = Utc::now() + Duration::days(10);
    let mut payload = event_payload("Short Lived", 10, json!([{ "name": "GA", "price": 5.0, "quantity": 5 }]));
    payload["schedule"] = json!([{ "title": "Talk", "startTime": start.to_rfc3339(), "endTime": (start + Duration::hours(1)).to_rfc3339() }]);
    let detail = app.create_event(&owner, payload).await;
    let event_id = detail["id"].as_str().unwrap();
    let uri = format!("/api/events/{}", event_id);

    let (status, _) = app.send("DELETE", &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let children: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT (SELECT COUNT(*) FROM ticket_types WHERE event_id = ?) + (SELECT COUNT(*) FROM schedule_items WHERE event_id = ?)"
    )
        .bind(event_id)
        .bind(event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(children, 0);
}

#[tokio::test]
async fn test_delete_rejected_while_tickets_are_active() {
    let app = TestApp::new().await;
    let (owner, _) = app.seed_user(Role::Organizer).await;
    let (buyer, _) = app.seed_user(Role::Attendee).await;

    let detail = app.create_event(&owner, event_payload("Busy", 10, json!([{ "name": "GA", "price": 5.0, "quantity": 5 }]))).await;
    let event_id = detail["id"].as_str().unwrap();
    let tt_id = ticket_type_id(&detail, "GA");

    let (status, ticket) = app.purchase(&buyer, event_id, &tt_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/events/{}", event_id);
    let (status, body) = app.send("DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event has active tickets and cannot be deleted");

    let (status, _) = app.send("DELETE", &format!("/api/tickets/{}", ticket["id"].as_str().unwrap()), Some(&buyer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let orphans: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE event_id = ?")
        .bind(event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn test_ticket_type_sub_resources() {
    let app = TestApp::new().await;
    let (owner, _) = app.seed_user(Role::Organizer).await;
    let (stranger, _) = app.seed_user(Role::Organizer).await;
    let (buyer, _) = app.seed_user(Role::Attendee).await;

    let detail = app.create_event(&owner, event_payload("Incremental", 10, json!([]))).await;
    let event_id = detail["id"].as_str().unwrap();
    let base = format!("/api/events/{}/ticket-types", event_id);

    let (status, _) = app.send("POST", &base, Some(&stranger), Some(json!({ "name": "GA", "price": 5.0, "quantity": 3 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, tt) = app.send("POST", &base, Some(&owner), Some(json!({ "name": "GA", "price": 5.0, "quantity": 3 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let tt_id = tt["id"].as_str().unwrap();
    let tt_uri = format!("{}/{}", base, tt_id);

    app.purchase(&buyer, event_id, tt_id).await;
    app.purchase(&buyer, event_id, tt_id).await;

    let (status, body) = app.send("PUT", &tt_uri, Some(&owner), Some(json!({ "name": "GA", "price": 5.0, "quantity": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Quantity cannot be lower than the number of tickets already sold");

    let (status, updated) = app.send("PUT", &tt_uri, Some(&owner), Some(json!({ "name": "General", "price": 7.5, "quantity": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "General");
    assert_eq!(updated["quantity"], 2);

    let (status, _) = app.send("DELETE", &tt_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, spare) = app.send("POST", &base, Some(&owner), Some(json!({ "name": "Spare", "price": 1.0, "quantity": 1 }))).await;
    let (status, _) = app.send("DELETE", &format!("{}/{}", base, spare["id"].as_str().unwrap()), Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    // A ticket type addressed through the wrong event does not exist there
    let other = app.create_event(&owner, event_payload("Other", 10, json!([]))).await;
    let wrong_uri = format!("/api/events/{}/ticket-types/{}", other["id"].as_str().unwrap(), tt_id);
    let (status, _) = app.send("PUT", &wrong_uri, Some(&owner), Some(json!({ "name": "X", "price": 1.0, "quantity": 9 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_sub_resources() {
    let app = TestApp::new().await;
    let (owner, _) = app.seed_user(Role::Organizer).await;

    let detail = app.create_event(&owner, event_payload("Agenda", 10, json!([]))).await;
    let event_id = detail["id"].as_str().unwrap();
    let base = format!("/api/events/{}/schedule", event_id);
    let start = Utc::now() + Duration::days(10);

    let (status, _) = app.send("POST", &base, Some(&owner), Some(json!({
        "title": "Backwards", "startTime": start.to_rfc3339(), "endTime": (start - Duration::hours(1)).to_rfc3339()
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, item) = app.send("POST", &base, Some(&owner), Some(json!({
        "title": "Opening", "startTime": start.to_rfc3339(), "endTime": (start + Duration::hours(1)).to_rfc3339()
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let item_uri = format!("{}/{}", base, item["id"].as_str().unwrap());

    let (status, updated) = app.send("PUT", &item_uri, Some(&owner), Some(json!({
        "title": "Opening Keynote", "startTime": start.to_rfc3339(), "endTime": (start + Duration::hours(2)).to_rfc3339(),
        "speaker": "Ferris", "location": "Room A"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Opening Keynote");
    assert_eq!(updated["location"], "Room A");

    let (status, _) = app.send("DELETE", &item_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("DELETE", &item_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
