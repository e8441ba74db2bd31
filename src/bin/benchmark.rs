use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const READ_STAGE_SECS: u64 = 10;
const TICKET_QUANTITY: i64 = 50;
const BUYERS: usize = 200;
const PURCHASE_RPS: u32 = 400;

struct Session {
    token: String,
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("BENCH_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    println!("{}", "Starting sell-out benchmark".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "Setting up benchmark data...".yellow());
    let organizer = register(&client, &base_url, "ORGANIZER").await;
    let (event_id, ticket_type_id) = setup_event(&client, &base_url, &organizer).await;

    let mut buyers = Vec::with_capacity(BUYERS);
    for _ in 0..BUYERS {
        buyers.push(register(&client, &base_url, "ATTENDEE").await);
    }

    println!("{}", "Data created successfully.".green());
    println!("   Event ID:    {}", event_id);
    println!("   Ticket type: {} (quantity {})", ticket_type_id, TICKET_QUANTITY);
    println!("   Buyers:      {}", BUYERS);

    println!("\n{}", "=".repeat(60));
    println!("Benchmarking: {}", "Sell-out race (POST /api/tickets/purchase)".cyan().bold());
    println!("{}", "=".repeat(60));
    let sold = run_sell_out(&client, &base_url, &event_id, &ticket_type_id, buyers).await;
    verify_inventory(&client, &base_url, &event_id, &ticket_type_id, sold).await;

    println!("\n{}", "=".repeat(60));
    println!("Benchmarking: {}", "Event detail (GET /api/events/{id})".cyan().bold());
    println!("{}", "=".repeat(60));
    println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
    println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

    let detail_url = format!("{}/api/events/{}", base_url, event_id);
    for rps in [10, 50, 200, 1000] {
        run_read_stage(&client, &detail_url, rps).await;
    }
}

async fn register(client: &Client, base_url: &str, role: &str) -> Session {
    let res = client.post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "name": format!("Bench {}", role.to_lowercase()),
            "email": format!("bench-{}@example.com", Uuid::new_v4()),
            "password": "benchmark-password",
            "role": role,
        }))
        .send()
        .await
        .expect("Failed to send register request");

    if res.status() != StatusCode::CREATED {
        panic!("Failed to register {}: status {}", role, res.status());
    }

    let body: Value = res.json().await.expect("Failed to parse register response");
    Session { token: body["token"].as_str().expect("No token").to_string() }
}

async fn setup_event(client: &Client, base_url: &str, organizer: &Session) -> (String, String) {
    let event_payload = json!({
        "title": format!("Benchmark Concert {}", Uuid::new_v4()),
        "description": "Load testing",
        "location": "Server Room",
        "date": (Utc::now() + ChronoDuration::days(30)).to_rfc3339(),
        "imageUrl": "http://localhost/bench.png",
        "ticketPrice": 25.0,
        "category": "Benchmark",
        "ticketTypes": [
            { "name": "General", "price": 25.0, "quantity": TICKET_QUANTITY }
        ]
    });

    let res = client.post(format!("{}/api/events", base_url))
        .bearer_auth(&organizer.token)
        .json(&event_payload)
        .send()
        .await
        .expect("Failed to create event");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create event data. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.expect("Failed to parse event response");
    let event_id = body["id"].as_str().expect("No event id").to_string();
    let ticket_type_id = body["ticketTypes"][0]["id"].as_str().expect("No ticket type id").to_string();
    (event_id, ticket_type_id)
}

/// Fires one purchase per buyer through the rate limiter and returns the
/// number of tickets actually sold.
async fn run_sell_out(
    client: &Client,
    base_url: &str,
    event_id: &str,
    ticket_type_id: &str,
    buyers: Vec<Session>,
) -> i64 {
    let limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(PURCHASE_RPS).unwrap()));
    let url = format!("{}/api/tickets/purchase", base_url);
    let body = json!({ "eventId": event_id, "ticketTypeId": ticket_type_id });

    let (tx, mut rx) = mpsc::channel(BUYERS);

    for buyer in buyers {
        limiter.until_ready().await;

        let client = client.clone();
        let url = url.clone();
        let body = body.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let req_start = Instant::now();
            let status = client.post(&url)
                .bearer_auth(&buyer.token)
                .json(&body)
                .send()
                .await
                .map(|r| r.status())
                .ok();
            let _ = tx.send((req_start.elapsed(), status)).await;
        });
    }
    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let (mut sold, mut sold_out, mut conflicts, mut failures) = (0i64, 0, 0, 0);

    while let Some((latency, status)) = rx.recv().await {
        histogram.record(latency.as_micros() as u64).unwrap();
        match status {
            Some(StatusCode::CREATED) => sold += 1,
            Some(StatusCode::BAD_REQUEST) => sold_out += 1,
            Some(StatusCode::CONFLICT) => conflicts += 1,
            _ => failures += 1,
        }
    }

    println!("{:<22} {}", "Sold:", sold.to_string().green());
    println!("{:<22} {}", "Rejected (sold out):", sold_out);
    println!("{:<22} {}", "Conflicts (retry):", conflicts.to_string().yellow());
    println!("{:<22} {}", "Transport/5xx errors:", failures.to_string().red());
    println!(
        "{:<22} mean {:.2} ms, p99 {:.2} ms",
        "Latency:",
        histogram.mean() / 1000.0,
        histogram.value_at_quantile(0.99) as f64 / 1000.0
    );

    sold
}

async fn verify_inventory(client: &Client, base_url: &str, event_id: &str, ticket_type_id: &str, sold: i64) {
    let detail: Value = client.get(format!("{}/api/events/{}", base_url, event_id))
        .send()
        .await
        .expect("Failed to fetch event detail")
        .json()
        .await
        .expect("Failed to parse event detail");

    let ticket_type = detail["ticketTypes"].as_array()
        .and_then(|types| types.iter().find(|tt| tt["id"] == ticket_type_id))
        .expect("Ticket type missing from event detail");
    let reported_sold = ticket_type["sold"].as_i64().unwrap_or(-1);
    let remaining = ticket_type["remaining"].as_i64().unwrap_or(-1);

    let expected = TICKET_QUANTITY.min(BUYERS as i64);
    if sold == expected && reported_sold == sold && remaining == TICKET_QUANTITY - sold {
        println!("{}", format!("Inventory holds: {} sold of {}, {} remaining", sold, TICKET_QUANTITY, remaining).green().bold());
    } else {
        eprintln!(
            "{}",
            format!(
                "Inventory mismatch: {} purchases succeeded, store reports {} sold / {} remaining (expected {})",
                sold, reported_sold, remaining, expected
            ).red().bold()
        );
        std::process::exit(1);
    }
}

async fn run_read_stage(client: &Client, url: &str, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(READ_STAGE_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = url.to_string();
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let success = match client.get(&url).send().await {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };
                let _ = tx.send((req_start.elapsed(), success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
