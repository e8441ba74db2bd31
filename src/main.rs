#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = ticketing_backend::run().await {
        eprintln!("ticketing-backend failed to start: {}", e);
        std::process::exit(1);
    }
}
