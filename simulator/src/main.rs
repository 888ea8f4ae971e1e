//! tote-sim - posts randomized readings for one or more totes to the
//! backend ingest endpoint, the way deployed sensors do.

mod payload;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use shared::{endpoints, GeoPoint, IotUpdate};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tote-sim")]
#[command(about = "Simulate tote sensors posting readings", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "TOTE_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Tote id to simulate (repeatable)
    #[arg(short, long = "tote", default_values_t = ["TOTE001".to_string()])]
    totes: Vec<String>,

    /// Seconds between rounds of readings
    #[arg(short, long, default_value_t = 5)]
    interval_secs: u64,

    /// Stop after this many rounds
    #[arg(short, long)]
    count: Option<u64>,

    /// Base latitude readings are jittered around
    #[arg(long, default_value_t = 40.70, allow_negative_numbers = true)]
    base_lat: f64,

    /// Base longitude readings are jittered around
    #[arg(long, default_value_t = -74.00, allow_negative_numbers = true)]
    base_lon: f64,
}

async fn post_update(
    client: &Client,
    url: &str,
    update: &IotUpdate,
) -> Result<reqwest::StatusCode> {
    let response = client
        .post(url)
        .json(update)
        .send()
        .await
        .with_context(|| format!("posting reading to {}", url))?;
    Ok(response.status())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simulator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base = GeoPoint::new(cli.base_lat, cli.base_lon)
        .context("base position must be a valid latitude/longitude")?;
    let url = format!("{}{}", cli.server.trim_end_matches('/'), endpoints::IOT_UPDATE_PATH);
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("building HTTP client")?;

    info!("Simulating {} tote(s) against {}", cli.totes.len(), url);

    let mut ticker = tokio::time::interval(Duration::from_secs(cli.interval_secs.max(1)));
    let mut rng = rand::thread_rng();
    let mut rounds = 0u64;

    loop {
        ticker.tick().await;

        let now = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
        for tote_id in &cli.totes {
            let update = payload::random_update(&mut rng, tote_id, base, now);
            match post_update(&client, &url, &update).await {
                Ok(status) if status.is_success() => info!(
                    "Sent {}: temp={:?} humidity={:?} lux={:?}",
                    tote_id, update.temperature, update.humidity, update.lux
                ),
                Ok(status) => warn!("Server rejected reading for {}: {}", tote_id, status),
                Err(e) => error!("{:#}", e),
            }
        }

        rounds += 1;
        if cli.count.is_some_and(|count| rounds >= count) {
            break;
        }
    }

    info!("Done after {} round(s)", rounds);
    Ok(())
}
