mod handlers;
mod labels;
mod store;
#[cfg(test)]
mod test_support;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use shared::{endpoints, AppConfig};
use std::{env, path::Path, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::labels::LabelStore;
use crate::store::ToteStore;

/// Multipart framing allowance on top of the label size cap
const UPLOAD_BODY_SLACK: usize = 64 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(name = "tote-backend")]
#[command(about = "Tote monitoring backend: device ingest, live snapshot and label storage")]
struct Args {
    /// Directory where uploaded label images are stored
    #[arg(long, env = "LABELS_DIR", default_value = "labels")]
    labels_dir: String,

    /// Path to frontend dist directory to serve
    #[arg(long, default_value = "frontend/dist")]
    frontend_dist: String,

    /// Title shown in the dashboard header
    #[arg(long, env = "APP_TITLE", default_value = "Tote Monitor")]
    app_title: String,

    /// Dashboard polling interval in seconds
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 5)]
    poll_interval_secs: u32,
}

pub struct AppState {
    pub totes: ToteStore,
    pub labels: LabelStore,
    pub config: AppConfig,
}

/// Every API route, without static file serving.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(endpoints::IOT_UPDATE_PATH, post(handlers::iot::iot_update))
        .route(endpoints::LIVE_PATH, get(handlers::iot::live))
        .route(endpoints::CONFIG_PATH, get(handlers::config::get_config))
        .route(
            endpoints::UPLOAD_LABEL_ROUTE,
            post(handlers::labels::upload_label).layer(DefaultBodyLimit::max(
                handlers::labels::MAX_LABEL_SIZE + UPLOAD_BODY_SLACK,
            )),
        )
        .route(endpoints::LABEL_IMAGE_ROUTE, get(handlers::labels::get_label))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let labels = LabelStore::open(&args.labels_dir)?;
    tracing::info!("Storing labels in: {}", labels.dir().display());

    let app_state = Arc::new(AppState {
        totes: ToteStore::new(),
        labels,
        config: AppConfig {
            app_title: args.app_title.clone(),
            poll_interval_secs: args.poll_interval_secs,
        },
    });

    let mut app = build_router(app_state);

    // Serve frontend static files if path exists
    if Path::new(&args.frontend_dist).exists() {
        tracing::info!("Serving frontend from: {}", args.frontend_dist);
        app = app.fallback_service(ServeDir::new(&args.frontend_dist));
    } else {
        tracing::warn!("Frontend dist not found at: {}", args.frontend_dist);
    }

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
