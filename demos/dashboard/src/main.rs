mod error;
mod routes;
mod state;

use std::env;
use std::sync::Arc;

use airline_demand::{AirlineDemand, AsyncAirlineDemand};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let mut builder = AirlineDemand::builder().api_key_from_env();
    if env_flag("AIRLINE_DEMAND_OFFLINE") {
        builder = builder.offline(true);
    }
    if let Ok(path) = env::var("AIRLINE_DEMAND_ROUTES_FILE") {
        builder = builder.routes_file(path);
    }
    if let Ok(path) = env::var("AIRLINE_DEMAND_AIRPORTS_FILE") {
        builder = builder.airports_file(path);
    }
    if let Ok(dir) = env::var("AIRLINE_DEMAND_CACHE_DIR") {
        builder = builder.cache_dir(dir);
    }

    log::info!("Initializing airline demand dashboard...");
    let app = match AsyncAirlineDemand::build(builder).await {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    };
    if !app.live_enabled().await.unwrap_or(false) {
        log::warn!("AVIATIONSTACK_KEY not set; live flight panel disabled");
    }

    let state = Arc::new(AppState { app });

    let router = Router::new()
        .route("/", get(routes::page::index))
        .route("/api/dashboard", get(routes::api::dashboard))
        .route("/api/countries", get(routes::api::countries))
        .route("/api/routes", get(routes::api::top_routes))
        .route("/api/routes/{route}", get(routes::api::route_details))
        .route("/api/routes/{route}/trends", get(routes::api::trends))
        .route("/api/routes/{route}/flights", get(routes::api::live_flights))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = env::var("DASHBOARD_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("Cannot bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Listening on http://{addr}");
    if let Err(e) = axum::serve(listener, router).await {
        log::error!("Server error: {e}");
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
