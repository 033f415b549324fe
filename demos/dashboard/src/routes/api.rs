use std::sync::Arc;

use airline_demand::config::DEFAULT_FLIGHT_LIMIT;
use airline_demand::dashboard::{DEFAULT_SEED, DEFAULT_TOP_N, MAX_TOP_N};
use airline_demand::models::parse_route_key;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::DashboardParams;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TopRoutesParams {
    pub limit: Option<usize>,
    pub country: Option<String>,
}

#[derive(Deserialize)]
pub struct TrendParams {
    pub seed: Option<u64>,
}

#[derive(Deserialize)]
pub struct FlightParams {
    pub limit: Option<usize>,
}

fn split_route(route: &str) -> Result<(String, String), AppError> {
    parse_route_key(route)
        .ok_or_else(|| AppError::bad_request(format!("Invalid route '{route}', expected SRC-DST")))
}

/// GET /api/routes?limit=20&country=Australia
///
/// The most popular routes, optionally restricted to an origin country.
pub async fn top_routes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopRoutesParams>,
) -> Result<Json<Value>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N);
    let country = params.country.filter(|c| !c.is_empty() && c != "All");
    let routes = state.app.top_routes(limit, country).await?;

    let count = routes.len();
    Ok(Json(json!({ "data": routes, "count": count })))
}

/// GET /api/countries
///
/// Origin countries available for filtering.
pub async fn countries(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let countries = state.app.countries().await?;
    let count = countries.len();
    Ok(Json(json!({ "data": countries, "count": count })))
}

/// GET /api/routes/:route
///
/// Airline rows for a route, joined with airport data.
pub async fn route_details(
    State(state): State<Arc<AppState>>,
    Path(route): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (origin, destination) = split_route(&route)?;
    let rows = state
        .app
        .run(move |a| a.routes().get(&origin, &destination))
        .await?;

    if rows.is_empty() {
        return Err(AppError::not_found(format!("Route '{route}' not in catalog")));
    }
    let count = rows.len();
    Ok(Json(json!({ "data": rows, "count": count })))
}

/// GET /api/routes/:route/trends?seed=42
///
/// 36 months of simulated price and booking volume. Any code pair works.
pub async fn trends(
    State(state): State<Arc<AppState>>,
    Path(route): Path<String>,
    Query(params): Query<TrendParams>,
) -> Result<Json<Value>, AppError> {
    let (origin, destination) = split_route(&route)?;
    let seed = Some(params.seed.unwrap_or(DEFAULT_SEED));
    let series = state.app.trends(origin, destination, seed).await?;
    Ok(Json(json!({ "data": series })))
}

/// GET /api/routes/:route/flights?limit=10
///
/// Live flights from the AviationStack API.
pub async fn live_flights(
    State(state): State<Arc<AppState>>,
    Path(route): Path<String>,
    Query(params): Query<FlightParams>,
) -> Result<Json<Value>, AppError> {
    let (origin, destination) = split_route(&route)?;
    let limit = params.limit.unwrap_or(DEFAULT_FLIGHT_LIMIT).clamp(1, 100);
    let listing = state.app.live_flights(origin, destination, limit).await?;
    Ok(Json(json!({ "data": listing })))
}

/// GET /api/dashboard?top_n=20&country=All&route=JFK-LHR&seed=42&live=false
///
/// Every panel of the dashboard with its own state.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Value>, AppError> {
    let view = state.app.dashboard(params.to_request()).await?;
    Ok(Json(json!({ "data": view })))
}
