use airline_demand::AsyncAirlineDemand;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Catalog, simulator and live lookup. Dispatches blocking work to the
    /// blocking thread pool internally.
    pub app: AsyncAirlineDemand,
}
