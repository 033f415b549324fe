//! Async wrapper around [`AirlineDemand`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the event loop free while DuckDB
//! queries or blocking HTTP calls are in flight.
//!
//! # Example
//!
//! ```no_run
//! use airline_demand::{AirlineDemand, AsyncAirlineDemand, DashboardRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = AsyncAirlineDemand::build(AirlineDemand::builder().api_key_from_env())
//!         .await
//!         .unwrap();
//!
//!     let top = app.run(|a| a.routes().top(10, None)).await.unwrap();
//!     let view = app.dashboard(DashboardRequest::default()).await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::dashboard::{DashboardRequest, DashboardView};
use crate::error::{AirlineDemandError, Result};
use crate::models::{DemandSeries, FlightListing, RoutePopularity};
use crate::{AirlineDemand, AirlineDemandBuilder};

/// Async wrapper around [`AirlineDemand`].
///
/// The inner instance is protected by a [`Mutex`] since its connection uses
/// `RefCell` internally. Cloning shares the same instance.
#[derive(Clone)]
pub struct AsyncAirlineDemand {
    inner: Arc<Mutex<AirlineDemand>>,
}

impl AsyncAirlineDemand {
    /// Build from a configured builder on the blocking thread pool.
    pub async fn build(builder: AirlineDemandBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let app = builder.build()?;
            Ok(AsyncAirlineDemand {
                inner: Arc::new(Mutex::new(app)),
            })
        })
        .await
        .map_err(|e| AirlineDemandError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Run a sync operation on the blocking thread pool.
    ///
    /// The closure receives an `&AirlineDemand` and returns a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&AirlineDemand) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let app = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = app
                .lock()
                .map_err(|_| AirlineDemandError::InvalidArgument("lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| AirlineDemandError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn top_routes(
        &self,
        limit: usize,
        origin_country: Option<String>,
    ) -> Result<Vec<RoutePopularity>> {
        self.run(move |a| a.routes().top(limit, origin_country.as_deref()))
            .await
    }

    pub async fn countries(&self) -> Result<Vec<String>> {
        self.run(|a| a.routes().countries()).await
    }

    /// Simulated trends; never fails apart from task errors.
    pub async fn trends(
        &self,
        origin: String,
        destination: String,
        seed: Option<u64>,
    ) -> Result<DemandSeries> {
        self.run(move |a| Ok(a.simulator().simulate(&origin, &destination, seed)))
            .await
    }

    pub async fn live_flights(
        &self,
        origin: String,
        destination: String,
        limit: usize,
    ) -> Result<FlightListing> {
        self.run(move |a| a.live_flights().lookup(&origin, &destination, limit))
            .await
    }

    /// Render the whole dashboard for one interaction.
    pub async fn dashboard(&self, req: DashboardRequest) -> Result<DashboardView> {
        self.run(move |a| Ok(a.dashboard().render(&req))).await
    }

    /// Whether live flight lookups are configured.
    pub async fn live_enabled(&self) -> Result<bool> {
        self.run(|a| Ok(a.live_flights().is_enabled())).await
    }

    /// Release the inner instance on the blocking pool.
    ///
    /// Other clones keep it alive; only the last `close` drops it.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || drop(self.inner))
            .await
            .map_err(|e| AirlineDemandError::InvalidArgument(format!("Task join error: {e}")))
    }
}
