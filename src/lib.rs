//! Airline booking market demand toolkit.
//!
//! Loads the OpenFlights route and airport datasets (downloaded once and
//! cached locally, or read from explicit files), ranks routes by popularity
//! in-process via DuckDB, simulates 36 months of seasonal price and booking
//! volume for a route, and looks up live flights through the AviationStack
//! API when a key is configured.
//!
//! # Quick start
//!
//! ```no_run
//! use airline_demand::AirlineDemand;
//!
//! let app = AirlineDemand::builder().api_key_from_env().build().unwrap();
//!
//! // Most popular routes
//! let top = app.routes().top(20, None).unwrap();
//!
//! // Simulated trends for a route, reproducible with a seed
//! let series = app.simulator().simulate("JFK", "LHR", Some(42));
//! assert_eq!(series.len(), 36);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod dashboard;
pub mod error;
pub mod live;
pub mod models;
pub mod queries;
pub mod simulator;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncAirlineDemand;
pub use cache::CacheManager;
pub use connection::Connection;
pub use dashboard::{Dashboard, DashboardRequest, DashboardView, Panel};
pub use error::{AirlineDemandError, Result};
pub use live::LiveFlightClient;
pub use simulator::{DemandSimulator, SimulationParams};
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// AirlineDemandBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AirlineDemand`] instance.
///
/// Use [`AirlineDemand::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](AirlineDemandBuilder::build).
#[derive(Clone)]
pub struct AirlineDemandBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    routes_file: Option<PathBuf>,
    airports_file: Option<PathBuf>,
    api_key: Option<String>,
    flights_base_url: Option<String>,
    flights_timeout: Duration,
    params: SimulationParams,
}

impl Default for AirlineDemandBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(120),
            routes_file: None,
            airports_file: None,
            api_key: None,
            flights_base_url: None,
            flights_timeout: Duration::from_secs(10),
            params: SimulationParams::default(),
        }
    }
}

impl AirlineDemandBuilder {
    /// Set a custom cache directory for downloaded datasets.
    ///
    /// Defaults to the platform cache directory (e.g. `~/.cache/airline-demand`
    /// on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Never download datasets; only cached or explicit files are used.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// HTTP timeout for dataset downloads. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read routes from this file instead of the downloaded `routes.dat`.
    pub fn routes_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.routes_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read airports from this file instead of the downloaded `airports.dat`.
    pub fn airports_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.airports_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// AviationStack access key. Without one the live lookup is disabled.
    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Take the access key from the `AVIATIONSTACK_KEY` environment variable.
    pub fn api_key_from_env(mut self) -> Self {
        self.api_key = config::api_key_from_env();
        self
    }

    /// Override the flights endpoint URL.
    pub fn flights_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.flights_base_url = Some(url.into());
        self
    }

    /// HTTP timeout for live flight lookups. Defaults to 10 seconds.
    pub fn flights_timeout(mut self, timeout: Duration) -> Self {
        self.flights_timeout = timeout;
        self
    }

    /// Curve parameters for the demand simulator.
    ///
    /// Checked by [`build()`](Self::build), which fails with
    /// [`AirlineDemandError::InvalidArgument`] for unusable values.
    pub fn simulation_params(mut self, params: SimulationParams) -> Self {
        self.params = params;
        self
    }

    /// Build the instance.
    ///
    /// Datasets are **not** read here; they are located (and downloaded if
    /// needed) lazily on the first catalog query, so a missing dataset only
    /// surfaces where it is used.
    pub fn build(self) -> Result<AirlineDemand> {
        let simulator = DemandSimulator::with_params(self.params)?;
        let mut cache = CacheManager::new(self.cache_dir, self.offline, self.timeout)?;
        if let Some(path) = &self.routes_file {
            cache.set_local_file("routes", path)?;
        }
        if let Some(path) = &self.airports_file {
            cache.set_local_file("airports", path)?;
        }
        let conn = Connection::new(cache)?;
        let live = LiveFlightClient::new(self.api_key, self.flights_base_url, self.flights_timeout)?;
        Ok(AirlineDemand {
            conn,
            simulator,
            live,
        })
    }
}

// ---------------------------------------------------------------------------
// AirlineDemand
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the DuckDB [`Connection`], the [`DemandSimulator`] and the
/// [`LiveFlightClient`], and hands out lightweight borrowing query wrappers.
pub struct AirlineDemand {
    conn: Connection,
    simulator: DemandSimulator,
    live: LiveFlightClient,
}

impl AirlineDemand {
    /// Create a new builder.
    pub fn builder() -> AirlineDemandBuilder {
        AirlineDemandBuilder::default()
    }

    /// Route catalog and popularity ranking.
    pub fn routes(&self) -> queries::RouteQuery<'_> {
        queries::RouteQuery::new(&self.conn)
    }

    /// Airport lookups.
    pub fn airports(&self) -> queries::AirportQuery<'_> {
        queries::AirportQuery::new(&self.conn)
    }

    /// The demand simulator.
    pub fn simulator(&self) -> &DemandSimulator {
        &self.simulator
    }

    /// The live flight client.
    pub fn live_flights(&self) -> &LiveFlightClient {
        &self.live
    }

    /// The dashboard view model over all of the above.
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(&self.conn, &self.simulator, &self.live)
    }

    /// Execute a raw SQL query against the dataset views.
    ///
    /// Views are registered lazily; call a catalog query first (or
    /// [`Connection::ensure_views`]) so the tables you reference exist.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Drop downloaded datasets and registered views.
    ///
    /// The next catalog query downloads fresh copies (unless offline).
    pub fn refresh(&self) -> Result<()> {
        self.conn.cache.borrow().clear()?;
        self.conn.reset_views();
        log::info!("Dataset cache cleared and views reset");
        Ok(())
    }

    /// Currently registered DuckDB view names, sorted.
    pub fn views(&self) -> Vec<String> {
        self.conn.views()
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for AirlineDemand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let views = self.conn.views();
        let cache = self.conn.cache.borrow();
        write!(
            f,
            "AirlineDemand(cache_dir={}, views=[{}], offline={}, live_flights={})",
            cache.cache_dir.display(),
            views.join(", "),
            cache.offline,
            if self.live.is_enabled() { "enabled" } else { "disabled" }
        )
    }
}
