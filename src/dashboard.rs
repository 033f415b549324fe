//! Dashboard view model.
//!
//! One interaction recomputes every panel top to bottom. Each panel carries
//! its own outcome, so a missing dataset or a failing flight API only
//! affects the panel that needed it.

use crate::config;
use crate::connection::Connection;
use crate::live::LiveFlightClient;
use crate::models::{parse_route_key, route_key, DemandSeries, FlightListing, RouteDetail, RoutePopularity};
use crate::queries::RouteQuery;
use crate::simulator::DemandSimulator;
use serde::Serialize;

/// Seed used for the trend panel unless the request overrides it.
pub const DEFAULT_SEED: u64 = 42;

/// Default, minimum and maximum of the "top N routes" control.
pub const DEFAULT_TOP_N: usize = 20;
pub const MIN_TOP_N: usize = 5;
pub const MAX_TOP_N: usize = 200;

/// Size of the route pick-list.
pub const ROUTE_OPTIONS: usize = 200;

const NO_FLIGHTS_HINT: &str =
    "No live flights found for this route. Try a busier one like SYD-MEL or LHR-CDG.";

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// Outcome of rendering one dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    /// Rendered, but there is nothing to show.
    Empty(String),
    /// Waiting for an explicit user action.
    Idle(String),
    /// Feature switched off by configuration.
    Disabled(String),
    /// Recoverable failure of an external collaborator.
    Warning(String),
    /// The panel's data source cannot be read.
    Unavailable(String),
}

impl<T> Panel<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// The message of a non-ready panel.
    pub fn message(&self) -> Option<&str> {
        match self {
            Panel::Ready(_) => None,
            Panel::Empty(m)
            | Panel::Idle(m)
            | Panel::Disabled(m)
            | Panel::Warning(m)
            | Panel::Unavailable(m) => Some(m),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / view
// ---------------------------------------------------------------------------

/// The dashboard controls.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub top_n: usize,
    pub origin_country: Option<String>,
    /// Selected `"SRC-DST"` route; defaults to the most popular route.
    pub route: Option<String>,
    pub seed: Option<u64>,
    /// Whether the user asked for live flights in this interaction.
    pub fetch_live: bool,
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            origin_country: None,
            route: None,
            seed: Some(DEFAULT_SEED),
            fetch_live: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRoute {
    pub route: String,
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub countries: Panel<Vec<String>>,
    pub top_routes: Panel<Vec<RoutePopularity>>,
    /// Route keys offered in the pick-list.
    pub route_options: Panel<Vec<String>>,
    pub selected: Option<SelectedRoute>,
    pub route_details: Panel<Vec<RouteDetail>>,
    pub trends: Panel<DemandSeries>,
    pub live_flights: Panel<FlightListing>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard<'a> {
    conn: &'a Connection,
    simulator: &'a DemandSimulator,
    live: &'a LiveFlightClient,
}

impl<'a> Dashboard<'a> {
    pub fn new(conn: &'a Connection, simulator: &'a DemandSimulator, live: &'a LiveFlightClient) -> Self {
        Self {
            conn,
            simulator,
            live,
        }
    }

    /// Render every panel for one interaction. Never fails as a whole.
    pub fn render(&self, req: &DashboardRequest) -> DashboardView {
        let routes = RouteQuery::new(self.conn);
        let country = req.origin_country.as_deref().filter(|c| !c.is_empty() && *c != "All");

        let countries = match routes.countries() {
            Ok(list) => Panel::Ready(list),
            Err(e) => unavailable(e),
        };

        let (top_routes, route_options) = match routes.top(ROUTE_OPTIONS, country) {
            Ok(ranked) => {
                let top_n = req.top_n.clamp(MIN_TOP_N, MAX_TOP_N);
                let options: Vec<String> = ranked.iter().map(|r| r.route.clone()).collect();
                let top: Vec<RoutePopularity> = ranked.into_iter().take(top_n).collect();
                if top.is_empty() {
                    let msg = "No routes match the current filters.".to_string();
                    (Panel::Empty(msg.clone()), Panel::Empty(msg))
                } else {
                    (Panel::Ready(top), Panel::Ready(options))
                }
            }
            Err(e) => (unavailable(&e), unavailable(&e)),
        };

        let selected = req
            .route
            .as_deref()
            .and_then(parse_route_key)
            .or_else(|| {
                route_options
                    .ready()
                    .and_then(|opts| opts.first())
                    .and_then(|key| parse_route_key(key))
            })
            .map(|(origin, destination)| SelectedRoute {
                route: route_key(&origin, &destination),
                origin,
                destination,
            });

        let Some(sel) = selected else {
            let msg = "Pick a route to see simulated trends.".to_string();
            return DashboardView {
                countries,
                top_routes,
                route_options,
                selected: None,
                route_details: Panel::Empty(msg.clone()),
                trends: Panel::Empty(msg.clone()),
                live_flights: Panel::Empty(msg),
            };
        };

        let route_details = match routes.get(&sel.origin, &sel.destination) {
            Ok(rows) if rows.is_empty() => {
                Panel::Empty(format!("{} is not in the route catalog.", sel.route))
            }
            Ok(rows) => Panel::Ready(rows),
            Err(e) => unavailable(e),
        };

        let trends = Panel::Ready(self.simulator.simulate(&sel.origin, &sel.destination, req.seed));

        let live_flights = self.live_panel(&sel, req.fetch_live);

        DashboardView {
            countries,
            top_routes,
            route_options,
            selected: Some(sel),
            route_details,
            trends,
            live_flights,
        }
    }

    fn live_panel(&self, sel: &SelectedRoute, fetch: bool) -> Panel<FlightListing> {
        if !self.live.is_enabled() {
            return Panel::Disabled(format!(
                "{} missing. Add it to .env or the environment to enable live flights.",
                config::API_KEY_ENV
            ));
        }
        if !fetch {
            return Panel::Idle(format!("Get live flights for {}.", sel.route));
        }
        match self
            .live
            .lookup(&sel.origin, &sel.destination, config::DEFAULT_FLIGHT_LIMIT)
        {
            Ok(listing) if listing.is_empty() => Panel::Empty(NO_FLIGHTS_HINT.to_string()),
            Ok(listing) => Panel::Ready(listing),
            Err(e) => {
                log::warn!("Live flight panel degraded for {}: {}", sel.route, e);
                Panel::Warning(e.to_string())
            }
        }
    }
}

fn unavailable<T, E: std::fmt::Display>(e: E) -> Panel<T> {
    log::warn!("Route panel unavailable: {}", e);
    Panel::Unavailable(e.to_string())
}
