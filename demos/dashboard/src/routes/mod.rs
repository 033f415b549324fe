pub mod api;
pub mod page;

use airline_demand::dashboard::{DashboardRequest, DEFAULT_SEED, DEFAULT_TOP_N};
use serde::Deserialize;

/// Dashboard controls as query parameters, shared by `/` and `/api/dashboard`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub top_n: Option<usize>,
    pub country: Option<String>,
    pub route: Option<String>,
    pub seed: Option<u64>,
    pub live: Option<bool>,
}

impl DashboardParams {
    pub fn to_request(&self) -> DashboardRequest {
        DashboardRequest {
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
            origin_country: self.country.clone().filter(|c| !c.is_empty() && c != "All"),
            route: self.route.clone().filter(|r| !r.is_empty()),
            seed: Some(self.seed.unwrap_or(DEFAULT_SEED)),
            fetch_live: self.live.unwrap_or(false),
        }
    }
}
