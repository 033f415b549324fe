use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Route — one airline serving an origin/destination pair
// ---------------------------------------------------------------------------

/// A route row from the catalog.
///
/// `popularity_rank` is the rank of the origin/destination pair in the
/// popularity ranking (1 = served by the most airlines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin_code: String,
    pub destination_code: String,
    pub airline: String,
    pub popularity_rank: i64,
}

// ---------------------------------------------------------------------------
// RoutePopularity — aggregated ranking entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePopularity {
    /// `"SRC-DST"` route key.
    pub route: String,
    pub origin_code: String,
    pub destination_code: String,
    /// Number of airline rows serving the route.
    pub count: i64,
    pub popularity_rank: i64,
}

// ---------------------------------------------------------------------------
// RouteDetail — route joined with origin and destination airports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetail {
    pub airline: Option<String>,
    pub origin_code: String,
    pub destination_code: String,
    pub route: String,
    pub codeshare: bool,
    pub stops: Option<i64>,
    pub equipment: Option<String>,
    pub origin_name: Option<String>,
    pub origin_city: Option<String>,
    pub origin_country: Option<String>,
    pub origin_latitude: Option<f64>,
    pub origin_longitude: Option<f64>,
    pub destination_name: Option<String>,
    pub destination_city: Option<String>,
    pub destination_country: Option<String>,
    pub destination_latitude: Option<f64>,
    pub destination_longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// Route keys
// ---------------------------------------------------------------------------

/// Normalize an airport code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Build the `"SRC-DST"` key used to identify a route.
pub fn route_key(origin: &str, destination: &str) -> String {
    format!("{}-{}", normalize_code(origin), normalize_code(destination))
}

/// Split a `"SRC-DST"` key into normalized codes.
///
/// `->`, `→` and `>` are accepted as separators too. Returns `None` unless
/// both sides are non-empty and purely alphanumeric.
pub fn parse_route_key(key: &str) -> Option<(String, String)> {
    let (origin, destination) = ROUTE_SEPARATORS
        .iter()
        .find_map(|sep| key.split_once(*sep))?;
    let origin = normalize_code(origin);
    let destination = normalize_code(destination);
    if !is_code(&origin) || !is_code(&destination) {
        return None;
    }
    Some((origin, destination))
}

const ROUTE_SEPARATORS: &[&str] = &["->", "→", "-", ">"];

fn is_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}
