use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Airport — one row of airports.dat with a usable IATA code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub iata: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
