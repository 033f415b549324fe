use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LiveFlight — flattened flight listing row
// ---------------------------------------------------------------------------

/// One live flight, flattened from the nested API payload.
///
/// Every field is optional; the API omits or nulls fields freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveFlight {
    pub airline_name: Option<String>,
    pub flight_number: Option<String>,
    pub flight_iata: Option<String>,
    pub departure_iata: Option<String>,
    pub arrival_iata: Option<String>,
    pub departure_scheduled: Option<String>,
    pub arrival_scheduled: Option<String>,
    pub flight_status: Option<String>,
}

// ---------------------------------------------------------------------------
// FlightListing — result of a live lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightListing {
    pub origin: String,
    pub destination: String,
    pub flights: Vec<LiveFlight>,
    /// Total matches reported by the API's pagination block, if any.
    pub total: Option<u64>,
}

impl FlightListing {
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
