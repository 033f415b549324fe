use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

pub const OPENFLIGHTS_BASE: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data";

pub const AVIATIONSTACK_FLIGHTS_URL: &str = "http://api.aviationstack.com/v1/flights";

/// Environment variable holding the AviationStack access key.
pub const API_KEY_ENV: &str = "AVIATIONSTACK_KEY";

/// Number of listings requested from the live flight API.
pub const DEFAULT_FLIGHT_LIMIT: usize = 10;

/// Dataset name -> file name under [`OPENFLIGHTS_BASE`] and the cache directory.
pub fn dataset_files() -> HashMap<&'static str, &'static str> {
    HashMap::from([("airports", "airports.dat"), ("routes", "routes.dat")])
}

/// Column layout of `routes.dat` (the file has no header row).
pub const ROUTE_COLUMNS: &[&str] = &[
    "Airline",
    "AirlineID",
    "SourceIATA",
    "SourceAirportID",
    "DestIATA",
    "DestAirportID",
    "Codeshare",
    "Stops",
    "Equipment",
];

/// Column layout of `airports.dat`.
pub const AIRPORT_COLUMNS: &[&str] = &[
    "AirportID",
    "Name",
    "City",
    "Country",
    "IATA",
    "ICAO",
    "Latitude",
    "Longitude",
    "Altitude",
    "Timezone",
    "DST",
    "TzDatabaseTimeZone",
    "Type",
    "Source",
];

pub fn columns_for(dataset: &str) -> Option<&'static [&'static str]> {
    match dataset {
        "routes" => Some(ROUTE_COLUMNS),
        "airports" => Some(AIRPORT_COLUMNS),
        _ => None,
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("airline-demand")
    } else {
        PathBuf::from(".airline-demand-cache")
    }
}

/// Read the API key from the environment. Empty values count as absent.
pub fn api_key_from_env() -> Option<String> {
    env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
