#[derive(Debug, thiserror::Error)]
pub enum AirlineDemandError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Route dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("AVIATIONSTACK_KEY missing. Add it to .env or the environment.")]
    MissingApiKey,

    #[error("Flight API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, AirlineDemandError>;
