//! Airport lookups against the `airports` view.

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{normalize_code, Airport};
use crate::sql_builder::SqlBuilder;

const AIRPORT_COLUMNS: &[&str] = &[
    "\"IATA\" AS iata",
    "\"Name\" AS name",
    "\"City\" AS city",
    "\"Country\" AS country",
    "TRY_CAST(\"Latitude\" AS DOUBLE) AS latitude",
    "TRY_CAST(\"Longitude\" AS DOUBLE) AS longitude",
];

pub struct AirportQuery<'a> {
    conn: &'a Connection,
}

impl<'a> AirportQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Look up an airport by IATA code (case-insensitive).
    pub fn get(&self, iata: &str) -> Result<Option<Airport>> {
        self.conn.ensure_views(&["airports"])?;

        let code = normalize_code(iata);
        let (sql, params) = SqlBuilder::new("airports")
            .select(AIRPORT_COLUMNS)
            .where_eq("\"IATA\"", &code)
            .order_by(&["TRY_CAST(\"AirportID\" AS BIGINT) ASC"])
            .limit(1)
            .build();

        let mut rows: Vec<Airport> = self.conn.execute_into(&sql, &params)?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    /// Airports whose IATA code, name or city contains `text`.
    pub fn search(&self, text: &str, limit: usize) -> Result<Vec<Airport>> {
        self.conn.ensure_views(&["airports"])?;

        let (sql, params) = SqlBuilder::new("airports")
            .select(AIRPORT_COLUMNS)
            .where_not_null("\"IATA\"")
            .where_contains(&["\"IATA\"", "\"Name\"", "\"City\""], text)
            .order_by(&["\"IATA\" ASC"])
            .limit(limit)
            .build();

        self.conn.execute_into(&sql, &params)
    }
}
