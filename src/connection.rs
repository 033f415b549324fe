//! DuckDB connection wrapper with view registration and query execution.
//!
//! The OpenFlights `.dat` files are read in place with `read_csv`; every
//! column is registered as VARCHAR and `\N` is treated as NULL. The derived
//! `route_details` view joins each route with its origin and destination
//! airports.

use crate::cache::CacheManager;
use crate::config;
use crate::error::{AirlineDemandError, Result};
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Wraps a DuckDB connection and registers the dataset files as views.
pub struct Connection {
    conn: DuckDbConnection,
    /// The cache manager used to download/locate data files.
    pub cache: RefCell<CacheManager>,
    registered_views: RefCell<HashSet<String>>,
    skipped_rows: RefCell<HashMap<String, usize>>,
}

impl Connection {
    /// Create a connection backed by the given cache.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(cache: CacheManager) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            cache: RefCell::new(cache),
            registered_views: RefCell::new(HashSet::new()),
            skipped_rows: RefCell::new(HashMap::new()),
        })
    }

    /// Ensure one or more views are registered, downloading data if needed.
    pub fn ensure_views(&self, views: &[&str]) -> Result<()> {
        for name in views {
            if !self.registered_views.borrow().contains(*name) {
                self.ensure_view(name)?;
            }
        }
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let executed = rows_result.as_ref().ok_or_else(|| {
            AirlineDemandError::InvalidArgument("statement produced no result set".into())
        })?;
        let column_names: Vec<String> = executed
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let column_count = executed.column_count();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate().take(column_count) {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Register an OpenFlights-style CSV file as a view.
    ///
    /// `dataset` selects the column layout (`"routes"` or `"airports"`).
    /// A leading header row is detected and skipped. A file with no data
    /// rows yields an empty view with the same columns. Malformed rows (wrong
    /// field count, broken quoting) are dropped; their number is logged and
    /// reported by [`skipped_rows`](Self::skipped_rows).
    pub fn register_csv_view(&self, dataset: &str, path: &Path) -> Result<()> {
        let columns = config::columns_for(dataset).ok_or_else(|| {
            AirlineDemandError::NotFound(format!("Unknown dataset: {}", dataset))
        })?;

        let sniff = sniff_csv(path, columns[0]).map_err(|e| {
            AirlineDemandError::DatasetUnavailable(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))
        })?;

        let source = if sniff.has_data {
            let path_fwd = path.to_string_lossy().replace('\\', "/").replace('\'', "''");
            let col_spec: String = columns
                .iter()
                .map(|c| format!("'{}': 'VARCHAR'", c))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "SELECT * FROM read_csv('{}', header = {}, columns = {{{}}}, \
                 nullstr = '\\N', quote = '\"', escape = '\"', \
                 auto_detect = false, ignore_errors = true)",
                path_fwd, sniff.has_header, col_spec
            )
        } else {
            let cols: String = columns
                .iter()
                .map(|c| format!("CAST(NULL AS VARCHAR) AS \"{}\"", c))
                .collect::<Vec<_>>()
                .join(", ");
            format!("SELECT {} WHERE FALSE", cols)
        };

        self.conn
            .execute_batch(&format!("CREATE OR REPLACE VIEW {} AS {}", dataset, source))?;
        self.registered_views.borrow_mut().insert(dataset.to_string());

        let loaded = self
            .execute_scalar(&format!("SELECT COUNT(*) FROM {}", dataset), &[])?
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize;
        let skipped = sniff.data_lines.saturating_sub(loaded);
        if skipped > 0 {
            log::warn!(
                "{}: skipped {} malformed row(s) of {} in {}",
                dataset,
                skipped,
                sniff.data_lines,
                path.display()
            );
        }
        self.skipped_rows
            .borrow_mut()
            .insert(dataset.to_string(), skipped);

        log::info!(
            "Registered view: {} -> {} (header: {}, empty: {})",
            dataset,
            path.display(),
            sniff.has_header,
            !sniff.has_data
        );
        Ok(())
    }

    /// Check whether a view has been registered.
    pub fn has_view(&self, name: &str) -> bool {
        self.registered_views.borrow().contains(name)
    }

    /// Return a list of all registered view names.
    pub fn views(&self) -> Vec<String> {
        let mut views: Vec<String> = self.registered_views.borrow().iter().cloned().collect();
        views.sort();
        views
    }

    /// Data rows of a dataset file that could not be parsed and were left
    /// out of its view. 0 for views that are not registered.
    pub fn skipped_rows(&self, view: &str) -> usize {
        self.skipped_rows.borrow().get(view).copied().unwrap_or(0)
    }

    /// Clear all registered views so they will be re-created on next access.
    pub fn reset_views(&self) {
        self.registered_views.borrow_mut().clear();
        self.skipped_rows.borrow_mut().clear();
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    fn ensure_view(&self, view_name: &str) -> Result<()> {
        if self.registered_views.borrow().contains(view_name) {
            return Ok(());
        }

        match view_name {
            "routes" | "airports" => {
                let path = self.cache.borrow_mut().ensure_dataset(view_name)?;
                self.register_csv_view(view_name, &path)
            }
            "route_details" => {
                self.ensure_views(&["routes", "airports"])?;
                self.register_route_details_view()
            }
            other => Err(AirlineDemandError::NotFound(format!(
                "Unknown view: {}",
                other
            ))),
        }
    }

    /// Join routes with origin and destination airports.
    ///
    /// Routes without both IATA codes are dropped. Airports are deduplicated
    /// by IATA code (lowest AirportID wins) so the left joins never
    /// multiply route rows.
    fn register_route_details_view(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE OR REPLACE VIEW route_details AS
            WITH ap AS (
                SELECT "IATA" AS iata,
                       "Name" AS name,
                       "City" AS city,
                       "Country" AS country,
                       TRY_CAST("Latitude" AS DOUBLE) AS latitude,
                       TRY_CAST("Longitude" AS DOUBLE) AS longitude
                FROM airports
                WHERE "IATA" IS NOT NULL AND TRIM("IATA") <> ''
                QUALIFY ROW_NUMBER() OVER (
                    PARTITION BY "IATA" ORDER BY TRY_CAST("AirportID" AS BIGINT)
                ) = 1
            )
            SELECT r."Airline" AS airline,
                   r."SourceIATA" AS origin_code,
                   r."DestIATA" AS destination_code,
                   r."SourceIATA" || '-' || r."DestIATA" AS route,
                   COALESCE(r."Codeshare" = 'Y', FALSE) AS codeshare,
                   TRY_CAST(r."Stops" AS INTEGER) AS stops,
                   r."Equipment" AS equipment,
                   src.name AS origin_name,
                   src.city AS origin_city,
                   src.country AS origin_country,
                   src.latitude AS origin_latitude,
                   src.longitude AS origin_longitude,
                   dst.name AS destination_name,
                   dst.city AS destination_city,
                   dst.country AS destination_country,
                   dst.latitude AS destination_latitude,
                   dst.longitude AS destination_longitude
            FROM routes r
            LEFT JOIN ap src ON r."SourceIATA" = src.iata
            LEFT JOIN ap dst ON r."DestIATA" = dst.iata
            WHERE r."SourceIATA" IS NOT NULL AND r."DestIATA" IS NOT NULL
            "#,
        )?;
        self.registered_views
            .borrow_mut()
            .insert("route_details".to_string());
        log::info!("Registered view: route_details (routes LEFT JOIN airports)");
        Ok(())
    }
}

struct CsvSniff {
    has_header: bool,
    has_data: bool,
    /// Non-blank lines after the header.
    data_lines: usize,
}

/// Scan a CSV file for a header row and count its data lines.
///
/// The first line is a header when its first field names `first_column`.
fn sniff_csv(path: &Path, first_column: &str) -> std::io::Result<CsvSniff> {
    let reader = BufReader::new(File::open(path)?);

    let mut has_header = false;
    let mut lines = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if lines == 0 {
            let first_field = line
                .split(',')
                .next()
                .unwrap_or("")
                .trim()
                .trim_matches('"');
            has_header = first_field.eq_ignore_ascii_case(first_column);
        }
        lines += 1;
    }

    let data_lines = lines - usize::from(has_header);
    Ok(CsvSniff {
        has_header,
        has_data: data_lines > 0,
        data_lines,
    })
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => serde_json::Value::Number(i.into()),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        // Dates, lists, blobs etc. never appear in the dataset views
        _ => serde_json::Value::Null,
    }
}
