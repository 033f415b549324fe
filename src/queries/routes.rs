//! Route catalog queries against the `route_details` view.

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{normalize_code, Route, RouteDetail, RoutePopularity};
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// RouteQuery
// ---------------------------------------------------------------------------

/// Query interface for the route catalog and its popularity ranking.
///
/// Popularity is the number of airline rows serving an origin/destination
/// pair. Ranks start at 1; ties are broken by route key, ascending.
pub struct RouteQuery<'a> {
    conn: &'a Connection,
}

impl<'a> RouteQuery<'a> {
    /// Create a new `RouteQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Every route row, optionally restricted to an origin country, with the
    /// popularity rank of its origin/destination pair.
    ///
    /// Ranks are computed within the filtered set, so the most popular route
    /// of a country always has rank 1.
    pub fn all(&self, origin_country: Option<&str>) -> Result<Vec<Route>> {
        self.conn.ensure_views(&["route_details"])?;

        let (filter, params) = country_filter(origin_country);
        let sql = format!(
            r#"
            WITH base AS (
                SELECT * FROM route_details {filter}
            ),
            ranked AS (
                SELECT route,
                       ROW_NUMBER() OVER (ORDER BY COUNT(*) DESC, route ASC) AS popularity_rank
                FROM base
                GROUP BY route
            )
            SELECT b.origin_code,
                   b.destination_code,
                   COALESCE(b.airline, '') AS airline,
                   r.popularity_rank
            FROM base b
            JOIN ranked r ON b.route = r.route
            ORDER BY r.popularity_rank, airline
            "#
        );

        self.conn.execute_into(&sql, &params)
    }

    /// The `limit` most popular routes, optionally restricted to an origin country.
    pub fn top(&self, limit: usize, origin_country: Option<&str>) -> Result<Vec<RoutePopularity>> {
        self.conn.ensure_views(&["route_details"])?;

        let mut qb = SqlBuilder::new("route_details");
        qb.select(&[
            "route",
            "origin_code",
            "destination_code",
            "COUNT(*) AS count",
            "ROW_NUMBER() OVER (ORDER BY COUNT(*) DESC, route ASC) AS popularity_rank",
        ]);
        if let Some(country) = origin_country {
            qb.where_eq("origin_country", country);
        }
        qb.group_by(&["route", "origin_code", "destination_code"])
            .order_by(&["popularity_rank ASC"])
            .limit(limit);

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// Distinct origin countries, sorted ascending.
    pub fn countries(&self) -> Result<Vec<String>> {
        self.conn.ensure_views(&["route_details"])?;

        let (sql, params) = SqlBuilder::new("route_details")
            .select(&["origin_country"])
            .distinct()
            .where_not_null("origin_country")
            .order_by(&["origin_country ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                r.get("origin_country")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            })
            .collect())
    }

    /// All airline rows for an origin/destination pair, joined with airport data.
    ///
    /// Codes are matched case-insensitively. Unknown pairs return an empty vector.
    pub fn get(&self, origin: &str, destination: &str) -> Result<Vec<RouteDetail>> {
        self.conn.ensure_views(&["route_details"])?;

        let origin = normalize_code(origin);
        let destination = normalize_code(destination);
        let (sql, params) = SqlBuilder::new("route_details")
            .where_eq("origin_code", &origin)
            .where_eq("destination_code", &destination)
            .order_by(&["airline ASC"])
            .build();

        self.conn.execute_into(&sql, &params)
    }

    /// Whether any airline serves the pair.
    pub fn exists(&self, origin: &str, destination: &str) -> Result<bool> {
        Ok(!self.get(origin, destination)?.is_empty())
    }

    /// Distinct airline codes serving a pair, sorted ascending.
    pub fn airlines(&self, origin: &str, destination: &str) -> Result<Vec<String>> {
        Ok(self
            .get(origin, destination)?
            .into_iter()
            .filter_map(|d| d.airline)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    /// Number of route rows, optionally restricted to an origin country.
    pub fn count(&self, origin_country: Option<&str>) -> Result<i64> {
        self.conn.ensure_views(&["route_details"])?;

        let (filter, params) = country_filter(origin_country);
        let sql = format!("SELECT COUNT(*) FROM route_details {filter}");
        let value = self.conn.execute_scalar(&sql, &params)?;
        Ok(value.and_then(|v| v.as_i64()).unwrap_or(0))
    }
}

fn country_filter(origin_country: Option<&str>) -> (&'static str, Vec<String>) {
    match origin_country {
        Some(country) => ("WHERE origin_country = ?", vec![country.to_string()]),
        None => ("", Vec::new()),
    }
}
