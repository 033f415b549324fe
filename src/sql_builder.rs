//! Parameterized SQL construction for the dataset views.
//!
//! Airport codes, country names and search text are always bound through
//! DuckDB's `?` placeholders; only column and view names are spliced in.
//!
//! # Example
//!
//! ```rust
//! use airline_demand::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("route_details")
//!     .select(&["route", "COUNT(*) AS count"])
//!     .where_eq("origin_country", "Australia")
//!     .group_by(&["route"])
//!     .order_by(&["count DESC"])
//!     .limit(20)
//!     .build();
//! assert_eq!(params, vec!["Australia"]);
//! assert!(sql.ends_with("LIMIT 20"));
//! ```

use std::fmt::Write;

/// SELECT over a single view. Methods return `&mut Self` for chaining.
pub struct SqlBuilder {
    view: String,
    columns: Vec<String>,
    distinct: bool,
    filters: Vec<String>,
    params: Vec<String>,
    group: Vec<String>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl SqlBuilder {
    pub fn new(view: &str) -> Self {
        Self {
            view: view.to_string(),
            columns: Vec::new(),
            distinct: false,
            filters: Vec::new(),
            params: Vec::new(),
            group: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Columns or expressions to select; `*` when never called.
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.columns = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// `{column} = ?`
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.filters.push(format!("{} = ?", column));
        self.params.push(value.to_string());
        self
    }

    /// `{column} IS NOT NULL`
    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.filters.push(format!("{} IS NOT NULL", column));
        self
    }

    /// Case-insensitive substring match against any of `columns`.
    ///
    /// `text` is trimmed and wrapped in `%`; one parameter is bound per column.
    pub fn where_contains(&mut self, columns: &[&str], text: &str) -> &mut Self {
        if columns.is_empty() {
            return self;
        }
        let pattern = format!("%{}%", text.trim());
        let alternatives: Vec<String> = columns
            .iter()
            .map(|c| format!("LOWER({}) LIKE LOWER(?)", c))
            .collect();
        self.filters.push(format!("({})", alternatives.join(" OR ")));
        self.params
            .extend(std::iter::repeat(pattern).take(columns.len()));
        self
    }

    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// ORDER BY terms, e.g. `"count DESC"`.
    pub fn order_by(&mut self, terms: &[&str]) -> &mut Self {
        self.order.extend(terms.iter().map(|t| t.to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    /// The SQL text (one clause per line) and its bound parameters.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }
        let _ = write!(sql, "\nFROM {}", self.view);
        if !self.filters.is_empty() {
            let _ = write!(sql, "\nWHERE {}", self.filters.join(" AND "));
        }
        if !self.group.is_empty() {
            let _ = write!(sql, "\nGROUP BY {}", self.group.join(", "));
        }
        if !self.order.is_empty() {
            let _ = write!(sql, "\nORDER BY {}", self.order.join(", "));
        }
        if let Some(n) = self.limit {
            let _ = write!(sql, "\nLIMIT {}", n);
        }
        (sql, self.params.clone())
    }
}
