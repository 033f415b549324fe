//! Query modules over the route catalog.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and returns typed rows.

pub mod airports;
pub mod routes;

pub use airports::AirportQuery;
pub use routes::RouteQuery;
