//! Connection integration tests: view registration, raw SQL, header sniffing.

mod common;

use airline_demand::{CacheManager, Connection};
use std::time::Duration;

fn offline_connection(tmp: &tempfile::TempDir) -> Connection {
    let cache = CacheManager::new(Some(tmp.path().join("cache")), true, Duration::from_secs(5)).unwrap();
    Connection::new(cache).unwrap()
}

#[test]
fn views_register_lazily() {
    let (app, _tmp) = common::setup_sample_app();
    assert!(app.views().is_empty());

    app.routes().top(1, None).unwrap();
    assert_eq!(app.views(), vec!["airports", "route_details", "routes"]);
    assert!(app.connection().has_view("route_details"));
}

#[test]
fn raw_sql_over_registered_views() {
    let (app, _tmp) = common::setup_sample_app();
    app.connection().ensure_views(&["routes"]).unwrap();

    let rows = app
        .sql(
            "SELECT \"Airline\" FROM routes WHERE \"SourceIATA\" = ? ORDER BY 1",
            &["SYD".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Airline"], "JQ");
}

#[test]
fn null_marker_becomes_null() {
    let (app, _tmp) = common::setup_sample_app();
    app.connection().ensure_views(&["routes"]).unwrap();

    let missing = app
        .connection()
        .execute_scalar(
            "SELECT COUNT(*) FROM routes WHERE \"SourceIATA\" IS NULL",
            &[],
        )
        .unwrap()
        .unwrap();
    assert_eq!(missing.as_i64(), Some(1));
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let (app, _tmp) = common::setup_sample_app();
    app.connection().ensure_views(&["airports"]).unwrap();

    let value = app
        .connection()
        .execute_scalar(
            "SELECT \"Name\" FROM airports WHERE \"IATA\" = ?",
            &["ZZZ".to_string()],
        )
        .unwrap();
    assert!(value.is_none());
}

#[test]
fn register_csv_view_detects_header() {
    let tmp = tempfile::tempdir().unwrap();
    let conn = offline_connection(&tmp);

    let with_header = common::write_file(
        tmp.path(),
        "with_header.dat",
        &format!("{}QF,4178,SYD,3361,MEL,3339,,0,738\n", common::ROUTES_HEADER),
    );
    conn.register_csv_view("routes", &with_header).unwrap();

    let rows = conn.execute("SELECT * FROM routes", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["SourceIATA"], "SYD");
    assert!(conn.has_view("routes"));
}

#[test]
fn malformed_rows_are_skipped_and_counted() {
    let tmp = tempfile::tempdir().unwrap();
    let conn = offline_connection(&tmp);

    let path = common::write_file(
        tmp.path(),
        "routes.dat",
        "QF,4178,SYD,3361,MEL,3339,,0,738\n\
         BA,1355,LHR,507,JFK,3797,,0,744,extra,extra,extra\n\
         VA,5351,SYD,3361,MEL,3339,,0,738\n",
    );
    conn.register_csv_view("routes", &path).unwrap();

    let rows = conn.execute("SELECT \"Airline\" FROM routes ORDER BY 1", &[]).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(conn.skipped_rows("routes"), 1);

    conn.reset_views();
    assert_eq!(conn.skipped_rows("routes"), 0);
}

#[test]
fn sample_files_load_without_skipped_rows() {
    let (app, _tmp) = common::setup_sample_app();
    app.routes().countries().unwrap();
    assert_eq!(app.connection().skipped_rows("routes"), 0);
    assert_eq!(app.connection().skipped_rows("airports"), 0);
}

#[test]
fn register_csv_view_rejects_unknown_dataset() {
    let tmp = tempfile::tempdir().unwrap();
    let conn = offline_connection(&tmp);
    let path = common::write_file(tmp.path(), "x.dat", "a,b\n");
    assert!(conn.register_csv_view("planes", &path).is_err());
}

#[test]
fn unknown_view_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let conn = offline_connection(&tmp);
    let err = conn.ensure_views(&["flights"]).unwrap_err();
    assert!(matches!(err, airline_demand::AirlineDemandError::NotFound(_)));
}

#[test]
fn refresh_resets_views() {
    let (app, _tmp) = common::setup_sample_app();
    app.routes().countries().unwrap();
    assert!(!app.views().is_empty());

    app.refresh().unwrap();
    assert!(app.views().is_empty());
    // Explicit local files survive a refresh
    assert_eq!(app.routes().count(None).unwrap(), 10);
}

#[test]
fn cache_reports_local_files() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cache = CacheManager::new(Some(tmp.path().join("cache")), true, Duration::from_secs(5)).unwrap();
    assert!(!cache.is_cached("routes"));

    let path = common::write_file(tmp.path(), "r.dat", common::SAMPLE_ROUTES);
    cache.set_local_file("routes", &path).unwrap();
    assert!(cache.is_cached("routes"));
    assert_eq!(cache.ensure_dataset("routes").unwrap(), path);

    assert!(cache.set_local_file("planes", &path).is_err());
}

#[test]
fn display_summarizes_state() {
    let (app, _tmp) = common::setup_sample_app();
    let text = app.to_string();
    assert!(text.starts_with("AirlineDemand(cache_dir="));
    assert!(text.contains("offline=true"));
    assert!(text.contains("live_flights=disabled"));
}
