//! Route catalog integration tests against the sample OpenFlights files.

mod common;

use airline_demand::AirlineDemandError;

// ---------------------------------------------------------------------------
// top
// ---------------------------------------------------------------------------

#[test]
fn top_ranks_by_airline_count_then_route_key() {
    let (app, _tmp) = common::setup_sample_app();

    let top = app.routes().top(10, None).unwrap();
    let keys: Vec<&str> = top.iter().map(|r| r.route.as_str()).collect();
    assert_eq!(keys, vec!["LHR-JFK", "SYD-MEL", "JFK-LHR", "CDG-LHR", "MEL-SYD"]);

    let counts: Vec<i64> = top.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![3, 3, 2, 1, 1]);

    let ranks: Vec<i64> = top.iter().map(|r| r.popularity_rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

    assert_eq!(top[0].origin_code, "LHR");
    assert_eq!(top[0].destination_code, "JFK");
}

#[test]
fn top_respects_limit() {
    let (app, _tmp) = common::setup_sample_app();
    let top = app.routes().top(2, None).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[1].route, "SYD-MEL");
}

#[test]
fn top_filters_by_origin_country() {
    let (app, _tmp) = common::setup_sample_app();

    let top = app.routes().top(10, Some("Australia")).unwrap();
    let keys: Vec<&str> = top.iter().map(|r| r.route.as_str()).collect();
    assert_eq!(keys, vec!["SYD-MEL", "MEL-SYD"]);
    assert_eq!(top[0].popularity_rank, 1);
}

#[test]
fn top_with_unknown_country_is_empty() {
    let (app, _tmp) = common::setup_sample_app();
    assert!(app.routes().top(10, Some("Atlantis")).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// all / count
// ---------------------------------------------------------------------------

#[test]
fn all_returns_every_route_row_with_rank() {
    let (app, _tmp) = common::setup_sample_app();

    let routes = app.routes().all(None).unwrap();
    // The row without a source IATA code is dropped
    assert_eq!(routes.len(), 10);
    assert_eq!(app.routes().count(None).unwrap(), 10);

    let lhr_jfk: Vec<_> = routes
        .iter()
        .filter(|r| r.origin_code == "LHR" && r.destination_code == "JFK")
        .collect();
    assert_eq!(lhr_jfk.len(), 3);
    assert!(lhr_jfk.iter().all(|r| r.popularity_rank == 1));

    let airlines: Vec<&str> = lhr_jfk.iter().map(|r| r.airline.as_str()).collect();
    assert_eq!(airlines, vec!["AA", "BA", "VS"]);
}

#[test]
fn all_ranks_within_country_filter() {
    let (app, _tmp) = common::setup_sample_app();

    let routes = app.routes().all(Some("France")).unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].origin_code, "CDG");
    assert_eq!(routes[0].popularity_rank, 1);
    assert_eq!(app.routes().count(Some("France")).unwrap(), 1);
}

// ---------------------------------------------------------------------------
// countries / get / airlines
// ---------------------------------------------------------------------------

#[test]
fn countries_are_sorted_and_distinct() {
    let (app, _tmp) = common::setup_sample_app();
    assert_eq!(
        app.routes().countries().unwrap(),
        vec!["Australia", "France", "United Kingdom", "United States"]
    );
}

#[test]
fn get_joins_airport_details() {
    let (app, _tmp) = common::setup_sample_app();

    let rows = app.routes().get("lhr", "jfk").unwrap();
    assert_eq!(rows.len(), 3);
    let first = &rows[0];
    assert_eq!(first.route, "LHR-JFK");
    assert_eq!(first.airline.as_deref(), Some("AA"));
    assert!(first.codeshare);
    assert_eq!(first.stops, Some(0));
    assert_eq!(first.origin_city.as_deref(), Some("London"));
    assert_eq!(first.destination_country.as_deref(), Some("United States"));
    assert!((first.origin_latitude.unwrap() - 51.4706).abs() < 1e-6);
    assert!(!rows[1].codeshare);
}

#[test]
fn get_unknown_pair_is_empty() {
    let (app, _tmp) = common::setup_sample_app();
    assert!(app.routes().get("ZZZ", "QQQ").unwrap().is_empty());
    assert!(!app.routes().exists("ZZZ", "QQQ").unwrap());
    assert!(app.routes().exists("SYD", "MEL").unwrap());
}

#[test]
fn airlines_are_distinct_and_sorted() {
    let (app, _tmp) = common::setup_sample_app();
    assert_eq!(
        app.routes().airlines("SYD", "MEL").unwrap(),
        vec!["JQ", "QF", "VA"]
    );
}

#[test]
fn routes_to_unknown_airports_keep_empty_details() {
    let tmp = tempfile::tempdir().unwrap();
    let routes = format!("{}XX,1,AAA,1,BBB,2,,0,320\n", common::SAMPLE_ROUTES);
    let app = common::sample_builder(&tmp, &routes, common::SAMPLE_AIRPORTS)
        .build()
        .unwrap();

    let rows = app.routes().get("AAA", "BBB").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].origin_city, None);
    assert_eq!(rows[0].destination_country, None);
}

// ---------------------------------------------------------------------------
// Dataset edge cases
// ---------------------------------------------------------------------------

#[test]
fn header_only_routes_file_gives_empty_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::sample_builder(&tmp, common::ROUTES_HEADER, common::SAMPLE_AIRPORTS)
        .build()
        .unwrap();

    assert!(app.routes().all(None).unwrap().is_empty());
    assert!(app.routes().top(20, None).unwrap().is_empty());
    assert!(app.routes().countries().unwrap().is_empty());
    assert_eq!(app.routes().count(None).unwrap(), 0);
}

#[test]
fn header_row_is_skipped_when_data_follows() {
    let tmp = tempfile::tempdir().unwrap();
    let routes = format!("{}{}", common::ROUTES_HEADER, common::SAMPLE_ROUTES);
    let app = common::sample_builder(&tmp, &routes, common::SAMPLE_AIRPORTS)
        .build()
        .unwrap();

    assert_eq!(app.routes().count(None).unwrap(), 10);
}

#[test]
fn empty_routes_file_gives_empty_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::sample_builder(&tmp, "", common::SAMPLE_AIRPORTS)
        .build()
        .unwrap();
    assert!(app.routes().top(20, None).unwrap().is_empty());
}

#[test]
fn missing_routes_file_is_dataset_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let airports = common::write_file(tmp.path(), "airports.dat", common::SAMPLE_AIRPORTS);
    let app = airline_demand::AirlineDemand::builder()
        .cache_dir(tmp.path().join("cache"))
        .offline(true)
        .routes_file(tmp.path().join("does-not-exist.dat"))
        .airports_file(airports)
        .build()
        .unwrap();

    let err = app.routes().top(20, None).unwrap_err();
    assert!(matches!(err, AirlineDemandError::DatasetUnavailable(_)));
}

#[test]
fn offline_without_cache_is_dataset_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let app = airline_demand::AirlineDemand::builder()
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();

    let err = app.routes().countries().unwrap_err();
    assert!(matches!(err, AirlineDemandError::DatasetUnavailable(_)));
    assert!(err.to_string().contains("offline"));
}

#[test]
fn cached_files_are_used_offline() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_file(tmp.path(), "routes.dat", common::SAMPLE_ROUTES);
    common::write_file(tmp.path(), "airports.dat", common::SAMPLE_AIRPORTS);
    let app = airline_demand::AirlineDemand::builder()
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();

    assert_eq!(app.routes().top(1, None).unwrap()[0].route, "LHR-JFK");
}

// ---------------------------------------------------------------------------
// Airports
// ---------------------------------------------------------------------------

#[test]
fn airport_get_by_iata() {
    let (app, _tmp) = common::setup_sample_app();

    let syd = app.airports().get("syd").unwrap().unwrap();
    assert_eq!(syd.iata, "SYD");
    assert_eq!(syd.city.as_deref(), Some("Sydney"));
    assert_eq!(syd.country.as_deref(), Some("Australia"));
    assert!(syd.latitude.unwrap() < 0.0);

    assert!(app.airports().get("ZZZ").unwrap().is_none());
}

#[test]
fn airport_search_matches_name_city_or_code() {
    let (app, _tmp) = common::setup_sample_app();

    let by_city = app.airports().search("london", 10).unwrap();
    assert_eq!(by_city.len(), 1);
    assert_eq!(by_city[0].iata, "LHR");

    let by_name = app.airports().search("International", 10).unwrap();
    let codes: Vec<&str> = by_name.iter().map(|a| a.iata.as_str()).collect();
    assert_eq!(codes, vec!["CDG", "JFK", "MEL", "SYD"]);

    // Airports without an IATA code never match
    assert!(app.airports().search("Nowhere", 10).unwrap().is_empty());
}
