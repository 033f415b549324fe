//! AsyncAirlineDemand tests. Run with `--features async`.

#![cfg(feature = "async")]

mod common;

use airline_demand::{AsyncAirlineDemand, DashboardRequest};

#[tokio::test]
async fn async_queries_match_sync() {
    let tmp = tempfile::tempdir().unwrap();
    let builder = common::sample_builder(&tmp, common::SAMPLE_ROUTES, common::SAMPLE_AIRPORTS);
    let app = AsyncAirlineDemand::build(builder).await.unwrap();

    let top = app.top_routes(2, None).await.unwrap();
    assert_eq!(top[0].route, "LHR-JFK");
    assert_eq!(top[1].route, "SYD-MEL");

    let countries = app.countries().await.unwrap();
    assert_eq!(countries.len(), 4);

    let series = app
        .trends("JFK".into(), "LHR".into(), Some(42))
        .await
        .unwrap();
    assert_eq!(series.len(), 36);

    assert!(!app.live_enabled().await.unwrap());

    app.close().await.unwrap();
}

#[tokio::test]
async fn async_dashboard_and_run() {
    let tmp = tempfile::tempdir().unwrap();
    let builder = common::sample_builder(&tmp, common::SAMPLE_ROUTES, common::SAMPLE_AIRPORTS);
    let app = AsyncAirlineDemand::build(builder).await.unwrap();

    let view = app.dashboard(DashboardRequest::default()).await.unwrap();
    assert_eq!(view.selected.unwrap().route, "LHR-JFK");

    let count = app.run(|a| a.routes().count(None)).await.unwrap();
    assert_eq!(count, 10);

    app.close().await.unwrap();
}
