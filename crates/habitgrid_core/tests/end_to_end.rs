//! Exercises the full flow against a mock server: the summary fetch feeding
//! the yearly grid, and a day session loading and toggling over HTTP.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use habitgrid_client::{HabitsClient, http_client::ReqwestHabitsClient};
use habitgrid_core::{DaySession, DayState, GridCell, build_grid, year_days_until};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn summary_fetch_feeds_the_yearly_grid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "s1", "date": "2025-01-05T12:00:00Z", "available": 4, "completed": 2},
            {"id": "s2", "date": "2025-02-01T12:00:00Z", "available": 1, "completed": 1}
        ])))
        .mount(&server)
        .await;

    let client = ReqwestHabitsClient::new(&server.uri());
    let summaries = client.get_summary().await.expect("summaries");

    let days = year_days_until(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
    let cells = build_grid(&days, &summaries, &Utc);

    assert_eq!(cells.len(), 90);
    let jan_5 = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    let Some(GridCell::Day {
        counts: Some(counts),
        ..
    }) = cells.get(4)
    else {
        panic!("expected summary counts for {jan_5}");
    };
    assert_eq!((counts.available, counts.completed), (4, 2));
    assert_eq!(counts.progress(), 50);
}

#[tokio::test]
async fn day_session_loads_and_toggles_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "available": [
                {"id": "a", "title": "Read"},
                {"id": "b", "title": "Run"}
            ],
            "completed": ["a"]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/habits/a/toggle"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client: Arc<dyn HabitsClient> = Arc::new(ReqwestHabitsClient::new(&server.uri()));
    let session = DaySession::open(client, Local::now().date_naive());

    let detail = session.load().await.expect("load");
    assert_eq!(detail.progress(), 50);

    let detail = session.toggle("a").await.expect("toggle");
    assert!(!detail.is_completed("a"));
    assert_eq!(detail.progress(), 0);
    assert!(matches!(session.state().await, DayState::Ready(_)));
}
