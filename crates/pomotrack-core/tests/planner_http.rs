//! Planner client against a mocked `/plan-day` endpoint.

use std::time::Duration;

use mockito::Matcher;
use pomotrack_core::{HttpPlanner, PlanRequest, PlannedBlock, PlannerError};
use serde_json::json;

fn request() -> PlanRequest {
    PlanRequest::new(90, vec!["Essay".into(), "Flashcards".into()]).unwrap()
}

#[tokio::test]
async fn posts_request_and_decodes_blocks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/plan-day")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "availableMinutes": 90,
            "tasks": ["Essay", "Flashcards"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"taskTitle": "Essay", "durationMinutes": 50},
                {"taskTitle": "Flashcards", "durationMinutes": 25}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let planner = HttpPlanner::new(&server.url()).unwrap();
    let blocks = planner.plan_day(&request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        blocks,
        vec![
            PlannedBlock {
                task_title: "Essay".into(),
                duration_minutes: 50
            },
            PlannedBlock {
                task_title: "Flashcards".into(),
                duration_minutes: 25
            },
        ]
    );
}

#[tokio::test]
async fn server_error_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/plan-day")
        .with_status(503)
        .create_async()
        .await;

    let planner = HttpPlanner::new(&server.url()).unwrap();
    let err = planner.plan_day(&request()).await.unwrap_err();
    assert!(matches!(err, PlannerError::Status { status: 503 }));
}

#[tokio::test]
async fn unexpected_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/plan-day")
        .with_status(200)
        .with_body(r#"{"blocks": []}"#)
        .create_async()
        .await;

    let planner = HttpPlanner::new(&server.url()).unwrap();
    let err = planner.plan_day(&request()).await.unwrap_err();
    assert!(matches!(err, PlannerError::Decode(_)));
}

#[tokio::test]
async fn unreachable_planner_is_a_request_error() {
    // Port 9 (discard) is closed on test machines.
    let planner = HttpPlanner::new("http://127.0.0.1:9").unwrap();
    let err = planner.plan_day(&request()).await.unwrap_err();
    assert!(matches!(err, PlannerError::Request(_)));
}

#[tokio::test]
async fn silent_planner_times_out() {
    // Accepts connections and reads the request, but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            let (socket, _) = listener.accept().await.unwrap();
            held.push(socket);
        }
    });

    let planner =
        HttpPlanner::with_timeout(&format!("http://{addr}"), Duration::from_millis(200)).unwrap();
    let started = std::time::Instant::now();
    let err = planner.plan_day(&request()).await.unwrap_err();

    assert!(matches!(&err, PlannerError::Request(e) if e.is_timeout()), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
    server.abort();
}
