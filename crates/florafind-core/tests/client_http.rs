//! FloraClient against an in-process HTTP backend.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use florafind_core::client::{AddToGardenArgs, Backend, FloraClient};
use florafind_core::config::{ClientConfig, RetryPolicy};
use florafind_core::models::QueryOutcome;
use florafind_core::ClientError;

#[derive(Clone, Default)]
struct Hits {
    leaderboard: Arc<AtomicUsize>,
    suggestions: Arc<AtomicUsize>,
}

async fn query(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    let location = params.get("location").cloned().unwrap_or_default();
    Json(json!({
        "message": format!("you asked '{}' from '{}'", q, location),
        "suggestions": [],
        "language": "hi",
    }))
}

async fn user_stats(Path(user_id): Path<u32>) -> Json<Value> {
    Json(json!({"points": user_id * 100, "level": 2, "badges": 3}))
}

async fn challenges() -> Json<Value> {
    Json(json!({"challenges": [], "error": "database unavailable"}))
}

async fn leaderboard(State(hits): State<Hits>) -> (StatusCode, Json<Value>) {
    if hits.leaderboard.fetch_add(1, Ordering::SeqCst) == 0 {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"detail": "warming up"})));
    }
    (
        StatusCode::OK,
        Json(json!({"leaderboard": [{"username": "Asha", "plant_health_points": 420, "level": 4}]})),
    )
}

async fn care_calendar() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Plant not found"})))
}

async fn my_garden() -> &'static str {
    "<html>maintenance</html>"
}

async fn location_suggestions(State(hits): State<Hits>) -> (StatusCode, &'static str) {
    hits.suggestions.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

async fn complete_care_task(State(hits): State<Hits>, Json(body): Json<Value>) -> Json<Value> {
    // POSTs must not be retried; reuse the counter to prove it
    hits.suggestions.fetch_add(100, Ordering::SeqCst);
    let points = if body["user_id"] == 7 { 50 } else { 0 };
    Json(json!({
        "success": true,
        "message": format!("{} done for plant {}", body["task_type"].as_str().unwrap_or("?"), body["user_plant_id"]),
        "points_earned": points,
    }))
}

async fn add_to_garden(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("user_id").is_none() || body.get("plant_id").is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing user_id or plant_id"})));
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "message": format!("{} planted on {}", body["nickname"].as_str().unwrap_or(""), body["date_planted"].as_str().unwrap_or(""))})),
    )
}

async fn spawn_backend() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/query", get(query))
        .route("/user_stats/{user_id}", get(user_stats))
        .route("/community/challenges", get(challenges))
        .route("/leaderboard", get(leaderboard))
        .route("/care_calendar/{plant_id}", get(care_calendar))
        .route("/my_garden/{user_id}", get(my_garden))
        .route("/location_suggestions", get(location_suggestions))
        .route("/complete_care_task", post(complete_care_task))
        .route("/add_to_garden", post(add_to_garden))
        .with_state(hits.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, hits)
}

fn client_for(addr: SocketAddr) -> FloraClient {
    FloraClient::new(ClientConfig {
        api_url: format!("http://{}", addr),
        user_id: 7,
        retry: RetryPolicy {
            max_attempts: 2,
            base_delay_ms: 10,
        },
        ..Default::default()
    })
}

#[tokio::test]
async fn test_query_encodes_and_classifies() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr);

    let reply = client
        .query("What grows in monsoon? & why", Some("São Paulo"))
        .await
        .unwrap();
    assert_eq!(reply.language.as_deref(), Some("hi"));
    match reply.outcome {
        QueryOutcome::Message { message, .. } => {
            assert_eq!(message, "you asked 'What grows in monsoon? & why' from 'São Paulo'");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_user_stats_uses_configured_user() {
    let (addr, _) = spawn_backend().await;
    let stats = client_for(addr).user_stats().await.unwrap();
    assert_eq!(stats.points, 700);
    assert_eq!(stats.badges, 3);
}

#[tokio::test]
async fn test_error_field_maps_to_backend() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr);

    let err = client.challenges().await.unwrap_err();
    assert_eq!(err, ClientError::Backend("database unavailable".into()));

    let err = client.care_calendar(99, None).await.unwrap_err();
    assert_eq!(err.backend_message(), Some("Plant not found"));
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode() {
    let (addr, _) = spawn_backend().await;
    let err = client_for(addr).my_garden().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_get_retries_server_errors() {
    let (addr, hits) = spawn_backend().await;
    let client = client_for(addr);

    let board = client.leaderboard().await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].username, "Asha");
    assert_eq!(hits.leaderboard.load(Ordering::SeqCst), 2);

    let err = client.location_suggestions("Mumbai").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
    assert_eq!(hits.suggestions.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_posts_carry_user_and_are_sent_once() {
    let (addr, hits) = spawn_backend().await;
    let client = client_for(addr);

    let resp = client.complete_care_task(4, "watering").await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.message, "watering done for plant 4");
    assert_eq!(resp.points_earned, 50);
    assert_eq!(hits.suggestions.load(Ordering::SeqCst), 100);

    let resp = client
        .add_to_garden(&AddToGardenArgs {
            plant_id: 3,
            nickname: "Tulsi".into(),
            location: "garden".into(),
            date_planted: "2024-09-05".into(),
        })
        .await
        .unwrap();
    assert_eq!(resp.message, "Tulsi planted on 2024-09-05");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FloraClient::new(ClientConfig {
        api_url: format!("http://{}", addr),
        retry: RetryPolicy::none(),
        ..Default::default()
    });
    let err = client.user_stats().await.unwrap_err();
    assert_eq!(err.kind(), "network");
}
