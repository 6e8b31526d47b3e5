mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn memory_lists_records_with_summary() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/memory").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert!((body["success_rate"].as_f64().unwrap() - 0.9).abs() < 1e-9);
    assert_eq!(body["weak_points"], serde_json::json!(["立体几何"]));
    assert_eq!(body["mastered_points"].as_array().unwrap().len(), 6);

    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 20);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["timestamp"], "2025-01-20 14:30:25");
    assert_eq!(records[19]["id"], 20);
}

#[tokio::test]
async fn memory_filters_by_tag_and_difficulty() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/memory?tag=%E8%A7%A3%E6%9E%90%E5%87%A0%E4%BD%95").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"].as_array().unwrap().len(), 3);
    // summary always covers the whole log
    assert_eq!(body["total"], 20);

    let (status, body) = app.get("/memory?difficulty=hard").await;
    assert_eq!(status, StatusCode::OK);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 3);
    assert_eq!(records[0]["difficulty"], "困难");

    let (status, body) = app.get("/memory?difficulty=%E7%AE%80%E5%8D%95").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["records"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["difficulty"] == "简单"));
}

#[tokio::test]
async fn memory_rejects_unknown_difficulty() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/memory?difficulty=impossible").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("impossible"));
}

#[tokio::test]
async fn memory_of_empty_log_is_all_zero() {
    let app = TestApp::empty();
    let (status, body) = app.get("/memory").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["success_rate"], 0.0);
    assert!(body["records"].as_array().unwrap().is_empty());
}
