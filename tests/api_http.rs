// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /data   (success, empty dataset, missing file, malformed file)
// - GET /index.html (present + missing)
// - GET /static/*
// - GET /colors
// - CORS headers

use std::fs;
use std::path::Path;

use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use tag_trends::{api, AppConfig, AppState};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Router over a temp dir holding `tags.csv` (if given) and `static/`.
fn test_router(dir: &Path, csv: Option<&str>) -> Router {
    if let Some(content) = csv {
        fs::write(dir.join("tags.csv"), content).expect("write csv");
    }
    let config = AppConfig {
        dataset_path: dir.join("tags.csv"),
        static_dir: dir.join("static"),
        ..AppConfig::default()
    };
    api::router(AppState::new(config))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let (status, bytes) = get(app, uri).await;
    let v: Json = serde_json::from_slice(&bytes).expect("parse json");
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(test_router(dir.path(), None), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "ok");
}

#[tokio::test]
async fn data_returns_normalized_series() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "Tag,Time\npython,2023-01-01\npython,2023-06-01\njava,2023-03-01\n";
    let (status, v) = get_json(test_router(dir.path(), Some(csv)), "/data").await;

    assert_eq!(status, StatusCode::OK);
    let obj = v.as_object().expect("object");
    assert_eq!(obj.len(), 2);

    let py = &v["python"][0];
    assert_eq!(py["Year"], json!(2023));
    let py_pct = py["Normalized_Count"].as_f64().unwrap();
    let java_pct = v["java"][0]["Normalized_Count"].as_f64().unwrap();
    assert!((py_pct - 200.0 / 3.0).abs() < 1e-9);
    assert!((java_pct - 100.0 / 3.0).abs() < 1e-9);
    assert!((py_pct + java_pct - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn data_ignores_unparseable_times_and_extra_columns() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "Id,Tag,Time,Votes\n\
               1,rust,2024-01-01,3\n\
               2,go,not-a-date,1\n\
               3,rust,2025-02-02 10:00:00,0\n";
    let (status, v) = get_json(test_router(dir.path(), Some(csv)), "/data").await;

    assert_eq!(status, StatusCode::OK);
    assert!(v.get("go").is_none(), "bad timestamp must not count: {v}");
    let years: Vec<i64> = v["rust"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["Year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2024, 2025]);
}

#[tokio::test]
async fn data_with_no_valid_rows_is_empty_object() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = get_json(test_router(dir.path(), Some("Tag,Time\n")), "/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({}));

    let csv = "Tag,Time\npython,never\njava,\n";
    let (status, v) = get_json(test_router(dir.path(), Some(csv)), "/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({}));
}

#[tokio::test]
async fn data_missing_file_is_404_with_fixed_message() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = get_json(test_router(dir.path(), None), "/data").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v, json!({ "error": "CSV file not found!" }));
}

#[tokio::test]
async fn data_missing_column_is_500_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "Tag,Date\npython,2023-01-01\n";
    let (status, v) = get_json(test_router(dir.path(), Some(csv)), "/data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let msg = v["error"].as_str().expect("error string");
    assert!(msg.contains("Time"), "message should name the column: {msg}");
}

#[tokio::test]
async fn data_caps_at_ten_tags() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = String::from("Tag,Time\n");
    for i in 0..12 {
        csv.push_str(&format!("t{i},2023-01-01\n"));
    }
    let (status, v) = get_json(test_router(dir.path(), Some(&csv)), "/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v.as_object().unwrap().len(), 10);
}

#[tokio::test]
async fn data_is_reread_on_every_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("Tag,Time\nphp,2023-01-01\n"));

    let (_, first) = get_json(app.clone(), "/data").await;
    assert!(first.get("php").is_some());

    fs::write(dir.path().join("tags.csv"), "Tag,Time\nkotlin,2023-01-01\n").unwrap();
    let (_, second) = get_json(app, "/data").await;
    assert!(second.get("php").is_none());
    assert!(second.get("kotlin").is_some());
}

#[tokio::test]
async fn index_html_is_served_or_404() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = get(test_router(dir.path(), None), "/index.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    fs::create_dir_all(dir.path().join("static")).unwrap();
    fs::write(
        dir.path().join("static/index.html"),
        "<html><body>trends</body></html>",
    )
    .unwrap();
    let (status, body) = get(test_router(dir.path(), None), "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("trends"));
}

#[tokio::test]
async fn static_folder_is_served() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("static")).unwrap();
    fs::write(dir.path().join("static/app.js"), "console.log(1);").unwrap();

    let (status, body) = get(test_router(dir.path(), None), "/static/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log(1);");

    let (status, _) = get(test_router(dir.path(), None), "/static/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn colors_lists_palette() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = get_json(test_router(dir.path(), None), "/colors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["python"], json!("#377eb8"));
    assert_eq!(v.as_object().unwrap().len(), 10);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), Some("Tag,Time\n"));

    let req = Request::builder()
        .method("GET")
        .uri("/data")
        .header("origin", "http://frontend.example")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let allow = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    assert!(
        allow == "*" || allow == "http://frontend.example",
        "unexpected allow-origin: {allow:?}"
    );
}
