//! Webhook integration tests
//!
//! Drives the router directly with `oneshot` and through a bound socket.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{dir, file, FakeLister, TestHarness};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use strm_webhook::server::create_router;
use tower::ServiceExt;

async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

fn library() -> FakeLister {
    FakeLister::new()
        .dir("/115/Movies", vec![dir("Inception"), file("readme.txt")])
        .dir("/115/Movies/Inception", vec![file("movie.mkv"), file("movie.srt")])
}

#[tokio::test]
async fn test_health() {
    let h = TestHarness::new(FakeLister::new());
    let app = create_router(h.context());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["alist_url"], "http://127.0.0.1:5244");
    assert_eq!(json["strm_save_dir"], h.save_dir().display().to_string());
}

#[tokio::test]
async fn test_config_masks_token() {
    let mut h = TestHarness::new(FakeLister::new());
    h.config.alist.token = "super-secret".to_string();
    let app = create_router(h.context());

    let response = app
        .oneshot(Request::get("/config").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["alist"]["token"], "***");
    assert_eq!(json["strm"]["server"], common::STREAM_SERVER);
    assert!(!json.to_string().contains("super-secret"));
}

#[tokio::test]
async fn test_strm_generates_and_reports() {
    let h = TestHarness::new(library());
    let app = create_router(h.context());

    let response = app
        .oneshot(post_json("/webhook/strm", &json!({"path": "/115/Movies"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["code"], 200);
    assert_eq!(json["path"], "/115/Movies");
    assert_eq!(json["created_count"], 1);
    assert_eq!(json["skipped_count"], 0);
    assert_eq!(json["error_count"], 0);
    assert_eq!(
        json["details"]["created"][0],
        h.output_str("115/Movies/Inception/movie.strm")
    );
    assert!(h.output("115/Movies/Inception/movie.strm").exists());
}

#[tokio::test]
async fn test_strm_alternate_field_and_relative_path() {
    let h = TestHarness::new(library());
    let app = create_router(h.context());

    let response = app
        .oneshot(post_json(
            "/webhook/strm",
            &json!({"savepath": "115/Movies", "title": "Inception"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["path"], "/115/Movies");
    assert_eq!(json["created_count"], 1);
    assert_eq!(h.lister.calls()[0], ("/115/Movies".to_string(), true));
}

#[tokio::test]
async fn test_strm_missing_path() {
    let h = TestHarness::new(library());
    let app = create_router(h.context());

    let response = app
        .oneshot(post_json("/webhook/strm", &json!({"title": "Inception"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["code"], 400);
    assert_eq!(json["received_data"]["title"], "Inception");
    assert!(h.lister.calls().is_empty());
}

#[tokio::test]
async fn test_strm_non_json_body() {
    let h = TestHarness::new(library());
    let app = create_router(h.context());

    let response = app
        .oneshot(
            Request::post("/webhook/strm")
                .body(Body::from("not valid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["received_data"], json!({}));
}

#[tokio::test]
async fn test_strm_listing_failure_still_succeeds() {
    let h = TestHarness::new(FakeLister::new());
    let app = create_router(h.context());

    let response = app
        .oneshot(post_json("/webhook/strm", &json!({"path": "/gone"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error_count"], 1);
    assert!(json["details"]["errors"][0]
        .as_str()
        .unwrap()
        .contains("/gone"));
}

#[tokio::test]
async fn test_direct_generates_without_listing() {
    let h = TestHarness::new(FakeLister::new());
    let app = create_router(h.context());

    let response = app
        .oneshot(post_json(
            "/webhook/strm/direct",
            &json!({"files": ["/115/Movies/x/movie.mkv", "115/Movies/x/movie2.mp4", 7]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["created_count"], 2);
    assert_eq!(json["error_count"], 1);
    assert!(json.get("path").is_none());
    assert!(h.lister.calls().is_empty());
    assert!(h.output("115/Movies/x/movie2.strm").exists());
}

#[tokio::test]
async fn test_direct_refuses_parent_segments() {
    let h = TestHarness::new(FakeLister::new());
    let app = create_router(h.context());

    let response = app
        .oneshot(post_json(
            "/webhook/strm/direct",
            &json!({"files": ["/../../escape.mkv", "/115/a.mkv"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["created_count"], 1);
    assert_eq!(json["error_count"], 1);
    assert!(!h.save_dir().parent().unwrap().join("escape.strm").exists());
}

#[tokio::test]
async fn test_direct_missing_files() {
    let h = TestHarness::new(FakeLister::new());

    for payload in [json!({}), json!({"files": []}), json!({"files": "a.mkv"})] {
        let app = create_router(h.context());
        let response = app
            .oneshot(post_json("/webhook/strm/direct", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", payload);
    }
}

#[tokio::test]
async fn test_served_over_socket_is_idempotent() {
    let h = TestHarness::new(library());
    let addr = h.serve().await;
    let client = reqwest::Client::new();

    let first: Value = client
        .post(format!("http://{addr}/webhook/strm"))
        .json(&json!({"path": "/115/Movies"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["created_count"], 1);

    let second: Value = client
        .post(format!("http://{addr}/webhook/strm"))
        .json(&json!({"path": "/115/Movies"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["created_count"], 0);
    assert_eq!(second["skipped_count"], 1);
    assert_eq!(second["details"]["skipped"], first["details"]["created"]);
}
