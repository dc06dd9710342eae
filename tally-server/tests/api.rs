//! HTTP API tests driven through the router with `oneshot`

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tally_server::services::http::build_router;
use tally_server::{Config, ServerState};
use tempfile::TempDir;
use tower::ServiceExt;

fn config(dir: &TempDir) -> Config {
    let mut config = Config::with_overrides(dir.path().join("counters.json"), 0);
    config.index_path = dir.path().join("missing-index.html");
    config.font_path = dir.path().join("missing.ttf");
    config.bold_font_path = dir.path().join("missing-bold.ttf");
    config.logo_path = dir.path().join("missing-logo.png");
    config.label_size = "62".to_string();
    config
}

fn app(config: &Config) -> Router {
    build_router(ServerState::initialize(config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn print_increments_counter() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let (status, body) = send(&app, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["label_type"], "Coin");
    assert_eq!(body["number"], 1);
    assert_eq!(body["template"], "default");
    assert_eq!(body["printed"], false);
    assert_eq!(body["message"], "printing disabled");
    assert!(body["barcode"].as_str().unwrap().ends_with("510001"));

    let (_, body) = send(&app, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    assert_eq!(body["number"], 2);

    let (status, counters) = send(&app, Method::GET, "/counters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counters, json!({"Coin": 2}));
}

#[tokio::test]
async fn print_without_body_uses_last_category() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let (_, body) = send(&app, Method::POST, "/print", None).await;
    assert_eq!(body["label_type"], "Coin");

    send(&app, Method::POST, "/print", Some(json!({"label_type": "Card"}))).await;
    let (status, body) = send(&app, Method::POST, "/print", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label_type"], "Card");
    assert_eq!(body["number"], 2);
}

#[tokio::test]
async fn unknown_template_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let (status, body) = send(
        &app,
        Method::POST,
        "/print",
        Some(json!({"label_type": "Coin", "template": "sparkly"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "default");
}

#[tokio::test]
async fn custom_template_on_print_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let (status, body) = send(
        &app,
        Method::POST,
        "/print",
        Some(json!({"label_type": "Coin", "template": "custom"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    let (_, counters) = send(&app, Method::GET, "/counters", None).await;
    assert_eq!(counters, json!({}));
}

#[tokio::test]
async fn coupon_print_returns_code() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let (_, body) = send(&app, Method::POST, "/print", Some(json!({"template": "coupon"}))).await;
    assert_eq!(body["template"], "coupon");
    assert_eq!(body["coupon_code"].as_str().map(str::len), Some(8));
}

#[tokio::test]
async fn failed_print_still_advances_counter() {
    let dir = TempDir::new().unwrap();

    // Nothing listens on this port once the listener is dropped
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = config(&dir);
    config.printer_enabled = true;
    config.printer_address = format!("tcp://{}", addr);
    config.print_timeout_ms = 500;
    let app = app(&config);

    let (status, body) = send(&app, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["printed"], false);
    assert!(body["message"].is_string());

    let (_, counters) = send(&app, Method::GET, "/counters", None).await;
    assert_eq!(counters["Coin"], 1);
}

#[tokio::test]
async fn print_custom_uses_marker_number() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let (status, body) = send(
        &app,
        Method::POST,
        "/print_custom",
        Some(json!({"text": "Item #42 special"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label_type"], "Custom");
    assert_eq!(body["number"], 42);
    assert_eq!(body["counter"], 1);
    assert!(body["height"].as_u64().unwrap() > 0);
    assert!(body["barcode"].as_str().unwrap().ends_with("990042"));
}

#[tokio::test]
async fn print_custom_rejects_empty_text() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let (status, body) = send(&app, Method::POST, "/print_custom", Some(json!({"text": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    let (status, _) = send(&app, Method::POST, "/print_custom", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/print_custom",
        Some(json!({"text": "#99999999999"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, counters) = send(&app, Method::GET, "/counters", None).await;
    assert_eq!(counters, json!({}));
}

#[tokio::test]
async fn clear_unknown_category_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));
    send(&app, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/clear_counters",
        Some(json!({"label_type": "Card"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");

    let (_, counters) = send(&app, Method::GET, "/counters", None).await;
    assert_eq!(counters, json!({"Coin": 1}));
}

#[tokio::test]
async fn clear_all_restarts_numbering() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));
    send(&app, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    send(&app, Method::POST, "/print", Some(json!({"label_type": "Card"}))).await;

    let (status, body) = send(&app, Method::POST, "/clear_counters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["cleared"], json!(["Card", "Coin"]));
    assert_eq!(body["counters"], json!({}));

    let (_, body) = send(&app, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    assert_eq!(body["number"], 1);
}

#[tokio::test]
async fn clear_single_category() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));
    send(&app, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    send(&app, Method::POST, "/print", Some(json!({"label_type": "Card"}))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/clear_counters",
        Some(json!({"label_type": "Coin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], json!(["Coin"]));
    assert_eq!(body["counters"], json!({"Card": 1}));
}

#[tokio::test]
async fn invalid_json_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/print")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_and_health() {
    let dir = TempDir::new().unwrap();
    let app = app(&config(&dir));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&page).contains("Tally Labels"));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["printer"]["enabled"], false);
}

#[tokio::test]
async fn counters_survive_restart() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let first = app(&config);
    send(&first, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    send(&first, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    drop(first);

    let second = app(&config);
    let (_, body) = send(&second, Method::POST, "/print", Some(json!({"label_type": "Coin"}))).await;
    assert_eq!(body["number"], 3);
}
