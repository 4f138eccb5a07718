// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Router-level tests: status codes and bodies of the HTTP surface.

use axum::{
    body::{to_bytes, Body},
    extract::connect_info::MockConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use listboard::{
    config::{Config, HoneypotConfig},
    error::ConfigError,
    handlers::{router, AppState, RATE_LIMITED_MESSAGE},
    models::SiteConfig,
    store::MemoryStore,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

const VALID_FORM: &str = "title=Best+Pizza+Places&body=A+sufficiently+long+write-up+about+pizza.";

fn app_from(addr: [u8; 4], state: Arc<AppState>) -> Router {
    router(state).layer(MockConnectInfo(SocketAddr::from((addr, 40000))))
}

fn state() -> Arc<AppState> {
    state_with(Config::default())
}

fn state_with(config: Config) -> Arc<AppState> {
    let store = Arc::new(MemoryStore::new(SiteConfig::from(&config.site)));
    Arc::new(AppState::new(config, store).unwrap())
}

fn post(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app_from([127, 0, 0, 1], state());
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_accepted_list_redirects_and_is_listed() {
    let app = app_from([127, 0, 0, 1], state());

    let response = app.clone().oneshot(post("/add", VALID_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let index = json(app.oneshot(get("/")).await.unwrap()).await;
    let lists = index["lists"].as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["title"], "Best Pizza Places");
    assert_eq!(lists[0]["url"], "/list/1/best-pizza-places.html");
    assert!(lists[0]["rendered"]
        .as_str()
        .unwrap()
        .starts_with("<p>A sufficiently long write-up about pizza.</p>"));
}

#[tokio::test]
async fn test_invalid_form_is_echoed_with_errors() {
    let app = app_from([127, 0, 0, 1], state());

    let response = app
        .oneshot(post("/add", "title=Hi&body=short&password=secret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json(response).await;
    assert_eq!(
        body["errors"],
        serde_json::json!([
            "Title must be at least 3 characters long",
            "Please, write something"
        ])
    );
    assert_eq!(body["form"]["title"], "Hi");
    assert_eq!(body["form"]["body"], "short");
    assert!(body["form"].get("passphrase").is_none());
}

#[tokio::test]
async fn test_honeypot_looks_like_success() {
    let state = state();
    let app = app_from([127, 0, 0, 1], state.clone());

    let response = app
        .clone()
        .oneshot(post("/add", "name=spam&title=x&body=y"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Nothing stored and the guard window is still free.
    let index = json(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert!(index["lists"].as_array().unwrap().is_empty());
    let response = app.oneshot(post("/add", VALID_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_honeypot_field_is_configurable() {
    let config = Config {
        honeypot: HoneypotConfig {
            field: "website".to_string(),
        },
        ..Config::default()
    };
    let state = state_with(config);

    let response = app_from([10, 2, 2, 1], state.clone())
        .oneshot(post("/add", &format!("website=x&{VALID_FORM}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let index = json(app_from([10, 2, 2, 1], state.clone()).oneshot(get("/")).await.unwrap()).await;
    assert!(index["lists"].as_array().unwrap().is_empty());

    // The default field name is an ordinary form field now.
    let response = app_from([10, 2, 2, 2], state.clone())
        .oneshot(post("/add", &format!("name=x&{VALID_FORM}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let index = json(app_from([10, 2, 2, 2], state).oneshot(get("/")).await.unwrap()).await;
    assert_eq!(index["lists"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_submission_is_rate_limited() {
    let state = state();
    let app = app_from([10, 1, 1, 1], state.clone());

    let first = app.clone().oneshot(post("/add", VALID_FORM)).await.unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = app.oneshot(post("/add", VALID_FORM)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key(header::RETRY_AFTER));

    let body = json(second).await;
    assert_eq!(body["errors"][0], RATE_LIMITED_MESSAGE);
    assert_eq!(body["form"]["title"], "Best Pizza Places");

    // A different client is unaffected.
    let other = app_from([10, 1, 1, 2], state)
        .oneshot(post("/add", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_item_and_vote_routes() {
    let state = state();

    let response = app_from([10, 0, 0, 1], state.clone())
        .oneshot(post("/add", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app_from([10, 0, 0, 2], state.clone())
        .oneshot(post(
            "/list/1/best-pizza-places.html",
            "title=Luigi%27s&body=Wood+fired%2C+thin+crust.",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app_from([10, 0, 0, 3], state.clone())
        .oneshot(post(
            "/list/1/2/vote",
            "title=Agreed&body=Best+crust+in+town.&vote=y",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let app = app_from([10, 0, 0, 4], state);
    let list = json(app.clone().oneshot(get("/list/1")).await.unwrap()).await;
    assert_eq!(list["items"][0]["title"], "Luigi's");
    assert_eq!(list["items"][0]["votes"], 1);

    let item = json(app.oneshot(get("/list/1/2/vote")).await.unwrap()).await;
    assert_eq!(item["item"]["title"], "Luigi's");
    assert_eq!(item["votes"][0]["vote"], 1);
}

#[tokio::test]
async fn test_unknown_list_is_not_found() {
    let app = app_from([127, 0, 0, 1], state());

    let response = app.clone().oneshot(get("/list/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(post("/list/99", VALID_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = app_from([127, 0, 0, 1], state());

    app.clone().oneshot(post("/add", VALID_FORM)).await.unwrap();

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("listboard_submissions_total{outcome=\"accepted\"} 1"));
}

#[test]
fn test_unroutable_metrics_path_fails_startup() {
    for path in ["metrics", "/health"] {
        let mut config = Config::default();
        config.metrics.path = path.to_string();
        let store = Arc::new(MemoryStore::new(SiteConfig::from(&config.site)));

        match AppState::new(config, store) {
            Err(err) => assert_eq!(err, ConfigError::InvalidMetricsPath(path.to_string())),
            Ok(_) => panic!("{path:?} should be rejected"),
        }
    }
}

#[tokio::test]
async fn test_metrics_path_is_ignored_when_disabled() {
    let mut config = Config::default();
    config.metrics.enabled = false;
    config.metrics.path = "/health".to_string();

    let response = app_from([127, 0, 0, 1], state_with(config))
        .oneshot(get("/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
