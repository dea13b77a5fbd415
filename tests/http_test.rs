mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::quick_order;
use order_pipeline::app::App;
use order_pipeline::config::Config;
use order_pipeline::domain::order::{OrderResponse, OrderStatus};
use order_pipeline::domain::step::StepStatus;
use order_pipeline::interfaces::http::{REQUEST_ID_HEADER, router};
use serde_json::json;
use tower::ServiceExt;

fn app_with(config: Config) -> (App, Router) {
    let app = App::new(&config);
    let router = router(app.handler.clone());
    (app, router)
}

fn post_order(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/order")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, OrderResponse) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_order_success() {
    let (app, router) = app_with(Config::default());
    let body = serde_json::to_vec(&quick_order("o-1", 1)).unwrap();

    let (status, response) = send(router, post_order(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.status, OrderStatus::Ok);
    assert_eq!(response.order_id, "o-1");
    let names: Vec<_> = response.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["payment", "vendor", "courier"]);
    assert!(response.steps.iter().all(|s| s.status == StepStatus::Ok));
    assert!(response.error.is_none());
    assert_eq!(app.tracker.current(), 0);
}

#[tokio::test]
async fn test_payment_failure_cancels_other_steps() {
    let (app, router) = app_with(Config::default());
    let body = json!({
        "order_id": "o-2",
        "amount": 100,
        "fail_step": "payment",
        "delay_ms": {"payment": 1, "vendor": 5000, "courier": 5000}
    });

    let started = std::time::Instant::now();
    let (status, response) = send(router, post_order(body.to_string())).await;

    assert!(started.elapsed() < std::time::Duration::from_secs(2));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let statuses: Vec<_> = response.steps.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        [StepStatus::Error, StepStatus::Canceled, StepStatus::Canceled]
    );
    assert_eq!(response.steps[0].detail, "payment_declined");
    let error = response.error.unwrap();
    assert_eq!(error.kind, "payment_declined");
    assert_eq!(error.message, "order failed");
    assert_eq!(app.couriers.available(), app.couriers.capacity());
}

#[tokio::test]
async fn test_step_failures_map_to_statuses() {
    let cases = [
        ("vendor", StatusCode::SERVICE_UNAVAILABLE, "vendor_unavailable"),
        ("courier", StatusCode::SERVICE_UNAVAILABLE, "no_courier"),
    ];
    for (step, expected_status, expected_kind) in cases {
        let (_, router) = app_with(Config::default());
        let order = quick_order("o-3", 1).failing_at(step);
        let body = serde_json::to_vec(&order).unwrap();

        let (status, response) = send(router, post_order(body)).await;

        assert_eq!(status, expected_status, "{step}");
        assert_eq!(response.error.unwrap().kind, expected_kind);
    }
}

#[tokio::test]
async fn test_zero_amount_is_declined() {
    let (_, router) = app_with(Config::default());
    let order = quick_order("o-4", 1);
    let body = json!({"order_id": order.order_id, "delay_ms": order.delay_ms});

    let (status, response) = send(router, post_order(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.unwrap().kind, "payment_declined");
}

#[tokio::test]
async fn test_request_deadline_maps_to_gateway_timeout() {
    let (app, router) = app_with(Config {
        request_timeout_ms: 50,
        ..Config::default()
    });
    let body = serde_json::to_vec(&quick_order("o-5", 5_000)).unwrap();

    let (status, response) = send(router, post_order(body)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(response.error.unwrap().kind, "timeout");
    assert!(response.steps.iter().all(|s| s.status == StepStatus::Canceled));
    assert_eq!(app.tracker.current(), 0);
}

#[tokio::test]
async fn test_bad_requests() {
    let cases = [
        ("not json", "invalid JSON"),
        (r#"{"order_id":"a","amount":1}{"order_id":"b"}"#, "invalid JSON"),
        (r#"{"order_id":"a","unknown":true}"#, "invalid JSON"),
        (r#"{"amount":5}"#, "order_id is required"),
        (r#"{"order_id":"","amount":5}"#, "order_id is required"),
    ];
    for (body, message) in cases {
        let (_, router) = app_with(Config::default());
        let (status, response) = send(router, post_order(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.status, OrderStatus::Error);
        let error = response.error.unwrap();
        assert_eq!(error.kind, "bad_request");
        assert_eq!(error.message, message, "{body}");
    }
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let (_, router) = app_with(Config::default());
    let request = Request::builder()
        .method("GET")
        .uri("/order")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_carries_request_id() {
    let (_, router) = app_with(Config::default());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(id.parse::<u64>().is_ok());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_share_couriers() {
    let (app, router) = app_with(Config {
        couriers: 2,
        ..Config::default()
    });

    let mut requests = tokio::task::JoinSet::new();
    for i in 0..20 {
        let router = router.clone();
        let body = serde_json::to_vec(&quick_order(&format!("o-{i}"), 5)).unwrap();
        requests.spawn(async move { send(router, post_order(body)).await });
    }
    while let Some(joined) = requests.join_next().await {
        let (status, response) = joined.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, OrderStatus::Ok);
    }

    assert_eq!(app.tracker.current(), 0);
    assert_eq!(app.couriers.available(), 2);
}
