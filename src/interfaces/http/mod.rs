//! HTTP transport built on axum.

pub mod errors;
pub mod handler;

use crate::domain::order::OrderResponse;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use handler::Handler;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

pub fn router(handler: Handler) -> Router {
    Router::new()
        .route("/order", post(create_order))
        .route("/health", get(health))
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

/// Serves `router(handler)` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, handler: Handler, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn create_order(
    State(handler): State<Handler>,
    body: Bytes,
) -> (StatusCode, Json<OrderResponse>) {
    let request = match Handler::decode(&body) {
        Ok(request) => request,
        Err((status, response)) => return (status, Json(response)),
    };
    let (status, response) = handler.handle(request).await;
    (status, Json(response))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn request_id(request: Request, next: Next) -> Response {
    let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, HeaderValue::from(id));

    info!(
        request_id = id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Request handled"
    );
    response
}
