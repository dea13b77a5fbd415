use super::errors::{self, KIND_BAD_REQUEST};
use crate::context::Context;
use crate::domain::order::{OrderRequest, OrderResponse};
use crate::domain::ports::OrderProcessorRef;
use axum::http::StatusCode;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Transport-neutral order handling: validation, request-wide deadline and
/// error mapping. The axum router and the `run` command both go through it.
#[derive(Clone)]
pub struct Handler {
    processor: OrderProcessorRef,
    request_timeout: Duration,
}

impl Handler {
    /// A zero `request_timeout` falls back to [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn new(processor: OrderProcessorRef, request_timeout: Duration) -> Self {
        let request_timeout = if request_timeout.is_zero() {
            DEFAULT_REQUEST_TIMEOUT
        } else {
            request_timeout
        };
        Self {
            processor,
            request_timeout,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Decodes a request body. Exactly one JSON object is accepted; trailing
    /// data is rejected.
    pub fn decode(body: &[u8]) -> Result<OrderRequest, (StatusCode, OrderResponse)> {
        serde_json::from_slice(body).map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                OrderResponse::bad_request("", "invalid JSON"),
            )
        })
    }

    pub async fn handle(&self, request: OrderRequest) -> (StatusCode, OrderResponse) {
        if request.order_id.is_empty() {
            return (
                errors::status_for_kind(KIND_BAD_REQUEST),
                OrderResponse::bad_request("", "order_id is required"),
            );
        }

        let order_id = request.order_id.clone();
        let ctx = Context::background().with_timeout(self.request_timeout);
        let report = self.processor.process(&ctx, request).await;

        let status = errors::http_status(report.error.as_ref());
        let response = match &report.error {
            None => OrderResponse::ok(order_id, report.steps),
            Some(err) => {
                let kind = errors::error_kind(err);
                info!(order_id = %order_id, kind, error = %err, "Order failed");
                OrderResponse::failed(order_id, report.steps, kind, "order failed")
            }
        };
        (status, response)
    }
}
