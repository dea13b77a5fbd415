//! Maps orchestration failures onto wire classifications and HTTP status codes.

use crate::error::{Cancelled, StepError};
use axum::http::StatusCode;

pub const KIND_TIMEOUT: &str = "timeout";
pub const KIND_CANCELED: &str = "canceled";
pub const KIND_INTERNAL: &str = "internal";
pub const KIND_BAD_REQUEST: &str = "bad_request";

/// Wire classification for a failed order.
///
/// A domain tag anywhere in the chain wins over the cancellation it caused.
pub fn error_kind(err: &StepError) -> &'static str {
    if let Some(kind) = err.kind() {
        return kind;
    }
    match err.cancellation() {
        Some(Cancelled::DeadlineExceeded) => KIND_TIMEOUT,
        Some(Cancelled::Canceled) => KIND_CANCELED,
        None => KIND_INTERNAL,
    }
}

pub fn http_status(err: Option<&StepError>) -> StatusCode {
    match err {
        None => StatusCode::OK,
        Some(err) => status_for_kind(error_kind(err)),
    }
}

pub fn status_for_kind(kind: &str) -> StatusCode {
    match kind {
        "payment_declined" | KIND_BAD_REQUEST => StatusCode::BAD_REQUEST,
        "vendor_unavailable" | "no_courier" => StatusCode::SERVICE_UNAVAILABLE,
        KIND_TIMEOUT => StatusCode::GATEWAY_TIMEOUT,
        KIND_CANCELED => StatusCode::REQUEST_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
