use super::step::StepResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input payload for processing an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderRequest {
    /// Missing decodes as empty; the transport rejects it after decoding.
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub amount: u64,
    /// Name of the step that should fail, for exercising failure paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_step: Option<String>,
    /// Per-step latency override in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<HashMap<String, i64>>,
}

impl OrderRequest {
    pub fn new(order_id: impl Into<String>, amount: u64) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn failing_at(mut self, step: impl Into<String>) -> Self {
        self.fail_step = Some(step.into());
        self
    }

    pub fn with_delay(mut self, step: impl Into<String>, ms: i64) -> Self {
        self.delay_ms
            .get_or_insert_with(HashMap::new)
            .insert(step.into(), ms);
        self
    }

    pub fn fails_at(&self, step: &str) -> bool {
        self.fail_step.as_deref() == Some(step)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Ok,
    Error,
}

/// Describes why an order failed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct ErrorPayload {
    /// Classification such as `payment_declined` or `timeout`.
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Output payload returned after order processing.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct OrderResponse {
    pub status: OrderStatus,
    #[serde(default)]
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl OrderResponse {
    pub fn ok(order_id: impl Into<String>, steps: Vec<StepResult>) -> Self {
        Self {
            status: OrderStatus::Ok,
            order_id: order_id.into(),
            steps,
            error: None,
        }
    }

    pub fn failed(
        order_id: impl Into<String>,
        steps: Vec<StepResult>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: OrderStatus::Error,
            order_id: order_id.into(),
            steps,
            error: Some(ErrorPayload {
                kind: kind.into(),
                message: message.into(),
            }),
        }
    }

    pub fn bad_request(order_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::failed(order_id, Vec::new(), "bad_request", message)
    }
}
