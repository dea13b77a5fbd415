//! Payment step: validates the amount and charges after a simulated latency.

use crate::context::Context;
use crate::domain::order::OrderRequest;
use crate::error::{Classify, StepError};
use crate::infrastructure::delay::{self, delay_for_step};
use crate::infrastructure::tracker::InFlightCounter;
use std::time::Duration;
use thiserror::Error;

pub const STEP: &str = "payment";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentError {
    #[error("payment declined")]
    Declined,
}

impl Classify for PaymentError {
    fn kind(&self) -> &'static str {
        match self {
            PaymentError::Declined => "payment_declined",
        }
    }
}

/// Runs the payment step for an order.
///
/// A zero amount is declined, as is any order asking this step to fail.
pub async fn process(
    ctx: &Context,
    req: &OrderRequest,
    tracker: &InFlightCounter,
) -> Result<(), StepError> {
    let _in_flight = tracker.enter();

    let latency = delay_for_step(req.delay_ms.as_ref(), STEP, DEFAULT_DELAY);
    delay::wait(ctx, latency).await?;

    if req.fails_at(STEP) || req.amount == 0 {
        return Err(StepError::domain(PaymentError::Declined).context(STEP));
    }
    Ok(())
}
