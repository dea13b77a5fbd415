//! Vendor notification step.

use crate::context::Context;
use crate::domain::order::OrderRequest;
use crate::error::{Classify, StepError};
use crate::infrastructure::delay::{self, delay_for_step};
use crate::infrastructure::tracker::InFlightCounter;
use std::time::Duration;
use thiserror::Error;

pub const STEP: &str = "vendor";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorError {
    #[error("vendor unavailable")]
    Unavailable,
}

impl Classify for VendorError {
    fn kind(&self) -> &'static str {
        "vendor_unavailable"
    }
}

pub async fn notify(
    ctx: &Context,
    req: &OrderRequest,
    tracker: &InFlightCounter,
) -> Result<(), StepError> {
    let _in_flight = tracker.enter();

    let latency = delay_for_step(req.delay_ms.as_ref(), STEP, DEFAULT_DELAY);
    delay::wait(ctx, latency).await?;

    if req.fails_at(STEP) {
        return Err(StepError::domain(VendorError::Unavailable).context("vendor notify"));
    }
    Ok(())
}
