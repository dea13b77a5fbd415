//! Courier assignment step. Holds a courier slot from the shared limiter for
//! the whole assignment.

use crate::context::Context;
use crate::domain::order::OrderRequest;
use crate::error::{Classify, StepError};
use crate::infrastructure::delay::{self, delay_for_step};
use crate::infrastructure::limiter::ResourceLimiter;
use crate::infrastructure::tracker::InFlightCounter;
use std::time::Duration;
use thiserror::Error;

pub const STEP: &str = "courier";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierError {
    #[error("no courier available")]
    NoCourierAvailable,
}

impl Classify for CourierError {
    fn kind(&self) -> &'static str {
        "no_courier"
    }
}

pub async fn assign(
    ctx: &Context,
    req: &OrderRequest,
    couriers: &ResourceLimiter,
    tracker: &InFlightCounter,
) -> Result<(), StepError> {
    let _in_flight = tracker.enter();

    let latency = delay_for_step(req.delay_ms.as_ref(), STEP, DEFAULT_DELAY);
    let _slot = couriers.acquire(ctx).await?;
    delay::wait(ctx, latency).await?;

    if req.fails_at(STEP) {
        return Err(
            StepError::domain(CourierError::NoCourierAvailable).context("courier assign"),
        );
    }
    Ok(())
}
