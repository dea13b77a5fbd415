#![allow(dead_code)]

use order_pipeline::context::Context;
use order_pipeline::domain::order::OrderRequest;
use order_pipeline::domain::step::Step;
use order_pipeline::error::{Classify, StepError};
use order_pipeline::infrastructure::delay;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("out of stock")]
pub struct OutOfStock;

impl Classify for OutOfStock {
    fn kind(&self) -> &'static str {
        "out_of_stock"
    }
}

/// Succeeds after `ms`, or stops early with the scope's cancellation cause.
pub fn sleeper<R: Send + Sync + 'static>(name: &str, ms: u64) -> Step<R> {
    Step::new(name, move |ctx: Context, _req: Arc<R>| async move {
        delay::wait(&ctx, Duration::from_millis(ms)).await?;
        Ok::<(), StepError>(())
    })
}

/// Fails immediately with a classified error.
pub fn out_of_stock<R: Send + Sync + 'static>(name: &str) -> Step<R> {
    Step::new(name, |_ctx: Context, _req: Arc<R>| async {
        Err::<(), _>(StepError::domain(OutOfStock).context("stock check"))
    })
}

/// An order whose steps all finish after `ms` milliseconds.
pub fn quick_order(id: &str, ms: i64) -> OrderRequest {
    OrderRequest::new(id, 100)
        .with_delay("payment", ms)
        .with_delay("vendor", ms)
        .with_delay("courier", ms)
}
