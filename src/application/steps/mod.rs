//! The three order steps and their wiring into [`Step`] values.

pub mod courier;
pub mod payment;
pub mod vendor;

use crate::context::Context;
use crate::domain::order::OrderRequest;
use crate::domain::step::Step;
use crate::infrastructure::limiter::ResourceLimiter;
use crate::infrastructure::tracker::InFlightCounter;
use std::sync::Arc;

/// Builds payment, vendor and courier in that order.
///
/// `couriers` is shared by every order, so at most its capacity of courier
/// assignments run at once across the whole process.
pub fn default_steps(
    couriers: ResourceLimiter,
    tracker: Arc<InFlightCounter>,
) -> Vec<Step<OrderRequest>> {
    let payment = {
        let tracker = Arc::clone(&tracker);
        Step::new(payment::STEP, move |ctx: Context, req: Arc<OrderRequest>| {
            let tracker = Arc::clone(&tracker);
            async move { payment::process(&ctx, &req, &tracker).await }
        })
    };

    let vendor = {
        let tracker = Arc::clone(&tracker);
        Step::new(vendor::STEP, move |ctx: Context, req: Arc<OrderRequest>| {
            let tracker = Arc::clone(&tracker);
            async move { vendor::notify(&ctx, &req, &tracker).await }
        })
    };

    let courier = Step::new(courier::STEP, move |ctx: Context, req: Arc<OrderRequest>| {
        let couriers = couriers.clone();
        let tracker = Arc::clone(&tracker);
        async move { courier::assign(&ctx, &req, &couriers, &tracker).await }
    });

    vec![payment, vendor, courier]
}
