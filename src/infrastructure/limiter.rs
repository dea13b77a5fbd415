//! Bounded concurrency gate for scarce resource classes.

use crate::context::Context;
use crate::error::Cancelled;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub const MIN_CAPACITY: usize = 1;
pub const MAX_CAPACITY: usize = 128;

/// Caps the number of simultaneous holders of one resource class.
///
/// Created once per service and shared by every concurrent order; cloning
/// shares the underlying slots.
#[derive(Clone, Debug)]
pub struct ResourceLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held slot. Dropping it returns the slot to the limiter.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Slot {
    pub fn release(self) {}
}

impl ResourceLimiter {
    /// Creates a limiter with `capacity` clamped to `[1, 128]`.
    pub fn new(capacity: i64) -> Self {
        let capacity = capacity.clamp(MIN_CAPACITY as i64, MAX_CAPACITY as i64) as usize;
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for a free slot, or returns the cancellation cause if `ctx` finishes first.
    #[tracing::instrument(
        name = "limiter.acquire",
        level = "trace",
        skip(self, ctx),
        fields(capacity = self.capacity, available_before = self.available())
    )]
    pub async fn acquire(&self, ctx: &Context) -> Result<Slot, Cancelled> {
        if let Some(cause) = ctx.err() {
            return Err(cause);
        }
        tokio::select! {
            biased;
            cause = ctx.done() => Err(cause),
            permit = self.semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => Ok(Slot { _permit: permit }),
                // The semaphore is never closed while a limiter handle is alive.
                Err(_) => Err(Cancelled::Canceled),
            },
        }
    }
}
