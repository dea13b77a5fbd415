//! Lock-free count of step bodies currently executing.
//!
//! Used by drain checks: once every started step has returned, the counter
//! reads zero again.

use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct InFlightCounter {
    running: AtomicI64,
}

/// Decrements the counter when dropped, including on early return or task abort.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    counter: &'a InFlightCounter,
}

impl InFlightCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.running.fetch_add(1, Ordering::AcqRel);
    }

    pub fn decrement(&self) {
        self.running.fetch_sub(1, Ordering::AcqRel);
    }

    /// Snapshot of the current count.
    pub fn current(&self) -> i64 {
        self.running.load(Ordering::Acquire)
    }

    /// Increments now and decrements when the returned guard goes out of scope.
    pub fn enter(&self) -> InFlightGuard<'_> {
        self.increment();
        InFlightGuard { counter: self }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.decrement();
    }
}
