//! Shared runtime primitives that step bodies block on: the resource limiter,
//! the in-flight counter and the cancelable delay.

pub mod delay;
pub mod limiter;
pub mod tracker;
