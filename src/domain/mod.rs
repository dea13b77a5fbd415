//! Domain model: order payloads, steps and their recorded outcomes, and the
//! port transports depend on.

pub mod order;
pub mod ports;
pub mod step;
