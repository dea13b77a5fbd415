//! Application layer: the concurrent step orchestrator and the order steps it
//! runs.

pub mod orchestrator;
pub mod steps;
