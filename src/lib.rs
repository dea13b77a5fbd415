pub mod app;
pub mod application;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;
