use super::order::OrderRequest;
use super::step::ProcessReport;
use crate::context::Context;
use async_trait::async_trait;
use std::sync::Arc;

/// The single operation transports need from the core.
#[async_trait]
pub trait OrderProcessor: Send + Sync {
    async fn process(&self, ctx: &Context, request: OrderRequest) -> ProcessReport;
}

pub type OrderProcessorRef = Arc<dyn OrderProcessor>;
