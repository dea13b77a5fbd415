use crate::application::orchestrator::Orchestrator;
use crate::application::steps::default_steps;
use crate::config::Config;
use crate::domain::ports::OrderProcessorRef;
use crate::infrastructure::limiter::ResourceLimiter;
use crate::infrastructure::tracker::InFlightCounter;
use crate::interfaces::http::handler::Handler;
use std::sync::Arc;
use tracing::info;

/// The wired service: one courier pool and one in-flight counter shared by
/// every order for the lifetime of the process.
#[derive(Clone)]
pub struct App {
    pub handler: Handler,
    pub couriers: ResourceLimiter,
    pub tracker: Arc<InFlightCounter>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let couriers = ResourceLimiter::new(config.couriers);
        let tracker = Arc::new(InFlightCounter::new());
        let processor: OrderProcessorRef = Arc::new(Orchestrator::new(default_steps(
            couriers.clone(),
            Arc::clone(&tracker),
        )));
        let handler = Handler::new(processor, config.request_timeout());

        info!(
            couriers = couriers.capacity(),
            request_timeout_ms = handler.request_timeout().as_millis() as u64,
            "Order pipeline ready"
        );

        Self {
            handler,
            couriers,
            tracker,
        }
    }
}
