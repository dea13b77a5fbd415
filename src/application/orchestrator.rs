use crate::context::Context;
use crate::domain::order::OrderRequest;
use crate::domain::ports::OrderProcessor;
use crate::domain::step::{ProcessReport, Step, StepResult, StepStatus};
use crate::error::StepError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Runs a fixed set of steps concurrently under one cancelable scope.
///
/// Every call to [`Orchestrator::process`] spawns one task per step. The first
/// failing step cancels the shared scope so its siblings stop at their next
/// suspension point. Results always come back in registration order, no matter
/// which task finished first.
///
/// The orchestrator holds no per-call state and can be shared by any number of
/// concurrent callers.
pub struct Orchestrator<R> {
    steps: Vec<Step<R>>,
}

impl<R> Orchestrator<R>
where
    R: Send + Sync + 'static,
{
    /// Creates an orchestrator for `steps`, run in the given order.
    ///
    /// # Panics
    ///
    /// Panics if `steps` is empty or two steps share a name. Both are wiring
    /// bugs, not runtime conditions.
    pub fn new(steps: Vec<Step<R>>) -> Self {
        assert!(!steps.is_empty(), "Orchestrator::new: no steps");
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            assert!(
                seen.insert(step.name()),
                "Orchestrator::new: duplicate step name {:?}",
                step.name()
            );
        }
        Self { steps }
    }

    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(Step::name)
    }

    /// Runs every step once against `request` and waits for all of them to settle.
    ///
    /// The reported error is the first failure observed while joining, with
    /// real failures taking precedence over the cancellations they caused.
    /// Dropping the returned future aborts the step tasks still running.
    #[tracing::instrument(name = "orchestrator.process", skip_all, fields(steps = self.steps.len()))]
    pub async fn process(&self, ctx: &Context, request: R) -> ProcessReport {
        let scope = ctx.child();
        let request = Arc::new(request);
        let started = Instant::now();

        // One slot per step, indexed by registration position. Only the join
        // loop below writes them, each exactly once.
        let mut results: Vec<StepResult> = self
            .steps
            .iter()
            .map(|step| StepResult::pending(step.name()))
            .collect();

        let mut tasks = JoinSet::new();
        let mut positions = HashMap::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let run = step.runner();
            let scope = scope.clone();
            let request = Arc::clone(&request);
            let handle = tasks.spawn(async move {
                let start = Instant::now();
                let outcome = run.run(scope, request).await;
                (start.elapsed(), outcome)
            });
            positions.insert(handle.id(), index);
        }

        let mut first_failure: Option<StepError> = None;
        let mut first_cancellation: Option<StepError> = None;

        while let Some(joined) = tasks.join_next_with_id().await {
            let (index, elapsed, outcome) = match joined {
                Ok((id, (elapsed, outcome))) => (positions[&id], elapsed, outcome),
                Err(join_error) => {
                    let index = positions[&join_error.id()];
                    (index, started.elapsed(), Err(StepError::other(join_error)))
                }
            };

            let result = classify(self.steps[index].name(), elapsed, &outcome);
            debug!(
                step = %result.name,
                status = ?result.status,
                duration_ms = result.duration.as_millis() as u64,
                "Step settled"
            );
            results[index] = result;

            if let Err(err) = outcome {
                scope.cancel();
                if err.is_cancellation() {
                    if first_cancellation.is_none() {
                        first_cancellation = Some(err);
                    }
                } else if first_failure.is_none() {
                    warn!(step = self.steps[index].name(), error = %err, "Step failed, canceling siblings");
                    first_failure = Some(err);
                }
            }
        }

        ProcessReport {
            steps: results,
            error: first_failure.or(first_cancellation),
        }
    }
}

fn classify(name: &str, duration: Duration, outcome: &Result<(), StepError>) -> StepResult {
    let (status, detail) = match outcome {
        Ok(()) => (StepStatus::Ok, String::new()),
        Err(err) if err.is_cancellation() => (StepStatus::Canceled, String::new()),
        Err(err) => (
            StepStatus::Error,
            err.kind().map(str::to_string).unwrap_or_default(),
        ),
    };
    StepResult {
        name: name.to_string(),
        status,
        duration,
        detail,
    }
}

#[async_trait]
impl OrderProcessor for Orchestrator<OrderRequest> {
    async fn process(&self, ctx: &Context, request: OrderRequest) -> ProcessReport {
        Orchestrator::process(self, ctx, request).await
    }
}
