use crate::context::Context;
use crate::error::StepError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Executable body of a step.
///
/// Implementations must observe `ctx` at every blocking point so that a
/// sibling failure or an elapsed deadline stops them promptly.
#[async_trait]
pub trait StepRun<R>: Send + Sync {
    async fn run(&self, ctx: Context, request: Arc<R>) -> Result<(), StepError>;
}

#[async_trait]
impl<R, F, Fut> StepRun<R> for F
where
    R: Send + Sync + 'static,
    F: Fn(Context, Arc<R>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), StepError>> + Send + 'static,
{
    async fn run(&self, ctx: Context, request: Arc<R>) -> Result<(), StepError> {
        self(ctx, request).await
    }
}

/// A named unit of work. Immutable once built; cloning shares the body.
pub struct Step<R> {
    name: String,
    run: Arc<dyn StepRun<R>>,
}

impl<R> Step<R> {
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>, run: impl StepRun<R> + 'static) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "Step::new: empty step name");
        Self {
            name,
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn runner(&self) -> Arc<dyn StepRun<R>> {
        Arc::clone(&self.run)
    }
}

impl<R> Clone for Step<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

impl<R> fmt::Debug for Step<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Error,
    Canceled,
}

/// Recorded outcome of one step for one orchestration call.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    #[serde(
        rename = "duration_ms",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub duration: Duration,
    /// Classification tag, only ever set when `status` is `Error`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl StepResult {
    /// Placeholder for a step that has not settled yet.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Canceled,
            duration: Duration::ZERO,
            detail: String::new(),
        }
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}

/// Everything one orchestration call produced: one result per step in
/// registration order, plus the failure reported for the call.
#[derive(Debug)]
pub struct ProcessReport {
    pub steps: Vec<StepResult>,
    pub error: Option<StepError>,
}

impl ProcessReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
