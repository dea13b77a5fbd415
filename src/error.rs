use std::error::Error as StdError;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Why a [`Context`](crate::context::Context) stopped.
///
/// Steps that observe either variant return it unchanged so the orchestrator
/// can tell propagated cancellation apart from a real failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancelled {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Implemented by domain failures that carry a machine-readable classification tag.
pub trait Classify: StdError + Send + Sync + 'static {
    fn kind(&self) -> &'static str;
}

/// Outcome of a failed step run.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("{0}")]
    Cancelled(#[from] Cancelled),
    #[error("{source}")]
    Domain {
        kind: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<StepError>,
    },
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl StepError {
    /// Lifts a classified failure, capturing its tag.
    pub fn domain<E: Classify>(err: E) -> Self {
        Self::Domain {
            kind: err.kind(),
            source: Box::new(err),
        }
    }

    /// Wraps a failure that exposes no classification.
    ///
    /// A [`Classify`] error buried inside `err` is not recognised: lift it
    /// with [`StepError::domain`] (or `?`) before wrapping.
    pub fn other<E: Into<BoxError>>(err: E) -> Self {
        Self::Other(err.into())
    }

    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classification tag of the first classified failure found in the chain.
    ///
    /// Foreign wrappers are looked through as long as they report the wrapped
    /// error as their `source()`.
    pub fn kind(&self) -> Option<&'static str> {
        chain(self).find_map(|err| match err.downcast_ref::<StepError>() {
            Some(StepError::Domain { kind, .. }) => Some(*kind),
            _ => None,
        })
    }

    /// The propagated cancellation cause, if this failure is one.
    pub fn cancellation(&self) -> Option<Cancelled> {
        chain(self).find_map(|err| err.downcast_ref::<Cancelled>().copied())
    }

    pub fn is_cancellation(&self) -> bool {
        self.cancellation().is_some()
    }

    /// First link of the chain with concrete type `E`.
    pub fn find<E: StdError + 'static>(&self) -> Option<&E> {
        chain(self).find_map(|err| err.downcast_ref::<E>())
    }
}

/// Lets `?` lift classified failures without losing their tag.
impl<E: Classify> From<E> for StepError {
    fn from(err: E) -> Self {
        Self::domain(err)
    }
}

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(unbox(err)), |&err| err.source().map(unbox))
}

// `Context` stores its source as `Box<StepError>`; look through the box.
fn unbox<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match err.downcast_ref::<Box<StepError>>() {
        Some(inner) => inner.as_ref(),
        None => err,
    }
}

/// Process-level failures surfaced by the binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to bind {addr}: {source}")]
    BindError {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;
