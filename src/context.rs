use crate::error::Cancelled;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// A cancelable scope with an optional absolute deadline.
///
/// Cloning shares the scope. [`Context::child`] derives a new scope that is
/// canceled together with its parent but can also be canceled on its own
/// without affecting the parent.
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A root scope that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derives a child whose deadline is the earlier of the parent's and `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fires the cancellation signal for this scope and every scope derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The cause if the scope is already done, `None` while it is still live.
    pub fn err(&self) -> Option<Cancelled> {
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            Some(Cancelled::DeadlineExceeded)
        } else if self.token.is_cancelled() {
            Some(Cancelled::Canceled)
        } else {
            None
        }
    }

    /// Resolves once the scope is canceled or its deadline elapses.
    pub async fn done(&self) -> Cancelled {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = tokio::time::sleep_until(deadline) => Cancelled::DeadlineExceeded,
                    _ = self.token.cancelled() => Cancelled::Canceled,
                }
            }
            None => {
                self.token.cancelled().await;
                Cancelled::Canceled
            }
        }
    }
}
