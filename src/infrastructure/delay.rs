use crate::context::Context;
use crate::error::Cancelled;
use std::collections::HashMap;
use std::time::Duration;

/// Sleeps for `duration` unless `ctx` finishes first.
///
/// A zero duration returns immediately, even on a canceled context. The timer
/// is dropped on both exit paths.
pub async fn wait(ctx: &Context, duration: Duration) -> Result<(), Cancelled> {
    if duration.is_zero() {
        return Ok(());
    }
    tokio::select! {
        biased;
        cause = ctx.done() => Err(cause),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Per-step latency override: a positive entry for `step` wins, anything else
/// falls back to `default`.
pub fn delay_for_step(
    delay_ms: Option<&HashMap<String, i64>>,
    step: &str,
    default: Duration,
) -> Duration {
    match delay_ms.and_then(|overrides| overrides.get(step)) {
        Some(&ms) if ms > 0 => Duration::from_millis(ms as u64),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_elapses() {
        let ctx = Context::background();
        let start = tokio::time::Instant::now();
        wait(&ctx, Duration::from_millis(30)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_zero_duration_returns_immediately() {
        let ctx = Context::background();
        ctx.cancel();
        assert!(wait(&ctx, Duration::ZERO).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_cancellation_cause() {
        let ctx = Context::background();
        let canceler = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            canceler.cancel();
        });

        let start = tokio::time::Instant::now();
        let err = wait(&ctx, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err, Cancelled::Canceled);
        assert!(start.elapsed() < Duration::from_secs(5));

        let ctx = Context::background().with_timeout(Duration::from_millis(5));
        let err = wait(&ctx, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err, Cancelled::DeadlineExceeded);
    }

    #[test]
    fn test_delay_for_step() {
        let default = Duration::from_millis(10);
        assert_eq!(delay_for_step(None, "payment", default), default);

        let overrides = HashMap::from([("payment".to_string(), 3)]);
        assert_eq!(
            delay_for_step(Some(&overrides), "payment", default),
            Duration::from_millis(3)
        );
        assert_eq!(delay_for_step(Some(&overrides), "vendor", default), default);

        let zero = HashMap::from([("payment".to_string(), 0)]);
        assert_eq!(delay_for_step(Some(&zero), "payment", default), default);

        let negative = HashMap::from([("payment".to_string(), -7)]);
        assert_eq!(delay_for_step(Some(&negative), "payment", default), default);
    }
}
