use std::{future::Future, time::Duration};

use tokio::time::sleep;

use crate::config::RetryPolicy;

/// Returned when every attempt of an operation failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Number of attempts made.
    pub attempts: u32,
    /// Error of the final attempt.
    pub last: E,
}

/// Runs `operation` until it succeeds or `policy.max_attempts` attempts have
/// failed, pausing `policy.delay` between two attempts.
///
/// Every failure is handed to `on_failure` together with its 1-based attempt
/// number before the pause, so a caller can log exactly one line per failed
/// attempt. Any error counts as a failure; there is no classification into
/// retryable and fatal errors and no backoff growth.
///
/// # Arguments
/// * `policy` - Attempt budget and delay
/// * `operation` - Async function that returns a Result
/// * `on_failure` - Callback invoked for each failed attempt
///
/// # Returns
/// The first successful value, or [`Exhausted`] carrying the last error.
/// A policy with `max_attempts == 0` still makes one attempt.
pub async fn retry_with_delay<T, E, F, Fut, OnFailure>(
    policy: &RetryPolicy,
    mut operation: F,
    mut on_failure: OnFailure,
) -> Result<T, Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    OnFailure: FnMut(u32, &E),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                on_failure(attempt, &err);
                if attempt >= max_attempts {
                    return Err(Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                pause(policy.delay).await;
            }
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    #[tokio::test]
    async fn returns_first_success_after_failures() {
        let calls = Cell::new(0);
        let mut failures = Vec::new();

        let result = retry_with_delay(
            &fast_policy(3),
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { if n < 3 { Err(format!("boom {n}")) } else { Ok(n) } }
            },
            |attempt, err: &String| failures.push((attempt, err.clone())),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(
            failures,
            vec![(1, "boom 1".to_string()), (2, "boom 2".to_string())]
        );
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let calls = Cell::new(0);
        let mut failures = 0;

        let result: Result<(), _> = retry_with_delay(
            &fast_policy(3),
            || {
                calls.set(calls.get() + 1);
                async { Err("down") }
            },
            |_, _| failures += 1,
        )
        .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last, "down");
        assert_eq!(calls.get(), 3);
        assert_eq!(failures, 3);
    }

    #[tokio::test]
    async fn zero_budget_still_tries_once() {
        let calls = Cell::new(0);
        let result: Result<u8, Exhausted<&str>> = retry_with_delay(
            &fast_policy(0),
            || {
                calls.set(calls.get() + 1);
                async { Ok(7) }
            },
            |_, _| {},
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }
}
