use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use marcel::failure::{Failure, FailureKind};
use marcel::request::{run_with_retry, AttemptEvent, AttemptStatus, RetryPolicy};

fn policy(max_attempts: u32, base_delay_ms: u64) -> RetryPolicy {
  RetryPolicy {
    max_attempts,
    base_delay: Duration::from_millis(base_delay_ms),
    timeout: Duration::from_secs(30),
  }
}

fn retryable() -> Failure {
  Failure::ServerRetryable { status: 500, kind: FailureKind::ServerError }
}

#[tokio::test]
async fn first_success_needs_no_retry() {
  let attempts = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&attempts);

  let result = run_with_retry(
    &policy(3, 10),
    move |_| {
      let counter = Arc::clone(&counter);
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Failure>(42)
      }
    },
    None,
  )
  .await;

  assert_eq!(result.unwrap(), 42);
  assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retryable_failures_earn_more_attempts() {
  let attempts = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&attempts);

  let result = run_with_retry(
    &policy(3, 10),
    move |attempt| {
      let counter = Arc::clone(&counter);
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        if attempt < 2 {
          Err(retryable())
        } else {
          Ok("done")
        }
      }
    },
    None,
  )
  .await;

  assert_eq!(result.unwrap(), "done");
  assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn terminal_failures_stop_immediately() {
  let attempts = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&attempts);

  let result: Result<(), _> = run_with_retry(
    &policy(3, 10),
    move |_| {
      let counter = Arc::clone(&counter);
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(Failure::Unauthorized)
      }
    },
    None,
  )
  .await;

  assert!(matches!(result, Err(Failure::Unauthorized)));
  assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn exhaustion_surfaces_the_last_failure() {
  let result: Result<(), _> = run_with_retry(
    &policy(3, 10),
    |attempt| async move {
      Err(Failure::ServerRetryable { status: 500 + attempt as u16, kind: FailureKind::ServerError })
    },
    None,
  )
  .await;

  assert!(matches!(result, Err(Failure::ServerRetryable { status: 502, .. })));
}

#[tokio::test(start_paused = true)]
async fn delays_between_attempts_double() {
  let start = tokio::time::Instant::now();
  let mut attempt_times = Vec::new();

  let result: Result<(), _> = run_with_retry(
    &policy(3, 100),
    |_| {
      attempt_times.push(start.elapsed());
      async { Err(retryable()) }
    },
    None,
  )
  .await;

  assert!(result.is_err());
  assert_eq!(attempt_times.len(), 3);
  assert_eq!(attempt_times[0], Duration::ZERO);
  assert_eq!(attempt_times[1], Duration::from_millis(100));
  assert_eq!(attempt_times[2], Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn observer_sees_every_attempt_and_the_final_success() {
  let mut events: Vec<AttemptEvent> = Vec::new();
  let mut observer = |event: AttemptEvent| events.push(event);

  let result = run_with_retry(
    &policy(3, 10),
    |attempt| async move { if attempt == 0 { Err(retryable()) } else { Ok(()) } },
    Some(&mut observer),
  )
  .await;

  assert!(result.is_ok());
  let summary: Vec<_> = events.iter().map(|e| (e.status, e.attempt, e.total_attempts)).collect();
  assert_eq!(
    summary,
    vec![
      (AttemptStatus::Attempting, 1, 3),
      (AttemptStatus::Attempting, 2, 3),
      (AttemptStatus::Success, 2, 3),
    ]
  );
}

#[tokio::test]
async fn single_attempt_policy_never_retries() {
  let attempts = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&attempts);

  let result: Result<(), _> = run_with_retry(
    &RetryPolicy::single_attempt(Duration::from_secs(5)),
    move |_| {
      let counter = Arc::clone(&counter);
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(retryable())
      }
    },
    None,
  )
  .await;

  assert!(result.is_err());
  assert_eq!(attempts.load(Ordering::SeqCst), 1);
}
