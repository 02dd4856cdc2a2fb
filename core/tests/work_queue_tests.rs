// tests/work_queue_tests.rs
mod common;

use common::*;
use std::collections::HashMap;
use storeflow::{ItemOutcome, RetryPolicy, WorkQueue};

#[tokio::test]
async fn test_every_item_gets_an_outcome_in_queue_order() {
  setup_tracing();
  let queue = WorkQueue::new(vec!["order-a", "order-b", "order-c"], RetryPolicy::default());
  assert_eq!(queue.len(), 3);

  let report = queue
    .drain(|order| async move { Ok::<_, String>(format!("{order}:repriced")) })
    .await;

  assert!(report.is_complete());
  let keys: Vec<_> = report.outcomes.iter().map(|(k, _)| *k).collect();
  assert_eq!(keys, vec!["order-a", "order-b", "order-c"]);
  assert_eq!(
    report.outcomes[1].1,
    ItemOutcome::Done {
      value: "order-b:repriced".to_string(),
      attempts: 1
    }
  );
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
  setup_tracing();
  let mut failures_left: HashMap<u32, u32> = HashMap::from([(7, 2)]);

  let report = WorkQueue::new(vec![7u32, 8], RetryPolicy::attempts(3))
    .drain(|id| {
      let fail = match failures_left.get_mut(&id) {
        Some(left) if *left > 0 => {
          *left -= 1;
          true
        }
        _ => false,
      };
      async move {
        if fail {
          Err(format!("write conflict on {id}"))
        } else {
          Ok(id * 10)
        }
      }
    })
    .await;

  assert!(report.is_complete());
  assert_eq!(report.outcomes[0].1, ItemOutcome::Done { value: 70, attempts: 3 });
  assert_eq!(report.outcomes[1].1, ItemOutcome::Done { value: 80, attempts: 1 });
}

#[tokio::test]
async fn test_persistent_failure_is_reported_and_others_still_run() {
  setup_tracing();
  let report = WorkQueue::new(vec![1u32, 2, 3], RetryPolicy::attempts(2))
    .drain(|id| async move {
      if id == 2 {
        Err("store unavailable")
      } else {
        Ok(id)
      }
    })
    .await;

  assert!(!report.is_complete());
  assert_eq!(report.len(), 3);
  let failed: Vec<_> = report.failed().collect();
  assert_eq!(failed, vec![(&2, "store unavailable")]);
  let succeeded: Vec<_> = report.succeeded().map(|(k, _)| *k).collect();
  assert_eq!(succeeded, vec![1, 3]);
  assert_eq!(
    report.outcomes[1].1,
    ItemOutcome::Failed {
      attempts: 2,
      last_error: "store unavailable".to_string()
    }
  );
}

#[tokio::test]
async fn test_empty_queue_is_complete() {
  setup_tracing();
  let queue = WorkQueue::<u32>::new(Vec::new(), RetryPolicy::attempts(0));
  assert!(queue.is_empty());
  let report = queue.drain(|_| async { Ok::<_, String>(()) }).await;
  assert!(report.is_empty());
  assert!(report.is_complete());
}
