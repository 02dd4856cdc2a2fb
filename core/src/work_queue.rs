// core/src/work_queue.rs

//! A queue of independent work items, each attempted up to a bounded number
//! of times, with the outcome of every item kept in a report.
//!
//! Unlike a pipeline, one failing item does not halt the others: the queue is
//! always drained completely and the caller decides what an incomplete report
//! means.

use std::collections::VecDeque;
use std::fmt::{Debug, Display};
use std::future::Future;
use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
}

impl RetryPolicy {
  /// At least one attempt is always made.
  pub fn attempts(max_attempts: u32) -> Self {
    Self {
      max_attempts: max_attempts.max(1),
    }
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self::attempts(3)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<T> {
  Done { value: T, attempts: u32 },
  Failed { attempts: u32, last_error: String },
}

impl<T> ItemOutcome<T> {
  pub fn is_done(&self) -> bool {
    matches!(self, ItemOutcome::Done { .. })
  }
}

/// Outcomes in the order the items were queued.
#[derive(Debug, Clone)]
pub struct QueueReport<K, T> {
  pub outcomes: Vec<(K, ItemOutcome<T>)>,
}

impl<K, T> QueueReport<K, T> {
  /// True when every item finished successfully (vacuously true when empty).
  pub fn is_complete(&self) -> bool {
    self.outcomes.iter().all(|(_, outcome)| outcome.is_done())
  }

  pub fn succeeded(&self) -> impl Iterator<Item = (&K, &T)> {
    self.outcomes.iter().filter_map(|(key, outcome)| match outcome {
      ItemOutcome::Done { value, .. } => Some((key, value)),
      ItemOutcome::Failed { .. } => None,
    })
  }

  pub fn failed(&self) -> impl Iterator<Item = (&K, &str)> {
    self.outcomes.iter().filter_map(|(key, outcome)| match outcome {
      ItemOutcome::Failed { last_error, .. } => Some((key, last_error.as_str())),
      ItemOutcome::Done { .. } => None,
    })
  }

  pub fn len(&self) -> usize {
    self.outcomes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.outcomes.is_empty()
  }
}

pub struct WorkQueue<K> {
  pending: VecDeque<K>,
  policy: RetryPolicy,
}

impl<K> WorkQueue<K>
where
  K: Clone + Debug,
{
  pub fn new(items: impl IntoIterator<Item = K>, policy: RetryPolicy) -> Self {
    Self {
      pending: items.into_iter().collect(),
      policy,
    }
  }

  pub fn len(&self) -> usize {
    self.pending.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }

  /// Processes items one at a time. `work` is called again for the same item
  /// after a failure until it succeeds or the policy's attempts run out, so it
  /// must re-read whatever state it depends on.
  pub async fn drain<T, E, F, Fut>(mut self, mut work: F) -> QueueReport<K, T>
  where
    F: FnMut(K) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
  {
    let mut outcomes = Vec::with_capacity(self.pending.len());

    while let Some(item) = self.pending.pop_front() {
      let mut attempts = 0;
      let outcome = loop {
        attempts += 1;
        match work(item.clone()).await {
          Ok(value) => break ItemOutcome::Done { value, attempts },
          Err(err) if attempts < self.policy.max_attempts => {
            event!(Level::WARN, item = ?item, attempt = attempts, error = %err, "Work item failed, retrying.");
          }
          Err(err) => {
            event!(Level::ERROR, item = ?item, attempts, error = %err, "Work item failed, giving up.");
            break ItemOutcome::Failed {
              attempts,
              last_error: err.to_string(),
            };
          }
        }
      };
      outcomes.push((item, outcome));
    }

    QueueReport { outcomes }
  }
}
