//! Bounded fixed-interval status polling.
//!
//! A session starts `Pending` and moves to `Completed` on the first finished
//! status, or to `TimedOut` once `max_attempts` queries came back unfinished.
//! Each attempt waits `interval` first, then issues exactly one status query.
//! A failed query aborts the session; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::operation::Completion;
use super::{TaskHandle, TaskStatus};
use crate::provider::{StatusEndpoint, TaskApi, UpstreamError};

/// Fixed interval and attempt budget for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

/// Suspends a polling session between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// State of one polling session.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// `attempts` status queries have been issued so far, none finished.
    Pending { attempts: u32 },
    Completed(Value),
    TimedOut,
}

impl PollState {
    pub fn start(max_attempts: u32) -> Self {
        if max_attempts == 0 {
            PollState::TimedOut
        } else {
            PollState::Pending { attempts: 0 }
        }
    }

    /// Apply the status returned by one more query. Terminal states never change.
    pub fn advance(self, status: TaskStatus, max_attempts: u32) -> Self {
        match self {
            PollState::Pending { attempts } => {
                let attempts = attempts.saturating_add(1);
                match status {
                    TaskStatus::Finished { payload } => PollState::Completed(payload),
                    TaskStatus::InProgress if attempts >= max_attempts => PollState::TimedOut,
                    TaskStatus::InProgress => PollState::Pending { attempts },
                }
            }
            terminal => terminal,
        }
    }
}

/// How a polling session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Raw payload from the one query that reported completion.
    Completed(Value),
    /// Budget exhausted; the handle is kept so the caller can follow up.
    TimedOut(TaskHandle),
}

#[derive(Debug, Clone, Copy)]
pub struct Poller {
    policy: PollPolicy,
}

impl Poller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Run one polling session for `handle`.
    pub async fn run(
        &self,
        api: &dyn TaskApi,
        sleeper: &dyn Sleeper,
        endpoint: &StatusEndpoint,
        completion: &Completion,
        handle: TaskHandle,
    ) -> Result<PollOutcome, UpstreamError> {
        let mut state = PollState::start(self.policy.max_attempts);

        loop {
            let attempts = match state {
                PollState::Pending { attempts } => attempts,
                PollState::Completed(payload) => {
                    tracing::info!(task_id = %handle, "Task finished");
                    return Ok(PollOutcome::Completed(payload));
                }
                PollState::TimedOut => {
                    tracing::warn!(
                        task_id = %handle,
                        attempts = self.policy.max_attempts,
                        "Task still in progress after polling budget"
                    );
                    return Ok(PollOutcome::TimedOut(handle));
                }
            };

            sleeper.sleep(self.policy.interval).await;

            let entry = api.status(endpoint, &handle).await?;
            let status = TaskStatus::classify(entry, completion);
            tracing::debug!(
                task_id = %handle,
                attempt = attempts + 1,
                max_attempts = self.policy.max_attempts,
                finished = matches!(status, TaskStatus::Finished { .. }),
                "Polled task status"
            );

            state = state.advance(status, self.policy.max_attempts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::testing::{RecordingSleeper, ScriptedApi};
    use serde_json::json;

    const ENDPOINT: StatusEndpoint = StatusEndpoint::Post("on_page/pages");
    const CRAWL: Completion = Completion::Progress {
        field: "crawl_progress",
        sentinel: "finished",
    };

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(2),
            max_attempts,
        }
    }

    #[test]
    fn test_state_transitions() {
        let state = PollState::start(2);
        assert_eq!(state, PollState::Pending { attempts: 0 });

        let state = state.advance(TaskStatus::InProgress, 2);
        assert_eq!(state, PollState::Pending { attempts: 1 });

        let state = state.advance(TaskStatus::InProgress, 2);
        assert_eq!(state, PollState::TimedOut);

        // Terminal states absorb further statuses.
        let state = state.advance(
            TaskStatus::Finished {
                payload: json!({}),
            },
            2,
        );
        assert_eq!(state, PollState::TimedOut);

        let done = PollState::start(3).advance(
            TaskStatus::Finished {
                payload: json!({"items": []}),
            },
            3,
        );
        assert_eq!(done, PollState::Completed(json!({"items": []})));
        assert_eq!(
            done.clone().advance(TaskStatus::InProgress, 3),
            done
        );
    }

    #[tokio::test]
    async fn test_times_out_after_exactly_max_attempts() {
        for n in 1..=5 {
            let api = ScriptedApi::new();
            for _ in 0..(n + 3) {
                api.push_status(Ok(Some(json!({"crawl_progress": "in_progress"}))));
            }
            let sleeper = RecordingSleeper::default();

            let outcome = Poller::new(policy(n))
                .run(&api, &sleeper, &ENDPOINT, &CRAWL, TaskHandle::new("abc123"))
                .await
                .unwrap();

            assert_eq!(outcome, PollOutcome::TimedOut(TaskHandle::new("abc123")));
            assert_eq!(api.status_calls().len(), n as usize);
            assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2); n as usize]);
        }
    }

    #[tokio::test]
    async fn test_stops_on_first_finished() {
        let api = ScriptedApi::new();
        api.push_status(Ok(None));
        api.push_status(Ok(Some(json!({"crawl_progress": "in_progress"}))));
        api.push_status(Ok(Some(json!({"crawl_progress": "finished", "items": [1]}))));
        api.push_status(Ok(Some(json!({"crawl_progress": "finished", "items": [2]}))));
        let sleeper = RecordingSleeper::default();

        let outcome = Poller::new(policy(5))
            .run(&api, &sleeper, &ENDPOINT, &CRAWL, TaskHandle::new("abc123"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Completed(json!({"crawl_progress": "finished", "items": [1]}))
        );
        assert_eq!(api.status_calls().len(), 3);
        assert_eq!(sleeper.sleeps().len(), 3);
    }

    #[tokio::test]
    async fn test_queries_use_the_given_handle() {
        let api = ScriptedApi::new();
        let sleeper = RecordingSleeper::default();

        Poller::new(policy(3))
            .run(&api, &sleeper, &ENDPOINT, &CRAWL, TaskHandle::new("abc123"))
            .await
            .unwrap();

        let calls = api.status_calls();
        assert_eq!(calls.len(), 3);
        assert!(calls
            .iter()
            .all(|(path, handle)| path == "on_page/pages" && handle.as_str() == "abc123"));
    }

    #[tokio::test]
    async fn test_query_failure_aborts_session() {
        let api = ScriptedApi::new();
        api.push_status(Ok(None));
        api.push_status(Err(UpstreamError::Network("Connection failed".to_string())));
        api.push_status(Ok(Some(json!({"crawl_progress": "finished"}))));
        let sleeper = RecordingSleeper::default();

        let err = Poller::new(policy(5))
            .run(&api, &sleeper, &ENDPOINT, &CRAWL, TaskHandle::new("abc123"))
            .await
            .unwrap_err();

        assert_eq!(err, UpstreamError::Network("Connection failed".to_string()));
        assert_eq!(api.status_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_budget_issues_no_queries() {
        let api = ScriptedApi::new();
        let sleeper = RecordingSleeper::default();

        let outcome = Poller::new(policy(0))
            .run(&api, &sleeper, &ENDPOINT, &CRAWL, TaskHandle::new("abc123"))
            .await
            .unwrap();

        assert!(matches!(outcome, PollOutcome::TimedOut(_)));
        assert!(api.status_calls().is_empty());
        assert!(sleeper.sleeps().is_empty());
    }
}
