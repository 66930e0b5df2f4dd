//! In-memory doubles for the task workflow.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::poller::Sleeper;
use super::TaskHandle;
use crate::provider::{StatusEndpoint, Submission, TaskApi, UpstreamError};

/// `TaskApi` that records every call and replays scripted responses.
///
/// Submissions default to a single `abc123` handle. Status queries pop the
/// scripted queue and answer "not ready" once it is empty.
#[derive(Default)]
pub struct ScriptedApi {
    submission: Mutex<Option<Result<Submission, UpstreamError>>>,
    statuses: Mutex<VecDeque<Result<Option<Value>, UpstreamError>>>,
    submits: Mutex<Vec<(String, Vec<Value>)>>,
    status_calls: Mutex<Vec<(String, TaskHandle)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_submission(&self, result: Result<Submission, UpstreamError>) {
        *self.submission.lock().unwrap() = Some(result);
    }

    pub fn push_status(&self, result: Result<Option<Value>, UpstreamError>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn submits(&self) -> Vec<(String, Vec<Value>)> {
        self.submits.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<(String, TaskHandle)> {
        self.status_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskApi for ScriptedApi {
    async fn submit(&self, path: &str, batch: &[Value]) -> Result<Submission, UpstreamError> {
        self.submits
            .lock()
            .unwrap()
            .push((path.to_string(), batch.to_vec()));

        match self.submission.lock().unwrap().clone() {
            Some(result) => result,
            None => Ok(Submission {
                handles: vec![TaskHandle::new("abc123")],
                body: json!({
                    "status_code": 20000,
                    "tasks": [{"id": "abc123", "status_code": 20100, "status_message": "Task Created."}]
                }),
            }),
        }
    }

    async fn status(
        &self,
        endpoint: &StatusEndpoint,
        handle: &TaskHandle,
    ) -> Result<Option<Value>, UpstreamError> {
        self.status_calls
            .lock()
            .unwrap()
            .push((endpoint.path_for(handle), handle.clone()));

        self.statuses.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Sleeper that returns immediately and remembers the requested durations.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
