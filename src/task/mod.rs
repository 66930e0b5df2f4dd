//! Task workflow: submit a task batch, poll its status, extract the result.
//!
//! - `request`: validated per-operation task input and its upstream field mapping
//! - `operation`: static descriptors (endpoints, polling policy, extractor) per feature
//! - `submitter`: one submission call, yielding task handles
//! - `poller`: bounded fixed-interval status polling state machine
//! - `extract`: pure projections of a finished task's payload
//! - `runner`: orchestration of the three steps for one request

mod extract;
mod operation;
mod poller;
pub(crate) mod request;
mod runner;
mod submitter;

#[cfg(test)]
pub(crate) mod testing;

pub use extract::{crawled_pages, serp_rows, single_page, ExtractedResult, PageSummary, SerpRow};
pub use operation::{Completion, Operation, Tracking};
pub use poller::{PollOutcome, PollPolicy, PollState, Poller, Sleeper, TokioSleeper};
pub use request::{TaskRequest, ValidationError};
pub use runner::{RunOutcome, TaskRunner};
pub use submitter::submit;

use serde_json::Value;
use std::fmt;

/// Opaque task identifier issued by the provider on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        TaskHandle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a task as reported by a single poll.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
    InProgress,
    /// Result is ready; `payload` is the raw result entry.
    Finished { payload: Value },
}

impl TaskStatus {
    /// Classify a status response entry according to the operation's completion rule.
    pub fn classify(entry: Option<Value>, completion: &Completion) -> Self {
        let Some(entry) = entry else {
            return TaskStatus::InProgress;
        };
        match completion {
            Completion::Progress { field, sentinel } => {
                if entry.get(*field).and_then(Value::as_str) == Some(*sentinel) {
                    TaskStatus::Finished { payload: entry }
                } else {
                    TaskStatus::InProgress
                }
            }
            Completion::ResultReady => TaskStatus::Finished { payload: entry },
        }
    }
}
