//! Client side of the upstream task API.
//!
//! The workflow only needs two calls, so the provider is hidden behind the
//! [`TaskApi`] trait: submit a batch of tasks, and ask for the status of one
//! task. [`DataForSeoClient`] is the real implementation.

mod dataforseo;
pub mod envelope;
mod error;

pub use dataforseo::DataForSeoClient;
pub use error::{UpstreamError, GENERIC_UPSTREAM_MESSAGE};

use async_trait::async_trait;
use serde_json::Value;

use crate::task::TaskHandle;

/// Where and how to ask for a task's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEndpoint {
    /// `POST [{"id": handle}]` to this path.
    Post(&'static str),
    /// `GET` this path with `{id}` replaced by the handle.
    Get(&'static str),
}

impl StatusEndpoint {
    /// Path relative to the provider base URL for the given handle.
    pub fn path_for(&self, handle: &TaskHandle) -> String {
        match self {
            StatusEndpoint::Post(path) => (*path).to_string(),
            StatusEndpoint::Get(template) => template.replace("{id}", handle.as_str()),
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    /// One handle per created task, in submission order.
    pub handles: Vec<TaskHandle>,
    /// Raw response body, relayed as-is by operations that do not poll.
    pub body: Value,
}

/// The two upstream calls the task workflow makes.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Submit a batch of task objects to `path`.
    async fn submit(&self, path: &str, batch: &[Value]) -> Result<Submission, UpstreamError>;

    /// Query the status of `handle`. Returns the first result entry, or `None`
    /// if the provider has no result for the task yet.
    async fn status(
        &self,
        endpoint: &StatusEndpoint,
        handle: &TaskHandle,
    ) -> Result<Option<Value>, UpstreamError>;
}
