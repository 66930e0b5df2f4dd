//! Submit → poll → extract for one incoming request.

use std::sync::Arc;

use serde_json::Value;

use super::extract::ExtractedResult;
use super::poller::{PollOutcome, Poller, Sleeper};
use super::request::TaskRequest;
use super::submitter::submit;
use super::TaskHandle;
use crate::provider::{TaskApi, UpstreamError};

/// Result of running one request through the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Operation does not poll; carries the raw submission response.
    Submitted(Value),
    /// Task finished within the polling budget.
    Completed(ExtractedResult),
    /// Polling budget exhausted; the task may still finish upstream.
    InProgress(TaskHandle),
}

/// Runs task requests against a [`TaskApi`]. Cheap to clone.
#[derive(Clone)]
pub struct TaskRunner {
    api: Arc<dyn TaskApi>,
    sleeper: Arc<dyn Sleeper>,
}

impl TaskRunner {
    pub fn new(api: Arc<dyn TaskApi>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { api, sleeper }
    }

    pub async fn run(&self, request: &TaskRequest) -> Result<RunOutcome, UpstreamError> {
        let operation = request.operation();
        let (handle, submission) = submit(self.api.as_ref(), request).await?;

        let Some(tracking) = operation.tracking else {
            return Ok(RunOutcome::Submitted(submission.body));
        };

        // Tracked operations submit a single task, so the first handle is the one to poll.
        let outcome = Poller::new(tracking.policy)
            .run(
                self.api.as_ref(),
                self.sleeper.as_ref(),
                &tracking.status,
                &tracking.completion,
                handle,
            )
            .await
            .map_err(|e| {
                tracing::error!(feature = operation.label, "Task status query failed: {}", e);
                e
            })?;

        Ok(match outcome {
            PollOutcome::Completed(payload) => RunOutcome::Completed((tracking.extract)(&payload)),
            PollOutcome::TimedOut(handle) => RunOutcome::InProgress(handle),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::testing::{RecordingSleeper, ScriptedApi};
    use serde_json::json;
    use std::time::Duration;

    fn runner(api: &Arc<ScriptedApi>, sleeper: &Arc<RecordingSleeper>) -> TaskRunner {
        TaskRunner::new(api.clone(), sleeper.clone())
    }

    #[tokio::test]
    async fn test_page_analysis_flow() {
        let api = Arc::new(ScriptedApi::new());
        api.push_status(Ok(Some(json!({"crawl_progress": "pending"}))));
        api.push_status(Ok(Some(json!({
            "crawl_progress": "finished",
            "items": [{
                "url": "https://example.com",
                "meta": {"title": "Example", "description": "", "htags": {"h1": ["Hi"]}}
            }]
        }))));
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = runner(&api, &sleeper)
            .run(&TaskRequest::OnPageCrawl {
                target: "example.com".to_string(),
            })
            .await
            .unwrap();

        let RunOutcome::Completed(result) = outcome else {
            panic!("expected completion, got {:?}", outcome);
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"pages": [{
                "url": "https://example.com",
                "title": "Example",
                "description": "",
                "htags": {"h1": ["Hi"]}
            }]})
        );
        assert_eq!(api.submits()[0].0, "on_page/task_post");
        assert_eq!(api.status_calls().len(), 2);
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(5); 2]);
    }

    #[tokio::test]
    async fn test_timeout_reports_handle() {
        let api = Arc::new(ScriptedApi::new());
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = runner(&api, &sleeper)
            .run(&TaskRequest::PageAudit {
                target: "example.com".to_string(),
                start_url: "https://example.com/".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::InProgress(TaskHandle::new("abc123")));
        assert_eq!(api.status_calls().len(), 5);
    }

    #[tokio::test]
    async fn test_finished_without_items_is_no_data() {
        let api = Arc::new(ScriptedApi::new());
        api.push_status(Ok(Some(json!({"crawl_progress": "finished", "items": []}))));
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = runner(&api, &sleeper)
            .run(&TaskRequest::OnPageCrawl {
                target: "example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Completed(ExtractedResult::no_data()));
    }

    #[tokio::test]
    async fn test_untracked_operation_relays_submission() {
        let api = Arc::new(ScriptedApi::new());
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = runner(&api, &sleeper)
            .run(&TaskRequest::KeywordVolume {
                keywords: vec!["seo tools".to_string()],
                location_code: 2840,
                language_name: "English".to_string(),
            })
            .await
            .unwrap();

        let RunOutcome::Submitted(body) = outcome else {
            panic!("expected relayed submission");
        };
        assert_eq!(body["tasks"][0]["id"], "abc123");
        assert!(api.status_calls().is_empty());
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_competitor_serp_uses_task_getter() {
        let api = Arc::new(ScriptedApi::new());
        api.push_status(Ok(None));
        api.push_status(Ok(Some(json!({
            "keyword": "seo tools",
            "items": [{"type": "organic", "rank_absolute": 1, "domain": "example.com"}]
        }))));
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = runner(&api, &sleeper)
            .run(&TaskRequest::CompetitorSerp {
                keyword: "seo tools".to_string(),
                location_name: "United States".to_string(),
                language_name: "English".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Completed(ExtractedResult::Rows { ref rows }) if rows.len() == 1
        ));
        assert_eq!(
            api.status_calls()[0].0,
            "serp/google/organic/task_get/advanced/abc123"
        );
    }

    #[tokio::test]
    async fn test_submit_failure_skips_polling() {
        let api = Arc::new(ScriptedApi::new());
        api.set_submission(Err(UpstreamError::Status {
            status: 400,
            message: Some("Invalid field".to_string()),
        }));
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = runner(&api, &sleeper)
            .run(&TaskRequest::OnPageCrawl {
                target: "example.com".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid field");
        assert!(api.status_calls().is_empty());
    }

    #[tokio::test]
    async fn test_submission_without_handles_never_polls() {
        let api = Arc::new(ScriptedApi::new());
        api.set_submission(Ok(crate::provider::Submission {
            handles: Vec::new(),
            body: json!({"status_code": 20000, "tasks": []}),
        }));
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = runner(&api, &sleeper)
            .run(&TaskRequest::OnPageCrawl {
                target: "example.com".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::UnexpectedResponse(_)));
        assert!(api.status_calls().is_empty());
        assert!(sleeper.sleeps().is_empty());
    }
}
