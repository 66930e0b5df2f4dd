use super::request::TaskRequest;
use super::TaskHandle;
use crate::provider::{Submission, TaskApi, UpstreamError};

/// Submit the request's task batch with a single upstream call.
///
/// Returns the first task handle alongside the full submission. A response
/// without at least one task id is an error; so is any transport or status
/// failure. Nothing is retried.
pub async fn submit(
    api: &dyn TaskApi,
    request: &TaskRequest,
) -> Result<(TaskHandle, Submission), UpstreamError> {
    let operation = request.operation();
    let batch = request.to_batch();

    let submitted = api
        .submit(operation.submit_path, &batch)
        .await
        .and_then(|submission| match submission.handles.first() {
            Some(first) => Ok((first.clone(), submission)),
            None => Err(UpstreamError::UnexpectedResponse(
                "response has no task id".to_string(),
            )),
        })
        .map_err(|e| {
            tracing::error!(feature = operation.label, "Task submission failed: {}", e);
            e
        })?;

    tracing::info!(
        feature = operation.label,
        tasks = submitted.1.handles.len(),
        first_task_id = %submitted.0,
        "Submitted task batch"
    );
    Ok(submitted)
}
