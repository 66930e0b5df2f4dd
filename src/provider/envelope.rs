//! Parsing of the provider's response envelope.
//!
//! Every response looks like
//! `{status_code, status_message, tasks: [{id, status_code, status_message, result: [..]}]}`.
//! Codes in the 2xxxx range are success, 4xxxx/5xxxx are errors, except the two
//! "not ready yet" codes a task getter returns while the task is still queued.

use serde_json::Value;

use super::error::UpstreamError;
use crate::task::TaskHandle;

/// First error code in the provider's numbering.
const FIRST_ERROR_CODE: u64 = 40000;
/// Task handed to the worker, result not ready.
const TASK_HANDED: u64 = 40601;
/// Task still waiting in the queue.
const TASK_IN_QUEUE: u64 = 40602;

fn status_code(v: &Value) -> Option<u64> {
    v.get("status_code").and_then(Value::as_u64)
}

fn status_message(v: &Value) -> String {
    v.get("status_message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn check_top_level(body: &Value) -> Result<(), UpstreamError> {
    match status_code(body) {
        Some(code) if code >= FIRST_ERROR_CODE => Err(UpstreamError::Task {
            code,
            message: status_message(body),
        }),
        _ => Ok(()),
    }
}

fn tasks(body: &Value) -> Result<&Vec<Value>, UpstreamError> {
    body.get("tasks")
        .and_then(Value::as_array)
        .ok_or_else(|| UpstreamError::UnexpectedResponse("response has no tasks".to_string()))
}

/// Pull the task handles out of a submission response, in `tasks[]` order.
///
/// Every task entry must carry an `id`; one missing id fails the whole batch.
pub fn parse_submission(body: &Value) -> Result<Vec<TaskHandle>, UpstreamError> {
    check_top_level(body)?;

    let mut handles = Vec::new();
    for (index, task) in tasks(body)?.iter().enumerate() {
        if let Some(code) = status_code(task) {
            if code >= FIRST_ERROR_CODE {
                return Err(UpstreamError::Task {
                    code,
                    message: status_message(task),
                });
            }
        }
        let id = task.get("id").and_then(Value::as_str).ok_or_else(|| {
            UpstreamError::UnexpectedResponse(format!("task {} has no id", index))
        })?;
        handles.push(TaskHandle::new(id));
    }

    if handles.is_empty() {
        return Err(UpstreamError::UnexpectedResponse(
            "response has no task id".to_string(),
        ));
    }
    Ok(handles)
}

/// Pull the first result entry out of a status response.
///
/// `Ok(None)` means the provider has nothing for us yet.
pub fn parse_status(body: &Value) -> Result<Option<Value>, UpstreamError> {
    check_top_level(body)?;

    let task = tasks(body)?.first().ok_or_else(|| {
        UpstreamError::UnexpectedResponse("status response has an empty task list".to_string())
    })?;

    match status_code(task) {
        Some(TASK_HANDED) | Some(TASK_IN_QUEUE) => return Ok(None),
        Some(code) if code >= FIRST_ERROR_CODE => {
            return Err(UpstreamError::Task {
                code,
                message: status_message(task),
            })
        }
        _ => {}
    }

    Ok(task
        .get("result")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .filter(|entry| !entry.is_null())
        .cloned())
}
