//! Asynchronous Task Tracking
//!
//! Every mutating call against the engine is acknowledged with an enqueued
//! task, not a completed result. This module provides the acknowledgement and
//! status types plus a polling helper that drives a task to a terminal state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, RemoteError, Result};

/// Lifecycle states of a remote task.
///
/// Non-terminal states (`Enqueued`, `Processing`) are retryable-wait states,
/// never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    /// Returns true once the task can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled
        )
    }
}

/// Acknowledgement returned by every mutating call.
///
/// Only confirms enqueuing. Callers needing completion must poll via
/// [`Client::wait_for_task`] or accept eventual consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAcknowledgement {
    pub task_uid: u64,
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: String,
    pub enqueued_at: DateTime<Utc>,
}

/// Full task record from the task-status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub uid: u64,
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub error: Option<RemoteError>,
    pub enqueued_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Client {
    /// Fetches the current state of a task.
    pub async fn get_task(&self, task_uid: u64) -> Result<TaskInfo> {
        self.get_json(&format!("/tasks/{task_uid}")).await
    }

    /// Polls a task until it reaches a terminal status.
    ///
    /// `interval` and `timeout` default to the values in [`crate::ClientConfig`].
    /// A failed task surfaces [`Error::TaskFailed`] with the remote error; a
    /// canceled task is returned as-is for the caller to inspect. When the
    /// deadline passes while the task is still enqueued or processing, the
    /// call fails with [`Error::Timeout`]; the task itself keeps running
    /// remotely.
    pub async fn wait_for_task(
        &self,
        task_uid: u64,
        interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<TaskInfo> {
        let interval = interval.unwrap_or(self.config().poll_interval);
        let timeout = timeout.unwrap_or(self.config().poll_timeout);
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let task = self.get_task(task_uid).await?;

            if task.status.is_terminal() {
                if task.status == TaskStatus::Failed {
                    let (code, message) = match task.error {
                        Some(RemoteError { code, message, .. }) => (code, message),
                        None => ("unknown".to_string(), "task failed".to_string()),
                    };
                    return Err(Error::TaskFailed {
                        task_uid,
                        code,
                        message,
                    });
                }
                tracing::debug!(task_uid, status = ?task.status, "task reached terminal status");
                return Ok(task);
            }

            if tokio::time::Instant::now() + interval > deadline {
                return Err(Error::Timeout(format!(
                    "task {task_uid} still {:?} after {timeout:?}",
                    task.status
                )));
            }
            tokio::time::sleep(interval).await;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_terminal() {
        assert!(!TaskStatus::Enqueued.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_task_status_wire_names() {
        let status: TaskStatus = serde_json::from_str("\"enqueued\"").unwrap();
        assert_eq!(status, TaskStatus::Enqueued);

        let status: TaskStatus = serde_json::from_str("\"succeeded\"").unwrap();
        assert_eq!(status, TaskStatus::Succeeded);
    }

    #[test]
    fn test_acknowledgement_parsing() {
        let body = r#"{
            "taskUid": 12,
            "indexUid": "movies",
            "status": "enqueued",
            "type": "documentAdditionOrUpdate",
            "enqueuedAt": "2024-08-04T12:28:15.237Z"
        }"#;

        let ack: TaskAcknowledgement = serde_json::from_str(body).unwrap();
        assert_eq!(ack.task_uid, 12);
        assert_eq!(ack.index_uid.as_deref(), Some("movies"));
        assert_eq!(ack.status, TaskStatus::Enqueued);
        assert_eq!(ack.kind, "documentAdditionOrUpdate");
    }

    #[test]
    fn test_task_info_parsing_with_error() {
        let body = r#"{
            "uid": 4,
            "indexUid": "movies",
            "status": "failed",
            "type": "indexDeletion",
            "error": {
                "message": "Index `movies` not found.",
                "code": "index_not_found",
                "type": "invalid_request",
                "link": ""
            },
            "enqueuedAt": "2024-08-04T12:28:15.237Z",
            "startedAt": "2024-08-04T12:28:15.240Z",
            "finishedAt": "2024-08-04T12:28:15.241Z"
        }"#;

        let task: TaskInfo = serde_json::from_str(body).unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.unwrap().code, "index_not_found");
        assert!(task.finished_at.is_some());
    }
}
