//! Shared helpers for the mock-server test suites.
#![allow(dead_code)]

use std::time::Duration;

use searchlight::{Client, ClientConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "masterKey";

/// Builds a client pointed at the mock server, with fast polling so the
/// task-wait tests stay quick.
pub fn client_for(server: &MockServer) -> Client {
    Client::new(
        ClientConfig::new(server.uri())
            .with_api_key(API_KEY)
            .with_poll_interval(Duration::from_millis(10))
            .with_poll_timeout(Duration::from_millis(500)),
    )
    .expect("mock server uri should be a valid host")
}

/// Task acknowledgement body as the engine returns it.
pub fn ack(task_uid: u64, index_uid: &str, kind: &str) -> Value {
    json!({
        "taskUid": task_uid,
        "indexUid": index_uid,
        "status": "enqueued",
        "type": kind,
        "enqueuedAt": "2024-08-04T12:28:15.237Z"
    })
}

/// Remote error envelope body.
pub fn error_body(code: &str, message: &str) -> Value {
    json!({
        "message": message,
        "code": code,
        "type": "invalid_request",
        "link": ""
    })
}

/// Full task record body for the task-status endpoint.
pub fn task(uid: u64, index_uid: &str, status: &str, error: Option<Value>) -> Value {
    json!({
        "uid": uid,
        "indexUid": index_uid,
        "status": status,
        "type": "documentAdditionOrUpdate",
        "error": error,
        "enqueuedAt": "2024-08-04T12:28:15.237Z",
        "startedAt": "2024-08-04T12:28:15.240Z",
        "finishedAt": "2024-08-04T12:28:15.241Z"
    })
}

/// The six movie records the document and search suites index.
pub fn movies() -> Vec<Value> {
    vec![
        json!({ "id": "1", "title": "你好", "genres": ["Romance", "Drama"] }),
        json!({ "id": "2", "title": "我的时间", "genres": ["Action", "Adventure"] }),
        json!({ "id": "3", "title": "Life of Pi", "genres": ["Adventure", "Drama"] }),
        json!({ "id": "4", "title": "Mad Max: Fury Road", "genres": ["Adventure", "Science Fiction"] }),
        json!({ "id": "5", "title": "Moana", "genres": ["Fantasy", "Action"] }),
        json!({ "id": "6", "title": "Philadelphia", "genres": ["Drama"] }),
    ]
}
