//! Searchlight Error Definitions
//!
//! Defines the error types used throughout the client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Search client not initialized (call ensure_ready first)")]
    NotInitialized,

    // =========================================================================
    // Index Errors
    // =========================================================================
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index already exists with primary key {existing:?}: {uid}")]
    IndexAlreadyExists {
        uid: String,
        existing: Option<String>,
    },

    #[error("Index {uid} holds {documents} documents; primary key can only change while empty")]
    IndexNotEmpty { uid: String, documents: u64 },

    // =========================================================================
    // Document Errors
    // =========================================================================
    #[error("Document not found in index {index_uid}: {id}")]
    DocumentNotFound { index_uid: String, id: String },

    #[error("Filter rejected by the engine (attribute not filterable?): {0}")]
    FilterNotConfigured(String),

    // =========================================================================
    // Task Errors
    // =========================================================================
    #[error("Task {task_uid} failed ({code}): {message}")]
    TaskFailed {
        task_uid: u64,
        code: String,
        message: String,
    },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote API error ({status} {code}): {message}")]
    RemoteApi {
        status: u16,
        code: String,
        message: String,
    },

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Client result type
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

/// Error envelope returned by the remote engine on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteError {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Stable error codes of the remote engine that the client branches on.
pub mod codes {
    pub const INDEX_NOT_FOUND: &str = "index_not_found";
    pub const INDEX_ALREADY_EXISTS: &str = "index_already_exists";
    pub const DOCUMENT_NOT_FOUND: &str = "document_not_found";
    pub const INVALID_SEARCH_FILTER: &str = "invalid_search_filter";
    pub const INVALID_DOCUMENT_FILTER: &str = "invalid_document_filter";
}

impl Error {
    /// Rewrites a generic remote "index not found" failure into the typed
    /// variant carrying the uid the caller addressed.
    pub(crate) fn scoped_to_index(self, uid: &str) -> Self {
        match self {
            Error::RemoteApi { ref code, .. } if code == codes::INDEX_NOT_FOUND => {
                Error::IndexNotFound(uid.to_string())
            }
            other => other,
        }
    }

    /// Rewrites a generic remote "document not found" failure into the typed
    /// variant carrying the index uid and document id.
    pub(crate) fn scoped_to_document(self, index_uid: &str, id: &str) -> Self {
        match self {
            Error::RemoteApi { ref code, .. } if code == codes::DOCUMENT_NOT_FOUND => {
                Error::DocumentNotFound {
                    index_uid: index_uid.to_string(),
                    id: id.to_string(),
                }
            }
            // A missing index surfaces on document routes too.
            Error::RemoteApi { ref code, .. } if code == codes::INDEX_NOT_FOUND => {
                Error::IndexNotFound(index_uid.to_string())
            }
            other => other,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
