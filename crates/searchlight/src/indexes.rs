//! Index Operations
//!
//! Create, fetch, list, update, and delete indexes, plus the stats endpoint
//! backing the update-primary-key precondition.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::tasks::TaskAcknowledgement;

/// Descriptor of a remote index.
///
/// The uid is immutable once created; the primary key can only change while
/// the index holds zero documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    pub uid: String,
    pub primary_key: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Index statistics (`GET /indexes/{uid}/stats`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub number_of_documents: u64,
    pub is_indexing: bool,
    #[serde(default)]
    pub field_distribution: HashMap<String, u64>,
}

/// One page of the index listing.
///
/// `total` is a snapshot, not a guarantee across repeated calls: concurrent
/// creates and deletes may shift results between pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPage {
    pub results: Vec<IndexDescriptor>,
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

/// 1-based page request for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub fn new(number: u64, size: u64) -> Self {
        Self { number, size }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1) * self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 20,
        }
    }
}

/// Outcome of [`Client::ensure_index`].
#[derive(Debug, Clone)]
pub enum EnsureIndex {
    /// The index did not exist; creation was enqueued.
    Created(TaskAcknowledgement),
    /// The index already exists with a compatible primary key.
    AlreadyExists(IndexDescriptor),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndexBody<'a> {
    uid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_key: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateIndexBody<'a> {
    primary_key: &'a str,
}

impl Client {
    /// Enqueues creation of an index.
    ///
    /// The acknowledgement only confirms enqueuing; if the uid already
    /// exists the task itself will fail. Use [`Client::ensure_index`] for
    /// the idempotent variant.
    pub async fn create_index(
        &self,
        uid: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskAcknowledgement> {
        let ack = self
            .post_json("/indexes", &CreateIndexBody { uid, primary_key })
            .await?;
        tracing::debug!(index = uid, ?primary_key, "enqueued index creation");
        Ok(ack)
    }

    /// Creates the index only if it does not exist yet.
    ///
    /// An existing index is never overwritten: with a matching (or
    /// unspecified) primary key the existing descriptor is returned, with a
    /// conflicting one the call fails with [`Error::IndexAlreadyExists`] and
    /// the original key stays untouched.
    pub async fn ensure_index(
        &self,
        uid: &str,
        primary_key: Option<&str>,
    ) -> Result<EnsureIndex> {
        match self.get_index(uid).await {
            Ok(existing) => match (existing.primary_key.as_deref(), primary_key) {
                (Some(current), Some(requested)) if current != requested => {
                    Err(Error::IndexAlreadyExists {
                        uid: uid.to_string(),
                        existing: existing.primary_key.clone(),
                    })
                }
                _ => Ok(EnsureIndex::AlreadyExists(existing)),
            },
            Err(Error::IndexNotFound(_)) => {
                Ok(EnsureIndex::Created(self.create_index(uid, primary_key).await?))
            }
            Err(other) => Err(other),
        }
    }

    /// Fetches the descriptor of an index.
    pub async fn get_index(&self, uid: &str) -> Result<IndexDescriptor> {
        self.get_json(&format!("/indexes/{uid}"))
            .await
            .map_err(|e| e.scoped_to_index(uid))
    }

    /// Lists indexes, offset-paginated.
    pub async fn list_indexes(&self, page: Page) -> Result<IndexPage> {
        self.get_json_with(
            "/indexes",
            &[
                ("offset", page.offset().to_string()),
                ("limit", page.size.to_string()),
            ],
        )
        .await
    }

    /// Changes the primary key of an empty index.
    ///
    /// The remote engine accepts the request even when documents exist but
    /// silently ignores it; whether the invariant is enforced server-side is
    /// unverified. The client therefore checks stats first and fails fast
    /// with [`Error::IndexNotEmpty`] instead of enqueuing a no-op.
    pub async fn update_index(
        &self,
        uid: &str,
        new_primary_key: &str,
    ) -> Result<TaskAcknowledgement> {
        let stats = self.index_stats(uid).await?;
        if stats.number_of_documents > 0 {
            return Err(Error::IndexNotEmpty {
                uid: uid.to_string(),
                documents: stats.number_of_documents,
            });
        }

        let ack = self
            .patch_json(
                &format!("/indexes/{uid}"),
                &UpdateIndexBody {
                    primary_key: new_primary_key,
                },
            )
            .await
            .map_err(|e| e.scoped_to_index(uid))?;
        tracing::debug!(index = uid, primary_key = new_primary_key, "enqueued primary key update");
        Ok(ack)
    }

    /// Enqueues deletion of an index, documents and all.
    pub async fn delete_index(&self, uid: &str) -> Result<TaskAcknowledgement> {
        let ack = self
            .delete_json(&format!("/indexes/{uid}"))
            .await
            .map_err(|e| e.scoped_to_index(uid))?;
        tracing::debug!(index = uid, "enqueued index deletion");
        Ok(ack)
    }

    /// Fetches document count and indexing state for an index.
    pub async fn index_stats(&self, uid: &str) -> Result<IndexStats> {
        self.get_json(&format!("/indexes/{uid}/stats"))
            .await
            .map_err(|e| e.scoped_to_index(uid))
    }
}

// =============================================================================
// Tests
// =============================================================================
