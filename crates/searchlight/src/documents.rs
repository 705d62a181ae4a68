//! Document Operations
//!
//! Add/replace, partial update, fetch, list, and delete documents. All
//! operations are generic over the record type; [`DocumentRecord`] is the
//! untyped fallback for schemaless payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::search::Filter;
use crate::tasks::TaskAcknowledgement;

/// Untyped document: a mapping from field name to a tagged JSON value.
///
/// The primary key field must be present and unique within its index.
pub type DocumentRecord = serde_json::Map<String, serde_json::Value>;

/// Query for listing documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentsQuery {
    /// Filter expression; requires the attributes to be filterable.
    pub filter: Option<Filter>,
    /// Field projection applied to every returned record.
    pub fields: Option<Vec<String>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl DocumentsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Restricts returned fields
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets pagination
    pub fn paginate(mut self, offset: u64, limit: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }
}

/// One page of a document listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage<T> {
    pub results: Vec<T>,
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchDocumentsBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
}

#[derive(Serialize)]
struct DeleteByFilterBody<'a> {
    filter: &'a Filter,
}

fn primary_key_query(primary_key: Option<&str>) -> Vec<(&'static str, String)> {
    match primary_key {
        Some(pk) => vec![("primaryKey", pk.to_string())],
        None => Vec::new(),
    }
}

impl Client {
    /// Adds documents, replacing any whole record whose primary key value
    /// already exists. Creates the index implicitly if it does not exist,
    /// inferring the primary key unless `primary_key` pins it.
    pub async fn add_or_replace<T: Serialize>(
        &self,
        index_uid: &str,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskAcknowledgement> {
        let ack = self
            .post_json_with(
                &format!("/indexes/{index_uid}/documents"),
                &primary_key_query(primary_key),
                documents,
            )
            .await?;
        tracing::debug!(
            index = index_uid,
            count = documents.len(),
            "enqueued add-or-replace"
        );
        Ok(ack)
    }

    /// Adds documents, merging fields into any record whose primary key
    /// value already exists. Creates the index implicitly like
    /// [`Client::add_or_replace`].
    pub async fn add_or_update<T: Serialize>(
        &self,
        index_uid: &str,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskAcknowledgement> {
        let ack = self
            .put_json_with(
                &format!("/indexes/{index_uid}/documents"),
                &primary_key_query(primary_key),
                documents,
            )
            .await?;
        tracing::debug!(
            index = index_uid,
            count = documents.len(),
            "enqueued add-or-update"
        );
        Ok(ack)
    }

    /// Fetches one document by primary key value, optionally projected.
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        index_uid: &str,
        id: &str,
        fields: Option<&[&str]>,
    ) -> Result<T> {
        let path = format!("/indexes/{index_uid}/documents/{id}");
        let result = match fields {
            Some(fields) => {
                self.get_json_with(&path, &[("fields", fields.join(","))])
                    .await
            }
            None => self.get_json(&path).await,
        };
        result.map_err(|e| e.scoped_to_document(index_uid, id))
    }

    /// Lists documents, optionally filtered and projected.
    ///
    /// A filtered listing requires the filtered attributes to have been
    /// declared filterable beforehand; otherwise the engine rejects the call
    /// and the error surfaces as [`crate::Error::FilterNotConfigured`].
    pub async fn list_documents<T: DeserializeOwned>(
        &self,
        index_uid: &str,
        query: &DocumentsQuery,
    ) -> Result<DocumentPage<T>> {
        let result = if query.filter.is_some() {
            // Filtered listings go through the fetch subresource.
            self.post_json(
                &format!("/indexes/{index_uid}/documents/fetch"),
                &FetchDocumentsBody {
                    filter: query.filter.as_ref(),
                    fields: query.fields.as_deref(),
                    offset: query.offset,
                    limit: query.limit,
                },
            )
            .await
        } else {
            let mut params: Vec<(&str, String)> = Vec::new();
            if let Some(fields) = &query.fields {
                params.push(("fields", fields.join(",")));
            }
            if let Some(offset) = query.offset {
                params.push(("offset", offset.to_string()));
            }
            if let Some(limit) = query.limit {
                params.push(("limit", limit.to_string()));
            }
            self.get_json_with(&format!("/indexes/{index_uid}/documents"), &params)
                .await
        };
        result.map_err(|e| e.scoped_to_index(index_uid))
    }

    /// Enqueues deletion of one document by primary key value.
    pub async fn delete_document(&self, index_uid: &str, id: &str) -> Result<TaskAcknowledgement> {
        let ack = self
            .delete_json(&format!("/indexes/{index_uid}/documents/{id}"))
            .await
            .map_err(|e| e.scoped_to_document(index_uid, id))?;
        tracing::debug!(index = index_uid, id, "enqueued document deletion");
        Ok(ack)
    }

    /// Enqueues deletion of every document in the index.
    pub async fn delete_all_documents(&self, index_uid: &str) -> Result<TaskAcknowledgement> {
        let ack = self
            .delete_json(&format!("/indexes/{index_uid}/documents"))
            .await
            .map_err(|e| e.scoped_to_index(index_uid))?;
        tracing::debug!(index = index_uid, "enqueued deletion of all documents");
        Ok(ack)
    }

    /// Enqueues deletion of the documents matching a filter.
    ///
    /// Same filterable-attribute precondition as [`Client::list_documents`].
    /// Not idempotent-safe to blindly retry after a timeout; re-verify state
    /// first.
    pub async fn delete_by_filter(
        &self,
        index_uid: &str,
        filter: &Filter,
    ) -> Result<TaskAcknowledgement> {
        let ack = self
            .post_json(
                &format!("/indexes/{index_uid}/documents/delete"),
                &DeleteByFilterBody { filter },
            )
            .await
            .map_err(|e| e.scoped_to_index(index_uid))?;
        tracing::debug!(index = index_uid, filter = %filter.render(), "enqueued filtered deletion");
        Ok(ack)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documents_query_builder() {
        let query = DocumentsQuery::new()
            .filter(Filter::expr("id != 1"))
            .fields(["id", "title", "genres"])
            .paginate(0, 3);

        assert_eq!(query.filter, Some(Filter::expr("id != 1")));
        assert_eq!(
            query.fields,
            Some(vec![
                "id".to_string(),
                "title".to_string(),
                "genres".to_string()
            ])
        );
        assert_eq!(query.offset, Some(0));
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn test_fetch_body_wire_shape() {
        let filter = Filter::expr("id != 1");
        let fields = vec!["id".to_string(), "title".to_string()];
        let body = FetchDocumentsBody {
            filter: Some(&filter),
            fields: Some(&fields),
            offset: None,
            limit: Some(3),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "filter": "id != 1",
                "fields": ["id", "title"],
                "limit": 3
            })
        );
    }

    #[test]
    fn test_delete_by_filter_body_wire_shape() {
        let filter = Filter::expr("id = 3 OR id = 5");
        let body = DeleteByFilterBody { filter: &filter };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "filter": "id = 3 OR id = 5" })
        );
    }

    #[test]
    fn test_primary_key_query() {
        assert!(primary_key_query(None).is_empty());
        assert_eq!(
            primary_key_query(Some("id")),
            vec![("primaryKey", "id".to_string())]
        );
    }

    #[test]
    fn test_document_page_parsing() {
        let body = json!({
            "results": [
                { "id": "1", "title": "你好" },
                { "id": "2", "title": "我的时间" }
            ],
            "offset": 0,
            "limit": 20,
            "total": 2
        });

        let page: DocumentPage<DocumentRecord> = serde_json::from_value(body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.total, 2);
        assert_eq!(page.results[0].get("id").unwrap(), "1");
    }
}
