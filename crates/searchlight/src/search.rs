//! Search Queries and Results
//!
//! Builder-style query value object and typed result set for the search
//! endpoint, plus the [`Filter`] expression type shared with the document
//! listing and deletion operations.

use std::collections::HashMap;

use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::documents::DocumentRecord;
use crate::error::Result;

// =============================================================================
// Filters
// =============================================================================

/// Filter expression against filterable attributes.
///
/// Either a raw engine expression (`"id = 3 OR id = 5"`) or the array form,
/// where expressions inside an inner group are OR'd and the groups are AND'd
/// together. The referenced attributes must have been declared filterable
/// beforehand or the engine rejects the call.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Expr(String),
    Groups(Vec<Vec<String>>),
}

impl Filter {
    /// A raw filter expression.
    pub fn expr(expression: impl Into<String>) -> Self {
        Filter::Expr(expression.into())
    }

    /// OR-within-group, AND-across-groups array form.
    pub fn groups<G, E>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = E>,
        E: Into<String>,
    {
        Filter::Groups(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Renders the filter as a single expression string.
    pub fn render(&self) -> String {
        match self {
            Filter::Expr(expression) => expression.clone(),
            Filter::Groups(groups) => groups
                .iter()
                .filter(|group| !group.is_empty())
                .map(|group| format!("({})", group.join(" OR ")))
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}

// The wire format accepts a string or nested arrays; serialize whichever
// form the filter was built as.
impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Filter::Expr(expression) => serializer.serialize_str(expression),
            Filter::Groups(groups) => {
                let mut seq = serializer.serialize_seq(Some(groups.len()))?;
                for group in groups {
                    seq.serialize_element(group)?;
                }
                seq.end()
            }
        }
    }
}

// =============================================================================
// Search Query
// =============================================================================

/// Search request value object.
///
/// Build once, pass by reference into [`Client::search`]; never mutated
/// afterwards. An absent text query matches all documents subject to
/// filter and pagination.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_retrieve: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_highlight: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_crop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_matches_position: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query with search text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            q: Some(text.into()),
            ..Self::default()
        }
    }

    /// Sets the search text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.q = Some(text.into());
        self
    }

    /// Sets the filter
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets pagination
    pub fn paginate(mut self, offset: u64, limit: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    /// Restricts which fields the hits contain
    pub fn retrieve_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_retrieve = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Requests highlighted copies of the given fields in `_formatted`
    pub fn highlight_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_highlight = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Requests cropped copies of the given fields, `length` terms around the match
    pub fn crop_attributes<I, S>(mut self, attributes: I, length: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_crop = Some(attributes.into_iter().map(Into::into).collect());
        self.crop_length = Some(length);
        self
    }

    /// Sets the marker inserted at crop boundaries
    pub fn crop_marker(mut self, marker: impl Into<String>) -> Self {
        self.crop_marker = Some(marker.into());
        self
    }

    /// Requests match position metadata on every hit
    pub fn with_match_positions(mut self) -> Self {
        self.show_matches_position = Some(true);
        self
    }

    /// Requests facet counts for the given attributes
    pub fn facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets = Some(facets.into_iter().map(Into::into).collect());
        self
    }

    /// Sets sort directives, e.g. `["year:desc"]`
    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = Some(sort.into_iter().map(Into::into).collect());
        self
    }
}

// =============================================================================
// Search Results
// =============================================================================

/// Byte range of one query-term match inside a field value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchRange {
    pub start: usize,
    pub length: usize,
}

/// One search hit: the document plus optional per-hit metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit<T> {
    #[serde(flatten)]
    pub document: T,
    /// Highlighted/cropped field values, when requested.
    #[serde(rename = "_formatted", default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<DocumentRecord>,
    /// Match positions per field, when requested.
    #[serde(
        rename = "_matchesPosition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub matches_position: Option<HashMap<String, Vec<MatchRange>>>,
}

/// Result set of a search call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults<T> {
    pub hits: Vec<SearchHit<T>>,
    pub query: String,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub estimated_total_hits: Option<u64>,
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_distribution: Option<HashMap<String, HashMap<String, u64>>>,
}

impl Client {
    /// Runs a search against an index.
    pub async fn search<T: serde::de::DeserializeOwned>(
        &self,
        index_uid: &str,
        query: &SearchQuery,
    ) -> Result<SearchResults<T>> {
        self.post_json(&format!("/indexes/{index_uid}/search"), query)
            .await
            .map_err(|e| e.scoped_to_index(index_uid))
    }
}

// =============================================================================
// Tests
// =============================================================================
