//! Index Settings
//!
//! Filterable, searchable, and sortable attribute configuration. Declaring
//! an attribute filterable is the precondition for every filter-based
//! listing, deletion, and search.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::tasks::TaskAcknowledgement;

/// Partial settings update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable_attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable_attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable_attributes: Option<Vec<String>>,
}

impl IndexSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filterable attributes
    pub fn filterable<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the searchable attributes
    pub fn searchable<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the sortable attributes
    pub fn sortable<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }
}

fn to_owned_list(attributes: &[&str]) -> Vec<String> {
    attributes.iter().map(|s| s.to_string()).collect()
}

impl Client {
    /// Fetches the current settings of an index.
    pub async fn get_settings(&self, index_uid: &str) -> Result<IndexSettings> {
        self.get_json(&format!("/indexes/{index_uid}/settings"))
            .await
            .map_err(|e| e.scoped_to_index(index_uid))
    }

    /// Applies a partial settings update.
    pub async fn update_settings(
        &self,
        index_uid: &str,
        settings: &IndexSettings,
    ) -> Result<TaskAcknowledgement> {
        let ack = self
            .patch_json(&format!("/indexes/{index_uid}/settings"), settings)
            .await
            .map_err(|e| e.scoped_to_index(index_uid))?;
        tracing::debug!(index = index_uid, "enqueued settings update");
        Ok(ack)
    }

    /// Resets every setting of the index to its default.
    pub async fn reset_settings(&self, index_uid: &str) -> Result<TaskAcknowledgement> {
        self.delete_json(&format!("/indexes/{index_uid}/settings"))
            .await
            .map_err(|e| e.scoped_to_index(index_uid))
    }

    /// Declares which attributes may appear in filter expressions.
    pub async fn set_filterable_attributes(
        &self,
        index_uid: &str,
        attributes: &[&str],
    ) -> Result<TaskAcknowledgement> {
        let ack = self
            .put_json(
                &format!("/indexes/{index_uid}/settings/filterable-attributes"),
                &to_owned_list(attributes),
            )
            .await
            .map_err(|e| e.scoped_to_index(index_uid))?;
        tracing::debug!(index = index_uid, ?attributes, "enqueued filterable attributes update");
        Ok(ack)
    }

    /// Returns the attributes currently declared filterable.
    pub async fn get_filterable_attributes(&self, index_uid: &str) -> Result<Vec<String>> {
        self.get_json(&format!("/indexes/{index_uid}/settings/filterable-attributes"))
            .await
            .map_err(|e| e.scoped_to_index(index_uid))
    }

    /// Declares which attributes are searched, in ranking order.
    pub async fn set_searchable_attributes(
        &self,
        index_uid: &str,
        attributes: &[&str],
    ) -> Result<TaskAcknowledgement> {
        self.put_json(
            &format!("/indexes/{index_uid}/settings/searchable-attributes"),
            &to_owned_list(attributes),
        )
        .await
        .map_err(|e| e.scoped_to_index(index_uid))
    }

    /// Declares which attributes may appear in sort directives.
    pub async fn set_sortable_attributes(
        &self,
        index_uid: &str,
        attributes: &[&str],
    ) -> Result<TaskAcknowledgement> {
        self.put_json(
            &format!("/indexes/{index_uid}/settings/sortable-attributes"),
            &to_owned_list(attributes),
        )
        .await
        .map_err(|e| e.scoped_to_index(index_uid))
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
    fn test_settings_builder() {
        let settings = IndexSettings::new()
            .filterable(["id", "genres"])
            .searchable(["title"])
            .sortable(["id"]);

        assert_eq!(
            settings.filterable_attributes,
            Some(vec!["id".to_string(), "genres".to_string()])
        );
        assert_eq!(settings.searchable_attributes, Some(vec!["title".to_string()]));
        assert_eq!(settings.sortable_attributes, Some(vec!["id".to_string()]));
    }

    #[test]
    fn test_settings_partial_wire_shape() {
        let settings = IndexSettings::new().filterable(["id"]);
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({ "filterableAttributes": ["id"] })
        );
    }

    #[test]
    fn test_settings_parsing() {
        let body = json!({
            "filterableAttributes": ["id", "title"],
            "searchableAttributes": ["*"],
            "sortableAttributes": []
        });

        let settings: IndexSettings = serde_json::from_value(body).unwrap();
        assert_eq!(
            settings.filterable_attributes,
            Some(vec!["id".to_string(), "title".to_string()])
        );
        assert_eq!(settings.sortable_attributes, Some(Vec::new()));
    }
}
