//! HTTP Connection Manager
//!
//! Owns the configured endpoint and API key and exposes the JSON transport
//! used by every operation. The client injects the bearer auth header on
//! each request and reuses pooled connections; it holds no other state and
//! is safe to clone and share across tasks.
//!
//! No retry logic lives at this layer. A timed-out call surfaces
//! [`Error::Timeout`] and the caller must assume the remote side effect may
//! or may not have been applied.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{codes, Error, RemoteError, Result};

/// Handle to a remote search engine.
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl Client {
    /// Builds a client from the given configuration.
    ///
    /// Fails with [`Error::Configuration`] when the host URL is empty or
    /// malformed. No network traffic happens here; use [`Client::health`]
    /// for a connectivity check.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let host_url = config.normalized_host()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        let config = ClientConfig { host_url, ..config };
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Checks that the engine is reachable and answering.
    pub async fn health(&self) -> Result<Health> {
        self.get_json("/health").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.apply_auth(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(remote_error(status, &body));
        }

        serde_json::from_str(&body).map_err(Error::from)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.http.get(self.url(path))).await
    }

    pub(crate) async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.http.get(self.url(path)).query(query))
            .await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    pub(crate) async fn post_json_with<B, T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.http.post(self.url(path)).query(query).json(body))
            .await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.http.put(self.url(path)).json(body)).await
    }

    pub(crate) async fn put_json_with<B, T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.http.put(self.url(path)).query(query).json(body))
            .await
    }

    pub(crate) async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.http.patch(self.url(path)).json(body))
            .await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.http.delete(self.url(path))).await
    }
}

/// Engine health report (`GET /health`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Decodes the remote error envelope and maps well-known codes.
///
/// Filter rejections map to [`Error::FilterNotConfigured`]; everything else
/// becomes [`Error::RemoteApi`]. Index/document not-found codes are rewritten
/// by the operation layer, which knows the uid/id being addressed.
fn remote_error(status: StatusCode, body: &str) -> Error {
    let envelope: RemoteError = serde_json::from_str(body).unwrap_or_else(|_| RemoteError {
        message: body.to_string(),
        code: "unknown".to_string(),
        kind: "unknown".to_string(),
        link: None,
    });

    match envelope.code.as_str() {
        codes::INVALID_SEARCH_FILTER | codes::INVALID_DOCUMENT_FILTER => {
            Error::FilterNotConfigured(envelope.message)
        }
        _ => Error::RemoteApi {
            status: status.as_u16(),
            code: envelope.code,
            message: envelope.message,
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
