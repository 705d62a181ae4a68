//! Shared Search Service
//!
//! Provides a lazily-initialized, shareable wrapper for host applications.
//!
//! Goals:
//! - Lazy startup (no hard dependency on the engine during app boot)
//! - Single shared client per app
//! - Clear, actionable errors when used before initialization

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Shared search service (lazy client construction + connectivity check).
pub struct SearchService {
    config: ClientConfig,
    client: RwLock<Option<Client>>,
}

impl SearchService {
    /// Creates a new service wrapper. The client is not built until the
    /// first call to `ensure_ready`.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the client (if needed) and verifies the engine is reachable.
    pub async fn ensure_ready(&self) -> Result<()> {
        let mut guard = self.client.write().await;
        if guard.is_none() {
            let client = Client::new(self.config.clone())?;
            let health = client.health().await?;
            tracing::info!(
                host = %client.config().host_url,
                status = %health.status,
                "search engine reachable"
            );
            *guard = Some(client);
        }
        Ok(())
    }

    /// Returns the shared client handle.
    ///
    /// Fails with [`Error::NotInitialized`] before the first successful
    /// [`SearchService::ensure_ready`].
    pub async fn client(&self) -> Result<Client> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(Error::NotInitialized)
    }
}

/// Convenience shared type.
pub type SharedSearchService = Arc<SearchService>;

// =============================================================================
// Tests
// =============================================================================
