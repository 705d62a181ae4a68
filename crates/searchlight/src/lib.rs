//! Searchlight
//!
//! Async client for Meilisearch-compatible search engines, reachable over
//! HTTP only. The engine itself (ranking, tokenization, index structures)
//! stays remote; this crate covers connection management, index and document
//! CRUD, filtered and highlighted search, index settings, and asynchronous
//! task tracking.
//!
//! # Architecture
//!
//! - [`Client`]: validated connection handle; every operation is a single
//!   awaited HTTP round-trip through it.
//! - Index, document, settings, and search operations live in their own
//!   modules as `impl Client` extensions.
//! - Mutations return a [`TaskAcknowledgement`]; completion is explicit via
//!   [`Client::wait_for_task`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use searchlight::{Client, ClientConfig, DocumentRecord, Filter, SearchQuery};
//!
//! let client = Client::new(
//!     ClientConfig::new("http://127.0.0.1:7700").with_api_key("masterKey"),
//! )?;
//!
//! let ack = client.create_index("movies", Some("id")).await?;
//! client.wait_for_task(ack.task_uid, None, None).await?;
//!
//! let results = client
//!     .search::<DocumentRecord>(
//!         "movies",
//!         &SearchQuery::with_text("of").filter(Filter::expr("id = 3")),
//!     )
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod documents;
pub mod error;
pub mod indexes;
pub mod search;
pub mod service;
pub mod settings;
pub mod tasks;

// Re-export commonly used types
pub use client::{Client, Health};
pub use config::ClientConfig;
pub use documents::{DocumentPage, DocumentRecord, DocumentsQuery};
pub use error::{Error, RemoteError, Result};
pub use indexes::{EnsureIndex, IndexDescriptor, IndexPage, IndexStats, Page};
pub use search::{Filter, MatchRange, SearchHit, SearchQuery, SearchResults};
pub use service::{SearchService, SharedSearchService};
pub use settings::IndexSettings;
pub use tasks::{TaskAcknowledgement, TaskInfo, TaskStatus};
