//! The transport seam: raw JSON rows per table.
//!
//! # Backends
//!
//! - [`RestStore`](crate::rest::RestStore): PostgREST dialect over HTTP
//! - [`MemoryStore`](crate::memory::MemoryStore): in-process tables for
//!   offline use and tests

use assetry_core::EntityId;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::memory::MemoryStore;
use crate::rest::RestStore;
use crate::Result;

/// A remote relational store addressed by table name.
///
/// Rows are wire-shaped JSON objects. The store owns `id`, `created_at`
/// and `updated_at`; callers never send them.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns every row of `table`.
    async fn select(&self, table: &str) -> Result<Vec<Value>>;

    /// Returns the row with `id`, or `None` when there is none.
    async fn select_one(&self, table: &str, id: &EntityId) -> Result<Option<Value>>;

    /// Inserts a row and returns it as stored (with id and timestamps).
    async fn insert(&self, table: &str, row: Map<String, Value>) -> Result<Value>;

    /// Applies a partial row to the row with `id` and returns the row as
    /// stored, with the store's new `updated_at`.
    async fn update(
        &self,
        table: &str,
        id: &EntityId,
        changes: Map<String, Value>,
    ) -> Result<Value>;

    /// Deletes the row with `id`. Deleting a missing row is not an error.
    async fn delete(&self, table: &str, id: &EntityId) -> Result<()>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Create a remote store based on configuration.
///
/// Selection logic:
/// 1. A configured URL selects [`RestStore`]
/// 2. Otherwise an empty [`MemoryStore`] (offline mode)
pub fn create_remote_store(config: &ClientConfig) -> Result<Arc<dyn RemoteStore>> {
    if config.is_configured() {
        tracing::debug!(url = %config.url, timeout_secs = config.timeout_secs, "Using REST store");
        Ok(Arc::new(RestStore::new(config)?))
    } else {
        tracing::info!("No remote store configured; running against an in-memory store");
        Ok(Arc::new(MemoryStore::new()))
    }
}
