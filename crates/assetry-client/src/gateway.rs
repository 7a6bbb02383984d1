//! Generic CRUD over the remote store, in UI naming.

use assetry_core::{Entity, EntityId, Patch, Record, Stamp};
use std::fmt;
use std::sync::Arc;

use crate::remote::RemoteStore;
use crate::wire::{from_wire, merge_created, patch_to_wire, stamp_from_row, to_wire};
use crate::{Error, Result};

/// The one data-access wrapper every screen goes through.
///
/// Cheap to clone. Holds no cache: every call reaches the remote store.
#[derive(Clone)]
pub struct Gateway {
    remote: Arc<dyn RemoteStore>,
}

impl Gateway {
    /// Wraps a remote store.
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Name of the backing store.
    pub fn backend(&self) -> &str {
        self.remote.name()
    }

    /// Fetches the full collection of `E`.
    ///
    /// Fails only when the store does; callers then fall back to their
    /// cached copy. A row that cannot be read is logged and skipped.
    pub async fn list<E: Entity>(&self) -> Result<Vec<Record<E>>> {
        let table = E::KIND.table();
        let rows = self.remote.select(table).await?;
        let total = rows.len();
        let records: Vec<Record<E>> = rows
            .into_iter()
            .filter_map(|row| match from_wire::<E>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(kind = %E::KIND, error = %e, "Skipping unreadable row");
                    None
                }
            })
            .collect();
        tracing::debug!(
            kind = %E::KIND,
            count = records.len(),
            skipped = total - records.len(),
            "Listed records"
        );
        Ok(records)
    }

    /// Fetches one record by id.
    pub async fn get<E: Entity>(&self, id: &EntityId) -> Result<Record<E>> {
        let table = E::KIND.table();
        match self.remote.select_one(table, id).await? {
            Some(row) => Ok(from_wire(row)?),
            None => Err(assetry_core::Error::not_found(E::KIND, id.as_str()).into()),
        }
    }

    /// Creates a record and returns it with the store-assigned id and
    /// timestamps merged into the submitted fields.
    pub async fn create<E: Entity>(&self, fields: E) -> Result<Record<E>> {
        let row = to_wire(&fields)?;
        let stored = self.remote.insert(E::KIND.table(), row).await?;
        let record = merge_created(fields, &stored)?;
        tracing::info!(kind = %E::KIND, id = %record.id, "Created record");
        Ok(record)
    }

    /// Sends a partial update. Fields not in the patch are left untouched.
    ///
    /// Returns the store's stamp for the row after the update, carrying the
    /// store-maintained `updatedAt`. Unknown patch keys are rejected before
    /// any remote call; an empty patch makes no call and returns `None`.
    pub async fn update<E: Entity>(
        &self,
        id: &EntityId,
        patch: &Patch<E>,
    ) -> Result<Option<Stamp>> {
        let changes = patch_to_wire(patch)?;
        if changes.is_empty() {
            tracing::debug!(kind = %E::KIND, %id, "Empty patch, nothing to send");
            return Ok(None);
        }
        let stored = self.remote.update(E::KIND.table(), id, changes).await?;
        let stamp = stamp_from_row(&stored)?;
        tracing::info!(kind = %E::KIND, %id, fields = patch.len(), "Updated record");
        Ok(Some(stamp))
    }

    /// Deletes a record.
    pub async fn delete<E: Entity>(&self, id: &EntityId) -> Result<()> {
        self.remote.delete(E::KIND.table(), id).await?;
        tracing::info!(kind = %E::KIND, %id, "Deleted record");
        Ok(())
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("backend", &self.remote.name())
            .finish()
    }
}

impl From<Arc<dyn RemoteStore>> for Gateway {
    fn from(remote: Arc<dyn RemoteStore>) -> Self {
        Self::new(remote)
    }
}

/// Returns `true` when `err` means the store could not be reached or
/// refused the request, as opposed to a local rejection.
pub fn is_remote_failure(err: &Error) -> bool {
    !err.is_rejected_locally()
}
