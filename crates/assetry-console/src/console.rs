//! The composition root: gateway, stores and profile behind one handle.

use assetry_client::Gateway;
use assetry_core::model::UserProfile;
use assetry_core::{
    EntityId, EntityKind, Patch, Phase, Record, Stamp, Transition, Triage, with_entity,
};
use assetry_storage::{CacheBackend, load_profile, save_profile};
use chrono::Utc;
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::stores::{Stores, Tracked};
use crate::Result;

// ============================================================================
// Outcomes
// ============================================================================

/// What a refresh of one collection did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// The remote list succeeded and replaced the mirror.
    Fetched {
        /// Records now held
        count: usize,
    },
    /// The remote list failed; the cached mirror was kept as-is.
    Cached {
        /// Records still held
        count: usize,
        /// Why the fetch failed
        error: String,
    },
    /// The result arrived after its owner was disposed and was dropped.
    Discarded,
}

impl Refresh {
    /// Returns `true` when fresh data was stored.
    pub fn is_fetched(&self) -> bool {
        matches!(self, Refresh::Fetched { .. })
    }
}

/// Answers the "are you sure?" question before a delete.
pub trait Confirm {
    /// Returns `true` to go ahead.
    fn confirm(&self, question: &str) -> bool;
}

impl Confirm for bool {
    fn confirm(&self, _question: &str) -> bool {
        *self
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// Removed remotely and locally.
    Deleted,
    /// The operator said no; nothing was sent.
    Declined,
}

/// Result of a bulk transition. Individual failures are only logged, so a
/// partial failure reads the same as a clean run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Ids the transition was tried on
    pub attempted: usize,
}

// ============================================================================
// Console
// ============================================================================

/// The application context every screen and command goes through.
///
/// Cheap to clone. Store locks are never held across a remote call, so
/// concurrent operations interleave freely and the last successful write
/// wins.
#[derive(Clone)]
pub struct Console {
    inner: Arc<Inner>,
}

struct Inner {
    gateway: Gateway,
    cache: Arc<dyn CacheBackend>,
    stores: RwLock<Stores>,
    profile: RwLock<UserProfile>,
}

impl Console {
    /// Builds a console, loading every store and the profile from `cache`.
    pub fn new(gateway: Gateway, cache: Arc<dyn CacheBackend>) -> Self {
        let stores = Stores::load(&cache);
        let profile = load_profile(cache.as_ref());
        tracing::debug!(
            backend = gateway.backend(),
            cache = cache.name(),
            "Console ready"
        );
        Self {
            inner: Arc::new(Inner {
                gateway,
                cache,
                stores: RwLock::new(stores),
                profile: RwLock::new(profile),
            }),
        }
    }

    /// The remote gateway.
    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }

    /// Runs `f` against a consistent snapshot of every store.
    pub async fn read<R>(&self, f: impl FnOnce(&Stores) -> R) -> R {
        let stores = self.inner.stores.read().await;
        f(&stores)
    }

    /// Copies the current collection of `E`.
    pub async fn list<E: Tracked>(&self) -> Vec<Record<E>> {
        self.read(|stores| stores.of::<E>().records().to_vec()).await
    }

    /// Copies one record of `E`.
    pub async fn get<E: Tracked>(&self, id: &EntityId) -> Option<Record<E>> {
        self.read(|stores| stores.of::<E>().get(id).cloned()).await
    }

    /// Like [`get`](Self::get), but a missing record is an error.
    pub async fn require<E: Tracked>(&self, id: &EntityId) -> Result<Record<E>> {
        self.get(id)
            .await
            .ok_or_else(|| assetry_core::Error::not_found(E::KIND, id.as_str()).into())
    }

    // ------------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------------

    /// Fetches `E` and replaces the mirror. On failure the mirror is kept.
    pub async fn refresh<E: Tracked>(&self) -> Refresh {
        let fetched = self.inner.gateway.list::<E>().await;
        self.store_fetched(fetched, || true).await
    }

    /// Refresh by runtime kind.
    pub async fn refresh_kind(&self, kind: EntityKind) -> Refresh {
        with_entity!(kind, E => self.refresh::<E>().await)
    }

    /// Refreshes every collection concurrently. Each failure falls back to
    /// the cache independently.
    pub async fn refresh_all(&self) -> Vec<(EntityKind, Refresh)> {
        let outcomes = join_all(
            EntityKind::ALL
                .into_iter()
                .map(|kind| async move { (kind, self.refresh_kind(kind).await) }),
        )
        .await;
        let failed = outcomes.iter().filter(|(_, r)| !r.is_fetched()).count();
        tracing::info!(kinds = outcomes.len(), failed, "Refreshed collections");
        outcomes
    }

    pub(crate) async fn store_fetched<E: Tracked>(
        &self,
        fetched: assetry_client::Result<Vec<Record<E>>>,
        still_wanted: impl FnOnce() -> bool,
    ) -> Refresh {
        match fetched {
            Ok(records) => {
                if !still_wanted() {
                    tracing::debug!(kind = %E::KIND, "Owner gone, dropping refresh result");
                    return Refresh::Discarded;
                }
                let count = records.len();
                self.inner.stores.write().await.of_mut::<E>().replace_all(records);
                Refresh::Fetched { count }
            }
            Err(e) => {
                let count = self.read(|stores| stores.of::<E>().len()).await;
                tracing::warn!(kind = %E::KIND, error = %e, cached = count, "Remote list failed, using cached data");
                Refresh::Cached {
                    count,
                    error: e.to_string(),
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------------

    /// Validates, creates remotely, then appends the stored record locally.
    pub async fn create<E: Tracked>(&self, fields: E) -> Result<Record<E>> {
        fields.validate()?;
        let record = self.inner.gateway.create(fields).await?;
        self.inner
            .stores
            .write()
            .await
            .of_mut::<E>()
            .append(record.clone());
        Ok(record)
    }

    /// Patches remotely, then applies the same patch locally.
    ///
    /// The local `updatedAt` comes from the row the store returned.
    pub async fn update<E: Tracked>(&self, id: &EntityId, patch: &Patch<E>) -> Result<()> {
        patch.validate()?;
        let Some(stamp) = self.inner.gateway.update(id, patch).await? else {
            return Ok(());
        };
        self.apply_locally(&stamp, patch).await
    }

    async fn apply_locally<E: Tracked>(&self, stamp: &Stamp, patch: &Patch<E>) -> Result<()> {
        let applied = self
            .inner
            .stores
            .write()
            .await
            .of_mut::<E>()
            .apply(stamp, patch)?;
        if !applied {
            tracing::debug!(
                kind = %E::KIND,
                id = %stamp.id,
                "Updated record is not mirrored locally"
            );
        }
        Ok(())
    }

    /// Deletes remotely after confirmation, then removes locally.
    ///
    /// Nothing else is touched: kits that list the id keep it.
    pub async fn delete<E: Tracked>(&self, id: &EntityId, confirm: &dyn Confirm) -> Result<Deletion> {
        let question = format!("Delete {} '{id}'?", E::KIND);
        if !confirm.confirm(&question) {
            tracing::debug!(kind = %E::KIND, %id, "Delete declined");
            return Ok(Deletion::Declined);
        }
        self.inner.gateway.delete::<E>(id).await?;
        self.inner.stores.write().await.of_mut::<E>().remove(id);
        Ok(Deletion::Deleted)
    }

    // ------------------------------------------------------------------------
    // Triage
    // ------------------------------------------------------------------------

    /// Moves one alert or violation through the triage machine.
    ///
    /// A disallowed move fails before any remote call. Local state changes
    /// only after the remote update succeeds.
    pub async fn transition<E>(&self, id: &EntityId, transition: Transition) -> Result<Phase>
    where
        E: Tracked + Triage,
    {
        let record = self.require::<E>(id).await?;
        let phase = record.next_phase(transition)?;
        let patch = record.transition_patch(transition, Utc::now())?;
        if let Some(stamp) = self.inner.gateway.update(id, &patch).await? {
            self.apply_locally(&stamp, &patch).await?;
        }
        tracing::info!(kind = %E::KIND, %id, %transition, "Transitioned");
        Ok(phase)
    }

    /// Runs a transition over many ids, one remote call each, in order.
    pub async fn bulk_transition<E>(&self, ids: &[EntityId], transition: Transition) -> BulkOutcome
    where
        E: Tracked + Triage,
    {
        let mut outcome = BulkOutcome::default();
        for id in ids {
            outcome.attempted += 1;
            if let Err(e) = self.transition::<E>(id, transition).await {
                tracing::warn!(kind = %E::KIND, %id, %transition, error = %e, "Bulk transition failed for record");
            }
        }
        tracing::info!(kind = %E::KIND, %transition, attempted = outcome.attempted, "Bulk transition ran");
        outcome
    }

    // ------------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------------

    /// The operator profile.
    pub async fn profile(&self) -> UserProfile {
        self.inner.profile.read().await.clone()
    }

    /// Edits the profile and writes it to the cache.
    pub async fn update_profile(&self, edit: impl FnOnce(&mut UserProfile)) -> Result<UserProfile> {
        let mut profile = self.inner.profile.write().await;
        let mut next = profile.clone();
        edit(&mut next);
        save_profile(self.inner.cache.as_ref(), &next)?;
        *profile = next.clone();
        Ok(next)
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("gateway", &self.inner.gateway)
            .field("cache", &self.inner.cache.name())
            .finish()
    }
}
