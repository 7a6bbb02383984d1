//! Write-through mirror of one remote collection.

use assetry_core::{Entity, EntityId, Patch, Record, Stamp};
use std::fmt;
use std::sync::Arc;

use crate::cache::{CacheBackend, load_json, store_json};
use crate::Result;

/// The client's ordered view of one remote table.
///
/// Insertion order is display order. Every mutation writes the whole
/// collection back to the cache before returning; a failed write is logged
/// and the in-memory state is kept.
pub struct EntityStore<E> {
    records: Vec<Record<E>>,
    cache: Arc<dyn CacheBackend>,
}

impl<E: Entity> EntityStore<E> {
    /// Creates an empty store without reading the cache.
    pub fn empty(cache: Arc<dyn CacheBackend>) -> Self {
        Self {
            records: Vec::new(),
            cache,
        }
    }

    /// Loads the store from its cache entry.
    ///
    /// A missing entry is an empty store. An unreadable or corrupt entry is
    /// logged at warn level and also treated as empty.
    pub fn load(cache: Arc<dyn CacheBackend>) -> Self {
        let key = Self::key();
        let records = match load_json::<Vec<Record<E>>>(cache.as_ref(), key) {
            Ok(Some(records)) => records,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable cache entry");
                Vec::new()
            }
        };
        tracing::debug!(key, count = records.len(), backend = cache.name(), "Loaded store");
        Self { records, cache }
    }

    /// Cache key of this collection.
    pub fn key() -> &'static str {
        E::KIND.cache_key()
    }

    /// Replaces the whole collection, as after a successful remote list.
    pub fn replace_all(&mut self, records: Vec<Record<E>>) {
        self.records = records;
        self.persist();
    }

    /// Adds a record at the end.
    pub fn append(&mut self, record: Record<E>) {
        self.records.push(record);
        self.persist();
    }

    /// Replaces the record with the same id in place.
    ///
    /// Returns `false` (and writes nothing) when no record has that id.
    pub fn replace(&mut self, record: Record<E>) -> bool {
        match self.position(&record.id) {
            Some(index) => {
                self.records[index] = record;
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Applies a patch to the record `stamp` identifies, taking `updatedAt`
    /// from the stamp the remote store returned for the update.
    ///
    /// Derived fields are recomputed afterwards. Returns `Ok(false)` when no
    /// record has that id.
    pub fn apply(&mut self, stamp: &Stamp, patch: &Patch<E>) -> Result<bool> {
        let Some(index) = self.position(&stamp.id) else {
            return Ok(false);
        };
        let record = &mut self.records[index];
        record.fields = patch.apply(&record.fields)?;
        record.updated_at = stamp.updated_at;
        let stamp = record.stamp();
        record.fields.synthesize(&stamp);
        self.persist();
        Ok(true)
    }

    /// Removes the record with `id`, returning it.
    pub fn remove(&mut self, id: &EntityId) -> Option<Record<E>> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        self.persist();
        Some(removed)
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &EntityId) -> Option<&Record<E>> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Returns `true` when a record with `id` exists.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.position(id).is_some()
    }

    /// Iterates records in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record<E>> {
        self.records.iter()
    }

    /// All records in display order.
    pub fn records(&self) -> &[Record<E>] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }

    fn persist(&self) {
        let key = Self::key();
        match store_json(self.cache.as_ref(), key, &self.records) {
            Ok(()) => tracing::trace!(key, count = self.records.len(), "Mirrored store"),
            Err(e) => tracing::warn!(key, error = %e, "Failed to mirror store to cache"),
        }
    }
}

impl<'a, E: Entity> IntoIterator for &'a EntityStore<E> {
    type Item = &'a Record<E>;
    type IntoIter = std::slice::Iter<'a, Record<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Entity> fmt::Debug for EntityStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("kind", &E::KIND)
            .field("len", &self.records.len())
            .field("cache", &self.cache.name())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::{FileCache, MemoryCache};
    use chrono::{DateTime, Utc};
    use assetry_core::model::{Asset, Kit, License};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn at(day: u32) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("2024-05-{day:02}T09:00:00Z"))
            .unwrap()
            .with_timezone(&Utc)
    }

    fn license(id: &str, name: &str) -> Record<License> {
        Record::new(
            Stamp {
                id: EntityId::new(id),
                created_at: at(1),
                updated_at: at(1),
            },
            License {
                name: name.into(),
                seats: 5,
                available_seats: 5,
                ..License::default()
            },
        )
    }

    fn names(store: &EntityStore<License>) -> Vec<String> {
        store.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_mutations_write_through() {
        let cache = Arc::new(MemoryCache::new());
        let mut store = EntityStore::<License>::empty(cache.clone());
        store.append(license("l-1", "Office"));
        store.append(license("l-2", "IDE"));

        let reloaded = EntityStore::<License>::load(cache.clone());
        assert_eq!(names(&reloaded), vec!["Office", "IDE"]);

        store.remove(&EntityId::new("l-1"));
        let reloaded = EntityStore::<License>::load(cache);
        assert_eq!(names(&reloaded), vec!["IDE"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut store = EntityStore::empty(Arc::new(MemoryCache::new()));
        store.append(license("l-1", "A"));
        store.append(license("l-2", "B"));
        store.append(license("l-3", "C"));

        assert!(store.replace(license("l-2", "B2")));
        assert_eq!(names(&store), vec!["A", "B2", "C"]);
        assert!(!store.replace(license("l-9", "Z")));
        assert_eq!(store.len(), 3);
    }

    fn stamp(id: &str, updated: u32) -> Stamp {
        Stamp {
            id: EntityId::new(id),
            created_at: at(1),
            updated_at: at(updated),
        }
    }

    #[test]
    fn test_apply_takes_store_updated_at_and_rederives() {
        let mut store = EntityStore::<Asset>::empty(Arc::new(MemoryCache::new()));
        let mut asset = Asset {
            name: "Laptop-01".into(),
            tag: "A-1001".into(),
            ..Asset::default()
        };
        let created = stamp("a-1", 1);
        asset.synthesize(&created);
        store.append(Record::new(created, asset));

        let patch = Patch::<Asset>::new().set("purchaseCost", 1200.0);
        assert!(store.apply(&stamp("a-1", 9), &patch).unwrap());

        let record = store.get(&EntityId::new("a-1")).unwrap();
        assert_eq!(record.purchase_cost, Some(1200.0));
        assert_eq!(record.depreciation.current_value, 1200.0);
        assert_eq!(record.updated_at, at(9));
        assert_eq!(record.created_at, at(1));
    }

    #[test]
    fn test_apply_to_missing_id_is_noop() {
        let mut store = EntityStore::<License>::empty(Arc::new(MemoryCache::new()));
        let patch = Patch::<License>::new().set("seats", 1);
        assert!(!store.apply(&stamp("nope", 2), &patch).unwrap());
    }

    #[test]
    fn test_corrupt_cache_loads_empty() {
        let cache = Arc::new(MemoryCache::new());
        cache.store("predefinedKits", "{\"half\": ").unwrap();
        let store = EntityStore::<Kit>::load(cache);
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_backed_store_survives_reload() {
        let tmp = TempDir::new().unwrap();
        let cache: Arc<dyn CacheBackend> = Arc::new(FileCache::new(tmp.path()));
        let mut store = EntityStore::<License>::load(cache.clone());
        store.replace_all(vec![license("l-1", "Office")]);

        assert!(tmp.path().join("licenses.json").exists());
        let reloaded = EntityStore::<License>::load(cache);
        assert_eq!(reloaded.get(&EntityId::new("l-1")).unwrap().seats, 5);
    }

    proptest! {
        #[test]
        fn prop_remove_preserves_relative_order(count in 1usize..12, victim in 0usize..12) {
            let mut store = EntityStore::<License>::empty(Arc::new(MemoryCache::new()));
            for i in 0..count {
                store.append(license(&format!("l-{i}"), &format!("n{i}")));
            }
            let victim = victim % count;
            store.remove(&EntityId::new(format!("l-{victim}")));

            let expected: Vec<String> = (0..count)
                .filter(|i| *i != victim)
                .map(|i| format!("n{i}"))
                .collect();
            prop_assert_eq!(names(&store), expected);
        }
    }
}
