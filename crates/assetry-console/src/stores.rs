//! One [`EntityStore`] per tracked kind, with typed accessors.

use assetry_core::model::{
    Accessory, Alert, Asset, ComplianceCheck, Component, Consumable, ImportRecord, Integration,
    Kit, License, MaintenanceRecord, Person, PolicyViolation, Report, RequestableItem,
};
use assetry_core::{Entity, EntityKind, with_entity};
use assetry_storage::{CacheBackend, EntityStore};
use std::sync::Arc;

/// Entities the console keeps a store for.
///
/// Gives generic code typed access to the right field of [`Stores`].
pub trait Tracked: Entity {
    /// The store holding records of this kind.
    fn store(stores: &Stores) -> &EntityStore<Self>;

    /// Mutable access to the store holding records of this kind.
    fn store_mut(stores: &mut Stores) -> &mut EntityStore<Self>;
}

macro_rules! stores {
    ($($field:ident: $E:ty),* $(,)?) => {
        /// Every mirrored collection.
        #[derive(Debug)]
        pub struct Stores {
            $(
                #[doc = concat!("Store of `", stringify!($E), "` records")]
                pub $field: EntityStore<$E>,
            )*
        }

        impl Stores {
            /// Loads every collection from the cache.
            pub fn load(cache: &Arc<dyn CacheBackend>) -> Self {
                Self {
                    $($field: EntityStore::load(cache.clone()),)*
                }
            }
        }

        $(
            impl Tracked for $E {
                fn store(stores: &Stores) -> &EntityStore<Self> {
                    &stores.$field
                }

                fn store_mut(stores: &mut Stores) -> &mut EntityStore<Self> {
                    &mut stores.$field
                }
            }
        )*
    };
}

stores! {
    assets: Asset,
    licenses: License,
    accessories: Accessory,
    consumables: Consumable,
    components: Component,
    people: Person,
    kits: Kit,
    requestable_items: RequestableItem,
    alerts: Alert,
    compliance_checks: ComplianceCheck,
    policy_violations: PolicyViolation,
    maintenance_records: MaintenanceRecord,
    integrations: Integration,
    imports: ImportRecord,
    reports: Report,
}

impl Stores {
    /// Record count of one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        with_entity!(kind, E => <E as Tracked>::store(self).len())
    }

    /// Typed access to one store.
    pub fn of<E: Tracked>(&self) -> &EntityStore<E> {
        E::store(self)
    }

    /// Typed mutable access to one store.
    pub fn of_mut<E: Tracked>(&mut self) -> &mut EntityStore<E> {
        E::store_mut(self)
    }
}
