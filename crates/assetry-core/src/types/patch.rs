//! Partial field sets for updates.

use serde_json::{Map, Value};
use std::marker::PhantomData;

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::json::{get_path, set_path};

/// A partial, UI-named field set for one entity type.
///
/// Fields not present in the patch are left untouched, both remotely and in
/// the local copy. Keys are UI field paths (`purchaseCost`,
/// `lifecycle.stage`); the gateway translates them to wire names.
///
/// # Examples
///
/// ```
/// use assetry_core::Patch;
/// use assetry_core::model::Asset;
///
/// let patch = Patch::<Asset>::new().set("purchaseCost", 1200.0);
/// assert!(patch.validate().is_ok());
/// assert_eq!(patch.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Patch<E> {
    changes: Map<String, Value>,
    entity: PhantomData<fn() -> E>,
}

impl<E> Default for Patch<E> {
    fn default() -> Self {
        Self {
            changes: Map::new(),
            entity: PhantomData,
        }
    }
}

impl<E> Patch<E> {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets one field, replacing any earlier value for it.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.changes.insert(field.into(), value.into());
    }

    /// Returns the value staged for `field`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.changes.get(field)
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns `true` when nothing changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterates the staged `(field, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<E: Entity> Patch<E> {
    /// Checks that every staged field is one the entity translates.
    pub fn validate(&self) -> Result<()> {
        match self.changes.keys().find(|key| E::field(key).is_none()) {
            Some(unknown) => Err(Error::UnknownField {
                kind: E::KIND,
                field: unknown.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Builds the patch that turns `before` into `after`, restricted to
    /// persisted (translated) fields.
    pub fn diff(before: &E, after: &E) -> Result<Self> {
        let before = serde_json::to_value(before)?;
        let after = serde_json::to_value(after)?;
        let mut patch = Self::new();
        for field in E::FIELDS {
            let old = get_path(&before, field.ui);
            let new = get_path(&after, field.ui);
            if old != new {
                patch.insert(field.ui, new.cloned().unwrap_or(Value::Null));
            }
        }
        Ok(patch)
    }

    /// Returns a copy of `target` with the patch applied.
    pub fn apply(&self, target: &E) -> Result<E> {
        let mut value = serde_json::to_value(target)?;
        for (field, change) in &self.changes {
            set_path(&mut value, field, change.clone())?;
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Asset, License};
    use serde_json::json;

    #[test]
    fn test_validate_rejects_unknown_field() {
        let patch = Patch::<License>::new().set("product_key", "XXXX");
        let err = patch.validate().unwrap_err();
        assert_eq!(err.field(), Some("product_key"));
    }

    #[test]
    fn test_validate_accepts_nested_ui_path() {
        let patch = Patch::<Asset>::new().set("lifecycle.stage", "Retired");
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_diff_only_lists_changed_persisted_fields() {
        let before = Asset {
            name: "Laptop-01".into(),
            tag: "A-1001".into(),
            ..Asset::default()
        };
        let mut after = before.clone();
        after.purchase_cost = Some(1200.0);
        after.depreciation.current_value = 1200.0;

        let patch = Patch::diff(&before, &after).unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("purchaseCost"), Some(&json!(1200.0)));
    }

    #[test]
    fn test_diff_of_identical_records_is_empty() {
        let asset = Asset::default();
        assert!(Patch::diff(&asset, &asset).unwrap().is_empty());
    }

    #[test]
    fn test_apply_leaves_other_fields_untouched() {
        let license = License {
            name: "Office".into(),
            seats: 10,
            ..License::default()
        };
        let patched = Patch::<License>::new()
            .set("availableSeats", 4)
            .apply(&license)
            .unwrap();
        assert_eq!(patched.available_seats, 4);
        assert_eq!(patched.seats, 10);
        assert_eq!(patched.name, "Office");
    }

    #[test]
    fn test_apply_nested_path() {
        let patched = Patch::<Asset>::new()
            .set("lifecycle.stage", "Retired")
            .apply(&Asset::default())
            .unwrap();
        assert_eq!(patched.lifecycle.stage, "Retired");
    }

    #[test]
    fn test_apply_null_clears_optional() {
        let asset = Asset {
            purchase_cost: Some(50.0),
            ..Asset::default()
        };
        let patched = Patch::<Asset>::new()
            .set("purchaseCost", Value::Null)
            .apply(&asset)
            .unwrap();
        assert_eq!(patched.purchase_cost, None);
    }
}
