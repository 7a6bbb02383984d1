//! Predefined kits and requestable items.

use serde::{Deserialize, Serialize};

use crate::any::AnyRecord;
use crate::entity::{Entity, Field};
use crate::types::{EntityId, EntityKind, Facet, Record};

/// A named bundle of assets, accessories, licenses and consumables.
///
/// Members are plain id lists. Deleting a member record leaves the id in
/// place; resolution reports it as dangling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kit {
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Category
    pub category: String,
    /// Member asset ids
    pub assets: Vec<EntityId>,
    /// Member accessory ids
    pub accessories: Vec<EntityId>,
    /// Member license ids
    pub licenses: Vec<EntityId>,
    /// Member consumable ids
    pub consumables: Vec<EntityId>,
}

impl Kit {
    /// Total number of member ids across all lists.
    pub fn member_count(&self) -> usize {
        self.assets.len() + self.accessories.len() + self.licenses.len() + self.consumables.len()
    }
}

impl Entity for Kit {
    const KIND: EntityKind = EntityKind::Kit;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::same("description"),
        Field::same("category"),
        Field::same("assets"),
        Field::same("accessories"),
        Field::same("licenses"),
        Field::same("consumables"),
    ];

    const REQUIRED: &'static [&'static str] = &["name"];

    fn title(&self) -> String {
        format!("{} ({} items)", self.name, self.member_count())
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(&self.category),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Kit(record)
    }
}

/// An item end users may request from the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestableItem {
    /// Display name
    pub name: String,
    /// Category
    pub category: String,
    /// Description
    pub description: String,
    /// Image URL
    pub image: String,
    /// Whether requests are currently accepted
    pub requestable: bool,
    /// Units available
    pub quantity: i64,
    /// Pickup location
    pub location: String,
    /// Free-form notes
    pub notes: String,
}

impl Entity for RequestableItem {
    const KIND: EntityKind = EntityKind::RequestableItem;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::same("category"),
        Field::same("description"),
        Field::same("image"),
        Field::same("requestable"),
        Field::same("quantity"),
        Field::same("location"),
        Field::same("notes"),
    ];

    const REQUIRED: &'static [&'static str] = &["name"];

    fn title(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(&self.category),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::RequestableItem(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kit_member_lists_are_plain_ids() {
        let kit: Kit = serde_json::from_str(
            r#"{"name": "Onboarding", "assets": ["a1", "a2"], "licenses": ["l1"]}"#,
        )
        .unwrap();
        assert_eq!(kit.member_count(), 3);
        assert_eq!(kit.licenses[0], "l1");
        assert!(kit.consumables.is_empty());
        assert_eq!(kit.title(), "Onboarding (3 items)");
    }
}
