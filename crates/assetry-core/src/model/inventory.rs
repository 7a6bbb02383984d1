//! Licenses and stock items: accessories, consumables, components.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::any::AnyRecord;
use crate::entity::{Entity, Field};
use crate::types::{EntityKind, Facet, Record};

/// A software license with a seat pool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct License {
    /// Product name
    pub name: String,
    /// Product key
    pub product_key: String,
    /// Total seats purchased
    pub seats: i64,
    /// Seats not yet assigned
    pub available_seats: i64,
    /// Vendor
    pub manufacturer: String,
    /// Expiry date, if the license is time-limited
    #[serde(with = "crate::json::day")]
    pub expiry_date: Option<NaiveDate>,
    /// Category
    pub category: String,
    /// Purchase cost
    pub cost: Option<f64>,
    /// Free-form notes
    pub notes: String,
}

impl License {
    /// Seats currently assigned.
    pub fn used_seats(&self) -> i64 {
        (self.seats - self.available_seats).max(0)
    }
}

impl Entity for License {
    const KIND: EntityKind = EntityKind::License;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::new("productKey", "product_key"),
        Field::same("seats"),
        Field::new("availableSeats", "available_seats"),
        Field::same("manufacturer"),
        Field::new("expiryDate", "expiry_date"),
        Field::same("category"),
        Field::same("cost"),
        Field::same("notes"),
    ];

    const REQUIRED: &'static [&'static str] = &["name"];

    fn title(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.manufacturer.as_str(), self.product_key.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(&self.category),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::License(record)
    }
}

/// Peripheral stock (mice, docks, headsets).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Accessory {
    /// Display name
    pub name: String,
    /// Category
    pub category: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Model
    pub model: String,
    /// Units owned
    pub quantity: i64,
    /// Units not checked out
    pub available_quantity: i64,
    /// Storage location
    pub location: String,
    /// Purchase date
    #[serde(with = "crate::json::day")]
    pub purchase_date: Option<NaiveDate>,
    /// Purchase cost
    pub purchase_cost: Option<f64>,
}

impl Entity for Accessory {
    const KIND: EntityKind = EntityKind::Accessory;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::same("category"),
        Field::same("manufacturer"),
        Field::same("model"),
        Field::same("quantity"),
        Field::new("availableQuantity", "available_quantity"),
        Field::same("location"),
        Field::new("purchaseDate", "purchase_date"),
        Field::new("purchaseCost", "purchase_cost"),
    ];

    const REQUIRED: &'static [&'static str] = &["name"];

    fn title(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.manufacturer.as_str(), self.model.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(&self.category),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Accessory(record)
    }
}

/// Consumable stock (toner, cables) with a reorder threshold.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Consumable {
    /// Display name
    pub name: String,
    /// Category
    pub category: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Model
    pub model: String,
    /// Units in stock
    pub quantity: i64,
    /// Reorder threshold
    pub min_quantity: i64,
    /// Storage location
    pub location: String,
    /// Vendor item number
    pub item_number: String,
}

impl Consumable {
    /// Returns `true` when stock is at or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

impl Entity for Consumable {
    const KIND: EntityKind = EntityKind::Consumable;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::same("category"),
        Field::same("manufacturer"),
        Field::same("model"),
        Field::same("quantity"),
        Field::new("minQuantity", "min_quantity"),
        Field::same("location"),
        Field::new("itemNumber", "item_number"),
    ];

    const REQUIRED: &'static [&'static str] = &["name"];

    fn title(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.item_number.as_str(), self.manufacturer.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(&self.category),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Consumable(record)
    }
}

/// A part installed into assets (RAM, disks).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Component {
    /// Display name
    pub name: String,
    /// Category
    pub category: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Model
    pub model: String,
    /// Serial number
    pub serial_number: String,
    /// Units in stock
    pub quantity: i64,
    /// Storage location
    pub location: String,
    /// Purchase date
    #[serde(with = "crate::json::day")]
    pub purchase_date: Option<NaiveDate>,
    /// Purchase cost
    pub purchase_cost: Option<f64>,
}

impl Entity for Component {
    const KIND: EntityKind = EntityKind::Component;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::same("category"),
        Field::same("manufacturer"),
        Field::same("model"),
        Field::new("serialNumber", "serial_number"),
        Field::same("quantity"),
        Field::same("location"),
        Field::new("purchaseDate", "purchase_date"),
        Field::new("purchaseCost", "purchase_cost"),
    ];

    const REQUIRED: &'static [&'static str] = &["name"];

    fn title(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.serial_number.as_str(), self.model.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(&self.category),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Component(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_license_used_seats_never_negative() {
        let license = License {
            seats: 5,
            available_seats: 7,
            ..License::default()
        };
        assert_eq!(license.used_seats(), 0);

        let license = License {
            seats: 10,
            available_seats: 4,
            ..License::default()
        };
        assert_eq!(license.used_seats(), 6);
    }

    #[test]
    fn test_consumable_low_stock_includes_threshold() {
        let mut toner = Consumable {
            quantity: 3,
            min_quantity: 2,
            ..Consumable::default()
        };
        assert!(!toner.is_low_stock());
        toner.quantity = 2;
        assert!(toner.is_low_stock());
    }

    #[test]
    fn test_license_expiry_reads_timestamp_column() {
        let license: License =
            serde_json::from_str(r#"{"name": "IDE", "expiryDate": "2025-12-31T00:00:00+00:00"}"#)
                .unwrap();
        assert_eq!(license.expiry_date, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn test_only_name_is_required_for_stock_items() {
        assert!(Accessory::default().validate().is_err());
        let component = Component {
            name: "16GB DIMM".into(),
            ..Component::default()
        };
        assert!(component.validate().is_ok());
    }
}
