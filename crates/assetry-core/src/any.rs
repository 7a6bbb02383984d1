//! Records of any kind, and static dispatch from a runtime [`EntityKind`].

use serde_json::Value;

use crate::entity::Entity;
use crate::error::Result;
use crate::model::{
    Accessory, Alert, Asset, ComplianceCheck, Component, Consumable, ImportRecord, Integration,
    Kit, License, MaintenanceRecord, Person, PolicyViolation, Report, RequestableItem,
};
use crate::types::{EntityId, EntityKind, Record};

/// Runs `$body` with `$E` bound to the entity type for a runtime kind.
///
/// ```
/// use assetry_core::{Entity, EntityKind, with_entity};
///
/// let kind: EntityKind = "licenses".parse().unwrap();
/// let table = with_entity!(kind, E => <E as Entity>::KIND.table());
/// assert_eq!(table, "licenses");
/// ```
#[macro_export]
macro_rules! with_entity {
    ($kind:expr, $E:ident => $body:expr) => {
        match $kind {
            $crate::EntityKind::Asset => {
                type $E = $crate::model::Asset;
                $body
            }
            $crate::EntityKind::License => {
                type $E = $crate::model::License;
                $body
            }
            $crate::EntityKind::Accessory => {
                type $E = $crate::model::Accessory;
                $body
            }
            $crate::EntityKind::Consumable => {
                type $E = $crate::model::Consumable;
                $body
            }
            $crate::EntityKind::Component => {
                type $E = $crate::model::Component;
                $body
            }
            $crate::EntityKind::Person => {
                type $E = $crate::model::Person;
                $body
            }
            $crate::EntityKind::Kit => {
                type $E = $crate::model::Kit;
                $body
            }
            $crate::EntityKind::RequestableItem => {
                type $E = $crate::model::RequestableItem;
                $body
            }
            $crate::EntityKind::Alert => {
                type $E = $crate::model::Alert;
                $body
            }
            $crate::EntityKind::ComplianceCheck => {
                type $E = $crate::model::ComplianceCheck;
                $body
            }
            $crate::EntityKind::PolicyViolation => {
                type $E = $crate::model::PolicyViolation;
                $body
            }
            $crate::EntityKind::MaintenanceRecord => {
                type $E = $crate::model::MaintenanceRecord;
                $body
            }
            $crate::EntityKind::Integration => {
                type $E = $crate::model::Integration;
                $body
            }
            $crate::EntityKind::ImportRecord => {
                type $E = $crate::model::ImportRecord;
                $body
            }
            $crate::EntityKind::Report => {
                type $E = $crate::model::Report;
                $body
            }
        }
    };
}

/// A record whose kind is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRecord {
    /// Hardware asset
    Asset(Record<Asset>),
    /// Software license
    License(Record<License>),
    /// Accessory
    Accessory(Record<Accessory>),
    /// Consumable
    Consumable(Record<Consumable>),
    /// Component
    Component(Record<Component>),
    /// Person
    Person(Record<Person>),
    /// Predefined kit
    Kit(Record<Kit>),
    /// Requestable item
    RequestableItem(Record<RequestableItem>),
    /// Alert
    Alert(Record<Alert>),
    /// Compliance check
    ComplianceCheck(Record<ComplianceCheck>),
    /// Policy violation
    PolicyViolation(Record<PolicyViolation>),
    /// Maintenance record
    MaintenanceRecord(Record<MaintenanceRecord>),
    /// Integration
    Integration(Record<Integration>),
    /// Import run
    ImportRecord(Record<ImportRecord>),
    /// Report
    Report(Record<Report>),
}

macro_rules! each_variant {
    ($value:expr, $record:ident => $body:expr) => {
        match $value {
            AnyRecord::Asset($record) => $body,
            AnyRecord::License($record) => $body,
            AnyRecord::Accessory($record) => $body,
            AnyRecord::Consumable($record) => $body,
            AnyRecord::Component($record) => $body,
            AnyRecord::Person($record) => $body,
            AnyRecord::Kit($record) => $body,
            AnyRecord::RequestableItem($record) => $body,
            AnyRecord::Alert($record) => $body,
            AnyRecord::ComplianceCheck($record) => $body,
            AnyRecord::PolicyViolation($record) => $body,
            AnyRecord::MaintenanceRecord($record) => $body,
            AnyRecord::Integration($record) => $body,
            AnyRecord::ImportRecord($record) => $body,
            AnyRecord::Report($record) => $body,
        }
    };
}

impl AnyRecord {
    /// Wraps a typed record.
    pub fn from_record<E: Entity>(record: Record<E>) -> Self {
        E::into_any(record)
    }

    /// Reads a record of `kind` from its UI-shaped JSON (cache format).
    pub fn from_json(kind: EntityKind, value: Value) -> Result<Self> {
        with_entity!(kind, E => {
            let record: Record<E> = serde_json::from_value(value)?;
            Ok(E::into_any(record))
        })
    }

    /// The record's kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            AnyRecord::Asset(_) => EntityKind::Asset,
            AnyRecord::License(_) => EntityKind::License,
            AnyRecord::Accessory(_) => EntityKind::Accessory,
            AnyRecord::Consumable(_) => EntityKind::Consumable,
            AnyRecord::Component(_) => EntityKind::Component,
            AnyRecord::Person(_) => EntityKind::Person,
            AnyRecord::Kit(_) => EntityKind::Kit,
            AnyRecord::RequestableItem(_) => EntityKind::RequestableItem,
            AnyRecord::Alert(_) => EntityKind::Alert,
            AnyRecord::ComplianceCheck(_) => EntityKind::ComplianceCheck,
            AnyRecord::PolicyViolation(_) => EntityKind::PolicyViolation,
            AnyRecord::MaintenanceRecord(_) => EntityKind::MaintenanceRecord,
            AnyRecord::Integration(_) => EntityKind::Integration,
            AnyRecord::ImportRecord(_) => EntityKind::ImportRecord,
            AnyRecord::Report(_) => EntityKind::Report,
        }
    }

    /// The record's id.
    pub fn id(&self) -> &EntityId {
        each_variant!(self, record => &record.id)
    }

    /// One-line label.
    pub fn title(&self) -> String {
        each_variant!(self, record => record.fields.title())
    }

    /// UI-shaped JSON of the whole record.
    pub fn to_json(&self) -> Result<Value> {
        each_variant!(self, record => Ok(serde_json::to_value(record)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn license_json() -> Value {
        json!({
            "id": "lic-9",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z",
            "name": "CAD Suite",
            "seats": 5
        })
    }

    #[test]
    fn test_from_json_dispatches_on_kind() {
        let any = AnyRecord::from_json(EntityKind::License, license_json()).unwrap();
        assert_eq!(any.kind(), EntityKind::License);
        assert_eq!(any.id().as_str(), "lic-9");
        assert_eq!(any.title(), "CAD Suite");
        let AnyRecord::License(record) = &any else {
            unreachable!("Expected a license");
        };
        assert_eq!(record.seats, 5);
    }

    #[test]
    fn test_to_json_keeps_ui_naming() {
        let any = AnyRecord::from_json(EntityKind::License, license_json()).unwrap();
        let out = any.to_json().unwrap();
        assert_eq!(out["availableSeats"], 0);
        assert_eq!(out["updatedAt"], "2024-01-02T00:00:00Z");
    }

    #[test]
    fn test_with_entity_covers_every_kind() {
        for kind in EntityKind::ALL {
            let resolved = with_entity!(kind, E => E::KIND);
            assert_eq!(resolved, kind);
        }
    }
}
