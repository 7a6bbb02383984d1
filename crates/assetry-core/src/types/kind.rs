//! The closed set of tracked entity kinds and their filterable facets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// One of the record kinds tracked by the console.
///
/// Each kind maps to one remote table and one local cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Hardware asset
    Asset,
    /// Software license
    License,
    /// Accessory (mice, docks, headsets)
    Accessory,
    /// Consumable stock (toner, cables)
    Consumable,
    /// Component installed into assets
    Component,
    /// Person / user account
    Person,
    /// Predefined kit of assets, accessories, licenses and consumables
    Kit,
    /// Item users may request
    RequestableItem,
    /// Alert or notification
    Alert,
    /// Compliance audit check
    ComplianceCheck,
    /// Policy violation
    PolicyViolation,
    /// Maintenance or repair record
    MaintenanceRecord,
    /// External system integration
    Integration,
    /// Import run summary
    ImportRecord,
    /// Saved report definition
    Report,
}

impl EntityKind {
    /// Every kind, in sidebar order.
    pub const ALL: [EntityKind; 15] = [
        EntityKind::Asset,
        EntityKind::License,
        EntityKind::Accessory,
        EntityKind::Consumable,
        EntityKind::Component,
        EntityKind::Person,
        EntityKind::Kit,
        EntityKind::RequestableItem,
        EntityKind::Alert,
        EntityKind::ComplianceCheck,
        EntityKind::PolicyViolation,
        EntityKind::MaintenanceRecord,
        EntityKind::Integration,
        EntityKind::ImportRecord,
        EntityKind::Report,
    ];

    /// Short kebab-case name, as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Asset => "asset",
            EntityKind::License => "license",
            EntityKind::Accessory => "accessory",
            EntityKind::Consumable => "consumable",
            EntityKind::Component => "component",
            EntityKind::Person => "person",
            EntityKind::Kit => "kit",
            EntityKind::RequestableItem => "requestable-item",
            EntityKind::Alert => "alert",
            EntityKind::ComplianceCheck => "compliance-check",
            EntityKind::PolicyViolation => "policy-violation",
            EntityKind::MaintenanceRecord => "maintenance-record",
            EntityKind::Integration => "integration",
            EntityKind::ImportRecord => "import-record",
            EntityKind::Report => "report",
        }
    }

    /// Remote table name.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Asset => "assets",
            EntityKind::License => "licenses",
            EntityKind::Accessory => "accessories",
            EntityKind::Consumable => "consumables",
            EntityKind::Component => "components",
            EntityKind::Person => "users",
            EntityKind::Kit => "predefined_kits",
            EntityKind::RequestableItem => "requestable_items",
            EntityKind::Alert => "alerts",
            EntityKind::ComplianceCheck => "compliance_checks",
            EntityKind::PolicyViolation => "policy_violations",
            EntityKind::MaintenanceRecord => "maintenance_records",
            EntityKind::Integration => "integrations",
            EntityKind::ImportRecord => "import_records",
            EntityKind::Report => "reports",
        }
    }

    /// Local cache key holding the mirrored collection.
    pub fn cache_key(self) -> &'static str {
        match self {
            EntityKind::Asset => "assets",
            EntityKind::License => "licenses",
            EntityKind::Accessory => "accessories",
            EntityKind::Consumable => "consumables",
            EntityKind::Component => "components",
            EntityKind::Person => "users",
            EntityKind::Kit => "predefinedKits",
            EntityKind::RequestableItem => "requestableItems",
            EntityKind::Alert => "alerts",
            EntityKind::ComplianceCheck => "complianceChecks",
            EntityKind::PolicyViolation => "policyViolations",
            EntityKind::MaintenanceRecord => "maintenanceRecords",
            EntityKind::Integration => "integrations",
            EntityKind::ImportRecord => "imports",
            EntityKind::Report => "reports",
        }
    }

    /// Human-readable plural label.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Asset => "Assets",
            EntityKind::License => "Licenses",
            EntityKind::Accessory => "Accessories",
            EntityKind::Consumable => "Consumables",
            EntityKind::Component => "Components",
            EntityKind::Person => "People",
            EntityKind::Kit => "Predefined Kits",
            EntityKind::RequestableItem => "Requestable Items",
            EntityKind::Alert => "Alerts",
            EntityKind::ComplianceCheck => "Compliance Checks",
            EntityKind::PolicyViolation => "Policy Violations",
            EntityKind::MaintenanceRecord => "Maintenance Records",
            EntityKind::Integration => "Integrations",
            EntityKind::ImportRecord => "Imports",
            EntityKind::Report => "Reports",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    /// Accepts the kebab-case name, the table name, the cache key, and a few
    /// aliases used by the screens ("user", "people", "requestable").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match normalized.as_str() {
            "user" | "users" | "people" => Some(EntityKind::Person),
            "predefined-kit" | "predefined-kits" | "kits" => Some(EntityKind::Kit),
            "requestable" | "requestable-items" => Some(EntityKind::RequestableItem),
            "imports" | "import" => Some(EntityKind::ImportRecord),
            "maintenance" => Some(EntityKind::MaintenanceRecord),
            "violation" | "violations" => Some(EntityKind::PolicyViolation),
            _ => None,
        };
        if let Some(kind) = alias {
            return Ok(kind);
        }
        EntityKind::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str() == normalized
                    || kind.table().replace('_', "-") == normalized
                    || kind.cache_key().eq_ignore_ascii_case(s.trim())
            })
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// A discrete, exact-match filter dimension exposed by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    /// Record status (asset status, alert status, ...)
    Status,
    /// Category
    Category,
    /// Type (alert level, check type, integration type, ...)
    Type,
    /// Priority
    Priority,
    /// Severity
    Severity,
    /// Department
    Department,
}

impl Facet {
    /// Facet name as used in filter descriptions.
    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Status => "status",
            Facet::Category => "category",
            Facet::Type => "type",
            Facet::Priority => "priority",
            Facet::Severity => "severity",
            Facet::Department => "department",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
