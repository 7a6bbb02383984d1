//! Hardware assets.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::any::AnyRecord;
use crate::entity::{Entity, Field};
use crate::types::{EntityId, EntityKind, Facet, Record, Stamp};

/// A tracked hardware asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    /// Display name
    pub name: String,
    /// Asset tag (unique label on the device)
    pub tag: String,
    /// Category (Laptop, Server, ...)
    pub category: String,
    /// Subcategory
    pub subcategory: String,
    /// Model
    pub model: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Serial number
    pub serial_number: String,
    /// Deployment status (Ready to Deploy, Deployed, ...)
    pub status: String,
    /// Person the asset is checked out to
    pub assigned_to: Option<EntityId>,
    /// Department the asset is assigned to
    pub assigned_department: String,
    /// Physical location
    pub location: String,
    /// Purchase date
    #[serde(with = "crate::json::day")]
    pub purchase_date: Option<NaiveDate>,
    /// Purchase cost; missing counts as zero in aggregations
    pub purchase_cost: Option<f64>,
    /// Warranty end date
    #[serde(with = "crate::json::day")]
    pub warranty_expiry: Option<NaiveDate>,
    /// Warranty status
    pub warranty_status: String,
    /// Free-form notes
    pub notes: String,
    /// Barcode payload
    pub barcode: String,
    /// QR code payload
    pub qr_code: String,
    /// Free-form specification object
    pub specifications: Value,
    /// Compliance status
    pub compliance_status: String,
    /// Where the asset was discovered (manual, scanner, ...)
    pub discovery_source: String,
    /// Date of the last audit
    #[serde(with = "crate::json::day")]
    pub last_audit_date: Option<NaiveDate>,
    /// Date maintenance is next due
    #[serde(with = "crate::json::day")]
    pub next_maintenance_date: Option<NaiveDate>,
    /// Lifecycle summary; only `stage` is persisted
    pub lifecycle: Lifecycle,
    /// Depreciation estimate, derived client-side
    pub depreciation: Depreciation,
}

/// Lifecycle summary of an asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lifecycle {
    /// Mirrors the purchase date
    #[serde(with = "crate::json::day")]
    pub procurement_date: Option<NaiveDate>,
    /// When the asset went into service
    #[serde(with = "crate::json::day")]
    pub deployment_date: Option<NaiveDate>,
    /// Current stage (Active, Retired, ...); persisted as `lifecycle_stage`
    pub stage: String,
    /// When the next stage is expected
    #[serde(with = "crate::json::day")]
    pub next_stage_date: Option<NaiveDate>,
}

/// Straight-line depreciation estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Depreciation {
    /// Method name
    pub method: String,
    /// Useful life in years
    pub useful_life: u32,
    /// Value at end of life
    pub salvage_value: f64,
    /// Current book value
    pub current_value: f64,
    /// Yearly rate, in percent
    pub depreciation_rate: f64,
    /// When the estimate was derived
    pub last_calculated: Option<DateTime<Utc>>,
}

impl Default for Depreciation {
    fn default() -> Self {
        Self {
            method: "Straight Line".to_string(),
            useful_life: 5,
            salvage_value: 0.0,
            current_value: 0.0,
            depreciation_rate: 20.0,
            last_calculated: None,
        }
    }
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            name: String::new(),
            tag: String::new(),
            category: String::new(),
            subcategory: String::new(),
            model: String::new(),
            manufacturer: String::new(),
            serial_number: String::new(),
            status: String::new(),
            assigned_to: None,
            assigned_department: String::new(),
            location: String::new(),
            purchase_date: None,
            purchase_cost: None,
            warranty_expiry: None,
            warranty_status: String::new(),
            notes: String::new(),
            barcode: String::new(),
            qr_code: String::new(),
            specifications: Value::Null,
            compliance_status: "Compliant".to_string(),
            discovery_source: String::new(),
            last_audit_date: None,
            next_maintenance_date: None,
            lifecycle: Lifecycle {
                stage: "Active".to_string(),
                ..Lifecycle::default()
            },
            depreciation: Depreciation::default(),
        }
    }
}

impl Asset {
    /// Purchase cost with a missing value read as zero.
    pub fn cost(&self) -> f64 {
        self.purchase_cost.unwrap_or(0.0)
    }
}

impl Entity for Asset {
    const KIND: EntityKind = EntityKind::Asset;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::same("tag"),
        Field::same("category"),
        Field::same("subcategory"),
        Field::same("model"),
        Field::same("manufacturer"),
        Field::new("serialNumber", "serial_number"),
        Field::same("status"),
        Field::new("assignedTo", "assigned_to"),
        Field::new("assignedDepartment", "assigned_department"),
        Field::same("location"),
        Field::new("purchaseDate", "purchase_date"),
        Field::new("purchaseCost", "purchase_cost"),
        Field::new("warrantyExpiry", "warranty_expiry"),
        Field::new("warrantyStatus", "warranty_status"),
        Field::same("notes"),
        Field::same("barcode"),
        Field::new("qrCode", "qr_code"),
        Field::same("specifications"),
        Field::new("lifecycle.stage", "lifecycle_stage"),
        Field::new("complianceStatus", "compliance_status"),
        Field::new("discoverySource", "discovery_source"),
        Field::new("lastAuditDate", "last_audit_date"),
        Field::new("nextMaintenanceDate", "next_maintenance_date"),
    ];

    const REQUIRED: &'static [&'static str] = &["name", "tag"];

    fn title(&self) -> String {
        format!("{} ({})", self.name, self.tag)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.tag.as_str(),
            self.serial_number.as_str(),
            self.model.as_str(),
            self.manufacturer.as_str(),
        ]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(&self.status),
            Facet::Category => Some(&self.category),
            Facet::Type => Some(&self.subcategory),
            Facet::Department => Some(&self.assigned_department),
            Facet::Priority | Facet::Severity => None,
        }
    }

    fn synthesize(&mut self, stamp: &Stamp) {
        self.lifecycle.procurement_date = self.purchase_date;
        self.depreciation = Depreciation {
            current_value: self.cost(),
            last_calculated: Some(stamp.updated_at),
            ..Depreciation::default()
        };
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Asset(record)
    }
}
