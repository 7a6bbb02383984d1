//! Alerts, compliance checks, policy violations and maintenance records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::any::AnyRecord;
use crate::entity::{Entity, Field, Triage};
use crate::error::Result;
use crate::types::{EntityId, EntityKind, Facet, Patch, Phase, Record, Transition};

vocabulary! {
    /// Alert status, lowercase on the wire.
    AlertStatus {
        /// Raised and unhandled
        Active => "active",
        /// Someone is on it
        Acknowledged => "acknowledged",
        /// Fixed
        Resolved => "resolved",
        /// Closed without a fix
        Dismissed => "dismissed",
    } default Active
}

vocabulary! {
    /// Alert level, shown as the alert's icon.
    AlertLevel {
        /// Informational
        Info => "info",
        /// Needs attention
        Warning => "warning",
        /// Something failed
        Error => "error",
        /// Something succeeded
        Success => "success",
    } default Info
}

vocabulary! {
    /// Alert priority.
    Priority {
        /// Low
        Low => "low",
        /// Medium
        Medium => "medium",
        /// High
        High => "high",
        /// Critical
        Critical => "critical",
    } default Medium
}

vocabulary! {
    /// Outcome of a compliance check.
    ComplianceStatus {
        /// Passed
        Compliant => "Compliant",
        /// Failed
        NonCompliant => "Non-Compliant",
        /// Not yet audited
        Pending => "Pending",
    } default Pending
}

vocabulary! {
    /// Policy violation status, title case on the wire.
    ViolationStatus {
        /// Newly detected
        Open => "Open",
        /// Being worked on
        InProgress => "In Progress",
        /// Fixed
        Resolved => "Resolved",
        /// Closed without a fix
        Closed => "Closed",
    } default Open
}

/// An alert or notification raised against the estate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Level
    #[serde(rename = "type")]
    pub level: AlertLevel,
    /// Triage status
    pub status: AlertStatus,
    /// Priority
    pub priority: Priority,
    /// Category
    pub category: String,
    /// Asset the alert is about, if any
    pub asset_id: Option<EntityId>,
    /// Denormalized asset name
    pub asset_name: String,
    /// When it was acknowledged
    #[serde(with = "crate::json::moment")]
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// When it was resolved
    #[serde(with = "crate::json::moment")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Entity for Alert {
    const KIND: EntityKind = EntityKind::Alert;

    const FIELDS: &'static [Field] = &[
        Field::same("title"),
        Field::same("message"),
        Field::same("type"),
        Field::same("status"),
        Field::same("priority"),
        Field::same("category"),
        Field::new("assetId", "asset_id"),
        Field::new("assetName", "asset_name"),
        Field::new("acknowledgedAt", "acknowledged_at"),
        Field::new("resolvedAt", "resolved_at"),
    ];

    const REQUIRED: &'static [&'static str] = &["title"];

    fn title(&self) -> String {
        format!("[{}] {}", self.priority, self.title)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.message.as_str(), self.category.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.status.as_str()),
            Facet::Type => Some(self.level.as_str()),
            Facet::Priority => Some(self.priority.as_str()),
            Facet::Category => Some(&self.category),
            Facet::Severity | Facet::Department => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Alert(record)
    }
}

impl Triage for Alert {
    fn phase(&self) -> Phase {
        match self.status {
            AlertStatus::Active => Phase::Open,
            AlertStatus::Acknowledged => Phase::Acknowledged,
            AlertStatus::Resolved => Phase::Resolved,
            AlertStatus::Dismissed => Phase::Dismissed,
        }
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }

    fn transition_patch(&self, transition: Transition, at: DateTime<Utc>) -> Result<Patch<Self>> {
        let status = match self.next_phase(transition)? {
            Phase::Open => AlertStatus::Active,
            Phase::Acknowledged => AlertStatus::Acknowledged,
            Phase::Resolved => AlertStatus::Resolved,
            Phase::Dismissed => AlertStatus::Dismissed,
        };
        let mut patch = Patch::new().set("status", status.as_str());
        match status {
            AlertStatus::Acknowledged => patch.insert("acknowledgedAt", at.to_rfc3339()),
            AlertStatus::Resolved => patch.insert("resolvedAt", at.to_rfc3339()),
            AlertStatus::Active | AlertStatus::Dismissed => {}
        }
        Ok(patch)
    }
}

/// A scheduled or completed compliance audit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceCheck {
    /// What is audited (e.g. "Software Licensing")
    pub check_type: String,
    /// Outcome
    pub status: ComplianceStatus,
    /// When it last ran
    #[serde(with = "crate::json::moment")]
    pub last_checked: Option<DateTime<Utc>>,
    /// When it is next due
    #[serde(with = "crate::json::moment")]
    pub next_check: Option<DateTime<Utc>>,
    /// Who audited
    pub auditor: String,
    /// Free-form notes
    pub notes: String,
}

impl Entity for ComplianceCheck {
    const KIND: EntityKind = EntityKind::ComplianceCheck;

    const FIELDS: &'static [Field] = &[
        Field::new("checkType", "type"),
        Field::same("status"),
        Field::new("lastChecked", "last_checked"),
        Field::new("nextCheck", "next_check"),
        Field::same("auditor"),
        Field::same("notes"),
    ];

    const REQUIRED: &'static [&'static str] = &["checkType"];

    fn title(&self) -> String {
        format!("{} ({})", self.check_type, self.status)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.check_type.as_str(), self.auditor.as_str(), self.notes.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.status.as_str()),
            Facet::Type => Some(&self.check_type),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::ComplianceCheck(record)
    }
}

/// A detected breach of IT policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyViolation {
    /// Kind of violation
    pub violation_type: String,
    /// Severity label (free text on the wire)
    pub severity: String,
    /// What happened
    pub description: String,
    /// When it was detected
    #[serde(with = "crate::json::day")]
    pub detected_date: Option<NaiveDate>,
    /// When it was resolved
    #[serde(with = "crate::json::day")]
    pub resolved_date: Option<NaiveDate>,
    /// Who is handling it
    pub assigned_to: String,
    /// Triage status
    pub status: ViolationStatus,
}

impl PolicyViolation {
    /// Returns `true` while the violation still counts as a compliance issue.
    pub fn is_open(&self) -> bool {
        matches!(self.status, ViolationStatus::Open | ViolationStatus::InProgress)
    }
}

impl Entity for PolicyViolation {
    const KIND: EntityKind = EntityKind::PolicyViolation;

    const FIELDS: &'static [Field] = &[
        Field::new("violationType", "type"),
        Field::same("severity"),
        Field::same("description"),
        Field::new("detectedDate", "detected_date"),
        Field::new("resolvedDate", "resolved_date"),
        Field::new("assignedTo", "assigned_to"),
        Field::same("status"),
    ];

    const REQUIRED: &'static [&'static str] = &["violationType", "description"];

    fn title(&self) -> String {
        format!("{}: {}", self.violation_type, self.description)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.violation_type.as_str(),
            self.description.as_str(),
            self.assigned_to.as_str(),
        ]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.status.as_str()),
            Facet::Type => Some(&self.violation_type),
            Facet::Severity => Some(&self.severity),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::PolicyViolation(record)
    }
}

impl Triage for PolicyViolation {
    fn phase(&self) -> Phase {
        match self.status {
            ViolationStatus::Open => Phase::Open,
            ViolationStatus::InProgress => Phase::Acknowledged,
            ViolationStatus::Resolved => Phase::Resolved,
            ViolationStatus::Closed => Phase::Dismissed,
        }
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }

    fn transition_patch(&self, transition: Transition, at: DateTime<Utc>) -> Result<Patch<Self>> {
        let status = match self.next_phase(transition)? {
            Phase::Open => ViolationStatus::Open,
            Phase::Acknowledged => ViolationStatus::InProgress,
            Phase::Resolved => ViolationStatus::Resolved,
            Phase::Dismissed => ViolationStatus::Closed,
        };
        let mut patch = Patch::new().set("status", status.as_str());
        if status == ViolationStatus::Resolved {
            patch.insert(
                "resolvedDate",
                at.date_naive().format("%Y-%m-%d").to_string(),
            );
        }
        Ok(patch)
    }
}

/// A repair or service event for an asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceRecord {
    /// Serviced asset
    pub asset_id: Option<EntityId>,
    /// Date of the event
    #[serde(with = "crate::json::day")]
    pub date: Option<NaiveDate>,
    /// Kind of maintenance (Preventive, Repair, ...)
    pub maintenance_type: String,
    /// What was done
    pub description: String,
    /// Cost
    pub cost: Option<f64>,
    /// Service vendor
    pub vendor: String,
    /// Technician
    pub technician: String,
    /// Status (Scheduled, In Progress, Completed, ...)
    pub status: String,
    /// Planned date
    #[serde(with = "crate::json::day")]
    pub scheduled_date: Option<NaiveDate>,
    /// Completion date
    #[serde(with = "crate::json::day")]
    pub completed_date: Option<NaiveDate>,
    /// Follow-up date
    #[serde(with = "crate::json::day")]
    pub next_maintenance_date: Option<NaiveDate>,
    /// Parts consumed
    pub parts_used: Vec<String>,
    /// Linked incident
    pub incident_id: String,
}

impl MaintenanceRecord {
    /// Returns `true` for records still waiting to happen.
    pub fn is_scheduled(&self) -> bool {
        self.status.eq_ignore_ascii_case("scheduled")
    }
}

impl Entity for MaintenanceRecord {
    const KIND: EntityKind = EntityKind::MaintenanceRecord;

    const FIELDS: &'static [Field] = &[
        Field::new("assetId", "asset_id"),
        Field::same("date"),
        Field::new("maintenanceType", "type"),
        Field::same("description"),
        Field::same("cost"),
        Field::same("vendor"),
        Field::same("technician"),
        Field::same("status"),
        Field::new("scheduledDate", "scheduled_date"),
        Field::new("completedDate", "completed_date"),
        Field::new("nextMaintenanceDate", "next_maintenance_date"),
        Field::new("partsUsed", "parts_used"),
        Field::new("incidentId", "incident_id"),
    ];

    const REQUIRED: &'static [&'static str] = &["description"];

    fn title(&self) -> String {
        format!("{} ({})", self.description, self.status)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.description.as_str(),
            self.vendor.as_str(),
            self.technician.as_str(),
        ]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(&self.status),
            Facet::Type => Some(&self.maintenance_type),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::MaintenanceRecord(record)
    }
}
