//! Integrations, import runs and saved reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::any::AnyRecord;
use crate::entity::{Entity, Field};
use crate::types::{EntityKind, Facet, Record};

vocabulary! {
    /// State of an import run.
    ImportStatus {
        /// Still running
        Processing => "processing",
        /// Finished
        Completed => "completed",
        /// Nothing could be imported
        Failed => "failed",
    } default Processing
}

/// A connection to an external system (HR, MDM, ticketing).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Integration {
    /// Display name
    pub name: String,
    /// Connector type
    pub integration_type: String,
    /// Endpoint URL
    pub endpoint: String,
    /// Credential for the endpoint
    pub api_key: String,
    /// When the last sync ran
    #[serde(with = "crate::json::moment")]
    pub last_sync: Option<DateTime<Utc>>,
    /// Sync cadence label (hourly, daily, ...)
    pub sync_frequency: String,
    /// Connection status
    pub status: String,
    /// Field mappings
    pub mappings: Value,
    /// Recent errors
    pub error_log: Value,
}

impl Entity for Integration {
    const KIND: EntityKind = EntityKind::Integration;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::new("integrationType", "type"),
        Field::same("endpoint"),
        Field::new("apiKey", "api_key"),
        Field::new("lastSync", "last_sync"),
        Field::new("syncFrequency", "sync_frequency"),
        Field::same("status"),
        Field::same("mappings"),
        Field::new("errorLog", "error_log"),
    ];

    const REQUIRED: &'static [&'static str] = &["name", "endpoint", "apiKey"];

    fn title(&self) -> String {
        format!("{} ({})", self.name, self.endpoint)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.endpoint.as_str(), self.integration_type.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(&self.status),
            Facet::Type => Some(&self.integration_type),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Integration(record)
    }
}

/// Summary of one bulk import run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRecord {
    /// Imported file name
    pub file_name: String,
    /// Target collection (assets, licenses, ...)
    pub import_type: String,
    /// Run state
    pub status: ImportStatus,
    /// Rows imported
    pub records_processed: i64,
    /// Rows in the file
    pub total_records: i64,
    /// Per-row error messages
    pub errors: Vec<String>,
    /// When the run started
    #[serde(with = "crate::json::moment")]
    pub import_date: Option<DateTime<Utc>>,
}

impl Entity for ImportRecord {
    const KIND: EntityKind = EntityKind::ImportRecord;

    const FIELDS: &'static [Field] = &[
        Field::new("fileName", "file_name"),
        Field::new("importType", "type"),
        Field::same("status"),
        Field::new("recordsProcessed", "records_processed"),
        Field::new("totalRecords", "total_records"),
        Field::same("errors"),
        Field::new("importDate", "import_date"),
    ];

    const REQUIRED: &'static [&'static str] = &["fileName"];

    fn title(&self) -> String {
        format!(
            "{} ({}/{} {})",
            self.file_name, self.records_processed, self.total_records, self.status
        )
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.file_name.as_str(), self.import_type.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.status.as_str()),
            Facet::Type => Some(&self.import_type),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::ImportRecord(record)
    }
}

/// A saved report definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    /// Display name
    pub name: String,
    /// Report type (inventory, financial, ...)
    pub report_type: String,
    /// Description
    pub description: String,
    /// Report parameters
    pub parameters: Value,
    /// When it last ran
    #[serde(with = "crate::json::moment")]
    pub last_run: Option<DateTime<Utc>>,
    /// Author
    pub created_by: String,
}

impl Entity for Report {
    const KIND: EntityKind = EntityKind::Report;

    const FIELDS: &'static [Field] = &[
        Field::same("name"),
        Field::new("reportType", "type"),
        Field::same("description"),
        Field::same("parameters"),
        Field::new("lastRun", "last_run"),
        Field::new("createdBy", "created_by"),
    ];

    const REQUIRED: &'static [&'static str] = &["name"];

    fn title(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str(), self.created_by.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Type => Some(&self.report_type),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Report(record)
    }
}
