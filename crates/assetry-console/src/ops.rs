//! Feature operations layered on the generic CRUD: imports, integration
//! sync, report runs, kit resolution and maintenance history.

use assetry_core::model::{
    Accessory, Asset, Consumable, ImportRecord, ImportStatus, Integration, Kit, License,
    MaintenanceRecord, Report,
};
use assetry_core::{EntityId, EntityKind, Patch, Record};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::console::Console;
use crate::stores::{Stores, Tracked};
use crate::Result;

/// What an import run produced, as reported by the importer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows written
    pub processed: i64,
    /// Rows seen
    pub total: i64,
    /// Per-row error messages
    pub errors: Vec<String>,
}

impl ImportSummary {
    /// Final status for this summary: failed only when nothing was
    /// processed and errors were reported.
    pub fn status(&self) -> ImportStatus {
        if self.processed == 0 && !self.errors.is_empty() {
            ImportStatus::Failed
        } else {
            ImportStatus::Completed
        }
    }
}

/// A kit's id lists resolved against the stores.
#[derive(Debug, Clone, Default)]
pub struct KitContents {
    /// Assets found
    pub assets: Vec<Record<Asset>>,
    /// Accessories found
    pub accessories: Vec<Record<Accessory>>,
    /// Licenses found
    pub licenses: Vec<Record<License>>,
    /// Consumables found
    pub consumables: Vec<Record<Consumable>>,
    /// Ids that no longer resolve, with the kind they were listed as
    pub dangling: Vec<(EntityKind, EntityId)>,
}

impl KitContents {
    /// Resolved member count.
    pub fn resolved(&self) -> usize {
        self.assets.len() + self.accessories.len() + self.licenses.len() + self.consumables.len()
    }
}

fn resolve<E: Tracked>(
    stores: &Stores,
    ids: &[EntityId],
    dangling: &mut Vec<(EntityKind, EntityId)>,
) -> Vec<Record<E>> {
    let store = stores.of::<E>();
    let mut found = Vec::with_capacity(ids.len());
    for id in ids {
        match store.get(id) {
            Some(record) => found.push(record.clone()),
            None => dangling.push((E::KIND, id.clone())),
        }
    }
    found
}

impl Console {
    /// Records the start of an import run.
    pub async fn begin_import(
        &self,
        file_name: impl Into<String>,
        import_type: impl Into<String>,
    ) -> Result<Record<ImportRecord>> {
        let record = ImportRecord {
            file_name: file_name.into(),
            import_type: import_type.into(),
            status: ImportStatus::Processing,
            import_date: Some(Utc::now()),
            ..ImportRecord::default()
        };
        let created = self.create(record).await?;
        tracing::info!(id = %created.id, file = %created.file_name, "Import started");
        Ok(created)
    }

    /// Records the outcome of an import run.
    pub async fn finish_import(&self, id: &EntityId, summary: &ImportSummary) -> Result<ImportStatus> {
        let status = summary.status();
        let patch = Patch::<ImportRecord>::new()
            .set("status", status.as_str())
            .set("recordsProcessed", summary.processed)
            .set("totalRecords", summary.total)
            .set("errors", json!(summary.errors));
        self.update(id, &patch).await?;
        tracing::info!(
            %id,
            %status,
            processed = summary.processed,
            total = summary.total,
            errors = summary.errors.len(),
            "Import finished"
        );
        Ok(status)
    }

    /// Stamps an integration as synced now.
    pub async fn sync_integration(&self, id: &EntityId) -> Result<DateTime<Utc>> {
        let now = Utc::now();
        let patch = Patch::<Integration>::new().set("lastSync", now.to_rfc3339());
        self.update(id, &patch).await?;
        tracing::info!(%id, "Integration synced");
        Ok(now)
    }

    /// Stamps a report as run now.
    pub async fn run_report(&self, id: &EntityId) -> Result<DateTime<Utc>> {
        let now = Utc::now();
        let patch = Patch::<Report>::new().set("lastRun", now.to_rfc3339());
        self.update(id, &patch).await?;
        tracing::info!(%id, "Report run");
        Ok(now)
    }

    /// Resolves a kit's members. Ids of deleted records are reported in
    /// [`KitContents::dangling`], never removed from the kit.
    pub async fn kit_contents(&self, id: &EntityId) -> Result<KitContents> {
        let kit = self.require::<Kit>(id).await?;
        let contents = self
            .read(|stores| {
                let mut dangling = Vec::new();
                let assets = resolve::<Asset>(stores, &kit.assets, &mut dangling);
                let accessories = resolve::<Accessory>(stores, &kit.accessories, &mut dangling);
                let licenses = resolve::<License>(stores, &kit.licenses, &mut dangling);
                let consumables = resolve::<Consumable>(stores, &kit.consumables, &mut dangling);
                KitContents {
                    assets,
                    accessories,
                    licenses,
                    consumables,
                    dangling,
                }
            })
            .await;
        if !contents.dangling.is_empty() {
            tracing::debug!(%id, dangling = contents.dangling.len(), "Kit lists missing records");
        }
        Ok(contents)
    }

    /// Maintenance records filed against one asset, in store order.
    pub async fn maintenance_history(&self, asset_id: &EntityId) -> Vec<Record<MaintenanceRecord>> {
        self.read(|stores| {
            stores
                .maintenance_records
                .iter()
                .filter(|record| record.asset_id.as_ref() == Some(asset_id))
                .cloned()
                .collect()
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_status() {
        let ok = ImportSummary {
            processed: 10,
            total: 12,
            errors: vec!["row 4: bad tag".into()],
        };
        assert_eq!(ok.status(), ImportStatus::Completed);

        let failed = ImportSummary {
            processed: 0,
            total: 3,
            errors: vec!["bad header".into()],
        };
        assert_eq!(failed.status(), ImportStatus::Failed);

        assert_eq!(ImportSummary::default().status(), ImportStatus::Completed);
    }
}
