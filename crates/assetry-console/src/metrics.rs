//! Read-side aggregations over the stores.
//!
//! Every function here is pure: it takes the stores and a clock reading and
//! never writes back. Percentages are `100.0` when their denominator is zero.

use assetry_core::model::{AlertStatus, Asset, ComplianceStatus};
use assetry_core::{EntityId, EntityKind};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::console::Console;
use crate::stores::Stores;

/// Days ahead counted as "due soon" or "expiring".
pub const WINDOW_DAYS: i64 = 30;

/// `part / whole * 100`, or `100.0` when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        100.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn horizon(now: DateTime<Utc>) -> NaiveDate {
    (now + Duration::days(WINDOW_DAYS)).date_naive()
}

fn due(date: Option<NaiveDate>, by: NaiveDate) -> bool {
    date.is_some_and(|d| d <= by)
}

// ============================================================================
// Dashboard
// ============================================================================

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Record count per kind
    pub counts: BTreeMap<EntityKind, usize>,
    /// Alerts still in `active`
    pub active_alerts: usize,
    /// Assets whose warranty ends within the window (or already ended)
    pub expiring_warranties: usize,
    /// Licenses that expire within the window (or already expired)
    pub expiring_licenses: usize,
    /// Assets and scheduled maintenance falling due within the window
    pub maintenance_due: usize,
    /// Non-compliant checks plus open violations
    pub compliance_issues: usize,
    /// Sum of asset, license, accessory and component cost
    pub total_value: f64,
}

impl Dashboard {
    /// Computes the dashboard at `now`.
    pub fn compute(stores: &Stores, now: DateTime<Utc>) -> Self {
        let by = horizon(now);
        let counts = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, stores.count(kind)))
            .collect();

        let maintenance_due = stores
            .assets
            .iter()
            .filter(|a| due(a.next_maintenance_date, by))
            .count()
            + stores
                .maintenance_records
                .iter()
                .filter(|m| m.is_scheduled() && due(m.scheduled_date, by))
                .count();

        let compliance_issues = stores
            .compliance_checks
            .iter()
            .filter(|c| c.status == ComplianceStatus::NonCompliant)
            .count()
            + stores.policy_violations.iter().filter(|v| v.is_open()).count();

        Self {
            counts,
            active_alerts: stores
                .alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Active)
                .count(),
            expiring_warranties: stores
                .assets
                .iter()
                .filter(|a| due(a.warranty_expiry, by))
                .count(),
            expiring_licenses: stores
                .licenses
                .iter()
                .filter(|l| due(l.expiry_date, by))
                .count(),
            maintenance_due,
            compliance_issues,
            total_value: Financial::compute(stores, now).total_value,
        }
    }
}

// ============================================================================
// Financial
// ============================================================================

/// Estate value breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    /// Sum of asset purchase cost
    pub asset_value: f64,
    /// Sum of license cost
    pub license_value: f64,
    /// Sum of accessory purchase cost
    pub accessory_value: f64,
    /// Sum of component purchase cost
    pub component_value: f64,
    /// The four values above, added
    pub total_value: f64,
    /// Straight-line book value of assets today
    pub depreciated_asset_value: f64,
    /// Sum of maintenance cost
    pub maintenance_spend: f64,
    /// Asset purchase cost per category
    pub value_by_category: BTreeMap<String, f64>,
}

impl Financial {
    /// Computes the breakdown at `now`.
    pub fn compute(stores: &Stores, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let asset_value = stores.assets.iter().map(|a| a.cost()).sum::<f64>();
        let license_value = stores
            .licenses
            .iter()
            .map(|l| l.cost.unwrap_or(0.0))
            .sum::<f64>();
        let accessory_value = stores
            .accessories
            .iter()
            .map(|a| a.purchase_cost.unwrap_or(0.0))
            .sum::<f64>();
        let component_value = stores
            .components
            .iter()
            .map(|c| c.purchase_cost.unwrap_or(0.0))
            .sum::<f64>();

        let mut value_by_category = BTreeMap::new();
        for asset in &stores.assets {
            *value_by_category
                .entry(asset.category.clone())
                .or_insert(0.0) += asset.cost();
        }

        Self {
            asset_value,
            license_value,
            accessory_value,
            component_value,
            total_value: asset_value + license_value + accessory_value + component_value,
            depreciated_asset_value: stores
                .assets
                .iter()
                .map(|a| book_value(a, today))
                .sum(),
            maintenance_spend: stores
                .maintenance_records
                .iter()
                .map(|m| m.cost.unwrap_or(0.0))
                .sum(),
            value_by_category,
        }
    }
}

/// Straight-line book value of one asset on `today`.
///
/// Without a purchase date the asset is valued at cost.
pub fn book_value(asset: &Asset, today: NaiveDate) -> f64 {
    let cost = asset.cost();
    let plan = &asset.depreciation;
    let Some(bought) = asset.purchase_date else {
        return cost;
    };
    if plan.useful_life == 0 {
        return plan.salvage_value.min(cost);
    }
    let years = (today - bought).num_days().max(0) as f64 / 365.25;
    let lost = (cost - plan.salvage_value) * years / f64::from(plan.useful_life);
    (cost - lost).max(plan.salvage_value.min(cost))
}

// ============================================================================
// Analytics
// ============================================================================

/// A consumable at or below its reorder threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStock {
    /// Consumable id
    pub id: EntityId,
    /// Name
    pub name: String,
    /// Units on hand
    pub quantity: i64,
    /// Reorder threshold
    pub min_quantity: i64,
}

/// Distribution and utilisation figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Asset count per status
    pub assets_by_status: BTreeMap<String, usize>,
    /// Asset count per category
    pub assets_by_category: BTreeMap<String, usize>,
    /// Assets with an assignee
    pub assigned_assets: usize,
    /// Assigned share of all assets, in percent
    pub assignment_utilisation: f64,
    /// Seats across all licenses
    pub total_seats: i64,
    /// Seats in use across all licenses
    pub used_seats: i64,
    /// Used share of all seats, in percent
    pub seat_utilisation: f64,
    /// Consumables to reorder
    pub low_stock: Vec<LowStock>,
}

impl Analytics {
    /// Computes the figures.
    pub fn compute(stores: &Stores) -> Self {
        let mut assets_by_status = BTreeMap::new();
        let mut assets_by_category = BTreeMap::new();
        for asset in &stores.assets {
            *assets_by_status.entry(asset.status.clone()).or_insert(0) += 1;
            *assets_by_category.entry(asset.category.clone()).or_insert(0) += 1;
        }
        let assigned_assets = stores
            .assets
            .iter()
            .filter(|a| a.assigned_to.is_some())
            .count();

        let total_seats = stores.licenses.iter().map(|l| l.seats.max(0)).sum::<i64>();
        let used_seats = stores
            .licenses
            .iter()
            .map(|l| l.used_seats().max(0))
            .sum::<i64>();

        let low_stock = stores
            .consumables
            .iter()
            .filter(|c| c.is_low_stock())
            .map(|c| LowStock {
                id: c.id.clone(),
                name: c.name.clone(),
                quantity: c.quantity,
                min_quantity: c.min_quantity,
            })
            .collect();

        Self {
            assets_by_status,
            assets_by_category,
            assigned_assets,
            assignment_utilisation: percent(assigned_assets, stores.assets.len()),
            total_seats,
            used_seats,
            seat_utilisation: percent(used_seats as usize, total_seats as usize),
            low_stock,
        }
    }
}

// ============================================================================
// Compliance
// ============================================================================

/// Compliance posture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    /// All checks
    pub total_checks: usize,
    /// Checks passing
    pub compliant: usize,
    /// Checks failing
    pub non_compliant: usize,
    /// Checks not yet audited
    pub pending: usize,
    /// `compliant / total * 100`, 100 with no checks
    pub score: f64,
    /// Open or in-progress violations per severity
    pub open_violations: BTreeMap<String, usize>,
    /// Checks whose next run is due
    pub checks_due: usize,
}

impl Compliance {
    /// Computes the posture at `now`.
    pub fn compute(stores: &Stores, now: DateTime<Utc>) -> Self {
        let count = |status: ComplianceStatus| {
            stores
                .compliance_checks
                .iter()
                .filter(|c| c.status == status)
                .count()
        };
        let total_checks = stores.compliance_checks.len();
        let compliant = count(ComplianceStatus::Compliant);

        let mut open_violations = BTreeMap::new();
        for violation in stores.policy_violations.iter().filter(|v| v.is_open()) {
            *open_violations
                .entry(violation.severity.clone())
                .or_insert(0) += 1;
        }

        Self {
            total_checks,
            compliant,
            non_compliant: count(ComplianceStatus::NonCompliant),
            pending: count(ComplianceStatus::Pending),
            score: percent(compliant, total_checks),
            open_violations,
            checks_due: stores
                .compliance_checks
                .iter()
                .filter(|c| c.next_check.is_some_and(|at| at <= now))
                .count(),
        }
    }
}

impl Console {
    /// Dashboard as of now.
    pub async fn dashboard(&self) -> Dashboard {
        let now = Utc::now();
        self.read(|stores| Dashboard::compute(stores, now)).await
    }

    /// Financial breakdown as of now.
    pub async fn financial(&self) -> Financial {
        let now = Utc::now();
        self.read(|stores| Financial::compute(stores, now)).await
    }

    /// Analytics over the current stores.
    pub async fn analytics(&self) -> Analytics {
        self.read(Analytics::compute).await
    }

    /// Compliance posture as of now.
    pub async fn compliance(&self) -> Compliance {
        let now = Utc::now();
        self.read(|stores| Compliance::compute(stores, now)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assetry_core::model::{
        ComplianceCheck, Consumable, License, MaintenanceRecord, PolicyViolation, ViolationStatus,
    };
    use assetry_core::{Record, Stamp};
    use assetry_storage::{CacheBackend, MemoryCache};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rec<E>(id: &str, fields: E) -> Record<E> {
        Record::new(
            Stamp {
                id: EntityId::new(id),
                created_at: now(),
                updated_at: now(),
            },
            fields,
        )
    }

    fn stores() -> Stores {
        let cache: Arc<dyn CacheBackend> = Arc::new(MemoryCache::new());
        Stores::load(&cache)
    }

    #[test]
    fn test_percent_of_nothing_is_full() {
        assert_eq!(percent(0, 0), 100.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn test_empty_estate() {
        let stores = stores();
        let dashboard = Dashboard::compute(&stores, now());
        assert_eq!(dashboard.total_value, 0.0);
        assert_eq!(dashboard.counts[&EntityKind::Asset], 0);
        assert_eq!(Compliance::compute(&stores, now()).score, 100.0);
        let analytics = Analytics::compute(&stores);
        assert_eq!(analytics.seat_utilisation, 100.0);
        assert_eq!(analytics.assignment_utilisation, 100.0);
    }

    #[test]
    fn test_total_value_counts_missing_cost_as_zero() {
        let mut stores = stores();
        stores.assets.append(rec(
            "a-1",
            Asset {
                name: "Laptop-01".into(),
                tag: "A-1001".into(),
                purchase_cost: Some(1000.0),
                ..Asset::default()
            },
        ));
        stores.assets.append(rec(
            "a-2",
            Asset {
                name: "Laptop-02".into(),
                tag: "A-1002".into(),
                ..Asset::default()
            },
        ));
        stores.licenses.append(rec(
            "l-1",
            License {
                name: "Office".into(),
                cost: Some(250.5),
                ..License::default()
            },
        ));
        let financial = Financial::compute(&stores, now());
        assert_eq!(financial.total_value, 1250.5);
        assert_eq!(Dashboard::compute(&stores, now()).total_value, 1250.5);
    }

    #[test]
    fn test_expiry_window_includes_past_and_next_thirty_days() {
        let mut stores = stores();
        for (id, expiry) in [("l-1", "2024-05-01"), ("l-2", "2024-07-01"), ("l-3", "2024-07-02")] {
            stores.licenses.append(rec(
                id,
                License {
                    name: id.into(),
                    expiry_date: Some(day(expiry)),
                    ..License::default()
                },
            ));
        }
        stores.licenses.append(rec("l-4", License::default()));
        assert_eq!(Dashboard::compute(&stores, now()).expiring_licenses, 2);
    }

    #[test]
    fn test_maintenance_due_counts_assets_and_scheduled_records() {
        let mut stores = stores();
        stores.assets.append(rec(
            "a-1",
            Asset {
                next_maintenance_date: Some(day("2024-06-10")),
                ..Asset::default()
            },
        ));
        stores.maintenance_records.append(rec(
            "m-1",
            MaintenanceRecord {
                status: "Scheduled".into(),
                scheduled_date: Some(day("2024-06-20")),
                ..MaintenanceRecord::default()
            },
        ));
        stores.maintenance_records.append(rec(
            "m-2",
            MaintenanceRecord {
                status: "Completed".into(),
                scheduled_date: Some(day("2024-06-20")),
                cost: Some(80.0),
                ..MaintenanceRecord::default()
            },
        ));
        assert_eq!(Dashboard::compute(&stores, now()).maintenance_due, 2);
        assert_eq!(Financial::compute(&stores, now()).maintenance_spend, 80.0);
    }

    #[test]
    fn test_compliance_score_and_issues() {
        let mut stores = stores();
        for (id, status) in [
            ("c-1", ComplianceStatus::Compliant),
            ("c-2", ComplianceStatus::Compliant),
            ("c-3", ComplianceStatus::NonCompliant),
            ("c-4", ComplianceStatus::Pending),
        ] {
            stores.compliance_checks.append(rec(
                id,
                ComplianceCheck {
                    check_type: "Audit".into(),
                    status,
                    next_check: Some(now() - Duration::days(1)),
                    ..ComplianceCheck::default()
                },
            ));
        }
        for (id, status) in [
            ("v-1", ViolationStatus::Open),
            ("v-2", ViolationStatus::InProgress),
            ("v-3", ViolationStatus::Closed),
        ] {
            stores.policy_violations.append(rec(
                id,
                PolicyViolation {
                    severity: "High".into(),
                    status,
                    ..PolicyViolation::default()
                },
            ));
        }

        let compliance = Compliance::compute(&stores, now());
        assert_eq!(compliance.score, 50.0);
        assert_eq!(compliance.open_violations["High"], 2);
        assert_eq!(compliance.checks_due, 4);
        assert_eq!(Dashboard::compute(&stores, now()).compliance_issues, 3);
    }

    #[test]
    fn test_low_stock_and_seats() {
        let mut stores = stores();
        stores.consumables.append(rec(
            "c-1",
            Consumable {
                name: "Toner".into(),
                quantity: 2,
                min_quantity: 5,
                ..Consumable::default()
            },
        ));
        stores.consumables.append(rec(
            "c-2",
            Consumable {
                name: "Cables".into(),
                quantity: 50,
                min_quantity: 5,
                ..Consumable::default()
            },
        ));
        stores.licenses.append(rec(
            "l-1",
            License {
                seats: 10,
                available_seats: 4,
                ..License::default()
            },
        ));
        let analytics = Analytics::compute(&stores);
        assert_eq!(analytics.low_stock.len(), 1);
        assert_eq!(analytics.low_stock[0].name, "Toner");
        assert_eq!(analytics.used_seats, 6);
        assert_eq!(analytics.seat_utilisation, 60.0);
    }

    #[test]
    fn test_book_value_is_straight_line() {
        let asset = Asset {
            purchase_cost: Some(1000.0),
            purchase_date: Some(day("2020-01-01")),
            ..Asset::default()
        };
        let half_life = day("2022-07-02");
        let value = book_value(&asset, half_life);
        assert!((value - 500.0).abs() < 1.0, "{value}");
        assert_eq!(book_value(&asset, day("2030-01-01")), 0.0);
        assert_eq!(book_value(&Asset::default(), half_life), 0.0);
    }
}
