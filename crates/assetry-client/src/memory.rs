//! In-process store with the same contract as the REST store.

use assetry_core::EntityId;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

use crate::remote::RemoteStore;
use crate::{Error, Result};

type Table = Vec<Map<String, Value>>;

/// In-memory tables that assign ids and timestamps like the real store.
///
/// Can be switched offline to simulate an outage; every attempted call is
/// counted either way.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, Table>>,
    available: AtomicBool,
    calls: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty, available store.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(BTreeMap::new()),
            available: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    /// Adds rows to `table` verbatim, filling in id and timestamps where
    /// missing. Does not count as a call.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Value>) {
        let mut tables = self.lock();
        let entries = tables.entry(table.to_string()).or_default();
        for row in rows {
            let Value::Object(mut row) = row else {
                continue;
            };
            let now = now();
            row.entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            row.entry("created_at").or_insert_with(|| now.clone());
            row.entry("updated_at").or_insert(now);
            entries.push(row);
        }
    }

    /// Simulates the store going down or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns `true` while the store answers requests.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Number of operations attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of one table's rows.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock()
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Table>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Counts the call and fails when offline.
    fn begin(&self, op: &str, table: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.is_available() {
            Ok(())
        } else {
            tracing::debug!(op, table, "Memory store offline");
            Err(Error::Unavailable(format!("{op} {table}: store is offline")))
        }
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Compares ids the way [`stamp_from_row`](crate::wire::stamp_from_row)
/// reads them, so numeric ids match their string form.
fn matches_id(row: &Map<String, Value>, id: &EntityId) -> bool {
    match row.get("id") {
        Some(Value::String(value)) => value == id.as_str(),
        Some(Value::Number(n)) => n.to_string() == id.as_str(),
        _ => false,
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select(&self, table: &str) -> Result<Vec<Value>> {
        self.begin("select", table)?;
        Ok(self.rows(table))
    }

    async fn select_one(&self, table: &str, id: &EntityId) -> Result<Option<Value>> {
        self.begin("select", table)?;
        Ok(self.lock().get(table).and_then(|rows| {
            rows.iter()
                .find(|row| matches_id(row, id))
                .cloned()
                .map(Value::Object)
        }))
    }

    async fn insert(&self, table: &str, mut row: Map<String, Value>) -> Result<Value> {
        self.begin("insert", table)?;
        let now = now();
        row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        row.insert("created_at".into(), now.clone());
        row.insert("updated_at".into(), now);
        self.lock()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(Value::Object(row))
    }

    async fn update(
        &self,
        table: &str,
        id: &EntityId,
        changes: Map<String, Value>,
    ) -> Result<Value> {
        self.begin("update", table)?;
        let mut tables = self.lock();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| matches_id(row, id)))
            .ok_or_else(|| Error::not_found(table, id.as_str()))?;
        for (column, value) in changes {
            if !matches!(column.as_str(), "id" | "created_at" | "updated_at") {
                row.insert(column, value);
            }
        }
        row.insert("updated_at".into(), now());
        Ok(Value::Object(row.clone()))
    }

    async fn delete(&self, table: &str, id: &EntityId) -> Result<()> {
        self.begin("delete", table)?;
        if let Some(rows) = self.lock().get_mut(table) {
            rows.retain(|row| !matches_id(row, id));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
