//! Translation between the wire shape (snake_case columns) and the UI shape
//! (camelCase, nested convenience objects).
//!
//! Only this module knows wire names. Everything above the gateway works
//! with [`Record<E>`] and [`Patch<E>`] in UI naming.

use assetry_core::json::{get_path, parse_moment, set_path};
use assetry_core::{Entity, EntityId, Error, Patch, Record, Result, Stamp};
use serde_json::{Map, Value};

/// Converts UI fields into a wire row holding every translated column.
///
/// Synthesized UI-only fields are dropped.
pub fn to_wire<E: Entity>(fields: &E) -> Result<Map<String, Value>> {
    let ui = serde_json::to_value(fields)?;
    let mut row = Map::with_capacity(E::FIELDS.len());
    for field in E::FIELDS {
        let value = get_path(&ui, field.ui).cloned().unwrap_or(Value::Null);
        row.insert(field.wire.to_string(), value);
    }
    Ok(row)
}

/// Converts a UI-named patch into a wire-named partial row.
///
/// Fails on any key the entity does not translate.
pub fn patch_to_wire<E: Entity>(patch: &Patch<E>) -> Result<Map<String, Value>> {
    patch.validate()?;
    let mut row = Map::with_capacity(patch.len());
    for (ui, value) in patch.iter() {
        let field = E::field(ui).ok_or_else(|| Error::UnknownField {
            kind: E::KIND,
            field: ui.to_string(),
        })?;
        row.insert(field.wire.to_string(), value.clone());
    }
    Ok(row)
}

/// Reads the store-maintained id and timestamps from a wire row.
pub fn stamp_from_row(row: &Value) -> Result<Stamp> {
    let object = row
        .as_object()
        .ok_or_else(|| Error::malformed("row is not a JSON object"))?;

    let id = match object.get("id") {
        Some(Value::String(id)) if !id.is_empty() => EntityId::new(id.clone()),
        Some(Value::Number(n)) => EntityId::new(n.to_string()),
        _ => return Err(Error::malformed("row has no id")),
    };

    let timestamp = |column: &str| {
        object
            .get(column)
            .and_then(Value::as_str)
            .and_then(parse_moment)
            .ok_or_else(|| Error::malformed(format!("row '{id}' has no valid {column}")))
    };

    Ok(Stamp {
        created_at: timestamp("created_at")?,
        updated_at: timestamp("updated_at")?,
        id,
    })
}

/// Converts a wire row into a UI-shaped record.
///
/// Null columns are skipped so the entity's defaults apply; UI-only
/// fields are then synthesized from the row and its stamp.
pub fn from_wire<E: Entity>(row: Value) -> Result<Record<E>> {
    let stamp = stamp_from_row(&row)?;
    let mut ui = Value::Object(Map::new());
    for field in E::FIELDS {
        match row.get(field.wire) {
            None | Some(Value::Null) => {}
            Some(value) => set_path(&mut ui, field.ui, value.clone())?,
        }
    }
    let mut fields: E = serde_json::from_value(ui).map_err(|err| {
        Error::malformed(format!("{} row '{}': {err}", E::KIND, stamp.id))
    })?;
    fields.synthesize(&stamp);
    Ok(Record::new(stamp, fields))
}

/// Builds a local record from submitted fields and the row the store echoed
/// back on insert.
pub fn merge_created<E: Entity>(mut fields: E, stored: &Value) -> Result<Record<E>> {
    let stamp = stamp_from_row(stored)?;
    fields.synthesize(&stamp);
    Ok(Record::new(stamp, fields))
}
