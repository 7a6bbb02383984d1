//! The record envelope: store-assigned identity and timestamps around a
//! UI-shaped field set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::types::EntityId;

/// Identity and timestamps assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    /// Store-assigned id
    pub id: EntityId,

    /// When the store created the row
    pub created_at: DateTime<Utc>,

    /// When the store last updated the row
    pub updated_at: DateTime<Utc>,
}

/// A persisted record of entity type `E`.
///
/// Serializes flat, in UI naming: `{"id", "createdAt", "updatedAt", ..fields}`.
/// Dereferences to the field set so `record.name` reads naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<E> {
    /// Store-assigned id, immutable after creation
    pub id: EntityId,

    /// Creation timestamp (store-maintained)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (store-maintained)
    pub updated_at: DateTime<Utc>,

    /// The entity's own fields
    #[serde(flatten)]
    pub fields: E,
}

impl<E> Record<E> {
    /// Builds a record from a store stamp and a field set.
    pub fn new(stamp: Stamp, fields: E) -> Self {
        Self {
            id: stamp.id,
            created_at: stamp.created_at,
            updated_at: stamp.updated_at,
            fields,
        }
    }

    /// Returns the record id.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns a copy of the store stamp.
    pub fn stamp(&self) -> Stamp {
        Stamp {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Splits the record into its stamp and fields.
    pub fn into_parts(self) -> (Stamp, E) {
        (
            Stamp {
                id: self.id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.fields,
        )
    }
}

impl<E> Deref for Record<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl<E> DerefMut for Record<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::License;

    fn stamp() -> Stamp {
        let at = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Stamp {
            id: EntityId::new("lic-1"),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_record_serializes_flat_in_camel_case() {
        let record = Record::new(
            stamp(),
            License {
                name: "Office".to_string(),
                available_seats: 3,
                ..License::default()
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "lic-1");
        assert_eq!(json["createdAt"], "2024-03-01T10:00:00Z");
        assert_eq!(json["name"], "Office");
        assert_eq!(json["availableSeats"], 3);
    }

    #[test]
    fn test_record_roundtrips_through_cache_json() {
        let record = Record::new(stamp(), License::default());
        let json = serde_json::to_string(&record).unwrap();
        let back: Record<License> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_derefs_to_fields() {
        let mut record = Record::new(stamp(), License::default());
        record.name = "Renamed".to_string();
        assert_eq!(record.fields.name, "Renamed");
        let (parts, fields) = record.into_parts();
        assert_eq!(parts, stamp());
        assert_eq!(fields.name, "Renamed");
    }
}
