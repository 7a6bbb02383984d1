//! The [`Entity`] trait: what every tracked record kind provides.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::any::AnyRecord;
use crate::error::{Error, Result};
use crate::json::{get_path, is_blank};
use crate::types::{EntityKind, Facet, Patch, Phase, Record, Stamp, Transition};

/// One row of an entity's translation table.
///
/// `ui` is the camelCase (possibly dotted) path in the UI shape; `wire` is
/// the snake_case column in the remote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// UI field path
    pub ui: &'static str,
    /// Wire column name
    pub wire: &'static str,
}

impl Field {
    /// A field whose UI path and wire column differ.
    pub const fn new(ui: &'static str, wire: &'static str) -> Self {
        Self { ui, wire }
    }

    /// A field named identically in both shapes.
    pub const fn same(name: &'static str) -> Self {
        Self {
            ui: name,
            wire: name,
        }
    }
}

/// A tracked record kind, in UI shape.
///
/// Implementors are plain data: a `Default` draft, serde in camelCase, and
/// the constant tables the generic gateway, form and list controllers need.
pub trait Entity:
    Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Which kind this is.
    const KIND: EntityKind;

    /// Fields persisted in the remote table. Anything else in the UI shape is
    /// synthesized client-side and never sent.
    const FIELDS: &'static [Field];

    /// UI paths that must be non-blank before a form may submit.
    const REQUIRED: &'static [&'static str];

    /// One-line label for lists and prompts.
    fn title(&self) -> String;

    /// Text fields matched by the free-text search box.
    fn search_text(&self) -> Vec<&str>;

    /// Value of a discrete filter facet, if this kind exposes it.
    fn facet(&self, facet: Facet) -> Option<&str> {
        let _ = facet;
        None
    }

    /// Fills UI-only convenience fields after a record is read from the wire.
    fn synthesize(&mut self, stamp: &Stamp) {
        let _ = stamp;
    }

    /// Wraps a record into the tagged union.
    fn into_any(record: Record<Self>) -> AnyRecord;

    /// Looks up a translated field by UI path.
    fn field(ui: &str) -> Option<&'static Field> {
        Self::FIELDS.iter().find(|field| field.ui == ui)
    }

    /// Checks the required fields are filled in.
    fn validate(&self) -> Result<()> {
        let value = serde_json::to_value(self)?;
        for field in Self::REQUIRED {
            if is_blank(get_path(&value, field)) {
                return Err(Error::validation_field(
                    *field,
                    format!("{field} is required"),
                ));
            }
        }
        Ok(())
    }
}

/// Entities that carry a triage status (alerts, policy violations).
pub trait Triage: Entity {
    /// Current phase in the shared state machine.
    fn phase(&self) -> Phase;

    /// Current status in the entity's own wire vocabulary.
    fn status_label(&self) -> &'static str;

    /// The patch that performs `transition` at time `at`.
    ///
    /// Fails with [`Error::InvalidTransition`] when the move is not allowed.
    fn transition_patch(&self, transition: Transition, at: DateTime<Utc>) -> Result<Patch<Self>>;

    /// Phase reached by `transition`, or the transition error.
    fn next_phase(&self, transition: Transition) -> Result<Phase> {
        self.phase()
            .next(transition)
            .ok_or_else(|| Error::InvalidTransition {
                from: self.status_label().to_string(),
                transition,
            })
    }
}
