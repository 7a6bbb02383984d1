#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Assetry Core: shared entity model, identifiers, patches and errors.
//!
//! This crate has no internal Assetry dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`types`]: ids, entity kinds, the record envelope, patches and status phases
//! - [`entity`]: the [`Entity`] trait and its UI/wire field table
//! - [`model`]: one UI-shaped struct per tracked entity kind
//! - [`any`]: the [`AnyRecord`] tagged union and the [`with_entity!`] dispatcher
//! - [`json`]: dotted-path helpers over `serde_json::Value`
//! - [`error`]: Error types and Result alias

pub mod any;
pub mod entity;
pub mod error;
pub mod json;
pub mod model;
pub mod types;

// Re-exports for convenience
pub use any::AnyRecord;
pub use entity::{Entity, Field, Triage};
pub use error::{Error, Result};
pub use types::{EntityId, EntityKind, Facet, Patch, Phase, Record, Stamp, Transition};
