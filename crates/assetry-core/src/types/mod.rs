//! Core types shared by every entity kind.

mod ids;
mod kind;
mod patch;
mod proptests;
mod record;
mod status;

pub use ids::EntityId;
pub use kind::{EntityKind, Facet};
pub use patch::Patch;
pub use record::{Record, Stamp};
pub use status::{Phase, Transition};
