//! # assetry-console
//!
//! The application layer of the Assetry asset console.
//!
//! This crate provides:
//! - [`Console`]: the composition root holding the gateway, stores and profile
//! - [`stores`]: one write-through store per entity kind
//! - [`view`]: list filtering and bulk selection
//! - [`form`]: create/edit form state
//! - [`metrics`]: dashboard, financial, analytics and compliance reductions
//! - [`ops`]: imports, integration sync, report runs and kit resolution
//! - [`refresh`]: scheduled refresh with liveness tokens
//! - [`sections`]: the navigable sections

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod console;
pub mod error;
pub mod form;
pub mod metrics;
pub mod ops;
pub mod refresh;
pub mod sections;
pub mod stores;
pub mod view;

pub use console::{BulkOutcome, Confirm, Console, Deletion, Refresh};
pub use error::{Error, Result};
pub use form::{FormController, FormError, Submitted};
pub use metrics::{Analytics, Compliance, Dashboard, Financial};
pub use ops::{ImportSummary, KitContents};
pub use refresh::{LiveToken, Liveness, ScheduledTask};
pub use sections::Section;
pub use stores::{Stores, Tracked};
pub use view::{Filter, ListView, Selection};
