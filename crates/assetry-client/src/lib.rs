//! # assetry-client
//!
//! Remote data gateway for the Assetry asset console.
//!
//! This crate provides:
//! - [`wire`]: translation between snake_case rows and UI-shaped records
//! - [`RemoteStore`]: the async, object-safe transport seam
//! - [`RestStore`]: PostgREST dialect over HTTP (reqwest)
//! - [`MemoryStore`]: in-process tables for offline use and tests
//! - [`Gateway`]: generic list/get/create/update/delete over any entity

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod remote;
pub mod rest;
pub mod wire;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use gateway::{Gateway, is_remote_failure};
pub use memory::MemoryStore;
pub use remote::{RemoteStore, create_remote_store};
pub use rest::RestStore;
