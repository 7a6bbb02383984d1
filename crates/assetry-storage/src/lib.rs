//! # assetry-storage
//!
//! Durable local mirror for the Assetry asset console.
//!
//! This crate provides:
//! - [`CacheBackend`]: synchronous key -> JSON text storage
//! - [`FileCache`] and [`MemoryCache`]: the two backends
//! - [`EntityStore`]: an ordered, write-through collection per entity kind
//! - [`profile`]: the operator profile kept under `userProfile`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod profile;
pub mod store;

pub use cache::{CacheBackend, FileCache, MemoryCache, load_json, store_json};
pub use error::{Error, Result};
pub use profile::{PROFILE_KEY, load_profile, save_profile};
pub use store::EntityStore;
