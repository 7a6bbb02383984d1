//! # assetry-cli
//!
//! Command-line front end for the Assetry asset console.
//!
//! This crate provides:
//! - [`cli`]: the clap command surface
//! - [`commands`]: handlers that drive an [`assetry_console::Console`]
//! - [`config`]: TOML configuration with environment overrides
//! - [`config_handlers`]: `config path|get|set|init` and dotted-key helpers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use cli::{Cli, Command};
pub use config::ConsoleConfig;
pub use error::{Error, Result};
