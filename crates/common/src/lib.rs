//! Common types and utilities for newcoin.
//!
//! This crate provides the identifiers shared by every other crate
//! ([`Hash256`], [`AccountId`], [`Currency`]), the node configuration schema,
//! logging initialisation and a handful of overflow-safe math helpers.

pub mod config;
pub mod error;
pub mod logging;
pub mod math;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
