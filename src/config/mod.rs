//! Configuration management module.
//!
//! Handles the field table, JSON Schema export, default generation and
//! validation of the JSON configuration file.

mod schema;
mod service;
mod types;
mod validation;

pub use types::Configuration;

pub use service::{schema_reference, ConfigService, DEFAULT_CONFIG_PATH, DEFAULT_SCHEMA_PATH};
