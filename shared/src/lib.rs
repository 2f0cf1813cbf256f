//! Shared utilities for the upload backend services

pub mod config;
pub mod observability;

pub use config::{ConfigError, EnvReader};
