//! Shared utilities for fincrew
//!
//! This crate provides common functionality used across the fincrew workspace:
//! tracing setup and loading of the API keys and model settings from the
//! process environment.

pub mod config;
pub mod logging;

pub use config::{ConfigError, EnvConfig};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
