//! Shared utilities for stock-canvas
//!
//! This crate provides common functionality used across the stock-canvas workspace:
//! tracing setup and the application-level configuration that drives it.

pub mod config;
pub mod logging;

pub use config::{Config, LogConfig};
pub use logging::init_tracing;
