//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading and controller setup that can be reused by
//! the console client or any other front-end crate.
pub mod builder;
pub mod config;

pub use builder::{ControllerBuilder, ControllerSetup};
pub use config::{ApiConfig, ClientConfig, DEFAULT_API_URL, EventConfig, PlayConfig};
