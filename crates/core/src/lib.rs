//! Core utilities for Anna Seva
//!
//! This crate provides functionality shared by every other member:
//!
//! - **Error handling**: Coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with environment overrides
//! - **Retry policy**: Exponential backoff parameters for network fetchers
//!
//! # Example
//!
//! ```rust,no_run
//! use annaseva_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("listening on port {}", config.schema.server.port);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::retry::RetryConfig;
}
