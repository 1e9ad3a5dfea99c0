//! Observability utilities.
//!
//! Containers, DAOs and the account service emit `tracing` events; this
//! module installs the subscriber that prints them.
//!
//! # Example
//!
//! ```no_run
//! use storekit::config::LoggingConfig;
//! use storekit::observability::init_logging;
//!
//! init_logging(&LoggingConfig::default());
//! tracing::info!("storage layer ready");
//! ```

pub mod logger;

// Re-export main entry points for convenience
pub use logger::{build_filter, init_logging};
