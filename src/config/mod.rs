//! Configuration loading and management for the payroll service.
//!
//! This module loads the service configuration from a single YAML file:
//! listener settings, report paging limits, the job group rate table and the
//! optional database connection.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Report limit: {}", config.config().report.default_limit);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DatabaseConfig, ReportConfig, ServerConfig, ServiceConfig};
