//! Configuration loading and management for the attendance engine.
//!
//! This module loads the attendance policy from YAML files: rest days,
//! payroll arithmetic, the data-availability cut-off and the shift catalog.
//!
//! # Example
//!
//! ```no_run
//! use attendance_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Shift types: {:?}", config.policy().shifts.names().collect::<Vec<_>>());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CUSTOM_SHIFT, PolicyConfig, PolicyFile, ShiftCatalog};
