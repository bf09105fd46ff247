//! Configuration loading and management for the rules engine.
//!
//! This module loads the company policy (leave, invoice and de-duplication
//! rules) and the holiday calendar from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use erp_rules_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/libya").unwrap();
//! println!("Senior entitlement: {} days", config.leave_policy().senior_days_per_year);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CompanyMetadata, DedupePolicy, EngineConfig, HolidayCalendar, InvoicePolicy, LeavePolicy,
    PolicyConfig,
};
