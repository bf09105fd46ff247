//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, HolidaySet};

use super::types::{
    CompanyMetadata, DedupePolicy, EngineConfig, HolidayCalendar, InvoicePolicy, LeavePolicy,
    PolicyConfig,
};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/libya/
/// ├── policy.yaml        # Company metadata, leave, invoice and dedupe policy
/// └── holidays/
///     └── 2025.yaml      # Holidays observed in 2025
/// ```
///
/// # Example
///
/// ```no_run
/// use erp_rules_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/libya").unwrap();
/// println!("Loaded policy for {}", loader.company().name);
/// println!("{} holidays configured", loader.holidays().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `policy.yaml` or the `holidays` directory is missing
    /// - Any file contains invalid YAML
    /// - A policy value is unusable (see [`PolicyConfig::validate`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_path = path.join("policy.yaml");
        let policy = Self::load_yaml::<PolicyConfig>(&policy_path)?;
        policy.validate()?;

        let holidays_dir = path.join("holidays");
        let calendars = Self::load_calendars(&holidays_dir)?;

        Ok(Self::from_config(EngineConfig::new(policy, calendars)))
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every holiday calendar in the holidays directory.
    fn load_calendars(holidays_dir: &Path) -> EngineResult<Vec<HolidayCalendar>> {
        let holidays_dir_str = holidays_dir.display().to_string();

        if !holidays_dir.is_dir() {
            return Err(EngineError::ConfigNotFound {
                path: holidays_dir_str,
            });
        }

        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: holidays_dir_str.clone(),
        })?;

        let mut calendars = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: holidays_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let calendar = Self::load_yaml::<HolidayCalendar>(&path)?;
                Self::check_calendar_year(&calendar, &path)?;
                debug!(
                    year = calendar.year,
                    holidays = calendar.holidays.len(),
                    "Loaded holiday calendar"
                );
                calendars.push(calendar);
            }
        }

        Ok(calendars)
    }

    /// Rejects calendars listing dates outside their declared year.
    fn check_calendar_year(calendar: &HolidayCalendar, path: &Path) -> EngineResult<()> {
        use chrono::Datelike;

        match calendar.holidays.iter().find(|h| h.date.year() != calendar.year) {
            Some(stray) => Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: format!(
                    "holiday '{}' on {} is outside calendar year {}",
                    stray.name, stray.date, calendar.year
                ),
            }),
            None => Ok(()),
        }
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the policy configuration.
    pub fn policy(&self) -> &PolicyConfig {
        self.config.policy()
    }

    /// Returns the company metadata.
    pub fn company(&self) -> &CompanyMetadata {
        &self.config.policy().company
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        &self.config.policy().leave
    }

    /// Returns the invoice policy.
    pub fn invoice_policy(&self) -> &InvoicePolicy {
        &self.config.policy().invoice
    }

    /// Returns the duplicate-submission policy.
    pub fn dedupe_policy(&self) -> &DedupePolicy {
        &self.config.policy().dedupe
    }

    /// Returns every configured holiday date.
    pub fn holidays(&self) -> &HolidaySet {
        self.config.holidays()
    }

    /// Returns the holidays configured for one year, oldest first.
    ///
    /// Years without a calendar file yield an empty list.
    pub fn holidays_for_year(&self, year: i32) -> Vec<&Holiday> {
        self.config
            .calendars()
            .iter()
            .filter(|c| c.year == year)
            .flat_map(|c| c.holidays.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/libya"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.company().code, "GJ-TRP");
        assert_eq!(loader.company().country, "LY");
    }

    #[test]
    fn test_leave_policy_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.leave_policy(), &LeavePolicy::default());
    }

    #[test]
    fn test_invoice_policy_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(
            loader.invoice_policy().tolerance,
            rust_decimal::Decimal::from_str("0.01").unwrap()
        );
    }

    #[test]
    fn test_dedupe_policy_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.dedupe_policy().content_window_seconds, 10);
        assert_eq!(loader.dedupe_policy().idempotency_window_hours, 24);
    }

    #[test]
    fn test_holidays_loaded_for_each_year() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let independence_2025 = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        let labour_2026 = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        assert!(loader.holidays().contains(independence_2025));
        assert!(loader.holidays().contains(labour_2026));

        let names: Vec<&str> = loader
            .holidays_for_year(2025)
            .iter()
            .map(|h| h.name.as_str())
            .collect();
        assert!(names.contains(&"Revolution Day"));
    }

    #[test]
    fn test_holidays_for_unconfigured_year_is_empty() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert!(loader.holidays_for_year(1999).is_empty());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
