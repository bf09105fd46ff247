//! Configuration types for the rules engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, HolidaySet};

/// Metadata about the company the policy belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyMetadata {
    /// Short company code (e.g., "GJ-TRP").
    pub code: String,
    /// The company's trading name.
    pub name: String,
    /// ISO country code the labour rules come from.
    pub country: String,
}

/// Annual-leave rules.
///
/// Ages and tenures are measured in years of `tenure_year_days` days, while
/// daily accrual divides the entitlement by `accrual_year_days`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LeavePolicy {
    /// Days a year before the seniority threshold.
    pub standard_days_per_year: u32,
    /// Days a year from the seniority threshold on.
    pub senior_days_per_year: u32,
    /// Age at which the senior entitlement starts.
    pub senior_age_years: u32,
    /// Years of service after which the senior entitlement starts.
    pub senior_tenure_years: u32,
    /// Denominator of the daily accrual rate.
    pub accrual_year_days: u32,
    /// Length of a year when measuring age and tenure.
    pub tenure_year_days: Decimal,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            standard_days_per_year: 30,
            senior_days_per_year: 45,
            senior_age_years: 50,
            senior_tenure_years: 20,
            accrual_year_days: 365,
            tenure_year_days: Decimal::from_parts(36525, 0, 0, false, 2),
        }
    }
}

impl LeavePolicy {
    /// Checks the values can be used by the accrual rules.
    pub fn validate(&self) -> EngineResult<()> {
        if self.accrual_year_days == 0 {
            return Err(invalid("leave.accrual_year_days", "must be greater than zero"));
        }
        if self.tenure_year_days <= Decimal::ZERO {
            return Err(invalid("leave.tenure_year_days", "must be greater than zero"));
        }
        if self.senior_days_per_year < self.standard_days_per_year {
            return Err(invalid(
                "leave.senior_days_per_year",
                "must not be below standard_days_per_year",
            ));
        }
        Ok(())
    }
}

/// Invoice reconciliation rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InvoicePolicy {
    /// Largest difference between totals that still counts as equal.
    pub tolerance: Decimal,
}

impl Default for InvoicePolicy {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
        }
    }
}

impl InvoicePolicy {
    /// Checks the values can be used by the reconciliation rules.
    pub fn validate(&self) -> EngineResult<()> {
        if self.tolerance < Decimal::ZERO {
            return Err(invalid("invoice.tolerance", "must not be negative"));
        }
        Ok(())
    }
}

/// Duplicate-submission suppression windows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DedupePolicy {
    /// How long an identical request body is suppressed.
    pub content_window_seconds: u64,
    /// How long an idempotency key is remembered.
    pub idempotency_window_hours: u64,
    /// Upper bound on remembered entries per window.
    pub max_entries: usize,
}

impl Default for DedupePolicy {
    fn default() -> Self {
        Self {
            content_window_seconds: 10,
            idempotency_window_hours: 24,
            max_entries: 10_000,
        }
    }
}

impl DedupePolicy {
    /// Checks the windows are usable.
    pub fn validate(&self) -> EngineResult<()> {
        if self.content_window_seconds == 0 {
            return Err(invalid("dedupe.content_window_seconds", "must be greater than zero"));
        }
        if self.idempotency_window_hours == 0 {
            return Err(invalid("dedupe.idempotency_window_hours", "must be greater than zero"));
        }
        if self.max_entries == 0 {
            return Err(invalid("dedupe.max_entries", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidPolicy {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Policy configuration from policy.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Company metadata.
    pub company: CompanyMetadata,
    /// Leave rules.
    #[serde(default)]
    pub leave: LeavePolicy,
    /// Invoice rules.
    #[serde(default)]
    pub invoice: InvoicePolicy,
    /// Duplicate-submission windows.
    #[serde(default)]
    pub dedupe: DedupePolicy,
}

impl PolicyConfig {
    /// Validates every section.
    pub fn validate(&self) -> EngineResult<()> {
        self.leave.validate()?;
        self.invoice.validate()?;
        self.dedupe.validate()
    }
}

/// Holidays for one year, from `holidays/<year>.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// The calendar year.
    pub year: i32,
    /// The holidays observed that year.
    pub holidays: Vec<Holiday>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Policy configuration.
    policy: PolicyConfig,
    /// Holiday calendars (sorted oldest first).
    calendars: Vec<HolidayCalendar>,
    /// Every configured holiday date.
    holidays: HolidaySet,
}

impl EngineConfig {
    /// Creates an EngineConfig from its component parts.
    pub fn new(policy: PolicyConfig, calendars: Vec<HolidayCalendar>) -> Self {
        let mut sorted_calendars = calendars;
        sorted_calendars.sort_by_key(|c| c.year);
        let holidays = sorted_calendars
            .iter()
            .flat_map(|c| c.holidays.iter())
            .collect();
        Self {
            policy,
            calendars: sorted_calendars,
            holidays,
        }
    }

    /// Returns the policy configuration.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Returns all holiday calendars.
    pub fn calendars(&self) -> &[HolidayCalendar] {
        &self.calendars
    }

    /// Returns every configured holiday date.
    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }
}
