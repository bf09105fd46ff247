//! Annual leave entitlement by seniority.
//!
//! An employee is entitled to the standard number of days a year until they
//! reach the senior age or complete the senior tenure, whichever comes first.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::config::LeavePolicy;
use crate::models::Employee;

use super::calendar::add_years;

/// Age, tenure and the resulting entitlement at a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorityAssessment {
    /// Age in whole years; 0 without a date of birth.
    pub age_years: i64,
    /// Service in whole years; 0 without a contract start.
    pub tenure_years: i64,
    /// True if either seniority condition holds.
    pub senior: bool,
    /// Days of leave a year.
    pub entitlement_days: u32,
    /// The date the employee reaches the senior age.
    pub reaches_senior_age_on: Option<NaiveDate>,
    /// The date the employee completes the senior tenure.
    pub completes_senior_tenure_on: Option<NaiveDate>,
}

impl SeniorityAssessment {
    /// The earlier of the two seniority dates, if either is known.
    pub fn threshold(&self) -> Option<NaiveDate> {
        match (self.reaches_senior_age_on, self.completes_senior_tenure_on) {
            (Some(age), Some(tenure)) => Some(age.min(tenure)),
            (age, tenure) => age.or(tenure),
        }
    }
}

/// Whole years between two dates, measured in years of `year_days` days.
///
/// Negative when `to` is before `from`.
pub fn whole_years_between(from: NaiveDate, to: NaiveDate, year_days: Decimal) -> i64 {
    let days = Decimal::from((to - from).num_days());
    (days / year_days).floor().to_i64().unwrap_or(0)
}

/// Works out age, tenure and entitlement at `now`.
pub fn assess_seniority(
    employee: &Employee,
    now: NaiveDate,
    policy: &LeavePolicy,
) -> SeniorityAssessment {
    let age_years = employee
        .date_of_birth
        .map(|dob| whole_years_between(dob, now, policy.tenure_year_days))
        .unwrap_or(0);
    let tenure_years = employee
        .contract_start
        .map(|start| whole_years_between(start, now, policy.tenure_year_days))
        .unwrap_or(0);

    let senior = age_years >= i64::from(policy.senior_age_years)
        || tenure_years >= i64::from(policy.senior_tenure_years);

    let to_years = |years: u32| i32::try_from(years).unwrap_or(i32::MAX);

    SeniorityAssessment {
        age_years,
        tenure_years,
        senior,
        entitlement_days: if senior {
            policy.senior_days_per_year
        } else {
            policy.standard_days_per_year
        },
        reaches_senior_age_on: employee
            .date_of_birth
            .map(|dob| add_years(dob, to_years(policy.senior_age_years))),
        completes_senior_tenure_on: employee
            .contract_start
            .map(|start| add_years(start, to_years(policy.senior_tenure_years))),
    }
}

/// Days of annual leave the employee is entitled to at `now`.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::compute_entitlement;
/// use erp_rules_engine::config::LeavePolicy;
/// use erp_rules_engine::models::Employee;
/// use chrono::NaiveDate;
///
/// let policy = LeavePolicy::default();
/// let employee = Employee::new(
///     "emp_001",
///     NaiveDate::from_ymd_opt(1975, 6, 1),
///     NaiveDate::from_ymd_opt(2015, 1, 10),
/// );
///
/// let before = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
/// let after = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// assert_eq!(compute_entitlement(&employee, before, &policy), 30);
/// assert_eq!(compute_entitlement(&employee, after, &policy), 45);
/// ```
pub fn compute_entitlement(employee: &Employee, now: NaiveDate, policy: &LeavePolicy) -> u32 {
    assess_seniority(employee, now, policy).entitlement_days
}

/// The date the senior entitlement starts to accrue, if known.
pub fn seniority_threshold(employee: &Employee, policy: &LeavePolicy) -> Option<NaiveDate> {
    // The reference date does not affect the threshold dates.
    let anchor = employee
        .contract_start
        .or(employee.date_of_birth)
        .unwrap_or_default();
    assess_seniority(employee, anchor, policy).threshold()
}
