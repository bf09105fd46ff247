//! Leave accrual within the contract working year.
//!
//! Leave accrues daily from the most recent contract anniversary. When the
//! seniority threshold falls inside the working year, days before it accrue at
//! the standard rate and days from it on at the senior rate.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::LeavePolicy;
use crate::models::{AccrualResult, AuditStep, AuditWarning, Employee, WorkingYear};

use super::calendar::{anniversary_in_year, day_before, days_between_inclusive};
use super::entitlement::assess_seniority;
use super::rounding::round_amount;

/// The result of an accrual calculation, including its audit record.
#[derive(Debug, Clone)]
pub struct AccrualCalculation {
    /// Entitlement and accrued days.
    pub result: AccrualResult,
    /// Days of the working year accrued at the standard rate.
    pub standard_rate_days: u32,
    /// Days of the working year accrued at the senior rate.
    pub senior_rate_days: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Data gaps the calculation degraded around.
    pub warnings: Vec<AuditWarning>,
}

/// The working year containing `now` for a contract that started on
/// `contract_start`.
///
/// The window never starts before the contract itself, so a contract starting
/// after `now` yields an empty window.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::working_year;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2015, 9, 15).unwrap();
/// let now = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let window = working_year(start, now);
/// assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 9, 15).unwrap());
/// assert_eq!(window.end, now);
/// ```
pub fn working_year(contract_start: NaiveDate, now: NaiveDate) -> WorkingYear {
    let anniversary = anniversary_in_year(contract_start, now.year());
    let start = if anniversary <= now {
        anniversary
    } else {
        anniversary_in_year(contract_start, now.year() - 1)
    };

    WorkingYear {
        start: start.max(contract_start),
        end: now,
    }
}

/// Calculates entitlement and accrued leave at `now`.
///
/// Never fails: without a contract start the accrual is zero and a warning is
/// recorded.
pub fn calculate_accrual(
    employee: &Employee,
    now: NaiveDate,
    policy: &LeavePolicy,
    step_number: u32,
) -> AccrualCalculation {
    let seniority = assess_seniority(employee, now, policy);
    let threshold = seniority.threshold();

    let mut warnings = Vec::new();
    if employee.date_of_birth.is_none() {
        warnings.push(AuditWarning {
            code: "MISSING_DATE_OF_BIRTH".to_string(),
            message: format!(
                "Employee '{}' has no date of birth; only tenure can raise the entitlement",
                employee.id
            ),
        });
    }

    let Some(contract_start) = employee.contract_start else {
        warnings.push(AuditWarning {
            code: "MISSING_CONTRACT_START".to_string(),
            message: format!(
                "Employee '{}' has no contract start; nothing accrued",
                employee.id
            ),
        });

        let result = AccrualResult {
            entitlement_days_per_year: seniority.entitlement_days,
            ..AccrualResult::neutral()
        };
        let audit_step = AuditStep {
            step_number,
            rule_id: "leave_accrual".to_string(),
            rule_name: "Leave Accrual".to_string(),
            input: serde_json::json!({
                "employee_id": employee.id,
                "as_of": now.to_string(),
                "contract_start": null
            }),
            output: serde_json::json!({
                "entitlement_days": result.entitlement_days_per_year,
                "accrued_days": "0"
            }),
            reasoning: "No contract start date - accrual defaults to 0 days".to_string(),
        };

        return AccrualCalculation {
            result,
            standard_rate_days: 0,
            senior_rate_days: 0,
            audit_step,
            warnings,
        };
    };

    let window = working_year(contract_start, now);
    let window_days = days_between_inclusive(window.start, window.end);

    let (standard_rate_days, senior_rate_days) = match threshold {
        None if seniority.senior => (0, window_days),
        None => (window_days, 0),
        Some(t) if t <= window.start => (0, window_days),
        Some(t) if t > window.end => (window_days, 0),
        Some(t) => (
            days_between_inclusive(window.start, day_before(t)),
            days_between_inclusive(t, window.end),
        ),
    };

    // Both rates share the accrual-year denominator; divide once.
    let day_units = u64::from(standard_rate_days) * u64::from(policy.standard_days_per_year)
        + u64::from(senior_rate_days) * u64::from(policy.senior_days_per_year);
    let accrued = round_amount(
        Decimal::from(day_units) / Decimal::from(policy.accrual_year_days.max(1)),
    );

    let reasoning = match threshold {
        Some(t) if standard_rate_days > 0 && senior_rate_days > 0 => format!(
            "{} days at {}/{} before {} + {} days at {}/{} from it = {} days",
            standard_rate_days,
            policy.standard_days_per_year,
            policy.accrual_year_days,
            t,
            senior_rate_days,
            policy.senior_days_per_year,
            policy.accrual_year_days,
            accrued
        ),
        _ => {
            let (days, rate) = if senior_rate_days > 0 {
                (senior_rate_days, policy.senior_days_per_year)
            } else {
                (standard_rate_days, policy.standard_days_per_year)
            };
            format!(
                "{} days since {} at {}/{} = {} days",
                days, window.start, rate, policy.accrual_year_days, accrued
            )
        }
    };

    let result = AccrualResult {
        entitlement_days_per_year: seniority.entitlement_days,
        accrued_days_to_date: accrued,
        working_year: Some(window),
        seniority_threshold: threshold,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_accrual".to_string(),
        rule_name: "Leave Accrual".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "as_of": now.to_string(),
            "contract_start": contract_start.to_string(),
            "date_of_birth": employee.date_of_birth.map(|d| d.to_string()),
            "age_years": seniority.age_years,
            "tenure_years": seniority.tenure_years
        }),
        output: serde_json::json!({
            "entitlement_days": result.entitlement_days_per_year,
            "working_year_start": window.start.to_string(),
            "seniority_threshold": threshold.map(|d| d.to_string()),
            "standard_rate_days": standard_rate_days,
            "senior_rate_days": senior_rate_days,
            "accrued_days": accrued.to_string()
        }),
        reasoning,
    };

    AccrualCalculation {
        result,
        standard_rate_days,
        senior_rate_days,
        audit_step,
        warnings,
    }
}

/// Days of leave accrued in the current working year, rounded to 2 decimals.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::compute_accrued_days;
/// use erp_rules_engine::config::LeavePolicy;
/// use erp_rules_engine::models::Employee;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// // Turns 50 on 2025-06-01, inside the working year starting 2025-01-10.
/// let employee = Employee::new(
///     "emp_001",
///     NaiveDate::from_ymd_opt(1975, 6, 1),
///     NaiveDate::from_ymd_opt(2015, 1, 10),
/// );
/// let now = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let accrued = compute_accrued_days(&employee, now, &LeavePolicy::default());
/// assert_eq!(accrued, Decimal::from_str("19.32").unwrap());
/// ```
pub fn compute_accrued_days(employee: &Employee, now: NaiveDate, policy: &LeavePolicy) -> Decimal {
    calculate_accrual(employee, now, policy, 1)
        .result
        .accrued_days_to_date
}
