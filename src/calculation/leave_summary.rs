//! Leave balance summary for a requested period.
//!
//! Combines the accrual, the approved leave already taken this calendar year
//! and the effective days of the new request into the figures shown to HR and
//! sent with approval notifications.

use std::time::Instant;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::LeavePolicy;
use crate::models::{
    AuditStep, AuditTrace, Employee, HolidaySet, LeaveEvaluation, LeavePeriod, LeaveRecord,
    LeaveSummary,
};

use super::accrual::calculate_accrual;
use super::calendar::{count_effective_days, next_workday};
use super::rounding::round_amount;

/// Effective days of approved leave taken in calendar year `year`.
///
/// Records that are not approved are ignored. Records straddling the year
/// boundary only count the days that fall inside `year`.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::used_approved_days;
/// use erp_rules_engine::models::{HolidaySet, LeaveRecord, LeaveStatus};
/// use chrono::NaiveDate;
///
/// let history = vec![
///     LeaveRecord {
///         start_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
///         end_date: NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
///         status: LeaveStatus::classify("Approved"),
///     },
///     LeaveRecord {
///         start_date: NaiveDate::from_ymd_opt(2025, 4, 6).unwrap(),
///         end_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
///         status: LeaveStatus::classify("pending"),
///     },
/// ];
/// assert_eq!(used_approved_days(&history, 2025, &HolidaySet::new()), 5);
/// ```
pub fn used_approved_days(history: &[LeaveRecord], year: i32, holidays: &HolidaySet) -> u32 {
    let (Some(year_start), Some(year_end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return 0;
    };

    history
        .iter()
        .filter(|record| record.status.is_approved())
        .filter_map(|record| record.period().clip(year_start, year_end))
        .map(|period| count_effective_days(period.start_date, period.end_date, holidays))
        .sum()
}

/// Builds the balance summary for a request.
///
/// The remaining balance is rounded to 2 decimals and never negative. The
/// return-to-work date is left empty; see [`evaluate_leave_request`].
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::compute_leave_summary;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let summary = compute_leave_summary(Decimal::from_str("19.32").unwrap(), 45, 4, 5);
/// assert_eq!(summary.remaining_after, Decimal::from_str("10.32").unwrap());
///
/// let overdrawn = compute_leave_summary(Decimal::from_str("3.50").unwrap(), 30, 2, 5);
/// assert_eq!(overdrawn.remaining_after, Decimal::ZERO);
/// ```
pub fn compute_leave_summary(
    accrued_days: Decimal,
    entitlement: u32,
    used_approved_days: u32,
    effective_days_this_request: u32,
) -> LeaveSummary {
    let remaining = round_amount(
        accrued_days - Decimal::from(used_approved_days) - Decimal::from(effective_days_this_request),
    );

    LeaveSummary {
        entitlement,
        accrued_days,
        used_approved_days,
        effective_days_this_request,
        remaining_after: remaining.max(Decimal::ZERO),
        return_to_work: None,
    }
}

/// Evaluates a leave request at `now`.
///
/// Runs the accrual, counts used and requested effective days, and records
/// every step in the audit trace. `holidays` should already contain both the
/// configured calendar and any dates supplied with the request.
pub fn evaluate_leave_request(
    employee: &Employee,
    request: LeavePeriod,
    history: &[LeaveRecord],
    holidays: &HolidaySet,
    now: NaiveDate,
    policy: &LeavePolicy,
) -> LeaveEvaluation {
    let start_time = Instant::now();

    let accrual = calculate_accrual(employee, now, policy, 1);
    let mut steps = vec![accrual.audit_step.clone()];
    let warnings = accrual.warnings.clone();

    let approved_records = history.iter().filter(|r| r.status.is_approved()).count();
    let used = used_approved_days(history, now.year(), holidays);
    steps.push(AuditStep {
        step_number: 2,
        rule_id: "used_approved_days".to_string(),
        rule_name: "Approved Leave Taken".to_string(),
        input: serde_json::json!({
            "history_records": history.len(),
            "approved_records": approved_records,
            "year": now.year()
        }),
        output: serde_json::json!({ "used_approved_days": used }),
        reasoning: format!(
            "{} of {} records approved, {} effective days fall in {}",
            approved_records,
            history.len(),
            used,
            now.year()
        ),
    });

    let requested = count_effective_days(request.start_date, request.end_date, holidays);
    let return_to_work = next_workday(request.end_date, holidays);
    steps.push(AuditStep {
        step_number: 3,
        rule_id: "request_effective_days".to_string(),
        rule_name: "Requested Effective Days".to_string(),
        input: serde_json::json!({
            "start_date": request.start_date.to_string(),
            "end_date": request.end_date.to_string(),
            "holidays_known": holidays.len()
        }),
        output: serde_json::json!({
            "effective_days": requested,
            "return_to_work": return_to_work.map(|d| d.to_string())
        }),
        reasoning: if request.is_empty() {
            "End date before start date - request counts 0 days".to_string()
        } else {
            format!("{} working days excluding Fridays and holidays", requested)
        },
    });

    let summary = LeaveSummary {
        return_to_work,
        ..compute_leave_summary(
            accrual.result.accrued_days_to_date,
            accrual.result.entitlement_days_per_year,
            used,
            requested,
        )
    };
    steps.push(AuditStep {
        step_number: 4,
        rule_id: "leave_balance".to_string(),
        rule_name: "Remaining Balance".to_string(),
        input: serde_json::json!({
            "accrued_days": summary.accrued_days.to_string(),
            "used_approved_days": used,
            "effective_days_this_request": requested
        }),
        output: serde_json::json!({ "remaining_after": summary.remaining_after.to_string() }),
        reasoning: format!(
            "{} - {} - {} = {} (floored at 0)",
            summary.accrued_days, used, requested, summary.remaining_after
        ),
    });

    LeaveEvaluation {
        evaluation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.id.clone(),
        as_of: now,
        accrual: accrual.result,
        summary,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX),
        },
    }
}
