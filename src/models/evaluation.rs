//! Leave evaluation result models.
//!
//! This module contains the [`LeaveEvaluation`] type and the structures it is
//! built from: the accrual result, the leave summary handed to notification
//! templates, and the audit trace recording every rule decision.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single step in the audit trace recording a rule decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during evaluation.
///
/// Warnings flag incomplete data that the rules degraded around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The complete audit trace for an evaluation.
///
/// # Example
///
/// ```
/// use erp_rules_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of rule steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during evaluation.
    pub warnings: Vec<AuditWarning>,
    /// The total evaluation duration in microseconds.
    pub duration_us: u64,
}

/// The contract year an accrual is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingYear {
    /// The most recent contract anniversary on or before the reference date.
    pub start: NaiveDate,
    /// The reference date.
    pub end: NaiveDate,
}

/// Annual entitlement and leave accrued so far in the working year.
///
/// # Example
///
/// ```
/// use erp_rules_engine::models::AccrualResult;
/// use rust_decimal::Decimal;
///
/// let neutral = AccrualResult::neutral();
/// assert_eq!(neutral.entitlement_days_per_year, 30);
/// assert_eq!(neutral.accrued_days_to_date, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResult {
    /// 30 or 45 days a year, depending on seniority at the reference date.
    pub entitlement_days_per_year: u32,
    /// Days accrued in the current working year, rounded to 2 decimals.
    pub accrued_days_to_date: Decimal,
    /// The window the accrual covers; absent without a contract start.
    pub working_year: Option<WorkingYear>,
    /// The date the higher entitlement starts to accrue, if known.
    pub seniority_threshold: Option<NaiveDate>,
}

impl AccrualResult {
    /// The result used when an employee record lacks a contract start.
    pub fn neutral() -> Self {
        Self {
            entitlement_days_per_year: 30,
            accrued_days_to_date: Decimal::ZERO,
            working_year: None,
            seniority_threshold: None,
        }
    }
}

/// The balance figures shown when a leave request is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSummary {
    /// Annual entitlement in days.
    pub entitlement: u32,
    /// Days accrued so far this working year.
    pub accrued_days: Decimal,
    /// Effective days of approved leave already taken this calendar year.
    pub used_approved_days: u32,
    /// Effective days the new request would consume.
    pub effective_days_this_request: u32,
    /// Balance left after the request, never below zero.
    pub remaining_after: Decimal,
    /// First working day after the requested period.
    pub return_to_work: Option<NaiveDate>,
}

/// The complete result of evaluating a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveEvaluation {
    /// Unique identifier for this evaluation.
    pub evaluation_id: Uuid,
    /// When the evaluation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the evaluation.
    pub engine_version: String,
    /// The employee the evaluation is for.
    pub employee_id: String,
    /// The reference date the balance was computed at.
    pub as_of: NaiveDate,
    /// Entitlement and accrual.
    pub accrual: AccrualResult,
    /// Balance summary.
    pub summary: LeaveSummary,
    /// Complete audit trace of rule decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_summary() -> LeaveSummary {
        LeaveSummary {
            entitlement: 45,
            accrued_days: dec("19.32"),
            used_approved_days: 4,
            effective_days_this_request: 5,
            remaining_after: dec("10.32"),
            return_to_work: NaiveDate::from_ymd_opt(2025, 8, 10),
        }
    }

    #[test]
    fn test_summary_serializes_decimals_as_strings() {
        let json = serde_json::to_value(create_sample_summary()).unwrap();
        assert_eq!(json["accrued_days"], "19.32");
        assert_eq!(json["remaining_after"], "10.32");
        assert_eq!(json["return_to_work"], "2025-08-10");
        assert_eq!(json["entitlement"], 45);
    }

    #[test]
    fn test_evaluation_round_trips_through_json() {
        let evaluation = LeaveEvaluation {
            evaluation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            employee_id: "emp_001".to_string(),
            as_of: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            accrual: AccrualResult::neutral(),
            summary: create_sample_summary(),
            audit_trace: AuditTrace {
                steps: vec![AuditStep {
                    step_number: 1,
                    rule_id: "entitlement".to_string(),
                    rule_name: "Annual Entitlement".to_string(),
                    input: serde_json::json!({ "age_years": 50 }),
                    output: serde_json::json!({ "entitlement_days": 45 }),
                    reasoning: "Age 50 reached".to_string(),
                }],
                warnings: vec![],
                duration_us: 42,
            },
        };

        let json = serde_json::to_string(&evaluation).unwrap();
        let parsed: LeaveEvaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, evaluation);
    }

    #[test]
    fn test_neutral_accrual_has_no_window() {
        let neutral = AccrualResult::neutral();
        assert!(neutral.working_year.is_none());
        assert!(neutral.seniority_threshold.is_none());
    }
}
