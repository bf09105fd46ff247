//! Calculation logic for the rules engine.
//!
//! This module contains the pure rule functions: working-day counting over
//! the Friday rest day and holiday calendar, seniority-based leave entitlement,
//! prorated leave accrual, the leave balance summary, and invoice totals
//! reconciliation with discounts and multi-currency payment checks.

mod accrual;
mod calendar;
mod entitlement;
mod invoice_totals;
mod leave_summary;
mod rounding;

pub use accrual::{AccrualCalculation, calculate_accrual, compute_accrued_days, working_year};
pub use calendar::{
    MAX_WORKDAY_SEARCH_DAYS, REST_DAY, add_years, anniversary_in_year, count_effective_days,
    days_between_inclusive, is_rest_day, is_working_day, next_workday,
};
pub use entitlement::{
    SeniorityAssessment, assess_seniority, compute_entitlement, seniority_threshold,
    whole_years_between,
};
pub use invoice_totals::{
    apply_discount, build_reconciliation, compute_category_total, totals_by_category,
    validate_totals,
};
pub use leave_summary::{compute_leave_summary, evaluate_leave_request, used_approved_days};
pub use rounding::{AMOUNT_DECIMAL_PLACES, round_amount};
