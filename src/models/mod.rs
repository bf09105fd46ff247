//! Core data models for the rules engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod evaluation;
mod holiday;
mod invoice;
mod leave;

pub use employee::{Employee, parse_lenient_date};
pub use evaluation::{
    AccrualResult, AuditStep, AuditTrace, AuditWarning, LeaveEvaluation, LeaveSummary,
    WorkingYear,
};
pub use holiday::{Holiday, HolidaySet};
pub use invoice::{
    Category, Currency, Discount, InvoiceCartItem, PaymentBreakdown, TotalsReconciliation,
    TotalsValidation, TotalsViolation, ViolationKind,
};
pub use leave::{APPROVAL_SYNONYMS, LeavePeriod, LeaveRecord, LeaveStatus, is_approved_like};
