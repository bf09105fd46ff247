//! Leave request and leave history models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status labels that count as an approval.
///
/// HR staff type statuses by hand in English, French and transliterated
/// Arabic, so matching is by case-insensitive substring.
pub const APPROVAL_SYNONYMS: [&str; 8] = [
    "approved",
    "accepted",
    "validated",
    "approuved",
    "approuvé",
    "validé",
    "approved by hr",
    "approved_by_hr",
];

const REJECTION_SYNONYMS: [&str; 8] = [
    "rejected",
    "refused",
    "refusé",
    "rejeté",
    "denied",
    "declined",
    "not approved",
    "unapproved",
];

const CANCELLATION_SYNONYMS: [&str; 4] = ["cancelled", "canceled", "annulé", "annule"];

/// Returns true if a free-text status reads as an approval.
///
/// # Example
///
/// ```
/// use erp_rules_engine::models::is_approved_like;
///
/// assert!(is_approved_like("Approved by HR"));
/// assert!(is_approved_like("VALIDÉ"));
/// assert!(!is_approved_like("pending"));
/// ```
pub fn is_approved_like(status: &str) -> bool {
    let status = status.to_lowercase();
    APPROVAL_SYNONYMS.iter().any(|s| status.contains(s))
}

/// The approval state of a leave request.
///
/// Free-text statuses are classified once, when a record enters the engine.
/// Rejection and cancellation wording wins over approval wording, so
/// "not approved" is a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LeaveStatus {
    /// Awaiting a decision (also used for unrecognised labels).
    Pending,
    /// Approved; counts against the balance.
    Approved,
    /// Rejected by a manager or HR.
    Rejected,
    /// Withdrawn by the employee or cancelled by HR.
    Cancelled,
}

impl LeaveStatus {
    /// Classifies a free-text status label.
    ///
    /// # Example
    ///
    /// ```
    /// use erp_rules_engine::models::LeaveStatus;
    ///
    /// assert_eq!(LeaveStatus::classify("approved_by_hr"), LeaveStatus::Approved);
    /// assert_eq!(LeaveStatus::classify("Refusé"), LeaveStatus::Rejected);
    /// assert_eq!(LeaveStatus::classify("Annulé"), LeaveStatus::Cancelled);
    /// assert_eq!(LeaveStatus::classify("waiting"), LeaveStatus::Pending);
    /// ```
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if REJECTION_SYNONYMS.iter().any(|s| label.contains(s)) {
            LeaveStatus::Rejected
        } else if CANCELLATION_SYNONYMS.iter().any(|s| label.contains(s)) {
            LeaveStatus::Cancelled
        } else if is_approved_like(&label) {
            LeaveStatus::Approved
        } else {
            LeaveStatus::Pending
        }
    }

    /// Returns true if the status counts against the leave balance.
    pub fn is_approved(self) -> bool {
        self == LeaveStatus::Approved
    }
}

impl From<String> for LeaveStatus {
    fn from(label: String) -> Self {
        LeaveStatus::classify(&label)
    }
}

/// A requested or taken leave window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePeriod {
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
}

impl LeavePeriod {
    /// Creates a leave period.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Returns true if the period is inverted and therefore empty.
    pub fn is_empty(&self) -> bool {
        self.start_date > self.end_date
    }

    /// Clips the period to `[from, to]`, returning `None` if nothing remains.
    pub fn clip(&self, from: NaiveDate, to: NaiveDate) -> Option<LeavePeriod> {
        let clipped = LeavePeriod::new(self.start_date.max(from), self.end_date.min(to));
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// One entry of an employee's leave history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Approval state, classified from the stored label.
    pub status: LeaveStatus,
}

impl LeaveRecord {
    /// Returns the record's date range as a [`LeavePeriod`].
    pub fn period(&self) -> LeavePeriod {
        LeavePeriod::new(self.start_date, self.end_date)
    }
}
