//! Employee model.
//!
//! The engine only reads the dates it needs to work out age and tenure.
//! Directory records are often incomplete, so both dates are optional and
//! free-text dates are parsed leniently.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An employee as seen by the leave rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name, used by notification payloads.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact e-mail, used by notification payloads.
    #[serde(default)]
    pub email: Option<String>,
    /// The employee's date of birth, if known.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// The date the employment contract started, if known.
    #[serde(default)]
    pub contract_start: Option<NaiveDate>,
}

impl Employee {
    /// Creates an employee with only an id and the two dates the rules use.
    ///
    /// # Example
    ///
    /// ```
    /// use erp_rules_engine::models::Employee;
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee::new(
    ///     "emp_001",
    ///     NaiveDate::from_ymd_opt(1975, 6, 1),
    ///     NaiveDate::from_ymd_opt(2015, 1, 10),
    /// );
    /// assert!(employee.name.is_none());
    /// ```
    pub fn new(
        id: impl Into<String>,
        date_of_birth: Option<NaiveDate>,
        contract_start: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            date_of_birth,
            contract_start,
        }
    }
}

/// Parses a date leniently, returning `None` instead of an error.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps; for timestamps only the calendar date is kept.
///
/// # Example
///
/// ```
/// use erp_rules_engine::models::parse_lenient_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2015, 1, 10);
/// assert_eq!(parse_lenient_date("2015-01-10"), expected);
/// assert_eq!(parse_lenient_date("2015-01-10T00:00:00.000Z"), expected);
/// assert_eq!(parse_lenient_date("not a date"), None);
/// ```
pub fn parse_lenient_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    None
}
