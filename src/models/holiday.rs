//! Holiday calendar models.
//!
//! This module contains the [`Holiday`] entry loaded from configuration and the
//! [`HolidaySet`] used by the working-day counter.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A named holiday.
///
/// # Example
///
/// ```
/// use erp_rules_engine::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     date: NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
///     name: "Independence Day".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday (e.g., "Labour Day").
    pub name: String,
}

/// A set of calendar dates excluded from working-day counts.
///
/// Fridays are excluded by rule and never need to be listed here.
///
/// # Example
///
/// ```
/// use erp_rules_engine::models::HolidaySet;
/// use chrono::NaiveDate;
///
/// let holidays = HolidaySet::from_iso_strings(["2025-05-01", "2025-09-16T00:00:00Z", "bogus"]);
/// assert_eq!(holidays.len(), 2);
/// assert!(holidays.contains(NaiveDate::from_ymd_opt(2025, 9, 16).unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    /// Creates an empty holiday set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from ISO date strings.
    ///
    /// Only the leading `YYYY-MM-DD` part of each string is used, so timestamps
    /// are accepted. Strings that do not start with a valid date are skipped.
    pub fn from_iso_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for value in values {
            let value = value.as_ref().trim();
            match value
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            {
                Some(date) => set.insert(date),
                None => warn!(value = %value, "Skipping malformed holiday date"),
            }
        }
        set
    }

    /// Adds a date to the set.
    pub fn insert(&mut self, date: NaiveDate) {
        self.dates.insert(date);
    }

    /// Adds every date from another set.
    pub fn extend(&mut self, other: &HolidaySet) {
        self.dates.extend(other.dates.iter().copied());
    }

    /// Returns true if `date` is a listed holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Number of distinct dates in the set.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the set holds no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates the dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a Holiday> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = &'a Holiday>>(iter: T) -> Self {
        iter.into_iter().map(|h| h.date).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_iso_strings_normalizes_timestamps() {
        let set = HolidaySet::from_iso_strings(["2025-10-23T00:00:00.000Z", "2025-10-23"]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(date(2025, 10, 23)));
    }

    #[test]
    fn test_from_iso_strings_skips_malformed() {
        let set = HolidaySet::from_iso_strings(["", "23/10/2025", "2025-13-01", "2025-02-17"]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(date(2025, 2, 17)));
    }

    #[test]
    fn test_collect_from_holidays() {
        let holidays = vec![
            Holiday {
                date: date(2025, 5, 1),
                name: "Labour Day".to_string(),
            },
            Holiday {
                date: date(2025, 9, 16),
                name: "Martyrs' Day".to_string(),
            },
        ];
        let set: HolidaySet = holidays.iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![date(2025, 5, 1), date(2025, 9, 16)]);
    }

    #[test]
    fn test_extend_merges_sets() {
        let mut base = HolidaySet::from_iso_strings(["2025-05-01"]);
        let extra = HolidaySet::from_iso_strings(["2025-05-01", "2025-05-02"]);
        base.extend(&extra);
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_serializes_as_plain_date_list() {
        let set = HolidaySet::from_iso_strings(["2025-12-24", "2025-02-17"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["2025-02-17","2025-12-24"]"#);

        let parsed: HolidaySet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_deserialize_holiday() {
        let json = r#"{ "date": "2025-12-24", "name": "Independence Day" }"#;
        let holiday: Holiday = serde_json::from_str(json).unwrap();
        assert_eq!(holiday.date, date(2025, 12, 24));
        assert_eq!(holiday.name, "Independence Day");
    }
}
