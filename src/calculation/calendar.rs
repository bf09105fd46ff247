//! Working-day counting and calendar arithmetic.
//!
//! The weekly rest day is Friday. Holidays come from the configured calendar
//! plus any dates supplied with a request.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::HolidaySet;

/// The weekly rest day, never counted as a working day.
pub const REST_DAY: Weekday = Weekday::Fri;

/// How far [`next_workday`] searches before giving up.
pub const MAX_WORKDAY_SEARCH_DAYS: u32 = 366;

/// Returns true if `date` is the weekly rest day.
pub fn is_rest_day(date: NaiveDate) -> bool {
    date.weekday() == REST_DAY
}

/// Returns true if `date` counts as a working day.
pub fn is_working_day(date: NaiveDate, holidays: &HolidaySet) -> bool {
    !is_rest_day(date) && !holidays.contains(date)
}

/// Counts the working days between `start` and `end`, both inclusive.
///
/// Fridays and holidays are skipped. An inverted range counts as empty.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::count_effective_days;
/// use erp_rules_engine::models::HolidaySet;
/// use chrono::NaiveDate;
///
/// // Sunday 2025-04-27 to Saturday 2025-05-03: one Friday, one Labour Day.
/// let holidays = HolidaySet::from_iso_strings(["2025-05-01"]);
/// let start = NaiveDate::from_ymd_opt(2025, 4, 27).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
/// assert_eq!(count_effective_days(start, end, &holidays), 5);
/// assert_eq!(count_effective_days(end, start, &holidays), 0);
/// ```
pub fn count_effective_days(start: NaiveDate, end: NaiveDate, holidays: &HolidaySet) -> u32 {
    if start > end {
        return 0;
    }

    let count = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_working_day(*day, holidays))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Finds the first working day strictly after `from`.
///
/// Used as the return-to-work date after a leave period. Returns `None` only
/// if every day in the next [`MAX_WORKDAY_SEARCH_DAYS`] days is excluded.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::next_workday;
/// use erp_rules_engine::models::HolidaySet;
/// use chrono::NaiveDate;
///
/// // Thursday; Friday is the rest day and Saturday is a holiday.
/// let thursday = NaiveDate::from_ymd_opt(2025, 7, 3).unwrap();
/// let holidays = HolidaySet::from_iso_strings(["2025-07-05"]);
/// assert_eq!(
///     next_workday(thursday, &holidays),
///     NaiveDate::from_ymd_opt(2025, 7, 6),
/// );
/// ```
pub fn next_workday(from: NaiveDate, holidays: &HolidaySet) -> Option<NaiveDate> {
    from.iter_days()
        .skip(1)
        .take(MAX_WORKDAY_SEARCH_DAYS as usize)
        .find(|day| is_working_day(*day, holidays))
}

/// Number of calendar days from `start` to `end`, both inclusive.
///
/// Returns 0 when `end` is before `start`.
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() + 1;
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Adds whole calendar years to a date.
///
/// 29 February rolls over to 1 March when the target year is not a leap year.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

/// The anniversary of `date` falling in `year`.
pub fn anniversary_in_year(date: NaiveDate, year: i32) -> NaiveDate {
    add_years(date, year - date.year())
}

/// The day before `date`, saturating at the earliest representable date.
pub(crate) fn day_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}
