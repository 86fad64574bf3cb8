//! Aggregation primitives shared by every engine.
//!
//! Work-duration arithmetic, standard-hours capping, working-day counting,
//! zero-guarded percentages and date bucketing all live here so the scoring,
//! forecasting, anomaly and report code never re-derives them.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike, Weekday};
use rust_decimal::Decimal;

use crate::models::ReportWindow;

/// Hours in a standard working day. Anything beyond is extra time.
pub const STANDARD_WORK_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Default for a percentage whose denominator is empty and the metric should
/// give the employee full credit.
pub const FULL_CREDIT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Default for a percentage whose denominator is empty and nothing was earned.
pub const NO_CREDIT: Decimal = Decimal::ZERO;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Computes the hours elapsed between a check-in and a check-out recorded on
/// the same calendar date.
///
/// A check-out earlier than the check-in is treated as crossing midnight.
///
/// # Example
///
/// ```
/// use workforce_analytics::calculation::work_duration_hours;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let check_in = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
/// let check_out = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
/// assert_eq!(work_duration_hours(check_in, check_out), Decimal::from(8));
/// ```
pub fn work_duration_hours(check_in: NaiveTime, check_out: NaiveTime) -> Decimal {
    let mut seconds = check_out.signed_duration_since(check_in).num_seconds();
    if seconds < 0 {
        seconds += SECONDS_PER_DAY;
    }
    Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
}

/// Splits a duration into standard hours (capped at the standard day) and
/// extra hours.
///
/// # Example
///
/// ```
/// use workforce_analytics::calculation::{split_standard_hours, STANDARD_WORK_HOURS};
/// use rust_decimal::Decimal;
///
/// let (work, extra) = split_standard_hours(Decimal::new(95, 1), STANDARD_WORK_HOURS);
/// assert_eq!(work, Decimal::from(8));
/// assert_eq!(extra, Decimal::new(15, 1));
/// ```
pub fn split_standard_hours(duration: Decimal, standard: Decimal) -> (Decimal, Decimal) {
    let work = duration.min(standard);
    let extra = (duration - standard).max(Decimal::ZERO);
    (work, extra)
}

/// Returns true for Monday through Friday. There is no holiday calendar.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts the working days of an inclusive window.
pub fn count_working_days(window: &ReportWindow) -> i64 {
    window.days().filter(|d| is_working_day(*d)).count() as i64
}

/// Computes `numerator / denominator * 100`, or `when_empty` if the
/// denominator is not positive.
///
/// Every ratio in the engine goes through this guard; callers pick
/// [`FULL_CREDIT`] or [`NO_CREDIT`] explicitly.
///
/// # Example
///
/// ```
/// use workforce_analytics::calculation::{percentage, FULL_CREDIT, NO_CREDIT};
/// use rust_decimal::Decimal;
///
/// assert_eq!(percentage(3u32, 4u32, NO_CREDIT), Decimal::from(75));
/// assert_eq!(percentage(0u32, 0u32, FULL_CREDIT), Decimal::from(100));
/// ```
pub fn percentage(
    numerator: impl Into<Decimal>,
    denominator: impl Into<Decimal>,
    when_empty: Decimal,
) -> Decimal {
    let denominator = denominator.into();
    if denominator <= Decimal::ZERO {
        return when_empty;
    }
    numerator.into() / denominator * Decimal::ONE_HUNDRED
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total: Decimal = values.iter().sum();
    Some(total / Decimal::from(values.len()))
}

/// The Monday starting the week that contains `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// The first day of the month that contains `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Minutes since midnight, ignoring seconds.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
