//! Naive forecasting over short histories.
//!
//! Predictions extrapolate a straight line between the first and last history
//! points. This is intentionally simple; confidence is a coarse label driven
//! only by how many points were available.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ForecastPolicy;
use crate::models::{
    AttendanceRecord, Confidence, Forecast, Insight, InsightKind, LeaveRequest, PeakLeaveDay,
    ReportWindow, Severity, WorkforceAvailability,
};

use super::aggregation::{FULL_CREDIT, NO_CREDIT, mean, month_start, percentage, week_start};

/// Predicts the next value of a per-period count series.
///
/// - Two or more points: `trend = (last - first) / N` and the prediction is
///   `last + trend`, rounded half away from zero and clamped at zero.
/// - One point: that value.
/// - No points: zero.
///
/// Confidence is MEDIUM once `medium_points` points are available, otherwise
/// LOW.
///
/// # Example
///
/// ```
/// use workforce_analytics::calculation::forecast_next_period;
/// use workforce_analytics::models::Confidence;
///
/// let forecast = forecast_next_period(&[4, 6, 8], 3);
/// assert_eq!(forecast.predicted, 9);
/// assert_eq!(forecast.confidence, Confidence::Medium);
///
/// let empty = forecast_next_period(&[], 3);
/// assert_eq!(empty.predicted, 0);
/// assert_eq!(empty.confidence, Confidence::Low);
/// ```
pub fn forecast_next_period(history: &[u32], medium_points: usize) -> Forecast {
    let predicted = match history {
        [] => 0,
        [only] => *only,
        [first, .., last] => {
            let n = Decimal::from(history.len());
            let last = Decimal::from(*last);
            let trend = (last - Decimal::from(*first)) / n;
            (last + trend)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .max(Decimal::ZERO)
                .to_u32()
                .unwrap_or(u32::MAX)
        }
    };

    let confidence = if history.len() >= medium_points {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    Forecast {
        predicted,
        confidence,
        basis_points: history.len(),
    }
}

/// Counts approved leave requests per calendar month of their start date.
///
/// Only months with at least one request appear, in chronological order.
pub fn monthly_leave_counts(leaves: &[LeaveRequest], window: &ReportWindow) -> Vec<u32> {
    let mut by_month: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for leave in leaves
        .iter()
        .filter(|l| l.is_approved() && window.contains(l.start_date))
    {
        *by_month.entry(month_start(leave.start_date)).or_default() += 1;
    }
    by_month.into_values().collect()
}

/// Weekly present counts divided by the active headcount, as percentages.
///
/// Weeks start on Monday and only weeks with at least one present record
/// appear. Every rate is zero when there are no active employees.
pub fn weekly_attendance_rates(
    records: &[AttendanceRecord],
    active_employees: usize,
    window: &ReportWindow,
) -> Vec<Decimal> {
    let mut by_week: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.is_present() && window.contains(r.date))
    {
        *by_week.entry(week_start(record.date)).or_default() += 1;
    }
    by_week
        .into_values()
        .map(|present| percentage(present, active_employees, NO_CREDIT))
        .collect()
}

/// Predicts the attendance rate from weekly rates.
///
/// Uses the mean of the most recent `recent_weeks` rates when that many are
/// available, the mean of all rates otherwise, and the policy default when
/// there is no history.
pub fn predict_attendance_rate(weekly_rates: &[Decimal], policy: &ForecastPolicy) -> Decimal {
    let recent = if weekly_rates.len() >= policy.recent_weeks {
        &weekly_rates[weekly_rates.len() - policy.recent_weeks..]
    } else {
        weekly_rates
    };
    mean(recent).unwrap_or(policy.default_attendance_rate)
}

/// Forecasts how much of the workforce is available over a horizon.
///
/// Every approved leave request overlapping the horizon counts as one
/// employee away.
pub fn forecast_availability(
    active_employees: usize,
    leaves: &[LeaveRequest],
    horizon: &ReportWindow,
) -> WorkforceAvailability {
    let on_leave = leaves
        .iter()
        .filter(|l| l.is_approved() && horizon.overlaps(l.start_date, l.end_date))
        .count();
    let available = active_employees as i64 - on_leave as i64;

    WorkforceAvailability {
        available_employees: available,
        total_employees: active_employees,
        availability_percentage: percentage(available, active_employees, FULL_CREDIT).round_dp(1),
        employees_on_leave: on_leave,
    }
}

/// Groups approved leave starts in the window by weekday, busiest first.
///
/// Ties keep Monday-to-Sunday order. Weekdays without leave are omitted.
pub fn peak_leave_days(leaves: &[LeaveRequest], window: &ReportWindow) -> Vec<PeakLeaveDay> {
    let mut counts = [0u32; 7];
    for leave in leaves
        .iter()
        .filter(|l| l.is_approved() && window.contains(l.start_date))
    {
        counts[leave.start_date.weekday().num_days_from_monday() as usize] += 1;
    }

    let mut days: Vec<PeakLeaveDay> = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(idx, count)| PeakLeaveDay {
            day: weekday_name(idx),
            leave_count: *count,
        })
        .collect();
    days.sort_by(|a, b| b.leave_count.cmp(&a.leave_count));
    days
}

fn weekday_name(days_from_monday: usize) -> String {
    let weekday = match days_from_monday {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    };
    full_weekday_name(weekday).to_string()
}

/// English name of a weekday, e.g. "Monday".
pub fn full_weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Turns the headline predictions into insights for HR.
///
/// Returns a single SUCCESS insight when no threshold is crossed.
pub fn generate_insights(
    predicted_leave_requests: u32,
    predicted_attendance_rate: Decimal,
    burnout_count: usize,
    policy: &ForecastPolicy,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if predicted_leave_requests > policy.high_leave_demand {
        insights.push(Insight {
            kind: InsightKind::Warning,
            category: "Workforce Planning".to_string(),
            message: format!(
                "High leave demand expected ({} requests). Consider hiring temporary staff.",
                predicted_leave_requests
            ),
            priority: Severity::High,
        });
    }

    if predicted_attendance_rate < policy.low_attendance_rate {
        insights.push(Insight {
            kind: InsightKind::Warning,
            category: "Attendance".to_string(),
            message: format!(
                "Low attendance rate predicted ({}%). Review attendance policies.",
                predicted_attendance_rate.round_dp(1)
            ),
            priority: Severity::Medium,
        });
    }

    if burnout_count > 0 {
        insights.push(Insight {
            kind: InsightKind::Alert,
            category: "Employee Wellbeing".to_string(),
            message: format!(
                "{} employees showing burnout risk. Immediate intervention recommended.",
                burnout_count
            ),
            priority: Severity::High,
        });
    }

    if insights.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Success,
            category: "Overall Health".to_string(),
            message: "Workforce metrics are healthy. Continue current practices.".to_string(),
            priority: Severity::Low,
        });
    }

    insights
}
