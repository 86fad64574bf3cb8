//! Burnout risk assessment.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::BurnoutPolicy;
use crate::models::{
    AttendanceRecord, BurnoutRisk, DEPARTMENT_NOT_SET, DaysSinceLeave, EmployeeSummary,
    LeaveRequest, ReportWindow, RiskLevel,
};

/// Scores an employee's burnout risk from recent hours, leave and rest days.
///
/// Signals, each adding points to a 0-100 score:
/// - average hours over complete records in the hours window above the limit;
/// - no approved leave starting in the leave window;
/// - more complete records in the hours window than the rest-day limit.
///
/// Returns `None` when the score is below the report threshold.
///
/// # Example
///
/// ```
/// use workforce_analytics::calculation::assess_burnout;
/// use workforce_analytics::config::BurnoutPolicy;
/// use workforce_analytics::models::{EmployeeSummary, Role};
/// use chrono::NaiveDate;
///
/// let employee = EmployeeSummary {
///     id: "emp_001".to_string(),
///     employee_code: None,
///     company_id: None,
///     full_name: "Asha Rao".to_string(),
///     email: "asha@acme.test".to_string(),
///     role: Role::Employee,
///     is_active: true,
///     profile: None,
/// };
/// let as_of = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
/// // No records and no leave: 30 points, below the report threshold.
/// assert!(assess_burnout(&employee, &[], &[], as_of, &BurnoutPolicy::default()).is_none());
/// ```
pub fn assess_burnout(
    employee: &EmployeeSummary,
    records: &[AttendanceRecord],
    leaves: &[LeaveRequest],
    as_of: NaiveDate,
    policy: &BurnoutPolicy,
) -> Option<BurnoutRisk> {
    let hours_window = ReportWindow::lookback(as_of, policy.hours_lookback_days);
    let leave_window = ReportWindow::lookback(as_of, policy.leave_lookback_days);

    let durations: Vec<Decimal> = records
        .iter()
        .filter(|r| hours_window.contains(r.date))
        .filter_map(|r| r.worked_hours())
        .collect();
    let work_days = durations.len() as u32;
    let avg_hours_per_day = if durations.is_empty() {
        Decimal::ZERO
    } else {
        durations.iter().sum::<Decimal>() / Decimal::from(durations.len())
    };

    let recent_leaves = leaves
        .iter()
        .filter(|l| l.is_approved() && leave_window.contains(l.start_date))
        .count();

    let mut risk_score = 0;
    let mut risk_factors = Vec::new();

    if avg_hours_per_day > policy.long_hours {
        risk_score += policy.long_hours_points;
        risk_factors.push("Long working hours".to_string());
    }
    if recent_leaves == 0 {
        risk_score += policy.no_leave_points;
        risk_factors.push(format!(
            "No leave taken in {} days",
            policy.leave_lookback_days
        ));
    }
    if work_days > policy.rest_days_limit {
        risk_score += policy.rest_days_points;
        risk_factors.push("Minimal rest days".to_string());
    }

    if risk_score < policy.report_threshold {
        return None;
    }

    debug!(
        employee_id = %employee.id,
        risk_score,
        work_days,
        avg_hours = %avg_hours_per_day,
        "Burnout risk detected"
    );

    let risk_level = if risk_score >= policy.high_threshold {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    Some(BurnoutRisk {
        employee_id: employee.id.clone(),
        employee_name: employee.full_name.clone(),
        email: employee.email.clone(),
        department: employee.department_or(DEPARTMENT_NOT_SET).to_string(),
        risk_score,
        risk_level,
        risk_factors,
        avg_hours_per_day: avg_hours_per_day.round_dp(1),
        days_since_last_leave: days_since_last_leave(leaves, as_of),
    })
}

/// Days from the end of the latest approved leave to `as_of`.
///
/// Only leave that has started by `as_of` counts; a leave still running is
/// zero days ago.
pub fn days_since_last_leave(leaves: &[LeaveRequest], as_of: NaiveDate) -> DaysSinceLeave {
    leaves
        .iter()
        .filter(|l| l.is_approved() && l.start_date <= as_of)
        .map(|l| l.end_date)
        .max()
        .map(|end| DaysSinceLeave::Days((as_of - end).num_days().max(0)))
        .unwrap_or(DaysSinceLeave::NEVER)
}

/// Sorts risks by score, highest first. Ties keep their input order.
pub fn sort_by_risk(risks: &mut [BurnoutRisk]) {
    risks.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
}
