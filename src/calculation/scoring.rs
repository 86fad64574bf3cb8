//! Performance scoring.
//!
//! An employee's score is a weighted blend of four rates over a window:
//! attendance, punctuality, work hours and consistency. Scores are computed
//! independently per employee and ranked afterwards.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ScoringPolicy;
use crate::models::{
    AttendanceRecord, DEPARTMENT_NOT_SET, EmployeeSummary, Grade, LeaveRequest, PerformanceScore,
    ReportWindow, ScoreBreakdown, ScoreMetrics,
};

use super::aggregation::{FULL_CREDIT, count_working_days, minute_of_day, percentage};

/// Computes the unranked performance score of one employee.
///
/// `records` may contain attendance outside the window; only dates inside
/// the window are considered. `approved_leaves` should hold the employee's
/// approved leave requests; non-approved entries are ignored.
///
/// An employee with no records never fails: attendance falls back to full
/// credit when nothing was expected, punctuality to full credit, work hours
/// to zero and consistency to full credit.
///
/// # Example
///
/// ```
/// use workforce_analytics::calculation::compute_score;
/// use workforce_analytics::config::ScoringPolicy;
/// use workforce_analytics::models::{EmployeeSummary, ReportWindow, Role};
/// use rust_decimal::Decimal;
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
/// let window = ReportWindow::month(2026, 2).unwrap();
/// let score = compute_score(&employee, &[], &[], &window, &ScoringPolicy::default());
/// assert_eq!(score.breakdown.work_hours, Decimal::ZERO);
/// assert_eq!(score.breakdown.consistency, Decimal::from(100));
/// ```
pub fn compute_score(
    employee: &EmployeeSummary,
    records: &[AttendanceRecord],
    approved_leaves: &[LeaveRequest],
    window: &ReportWindow,
    policy: &ScoringPolicy,
) -> PerformanceScore {
    let in_window: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| window.contains(r.date))
        .collect();

    // Attendance
    let expected_days = count_working_days(window);
    let leave_days: i64 = approved_leaves
        .iter()
        .filter(|l| l.is_approved())
        .filter_map(|l| window.clip(l.start_date, l.end_date))
        .filter_map(|(start, end)| ReportWindow::new(start, end).ok())
        .map(|clipped| count_working_days(&clipped))
        .sum();
    let expected_present_days = expected_days - leave_days;

    let mut present_dates: Vec<NaiveDate> = in_window
        .iter()
        .filter(|r| r.is_present())
        .map(|r| r.date)
        .collect();
    present_dates.sort();
    present_dates.dedup();
    let days_present = present_dates.len() as u32;

    let attendance_rate =
        percentage(days_present, expected_present_days, FULL_CREDIT).min(Decimal::ONE_HUNDRED);

    // Punctuality
    let cutoff = minute_of_day(policy.on_time_cutoff);
    let on_time = in_window
        .iter()
        .filter_map(|r| r.check_in)
        .filter(|t| minute_of_day(*t) <= cutoff)
        .count() as u32;
    let punctuality_rate = percentage(on_time, days_present, FULL_CREDIT);

    // Work hours
    let durations: Vec<Decimal> = in_window.iter().filter_map(|r| r.worked_hours()).collect();
    let avg_hours_per_day = if durations.is_empty() {
        Decimal::ZERO
    } else {
        durations.iter().sum::<Decimal>() / Decimal::from(durations.len())
    };
    let hours_score = work_hours_score(avg_hours_per_day, policy);

    // Consistency
    let gaps = present_dates
        .windows(2)
        .filter(|pair| (pair[1] - pair[0]).num_days() > policy.max_gap_days)
        .count() as u32;
    let consistency_score =
        (Decimal::ONE_HUNDRED - Decimal::from(gaps) * policy.gap_penalty).max(Decimal::ZERO);

    let weights = &policy.weights;
    let overall_score = (attendance_rate * weights.attendance
        + punctuality_rate * weights.punctuality
        + hours_score * weights.work_hours
        + consistency_score * weights.consistency)
        .round_dp(1);
    let grade = Grade::from_score(overall_score);

    debug!(
        employee_id = %employee.id,
        days_present,
        expected_present_days,
        gaps,
        overall_score = %overall_score,
        "Computed performance score"
    );

    PerformanceScore {
        employee_id: employee.id.clone(),
        employee_name: employee.full_name.clone(),
        email: employee.email.clone(),
        department: employee.department_or(DEPARTMENT_NOT_SET).to_string(),
        role: employee.role,
        overall_score,
        grade,
        grade_label: grade.label().to_string(),
        breakdown: ScoreBreakdown {
            attendance: attendance_rate.round_dp(1),
            punctuality: punctuality_rate.round_dp(1),
            work_hours: hours_score.round_dp(1),
            consistency: consistency_score.round_dp(1),
        },
        metrics: ScoreMetrics {
            days_present,
            expected_days: expected_present_days,
            attendance_rate: attendance_rate.round_dp(1),
            avg_hours_per_day: avg_hours_per_day.round_dp(1),
            on_time_percentage: punctuality_rate.round_dp(1),
            gaps,
        },
        rank: None,
        percentile: None,
    }
}

/// Scores an average working day against the ideal range.
///
/// Inside the range scores 100; overwork loses points per hour down to a
/// floor; short days scale linearly against the target day.
pub fn work_hours_score(avg_hours: Decimal, policy: &ScoringPolicy) -> Decimal {
    if avg_hours >= policy.ideal_hours_min && avg_hours <= policy.ideal_hours_max {
        Decimal::ONE_HUNDRED
    } else if avg_hours > policy.ideal_hours_max {
        let penalty = (avg_hours - policy.ideal_hours_max) * policy.overwork_penalty_per_hour;
        (Decimal::ONE_HUNDRED - penalty).max(policy.overwork_floor)
    } else if policy.target_hours > Decimal::ZERO {
        avg_hours / policy.target_hours * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Orders scores by overall score descending and assigns rank and percentile.
///
/// The sort is stable, so tied employees keep their input order. Rank is
/// 1-indexed and percentile is `(N - rank + 1) / N * 100` to one decimal.
pub fn rank_scores(mut scores: Vec<PerformanceScore>) -> Vec<PerformanceScore> {
    scores.sort_by(|a, b| b.overall_score.cmp(&a.overall_score));
    let total = scores.len();
    for (idx, score) in scores.iter_mut().enumerate() {
        let rank = idx + 1;
        score.rank = Some(rank as u32);
        score.percentile = Some(
            (Decimal::from(total - idx) / Decimal::from(total) * Decimal::ONE_HUNDRED).round_dp(1),
        );
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, LeaveType, Role};
    use chrono::{NaiveTime, Weekday};
    use std::str::FromStr;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(id: &str) -> EmployeeSummary {
        EmployeeSummary {
            id: id.to_string(),
            employee_code: None,
            company_id: None,
            full_name: format!("Employee {}", id),
            email: format!("{}@acme.test", id),
            role: Role::Employee,
            is_active: true,
            profile: None,
        }
    }

    fn record(date: NaiveDate, check_in: &str, check_out: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "emp_001".to_string(),
            date,
            check_in: Some(make_time(check_in)),
            check_out: Some(make_time(check_out)),
            check_in_location: None,
            check_out_location: None,
            work_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            status: AttendanceStatus::Present,
            notes: String::new(),
        }
    }

    fn approved_leave(start: &str, end: &str) -> LeaveRequest {
        let created = make_date("2026-01-01").and_hms_opt(9, 0, 0).unwrap();
        LeaveRequest::new(
            "leave_001",
            "emp_001",
            LeaveType::Paid,
            make_date(start),
            make_date(end),
            created,
        )
        .unwrap()
        .approved("hr_001", created)
    }

    fn weekdays(window: &ReportWindow) -> Vec<NaiveDate> {
        use chrono::Datelike;
        window
            .days()
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .collect()
    }

    #[test]
    fn test_zero_records_uses_defaults() {
        let window = ReportWindow::month(2026, 2).unwrap();
        let score = compute_score(
            &create_test_employee("emp_001"),
            &[],
            &[],
            &window,
            &ScoringPolicy::default(),
        );
        // 20 working days expected, none present.
        assert_eq!(score.breakdown.attendance, Decimal::ZERO);
        assert_eq!(score.breakdown.punctuality, dec("100"));
        assert_eq!(score.breakdown.work_hours, Decimal::ZERO);
        assert_eq!(score.breakdown.consistency, dec("100"));
        assert_eq!(score.department, "Not Set");
        // 0*0.35 + 100*0.25 + 0*0.25 + 100*0.15 = 40
        assert_eq!(score.overall_score, dec("40.0"));
        assert_eq!(score.grade, Grade::D);
    }

    #[test]
    fn test_weekend_window_gives_full_attendance_credit() {
        let window = ReportWindow::new(make_date("2026-02-07"), make_date("2026-02-08")).unwrap();
        let score = compute_score(
            &create_test_employee("emp_001"),
            &[],
            &[],
            &window,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.metrics.expected_days, 0);
        assert_eq!(score.breakdown.attendance, dec("100"));
    }

    #[test]
    fn test_approved_leave_reduces_expected_days() {
        // March 2026 has 22 working days.
        let window = ReportWindow::month(2026, 3).unwrap();
        let days = weekdays(&window);
        assert_eq!(days.len(), 22);

        // Leave on Mon 2026-03-02 and Tue 2026-03-03; present on the other 20.
        let records: Vec<AttendanceRecord> = days
            .iter()
            .filter(|d| **d != make_date("2026-03-02") && **d != make_date("2026-03-03"))
            .map(|d| record(*d, "09:00:00", "17:00:00"))
            .collect();
        let leaves = vec![approved_leave("2026-03-02", "2026-03-03")];

        let score = compute_score(
            &create_test_employee("emp_001"),
            &records,
            &leaves,
            &window,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.metrics.expected_days, 20);
        assert_eq!(score.metrics.days_present, 20);
        assert_eq!(score.metrics.attendance_rate, dec("100"));
        assert_eq!(score.overall_score, dec("100.0"));
        assert_eq!(score.grade, Grade::APlus);
        assert_eq!(score.grade_label, "A+ (Excellent)");
    }

    #[test]
    fn test_attendance_rate_is_capped_at_100() {
        let window = ReportWindow::new(make_date("2026-03-02"), make_date("2026-03-08")).unwrap();
        // Five weekdays plus a weekend day present; one weekday on approved leave.
        let records: Vec<AttendanceRecord> = window
            .days()
            .map(|d| record(d, "09:00:00", "17:00:00"))
            .collect();
        let leaves = vec![approved_leave("2026-03-02", "2026-03-02")];
        let score = compute_score(
            &create_test_employee("emp_001"),
            &records,
            &leaves,
            &window,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.metrics.attendance_rate, dec("100"));
    }

    #[test]
    fn test_punctuality_uses_minute_resolution() {
        let window = ReportWindow::new(make_date("2026-03-02"), make_date("2026-03-03")).unwrap();
        let records = vec![
            record(make_date("2026-03-02"), "09:15:45", "17:00:00"),
            record(make_date("2026-03-03"), "09:16:00", "17:00:00"),
        ];
        let score = compute_score(
            &create_test_employee("emp_001"),
            &records,
            &[],
            &window,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.breakdown.punctuality, dec("50"));
    }

    #[test]
    fn test_work_hours_score_bands() {
        let policy = ScoringPolicy::default();
        assert_eq!(work_hours_score(dec("8"), &policy), dec("100"));
        assert_eq!(work_hours_score(dec("7.5"), &policy), dec("100"));
        assert_eq!(work_hours_score(dec("9.5"), &policy), dec("100"));
        assert_eq!(work_hours_score(dec("11.5"), &policy), dec("90"));
        assert_eq!(work_hours_score(dec("20"), &policy), dec("80"));
        assert_eq!(work_hours_score(dec("6"), &policy), dec("75"));
        assert_eq!(work_hours_score(Decimal::ZERO, &policy), Decimal::ZERO);
    }

    #[test]
    fn test_consistency_counts_gaps_longer_than_three_days() {
        let window = ReportWindow::month(2026, 3).unwrap();
        let records = vec![
            record(make_date("2026-03-02"), "09:00:00", "17:00:00"),
            record(make_date("2026-03-05"), "09:00:00", "17:00:00"), // 3 days: no gap
            record(make_date("2026-03-10"), "09:00:00", "17:00:00"), // 5 days: gap
            record(make_date("2026-03-20"), "09:00:00", "17:00:00"), // 10 days: gap
        ];
        let score = compute_score(
            &create_test_employee("emp_001"),
            &records,
            &[],
            &window,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.metrics.gaps, 2);
        assert_eq!(score.breakdown.consistency, dec("80"));
    }

    #[test]
    fn test_records_outside_window_are_ignored() {
        let window = ReportWindow::new(make_date("2026-03-02"), make_date("2026-03-02")).unwrap();
        let records = vec![
            record(make_date("2026-03-01"), "11:00:00", "12:00:00"),
            record(make_date("2026-03-02"), "09:00:00", "17:00:00"),
        ];
        let score = compute_score(
            &create_test_employee("emp_001"),
            &records,
            &[],
            &window,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.metrics.days_present, 1);
        assert_eq!(score.metrics.avg_hours_per_day, dec("8"));
    }

    #[test]
    fn test_rank_scores_is_stable_with_percentiles() {
        let window = ReportWindow::month(2026, 2).unwrap();
        let policy = ScoringPolicy::default();
        let mut scores: Vec<PerformanceScore> = ["a", "b", "c"]
            .iter()
            .map(|id| compute_score(&create_test_employee(id), &[], &[], &window, &policy))
            .collect();
        scores[1].overall_score = dec("75.0");

        let ranked = rank_scores(scores);
        let order: Vec<&str> = ranked.iter().map(|s| s.employee_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(ranked[0].rank, Some(1));
        assert_eq!(ranked[0].percentile, Some(dec("100.0")));
        assert_eq!(ranked[1].percentile, Some(dec("66.7")));
        assert_eq!(ranked[2].percentile, Some(dec("33.3")));
    }

    #[test]
    fn test_rank_scores_empty() {
        assert!(rank_scores(Vec::new()).is_empty());
    }
}
