//! Rule-based anomaly detection.
//!
//! Each rule inspects one employee's records over the scan window and emits at
//! most one finding. Findings fall into four categories: attendance, leave,
//! productivity and policy.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnomalyPolicy;
use crate::models::{
    AnomalyCategory, AnomalyFinding, AttendanceRecord, EmployeeSummary, LeaveRequest, LeaveType,
    ReportWindow, Severity,
};

use super::aggregation::{is_working_day, minute_of_day};

/// Runs every anomaly rule for one employee.
///
/// `window` is normally `[as_of - lookback_days, as_of]`. `records` and
/// `leaves` may extend outside it; each rule filters to the window itself.
/// Leave rules count requests of every status.
pub fn scan_employee(
    employee: &EmployeeSummary,
    records: &[AttendanceRecord],
    leaves: &[LeaveRequest],
    window: &ReportWindow,
    as_of: NaiveDate,
    policy: &AnomalyPolicy,
) -> Vec<AnomalyFinding> {
    let in_window: Vec<&AttendanceRecord> =
        records.iter().filter(|r| window.contains(r.date)).collect();
    let started_in_window: Vec<&LeaveRequest> = leaves
        .iter()
        .filter(|l| window.contains(l.start_date))
        .collect();
    // Approved leave that started before the window still excuses absences.
    let approved: Vec<&LeaveRequest> = leaves.iter().filter(|l| l.is_approved()).collect();

    let lookback_days = window.len_days() - 1;

    let mut findings = Vec::new();
    findings.extend(chronic_late_check_ins(employee, &in_window, policy));
    findings.extend(early_check_ins(employee, &in_window, policy));
    findings.extend(repetitive_check_in_time(employee, &in_window, policy));
    findings.extend(weekend_extension(employee, &started_in_window, lookback_days, policy));
    findings.extend(excessive_sick_leave(employee, &started_in_window, lookback_days, policy));
    findings.extend(working_hours(employee, &in_window, policy));
    findings.extend(unapproved_absences(
        employee, &in_window, &approved, window, as_of, policy,
    ));

    if !findings.is_empty() {
        debug!(
            employee_id = %employee.id,
            findings = findings.len(),
            "Anomalies detected"
        );
    }
    findings
}

fn finding(
    employee: &EmployeeSummary,
    category: AnomalyCategory,
    anomaly_type: &str,
    severity: Severity,
    details: String,
    recommendation: &str,
) -> AnomalyFinding {
    AnomalyFinding {
        employee_id: employee.id.clone(),
        employee_name: employee.full_name.clone(),
        email: employee.email.clone(),
        category,
        anomaly_type: anomaly_type.to_string(),
        severity,
        details,
        recommendation: recommendation.to_string(),
    }
}

/// Share of check-in days above a ratio, without dividing.
fn exceeds_ratio(count: usize, total: usize, ratio: Decimal) -> bool {
    total > 0 && Decimal::from(count) > ratio * Decimal::from(total)
}

fn chronic_late_check_ins(
    employee: &EmployeeSummary,
    records: &[&AttendanceRecord],
    policy: &AnomalyPolicy,
) -> Option<AnomalyFinding> {
    let cutoff = minute_of_day(policy.late_after);
    let check_ins: Vec<_> = records.iter().filter_map(|r| r.check_in).collect();
    let late = check_ins
        .iter()
        .filter(|t| minute_of_day(**t) > cutoff)
        .count();

    exceeds_ratio(late, check_ins.len(), policy.late_ratio).then(|| {
        finding(
            employee,
            AnomalyCategory::Attendance,
            "Chronic Late Check-ins",
            Severity::Medium,
            format!("{} out of {} days", late, check_ins.len()),
            "Discuss flexible work hours or address punctuality",
        )
    })
}

fn early_check_ins(
    employee: &EmployeeSummary,
    records: &[&AttendanceRecord],
    policy: &AnomalyPolicy,
) -> Option<AnomalyFinding> {
    let early = records
        .iter()
        .filter_map(|r| r.check_in)
        .filter(|t| *t < policy.early_before)
        .count();

    (early > policy.early_count as usize).then(|| {
        finding(
            employee,
            AnomalyCategory::Attendance,
            "Unusual Early Check-ins",
            Severity::Low,
            format!(
                "{} check-ins before {} AM",
                early,
                policy.early_before.hour()
            ),
            "Verify if legitimate or potential time fraud",
        )
    })
}

fn repetitive_check_in_time(
    employee: &EmployeeSummary,
    records: &[&AttendanceRecord],
    policy: &AnomalyPolicy,
) -> Option<AnomalyFinding> {
    let bucket_width = policy.cluster_bucket_minutes.max(1);
    let mut buckets: BTreeMap<(u32, u32), usize> = BTreeMap::new();
    let mut total = 0;
    for check_in in records.iter().filter_map(|r| r.check_in) {
        total += 1;
        *buckets
            .entry((check_in.hour(), check_in.minute() / bucket_width))
            .or_default() += 1;
    }

    let count = buckets.values().copied().find(|count| {
        *count > policy.cluster_min_count as usize
            && exceeds_ratio(*count, total, policy.cluster_ratio)
    })?;

    Some(finding(
        employee,
        AnomalyCategory::Attendance,
        "Repetitive Check-in Time Pattern",
        Severity::High,
        format!("Same check-in time ({} times)", count),
        "Investigate for buddy punching or automated check-ins",
    ))
}

fn weekend_extension(
    employee: &EmployeeSummary,
    leaves: &[&LeaveRequest],
    lookback_days: i64,
    policy: &AnomalyPolicy,
) -> Option<AnomalyFinding> {
    let adjacent = leaves
        .iter()
        .filter(|l| matches!(l.start_date.weekday(), Weekday::Mon | Weekday::Fri))
        .count();

    (adjacent >= policy.weekend_extension_count as usize).then(|| {
        finding(
            employee,
            AnomalyCategory::Leave,
            "Weekend Extension Pattern",
            Severity::Medium,
            format!("{} leaves on Mon/Fri in last {} days", adjacent, lookback_days),
            "Discuss leave planning and weekend extension policy",
        )
    })
}

fn excessive_sick_leave(
    employee: &EmployeeSummary,
    leaves: &[&LeaveRequest],
    lookback_days: i64,
    policy: &AnomalyPolicy,
) -> Option<AnomalyFinding> {
    let sick = leaves
        .iter()
        .filter(|l| l.leave_type == LeaveType::Sick)
        .count();

    (sick > policy.sick_leave_count as usize).then(|| {
        finding(
            employee,
            AnomalyCategory::Leave,
            "Excessive Sick Leave",
            Severity::High,
            format!("{} sick leaves in {} days", sick, lookback_days),
            "Wellness check or medical certificate verification",
        )
    })
}

fn working_hours(
    employee: &EmployeeSummary,
    records: &[&AttendanceRecord],
    policy: &AnomalyPolicy,
) -> Option<AnomalyFinding> {
    let durations: Vec<Decimal> = records.iter().filter_map(|r| r.worked_hours()).collect();
    if durations.is_empty() {
        return None;
    }
    let avg = durations.iter().sum::<Decimal>() / Decimal::from(durations.len());
    let details = format!("Average {:.1} hours/day", avg.round_dp(1));

    if avg < policy.low_hours {
        Some(finding(
            employee,
            AnomalyCategory::Productivity,
            "Low Working Hours",
            Severity::High,
            details,
            "Investigate workload distribution or time management",
        ))
    } else if avg > policy.high_hours {
        Some(finding(
            employee,
            AnomalyCategory::Productivity,
            "Excessive Working Hours",
            Severity::High,
            details,
            "Enforce work-life balance policies",
        ))
    } else {
        None
    }
}

fn unapproved_absences(
    employee: &EmployeeSummary,
    records: &[&AttendanceRecord],
    approved_leaves: &[&LeaveRequest],
    window: &ReportWindow,
    as_of: NaiveDate,
    policy: &AnomalyPolicy,
) -> Option<AnomalyFinding> {
    let missing = window
        .days()
        .filter(|d| *d < as_of && is_working_day(*d))
        .filter(|d| !records.iter().any(|r| r.date == *d))
        .filter(|d| !approved_leaves.iter().any(|l| l.covers(*d)))
        .count();

    (missing > policy.unapproved_absence_days as usize).then(|| {
        finding(
            employee,
            AnomalyCategory::Policy,
            "Unapproved Absences",
            Severity::High,
            format!("{} days without attendance or approved leave", missing),
            "Immediate follow-up required",
        )
    })
}

/// Findings grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedFindings {
    /// Check-in timing findings.
    pub attendance_anomalies: Vec<AnomalyFinding>,
    /// Leave pattern findings.
    pub leave_anomalies: Vec<AnomalyFinding>,
    /// Working-hours findings.
    pub productivity_anomalies: Vec<AnomalyFinding>,
    /// Unexplained absence findings.
    pub policy_violations: Vec<AnomalyFinding>,
}

/// Totals and the HIGH findings surfaced for immediate action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalySummary {
    /// Number of findings across all categories.
    pub total_anomalies: usize,
    /// Number of HIGH findings.
    pub high_severity: usize,
    /// The first HIGH findings in category order.
    pub requires_immediate_action: Vec<AnomalyFinding>,
}

impl CategorizedFindings {
    /// Groups findings by category, each category ordered by employee id.
    pub fn from_findings(mut findings: Vec<AnomalyFinding>) -> Self {
        findings.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        let mut grouped = Self::default();
        for finding in findings {
            grouped.category_mut(finding.category).push(finding);
        }
        grouped
    }

    fn category_mut(&mut self, category: AnomalyCategory) -> &mut Vec<AnomalyFinding> {
        match category {
            AnomalyCategory::Attendance => &mut self.attendance_anomalies,
            AnomalyCategory::Leave => &mut self.leave_anomalies,
            AnomalyCategory::Productivity => &mut self.productivity_anomalies,
            AnomalyCategory::Policy => &mut self.policy_violations,
        }
    }

    /// Findings of one category.
    pub fn category(&self, category: AnomalyCategory) -> &[AnomalyFinding] {
        match category {
            AnomalyCategory::Attendance => &self.attendance_anomalies,
            AnomalyCategory::Leave => &self.leave_anomalies,
            AnomalyCategory::Productivity => &self.productivity_anomalies,
            AnomalyCategory::Policy => &self.policy_violations,
        }
    }

    /// Iterates all findings: attendance, leave, productivity, then policy.
    pub fn iter(&self) -> impl Iterator<Item = &AnomalyFinding> {
        AnomalyCategory::ALL
            .into_iter()
            .flat_map(move |category| self.category(category).iter())
    }

    /// Summarizes the findings, surfacing at most `immediate_action_limit`
    /// HIGH findings.
    pub fn summarize(&self, immediate_action_limit: usize) -> AnomalySummary {
        let high: Vec<&AnomalyFinding> = self
            .iter()
            .filter(|f| f.severity == Severity::High)
            .collect();
        AnomalySummary {
            total_anomalies: self.iter().count(),
            high_severity: high.len(),
            requires_immediate_action: high
                .into_iter()
                .take(immediate_action_limit)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, Role};
    use chrono::NaiveTime;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
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

    fn record(date: NaiveDate, check_in: Option<&str>, check_out: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "emp_001".to_string(),
            date,
            check_in: check_in.map(make_time),
            check_out: check_out.map(make_time),
            check_in_location: None,
            check_out_location: None,
            work_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            status: AttendanceStatus::Present,
            notes: String::new(),
        }
    }

    fn leave(id: &str, leave_type: LeaveType, start: &str, approved: bool) -> LeaveRequest {
        let created = make_date("2026-01-01").and_hms_opt(9, 0, 0).unwrap();
        let request = LeaveRequest::new(
            id,
            "emp_001",
            leave_type,
            make_date(start),
            make_date(start),
            created,
        )
        .unwrap();
        if approved {
            request.approved("hr_001", created)
        } else {
            request
        }
    }

    /// Weekdays from `start`, `count` of them.
    fn weekdays_from(start: &str, count: usize) -> Vec<NaiveDate> {
        make_date(start)
            .iter_days()
            .filter(|d| is_working_day(*d))
            .take(count)
            .collect()
    }

    fn scan(records: &[AttendanceRecord], leaves: &[LeaveRequest], as_of: &str) -> Vec<AnomalyFinding> {
        let policy = AnomalyPolicy::default();
        let as_of = make_date(as_of);
        let window = ReportWindow::lookback(as_of, policy.lookback_days);
        scan_employee(
            &create_test_employee("emp_001"),
            records,
            leaves,
            &window,
            as_of,
            &policy,
        )
    }

    fn types(findings: &[AnomalyFinding]) -> Vec<&str> {
        findings.iter().map(|f| f.anomaly_type.as_str()).collect()
    }

    #[test]
    fn test_chronic_late_check_ins() {
        // 8 of 10 check-ins after 09:30.
        let days = weekdays_from("2026-03-02", 10);
        let records: Vec<AttendanceRecord> = days
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let check_in = if i < 8 { "09:45:00" } else { "09:00:00" };
                record(*d, Some(check_in), Some("18:00:00"))
            })
            .collect();

        let findings = scan(&records, &[], "2026-03-13");
        let late: Vec<&AnomalyFinding> = findings
            .iter()
            .filter(|f| f.anomaly_type == "Chronic Late Check-ins")
            .collect();
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].severity, Severity::Medium);
        assert_eq!(late[0].details, "8 out of 10 days");
        assert_eq!(late[0].category, AnomalyCategory::Attendance);
    }

    #[test]
    fn test_late_ratio_is_strict() {
        // 7 of 10 is exactly 70%: not flagged.
        let days = weekdays_from("2026-03-02", 10);
        let records: Vec<AttendanceRecord> = days
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let check_in = if i < 7 { "09:31:00" } else { "09:30:59" };
                record(*d, Some(check_in), Some("18:00:00"))
            })
            .collect();
        let findings = scan(&records, &[], "2026-03-13");
        assert!(!types(&findings).contains(&"Chronic Late Check-ins"));
    }

    #[test]
    fn test_early_check_ins() {
        let days = weekdays_from("2026-03-02", 6);
        let records: Vec<AttendanceRecord> = days
            .iter()
            .map(|d| record(*d, Some("05:30:00"), Some("13:30:00")))
            .collect();
        let findings = scan(&records, &[], "2026-03-10");
        let early = findings
            .iter()
            .find(|f| f.anomaly_type == "Unusual Early Check-ins")
            .unwrap();
        assert_eq!(early.details, "6 check-ins before 6 AM");
        assert_eq!(early.severity, Severity::Low);
    }

    #[test]
    fn test_repetitive_check_in_time_emits_once() {
        // 11 check-ins at 08:58 or 08:59 (same 2-minute bucket) out of 12.
        let days = weekdays_from("2026-03-02", 12);
        let records: Vec<AttendanceRecord> = days
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let check_in = match i {
                    11 => "10:00:00",
                    n if n % 2 == 0 => "08:58:10",
                    _ => "08:59:50",
                };
                record(*d, Some(check_in), Some("17:00:00"))
            })
            .collect();
        let findings = scan(&records, &[], "2026-03-18");
        let clustered: Vec<&AnomalyFinding> = findings
            .iter()
            .filter(|f| f.anomaly_type == "Repetitive Check-in Time Pattern")
            .collect();
        assert_eq!(clustered.len(), 1);
        assert_eq!(clustered[0].details, "Same check-in time (11 times)");
        assert_eq!(clustered[0].severity, Severity::High);
    }

    #[test]
    fn test_cluster_needs_more_than_ten() {
        let days = weekdays_from("2026-03-02", 10);
        let records: Vec<AttendanceRecord> = days
            .iter()
            .map(|d| record(*d, Some("08:58:00"), Some("17:00:00")))
            .collect();
        let findings = scan(&records, &[], "2026-03-13");
        assert!(!types(&findings).contains(&"Repetitive Check-in Time Pattern"));
    }

    #[test]
    fn test_leave_rules_count_every_status() {
        let leaves = vec![
            leave("l1", LeaveType::Paid, "2026-03-02", true), // Monday
            leave("l2", LeaveType::Paid, "2026-03-06", false), // Friday, pending
            leave("l3", LeaveType::Sick, "2026-03-09", false), // Monday
            leave("l4", LeaveType::Sick, "2026-03-10", true),
            leave("l5", LeaveType::Sick, "2026-03-11", true),
            leave("l6", LeaveType::Sick, "2026-03-12", true),
            leave("l7", LeaveType::Sick, "2026-03-18", false),
        ];
        let findings = scan(&[], &leaves, "2026-03-20");
        let weekend = findings
            .iter()
            .find(|f| f.anomaly_type == "Weekend Extension Pattern")
            .unwrap();
        assert_eq!(weekend.details, "3 leaves on Mon/Fri in last 30 days");
        assert_eq!(weekend.category, AnomalyCategory::Leave);

        let sick = findings
            .iter()
            .find(|f| f.anomaly_type == "Excessive Sick Leave")
            .unwrap();
        assert_eq!(sick.details, "5 sick leaves in 30 days");
    }

    #[test]
    fn test_low_and_excessive_working_hours() {
        let days = weekdays_from("2026-03-02", 3);
        let short: Vec<AttendanceRecord> = days
            .iter()
            .map(|d| record(*d, Some("09:00:00"), Some("14:15:00")))
            .collect();
        let findings = scan(&short, &[], "2026-03-05");
        let low = findings
            .iter()
            .find(|f| f.anomaly_type == "Low Working Hours")
            .unwrap();
        assert_eq!(low.details, "Average 5.2 hours/day");
        assert_eq!(low.category, AnomalyCategory::Productivity);

        let long: Vec<AttendanceRecord> = days
            .iter()
            .map(|d| record(*d, Some("07:00:00"), Some("20:00:00")))
            .collect();
        let findings = scan(&long, &[], "2026-03-05");
        let high = findings
            .iter()
            .find(|f| f.anomaly_type == "Excessive Working Hours")
            .unwrap();
        assert_eq!(high.details, "Average 13.0 hours/day");
        assert_eq!(high.recommendation, "Enforce work-life balance policies");
    }

    #[test]
    fn test_incomplete_records_skip_hours_rules() {
        let days = weekdays_from("2026-03-02", 3);
        let records: Vec<AttendanceRecord> = days
            .iter()
            .map(|d| record(*d, Some("09:00:00"), None))
            .collect();
        let findings = scan(&records, &[], "2026-03-05");
        assert!(
            findings
                .iter()
                .all(|f| f.category != AnomalyCategory::Productivity)
        );
    }

    #[test]
    fn test_unapproved_absences_excludes_as_of_and_approved_leave() {
        // Window 2026-03-02..2026-04-01; records on every weekday except five.
        let as_of = "2026-04-01";
        let window = ReportWindow::lookback(make_date(as_of), 30);
        let skipped = [
            make_date("2026-03-09"),
            make_date("2026-03-10"),
            make_date("2026-03-11"),
            make_date("2026-03-12"),
            make_date("2026-03-13"),
        ];
        let records: Vec<AttendanceRecord> = window
            .days()
            .filter(|d| is_working_day(*d) && !skipped.contains(d))
            .filter(|d| *d != make_date(as_of))
            .map(|d| record(d, Some("09:00:00"), Some("17:00:00")))
            .collect();

        let findings = scan(&records, &[], as_of);
        let violation = findings
            .iter()
            .find(|f| f.anomaly_type == "Unapproved Absences")
            .unwrap();
        assert_eq!(violation.details, "5 days without attendance or approved leave");

        // Two of the five covered by approved leave: 3 is not above the limit.
        let leaves = vec![
            leave("l1", LeaveType::Paid, "2026-03-09", true),
            leave("l2", LeaveType::Paid, "2026-03-10", true),
        ];
        let findings = scan(&records, &leaves, as_of);
        assert!(!types(&findings).contains(&"Unapproved Absences"));
    }

    #[test]
    fn test_categorized_summary() {
        let mut findings = Vec::new();
        for id in ["emp_c", "emp_a", "emp_b"] {
            let employee = create_test_employee(id);
            for category in AnomalyCategory::ALL {
                findings.push(finding(
                    &employee,
                    category,
                    "Test",
                    Severity::High,
                    String::new(),
                    "",
                ));
            }
        }
        findings.push(finding(
            &create_test_employee("emp_z"),
            AnomalyCategory::Attendance,
            "Test",
            Severity::Low,
            String::new(),
            "",
        ));

        let grouped = CategorizedFindings::from_findings(findings);
        let summary = grouped.summarize(5);
        assert_eq!(summary.total_anomalies, 13);
        assert_eq!(summary.high_severity, 12);
        assert_eq!(summary.requires_immediate_action.len(), 5);

        let order: Vec<(AnomalyCategory, &str)> = summary
            .requires_immediate_action
            .iter()
            .map(|f| (f.category, f.employee_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (AnomalyCategory::Attendance, "emp_a"),
                (AnomalyCategory::Attendance, "emp_b"),
                (AnomalyCategory::Attendance, "emp_c"),
                (AnomalyCategory::Leave, "emp_a"),
                (AnomalyCategory::Leave, "emp_b"),
            ]
        );
    }
}
