//! Attendance period report.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReportContext, ReportStamp};
use crate::calculation::{NO_CREDIT, mean, percentage};
use crate::error::AnalyticsResult;
use crate::models::{
    AttendanceRecord, AttendanceStatus, DEPARTMENT_UNKNOWN, EmployeeSummary, ReportWindow,
};
use crate::repository::{AttendanceQuery, RecordIndex};

const TOP_PERFORMERS: usize = 5;

/// Parameters of an attendance report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReportQuery {
    /// Period covered.
    pub window: ReportWindow,
    /// Restrict to one employee.
    pub employee_id: Option<String>,
    /// Restrict to one department.
    pub department: Option<String>,
}

impl AttendanceReportQuery {
    /// A report over every employee for `window`.
    pub fn new(window: ReportWindow) -> Self {
        Self {
            window,
            employee_id: None,
            department: None,
        }
    }
}

/// Status counts over the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Active employees in scope.
    pub total_employees: usize,
    /// PRESENT records.
    pub present: usize,
    /// ABSENT records.
    pub absent: usize,
    /// LEAVE records.
    pub leave: usize,
    /// HALF_DAY records.
    pub half_day: usize,
    /// Mean recorded work hours, two decimal places.
    pub avg_work_hours: Decimal,
}

/// Status counts for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendance {
    /// The day.
    pub date: NaiveDate,
    /// PRESENT records.
    pub present: usize,
    /// ABSENT records.
    pub absent: usize,
    /// LEAVE records.
    pub leave: usize,
    /// HALF_DAY records.
    pub half_day: usize,
}

/// Headcount and presence of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentAttendance {
    /// Active employees in the department.
    pub total: usize,
    /// Employees with at least one PRESENT record.
    pub present: usize,
    /// `present / total * 100`, one decimal place.
    pub present_percentage: Decimal,
}

/// An employee ranked by attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePerformer {
    /// Employee id.
    pub employee_id: String,
    /// Full name.
    pub name: String,
    /// Department or the report sentinel.
    pub department: String,
    /// PRESENT records over all records, one decimal place.
    pub attendance_percentage: Decimal,
    /// Mean recorded work hours, one decimal place.
    pub avg_hours: Decimal,
}

/// One attendance record with its employee's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// Employee code.
    pub employee_code: String,
    /// Full name.
    pub employee_name: String,
    /// Email.
    pub email: String,
    /// Department, empty when unset.
    pub department: String,
    /// Record date.
    pub date: NaiveDate,
    /// Check-in time.
    pub check_in: Option<NaiveTime>,
    /// Check-in location.
    pub check_in_location: Option<String>,
    /// Check-out time.
    pub check_out: Option<NaiveTime>,
    /// Check-out location.
    pub check_out_location: Option<String>,
    /// Standard hours.
    pub work_hours: Decimal,
    /// Hours beyond the standard day.
    pub extra_hours: Decimal,
    /// Status.
    pub status: AttendanceStatus,
    /// Notes.
    pub notes: String,
}

impl AttendanceRow {
    fn new(employee: Option<&EmployeeSummary>, record: &AttendanceRecord) -> Self {
        Self {
            employee_code: employee
                .map(|e| e.display_code().to_string())
                .unwrap_or_else(|| record.employee_id.clone()),
            employee_name: employee.map(|e| e.full_name.clone()).unwrap_or_default(),
            email: employee.map(|e| e.email.clone()).unwrap_or_default(),
            department: employee
                .and_then(|e| e.department())
                .unwrap_or_default()
                .to_string(),
            date: record.date,
            check_in: record.check_in,
            check_in_location: record.check_in_location.clone(),
            check_out: record.check_out,
            check_out_location: record.check_out_location.clone(),
            work_hours: record.work_hours,
            extra_hours: record.extra_hours,
            status: record.status,
            notes: record.notes.clone(),
        }
    }
}

/// Attendance over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Period covered.
    pub window: ReportWindow,
    /// Status totals.
    pub summary: AttendanceSummary,
    /// Per-day counts up to the as-of date.
    pub daily_trend: Vec<DailyAttendance>,
    /// Per-department presence.
    pub department_stats: BTreeMap<String, DepartmentAttendance>,
    /// Best attendance, then hours.
    pub top_performers: Vec<AttendancePerformer>,
    /// Every record, newest first.
    pub records: Vec<AttendanceRow>,
}

#[derive(Default)]
pub(super) struct StatusCounts {
    pub(super) present: usize,
    pub(super) absent: usize,
    pub(super) leave: usize,
    pub(super) half_day: usize,
}

impl StatusCounts {
    pub(super) fn tally<'r>(records: impl IntoIterator<Item = &'r AttendanceRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.status {
                AttendanceStatus::Present => counts.present += 1,
                AttendanceStatus::Absent => counts.absent += 1,
                AttendanceStatus::Leave => counts.leave += 1,
                AttendanceStatus::HalfDay => counts.half_day += 1,
            }
        }
        counts
    }
}

/// Compiles the attendance report.
pub fn attendance_report(
    ctx: &ReportContext<'_>,
    query: &AttendanceReportQuery,
) -> AnalyticsResult<AttendanceReport> {
    let repository = ctx.repository();
    let employees = repository.employees(
        &ctx.all_employees()
            .department(query.department.as_deref())
            .employee(query.employee_id.as_deref()),
    )?;
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, query.window))?;
    let active: Vec<&EmployeeSummary> = employees.iter().filter(|e| e.is_active).collect();
    debug!(
        employees = employees.len(),
        records = records.len(),
        window = %query.window.label(),
        "Compiling attendance report"
    );

    let counts = StatusCounts::tally(&records);
    let hours: Vec<Decimal> = records.iter().map(|r| r.work_hours).collect();
    let summary = AttendanceSummary {
        total_employees: active.len(),
        present: counts.present,
        absent: counts.absent,
        leave: counts.leave,
        half_day: counts.half_day,
        avg_work_hours: mean(&hours).unwrap_or(Decimal::ZERO).round_dp(2),
    };

    let mut by_date: BTreeMap<NaiveDate, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in &records {
        by_date.entry(record.date).or_default().push(record);
    }
    let daily_trend = query
        .window
        .until(ctx.as_of())
        .map(|trend_window| {
            trend_window
                .days()
                .map(|date| {
                    let counts = StatusCounts::tally(
                        by_date.get(&date).into_iter().flatten().copied(),
                    );
                    DailyAttendance {
                        date,
                        present: counts.present,
                        absent: counts.absent,
                        leave: counts.leave,
                        half_day: counts.half_day,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let index = RecordIndex::build(records.clone(), Vec::new());

    let mut department_stats: BTreeMap<String, DepartmentAttendance> = BTreeMap::new();
    for employee in &active {
        let stats = department_stats
            .entry(employee.department_or(DEPARTMENT_UNKNOWN).to_string())
            .or_insert(DepartmentAttendance {
                total: 0,
                present: 0,
                present_percentage: Decimal::ZERO,
            });
        stats.total += 1;
        if index
            .attendance_for(&employee.id)
            .iter()
            .any(|r| r.status == AttendanceStatus::Present)
        {
            stats.present += 1;
        }
    }
    for stats in department_stats.values_mut() {
        stats.present_percentage =
            percentage(stats.present as u64, stats.total as u64, NO_CREDIT).round_dp(1);
    }

    let mut top_performers: Vec<AttendancePerformer> = active
        .iter()
        .filter_map(|employee| {
            let own = index.attendance_for(&employee.id);
            if own.is_empty() {
                return None;
            }
            let present = own
                .iter()
                .filter(|r| r.status == AttendanceStatus::Present)
                .count();
            let hours: Vec<Decimal> = own.iter().map(|r| r.work_hours).collect();
            Some(AttendancePerformer {
                employee_id: employee.id.clone(),
                name: employee.full_name.clone(),
                department: employee.department_or(DEPARTMENT_UNKNOWN).to_string(),
                attendance_percentage: percentage(present as u64, own.len() as u64, NO_CREDIT)
                    .round_dp(1),
                avg_hours: mean(&hours).unwrap_or(Decimal::ZERO).round_dp(1),
            })
        })
        .collect();
    top_performers.sort_by(|a, b| {
        b.attendance_percentage
            .cmp(&a.attendance_percentage)
            .then_with(|| b.avg_hours.cmp(&a.avg_hours))
    });
    top_performers.truncate(TOP_PERFORMERS);

    let by_id: HashMap<&str, &EmployeeSummary> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();
    let mut rows: Vec<AttendanceRow> = records
        .iter()
        .map(|r| AttendanceRow::new(by_id.get(r.employee_id.as_str()).copied(), r))
        .collect();
    rows.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.employee_code.cmp(&b.employee_code))
    });

    Ok(AttendanceReport {
        stamp: ctx.stamp(),
        window: query.window,
        summary,
        daily_trend,
        department_stats,
        top_performers,
        records: rows,
    })
}
