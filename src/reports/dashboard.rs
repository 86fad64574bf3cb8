//! Analytics dashboard: one snapshot of headcount, attendance, leave and payroll.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::attendance::StatusCounts;
use super::leave::LeaveStatusSummary;
use super::statistics::{
    DailyStatusTrend, DepartmentSalary, ROLES, daily_status_trend, salary_by_department,
};
use super::{ReportContext, ReportStamp};
use crate::calculation::{NO_CREDIT, mean, month_start, percentage};
use crate::error::AnalyticsResult;
use crate::models::{
    AttendanceStatus, EmployeeSummary, LeaveRequest, LeaveStatus, LeaveType, ReportWindow, Role,
};
use crate::repository::{AttendanceQuery, LeaveQuery};

const DASHBOARD_TOP_PERFORMERS: usize = 5;
const RECENT_ACTIVITIES: usize = 5;

/// Calendar position of the as-of date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    /// The as-of date.
    pub today: NaiveDate,
    /// Its month, 1-12.
    pub current_month: u32,
    /// Its year.
    pub current_year: i32,
}

/// Active employees holding one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    /// Access role.
    pub role: Role,
    /// Active employees.
    pub count: usize,
}

/// Active employees in one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
    /// Department name.
    pub department: String,
    /// Active employees.
    pub count: usize,
}

/// Headcount breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStatistics {
    /// Active employees.
    pub total: usize,
    /// Roles with at least one active employee.
    pub by_role: Vec<RoleCount>,
    /// Departments by name; employees without one are left out.
    pub by_department: Vec<DepartmentCount>,
}

/// Statuses marked on the as-of date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayAttendance {
    /// PRESENT records.
    pub present: usize,
    /// Active employees minus every record marked today.
    pub absent: usize,
    /// HALF_DAY records.
    pub half_day: usize,
    /// LEAVE records.
    pub leave: usize,
}

/// Status totals for the as-of month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAttendance {
    /// PRESENT records.
    pub present: usize,
    /// ABSENT records.
    pub absent: usize,
    /// HALF_DAY records.
    pub half_day: usize,
    /// LEAVE records.
    pub leave: usize,
    /// Mean recorded work hours, two decimal places.
    pub avg_work_hours: Decimal,
    /// Sum of recorded extra hours.
    pub total_overtime: Decimal,
}

/// An employee ranked by PRESENT share of the month's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAttendanceLeader {
    /// Employee code.
    pub employee_code: String,
    /// Full name.
    pub name: String,
    /// Department, empty when unset.
    pub department: String,
    /// Two decimal places.
    pub attendance_percentage: Decimal,
    /// PRESENT records.
    pub present_days: usize,
    /// Every record of the month.
    pub total_days: usize,
}

/// Attendance section of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardAttendance {
    /// Statuses on the as-of date.
    pub today: TodayAttendance,
    /// Totals for the as-of month.
    pub current_month: MonthAttendance,
    /// Days with records in the trailing trend window.
    pub trend: Vec<DailyStatusTrend>,
    /// Best monthly attendance.
    pub top_performers: Vec<MonthlyAttendanceLeader>,
}

/// Approved leave of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeUsage {
    /// Leave type.
    pub leave_type: LeaveType,
    /// Approved requests.
    pub count: usize,
    /// Days across those requests.
    pub total_days: u32,
}

/// Requests starting in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Requests.
    pub count: usize,
}

/// Leave section of the dashboard, for the as-of year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardLeave {
    /// Counts by status.
    pub statistics: LeaveStatusSummary,
    /// Approved requests for every type.
    pub by_type: Vec<LeaveTypeUsage>,
    /// Months with requests.
    pub monthly_trend: Vec<MonthCount>,
}

/// Contracted payroll totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPayrollStatistics {
    /// Sum of monthly wages.
    pub total_monthly_payroll: Decimal,
    /// Mean monthly wage, two decimal places.
    pub avg_salary: Decimal,
    /// Sum of employee PF contributions.
    pub total_pf_employee: Decimal,
    /// Sum of employer PF contributions.
    pub total_pf_employer: Decimal,
}

/// Payroll section of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPayroll {
    /// Totals.
    pub statistics: DashboardPayrollStatistics,
    /// Per department, largest payroll first.
    pub by_department: Vec<DepartmentSalary>,
}

/// A recently submitted leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    /// Always `leave_request`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Full name.
    pub employee: String,
    /// Employee code.
    pub employee_code: String,
    /// e.g. `Approved - Paid Leave`.
    pub action: String,
    /// Submission time as `YYYY-MM-DD HH:MM`.
    pub date: String,
    /// Current status.
    pub status: LeaveStatus,
}

impl RecentActivity {
    fn new(employee: Option<&EmployeeSummary>, leave: &LeaveRequest) -> Self {
        Self {
            kind: "leave_request".to_string(),
            employee: employee.map(|e| e.full_name.clone()).unwrap_or_default(),
            employee_code: employee
                .map(|e| e.display_code().to_string())
                .unwrap_or_else(|| leave.employee_id.clone()),
            action: format!("{} - {}", leave.status, leave.leave_type),
            date: leave.created_at.format("%Y-%m-%d %H:%M").to_string(),
            status: leave.status,
        }
    }
}

/// Workforce overview for the as-of date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsDashboard {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Tenant the dashboard covers, every tenant when absent.
    pub company_id: Option<String>,
    /// Calendar position of the as-of date.
    pub date_info: DateInfo,
    /// Headcount.
    pub employees: EmployeeStatistics,
    /// Attendance.
    pub attendance: DashboardAttendance,
    /// Leave.
    pub leave: DashboardLeave,
    /// Payroll.
    pub payroll: DashboardPayroll,
    /// Latest leave submissions.
    pub recent_activities: Vec<RecentActivity>,
}

fn employee_statistics(active: &[EmployeeSummary]) -> EmployeeStatistics {
    let by_role = ROLES
        .iter()
        .map(|role| RoleCount {
            role: *role,
            count: active.iter().filter(|e| e.role == *role).count(),
        })
        .filter(|r| r.count > 0)
        .collect();

    let mut departments: BTreeMap<&str, usize> = BTreeMap::new();
    for employee in active {
        if let Some(department) = employee.department() {
            *departments.entry(department).or_default() += 1;
        }
    }

    EmployeeStatistics {
        total: active.len(),
        by_role,
        by_department: departments
            .into_iter()
            .map(|(department, count)| DepartmentCount {
                department: department.to_string(),
                count,
            })
            .collect(),
    }
}

fn leave_section(leaves: &[&LeaveRequest]) -> DashboardLeave {
    let mut statistics = LeaveStatusSummary::default();
    let mut by_month: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for leave in leaves {
        statistics.add(leave.status);
        *by_month.entry(month_start(leave.start_date)).or_default() += 1;
    }

    let by_type = LeaveType::ALL
        .iter()
        .map(|leave_type| {
            let approved: Vec<&&LeaveRequest> = leaves
                .iter()
                .filter(|l| l.leave_type == *leave_type && l.is_approved())
                .collect();
            LeaveTypeUsage {
                leave_type: *leave_type,
                count: approved.len(),
                total_days: approved.iter().map(|l| l.total_days).sum(),
            }
        })
        .collect();

    DashboardLeave {
        statistics,
        by_type,
        monthly_trend: by_month
            .into_iter()
            .map(|(month, count)| MonthCount {
                month: month.format("%Y-%m").to_string(),
                count,
            })
            .collect(),
    }
}

fn payroll_section(active: &[EmployeeSummary]) -> DashboardPayroll {
    let profiles: Vec<_> = active.iter().filter_map(|e| e.profile.as_ref()).collect();
    let wages: Vec<Decimal> = profiles.iter().map(|p| p.monthly_wage).collect();
    DashboardPayroll {
        statistics: DashboardPayrollStatistics {
            total_monthly_payroll: wages.iter().sum(),
            avg_salary: mean(&wages).unwrap_or(Decimal::ZERO).round_dp(2),
            total_pf_employee: profiles.iter().map(|p| p.pf_employee_contribution).sum(),
            total_pf_employer: profiles.iter().map(|p| p.pf_employer_contribution).sum(),
        },
        by_department: salary_by_department(active),
    }
}

/// Compiles the dashboard for the as-of date.
///
/// Attendance and leave cover every employee of the tenant; headcount,
/// top performers and payroll cover active employees only.
pub fn dashboard_report(ctx: &ReportContext<'_>) -> AnalyticsResult<AnalyticsDashboard> {
    let today = ctx.as_of();
    let month = ReportWindow::month(today.year(), today.month())?;
    let trend_window = ReportWindow::lookback(today, ctx.config().limits().default_trend_days);
    let fetch_window = ReportWindow::new(
        trend_window.start_date.min(month.start_date),
        month.end_date,
    )?;

    let repository = ctx.repository();
    let employees = repository.employees(&ctx.all_employees())?;
    let active: Vec<EmployeeSummary> = employees.iter().filter(|e| e.is_active).cloned().collect();
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, fetch_window))?;
    let leaves = repository.leave_requests(&LeaveQuery::for_employees(&employees))?;
    debug!(
        employees = employees.len(),
        records = records.len(),
        leave_requests = leaves.len(),
        "Compiling analytics dashboard"
    );

    let today_counts = StatusCounts::tally(records.iter().filter(|r| r.date == today));
    let marked =
        today_counts.present + today_counts.absent + today_counts.half_day + today_counts.leave;
    let today_attendance = TodayAttendance {
        present: today_counts.present,
        absent: active.len().saturating_sub(marked),
        half_day: today_counts.half_day,
        leave: today_counts.leave,
    };

    let month_records: Vec<_> = records.iter().filter(|r| month.contains(r.date)).collect();
    let month_counts = StatusCounts::tally(month_records.iter().copied());
    let hours: Vec<Decimal> = month_records.iter().map(|r| r.work_hours).collect();
    let current_month = MonthAttendance {
        present: month_counts.present,
        absent: month_counts.absent,
        half_day: month_counts.half_day,
        leave: month_counts.leave,
        avg_work_hours: mean(&hours).unwrap_or(Decimal::ZERO).round_dp(2),
        total_overtime: month_records.iter().map(|r| r.extra_hours).sum(),
    };

    let mut per_employee: HashMap<&str, (usize, usize)> = HashMap::new();
    for record in &month_records {
        let (present, total) = per_employee.entry(record.employee_id.as_str()).or_default();
        *total += 1;
        if record.status == AttendanceStatus::Present {
            *present += 1;
        }
    }
    let mut top_performers: Vec<MonthlyAttendanceLeader> = active
        .iter()
        .filter_map(|employee| {
            let (present, total) = per_employee.get(employee.id.as_str()).copied()?;
            Some(MonthlyAttendanceLeader {
                employee_code: employee.display_code().to_string(),
                name: employee.full_name.clone(),
                department: employee.department().unwrap_or_default().to_string(),
                attendance_percentage: percentage(present as u64, total as u64, NO_CREDIT)
                    .round_dp(2),
                present_days: present,
                total_days: total,
            })
        })
        .collect();
    top_performers.sort_by(|a, b| b.attendance_percentage.cmp(&a.attendance_percentage));
    top_performers.truncate(DASHBOARD_TOP_PERFORMERS);

    let this_year: Vec<&LeaveRequest> = leaves
        .iter()
        .filter(|l| l.start_date.year() == today.year())
        .collect();

    let by_id: HashMap<&str, &EmployeeSummary> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();
    let mut recent: Vec<&LeaveRequest> = leaves.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_activities = recent
        .into_iter()
        .take(RECENT_ACTIVITIES)
        .map(|l| RecentActivity::new(by_id.get(l.employee_id.as_str()).copied(), l))
        .collect();

    Ok(AnalyticsDashboard {
        stamp: ctx.stamp(),
        company_id: ctx.company_id().map(str::to_string),
        date_info: DateInfo {
            today,
            current_month: today.month(),
            current_year: today.year(),
        },
        employees: employee_statistics(&active),
        attendance: DashboardAttendance {
            today: today_attendance,
            current_month,
            trend: daily_status_trend(records.iter().filter(|r| trend_window.contains(r.date))),
            top_performers,
        },
        leave: leave_section(&this_year),
        payroll: payroll_section(&active),
        recent_activities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::reports::fixtures::{make_date, repository};

    fn dashboard() -> AnalyticsDashboard {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-03-31"));
        dashboard_report(&ctx).unwrap()
    }

    #[test]
    fn test_headcount_breakdown() {
        let report = dashboard();
        assert_eq!(report.employees.total, 3);
        assert_eq!(
            report.employees.by_role,
            vec![RoleCount {
                role: Role::Employee,
                count: 3
            }]
        );
        assert_eq!(report.employees.by_department.len(), 1);
        assert_eq!(report.employees.by_department[0].count, 2);
        assert_eq!(report.date_info.current_month, 3);
    }

    #[test]
    fn test_today_counts_unmarked_employees_as_absent() {
        let report = dashboard();
        let today = &report.attendance.today;
        assert_eq!(today.present, 1);
        assert_eq!(today.absent, 2);
        assert_eq!(today.half_day, 0);
    }

    #[test]
    fn test_month_totals_and_trend() {
        let report = dashboard();
        let month = &report.attendance.current_month;
        assert_eq!(month.present, 32);
        assert_eq!(month.absent, 1);
        assert_eq!(month.half_day, 1);
        assert_eq!(month.leave, 1);
        // 32 eight-hour days over 35 records.
        assert_eq!(month.avg_work_hours, Decimal::new(731, 2));
        assert_eq!(report.attendance.trend.len(), 22);
    }

    #[test]
    fn test_top_performers_by_monthly_share() {
        let report = dashboard();
        let leaders = &report.attendance.top_performers;
        assert_eq!(leaders.len(), 3);
        assert_eq!(leaders[0].employee_code, "OIACME001");
        assert_eq!(leaders[0].attendance_percentage, Decimal::from(100));
        assert_eq!(leaders[1].attendance_percentage, Decimal::new(8333, 2));
        assert_eq!(leaders[2].department, "");
    }

    #[test]
    fn test_leave_and_recent_activity() {
        let report = dashboard();
        assert_eq!(report.leave.statistics.total_requests, 2);
        assert_eq!(report.leave.statistics.pending, 1);
        assert_eq!(report.leave.by_type.len(), 3);
        assert_eq!(report.leave.by_type[0].count, 1);
        assert_eq!(report.leave.by_type[1].count, 0);
        assert_eq!(report.leave.monthly_trend.len(), 1);

        let latest = &report.recent_activities[0];
        assert_eq!(latest.employee, "Meera Iyer");
        assert_eq!(latest.action, "Pending - Sick Leave");
        assert_eq!(latest.date, "2026-03-13 08:00");
    }

    #[test]
    fn test_payroll_section() {
        let report = dashboard();
        let stats = &report.payroll.statistics;
        assert_eq!(stats.total_monthly_payroll, Decimal::from(100_000));
        assert_eq!(stats.avg_salary, Decimal::from(50_000));
        assert_eq!(report.payroll.by_department[0].department, "Engineering");
    }
}
