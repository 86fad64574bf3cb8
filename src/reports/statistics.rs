//! Workforce statistics: attendance trends, leave usage and payroll structure.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::attendance::StatusCounts;
use super::graph::SalaryBandCount;
use super::leave::AllocationSummary;
use super::{ReportContext, ReportStamp};
use crate::calculation::{NO_CREDIT, mean, month_start, percentage};
use crate::config::SalaryBand;
use crate::error::AnalyticsResult;
use crate::models::{
    AttendanceRecord, AttendanceStatus, EmployeeSummary, LeaveStatus, ReportWindow, Role,
};
use crate::repository::{AttendanceQuery, LeaveQuery};

/// Roles in display order.
pub(super) const ROLES: [Role; 3] = [Role::Admin, Role::Hr, Role::Employee];

/// Status counts and hours for one day with records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatusTrend {
    /// The day.
    pub date: NaiveDate,
    /// PRESENT records.
    pub present: usize,
    /// ABSENT records.
    pub absent: usize,
    /// HALF_DAY records.
    pub half_day: usize,
    /// LEAVE records.
    pub leave: usize,
    /// Sum of recorded work hours.
    pub total_work_hours: Decimal,
    /// Sum of recorded extra hours.
    pub total_overtime: Decimal,
}

/// Groups records by date; days without records are left out.
pub(super) fn daily_status_trend<'r>(
    records: impl IntoIterator<Item = &'r AttendanceRecord>,
) -> Vec<DailyStatusTrend> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_default().push(record);
    }
    by_date
        .into_iter()
        .map(|(date, day)| {
            let counts = StatusCounts::tally(day.iter().copied());
            DailyStatusTrend {
                date,
                present: counts.present,
                absent: counts.absent,
                half_day: counts.half_day,
                leave: counts.leave,
                total_work_hours: day.iter().map(|r| r.work_hours).sum(),
                total_overtime: day.iter().map(|r| r.extra_hours).sum(),
            }
        })
        .collect()
}

/// Presence rate of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentAttendanceRate {
    /// Department name.
    pub department: String,
    /// `present_count / total_records * 100`, two decimal places.
    pub attendance_percentage: Decimal,
    /// PRESENT records.
    pub present_count: usize,
    /// Every record of the department.
    pub total_records: usize,
}

/// Dates covered by a trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPeriod {
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, the as-of date.
    pub end_date: NaiveDate,
    /// Days requested before the as-of date.
    pub days: u32,
}

/// Attendance over the last `days` days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceTrendReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Dates covered.
    pub period: TrendPeriod,
    /// Per-day counts and hours.
    pub daily_trend: Vec<DailyStatusTrend>,
    /// Presence per department, by department name.
    pub department_stats: Vec<DepartmentAttendanceRate>,
}

/// Compiles the attendance trend for `[as_of - days, as_of]`.
pub fn attendance_trend_report(
    ctx: &ReportContext<'_>,
    days: u32,
) -> AnalyticsResult<AttendanceTrendReport> {
    let window = ReportWindow::lookback(ctx.as_of(), days);
    let repository = ctx.repository();
    let employees = repository.employees(&ctx.all_employees())?;
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, window))?;
    debug!(days, records = records.len(), "Compiling attendance trend");

    let department_of: HashMap<&str, &str> = employees
        .iter()
        .filter_map(|e| e.department().map(|d| (e.id.as_str(), d)))
        .collect();
    let mut by_department: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in &records {
        if let Some(department) = department_of.get(record.employee_id.as_str()) {
            let (present, total) = by_department.entry(*department).or_default();
            *total += 1;
            if record.status == AttendanceStatus::Present {
                *present += 1;
            }
        }
    }

    let department_stats = by_department
        .into_iter()
        .map(|(department, (present, total))| DepartmentAttendanceRate {
            department: department.to_string(),
            attendance_percentage: percentage(present as u64, total as u64, NO_CREDIT)
                .round_dp(2),
            present_count: present,
            total_records: total,
        })
        .collect();

    Ok(AttendanceTrendReport {
        stamp: ctx.stamp(),
        period: TrendPeriod {
            start_date: window.start_date,
            end_date: window.end_date,
            days,
        },
        daily_trend: daily_status_trend(&records),
        department_stats,
    })
}

/// Requests of one status starting in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStatusCount {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Request status.
    pub status: LeaveStatus,
    /// Requests.
    pub count: usize,
}

/// Leave demand of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentLeaveUsage {
    /// Department name.
    pub department: String,
    /// Active employees in the department.
    pub employees: usize,
    /// Requests starting in the year.
    pub total_requests: usize,
    /// Approved requests starting in the year.
    pub approved_requests: usize,
}

/// Leave entitlements and demand for one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveAnalyticsReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Calendar year.
    pub year: i32,
    /// Allocated, used and remaining days.
    pub allocation_summary: AllocationSummary,
    /// Months with requests, by status.
    pub monthly_trend: Vec<MonthlyStatusCount>,
    /// Demand per department, by department name.
    pub department_usage: Vec<DepartmentLeaveUsage>,
}

/// Compiles leave analytics for requests starting in `year`.
pub fn leave_analytics_report(
    ctx: &ReportContext<'_>,
    year: i32,
) -> AnalyticsResult<LeaveAnalyticsReport> {
    let window = ReportWindow::year(year)?;
    let repository = ctx.repository();
    let employees = repository.employees(&ctx.all_employees())?;
    let employee_ids: Vec<String> = employees.iter().map(|e| e.id.clone()).collect();
    let allocations = repository.leave_allocations(year, &employee_ids)?;
    let leaves =
        repository.leave_requests(&LeaveQuery::for_employees(&employees).starting_within(window))?;
    debug!(year, requests = leaves.len(), "Compiling leave analytics");

    let mut by_month: BTreeMap<(NaiveDate, LeaveStatus), usize> = BTreeMap::new();
    let mut by_employee: HashMap<&str, (usize, usize)> = HashMap::new();
    for leave in &leaves {
        *by_month
            .entry((month_start(leave.start_date), leave.status))
            .or_default() += 1;
        let (total, approved) = by_employee.entry(leave.employee_id.as_str()).or_default();
        *total += 1;
        if leave.is_approved() {
            *approved += 1;
        }
    }

    let monthly_trend = by_month
        .into_iter()
        .map(|((month, status), count)| MonthlyStatusCount {
            month: month.format("%Y-%m").to_string(),
            status,
            count,
        })
        .collect();

    let mut usage: BTreeMap<&str, DepartmentLeaveUsage> = BTreeMap::new();
    for employee in employees.iter().filter(|e| e.is_active) {
        let Some(department) = employee.department() else {
            continue;
        };
        let entry = usage
            .entry(department)
            .or_insert_with(|| DepartmentLeaveUsage {
                department: department.to_string(),
                employees: 0,
                total_requests: 0,
                approved_requests: 0,
            });
        entry.employees += 1;
        if let Some((total, approved)) = by_employee.get(employee.id.as_str()) {
            entry.total_requests += total;
            entry.approved_requests += approved;
        }
    }

    Ok(LeaveAnalyticsReport {
        stamp: ctx.stamp(),
        year,
        allocation_summary: AllocationSummary::from_allocations(year, &allocations),
        monthly_trend,
        department_usage: usage.into_values().collect(),
    })
}

/// Salary totals of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentSalary {
    /// Department name.
    pub department: String,
    /// Employees with a profile.
    pub employee_count: usize,
    /// Sum of monthly wages.
    pub total_salary: Decimal,
    /// Mean monthly wage, two decimal places.
    pub avg_salary: Decimal,
}

/// Monthly wage totals per department, largest payroll first.
pub(super) fn salary_by_department(employees: &[EmployeeSummary]) -> Vec<DepartmentSalary> {
    let mut wages: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    for employee in employees {
        if let Some(department) = employee.department() {
            wages
                .entry(department)
                .or_default()
                .push(employee.monthly_wage());
        }
    }
    let mut departments: Vec<DepartmentSalary> = wages
        .into_iter()
        .map(|(department, wages)| DepartmentSalary {
            department: department.to_string(),
            employee_count: wages.len(),
            total_salary: wages.iter().sum(),
            avg_salary: mean(&wages).unwrap_or(Decimal::ZERO).round_dp(2),
        })
        .collect();
    departments.sort_by(|a, b| b.total_salary.cmp(&a.total_salary));
    departments
}

/// Salary totals of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSalary {
    /// Access role.
    pub role: Role,
    /// Employees with a profile.
    pub count: usize,
    /// Mean monthly wage, two decimal places.
    pub avg_salary: Decimal,
    /// Sum of monthly wages.
    pub total_payroll: Decimal,
}

/// Salary structure totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollStatistics {
    /// Active employees with a profile.
    pub total_employees: usize,
    /// Sum of monthly wages.
    pub total_monthly_gross: Decimal,
    /// Mean monthly wage, two decimal places.
    pub avg_salary: Decimal,
    /// Sum of basic salaries.
    pub total_basic_salary: Decimal,
    /// Sum of house rent allowances.
    pub total_hra: Decimal,
    /// Sum of employee PF contributions.
    pub total_pf_employee: Decimal,
    /// Sum of employer PF contributions.
    pub total_pf_employer: Decimal,
    /// Gross plus employer PF.
    pub total_employer_cost: Decimal,
}

/// Salary structure of the active workforce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollAnalyticsReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Totals.
    pub overall_statistics: PayrollStatistics,
    /// Non-empty wage bands.
    pub salary_distribution: Vec<SalaryBandCount>,
    /// Per department, largest payroll first.
    pub department_payroll: Vec<DepartmentSalary>,
    /// Per role with at least one employee.
    pub role_wise_salary: Vec<RoleSalary>,
}

fn band_counts(bands: &[SalaryBand], wages: &[Decimal]) -> Vec<SalaryBandCount> {
    bands
        .iter()
        .map(|band| SalaryBandCount {
            range: band.label.clone(),
            count: wages.iter().filter(|w| band.contains(**w)).count(),
        })
        .filter(|band| band.count > 0)
        .collect()
}

/// Compiles salary statistics over active employees with a profile.
///
/// Wages are the contracted monthly amounts, not a prorated payroll run.
pub fn payroll_analytics_report(ctx: &ReportContext<'_>) -> AnalyticsResult<PayrollAnalyticsReport> {
    let employees: Vec<EmployeeSummary> = ctx
        .active_employees()?
        .into_iter()
        .filter(|e| e.profile.is_some())
        .collect();
    debug!(employees = employees.len(), "Compiling payroll analytics");

    let profiles = employees.iter().filter_map(|e| e.profile.as_ref());
    let wages: Vec<Decimal> = employees.iter().map(EmployeeSummary::monthly_wage).collect();
    let total_monthly_gross: Decimal = wages.iter().sum();
    let total_pf_employer: Decimal = profiles.clone().map(|p| p.pf_employer_contribution).sum();
    let overall_statistics = PayrollStatistics {
        total_employees: employees.len(),
        total_monthly_gross,
        avg_salary: mean(&wages).unwrap_or(Decimal::ZERO).round_dp(2),
        total_basic_salary: profiles.clone().map(|p| p.basic_salary).sum(),
        total_hra: profiles.clone().map(|p| p.house_rent_allowance).sum(),
        total_pf_employee: profiles.map(|p| p.pf_employee_contribution).sum(),
        total_pf_employer,
        total_employer_cost: total_monthly_gross + total_pf_employer,
    };

    let role_wise_salary = ROLES
        .iter()
        .filter_map(|role| {
            let wages: Vec<Decimal> = employees
                .iter()
                .filter(|e| e.role == *role)
                .map(EmployeeSummary::monthly_wage)
                .collect();
            let avg_salary = mean(&wages)?.round_dp(2);
            Some(RoleSalary {
                role: *role,
                count: wages.len(),
                avg_salary,
                total_payroll: wages.iter().sum(),
            })
        })
        .collect();

    Ok(PayrollAnalyticsReport {
        stamp: ctx.stamp(),
        overall_statistics,
        salary_distribution: band_counts(&ctx.config().payroll().analytics_salary_bands, &wages),
        department_payroll: salary_by_department(&employees),
        role_wise_salary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::reports::fixtures::{make_date, repository};

    #[test]
    fn test_attendance_trend_last_week() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-03-31"));
        let report = attendance_trend_report(&ctx, 7).unwrap();

        assert_eq!(report.period.start_date, make_date("2026-03-24"));
        assert_eq!(report.period.days, 7);
        // Only emp_001 has records after the 17th.
        assert_eq!(report.daily_trend.len(), 6);
        assert!(report.daily_trend.iter().all(|d| d.present == 1));
        assert_eq!(report.daily_trend[0].total_work_hours, Decimal::from(8));

        assert_eq!(report.department_stats.len(), 1);
        assert_eq!(report.department_stats[0].total_records, 6);
        assert_eq!(report.department_stats[0].attendance_percentage, Decimal::from(100));
    }

    #[test]
    fn test_attendance_trend_department_rate_excludes_unplaced() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-03-31"));
        let report = attendance_trend_report(&ctx, 30).unwrap();

        let first = &report.daily_trend[0];
        assert_eq!(first.date, make_date("2026-03-02"));
        assert_eq!(first.present, 2);
        assert_eq!(first.absent, 1);
        assert_eq!(first.total_work_hours, Decimal::from(16));

        // 32 PRESENT of 34 Engineering records; emp_003's absence has no department.
        let engineering = &report.department_stats[0];
        assert_eq!(engineering.present_count, 32);
        assert_eq!(engineering.total_records, 34);
        assert_eq!(engineering.attendance_percentage, Decimal::new(9412, 2));
    }

    #[test]
    fn test_leave_analytics_for_year() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-04-15"));
        let report = leave_analytics_report(&ctx, 2026).unwrap();

        assert_eq!(report.allocation_summary.paid_remaining, 23);
        assert_eq!(report.allocation_summary.sick_allocated, 7);

        assert_eq!(report.monthly_trend.len(), 2);
        assert_eq!(report.monthly_trend[0].month, "2026-03");
        assert_eq!(report.monthly_trend[0].status, LeaveStatus::Pending);
        assert_eq!(report.monthly_trend[1].status, LeaveStatus::Approved);

        assert_eq!(report.department_usage.len(), 1);
        let engineering = &report.department_usage[0];
        assert_eq!(engineering.employees, 2);
        assert_eq!(engineering.total_requests, 1);
        assert_eq!(engineering.approved_requests, 1);
    }

    #[test]
    fn test_leave_analytics_empty_year() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-04-15"));
        let report = leave_analytics_report(&ctx, 2019).unwrap();
        assert!(report.monthly_trend.is_empty());
        assert_eq!(report.allocation_summary.employees, 0);
        assert_eq!(report.department_usage[0].total_requests, 0);
    }

    #[test]
    fn test_payroll_analytics() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-03-31"));
        let report = payroll_analytics_report(&ctx).unwrap();

        let overall = &report.overall_statistics;
        assert_eq!(overall.total_employees, 2);
        assert_eq!(overall.total_monthly_gross, Decimal::from(100_000));
        assert_eq!(overall.avg_salary, Decimal::from(50_000));
        assert_eq!(overall.total_basic_salary, Decimal::from(50_000));
        assert_eq!(overall.total_hra, Decimal::from(25_000));
        assert_eq!(overall.total_employer_cost, Decimal::from(100_000));

        let bands: Vec<(&str, usize)> = report
            .salary_distribution
            .iter()
            .map(|b| (b.range.as_str(), b.count))
            .collect();
        assert_eq!(bands, vec![("25k-50k", 1), ("50k-75k", 1)]);

        assert_eq!(report.department_payroll.len(), 1);
        assert_eq!(report.department_payroll[0].employee_count, 2);
        assert_eq!(report.role_wise_salary.len(), 1);
        assert_eq!(report.role_wise_salary[0].role, Role::Employee);
        assert_eq!(report.role_wise_salary[0].total_payroll, Decimal::from(100_000));
    }

    #[test]
    fn test_salary_by_department_orders_by_total() {
        use crate::reports::fixtures::{employee, profile};
        let employees = vec![
            employee("emp_010", "A", Some(profile(Some("Finance"), 30_000))),
            employee("emp_011", "B", Some(profile(Some("Sales"), 50_000))),
            employee("emp_012", "C", Some(profile(Some("Finance"), 35_000))),
            employee("emp_013", "D", None),
        ];
        let departments = salary_by_department(&employees);
        assert_eq!(departments[0].department, "Finance");
        assert_eq!(departments[0].total_salary, Decimal::from(65_000));
        assert_eq!(departments[0].avg_salary, Decimal::new(3250000, 2));
        assert_eq!(departments[1].department, "Sales");
    }
}
