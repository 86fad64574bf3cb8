//! Chart-ready datasets.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReportContext, ReportStamp};
use crate::calculation::{NO_CREDIT, full_weekday_name, mean, percentage};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{
    AttendanceRecord, EmployeeSummary, LeaveRequest, LeaveStatus, ReportWindow, Role,
};
use crate::repository::{AttendanceQuery, LeaveQuery, RecordIndex};

const GRAPH_LOOKBACK_DAYS: u32 = 90;
const HEATMAP_DEFAULT_HOUR: u32 = 9;

/// Which datasets to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    /// Every dataset.
    #[default]
    All,
    /// Daily attendance series.
    Timeseries,
    /// Weekday by hour check-ins.
    Heatmap,
    /// Salary bands.
    Distribution,
    /// Department comparison.
    Comparative,
    /// Salary against attendance and leave.
    Correlation,
}

impl GraphType {
    fn includes(self, other: GraphType) -> bool {
        self == GraphType::All || self == other
    }
}

impl FromStr for GraphType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(GraphType::All),
            "timeseries" => Ok(GraphType::Timeseries),
            "heatmap" => Ok(GraphType::Heatmap),
            "distribution" => Ok(GraphType::Distribution),
            "comparative" => Ok(GraphType::Comparative),
            "correlation" => Ok(GraphType::Correlation),
            other => Err(AnalyticsError::InvalidParameter {
                name: "type".to_string(),
                message: format!("unknown graph type '{}'", other),
            }),
        }
    }
}

/// Attendance on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    /// The day.
    pub date: NaiveDate,
    /// Attendance records of any status.
    pub attendance: usize,
    /// Approved leave requests covering the day.
    pub on_leave: usize,
    /// Employees neither recorded nor on leave, never negative.
    pub absent: usize,
    /// `attendance / employees * 100`, one decimal place.
    pub attendance_percentage: Decimal,
}

/// Daily attendance line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesData {
    /// One point per day of the window.
    pub daily_trends: Vec<TimeseriesPoint>,
    /// Suggested chart.
    pub chart_type: String,
    /// Horizontal axis field.
    pub x_axis: String,
    /// Plotted fields.
    pub y_axes: Vec<String>,
}

/// Check-ins at one weekday and hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Weekday name.
    pub day: String,
    /// Hour as `HH:00`.
    pub hour: String,
    /// Check-ins.
    pub value: usize,
}

/// Weekday by hour check-in heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapData {
    /// 7 x 24 cells, Monday first.
    pub data: Vec<HeatmapCell>,
    /// Suggested chart.
    pub chart_type: String,
    /// Horizontal axis field.
    pub x_axis: String,
    /// Vertical axis field.
    pub y_axis: String,
    /// What the cell value counts.
    pub value_label: String,
}

/// Employees in one salary band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBandCount {
    /// Band label.
    pub range: String,
    /// Employees whose wage falls in the band.
    pub count: usize,
}

/// Salary histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDistribution {
    /// One entry per configured band.
    pub data: Vec<SalaryBandCount>,
    /// Suggested chart.
    pub chart_type: String,
    /// Horizontal axis field.
    pub x_axis: String,
    /// Vertical axis field.
    pub y_axis: String,
}

/// Distribution datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionData {
    /// Monthly wage bands over active employees with a profile.
    pub salary_distribution: SalaryDistribution,
}

/// One department's activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentComparison {
    /// Department name.
    pub department: String,
    /// Active members.
    pub employee_count: usize,
    /// Attendance records in the window.
    pub total_attendance: usize,
    /// Approved leave requests starting in the window.
    pub total_leaves: usize,
    /// Mean monthly wage, two decimal places.
    pub avg_salary: Decimal,
    /// Attendance records per member, one decimal place.
    pub attendance_per_employee: Decimal,
}

/// Department comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparativeData {
    /// Named departments in alphabetical order.
    pub department_comparison: Vec<DepartmentComparison>,
    /// Suggested chart.
    pub chart_type: String,
    /// Fields to compare.
    pub metrics: Vec<String>,
}

/// One employee on the scatter plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Employee id.
    pub employee_id: String,
    /// Monthly wage.
    pub salary: Decimal,
    /// Attendance records in the window.
    pub attendance_days: usize,
    /// Approved leave requests starting in the window.
    pub leave_days: usize,
    /// Access role.
    pub role: Role,
}

/// A pair of fields worth plotting against each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedComparison {
    /// Horizontal field.
    pub x: String,
    /// Vertical field.
    pub y: String,
    /// Chart title.
    pub title: String,
}

/// Salary against attendance and leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationData {
    /// One point per active employee with a profile.
    pub scatter_data: Vec<ScatterPoint>,
    /// Suggested chart.
    pub chart_type: String,
    /// Field pairs to plot.
    pub suggested_comparisons: Vec<SuggestedComparison>,
}

/// The requested datasets; unrequested ones are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphData {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Window the datasets cover.
    pub window: ReportWindow,
    /// Daily series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeseries: Option<TimeseriesData>,
    /// Check-in heatmap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<HeatmapData>,
    /// Salary bands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionData>,
    /// Department comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparative: Option<ComparativeData>,
    /// Salary scatter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationData>,
}

/// Builds the requested datasets over the 90 days ending at the as-of date.
pub fn graph_data(ctx: &ReportContext<'_>, graph_type: GraphType) -> AnalyticsResult<GraphData> {
    let window = ReportWindow::lookback(ctx.as_of(), GRAPH_LOOKBACK_DAYS);
    let repository = ctx.repository();
    let employees = ctx.active_employees()?;
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, window))?;
    let leaves = repository.leave_requests(&LeaveQuery {
        overlapping: Some(window),
        ..LeaveQuery::for_employees(&employees).with_status(LeaveStatus::Approved)
    })?;
    debug!(
        graph_type = ?graph_type,
        employees = employees.len(),
        records = records.len(),
        "Building graph data"
    );

    let mut data = GraphData {
        stamp: ctx.stamp(),
        window,
        timeseries: None,
        heatmap: None,
        distribution: None,
        comparative: None,
        correlation: None,
    };

    if graph_type.includes(GraphType::Timeseries) {
        data.timeseries = Some(timeseries(employees.len(), &records, &leaves, &window));
    }
    if graph_type.includes(GraphType::Heatmap) {
        data.heatmap = Some(heatmap(&records));
    }
    if graph_type.includes(GraphType::Distribution) {
        data.distribution = Some(distribution(ctx, &employees));
    }
    if graph_type.includes(GraphType::Comparative) || graph_type.includes(GraphType::Correlation)
    {
        let index = RecordIndex::build(records, leaves);
        if graph_type.includes(GraphType::Comparative) {
            data.comparative = Some(comparative(&employees, &index, &window));
        }
        if graph_type.includes(GraphType::Correlation) {
            data.correlation = Some(correlation(&employees, &index, &window));
        }
    }

    Ok(data)
}

fn timeseries(
    total_employees: usize,
    records: &[AttendanceRecord],
    leaves: &[LeaveRequest],
    window: &ReportWindow,
) -> TimeseriesData {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        *by_date.entry(record.date).or_default() += 1;
    }

    let daily_trends = window
        .days()
        .map(|date| {
            let attendance = by_date.get(&date).copied().unwrap_or(0);
            let on_leave = leaves.iter().filter(|l| l.covers(date)).count();
            TimeseriesPoint {
                date,
                attendance,
                on_leave,
                absent: total_employees.saturating_sub(attendance + on_leave),
                attendance_percentage: percentage(
                    attendance as u64,
                    total_employees as u64,
                    NO_CREDIT,
                )
                .round_dp(1),
            }
        })
        .collect();

    TimeseriesData {
        daily_trends,
        chart_type: "line".to_string(),
        x_axis: "date".to_string(),
        y_axes: vec![
            "attendance".to_string(),
            "on_leave".to_string(),
            "absent".to_string(),
        ],
    }
}

fn heatmap(records: &[AttendanceRecord]) -> HeatmapData {
    let mut counts = [[0usize; 24]; 7];
    for record in records {
        let day = record.date.weekday().num_days_from_monday() as usize;
        let hour = record
            .check_in
            .map(|t| t.hour())
            .unwrap_or(HEATMAP_DEFAULT_HOUR) as usize;
        counts[day][hour] += 1;
    }

    let mut weekday = chrono::Weekday::Mon;
    let mut data = Vec::with_capacity(7 * 24);
    for by_hour in &counts {
        for (hour, value) in by_hour.iter().enumerate() {
            data.push(HeatmapCell {
                day: full_weekday_name(weekday).to_string(),
                hour: format!("{:02}:00", hour),
                value: *value,
            });
        }
        weekday = weekday.succ();
    }

    HeatmapData {
        data,
        chart_type: "heatmap".to_string(),
        x_axis: "hour".to_string(),
        y_axis: "day".to_string(),
        value_label: "check_ins".to_string(),
    }
}

fn distribution(ctx: &ReportContext<'_>, employees: &[EmployeeSummary]) -> DistributionData {
    let wages: Vec<Decimal> = employees
        .iter()
        .filter_map(|e| e.profile.as_ref().map(|p| p.monthly_wage))
        .collect();
    let data = ctx
        .config()
        .payroll()
        .salary_bands
        .iter()
        .map(|band| SalaryBandCount {
            range: band.label.clone(),
            count: wages.iter().filter(|w| band.contains(**w)).count(),
        })
        .collect();

    DistributionData {
        salary_distribution: SalaryDistribution {
            data,
            chart_type: "bar".to_string(),
            x_axis: "range".to_string(),
            y_axis: "count".to_string(),
        },
    }
}

fn leaves_starting_in(index: &RecordIndex, employee_id: &str, window: &ReportWindow) -> usize {
    index
        .leaves_for(employee_id)
        .iter()
        .filter(|l| window.contains(l.start_date))
        .count()
}

fn comparative(
    employees: &[EmployeeSummary],
    index: &RecordIndex,
    window: &ReportWindow,
) -> ComparativeData {
    let mut by_department: BTreeMap<&str, Vec<&EmployeeSummary>> = BTreeMap::new();
    for employee in employees {
        if let Some(department) = employee.department() {
            by_department.entry(department).or_default().push(employee);
        }
    }

    let department_comparison = by_department
        .into_iter()
        .map(|(department, members)| {
            let total_attendance: usize = members
                .iter()
                .map(|e| index.attendance_for(&e.id).len())
                .sum();
            let total_leaves: usize = members
                .iter()
                .map(|e| leaves_starting_in(index, &e.id, window))
                .sum();
            let wages: Vec<Decimal> = members.iter().map(|e| e.monthly_wage()).collect();
            DepartmentComparison {
                department: department.to_string(),
                employee_count: members.len(),
                total_attendance,
                total_leaves,
                avg_salary: mean(&wages).unwrap_or(Decimal::ZERO).round_dp(2),
                attendance_per_employee: (Decimal::from(total_attendance)
                    / Decimal::from(members.len()))
                .round_dp(1),
            }
        })
        .collect();

    ComparativeData {
        department_comparison,
        chart_type: "grouped_bar".to_string(),
        metrics: vec![
            "employee_count".to_string(),
            "total_attendance".to_string(),
            "total_leaves".to_string(),
        ],
    }
}

fn correlation(
    employees: &[EmployeeSummary],
    index: &RecordIndex,
    window: &ReportWindow,
) -> CorrelationData {
    let scatter_data = employees
        .iter()
        .filter_map(|employee| {
            let profile = employee.profile.as_ref()?;
            Some(ScatterPoint {
                employee_id: employee.id.clone(),
                salary: profile.monthly_wage,
                attendance_days: index.attendance_for(&employee.id).len(),
                leave_days: leaves_starting_in(index, &employee.id, window),
                role: employee.role,
            })
        })
        .collect();

    let comparison = |y: &str, title: &str| SuggestedComparison {
        x: "salary".to_string(),
        y: y.to_string(),
        title: title.to_string(),
    };

    CorrelationData {
        scatter_data,
        chart_type: "scatter".to_string(),
        suggested_comparisons: vec![
            comparison("attendance_days", "Salary vs Attendance"),
            comparison("leave_days", "Salary vs Leave Usage"),
        ],
    }
}
