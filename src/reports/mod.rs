//! Report compiler.
//!
//! Each report fetches its records from the repository once, groups them with
//! a [`RecordIndex`](crate::repository::RecordIndex) and folds the engines over
//! the employees in scope. Every report is stamped with a [`ReportStamp`].

mod anomalies;
mod attendance;
mod dashboard;
mod export;
mod graph;
mod leave;
mod payroll;
mod performance;
mod predictive;
mod statistics;

pub use anomalies::{AnomalyReport, anomaly_report};
pub use attendance::{
    AttendancePerformer, AttendanceReport, AttendanceReportQuery, AttendanceRow,
    AttendanceSummary, DailyAttendance, DepartmentAttendance, attendance_report,
};
pub use dashboard::{
    AnalyticsDashboard, DashboardAttendance, DashboardLeave, DashboardPayroll,
    DashboardPayrollStatistics, DateInfo, DepartmentCount, EmployeeStatistics, LeaveTypeUsage,
    MonthAttendance, MonthCount, MonthlyAttendanceLeader, RecentActivity, RoleCount,
    TodayAttendance, dashboard_report,
};
pub use export::{CsvExport, CsvRecord, attendance_csv, leave_csv, payroll_csv, write_csv};
pub use graph::{
    ComparativeData, CorrelationData, DepartmentComparison, DistributionData, GraphData,
    GraphType, HeatmapCell, HeatmapData, SalaryBandCount, SalaryDistribution, ScatterPoint,
    SuggestedComparison, TimeseriesData, TimeseriesPoint, graph_data,
};
pub use leave::{
    AllocationSummary, LeaveReport, LeaveRow, LeaveStatusSummary, MonthlyLeaveTrend,
    leave_report,
};
pub use payroll::{DepartmentPayroll, PayrollDistribution, PayrollReport, PayrollSummary, payroll_report};
pub use performance::{DepartmentPerformance, PerformanceReport, performance_report};
pub use predictive::{
    BurnoutAnalysis, Predictions, PredictiveReport, SeasonalTrends, predictive_report,
};
pub use statistics::{
    AttendanceTrendReport, DailyStatusTrend, DepartmentAttendanceRate, DepartmentLeaveUsage,
    DepartmentSalary, LeaveAnalyticsReport, MonthlyStatusCount, PayrollAnalyticsReport,
    PayrollStatistics, RoleSalary, TrendPeriod, attendance_trend_report, leave_analytics_report,
    payroll_analytics_report,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsResult;
use crate::models::EmployeeSummary;
use crate::repository::{EmployeeFilter, RecordRepository};

/// Identity and timing stamped on every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStamp {
    /// Unique identifier of this report.
    pub report_id: Uuid,
    /// The date the report was computed for.
    pub as_of: NaiveDate,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

impl ReportStamp {
    /// Stamps a report computed for `as_of`.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            as_of,
            generated_at: Utc::now(),
        }
    }
}

/// Everything a report needs besides its own parameters.
///
/// One `as_of` date is resolved per request and threaded through every
/// computation.
#[derive(Clone, Copy)]
pub struct ReportContext<'a> {
    repository: &'a dyn RecordRepository,
    config: &'a AnalyticsConfig,
    as_of: NaiveDate,
    company_id: Option<&'a str>,
}

impl<'a> ReportContext<'a> {
    /// Creates a context spanning every tenant.
    pub fn new(
        repository: &'a dyn RecordRepository,
        config: &'a AnalyticsConfig,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            repository,
            config,
            as_of,
            company_id: None,
        }
    }

    /// Restricts the context to one tenant when one is given.
    pub fn for_company(mut self, company_id: Option<&'a str>) -> Self {
        self.company_id = company_id;
        self
    }

    /// The record repository.
    pub fn repository(&self) -> &'a dyn RecordRepository {
        self.repository
    }

    /// The loaded policies.
    pub fn config(&self) -> &'a AnalyticsConfig {
        self.config
    }

    /// The tenant in scope, if restricted.
    pub fn company_id(&self) -> Option<&'a str> {
        self.company_id
    }

    /// The date every computation is relative to.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// A filter for every employee of the tenant, active or not.
    pub fn all_employees(&self) -> EmployeeFilter {
        EmployeeFilter::default().company(self.company_id)
    }

    /// Active employees of the tenant.
    pub fn active_employees(&self) -> AnalyticsResult<Vec<EmployeeSummary>> {
        self.repository
            .employees(&EmployeeFilter::active().company(self.company_id))
    }

    /// A fresh stamp for a report computed in this context.
    pub fn stamp(&self) -> ReportStamp {
        ReportStamp::new(self.as_of)
    }
}
