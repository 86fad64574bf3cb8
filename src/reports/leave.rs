//! Leave period report.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReportContext, ReportStamp};
use crate::calculation::month_start;
use crate::error::AnalyticsResult;
use crate::models::{
    EmployeeSummary, LeaveAllocation, LeaveRequest, LeaveStatus, LeaveType, ReportWindow,
};
use crate::repository::LeaveQuery;

/// Requests by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveStatusSummary {
    /// Every request starting in the period.
    pub total_requests: usize,
    /// Approved requests.
    pub approved: usize,
    /// Rejected requests.
    pub rejected: usize,
    /// Requests awaiting a decision.
    pub pending: usize,
}

impl LeaveStatusSummary {
    pub(super) fn add(&mut self, status: LeaveStatus) {
        self.total_requests += 1;
        match status {
            LeaveStatus::Approved => self.approved += 1,
            LeaveStatus::Rejected => self.rejected += 1,
            LeaveStatus::Pending => self.pending += 1,
        }
    }
}

/// Entitlement totals for the report year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Year of the allocations.
    pub year: i32,
    /// Employees with an allocation.
    pub employees: usize,
    /// Paid leave days granted.
    pub paid_allocated: i64,
    /// Paid leave days used.
    pub paid_used: i64,
    /// Paid leave days left; negative when over-used.
    pub paid_remaining: i64,
    /// Sick leave days granted.
    pub sick_allocated: i64,
    /// Sick leave days used.
    pub sick_used: i64,
    /// Sick leave days left; negative when over-used.
    pub sick_remaining: i64,
}

impl AllocationSummary {
    pub(super) fn from_allocations(year: i32, allocations: &[LeaveAllocation]) -> Self {
        let mut summary = Self {
            year,
            employees: allocations.len(),
            ..Self::default()
        };
        for allocation in allocations {
            summary.paid_allocated += i64::from(allocation.paid_leave_total);
            summary.paid_used += i64::from(allocation.paid_leave_used);
            summary.paid_remaining += i64::from(allocation.paid_leave_available());
            summary.sick_allocated += i64::from(allocation.sick_leave_total);
            summary.sick_used += i64::from(allocation.sick_leave_used);
            summary.sick_remaining += i64::from(allocation.sick_leave_available());
        }
        summary
    }
}

/// Requests starting in one month, by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyLeaveTrend {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Counts for the month.
    #[serde(flatten)]
    pub counts: LeaveStatusSummary,
}

/// One leave request with its employee's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRow {
    /// Employee code.
    pub employee_code: String,
    /// Full name.
    pub employee_name: String,
    /// Email.
    pub email: String,
    /// Department, empty when unset.
    pub department: String,
    /// Leave type.
    pub leave_type: LeaveType,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Days requested.
    pub total_days: u32,
    /// Status.
    pub status: LeaveStatus,
    /// Reason given.
    pub reason: String,
    /// Submission time.
    pub created_at: NaiveDateTime,
}

impl LeaveRow {
    fn new(employee: Option<&EmployeeSummary>, leave: &LeaveRequest) -> Self {
        Self {
            employee_code: employee
                .map(|e| e.display_code().to_string())
                .unwrap_or_else(|| leave.employee_id.clone()),
            employee_name: employee.map(|e| e.full_name.clone()).unwrap_or_default(),
            email: employee.map(|e| e.email.clone()).unwrap_or_default(),
            department: employee
                .and_then(|e| e.department())
                .unwrap_or_default()
                .to_string(),
            leave_type: leave.leave_type,
            start_date: leave.start_date,
            end_date: leave.end_date,
            total_days: leave.total_days,
            status: leave.status,
            reason: leave.reason.clone(),
            created_at: leave.created_at,
        }
    }
}

/// Leave requests starting in a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Period covered.
    pub window: ReportWindow,
    /// Counts by status.
    pub summary: LeaveStatusSummary,
    /// Counts by type, keyed by display name.
    pub leave_type_breakdown: BTreeMap<String, usize>,
    /// Entitlements for the year the period starts in.
    pub allocation_summary: AllocationSummary,
    /// Counts per month of the period.
    pub monthly_trend: Vec<MonthlyLeaveTrend>,
    /// Every request, most recently submitted first.
    pub requests: Vec<LeaveRow>,
}

/// Compiles the leave report for requests starting in `window`.
pub fn leave_report(ctx: &ReportContext<'_>, window: ReportWindow) -> AnalyticsResult<LeaveReport> {
    let repository = ctx.repository();
    let employees = repository.employees(&ctx.all_employees())?;
    let leaves = repository.leave_requests(&LeaveQuery::for_employees(&employees).starting_within(window))?;
    let year = window.start_date.year();
    let employee_ids: Vec<String> = employees.iter().map(|e| e.id.clone()).collect();
    let allocations = repository.leave_allocations(year, &employee_ids)?;
    debug!(
        requests = leaves.len(),
        allocations = allocations.len(),
        window = %window.label(),
        "Compiling leave report"
    );

    let mut summary = LeaveStatusSummary::default();
    let mut leave_type_breakdown: BTreeMap<String, usize> = LeaveType::ALL
        .iter()
        .map(|t| (t.to_string(), 0))
        .collect();
    let mut by_month: BTreeMap<NaiveDate, LeaveStatusSummary> = BTreeMap::new();
    let mut month = month_start(window.start_date);
    while month <= window.end_date {
        by_month.insert(month, LeaveStatusSummary::default());
        month = match month.checked_add_months(chrono::Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    for leave in &leaves {
        summary.add(leave.status);
        *leave_type_breakdown.entry(leave.leave_type.to_string()).or_default() += 1;
        by_month
            .entry(month_start(leave.start_date))
            .or_default()
            .add(leave.status);
    }

    let monthly_trend = by_month
        .into_iter()
        .map(|(month, counts)| MonthlyLeaveTrend {
            month: month.format("%Y-%m").to_string(),
            counts,
        })
        .collect();

    let by_id: HashMap<&str, &EmployeeSummary> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();
    let mut requests: Vec<LeaveRow> = leaves
        .iter()
        .map(|l| LeaveRow::new(by_id.get(l.employee_id.as_str()).copied(), l))
        .collect();
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(LeaveReport {
        stamp: ctx.stamp(),
        window,
        summary,
        leave_type_breakdown,
        allocation_summary: AllocationSummary::from_allocations(year, &allocations),
        monthly_trend,
        requests,
    })
}
