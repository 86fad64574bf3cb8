//! Anomaly scan report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReportContext, ReportStamp};
use crate::calculation::{AnomalySummary, CategorizedFindings, scan_employee};
use crate::error::AnalyticsResult;
use crate::models::{AnomalyFinding, ReportWindow};
use crate::repository::{AttendanceQuery, LeaveQuery, RecordIndex};

/// Rule findings over the scan window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Totals and urgent findings.
    pub summary: AnomalySummary,
    /// Findings by category.
    pub anomalies: CategorizedFindings,
    /// Human readable scan window, e.g. "Last 30 days".
    pub scan_period: String,
    /// The as-of date the scan ended on.
    pub scan_date: NaiveDate,
}

/// Scans every active employee over the last `lookback_days` days, or the
/// configured default.
pub fn anomaly_report(
    ctx: &ReportContext<'_>,
    lookback_days: Option<u32>,
) -> AnalyticsResult<AnomalyReport> {
    let policy = ctx.config().anomaly();
    let lookback_days = lookback_days.unwrap_or(policy.lookback_days);
    let as_of = ctx.as_of();
    let window = ReportWindow::lookback(as_of, lookback_days);

    let repository = ctx.repository();
    let employees = ctx.active_employees()?;
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, window))?;
    let leaves = repository.leave_requests(&LeaveQuery::for_employees(&employees))?;
    let index = RecordIndex::build(records, leaves);

    let findings: Vec<AnomalyFinding> = employees
        .iter()
        .flat_map(|employee| {
            scan_employee(
                employee,
                index.attendance_for(&employee.id),
                index.leaves_for(&employee.id),
                &window,
                as_of,
                policy,
            )
        })
        .collect();
    let anomalies = CategorizedFindings::from_findings(findings);
    let summary = anomalies.summarize(policy.immediate_action_limit);
    debug!(
        employees = employees.len(),
        total = summary.total_anomalies,
        high = summary.high_severity,
        "Anomaly scan complete"
    );

    Ok(AnomalyReport {
        stamp: ctx.stamp(),
        summary,
        anomalies,
        scan_period: format!("Last {} days", lookback_days),
        scan_date: as_of,
    })
}
