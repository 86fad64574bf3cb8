//! Performance scores with department rollups.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReportContext, ReportStamp};
use crate::calculation::{compute_score, mean, rank_scores};
use crate::error::AnalyticsResult;
use crate::models::{LeaveStatus, PerformanceScore, ReportWindow};
use crate::repository::{AttendanceQuery, LeaveQuery, RecordIndex};

/// Score rollup for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPerformance {
    /// Department or the analytics sentinel.
    pub department: String,
    /// Unweighted mean of member overall scores, one decimal place.
    pub average_score: Decimal,
    /// Members scored.
    pub employee_count: usize,
    /// Members at or above the top-performer score.
    pub top_performers: usize,
}

/// Ranked performance scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// Period scored.
    pub window: ReportWindow,
    /// Every active employee, best first.
    pub employee_scores: Vec<PerformanceScore>,
    /// Departments by average score, best first.
    pub department_analysis: Vec<DepartmentPerformance>,
    /// The highest ranked employees.
    pub top_performers: Vec<PerformanceScore>,
    /// Employees below the needs-improvement score.
    pub needs_improvement: Vec<PerformanceScore>,
}

/// Scores every active employee over `window`, or the default lookback
/// ending at the as-of date.
pub fn performance_report(
    ctx: &ReportContext<'_>,
    window: Option<ReportWindow>,
) -> AnalyticsResult<PerformanceReport> {
    let policy = ctx.config().scoring();
    let window = window.unwrap_or_else(|| ReportWindow::lookback(ctx.as_of(), policy.lookback_days));
    let repository = ctx.repository();
    let employees = ctx.active_employees()?;
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, window))?;
    let leaves = repository.leave_requests(&LeaveQuery {
        overlapping: Some(window),
        ..LeaveQuery::for_employees(&employees).with_status(LeaveStatus::Approved)
    })?;
    let index = RecordIndex::build(records, leaves);

    let scores: Vec<PerformanceScore> = employees
        .iter()
        .map(|employee| {
            compute_score(
                employee,
                index.attendance_for(&employee.id),
                index.leaves_for(&employee.id),
                &window,
                policy,
            )
        })
        .collect();
    let employee_scores = rank_scores(scores);

    let mut by_department: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    for score in &employee_scores {
        by_department
            .entry(score.department.as_str())
            .or_default()
            .push(score.overall_score);
    }
    let mut department_analysis: Vec<DepartmentPerformance> = by_department
        .into_iter()
        .map(|(department, scores)| DepartmentPerformance {
            department: department.to_string(),
            average_score: mean(&scores).unwrap_or(Decimal::ZERO).round_dp(1),
            employee_count: scores.len(),
            top_performers: scores
                .iter()
                .filter(|s| **s >= policy.top_performer_score)
                .count(),
        })
        .collect();
    department_analysis.sort_by(|a, b| b.average_score.cmp(&a.average_score));

    let top_performers = employee_scores
        .iter()
        .take(policy.top_performers_limit)
        .cloned()
        .collect();
    let needs_improvement = employee_scores
        .iter()
        .filter(|s| s.overall_score < policy.needs_improvement_score)
        .cloned()
        .collect();

    debug!(
        scored = employee_scores.len(),
        departments = department_analysis.len(),
        window = %window.label(),
        "Compiled performance scores"
    );

    Ok(PerformanceReport {
        stamp: ctx.stamp(),
        window,
        employee_scores,
        department_analysis,
        top_performers,
        needs_improvement,
    })
}
