//! Forecast models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Severity;

/// Coarse confidence label, driven only by the number of history points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    /// Fewer points than the medium threshold.
    Low,
    /// Enough points for a trend.
    Medium,
    /// Reserved for richer models.
    High,
}

/// A next-period prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    /// Predicted count for the next period, never negative.
    pub predicted: u32,
    /// Confidence label.
    pub confidence: Confidence,
    /// Number of history points the prediction is based on.
    pub basis_points: usize,
}

/// Headcount expected to be available over the availability horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkforceAvailability {
    /// Active employees minus approved leave requests in the horizon.
    ///
    /// Counts requests, not distinct employees, so it can go negative.
    pub available_employees: i64,
    /// Active employees in scope.
    pub total_employees: usize,
    /// `available / total * 100` to one decimal place; 100 with no employees.
    pub availability_percentage: Decimal,
    /// Approved leave requests overlapping the horizon.
    pub employees_on_leave: usize,
}

/// Approved leave starts on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakLeaveDay {
    /// Weekday name, e.g. "Monday".
    pub day: String,
    /// Number of approved leaves starting on that weekday.
    pub leave_count: u32,
}

/// Kind of a workforce insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightKind {
    /// A threshold was crossed.
    Warning,
    /// Employees need attention.
    Alert,
    /// Nothing to report.
    Success,
}

/// A human readable observation derived from the predictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Insight kind.
    #[serde(rename = "type")]
    pub kind: InsightKind,
    /// Area the insight concerns.
    pub category: String,
    /// Message shown to HR.
    pub message: String,
    /// Priority of the follow-up.
    pub priority: Severity,
}
