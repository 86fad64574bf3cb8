//! Anomaly and burnout finding models.
//!
//! Findings are request-scoped and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Priority of an anomaly finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Worth a look.
    Low,
    /// Should be discussed.
    Medium,
    /// Requires immediate action.
    High,
}

/// Which family of rules produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCategory {
    /// Check-in time patterns.
    Attendance,
    /// Leave request patterns.
    Leave,
    /// Worked-hours patterns.
    Productivity,
    /// Policy violations such as unapproved absences.
    Policy,
}

impl AnomalyCategory {
    /// Categories in reporting order.
    pub const ALL: [AnomalyCategory; 4] = [
        AnomalyCategory::Attendance,
        AnomalyCategory::Leave,
        AnomalyCategory::Productivity,
        AnomalyCategory::Policy,
    ];
}

/// One rule firing for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    /// The employee the finding is about.
    pub employee_id: String,
    /// Display name.
    pub employee_name: String,
    /// Contact email.
    pub email: String,
    /// Rule family.
    pub category: AnomalyCategory,
    /// Short rule name, e.g. "Chronic Late Check-ins".
    pub anomaly_type: String,
    /// Priority.
    pub severity: Severity,
    /// Evidence, e.g. "8 out of 10 days".
    pub details: String,
    /// Suggested follow-up.
    pub recommendation: String,
}

/// Burnout classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Score between the reporting and high thresholds.
    Medium,
    /// Score at or above the high threshold.
    High,
}

/// Days elapsed since the employee's last approved leave ended.
///
/// Serializes as a number, or the string `"Never"` when no approved leave exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaysSinceLeave {
    /// Days since the most recent approved leave end date.
    Days(i64),
    /// No approved leave on record.
    Never(NeverTaken),
}

/// Marker serialized as `"Never"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeverTaken {
    /// No approved leave on record.
    Never,
}

impl DaysSinceLeave {
    /// The `"Never"` value.
    pub const NEVER: DaysSinceLeave = DaysSinceLeave::Never(NeverTaken::Never);
}

/// A burnout risk finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnoutRisk {
    /// The employee at risk.
    pub employee_id: String,
    /// Display name.
    pub employee_name: String,
    /// Contact email.
    pub email: String,
    /// Department, or the "Not Set" sentinel.
    pub department: String,
    /// Composite score, 0-100.
    pub risk_score: u32,
    /// Classification of the score.
    pub risk_level: RiskLevel,
    /// Which signals contributed.
    pub risk_factors: Vec<String>,
    /// Average hours of complete records, one decimal place.
    pub avg_hours_per_day: Decimal,
    /// Days since last approved leave ended.
    pub days_since_last_leave: DaysSinceLeave,
}
