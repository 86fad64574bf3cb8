//! Performance score models.
//!
//! This module contains the [`PerformanceScore`] produced by the scoring engine,
//! its component [`ScoreBreakdown`], raw [`ScoreMetrics`] and letter [`Grade`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Role;

/// Letter grade derived from an overall score.
///
/// # Example
///
/// ```
/// use workforce_analytics::models::Grade;
/// use rust_decimal::Decimal;
///
/// assert_eq!(Grade::from_score(Decimal::new(905, 1)), Grade::APlus);
/// assert_eq!(Grade::from_score(Decimal::new(499, 1)), Grade::D);
/// assert_eq!(Grade::B.label(), "B (Satisfactory)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 90 and above.
    #[serde(rename = "A+")]
    APlus,
    /// 80 to 90.
    #[serde(rename = "A")]
    A,
    /// 70 to 80.
    #[serde(rename = "B+")]
    BPlus,
    /// 60 to 70.
    #[serde(rename = "B")]
    B,
    /// 50 to 60.
    #[serde(rename = "C")]
    C,
    /// Below 50.
    #[serde(rename = "D")]
    D,
}

impl Grade {
    /// Maps an overall score onto its grade band.
    pub fn from_score(score: Decimal) -> Self {
        if score >= Decimal::from(90) {
            Grade::APlus
        } else if score >= Decimal::from(80) {
            Grade::A
        } else if score >= Decimal::from(70) {
            Grade::BPlus
        } else if score >= Decimal::from(60) {
            Grade::B
        } else if score >= Decimal::from(50) {
            Grade::C
        } else {
            Grade::D
        }
    }

    /// The short letter form.
    pub fn letter(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    /// The letter with its description, e.g. `A+ (Excellent)`.
    pub fn label(&self) -> &'static str {
        match self {
            Grade::APlus => "A+ (Excellent)",
            Grade::A => "A (Very Good)",
            Grade::BPlus => "B+ (Good)",
            Grade::B => "B (Satisfactory)",
            Grade::C => "C (Needs Improvement)",
            Grade::D => "D (Poor)",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Component rates (0-100) before weighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Attendance rate component.
    pub attendance: Decimal,
    /// Punctuality rate component.
    pub punctuality: Decimal,
    /// Work-hours component.
    pub work_hours: Decimal,
    /// Consistency component.
    pub consistency: Decimal,
}

/// Raw metrics behind a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMetrics {
    /// Days with a check-in inside the window.
    pub days_present: u32,
    /// Working days minus approved leave working days (may be negative).
    pub expected_days: i64,
    /// Uncapped attendance rate.
    pub attendance_rate: Decimal,
    /// Average hours of complete records.
    pub avg_hours_per_day: Decimal,
    /// Share of present days checked in on time.
    pub on_time_percentage: Decimal,
    /// Gaps of more than the allowed days between attendance dates.
    pub gaps: u32,
}

/// Weighted performance score of one employee over a window.
///
/// `rank` and `percentile` are only set once the score has been ranked
/// against its peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScore {
    /// The scored employee.
    pub employee_id: String,
    /// Display name.
    pub employee_name: String,
    /// Contact email.
    pub email: String,
    /// Department, or the "Not Set" sentinel.
    pub department: String,
    /// Access role.
    pub role: Role,
    /// Weighted total, 0-100, one decimal place.
    pub overall_score: Decimal,
    /// Letter grade.
    pub grade: Grade,
    /// Letter grade with description.
    pub grade_label: String,
    /// Per-component rates.
    pub breakdown: ScoreBreakdown,
    /// Raw metrics.
    pub metrics: ScoreMetrics,
    /// 1-indexed position after sorting by overall score descending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    /// Share of peers at or below this score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<Decimal>,
}
