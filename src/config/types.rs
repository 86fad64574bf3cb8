//! Configuration types for workforce analytics.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from YAML configuration files. Every threshold the engines use
//! lives here; the `Default` implementations carry the reference values so a
//! partially specified file only overrides what it names.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Weight of each scoring component. The weights sum to one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of the attendance rate.
    pub attendance: Decimal,
    /// Weight of the punctuality rate.
    pub punctuality: Decimal,
    /// Weight of the work-hours score.
    pub work_hours: Decimal,
    /// Weight of the consistency score.
    pub consistency: Decimal,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            attendance: Decimal::new(35, 2),
            punctuality: Decimal::new(25, 2),
            work_hours: Decimal::new(25, 2),
            consistency: Decimal::new(15, 2),
        }
    }
}

impl ScoreWeights {
    /// Sum of all weights.
    pub fn total(&self) -> Decimal {
        self.attendance + self.punctuality + self.work_hours + self.consistency
    }
}

/// Scoring policy from `scoring.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Default window length, ending at the as-of date.
    pub lookback_days: u32,
    /// Component weights.
    pub weights: ScoreWeights,
    /// Latest check-in (minute resolution) still counted as on time.
    pub on_time_cutoff: NaiveTime,
    /// Lower bound of the ideal average day.
    pub ideal_hours_min: Decimal,
    /// Upper bound of the ideal average day.
    pub ideal_hours_max: Decimal,
    /// Target day used to scale short averages.
    pub target_hours: Decimal,
    /// Points lost per hour above the ideal range.
    pub overwork_penalty_per_hour: Decimal,
    /// Minimum work-hours score for overwork.
    pub overwork_floor: Decimal,
    /// Consecutive attendance dates further apart than this count as a gap.
    pub max_gap_days: i64,
    /// Points lost per gap.
    pub gap_penalty: Decimal,
    /// Minimum score counted as a top performer in department rollups.
    pub top_performer_score: Decimal,
    /// Scores below this are listed as needing improvement.
    pub needs_improvement_score: Decimal,
    /// Number of employees listed as top performers.
    pub top_performers_limit: usize,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            weights: ScoreWeights::default(),
            on_time_cutoff: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default(),
            ideal_hours_min: Decimal::new(75, 1),
            ideal_hours_max: Decimal::new(95, 1),
            target_hours: Decimal::from(8),
            overwork_penalty_per_hour: Decimal::from(5),
            overwork_floor: Decimal::from(80),
            max_gap_days: 3,
            gap_penalty: Decimal::from(10),
            top_performer_score: Decimal::from(85),
            needs_improvement_score: Decimal::from(60),
            top_performers_limit: 10,
        }
    }
}

/// Forecasting policy from `forecasting.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastPolicy {
    /// History window length, ending at the as-of date.
    pub lookback_days: u32,
    /// History points needed for MEDIUM confidence.
    pub medium_confidence_points: usize,
    /// Number of most recent weeks averaged for the attendance prediction.
    pub recent_weeks: usize,
    /// Attendance rate predicted when there is no weekly history.
    pub default_attendance_rate: Decimal,
    /// Days ahead covered by the availability forecast.
    pub availability_horizon_days: u32,
    /// Predicted leave requests above this raise a planning warning.
    pub high_leave_demand: u32,
    /// Predicted attendance below this raises an attendance warning.
    pub low_attendance_rate: Decimal,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            medium_confidence_points: 3,
            recent_weeks: 4,
            default_attendance_rate: Decimal::new(950, 1),
            availability_horizon_days: 7,
            high_leave_demand: 15,
            low_attendance_rate: Decimal::from(90),
        }
    }
}

/// Anomaly rule thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnomalyPolicy {
    /// Default scan window length, ending at the as-of date.
    pub lookback_days: u32,
    /// Check-ins after this minute are late.
    pub late_after: NaiveTime,
    /// Share of late check-in days that triggers a finding.
    pub late_ratio: Decimal,
    /// Check-ins before this hour are very early.
    pub early_before: NaiveTime,
    /// Very early check-ins above this count trigger a finding.
    pub early_count: u32,
    /// Width of a check-in clustering bucket, in minutes.
    pub cluster_bucket_minutes: u32,
    /// Bucket counts above this may trigger a finding.
    pub cluster_min_count: u32,
    /// Share of check-in days a bucket must exceed.
    pub cluster_ratio: Decimal,
    /// Monday/Friday leave starts at or above this count trigger a finding.
    pub weekend_extension_count: u32,
    /// Sick leave requests above this count trigger a finding.
    pub sick_leave_count: u32,
    /// Average daily hours below this trigger a finding.
    pub low_hours: Decimal,
    /// Average daily hours above this trigger a finding.
    pub high_hours: Decimal,
    /// Unexplained weekday absences above this trigger a finding.
    pub unapproved_absence_days: u32,
    /// Number of HIGH findings surfaced for immediate action.
    pub immediate_action_limit: usize,
}

impl Default for AnomalyPolicy {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            late_after: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            late_ratio: Decimal::new(7, 1),
            early_before: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
            early_count: 5,
            cluster_bucket_minutes: 2,
            cluster_min_count: 10,
            cluster_ratio: Decimal::new(5, 1),
            weekend_extension_count: 3,
            sick_leave_count: 4,
            low_hours: Decimal::from(6),
            high_hours: Decimal::from(12),
            unapproved_absence_days: 3,
            immediate_action_limit: 5,
        }
    }
}

/// Burnout risk signals and weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BurnoutPolicy {
    /// Window for hours and work days.
    pub hours_lookback_days: u32,
    /// Window for leave taken.
    pub leave_lookback_days: u32,
    /// Average daily hours above this add `long_hours_points`.
    pub long_hours: Decimal,
    /// Points for long hours.
    pub long_hours_points: u32,
    /// Points for no approved leave in the leave window.
    pub no_leave_points: u32,
    /// Work days above this add `rest_days_points`.
    pub rest_days_limit: u32,
    /// Points for minimal rest days.
    pub rest_days_points: u32,
    /// Scores at or above this are reported.
    pub report_threshold: u32,
    /// Scores at or above this are HIGH risk.
    pub high_threshold: u32,
}

impl Default for BurnoutPolicy {
    fn default() -> Self {
        Self {
            hours_lookback_days: 30,
            leave_lookback_days: 90,
            long_hours: Decimal::from(10),
            long_hours_points: 40,
            no_leave_points: 30,
            rest_days_limit: 25,
            rest_days_points: 30,
            report_threshold: 50,
            high_threshold: 70,
        }
    }
}

/// Detection configuration from `detection.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DetectionPolicy {
    /// Anomaly rule thresholds.
    pub anomaly: AnomalyPolicy,
    /// Burnout signals.
    pub burnout: BurnoutPolicy,
}

/// A monthly wage band used by the salary distribution chart.
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryBand {
    /// Display label, e.g. "30k-50k".
    pub label: String,
    /// Inclusive lower bound.
    pub min: Decimal,
    /// Exclusive upper bound; open-ended when absent.
    #[serde(default)]
    pub max: Option<Decimal>,
}

impl SalaryBand {
    /// Checks whether a wage falls inside the band.
    pub fn contains(&self, wage: Decimal) -> bool {
        wage >= self.min && self.max.is_none_or(|max| wage < max)
    }
}

/// Payroll policy from `payroll.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// Fixed number of paid days per month used to derive the daily wage.
    pub working_days_per_month: Decimal,
    /// Fraction of a day credited for a HALF_DAY record.
    pub half_day_weight: Decimal,
    /// Standard day used to split work hours from extra hours.
    pub standard_work_hours: Decimal,
    /// Wage bands for the salary distribution chart.
    pub salary_bands: Vec<SalaryBand>,
    /// Wage bands for payroll analytics; empty bands are omitted there.
    pub analytics_salary_bands: Vec<SalaryBand>,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        let band = |label: &str, min: i64, max: Option<i64>| SalaryBand {
            label: label.to_string(),
            min: Decimal::from(min),
            max: max.map(Decimal::from),
        };
        Self {
            working_days_per_month: Decimal::from(22),
            half_day_weight: Decimal::new(5, 1),
            standard_work_hours: Decimal::from(8),
            salary_bands: vec![
                band("0-30k", 0, Some(30_000)),
                band("30k-50k", 30_000, Some(50_000)),
                band("50k-75k", 50_000, Some(75_000)),
                band("75k-100k", 75_000, Some(100_000)),
                band("100k+", 100_000, None),
            ],
            analytics_salary_bands: vec![
                band("0-25k", 0, Some(25_000)),
                band("25k-50k", 25_000, Some(50_000)),
                band("50k-75k", 50_000, Some(75_000)),
                band("75k-100k", 75_000, Some(100_000)),
                band("100k+", 100_000, None),
            ],
        }
    }
}

/// Bounds on request parameters from `limits.yaml`.
///
/// Report engines walk windows day by day, so every window a caller chooses
/// is capped here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestLimits {
    /// Longest window, in days, an explicit range or lookback may cover.
    pub max_window_days: u32,
    /// Trend length used when `days` is not given.
    pub default_trend_days: u32,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_window_days: 1096,
            default_trend_days: 30,
        }
    }
}

/// The complete analytics configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    scoring: ScoringPolicy,
    forecasting: ForecastPolicy,
    detection: DetectionPolicy,
    payroll: PayrollPolicy,
    limits: RequestLimits,
}

impl AnalyticsConfig {
    /// Creates a new AnalyticsConfig from its component parts.
    pub fn new(
        scoring: ScoringPolicy,
        forecasting: ForecastPolicy,
        detection: DetectionPolicy,
        payroll: PayrollPolicy,
        limits: RequestLimits,
    ) -> Self {
        Self {
            scoring,
            forecasting,
            detection,
            payroll,
            limits,
        }
    }

    /// Returns the scoring policy.
    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    /// Returns the forecasting policy.
    pub fn forecasting(&self) -> &ForecastPolicy {
        &self.forecasting
    }

    /// Returns the anomaly thresholds.
    pub fn anomaly(&self) -> &AnomalyPolicy {
        &self.detection.anomaly
    }

    /// Returns the burnout policy.
    pub fn burnout(&self) -> &BurnoutPolicy {
        &self.detection.burnout
    }

    /// Returns the payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        &self.payroll
    }

    /// Returns the request limits.
    pub fn limits(&self) -> &RequestLimits {
        &self.limits
    }
}
