//! Calculation logic for the Workforce Analytics Engine.
//!
//! This module contains the pure engines behind every report: shared
//! aggregation helpers (durations, working days, percentages), performance
//! scoring and ranking, leave and attendance forecasting, anomaly rules,
//! burnout risk assessment and monthly payroll.

mod aggregation;
mod anomaly;
mod burnout;
mod forecasting;
mod payroll;
mod scoring;

pub use aggregation::{
    FULL_CREDIT, NO_CREDIT, STANDARD_WORK_HOURS, count_working_days, is_working_day, mean,
    minute_of_day, month_start, percentage, split_standard_hours, week_start,
    work_duration_hours,
};
pub use anomaly::{AnomalySummary, CategorizedFindings, scan_employee};
pub use burnout::{assess_burnout, days_since_last_leave, sort_by_risk};
pub use forecasting::{
    forecast_availability, forecast_next_period, full_weekday_name, generate_insights,
    monthly_leave_counts, peak_leave_days, predict_attendance_rate, weekly_attendance_rates,
};
pub use payroll::{PayrollLine, ProratedComponents, compute_payroll_line};
pub use scoring::{compute_score, rank_scores, work_hours_score};
