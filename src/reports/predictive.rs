//! Predictive workforce report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReportContext, ReportStamp};
use crate::calculation::{
    assess_burnout, forecast_availability, forecast_next_period, generate_insights,
    monthly_leave_counts, peak_leave_days, predict_attendance_rate, sort_by_risk,
    weekly_attendance_rates,
};
use crate::error::AnalyticsResult;
use crate::models::{
    BurnoutRisk, Confidence, Insight, LeaveStatus, PeakLeaveDay, ReportWindow, RiskLevel,
    WorkforceAvailability,
};
use crate::repository::{AttendanceQuery, LeaveQuery, RecordIndex};

/// Forecasts for the coming period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predictions {
    /// Approved leave requests expected next month.
    pub next_month_leave_requests: u32,
    /// Confidence in the leave forecast.
    pub confidence: Confidence,
    /// Months of history behind the leave forecast.
    pub basis_months: usize,
    /// Expected attendance rate, one decimal place.
    pub predicted_attendance_rate: Decimal,
    /// Headcount expected over the next week.
    pub workforce_availability_next_week: WorkforceAvailability,
}

/// Employees at risk of burnout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnoutAnalysis {
    /// Employees reported.
    pub total_at_risk: usize,
    /// Employees at HIGH risk.
    pub high_risk_count: usize,
    /// Risks, highest score first.
    pub employees: Vec<BurnoutRisk>,
}

/// Recurring leave patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalTrends {
    /// Weekdays leave most often starts on, busiest first.
    pub peak_leave_days: Vec<PeakLeaveDay>,
}

/// Predictions, burnout risk and insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// History window the forecasts are based on.
    pub window: ReportWindow,
    /// Forecasts.
    pub predictions: Predictions,
    /// Burnout risks.
    pub burnout_analysis: BurnoutAnalysis,
    /// Leave patterns.
    pub seasonal_trends: SeasonalTrends,
    /// Observations for HR.
    pub insights: Vec<Insight>,
}

/// Compiles predictions over the active workforce.
pub fn predictive_report(ctx: &ReportContext<'_>) -> AnalyticsResult<PredictiveReport> {
    let config = ctx.config();
    let forecasting = config.forecasting();
    let burnout = config.burnout();
    let as_of = ctx.as_of();

    let window = ReportWindow::lookback(as_of, forecasting.lookback_days);
    let hours_window = ReportWindow::lookback(as_of, burnout.hours_lookback_days);
    let fetch_window = if hours_window.start_date < window.start_date {
        hours_window
    } else {
        window
    };

    let repository = ctx.repository();
    let employees = ctx.active_employees()?;
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, fetch_window))?;
    // Approved leave of any age: the latest one dates the last break.
    let leaves = repository
        .leave_requests(&LeaveQuery::for_employees(&employees).with_status(LeaveStatus::Approved))?;

    let leave_history = monthly_leave_counts(&leaves, &window);
    let leave_forecast = forecast_next_period(&leave_history, forecasting.medium_confidence_points);

    let weekly_rates = weekly_attendance_rates(&records, employees.len(), &window);
    let predicted_attendance_rate = predict_attendance_rate(&weekly_rates, forecasting).round_dp(1);

    let availability = forecast_availability(
        employees.len(),
        &leaves,
        &ReportWindow::ahead(as_of, forecasting.availability_horizon_days),
    );

    let index = RecordIndex::build(records, leaves.clone());
    let mut risks: Vec<BurnoutRisk> = employees
        .iter()
        .filter_map(|employee| {
            assess_burnout(
                employee,
                index.attendance_for(&employee.id),
                index.leaves_for(&employee.id),
                as_of,
                burnout,
            )
        })
        .collect();
    sort_by_risk(&mut risks);
    let high_risk_count = risks
        .iter()
        .filter(|r| r.risk_level == RiskLevel::High)
        .count();

    let insights = generate_insights(
        leave_forecast.predicted,
        predicted_attendance_rate,
        risks.len(),
        forecasting,
    );

    debug!(
        leave_history = ?leave_history,
        weeks = weekly_rates.len(),
        at_risk = risks.len(),
        "Compiled predictions"
    );

    Ok(PredictiveReport {
        stamp: ctx.stamp(),
        window,
        predictions: Predictions {
            next_month_leave_requests: leave_forecast.predicted,
            confidence: leave_forecast.confidence,
            basis_months: leave_forecast.basis_points,
            predicted_attendance_rate,
            workforce_availability_next_week: availability,
        },
        burnout_analysis: BurnoutAnalysis {
            total_at_risk: risks.len(),
            high_risk_count,
            employees: risks,
        },
        seasonal_trends: SeasonalTrends {
            peak_leave_days: peak_leave_days(&leaves, &window),
        },
        insights,
    })
}
