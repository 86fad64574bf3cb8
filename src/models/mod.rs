//! Core data models for the Workforce Analytics Engine.
//!
//! Consumed records (attendance, leave, employees) are owned by external
//! collaborators and treated as read-only; derived models (scores, findings,
//! forecasts) are computed per request.

mod attendance;
mod employee;
mod finding;
mod forecast;
mod leave;
mod score;
mod window;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use employee::{DEPARTMENT_NOT_SET, DEPARTMENT_UNKNOWN, EmployeeProfile, EmployeeSummary, Role};
pub use finding::{
    AnomalyCategory, AnomalyFinding, BurnoutRisk, DaysSinceLeave, NeverTaken, RiskLevel, Severity,
};
pub use forecast::{
    Confidence, Forecast, Insight, InsightKind, PeakLeaveDay, WorkforceAvailability,
};
pub use leave::{LeaveAllocation, LeaveRequest, LeaveStatus, LeaveType};
pub use score::{Grade, PerformanceScore, ScoreBreakdown, ScoreMetrics};
pub use window::ReportWindow;
