//! HTTP API module for the Workforce Analytics Engine.
//!
//! This module provides the read-only REST endpoints for the analytics
//! reports and their CSV exports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AnomalyParams, AttendanceReportParams, GraphParams, LeaveAnalyticsParams, LeaveReportParams,
    PayrollReportParams, PerformanceParams, RequestScope, ScopeParams, TrendParams,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
