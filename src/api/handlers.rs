//! HTTP request handlers for the Workforce Analytics API.
//!
//! Every endpoint is a read-only GET. Handlers resolve the query parameters,
//! build a [`ReportContext`] and hand the outcome to a shared responder.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::reports::{
    CsvExport, ReportContext, anomaly_report, attendance_csv, attendance_report,
    attendance_trend_report, dashboard_report, graph_data, leave_analytics_report, leave_csv,
    leave_report, payroll_analytics_report, payroll_csv, payroll_report, performance_report,
    predictive_report,
};

use super::request::{
    AnomalyParams, AttendanceReportParams, GraphParams, LeaveAnalyticsParams, LeaveReportParams,
    PayrollReportParams, PerformanceParams, RequestScope, ScopeParams, TrendParams,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/analytics/predictive", get(predictive_handler))
        .route("/analytics/anomalies", get(anomalies_handler))
        .route("/analytics/performance-scores", get(performance_handler))
        .route("/analytics/graph-data", get(graph_data_handler))
        .route("/analytics/dashboard", get(dashboard_handler))
        .route("/analytics/attendance-trends", get(attendance_trends_handler))
        .route("/analytics/leave", get(leave_analytics_handler))
        .route("/analytics/payroll", get(payroll_analytics_handler))
        .route("/reports/attendance", get(attendance_handler))
        .route("/reports/attendance/csv", get(attendance_csv_handler))
        .route("/reports/leave", get(leave_handler))
        .route("/reports/leave/csv", get(leave_csv_handler))
        .route("/reports/payroll", get(payroll_handler))
        .route("/reports/payroll/csv", get(payroll_csv_handler))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn context<'a>(state: &'a AppState, scope: &'a impl RequestScope) -> ReportContext<'a> {
    ReportContext::new(state.repository(), state.config().config(), scope.as_of())
        .for_company(scope.company_id())
}

/// Unwraps the query parameters or answers 400 with the rejection text.
macro_rules! query_params {
    ($params:expr, $correlation_id:expr) => {
        match $params {
            Ok(Query(params)) => params,
            Err(rejection) => return reject(&$correlation_id, rejection),
        }
    };
}

fn reject(correlation_id: &Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query parameter rejected"
    );
    ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error: ApiError::invalid_parameter(body_text),
    }
    .into_response()
}

fn failure(correlation_id: &Uuid, endpoint: &str, err: AnalyticsError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        endpoint,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn respond_json<T: Serialize>(
    correlation_id: Uuid,
    endpoint: &str,
    start_time: Instant,
    outcome: AnalyticsResult<T>,
) -> Response {
    match outcome {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                endpoint,
                duration_us = start_time.elapsed().as_micros(),
                "Report compiled"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => failure(&correlation_id, endpoint, err),
    }
}

fn respond_csv(
    correlation_id: Uuid,
    endpoint: &str,
    start_time: Instant,
    outcome: AnalyticsResult<CsvExport>,
) -> Response {
    match outcome {
        Ok(export) => {
            info!(
                correlation_id = %correlation_id,
                endpoint,
                filename = %export.filename,
                bytes = export.body.len(),
                duration_us = start_time.elapsed().as_micros(),
                "CSV export rendered"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", export.filename),
                    ),
                ],
                export.body,
            )
                .into_response()
        }
        Err(err) => failure(&correlation_id, endpoint, err),
    }
}

/// Handler for GET /analytics/predictive.
async fn predictive_handler(
    State(state): State<AppState>,
    params: Result<Query<ScopeParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing predictive analytics request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    respond_json(correlation_id, "predictive", start_time, predictive_report(&ctx))
}

/// Handler for GET /analytics/anomalies.
async fn anomalies_handler(
    State(state): State<AppState>,
    params: Result<Query<AnomalyParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing anomaly scan request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .lookback_days(state.config().config().limits())
        .and_then(|days| anomaly_report(&ctx, days));
    respond_json(correlation_id, "anomalies", start_time, outcome)
}

/// Handler for GET /analytics/performance-scores.
async fn performance_handler(
    State(state): State<AppState>,
    params: Result<Query<PerformanceParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing performance score request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .window(state.config().config().limits())
        .and_then(|window| performance_report(&ctx, window));
    respond_json(correlation_id, "performance-scores", start_time, outcome)
}

/// Handler for GET /analytics/graph-data.
async fn graph_data_handler(
    State(state): State<AppState>,
    params: Result<Query<GraphParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing graph data request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .graph_type()
        .and_then(|graph_type| graph_data(&ctx, graph_type));
    respond_json(correlation_id, "graph-data", start_time, outcome)
}

/// Handler for GET /analytics/dashboard.
async fn dashboard_handler(
    State(state): State<AppState>,
    params: Result<Query<ScopeParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing dashboard request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    respond_json(correlation_id, "dashboard", start_time, dashboard_report(&ctx))
}

/// Handler for GET /analytics/attendance-trends.
async fn attendance_trends_handler(
    State(state): State<AppState>,
    params: Result<Query<TrendParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance trend request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .days(state.config().config().limits())
        .and_then(|days| attendance_trend_report(&ctx, days));
    respond_json(correlation_id, "attendance-trends", start_time, outcome)
}

/// Handler for GET /analytics/leave.
async fn leave_analytics_handler(
    State(state): State<AppState>,
    params: Result<Query<LeaveAnalyticsParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave analytics request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .year()
        .and_then(|year| leave_analytics_report(&ctx, year));
    respond_json(correlation_id, "analytics/leave", start_time, outcome)
}

/// Handler for GET /analytics/payroll.
async fn payroll_analytics_handler(
    State(state): State<AppState>,
    params: Result<Query<ScopeParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll analytics request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    respond_json(
        correlation_id,
        "analytics/payroll",
        start_time,
        payroll_analytics_report(&ctx),
    )
}

/// Handler for GET /reports/attendance.
async fn attendance_handler(
    State(state): State<AppState>,
    params: Result<Query<AttendanceReportParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance report request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .query(state.config().config().limits())
        .and_then(|query| attendance_report(&ctx, &query));
    respond_json(correlation_id, "attendance", start_time, outcome)
}

/// Handler for GET /reports/attendance/csv.
async fn attendance_csv_handler(
    State(state): State<AppState>,
    params: Result<Query<AttendanceReportParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance export request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .query(state.config().config().limits())
        .and_then(|query| attendance_report(&ctx, &query))
        .and_then(|report| attendance_csv(&report));
    respond_csv(correlation_id, "attendance/csv", start_time, outcome)
}

/// Handler for GET /reports/leave.
async fn leave_handler(
    State(state): State<AppState>,
    params: Result<Query<LeaveReportParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave report request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .window(state.config().config().limits())
        .and_then(|window| leave_report(&ctx, window));
    respond_json(correlation_id, "leave", start_time, outcome)
}

/// Handler for GET /reports/leave/csv.
async fn leave_csv_handler(
    State(state): State<AppState>,
    params: Result<Query<LeaveReportParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave export request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .window(state.config().config().limits())
        .and_then(|window| leave_report(&ctx, window))
        .and_then(|report| leave_csv(&report));
    respond_csv(correlation_id, "leave/csv", start_time, outcome)
}

/// Handler for GET /reports/payroll.
async fn payroll_handler(
    State(state): State<AppState>,
    params: Result<Query<PayrollReportParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll report request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .month()
        .and_then(|month| payroll_report(&ctx, month));
    respond_json(correlation_id, "payroll", start_time, outcome)
}

/// Handler for GET /reports/payroll/csv.
async fn payroll_csv_handler(
    State(state): State<AppState>,
    params: Result<Query<PayrollReportParams>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll export request");
    let params = query_params!(params, correlation_id);

    let start_time = Instant::now();
    let ctx = context(&state, &params);
    let outcome = params
        .month()
        .and_then(|month| payroll_report(&ctx, month))
        .and_then(|report| payroll_csv(&report));
    respond_csv(correlation_id, "payroll/csv", start_time, outcome)
}
