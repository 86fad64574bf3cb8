//! Query parameters for the Workforce Analytics API.
//!
//! Every endpoint accepts an optional `as_of` date and `company_id` tenant
//! filter. Dates use `YYYY-MM-DD`; a malformed value is rejected before any
//! report runs. Window bounds (`start_date`/`end_date`) are parsed here so a
//! malformed or oversized range surfaces as an invalid window.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RequestLimits;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::ReportWindow;
use crate::reports::{AttendanceReportQuery, GraphType};

/// The tenant and reference date a request is computed for.
pub trait RequestScope {
    /// The `as_of` parameter as given.
    fn as_of_param(&self) -> Option<NaiveDate>;

    /// The `company_id` parameter as given.
    fn company_id(&self) -> Option<&str>;

    /// The reference date, defaulting to today in UTC.
    fn as_of(&self) -> NaiveDate {
        self.as_of_param()
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

macro_rules! request_scope {
    ($($params:ty),+ $(,)?) => {
        $(
            impl RequestScope for $params {
                fn as_of_param(&self) -> Option<NaiveDate> {
                    self.as_of
                }

                fn company_id(&self) -> Option<&str> {
                    self.company_id.as_deref()
                }
            }
        )+
    };
}

request_scope!(
    ScopeParams,
    AnomalyParams,
    PerformanceParams,
    GraphParams,
    TrendParams,
    LeaveAnalyticsParams,
    AttendanceReportParams,
    LeaveReportParams,
    PayrollReportParams,
);

/// Parses a window bound given as `YYYY-MM-DD`.
fn window_date(name: &str, value: &str) -> AnalyticsResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| AnalyticsError::InvalidWindow {
        message: format!("{} '{}' is not a YYYY-MM-DD date: {}", name, value, e),
    })
}

/// Builds a window from an explicit `start_date`/`end_date` pair.
///
/// Returns `None` when neither is given; one without the other, an
/// unparseable bound or a range longer than the configured limit is rejected.
fn explicit_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
    limits: &RequestLimits,
) -> AnalyticsResult<Option<ReportWindow>> {
    match (start_date, end_date) {
        (Some(start), Some(end)) => {
            let start = window_date("start_date", start)?;
            let end = window_date("end_date", end)?;
            ReportWindow::new(start, end)?
                .limited_to(limits.max_window_days)
                .map(Some)
        }
        (None, None) => Ok(None),
        _ => Err(AnalyticsError::InvalidWindow {
            message: "start_date and end_date must be given together".to_string(),
        }),
    }
}

/// Checks a day count against the configured window limit.
fn bounded_days(name: &str, days: u32, limits: &RequestLimits) -> AnalyticsResult<u32> {
    if days > limits.max_window_days {
        return Err(AnalyticsError::InvalidParameter {
            name: name.to_string(),
            message: format!("must be at most {}", limits.max_window_days),
        });
    }
    Ok(days)
}

/// Parameters shared by every endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
}

/// Parameters of `GET /analytics/anomalies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// Scan window length; the configured default when absent.
    pub lookback_days: Option<u32>,
}

impl AnomalyParams {
    /// Validates the scan window length.
    pub fn lookback_days(&self, limits: &RequestLimits) -> AnalyticsResult<Option<u32>> {
        match self.lookback_days {
            Some(0) => Err(AnalyticsError::InvalidParameter {
                name: "lookback_days".to_string(),
                message: "must be at least 1".to_string(),
            }),
            Some(days) => bounded_days("lookback_days", days, limits).map(Some),
            None => Ok(None),
        }
    }
}

/// Parameters of `GET /analytics/performance-scores`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// First scored day.
    pub start_date: Option<String>,
    /// Last scored day.
    pub end_date: Option<String>,
}

impl PerformanceParams {
    /// The explicit scoring window, if one was given.
    pub fn window(&self, limits: &RequestLimits) -> AnalyticsResult<Option<ReportWindow>> {
        explicit_range(self.start_date.as_deref(), self.end_date.as_deref(), limits)
    }
}

/// Parameters of `GET /analytics/graph-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// Dataset selector; every dataset when absent.
    #[serde(rename = "type")]
    pub graph_type: Option<String>,
}

impl GraphParams {
    /// Parses the dataset selector.
    pub fn graph_type(&self) -> AnalyticsResult<GraphType> {
        self.graph_type
            .as_deref()
            .map_or(Ok(GraphType::All), str::parse)
    }
}

/// Parameters of `GET /analytics/attendance-trends`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendParams {
    /// Reference date, the last day of the trend.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// Days before the as-of date to cover.
    pub days: Option<u32>,
}

impl TrendParams {
    /// The trend length, defaulting to the configured value.
    pub fn days(&self, limits: &RequestLimits) -> AnalyticsResult<u32> {
        bounded_days(
            "days",
            self.days.unwrap_or(limits.default_trend_days),
            limits,
        )
    }
}

/// Parameters of `GET /analytics/leave`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveAnalyticsParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// Calendar year.
    pub year: Option<i32>,
}

impl LeaveAnalyticsParams {
    /// The requested year, defaulting to the as-of year.
    pub fn year(&self) -> AnalyticsResult<i32> {
        let year = self.year.unwrap_or(self.as_of().year());
        ReportWindow::year(year).map(|_| year)
    }
}

/// Parameters of `GET /reports/attendance` and its CSV variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceReportParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// Calendar month, 1-12.
    pub month: Option<u32>,
    /// Calendar year.
    pub year: Option<i32>,
    /// First day of an explicit range.
    pub start_date: Option<String>,
    /// Last day of an explicit range.
    pub end_date: Option<String>,
    /// Restricts the report to one employee.
    pub employee_id: Option<String>,
    /// Restricts the report to one department.
    pub department: Option<String>,
}

impl AttendanceReportParams {
    /// Resolves the report query.
    ///
    /// An explicit range wins over `month`/`year`, which default to the month
    /// containing the as-of date.
    pub fn query(&self, limits: &RequestLimits) -> AnalyticsResult<AttendanceReportQuery> {
        let range = explicit_range(self.start_date.as_deref(), self.end_date.as_deref(), limits)?;
        let window = match range {
            Some(window) => window,
            None => {
                let as_of = self.as_of();
                ReportWindow::month(
                    self.year.unwrap_or(as_of.year()),
                    self.month.unwrap_or(as_of.month()),
                )?
            }
        };
        Ok(AttendanceReportQuery {
            window,
            employee_id: self.employee_id.clone(),
            department: self.department.clone(),
        })
    }
}

/// Parameters of `GET /reports/leave` and its CSV variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveReportParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// Calendar year.
    pub year: Option<i32>,
    /// First day of an explicit range.
    pub start_date: Option<String>,
    /// Last day of an explicit range.
    pub end_date: Option<String>,
}

impl LeaveReportParams {
    /// An explicit range, otherwise the calendar year (the as-of year by default).
    pub fn window(&self, limits: &RequestLimits) -> AnalyticsResult<ReportWindow> {
        match explicit_range(self.start_date.as_deref(), self.end_date.as_deref(), limits)? {
            Some(window) => Ok(window),
            None => ReportWindow::year(self.year.unwrap_or(self.as_of().year())),
        }
    }
}

/// Parameters of `GET /reports/payroll` and its CSV variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollReportParams {
    /// Reference date.
    pub as_of: Option<NaiveDate>,
    /// Tenant filter.
    pub company_id: Option<String>,
    /// Calendar month, 1-12.
    pub month: Option<u32>,
    /// Calendar year.
    pub year: Option<i32>,
}

impl PayrollReportParams {
    /// The payroll month, defaulting to the month containing the as-of date.
    pub fn month(&self) -> AnalyticsResult<ReportWindow> {
        let as_of = self.as_of();
        ReportWindow::month(
            self.year.unwrap_or(as_of.year()),
            self.month.unwrap_or(as_of.month()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn limits() -> RequestLimits {
        RequestLimits::default()
    }

    #[test]
    fn test_month_defaults_to_as_of() {
        let params = PayrollReportParams {
            as_of: Some(make_date("2026-02-14")),
            ..Default::default()
        };
        let month = params.month().unwrap();
        assert_eq!(month.start_date, make_date("2026-02-01"));
        assert_eq!(month.end_date, make_date("2026-02-28"));
    }

    #[test]
    fn test_impossible_month_is_rejected() {
        let params = PayrollReportParams {
            as_of: Some(make_date("2026-02-14")),
            month: Some(13),
            ..Default::default()
        };
        assert!(matches!(
            params.month(),
            Err(AnalyticsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_explicit_range_wins() {
        let params = AttendanceReportParams {
            as_of: Some(make_date("2026-03-31")),
            month: Some(1),
            start_date: Some("2026-03-02".to_string()),
            end_date: Some("2026-03-06".to_string()),
            department: Some("Engineering".to_string()),
            ..Default::default()
        };
        let query = params.query(&limits()).unwrap();
        assert_eq!(query.window.start_date, make_date("2026-03-02"));
        assert_eq!(query.window.end_date, make_date("2026-03-06"));
        assert_eq!(query.department.as_deref(), Some("Engineering"));
    }

    #[test]
    fn test_half_open_range_is_rejected() {
        let params = PerformanceParams {
            start_date: Some("2026-03-02".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.window(&limits()),
            Err(AnalyticsError::InvalidWindow { .. })
        ));
        assert!(PerformanceParams::default().window(&limits()).unwrap().is_none());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let params = LeaveReportParams {
            start_date: Some("2026-03-10".to_string()),
            end_date: Some("2026-03-01".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.window(&limits()),
            Err(AnalyticsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_leave_window_defaults_to_as_of_year() {
        let params = LeaveReportParams {
            as_of: Some(make_date("2025-07-01")),
            ..Default::default()
        };
        let window = params.window(&limits()).unwrap();
        assert_eq!(window.label(), "2025");
    }

    #[test]
    fn test_graph_type_selector() {
        let params = GraphParams {
            graph_type: Some("comparative".to_string()),
            ..Default::default()
        };
        assert_eq!(params.graph_type().unwrap(), GraphType::Comparative);
        assert_eq!(GraphParams::default().graph_type().unwrap(), GraphType::All);

        let params = GraphParams {
            graph_type: Some("pie".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.graph_type(),
            Err(AnalyticsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_zero_lookback_is_rejected() {
        let params = AnomalyParams {
            lookback_days: Some(0),
            ..Default::default()
        };
        assert!(params.lookback_days(&limits()).is_err());
        assert_eq!(AnomalyParams::default().lookback_days(&limits()).unwrap(), None);
    }

    #[test]
    fn test_lookback_above_limit_is_rejected() {
        let params = AnomalyParams {
            lookback_days: Some(4_294_967_295),
            ..Default::default()
        };
        assert!(matches!(
            params.lookback_days(&limits()),
            Err(AnalyticsError::InvalidParameter { .. })
        ));
        let params = AnomalyParams {
            lookback_days: Some(1096),
            ..Default::default()
        };
        assert_eq!(params.lookback_days(&limits()).unwrap(), Some(1096));
    }

    #[test]
    fn test_oversized_range_is_rejected() {
        let params = PerformanceParams {
            start_date: Some("0001-01-01".to_string()),
            end_date: Some("9999-12-31".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.window(&limits()),
            Err(AnalyticsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_malformed_range_bound_is_invalid_window() {
        let params = AttendanceReportParams {
            start_date: Some("yesterday".to_string()),
            end_date: Some("2026-03-06".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.query(&limits()),
            Err(AnalyticsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_trend_days_default_and_limit() {
        assert_eq!(TrendParams::default().days(&limits()).unwrap(), 30);
        let params = TrendParams {
            days: Some(7),
            ..Default::default()
        };
        assert_eq!(params.days(&limits()).unwrap(), 7);
        let params = TrendParams {
            days: Some(5000),
            ..Default::default()
        };
        assert!(matches!(
            params.days(&limits()),
            Err(AnalyticsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_leave_analytics_year_defaults_to_as_of() {
        let params = LeaveAnalyticsParams {
            as_of: Some(make_date("2025-07-01")),
            ..Default::default()
        };
        assert_eq!(params.year().unwrap(), 2025);
        let params = LeaveAnalyticsParams {
            year: Some(i32::MAX),
            ..Default::default()
        };
        assert!(params.year().is_err());
    }

    #[test]
    fn test_scope_uses_given_as_of() {
        let params = ScopeParams {
            as_of: Some(make_date("2026-03-31")),
            company_id: Some("acme".to_string()),
        };
        assert_eq!(params.as_of(), make_date("2026-03-31"));
        assert_eq!(params.company_id(), Some("acme"));
    }
}
