//! Leave request and allocation models.
//!
//! This module defines [`LeaveRequest`], [`LeaveAllocation`] and their enums as
//! provided by the leave-management collaborator.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// The type of leave requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    /// Paid time off.
    Paid,
    /// Sick leave.
    Sick,
    /// Unpaid leave.
    Unpaid,
}

impl LeaveType {
    /// All leave types in display order.
    pub const ALL: [LeaveType; 3] = [LeaveType::Paid, LeaveType::Sick, LeaveType::Unpaid];
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveType::Paid => write!(f, "Paid Leave"),
            LeaveType::Sick => write!(f, "Sick Leave"),
            LeaveType::Unpaid => write!(f, "Unpaid Leave"),
        }
    }
}

/// Workflow status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by an administrator.
    Approved,
    /// Rejected by an administrator.
    Rejected,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "Pending"),
            LeaveStatus::Approved => write!(f, "Approved"),
            LeaveStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A leave (time-off) request.
///
/// `total_days` is fixed when the request is created and never recomputed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier of the request.
    pub id: String,
    /// The employee who requested the leave.
    pub employee_id: String,
    /// The type of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Number of calendar days requested.
    pub total_days: u32,
    /// Current workflow status.
    pub status: LeaveStatus,
    /// Reason given by the employee.
    #[serde(default)]
    pub reason: String,
    /// Who approved the request, if anyone.
    #[serde(default)]
    pub approved_by: Option<String>,
    /// When the request was approved.
    #[serde(default)]
    pub approved_at: Option<NaiveDateTime>,
    /// When the request was submitted.
    pub created_at: NaiveDateTime,
}

impl LeaveRequest {
    /// Creates a pending request, computing `total_days` from the date range.
    ///
    /// # Example
    ///
    /// ```
    /// use workforce_analytics::models::{LeaveRequest, LeaveType};
    /// use chrono::NaiveDate;
    ///
    /// let created = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap().and_hms_opt(10, 0, 0).unwrap();
    /// let leave = LeaveRequest::new(
    ///     "leave_001",
    ///     "emp_001",
    ///     LeaveType::Paid,
    ///     NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
    ///     created,
    /// )
    /// .unwrap();
    /// assert_eq!(leave.total_days, 3);
    /// ```
    pub fn new(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_at: NaiveDateTime,
    ) -> AnalyticsResult<Self> {
        let id = id.into();
        if end_date < start_date {
            return Err(AnalyticsError::InvalidRecord {
                record: id,
                message: format!("end date {} is before start date {}", end_date, start_date),
            });
        }
        let total_days = (end_date - start_date).num_days() + 1;
        Ok(Self {
            id,
            employee_id: employee_id.into(),
            leave_type,
            start_date,
            end_date,
            total_days: u32::try_from(total_days).unwrap_or(u32::MAX),
            status: LeaveStatus::Pending,
            reason: String::new(),
            approved_by: None,
            approved_at: None,
            created_at,
        })
    }

    /// Returns the request marked as approved.
    pub fn approved(mut self, by: impl Into<String>, at: NaiveDateTime) -> Self {
        self.status = LeaveStatus::Approved;
        self.approved_by = Some(by.into());
        self.approved_at = Some(at);
        self
    }

    /// Returns the request marked as rejected.
    pub fn rejected(mut self) -> Self {
        self.status = LeaveStatus::Rejected;
        self
    }

    /// Returns true if the request has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Checks whether the leave covers a date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks the structural invariant `end_date >= start_date`.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.end_date < self.start_date {
            return Err(AnalyticsError::InvalidRecord {
                record: self.id.clone(),
                message: format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            });
        }
        Ok(())
    }
}

/// Yearly leave entitlement and usage for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAllocation {
    /// The employee this allocation belongs to.
    pub employee_id: String,
    /// The allocation year.
    pub year: i32,
    /// Paid leave days granted.
    pub paid_leave_total: i32,
    /// Paid leave days consumed.
    pub paid_leave_used: i32,
    /// Sick leave days granted.
    pub sick_leave_total: i32,
    /// Sick leave days consumed.
    pub sick_leave_used: i32,
}

impl LeaveAllocation {
    /// Remaining paid leave. May be negative if usage was over-recorded upstream.
    pub fn paid_leave_available(&self) -> i32 {
        self.paid_leave_total - self.paid_leave_used
    }

    /// Remaining sick leave. May be negative if usage was over-recorded upstream.
    pub fn sick_leave_available(&self) -> i32 {
        self.sick_leave_total - self.sick_leave_used
    }
}
