//! Attendance record model.
//!
//! This module defines the [`AttendanceRecord`] struct and [`AttendanceStatus`] enum
//! produced by the check-in/check-out collaborator and consumed read-only here.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::work_duration_hours;

/// Attendance status recorded for an employee on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// The employee checked in.
    Present,
    /// The employee was absent.
    Absent,
    /// The employee worked half a day.
    HalfDay,
    /// The day was covered by leave.
    Leave,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::HalfDay => write!(f, "Half Day"),
            AttendanceStatus::Leave => write!(f, "Leave"),
        }
    }
}

/// One employee's attendance on one date.
///
/// At most one record exists per (employee, date).
///
/// # Example
///
/// ```
/// use workforce_analytics::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     check_in: NaiveTime::from_hms_opt(22, 0, 0),
///     check_out: NaiveTime::from_hms_opt(6, 0, 0),
///     check_in_location: None,
///     check_out_location: None,
///     work_hours: Decimal::new(8, 0),
///     extra_hours: Decimal::ZERO,
///     status: AttendanceStatus::Present,
///     notes: String::new(),
/// };
/// assert_eq!(record.worked_hours(), Some(Decimal::new(8, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// Check-in time, if the employee checked in.
    #[serde(default)]
    pub check_in: Option<NaiveTime>,
    /// Check-out time, if the employee checked out.
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
    /// Human readable check-in location.
    #[serde(default)]
    pub check_in_location: Option<String>,
    /// Human readable check-out location.
    #[serde(default)]
    pub check_out_location: Option<String>,
    /// Hours credited to the standard day (capped at 8).
    #[serde(default)]
    pub work_hours: Decimal,
    /// Hours beyond the standard day.
    #[serde(default)]
    pub extra_hours: Decimal,
    /// The attendance status.
    pub status: AttendanceStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl AttendanceRecord {
    /// Returns true if the employee checked in on this date.
    pub fn is_present(&self) -> bool {
        self.check_in.is_some()
    }

    /// Returns true if both check-in and check-out were recorded.
    pub fn is_complete(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }

    /// Elapsed hours between check-in and check-out, wrapping past midnight.
    ///
    /// Returns `None` for incomplete records.
    pub fn worked_hours(&self) -> Option<Decimal> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some(work_duration_hours(check_in, check_out)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(check_in: Option<&str>, check_out: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            check_in: check_in.map(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").unwrap()),
            check_out: check_out.map(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").unwrap()),
            check_in_location: None,
            check_out_location: None,
            work_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            status: AttendanceStatus::Present,
            notes: String::new(),
        }
    }

    #[test]
    fn test_worked_hours_same_day() {
        let r = record(Some("09:00:00"), Some("17:30:00"));
        assert_eq!(r.worked_hours(), Some(Decimal::new(85, 1)));
        assert!(r.is_complete());
    }

    #[test]
    fn test_worked_hours_overnight() {
        let r = record(Some("22:00:00"), Some("06:00:00"));
        assert_eq!(r.worked_hours(), Some(Decimal::new(8, 0)));
    }

    #[test]
    fn test_incomplete_record_has_no_hours() {
        let r = record(Some("09:00:00"), None);
        assert!(r.is_present());
        assert!(!r.is_complete());
        assert_eq!(r.worked_hours(), None);

        let absent = record(None, None);
        assert!(!absent.is_present());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"HALF_DAY\""
        );
        let status: AttendanceStatus = serde_json::from_str("\"PRESENT\"").unwrap();
        assert_eq!(status, AttendanceStatus::Present);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "Half Day");
        assert_eq!(AttendanceStatus::Leave.to_string(), "Leave");
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{
            "employee_id": "emp_002",
            "date": "2026-01-16",
            "check_in": "08:55:00",
            "status": "PRESENT"
        }"#;
        let r: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.check_out, None);
        assert_eq!(r.work_hours, Decimal::ZERO);
        assert!(r.notes.is_empty());
    }
}
