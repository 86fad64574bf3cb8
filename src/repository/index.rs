//! Per-employee grouping of fetched records.

use std::collections::HashMap;

use crate::models::{AttendanceRecord, LeaveRequest};

/// Attendance and leave grouped by employee id.
///
/// Built once per request so every engine folds over in-memory groups instead
/// of querying per employee. Groups keep the order they were fetched in.
///
/// # Example
///
/// ```
/// use workforce_analytics::repository::RecordIndex;
///
/// let index = RecordIndex::build(Vec::new(), Vec::new());
/// assert!(index.attendance_for("emp_001").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    attendance: HashMap<String, Vec<AttendanceRecord>>,
    leaves: HashMap<String, Vec<LeaveRequest>>,
}

impl RecordIndex {
    /// Groups records by their employee id.
    pub fn build(attendance: Vec<AttendanceRecord>, leaves: Vec<LeaveRequest>) -> Self {
        let mut index = Self::default();
        for record in attendance {
            index
                .attendance
                .entry(record.employee_id.clone())
                .or_default()
                .push(record);
        }
        for leave in leaves {
            index
                .leaves
                .entry(leave.employee_id.clone())
                .or_default()
                .push(leave);
        }
        index
    }

    /// The employee's attendance records; empty when there are none.
    pub fn attendance_for(&self, employee_id: &str) -> &[AttendanceRecord] {
        self.attendance
            .get(employee_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The employee's leave requests; empty when there are none.
    pub fn leaves_for(&self, employee_id: &str) -> &[LeaveRequest] {
        self.leaves
            .get(employee_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
