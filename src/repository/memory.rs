//! In-memory repository backed by a JSON snapshot.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::{AttendanceQuery, EmployeeFilter, LeaveQuery, RecordRepository};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{AttendanceRecord, EmployeeSummary, LeaveAllocation, LeaveRequest};

/// Every record the engine reads, as exported by the HR backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordSnapshot {
    /// Employee projections.
    pub employees: Vec<EmployeeSummary>,
    /// Attendance records.
    pub attendance: Vec<AttendanceRecord>,
    /// Leave requests.
    pub leave_requests: Vec<LeaveRequest>,
    /// Yearly leave allocations.
    pub leave_allocations: Vec<LeaveAllocation>,
}

impl RecordSnapshot {
    /// Reads a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> AnalyticsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AnalyticsError::Repository {
            message: format!("cannot read snapshot {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&content).map_err(|e| AnalyticsError::Repository {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json_str(content: &str) -> AnalyticsResult<Self> {
        serde_json::from_str(content).map_err(|e| AnalyticsError::Repository {
            message: format!("invalid snapshot: {}", e),
        })
    }
}

/// A [`RecordRepository`] holding a validated snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    employees: Vec<EmployeeSummary>,
    attendance: Vec<AttendanceRecord>,
    leave_requests: Vec<LeaveRequest>,
    leave_allocations: Vec<LeaveAllocation>,
}

impl InMemoryRepository {
    /// Builds the repository, dropping records that break the model invariants.
    ///
    /// Leave requests ending before they start and second attendance records for
    /// the same (employee, date) are skipped with a warning.
    pub fn new(snapshot: RecordSnapshot) -> Self {
        let RecordSnapshot {
            mut employees,
            attendance,
            leave_requests,
            leave_allocations,
        } = snapshot;
        employees.sort_by(|a, b| a.id.cmp(&b.id));

        let mut seen = HashSet::new();
        let mut attendance: Vec<AttendanceRecord> = attendance
            .into_iter()
            .filter(|r| {
                let fresh = seen.insert((r.employee_id.clone(), r.date));
                if !fresh {
                    let err = AnalyticsError::InvalidRecord {
                        record: format!("{}@{}", r.employee_id, r.date),
                        message: "duplicate attendance record".to_string(),
                    };
                    warn!(error = %err, "Skipping attendance record");
                }
                fresh
            })
            .collect();
        attendance.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });

        let leave_requests: Vec<LeaveRequest> = leave_requests
            .into_iter()
            .filter(|l| match l.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, "Skipping leave request");
                    false
                }
            })
            .collect();

        info!(
            employees = employees.len(),
            attendance = attendance.len(),
            leave_requests = leave_requests.len(),
            leave_allocations = leave_allocations.len(),
            "Record snapshot loaded"
        );

        Self {
            employees,
            attendance,
            leave_requests,
            leave_allocations,
        }
    }
}

impl RecordRepository for InMemoryRepository {
    fn employees(&self, filter: &EmployeeFilter) -> AnalyticsResult<Vec<EmployeeSummary>> {
        Ok(self
            .employees
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    fn attendance(&self, query: &AttendanceQuery) -> AnalyticsResult<Vec<AttendanceRecord>> {
        Ok(self
            .attendance
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }

    fn leave_requests(&self, query: &LeaveQuery) -> AnalyticsResult<Vec<LeaveRequest>> {
        Ok(self
            .leave_requests
            .iter()
            .filter(|l| query.matches(l))
            .cloned()
            .collect())
    }

    fn leave_allocations(
        &self,
        year: i32,
        employee_ids: &[String],
    ) -> AnalyticsResult<Vec<LeaveAllocation>> {
        let employee_ids: HashSet<&str> = employee_ids.iter().map(String::as_str).collect();
        Ok(self
            .leave_allocations
            .iter()
            .filter(|a| a.year == year && employee_ids.contains(a.employee_id.as_str()))
            .cloned()
            .collect())
    }
}
