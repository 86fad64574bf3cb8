//! Read-only access to the records the engines consume.
//!
//! Attendance, leave and employee records are owned by external collaborators.
//! Reports reach them only through [`RecordRepository`], fetch once per request
//! and then group the results with a [`RecordIndex`].

mod index;
mod memory;

use std::collections::HashSet;

pub use index::RecordIndex;
pub use memory::{InMemoryRepository, RecordSnapshot};

use crate::error::AnalyticsResult;
use crate::models::{
    AttendanceRecord, EmployeeSummary, LeaveAllocation, LeaveRequest, LeaveStatus, ReportWindow,
};

/// Query interface over the consumed records.
pub trait RecordRepository: Send + Sync {
    /// Employees matching the filter, ordered by id.
    fn employees(&self, filter: &EmployeeFilter) -> AnalyticsResult<Vec<EmployeeSummary>>;

    /// Attendance records matching the query, ordered by date then employee.
    fn attendance(&self, query: &AttendanceQuery) -> AnalyticsResult<Vec<AttendanceRecord>>;

    /// Leave requests matching the query.
    fn leave_requests(&self, query: &LeaveQuery) -> AnalyticsResult<Vec<LeaveRequest>>;

    /// Allocations for `year`, restricted to the given employees.
    fn leave_allocations(
        &self,
        year: i32,
        employee_ids: &[String],
    ) -> AnalyticsResult<Vec<LeaveAllocation>>;
}

/// Selects employees by tenant, department, id and activity.
///
/// # Example
///
/// ```
/// use workforce_analytics::repository::EmployeeFilter;
///
/// let filter = EmployeeFilter::active()
///     .company(Some("acme"))
///     .department(Some("Engineering"));
/// assert!(filter.active_only);
/// assert_eq!(filter.company_id.as_deref(), Some("acme"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Tenant to restrict to.
    pub company_id: Option<String>,
    /// Department to restrict to.
    pub department: Option<String>,
    /// A single employee to restrict to.
    pub employee_id: Option<String>,
    /// Skip inactive accounts.
    pub active_only: bool,
}

impl EmployeeFilter {
    /// A filter matching every active employee.
    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }

    /// Restricts to a tenant when one is given.
    pub fn company(mut self, company_id: Option<&str>) -> Self {
        self.company_id = company_id.map(str::to_string);
        self
    }

    /// Restricts to a department when one is given.
    pub fn department(mut self, department: Option<&str>) -> Self {
        self.department = department.map(str::to_string);
        self
    }

    /// Restricts to a single employee when one is given.
    pub fn employee(mut self, employee_id: Option<&str>) -> Self {
        self.employee_id = employee_id.map(str::to_string);
        self
    }

    /// Checks whether an employee passes every restriction.
    pub fn matches(&self, employee: &EmployeeSummary) -> bool {
        if self.active_only && !employee.is_active {
            return false;
        }
        if let Some(company_id) = &self.company_id {
            if employee.company_id.as_deref() != Some(company_id.as_str()) {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if employee.department() != Some(department.as_str()) {
                return false;
            }
        }
        if let Some(employee_id) = &self.employee_id {
            if &employee.id != employee_id {
                return false;
            }
        }
        true
    }
}

/// Selects attendance records by employee and date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceQuery {
    /// Employees to include; every employee when `None`.
    pub employee_ids: Option<HashSet<String>>,
    /// Dates to include; every date when `None`.
    pub window: Option<ReportWindow>,
}

impl AttendanceQuery {
    /// Records of the given employees inside a window.
    pub fn for_employees(employees: &[EmployeeSummary], window: ReportWindow) -> Self {
        Self {
            employee_ids: Some(employees.iter().map(|e| e.id.clone()).collect()),
            window: Some(window),
        }
    }

    /// Checks whether a record matches.
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(record.employee_id.as_str()))
            && self.window.is_none_or(|w| w.contains(record.date))
    }
}

/// Selects leave requests by employee, status and dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveQuery {
    /// Employees to include; every employee when `None`.
    pub employee_ids: Option<HashSet<String>>,
    /// Status to include; every status when `None`.
    pub status: Option<LeaveStatus>,
    /// Only requests whose start date lies inside this window.
    pub start_within: Option<ReportWindow>,
    /// Only requests whose date range overlaps this window.
    pub overlapping: Option<ReportWindow>,
}

impl LeaveQuery {
    /// Every request of the given employees.
    pub fn for_employees(employees: &[EmployeeSummary]) -> Self {
        Self {
            employee_ids: Some(employees.iter().map(|e| e.id.clone()).collect()),
            ..Self::default()
        }
    }

    /// Restricts to requests starting inside a window.
    pub fn starting_within(mut self, window: ReportWindow) -> Self {
        self.start_within = Some(window);
        self
    }

    /// Restricts to one status.
    pub fn with_status(mut self, status: LeaveStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Checks whether a request matches.
    pub fn matches(&self, leave: &LeaveRequest) -> bool {
        self.employee_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(leave.employee_id.as_str()))
            && self.status.is_none_or(|s| leave.status == s)
            && self.start_within.is_none_or(|w| w.contains(leave.start_date))
            && self
                .overlapping
                .is_none_or(|w| w.overlaps(leave.start_date, leave.end_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeProfile, LeaveType, Role};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_employee(id: &str, company: &str, department: Option<&str>) -> EmployeeSummary {
        EmployeeSummary {
            id: id.to_string(),
            employee_code: None,
            company_id: Some(company.to_string()),
            full_name: "Asha Rao".to_string(),
            email: "asha@acme.test".to_string(),
            role: Role::Employee,
            is_active: true,
            profile: department.map(|d| EmployeeProfile {
                department: Some(d.to_string()),
                job_title: None,
                monthly_wage: Decimal::ZERO,
                basic_salary: Decimal::ZERO,
                house_rent_allowance: Decimal::ZERO,
                standard_allowance: Decimal::ZERO,
                fixed_allowance: Decimal::ZERO,
                professional_tax: Decimal::ZERO,
                pf_employee_contribution: Decimal::ZERO,
                pf_employer_contribution: Decimal::ZERO,
            }),
        }
    }

    #[test]
    fn test_employee_filter() {
        let engineer = create_test_employee("emp_001", "acme", Some("Engineering"));
        let unplaced = create_test_employee("emp_002", "acme", None);
        let mut retired = create_test_employee("emp_003", "globex", Some("Engineering"));
        retired.is_active = false;

        let all = EmployeeFilter::default();
        assert!(all.matches(&retired));

        let active = EmployeeFilter::active();
        assert!(active.matches(&engineer));
        assert!(!active.matches(&retired));

        let acme_eng = EmployeeFilter::active()
            .company(Some("acme"))
            .department(Some("Engineering"));
        assert!(acme_eng.matches(&engineer));
        assert!(!acme_eng.matches(&unplaced));

        let one = EmployeeFilter::default().employee(Some("emp_003"));
        assert!(one.matches(&retired));
        assert!(!one.matches(&engineer));
    }

    #[test]
    fn test_employee_set_queries() {
        let employees: Vec<EmployeeSummary> = (0..500)
            .map(|i| create_test_employee(&format!("emp_{:03}", i), "acme", None))
            .collect();
        let march = ReportWindow::month(2026, 3).unwrap();
        let query = AttendanceQuery::for_employees(&employees, march);
        assert_eq!(query.employee_ids.as_ref().map(HashSet::len), Some(500));

        let record = AttendanceRecord {
            employee_id: "emp_499".to_string(),
            date: make_date("2026-03-02"),
            check_in: None,
            check_out: None,
            check_in_location: None,
            check_out_location: None,
            work_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            status: crate::models::AttendanceStatus::Absent,
            notes: String::new(),
        };
        assert!(query.matches(&record));
        let outsider = AttendanceRecord {
            employee_id: "emp_900".to_string(),
            ..record
        };
        assert!(!query.matches(&outsider));

        let leaves = LeaveQuery::for_employees(&employees[..1]);
        let created = make_date("2026-01-01").and_hms_opt(9, 0, 0).unwrap();
        let leave = LeaveRequest::new(
            "leave_001",
            "emp_000",
            LeaveType::Paid,
            make_date("2026-03-02"),
            make_date("2026-03-02"),
            created,
        )
        .unwrap();
        assert!(leaves.matches(&leave));
    }

    #[test]
    fn test_leave_query_windows() {
        let created = make_date("2026-01-01").and_hms_opt(9, 0, 0).unwrap();
        let leave = LeaveRequest::new(
            "leave_001",
            "emp_001",
            LeaveType::Sick,
            make_date("2026-02-27"),
            make_date("2026-03-03"),
            created,
        )
        .unwrap();
        let march = ReportWindow::month(2026, 3).unwrap();

        let starting = LeaveQuery::default().starting_within(march);
        assert!(!starting.matches(&leave));

        let overlapping = LeaveQuery {
            overlapping: Some(march),
            ..LeaveQuery::default()
        };
        assert!(overlapping.matches(&leave));

        let approved = LeaveQuery::default().with_status(LeaveStatus::Approved);
        assert!(!approved.matches(&leave));
    }
}
