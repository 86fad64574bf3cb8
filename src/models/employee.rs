//! Employee model and related types.
//!
//! This module defines the read-only [`EmployeeSummary`] projection used for
//! grouping, scoring and payroll, together with its optional [`EmployeeProfile`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Department label used by analytics payloads when no department is recorded.
pub const DEPARTMENT_NOT_SET: &str = "Not Set";

/// Department label used by period reports when no department is recorded.
pub const DEPARTMENT_UNKNOWN: &str = "Unknown";

/// The access role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Company administrator.
    Admin,
    /// HR officer.
    Hr,
    /// Regular employee.
    Employee,
}

/// Employment profile: organisational placement and salary structure.
///
/// All amounts are monthly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// The department the employee belongs to.
    #[serde(default)]
    pub department: Option<String>,
    /// The employee's job title.
    #[serde(default)]
    pub job_title: Option<String>,
    /// Monthly wage (gross).
    #[serde(default)]
    pub monthly_wage: Decimal,
    /// Basic salary component.
    #[serde(default)]
    pub basic_salary: Decimal,
    /// House rent allowance component.
    #[serde(default)]
    pub house_rent_allowance: Decimal,
    /// Standard allowance component.
    #[serde(default)]
    pub standard_allowance: Decimal,
    /// Fixed allowance component.
    #[serde(default)]
    pub fixed_allowance: Decimal,
    /// Professional tax deducted each month.
    #[serde(default)]
    pub professional_tax: Decimal,
    /// Provident fund contribution deducted from the employee.
    #[serde(default)]
    pub pf_employee_contribution: Decimal,
    /// Provident fund contribution paid by the employer.
    #[serde(default)]
    pub pf_employer_contribution: Decimal,
}

impl EmployeeProfile {
    /// Standard plus fixed allowance.
    pub fn allowances(&self) -> Decimal {
        self.standard_allowance + self.fixed_allowance
    }

    /// Professional tax plus the employee PF contribution.
    pub fn deductions(&self) -> Decimal {
        self.professional_tax + self.pf_employee_contribution
    }
}

/// Read-only projection of an employee used across the engine.
///
/// # Example
///
/// ```
/// use workforce_analytics::models::{EmployeeSummary, Role, DEPARTMENT_NOT_SET};
///
/// let employee = EmployeeSummary {
///     id: "emp_001".to_string(),
///     employee_code: None,
///     company_id: Some("acme".to_string()),
///     full_name: "Asha Rao".to_string(),
///     email: "asha@acme.test".to_string(),
///     role: Role::Employee,
///     is_active: true,
///     profile: None,
/// };
/// assert_eq!(employee.department_or(DEPARTMENT_NOT_SET), "Not Set");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Unique identifier of the employee.
    pub id: String,
    /// Human-facing employee code (e.g. `OIACASRA20260001`).
    #[serde(default)]
    pub employee_code: Option<String>,
    /// The tenant (company) the employee belongs to.
    #[serde(default)]
    pub company_id: Option<String>,
    /// Full display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Access role.
    pub role: Role,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Employment profile, absent for accounts that were never onboarded.
    #[serde(default)]
    pub profile: Option<EmployeeProfile>,
}

fn default_active() -> bool {
    true
}

impl EmployeeSummary {
    /// Returns the recorded department, or `sentinel` when there is none.
    pub fn department_or<'a>(&'a self, sentinel: &'a str) -> &'a str {
        self.profile
            .as_ref()
            .and_then(|p| p.department.as_deref())
            .filter(|d| !d.is_empty())
            .unwrap_or(sentinel)
    }

    /// Returns the recorded department, if any.
    pub fn department(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.department.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Returns the employee code, falling back to the internal id.
    pub fn display_code(&self) -> &str {
        self.employee_code.as_deref().unwrap_or(&self.id)
    }

    /// Returns the monthly wage, or zero when there is no profile.
    pub fn monthly_wage(&self) -> Decimal {
        self.profile
            .as_ref()
            .map(|p| p.monthly_wage)
            .unwrap_or(Decimal::ZERO)
    }
}
