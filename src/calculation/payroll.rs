//! Per-employee payroll for a month.
//!
//! Pay is prorated from the monthly wage over a fixed-length payroll month;
//! the calendar is not consulted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollPolicy;
use crate::models::{
    AttendanceRecord, AttendanceStatus, DEPARTMENT_UNKNOWN, EmployeeProfile, EmployeeSummary,
    ReportWindow,
};

/// Salary components scaled by the share of the payroll month worked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProratedComponents {
    /// Basic salary earned.
    pub basic_salary: Decimal,
    /// House rent allowance earned.
    pub house_rent_allowance: Decimal,
    /// Standard plus fixed allowance earned.
    pub allowances: Decimal,
}

/// One employee's pay for one month.
///
/// Monetary amounts are rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// Employee id.
    pub employee_id: String,
    /// Employee code shown on exports; falls back to the id.
    pub employee_code: String,
    /// Full name.
    pub employee_name: String,
    /// Email address.
    pub email: String,
    /// Department or the report sentinel.
    pub department: String,
    /// Job title, empty when unset.
    pub job_title: String,
    /// PRESENT records in the month.
    pub present_days: u32,
    /// HALF_DAY records in the month.
    pub half_days: u32,
    /// LEAVE records in the month.
    pub leave_days: u32,
    /// Paid days: present + weighted half days + leave.
    pub working_days: Decimal,
    /// Contracted monthly wage.
    pub monthly_wage: Decimal,
    /// Monthly wage divided by the payroll month length.
    pub per_day_wage: Decimal,
    /// Per-day wage times working days.
    pub gross_salary: Decimal,
    /// Contracted basic salary.
    pub basic_salary: Decimal,
    /// Contracted house rent allowance.
    pub house_rent_allowance: Decimal,
    /// Contracted standard plus fixed allowance.
    pub allowances: Decimal,
    /// Components prorated by working days.
    pub prorated: ProratedComponents,
    /// Professional tax deducted.
    pub professional_tax: Decimal,
    /// Employee provident fund contribution deducted.
    pub pf_employee: Decimal,
    /// Employer provident fund contribution.
    pub pf_employer: Decimal,
    /// Professional tax plus employee PF.
    pub total_deductions: Decimal,
    /// Gross minus deductions.
    pub net_salary: Decimal,
    /// Gross plus employer PF.
    pub employer_cost: Decimal,
}

/// Computes an employee's payroll line from their attendance in `month`.
///
/// Records outside the month are ignored.
///
/// # Example
///
/// ```
/// use workforce_analytics::calculation::compute_payroll_line;
/// use workforce_analytics::config::PayrollPolicy;
/// use workforce_analytics::models::{EmployeeProfile, EmployeeSummary, ReportWindow, Role};
/// use rust_decimal::Decimal;
///
/// let profile = EmployeeProfile {
///     department: Some("Engineering".to_string()),
///     job_title: None,
///     monthly_wage: Decimal::from(44_000),
///     basic_salary: Decimal::ZERO,
///     house_rent_allowance: Decimal::ZERO,
///     standard_allowance: Decimal::ZERO,
///     fixed_allowance: Decimal::ZERO,
///     professional_tax: Decimal::from(200),
///     pf_employee_contribution: Decimal::ZERO,
///     pf_employer_contribution: Decimal::ZERO,
/// };
/// let employee = EmployeeSummary {
///     id: "emp_001".to_string(),
///     employee_code: None,
///     company_id: None,
///     full_name: "Asha Rao".to_string(),
///     email: "asha@acme.test".to_string(),
///     role: Role::Employee,
///     is_active: true,
///     profile: Some(profile.clone()),
/// };
/// let month = ReportWindow::month(2026, 3).unwrap();
/// let line = compute_payroll_line(&employee, &profile, &[], &month, &PayrollPolicy::default());
/// assert_eq!(line.per_day_wage, Decimal::from(2_000));
/// assert_eq!(line.gross_salary, Decimal::ZERO);
/// assert_eq!(line.net_salary, Decimal::from(-200));
/// ```
pub fn compute_payroll_line(
    employee: &EmployeeSummary,
    profile: &EmployeeProfile,
    records: &[AttendanceRecord],
    month: &ReportWindow,
    policy: &PayrollPolicy,
) -> PayrollLine {
    let count = |status: AttendanceStatus| {
        records
            .iter()
            .filter(|r| month.contains(r.date) && r.status == status)
            .count() as u32
    };
    let present_days = count(AttendanceStatus::Present);
    let half_days = count(AttendanceStatus::HalfDay);
    let leave_days = count(AttendanceStatus::Leave);

    let working_days = Decimal::from(present_days)
        + Decimal::from(half_days) * policy.half_day_weight
        + Decimal::from(leave_days);
    let share = working_days / policy.working_days_per_month;

    let per_day_wage = profile.monthly_wage / policy.working_days_per_month;
    let gross_salary = (per_day_wage * working_days).round_dp(2);
    let total_deductions = profile.deductions();

    PayrollLine {
        employee_id: employee.id.clone(),
        employee_code: employee.display_code().to_string(),
        employee_name: employee.full_name.clone(),
        email: employee.email.clone(),
        department: employee.department_or(DEPARTMENT_UNKNOWN).to_string(),
        job_title: profile.job_title.clone().unwrap_or_default(),
        present_days,
        half_days,
        leave_days,
        working_days,
        monthly_wage: profile.monthly_wage,
        per_day_wage: per_day_wage.round_dp(2),
        gross_salary,
        basic_salary: profile.basic_salary,
        house_rent_allowance: profile.house_rent_allowance,
        allowances: profile.allowances(),
        prorated: ProratedComponents {
            basic_salary: (profile.basic_salary * share).round_dp(2),
            house_rent_allowance: (profile.house_rent_allowance * share).round_dp(2),
            allowances: (profile.allowances() * share).round_dp(2),
        },
        professional_tax: profile.professional_tax,
        pf_employee: profile.pf_employee_contribution,
        pf_employer: profile.pf_employer_contribution,
        total_deductions,
        net_salary: gross_salary - total_deductions,
        employer_cost: gross_salary + profile.pf_employer_contribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn profile() -> EmployeeProfile {
        EmployeeProfile {
            department: None,
            job_title: Some("Engineer".to_string()),
            monthly_wage: dec("44000"),
            basic_salary: dec("22000"),
            house_rent_allowance: dec("11000"),
            standard_allowance: dec("4000"),
            fixed_allowance: dec("2000"),
            professional_tax: dec("200"),
            pf_employee_contribution: dec("2640"),
            pf_employer_contribution: dec("2640"),
        }
    }

    fn create_test_employee() -> EmployeeSummary {
        EmployeeSummary {
            id: "emp_001".to_string(),
            employee_code: Some("OIACASRA20260001".to_string()),
            company_id: None,
            full_name: "Asha Rao".to_string(),
            email: "asha@acme.test".to_string(),
            role: Role::Employee,
            is_active: true,
            profile: Some(profile()),
        }
    }

    fn record(date: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "emp_001".to_string(),
            date: make_date(date),
            check_in: None,
            check_out: None,
            check_in_location: None,
            check_out_location: None,
            work_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            status,
            notes: String::new(),
        }
    }

    #[test]
    fn test_payroll_line_for_partial_month() {
        let month = ReportWindow::month(2026, 3).unwrap();
        let mut records: Vec<AttendanceRecord> = (2..=19)
            .map(|day| record(&format!("2026-03-{:02}", day), AttendanceStatus::Present))
            .collect();
        records.push(record("2026-03-20", AttendanceStatus::HalfDay));
        records.push(record("2026-03-23", AttendanceStatus::HalfDay));
        records.push(record("2026-03-24", AttendanceStatus::Leave));
        records.push(record("2026-03-25", AttendanceStatus::Absent));
        // Outside the month.
        records.push(record("2026-04-01", AttendanceStatus::Present));

        let line = compute_payroll_line(
            &create_test_employee(),
            &profile(),
            &records,
            &month,
            &PayrollPolicy::default(),
        );
        assert_eq!(line.present_days, 18);
        assert_eq!(line.half_days, 2);
        assert_eq!(line.leave_days, 1);
        assert_eq!(line.working_days, dec("20"));
        assert_eq!(line.per_day_wage, dec("2000"));
        assert_eq!(line.gross_salary, dec("40000"));
        assert_eq!(line.total_deductions, dec("2840"));
        assert_eq!(line.net_salary, dec("37160"));
        assert_eq!(line.employer_cost, dec("42640"));
        assert_eq!(line.prorated.basic_salary, dec("20000"));
        assert_eq!(line.prorated.house_rent_allowance, dec("10000"));
        assert_eq!(line.prorated.allowances, dec("5454.55"));
        assert_eq!(line.allowances, dec("6000"));
        assert_eq!(line.department, "Unknown");
        assert_eq!(line.employee_code, "OIACASRA20260001");
    }

    #[test]
    fn test_gross_is_rounded_to_cents() {
        let month = ReportWindow::month(2026, 3).unwrap();
        let mut p = profile();
        p.monthly_wage = dec("50000");
        let records = vec![record("2026-03-02", AttendanceStatus::Present)];
        let line = compute_payroll_line(
            &create_test_employee(),
            &p,
            &records,
            &month,
            &PayrollPolicy::default(),
        );
        // 50000 / 22 = 2272.7272...
        assert_eq!(line.per_day_wage, dec("2272.73"));
        assert_eq!(line.gross_salary, dec("2272.73"));
    }

    #[test]
    fn test_no_attendance_earns_nothing() {
        let month = ReportWindow::month(2026, 3).unwrap();
        let records = vec![
            record("2026-03-02", AttendanceStatus::Absent),
            record("2026-02-27", AttendanceStatus::Present),
        ];
        let line = compute_payroll_line(
            &create_test_employee(),
            &profile(),
            &records,
            &month,
            &PayrollPolicy::default(),
        );
        assert_eq!(line.working_days, Decimal::ZERO);
        assert_eq!(line.gross_salary, Decimal::ZERO);
        assert_eq!(line.prorated.basic_salary, Decimal::ZERO);
        // Deductions still apply in full.
        assert_eq!(line.net_salary, dec("-2840"));
        assert_eq!(line.employer_cost, dec("2640"));
    }
}
