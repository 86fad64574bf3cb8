//! Monthly payroll report.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ReportContext, ReportStamp};
use crate::calculation::{PayrollLine, compute_payroll_line};
use crate::error::AnalyticsResult;
use crate::models::ReportWindow;
use crate::repository::{AttendanceQuery, RecordIndex};

/// Totals over every processed employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Sum of gross salaries.
    pub total_payout: Decimal,
    /// Mean gross salary; zero when nobody was processed.
    pub avg_salary: Decimal,
    /// Employees with a pay line.
    pub processed_count: usize,
    /// Active employees skipped for lack of a profile.
    pub skipped_count: usize,
    /// Sum of gross plus employer PF.
    pub total_employer_cost: Decimal,
}

/// Where the payout went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollDistribution {
    /// Prorated basic salary.
    pub basic_salary: Decimal,
    /// Prorated house rent allowance.
    pub hra: Decimal,
    /// Prorated allowances.
    pub allowances: Decimal,
    /// Professional tax plus employee PF.
    pub deductions: Decimal,
}

/// Gross payout of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPayroll {
    /// Sum of gross salaries.
    pub total: Decimal,
    /// Employees paid.
    pub count: usize,
}

/// Pay for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollReport {
    /// Report identity.
    #[serde(flatten)]
    pub stamp: ReportStamp,
    /// The month paid.
    pub window: ReportWindow,
    /// Totals.
    pub summary: PayrollSummary,
    /// Component totals.
    pub distribution: PayrollDistribution,
    /// Per-department gross.
    pub department_payroll: BTreeMap<String, DepartmentPayroll>,
    /// One line per processed employee, ordered by employee id.
    pub lines: Vec<PayrollLine>,
}

/// Compiles payroll for every active employee with a profile.
///
/// Employees without a profile cannot be paid and are skipped with a warning.
pub fn payroll_report(ctx: &ReportContext<'_>, month: ReportWindow) -> AnalyticsResult<PayrollReport> {
    let policy = ctx.config().payroll();
    let repository = ctx.repository();
    let employees = ctx.active_employees()?;
    let records = repository.attendance(&AttendanceQuery::for_employees(&employees, month))?;
    let index = RecordIndex::build(records, Vec::new());

    let mut lines = Vec::with_capacity(employees.len());
    let mut skipped_count = 0;
    for employee in &employees {
        let Some(profile) = &employee.profile else {
            warn!(employee_id = %employee.id, "Skipping payroll for employee without profile");
            skipped_count += 1;
            continue;
        };
        lines.push(compute_payroll_line(
            employee,
            profile,
            index.attendance_for(&employee.id),
            &month,
            policy,
        ));
    }

    let mut department_payroll: BTreeMap<String, DepartmentPayroll> = BTreeMap::new();
    let mut total_payout = Decimal::ZERO;
    let mut total_employer_cost = Decimal::ZERO;
    let mut basic_salary = Decimal::ZERO;
    let mut hra = Decimal::ZERO;
    let mut allowances = Decimal::ZERO;
    let mut deductions = Decimal::ZERO;
    for line in &lines {
        total_payout += line.gross_salary;
        total_employer_cost += line.employer_cost;
        basic_salary += line.prorated.basic_salary;
        hra += line.prorated.house_rent_allowance;
        allowances += line.prorated.allowances;
        deductions += line.total_deductions;
        let department = department_payroll
            .entry(line.department.clone())
            .or_insert(DepartmentPayroll {
                total: Decimal::ZERO,
                count: 0,
            });
        department.total += line.gross_salary;
        department.count += 1;
    }

    let avg_salary = if lines.is_empty() {
        Decimal::ZERO
    } else {
        (total_payout / Decimal::from(lines.len())).round_dp(2)
    };
    debug!(
        processed = lines.len(),
        skipped = skipped_count,
        total_payout = %total_payout,
        month = %month.label(),
        "Compiled payroll"
    );

    Ok(PayrollReport {
        stamp: ctx.stamp(),
        window: month,
        summary: PayrollSummary {
            total_payout: total_payout.round_dp(2),
            avg_salary,
            processed_count: lines.len(),
            skipped_count,
            total_employer_cost: total_employer_cost.round_dp(2),
        },
        distribution: PayrollDistribution {
            basic_salary: basic_salary.round_dp(2),
            hra: hra.round_dp(2),
            allowances: allowances.round_dp(2),
            deductions: deductions.round_dp(2),
        },
        department_payroll,
        lines,
    })
}
