//! CSV rendering of the period reports.
//!
//! Every export starts with its header row, even when there are no records.

use crate::calculation::PayrollLine;
use crate::error::{AnalyticsError, AnalyticsResult};

use super::{AttendanceReport, AttendanceRow, LeaveReport, LeaveRow, PayrollReport};

const TIME_FORMAT: &str = "%H:%M:%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A row type with a fixed CSV layout.
pub trait CsvRecord {
    /// Column titles, in order.
    const HEADER: &'static [&'static str];

    /// Cell values, in header order.
    fn fields(&self) -> Vec<String>;
}

impl CsvRecord for AttendanceRow {
    const HEADER: &'static [&'static str] = &[
        "Employee ID",
        "Employee Name",
        "Email",
        "Department",
        "Date",
        "Check In",
        "Check In Location",
        "Check Out",
        "Check Out Location",
        "Work Hours",
        "Extra Hours",
        "Status",
        "Notes",
    ];

    fn fields(&self) -> Vec<String> {
        let time = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format(TIME_FORMAT).to_string())
                .unwrap_or_default()
        };
        vec![
            self.employee_code.clone(),
            self.employee_name.clone(),
            self.email.clone(),
            self.department.clone(),
            self.date.to_string(),
            time(self.check_in),
            self.check_in_location.clone().unwrap_or_default(),
            time(self.check_out),
            self.check_out_location.clone().unwrap_or_default(),
            self.work_hours.to_string(),
            self.extra_hours.to_string(),
            self.status.to_string(),
            self.notes.clone(),
        ]
    }
}

impl CsvRecord for LeaveRow {
    const HEADER: &'static [&'static str] = &[
        "Employee ID",
        "Employee Name",
        "Email",
        "Department",
        "Leave Type",
        "Start Date",
        "End Date",
        "Total Days",
        "Status",
        "Reason",
        "Created At",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.employee_code.clone(),
            self.employee_name.clone(),
            self.email.clone(),
            self.department.clone(),
            self.leave_type.to_string(),
            self.start_date.to_string(),
            self.end_date.to_string(),
            self.total_days.to_string(),
            self.status.to_string(),
            self.reason.clone(),
            self.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ]
    }
}

impl CsvRecord for PayrollLine {
    const HEADER: &'static [&'static str] = &[
        "Employee ID",
        "Employee Name",
        "Email",
        "Department",
        "Job Title",
        "Present Days",
        "Half Days",
        "Leave Days",
        "Working Days",
        "Monthly Wage",
        "Gross Salary",
        "Basic Salary",
        "HRA",
        "Allowances",
        "Professional Tax",
        "PF Employee",
        "Total Deductions",
        "Net Salary",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.employee_code.clone(),
            self.employee_name.clone(),
            self.email.clone(),
            self.department.clone(),
            self.job_title.clone(),
            self.present_days.to_string(),
            self.half_days.to_string(),
            self.leave_days.to_string(),
            self.working_days.round_dp(1).to_string(),
            self.monthly_wage.round_dp(2).to_string(),
            self.gross_salary.to_string(),
            self.basic_salary.to_string(),
            self.house_rent_allowance.to_string(),
            self.allowances.to_string(),
            self.professional_tax.to_string(),
            self.pf_employee.to_string(),
            self.total_deductions.to_string(),
            self.net_salary.round_dp(2).to_string(),
        ]
    }
}

/// Renders the header row followed by one row per record.
pub fn write_csv<T: CsvRecord>(rows: &[T]) -> AnalyticsResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    let bytes = writer.into_inner().map_err(|err| AnalyticsError::Export {
        message: err.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|err| AnalyticsError::Export {
        message: err.to_string(),
    })
}

/// A rendered CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested download file name.
    pub filename: String,
    /// The CSV text.
    pub body: String,
}

/// Attendance rows, newest first.
pub fn attendance_csv(report: &AttendanceReport) -> AnalyticsResult<CsvExport> {
    Ok(CsvExport {
        filename: format!("attendance_report_{}.csv", report.window.label()),
        body: write_csv(&report.records)?,
    })
}

/// Leave requests, most recently submitted first.
pub fn leave_csv(report: &LeaveReport) -> AnalyticsResult<CsvExport> {
    Ok(CsvExport {
        filename: format!("leave_report_{}.csv", report.window.label()),
        body: write_csv(&report.requests)?,
    })
}

/// Pay lines, by employee id.
pub fn payroll_csv(report: &PayrollReport) -> AnalyticsResult<CsvExport> {
    Ok(CsvExport {
        filename: format!("payroll_report_{}.csv", report.window.label()),
        body: write_csv(&report.lines)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::models::ReportWindow;
    use crate::reports::fixtures::{make_date, repository};
    use crate::reports::{
        AttendanceReportQuery, ReportContext, attendance_report, leave_report, payroll_report,
    };
    use crate::repository::InMemoryRepository;

    #[test]
    fn test_empty_export_keeps_header() {
        let body = write_csv::<AttendanceRow>(&[]).unwrap();
        assert_eq!(
            body,
            "Employee ID,Employee Name,Email,Department,Date,Check In,Check In Location,\
             Check Out,Check Out Location,Work Hours,Extra Hours,Status,Notes\n"
        );
    }

    #[test]
    fn test_header_widths() {
        assert_eq!(AttendanceRow::HEADER.len(), 13);
        assert_eq!(LeaveRow::HEADER.len(), 11);
        assert_eq!(PayrollLine::HEADER.len(), 18);
    }

    #[test]
    fn test_attendance_export_over_empty_tenant() {
        let repo = InMemoryRepository::default();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-03-31"));
        let window = ReportWindow::month(2026, 3).unwrap();
        let report = attendance_report(&ctx, &AttendanceReportQuery::new(window)).unwrap();

        let export = attendance_csv(&report).unwrap();
        assert_eq!(export.filename, "attendance_report_2026-03.csv");
        assert_eq!(export.body.lines().count(), 1);
    }

    #[test]
    fn test_attendance_rows_render_display_values() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-03-31"));
        let window = ReportWindow::month(2026, 3).unwrap();
        let report = attendance_report(&ctx, &AttendanceReportQuery::new(window)).unwrap();
        let export = attendance_csv(&report).unwrap();

        let mut reader = csv::Reader::from_reader(export.body.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), report.records.len());

        let half_day = rows.iter().find(|r| &r[11] == "Half Day").unwrap();
        assert_eq!(&half_day[0], "OIACME002");
        assert_eq!(&half_day[3], "Engineering");

        let absent = rows.iter().find(|r| &r[11] == "Absent").unwrap();
        assert_eq!(&absent[3], "");
        assert_eq!(&absent[5], "");
    }

    #[test]
    fn test_leave_export_formats_created_at() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-12-31"));
        let report = leave_report(&ctx, ReportWindow::year(2026).unwrap()).unwrap();
        let export = leave_csv(&report).unwrap();
        assert_eq!(export.filename, "leave_report_2026.csv");

        let mut reader = csv::Reader::from_reader(export.body.as_bytes());
        let first = reader.records().next().unwrap().unwrap();
        // leave_002 was submitted last.
        assert_eq!(&first[4], "Sick Leave");
        assert_eq!(&first[8], "Pending");
        assert_eq!(&first[10], "2026-03-13 08:00:00");
    }

    #[test]
    fn test_payroll_export_rounds_working_days() {
        let repo = repository();
        let config = AnalyticsConfig::default();
        let ctx = ReportContext::new(&repo, &config, make_date("2026-04-01"));
        let report = payroll_report(&ctx, ReportWindow::month(2026, 3).unwrap()).unwrap();
        let export = payroll_csv(&report).unwrap();
        assert_eq!(export.filename, "payroll_report_2026-03.csv");

        let mut reader = csv::Reader::from_reader(export.body.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][8], "11.5");
        assert_eq!(&rows[1][10], "20909.09");
    }
}
