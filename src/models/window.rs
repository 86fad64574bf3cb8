//! Reporting window model.
//!
//! This module contains the [`ReportWindow`] type: the inclusive date range over
//! which every metric is computed.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// An inclusive `[start_date, end_date]` range.
///
/// Windows are only constructed through validating constructors, so
/// `start_date <= end_date` always holds.
///
/// # Example
///
/// ```
/// use workforce_analytics::models::ReportWindow;
/// use chrono::NaiveDate;
///
/// let window = ReportWindow::month(2026, 2).unwrap();
/// assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
/// assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
/// assert_eq!(window.len_days(), 28);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportWindow {
    /// First day of the window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the window (inclusive).
    pub end_date: NaiveDate,
}

impl ReportWindow {
    /// Creates a window, rejecting inverted ranges.
    ///
    /// # Example
    ///
    /// ```
    /// use workforce_analytics::models::ReportWindow;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// assert!(ReportWindow::new(start, end).is_err());
    /// ```
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> AnalyticsResult<Self> {
        if end_date < start_date {
            return Err(AnalyticsError::InvalidWindow {
                message: format!(
                    "end date {} is before start date {}",
                    end_date, start_date
                ),
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Creates the window covering a whole calendar month.
    pub fn month(year: i32, month: u32) -> AnalyticsResult<Self> {
        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            AnalyticsError::InvalidWindow {
                message: format!("{}-{:02} is not a valid month", year, month),
            }
        })?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end_date = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| AnalyticsError::InvalidWindow {
                message: format!("{}-{:02} has no representable last day", year, month),
            })?;
        Self::new(start_date, end_date)
    }

    /// Creates the window covering a whole calendar year.
    pub fn year(year: i32) -> AnalyticsResult<Self> {
        let start_date =
            NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| AnalyticsError::InvalidWindow {
                message: format!("{} is not a valid year", year),
            })?;
        let end_date =
            NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| AnalyticsError::InvalidWindow {
                message: format!("{} is not a valid year", year),
            })?;
        Self::new(start_date, end_date)
    }

    /// Creates the window `[as_of - days, as_of]`.
    ///
    /// # Example
    ///
    /// ```
    /// use workforce_analytics::models::ReportWindow;
    /// use chrono::NaiveDate;
    ///
    /// let as_of = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
    /// let window = ReportWindow::lookback(as_of, 30);
    /// assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    /// assert_eq!(window.end_date, as_of);
    /// ```
    pub fn lookback(as_of: NaiveDate, days: u32) -> Self {
        let start_date = as_of
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start_date,
            end_date: as_of,
        }
    }

    /// Creates the window `[from, from + days]`.
    pub fn ahead(from: NaiveDate, days: u32) -> Self {
        let end_date = from
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start_date: from,
            end_date,
        }
    }

    /// Checks whether a date falls inside the window (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks whether an inclusive range shares at least one day with the window.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }

    /// Returns the part of an inclusive range that lies inside the window.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        if !self.overlaps(start, end) {
            return None;
        }
        Some((start.max(self.start_date), end.min(self.end_date)))
    }

    /// Number of calendar days in the window.
    pub fn len_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Rejects windows spanning more than `max_days` calendar days.
    ///
    /// # Example
    ///
    /// ```
    /// use workforce_analytics::models::ReportWindow;
    ///
    /// let year = ReportWindow::year(2024).unwrap();
    /// assert!(year.limited_to(366).is_ok());
    /// assert!(year.limited_to(365).is_err());
    /// ```
    pub fn limited_to(self, max_days: u32) -> AnalyticsResult<Self> {
        if self.len_days() > i64::from(max_days) {
            return Err(AnalyticsError::InvalidWindow {
                message: format!(
                    "{} to {} spans {} days, more than the {} allowed",
                    self.start_date,
                    self.end_date,
                    self.len_days(),
                    max_days
                ),
            });
        }
        Ok(self)
    }

    /// Iterates every date of the window in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    /// Returns the window truncated so it does not extend past `as_of`.
    ///
    /// Returns `None` when the whole window lies in the future.
    pub fn until(&self, as_of: NaiveDate) -> Option<Self> {
        if as_of < self.start_date {
            return None;
        }
        Some(Self {
            start_date: self.start_date,
            end_date: self.end_date.min(as_of),
        })
    }

    /// A short label used in export file names, e.g. `2026-02` for a month or
    /// `2026` for a calendar year.
    pub fn label(&self) -> String {
        let is_year = self.start_date.ordinal() == 1
            && self.end_date.month() == 12
            && self.end_date.day() == 31
            && self.start_date.year() == self.end_date.year();
        if is_year {
            return self.start_date.year().to_string();
        }
        let is_month = self.start_date.day() == 1
            && self
                .end_date
                .succ_opt()
                .is_some_and(|next| next.day() == 1)
            && self.start_date.month() == self.end_date.month()
            && self.start_date.year() == self.end_date.year();
        if is_month {
            format!("{}-{:02}", self.start_date.year(), self.start_date.month())
        } else {
            format!("{}_{}", self.start_date, self.end_date)
        }
    }
}
