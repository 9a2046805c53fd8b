//! Fiscal calendar construction.
//!
//! Fiscal attributes are a pure function of the date and the fiscal year
//! start month: for month `m` and start `s`, the fiscal year is the calendar
//! year when `m >= s` and the year before otherwise, the fiscal period is
//! `((m - s) mod 12) + 1` and the fiscal quarter groups periods in threes.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FabricError, FabricResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Month in which the fiscal year begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalYearStart {
    /// Fiscal year equals the calendar year.
    #[default]
    January,
    /// April to March.
    April,
    /// October to September.
    October,
}

impl FiscalYearStart {
    /// All supported start months.
    pub const ALL: [FiscalYearStart; 3] = [Self::January, Self::April, Self::October];

    /// Calendar month number (1-12) the fiscal year starts in.
    pub fn month(&self) -> u32 {
        match self {
            Self::January => 1,
            Self::April => 4,
            Self::October => 10,
        }
    }

    /// Look up a start by calendar month number.
    pub fn from_month(month: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.month() == month)
    }
}

impl fmt::Display for FiscalYearStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MONTH_NAMES[(self.month() - 1) as usize])
    }
}

/// Fiscal year of a date.
pub fn fiscal_year(date: NaiveDate, start: FiscalYearStart) -> i32 {
    if date.month() >= start.month() {
        date.year()
    } else {
        date.year() - 1
    }
}

/// First and last date of a fiscal year, or `None` when the year falls
/// outside the range `NaiveDate` can represent.
pub fn fiscal_year_bounds(
    fiscal_year: i32,
    start: FiscalYearStart,
) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(fiscal_year, start.month(), 1)?;
    let next = NaiveDate::from_ymd_opt(fiscal_year.checked_add(1)?, start.month(), 1)?;
    Some((first, next.pred_opt()?))
}

/// Fiscal period (1-12) of a calendar month.
pub fn fiscal_period(month: u32, start: FiscalYearStart) -> u32 {
    (month + 12 - start.month()) % 12 + 1
}

/// Fiscal quarter (1-4) of a fiscal period.
pub fn fiscal_quarter(period: u32) -> u32 {
    (period - 1) / 3 + 1
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

/// First business day on or after `date`.
pub fn roll_to_business_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Days::new(2),
        Weekday::Sun => date + Days::new(1),
        _ => date,
    }
}

fn first_of_month(year: i32, month: u32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(fallback)
}

/// Fiscal coordinates of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiscalPosition {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal quarter (1-4).
    pub fiscal_quarter: u32,
    /// Fiscal period (1-12).
    pub fiscal_period: u32,
}

impl FiscalPosition {
    /// Compute the fiscal position of a date.
    pub fn of(date: NaiveDate, start: FiscalYearStart) -> Self {
        let fiscal_period = fiscal_period(date.month(), start);
        Self {
            fiscal_year: fiscal_year(date, start),
            fiscal_quarter: fiscal_quarter(fiscal_period),
            fiscal_period,
        }
    }
}

/// One row of the date dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    /// The date itself.
    pub date_key: NaiveDate,
    /// Calendar year.
    pub year: i32,
    /// Calendar quarter (1-4).
    pub quarter: u32,
    /// Calendar month (1-12).
    pub month: u32,
    /// English month name.
    pub month_name: &'static str,
    /// ISO week number.
    pub week: u32,
    /// Day of week, Monday = 1.
    pub day_of_week: u32,
    /// English day name.
    pub day_name: &'static str,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal quarter (1-4).
    pub fiscal_quarter: u32,
    /// Fiscal period (1-12).
    pub fiscal_period: u32,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// Always false; no holiday calendar is modelled.
    pub is_holiday: bool,
    /// First day of the calendar month.
    pub month_start_date: NaiveDate,
    /// First day of the calendar quarter.
    pub quarter_start_date: NaiveDate,
    /// First day of the calendar year.
    pub year_start_date: NaiveDate,
}

impl CalendarDay {
    /// Annotate a single date.
    pub fn new(date: NaiveDate, start: FiscalYearStart) -> Self {
        let month = date.month();
        let quarter = (month - 1) / 3 + 1;
        let weekday = date.weekday().num_days_from_monday();
        let position = FiscalPosition::of(date, start);

        Self {
            date_key: date,
            year: date.year(),
            quarter,
            month,
            month_name: MONTH_NAMES[(month - 1) as usize],
            week: date.iso_week().week(),
            day_of_week: weekday + 1,
            day_name: DAY_NAMES[weekday as usize],
            fiscal_year: position.fiscal_year,
            fiscal_quarter: position.fiscal_quarter,
            fiscal_period: position.fiscal_period,
            is_weekend: weekday >= 5,
            is_holiday: false,
            month_start_date: first_of_month(date.year(), month, date),
            quarter_start_date: first_of_month(date.year(), (quarter - 1) * 3 + 1, date),
            year_start_date: first_of_month(date.year(), 1, date),
        }
    }

    /// Fiscal coordinates of this day.
    pub fn position(&self) -> FiscalPosition {
        FiscalPosition {
            fiscal_year: self.fiscal_year,
            fiscal_quarter: self.fiscal_quarter,
            fiscal_period: self.fiscal_period,
        }
    }

    /// First day of its calendar month.
    pub fn is_month_start(&self) -> bool {
        self.date_key == self.month_start_date
    }
}

/// Ordered sequence of annotated days.
#[derive(Debug, Clone)]
pub struct FiscalCalendar {
    fiscal_start: FiscalYearStart,
    start: NaiveDate,
    end: NaiveDate,
    days: Vec<CalendarDay>,
}

impl FiscalCalendar {
    /// Build the calendar for `start..=end`, optionally without weekends.
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        fiscal_start: FiscalYearStart,
        business_days_only: bool,
    ) -> FabricResult<Self> {
        if end < start {
            return Err(FabricError::InvalidDateRange { start, end });
        }

        let days = start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| !business_days_only || !is_weekend(*d))
            .map(|d| CalendarDay::new(d, fiscal_start))
            .collect();

        Ok(Self {
            fiscal_start,
            start,
            end,
            days,
        })
    }

    /// Configured fiscal year start.
    pub fn fiscal_start(&self) -> FiscalYearStart {
        self.fiscal_start
    }

    /// First requested date.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last requested date.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a date lies inside the requested range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// All days in ascending order.
    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// Days that are not weekends.
    pub fn business_days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days.iter().filter(|d| !d.is_weekend)
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the calendar has no days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Fiscal coordinates of any date, including dates outside the range.
    pub fn fiscal_position(&self, date: NaiveDate) -> FiscalPosition {
        FiscalPosition::of(date, self.fiscal_start)
    }

    /// Consume the calendar into its rows.
    pub fn into_days(self) -> Vec<CalendarDay> {
        self.days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_april_business_days() {
        let calendar = FiscalCalendar::build(
            date(2023, 4, 1),
            date(2023, 4, 10),
            FiscalYearStart::April,
            true,
        )
        .unwrap();

        assert_eq!(calendar.len(), 6);
        for day in calendar.days() {
            assert_eq!(day.fiscal_period, 1);
            assert_eq!(day.fiscal_year, 2023);
            assert_eq!(day.fiscal_quarter, 1);
            assert!(!day.is_weekend);
        }
        assert_eq!(calendar.days()[0].date_key, date(2023, 4, 3));
    }

    #[test]
    fn test_fiscal_year_boundaries() {
        let april = FiscalYearStart::April;
        assert_eq!(fiscal_year(date(2024, 3, 31), april), 2023);
        assert_eq!(fiscal_year(date(2024, 4, 1), april), 2024);
        assert_eq!(fiscal_period(3, april), 12);
        assert_eq!(fiscal_period(4, april), 1);

        let october = FiscalYearStart::October;
        assert_eq!(fiscal_period(10, october), 1);
        assert_eq!(fiscal_period(9, october), 12);
        assert_eq!(fiscal_year(date(2023, 9, 30), october), 2022);

        let january = FiscalYearStart::January;
        assert_eq!(fiscal_period(7, january), 7);
        assert_eq!(fiscal_quarter(fiscal_period(7, january)), 3);

        assert_eq!(
            fiscal_year_bounds(2023, april),
            Some((date(2023, 4, 1), date(2024, 3, 31)))
        );
        assert_eq!(
            fiscal_year_bounds(2024, january),
            Some((date(2024, 1, 1), date(2024, 12, 31)))
        );
    }

    #[test]
    fn test_fiscal_year_bounds_out_of_range() {
        let max_year = NaiveDate::MAX.year();
        assert_eq!(fiscal_year_bounds(max_year, FiscalYearStart::January), None);
        assert_eq!(fiscal_year_bounds(i32::MAX, FiscalYearStart::April), None);
        assert!(fiscal_year_bounds(max_year - 1, FiscalYearStart::January).is_some());
    }

    #[test]
    fn test_day_attributes() {
        let day = CalendarDay::new(date(2023, 8, 19), FiscalYearStart::April);
        assert_eq!(day.month_name, "August");
        assert_eq!(day.day_name, "Saturday");
        assert_eq!(day.day_of_week, 6);
        assert!(day.is_weekend);
        assert_eq!(day.quarter, 3);
        assert_eq!(day.quarter_start_date, date(2023, 7, 1));
        assert_eq!(day.month_start_date, date(2023, 8, 1));
        assert_eq!(day.year_start_date, date(2023, 1, 1));
        assert_eq!(day.fiscal_period, 5);
        assert_eq!(day.fiscal_quarter, 2);
        assert!(!day.is_holiday);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = FiscalCalendar::build(
            date(2024, 1, 2),
            date(2024, 1, 1),
            FiscalYearStart::January,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, FabricError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_single_day_range() {
        let calendar = FiscalCalendar::build(
            date(2024, 2, 29),
            date(2024, 2, 29),
            FiscalYearStart::January,
            false,
        )
        .unwrap();
        assert_eq!(calendar.len(), 1);
        assert!(calendar.contains(date(2024, 2, 29)));
    }

    #[test]
    fn test_roll_to_business_day() {
        assert_eq!(roll_to_business_day(date(2023, 4, 1)), date(2023, 4, 3));
        assert_eq!(roll_to_business_day(date(2023, 4, 2)), date(2023, 4, 3));
        assert_eq!(roll_to_business_day(date(2023, 4, 4)), date(2023, 4, 4));
    }

    #[test]
    fn test_fiscal_start_lookup() {
        assert_eq!(FiscalYearStart::from_month(10), Some(FiscalYearStart::October));
        assert_eq!(FiscalYearStart::from_month(7), None);
        assert_eq!(FiscalYearStart::April.to_string(), "April");
    }

    proptest! {
        #[test]
        fn prop_fiscal_fields_in_range(offset in 0u64..20_000, start_idx in 0usize..3) {
            let start = FiscalYearStart::ALL[start_idx];
            let d = date(1990, 1, 1) + Days::new(offset);
            let day = CalendarDay::new(d, start);
            prop_assert!((1..=12).contains(&day.fiscal_period));
            prop_assert!((1..=4).contains(&day.fiscal_quarter));
            prop_assert!(day.fiscal_year == d.year() || day.fiscal_year == d.year() - 1);
            prop_assert_eq!(day.clone(), CalendarDay::new(d, start));
        }

        #[test]
        fn prop_fiscal_start_month_is_period_one(year in 1990i32..2100, start_idx in 0usize..3) {
            let start = FiscalYearStart::ALL[start_idx];
            let d = date(year, start.month(), 1);
            let position = FiscalPosition::of(d, start);
            prop_assert_eq!(position.fiscal_period, 1);
            prop_assert_eq!(position.fiscal_year, year);
        }
    }
}
