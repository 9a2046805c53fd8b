//! `ledgerfab calendar` command - Write the date dimension on its own.

use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;
use ledgerfab::calendar::{FiscalCalendar, FiscalYearStart};
use ledgerfab::sink::CsvSink;

use super::print_tables;
use crate::error::{CliError, CliResult};

/// Execute the `calendar` command.
pub fn execute(
    start: NaiveDate,
    end: NaiveDate,
    fiscal_start: u32,
    business_days: bool,
    output: &Path,
) -> CliResult<()> {
    let fiscal_start = FiscalYearStart::from_month(fiscal_start).ok_or_else(|| {
        CliError::Config(format!(
            "fiscal year must start in month 1, 4 or 10, got {fiscal_start}"
        ))
    })?;
    let calendar = FiscalCalendar::build(start, end, fiscal_start, business_days)?;
    let days = calendar.into_days();

    let written = CsvSink::new(output).write(&days)?;
    match written {
        Some(table) => print_tables(&[table]),
        None => println!("{} No days in range", "!".yellow()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_business_days() {
        let tmp = tempfile::tempdir().unwrap();
        execute(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            4,
            true,
            tmp.path(),
        )
        .unwrap();
        let text = std::fs::read_to_string(tmp.path().join("dim_date.csv")).unwrap();
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn test_rejects_unknown_fiscal_start() {
        let tmp = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            execute(day, day, 7, false, tmp.path()),
            Err(CliError::Config(_))
        ));
    }
}
