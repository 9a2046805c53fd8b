//! CLI command implementations.

pub mod calendar;
pub mod generate;
pub mod init;
pub mod profiles;

use clap::ValueEnum;
use colored::Colorize;
use ledgerfab::config::Profile;
use ledgerfab::sink::TableSummary;

/// Profile names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Sales orders, billing, CO-PA and headcount.
    SalesPerformance,
    /// Ledger, open items and fixed assets.
    FinancialControl,
    /// Growth-adjusted ledger, open items, stock and assets.
    WorkingCapital,
    /// Goods movements, fulfillment chains and stock.
    Inventory,
    /// Plants, work centers, equipment and workforce.
    Manufacturing,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::SalesPerformance => Profile::SalesPerformance,
            ProfileArg::FinancialControl => Profile::FinancialControl,
            ProfileArg::WorkingCapital => Profile::WorkingCapital,
            ProfileArg::Inventory => Profile::Inventory,
            ProfileArg::Manufacturing => Profile::Manufacturing,
        }
    }
}

/// Print one line per written table.
pub fn print_tables(tables: &[TableSummary]) {
    let width = tables.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for table in tables {
        println!(
            "  {} {:<width$}  {} rows  {}",
            "✓".bright_green(),
            table.name,
            format!("{:>9}", table.rows).bright_white(),
            table.path.display().to_string().dimmed(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_names_match_library() {
        for arg in ProfileArg::value_variants() {
            let name = arg.to_possible_value().unwrap();
            assert_eq!(name.get_name(), Profile::from(*arg).name());
        }
    }
}
