//! Headline figures of a generated dataset.

use chrono::NaiveDate;

use crate::config::Profile;
use crate::dataset::Dataset;
use crate::models::{OpenItem, Partner};

/// Seed, range, row counts and key ratios of a dataset.
///
/// Ratios are `None` when the tables they derive from are empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    /// Seed the run used.
    pub seed: u64,
    /// Source profile.
    pub profile: Option<Profile>,
    /// First and last date.
    pub range: (NaiveDate, NaiveDate),
    /// Rows per table.
    pub table_counts: Vec<(&'static str, usize)>,
    /// Billed net revenue.
    pub revenue: Option<f64>,
    /// Billed cost of goods.
    pub cogs: Option<f64>,
    /// (revenue - COGS) / revenue.
    pub gross_margin: Option<f64>,
    /// Delivered over ordered quantity.
    pub fill_rate: Option<f64>,
    /// Share of order items with an outstanding quantity.
    pub backorder_rate: Option<f64>,
    /// Share of customer invoices still open.
    pub receivable_open_ratio: Option<f64>,
    /// Share of vendor invoices still open.
    pub payable_open_ratio: Option<f64>,
    /// Issued quantity over average unrestricted stock.
    pub inventory_turnover: Option<f64>,
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}

fn open_ratio<P: Partner>(rows: &[OpenItem<P>]) -> Option<f64> {
    let invoices = rows.iter().filter(|r| r.is_invoice());
    let (open, total) = invoices.fold((0usize, 0usize), |(open, total), r| {
        (open + usize::from(r.is_open()), total + 1)
    });
    ratio(open as f64, total as f64)
}

impl DatasetSummary {
    /// Compute the summary of a dataset.
    pub fn of(dataset: &Dataset) -> Self {
        let billing = &dataset.sales.billing_documents;
        let (revenue, cogs) = if billing.is_empty() {
            (None, None)
        } else {
            (
                Some(billing.iter().map(|b| b.net_value).sum::<f64>()),
                Some(billing.iter().map(|b| b.cost_of_goods).sum::<f64>()),
            )
        };
        let gross_margin = revenue
            .zip(cogs)
            .and_then(|(revenue, cogs)| ratio(revenue - cogs, revenue));

        let items = &dataset.fulfillment.order_items;
        let deliveries = &dataset.fulfillment.deliveries;
        let ordered: f64 = items.iter().map(|i| f64::from(i.order_quantity)).sum();
        let delivered: f64 = deliveries
            .iter()
            .map(|d| f64::from(d.delivery_quantity))
            .sum();
        let backordered = items
            .iter()
            .filter(|i| i.delivery_status.has_backorder())
            .count();

        let issued: f64 = dataset
            .material_movements
            .iter()
            .filter(|m| m.quantity < 0)
            .map(|m| m.quantity.unsigned_abs() as f64)
            .sum();
        let opening_stock: f64 = dataset
            .reference
            .storage_stock
            .iter()
            .map(|s| s.unrestricted_stock)
            .sum();
        let closing_stock: f64 = dataset
            .stock_snapshot
            .iter()
            .map(|s| s.unrestricted_stock)
            .sum();
        let inventory_turnover = if dataset.material_movements.is_empty() {
            None
        } else {
            ratio(issued, (opening_stock + closing_stock) / 2.0)
        };

        Self {
            seed: dataset.seed,
            profile: dataset.profile,
            range: dataset.range,
            table_counts: dataset.table_counts(),
            revenue,
            cogs,
            gross_margin,
            fill_rate: ratio(delivered, ordered),
            backorder_rate: ratio(backordered as f64, items.len() as f64),
            receivable_open_ratio: open_ratio(&dataset.receivables),
            payable_open_ratio: open_ratio(&dataset.payables),
            inventory_turnover,
        }
    }

    /// Named ratios that could be computed, in display order.
    pub fn kpis(&self) -> Vec<(&'static str, f64)> {
        [
            ("revenue", self.revenue),
            ("cogs", self.cogs),
            ("gross_margin", self.gross_margin),
            ("fill_rate", self.fill_rate),
            ("backorder_rate", self.backorder_rate),
            ("receivable_open_ratio", self.receivable_open_ratio),
            ("payable_open_ratio", self.payable_open_ratio),
            ("inventory_turnover", self.inventory_turnover),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// Total rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.table_counts.iter().map(|(_, rows)| rows).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(1.0, 4.0), Some(0.25));
    }
}
