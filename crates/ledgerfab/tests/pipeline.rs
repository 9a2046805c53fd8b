//! End-to-end tests of the generation pipeline.

use std::collections::{HashMap, HashSet};

use approx::assert_abs_diff_eq;
use ledgerfab::models::{DeliveryStatus, MovementType, OpenItem, Partner};
use ledgerfab::prelude::*;

fn run(profile: Profile, scale: f64, seed: u64) -> Dataset {
    let config = FabricConfig::for_profile(profile)
        .scaled(scale)
        .with_seed(Some(seed));
    DataFabricPipeline::new(config)
        .expect("valid preset")
        .run()
        .expect("pipeline run")
}

#[test]
fn test_every_profile_generates_a_valid_dataset() {
    for profile in Profile::ALL {
        let dataset = run(profile, 0.02, 11);
        dataset.validate().expect("foreign keys resolve");
        assert_eq!(dataset.profile, Some(profile));
        assert!(!dataset.calendar.is_empty(), "{}", profile.name());
        assert!(!dataset.reference.companies.is_empty());
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let a = run(Profile::WorkingCapital, 0.02, 99);
    let b = run(Profile::WorkingCapital, 0.02, 99);
    assert_eq!(a.reference.customers, b.reference.customers);
    assert_eq!(a.reference.assets, b.reference.assets);
    assert_eq!(a.gl_line_items, b.gl_line_items);
    assert_eq!(a.receivables, b.receivables);
    assert_eq!(a.payables, b.payables);
    assert_eq!(a.material_movements, b.material_movements);
    assert_eq!(a.asset_values, b.asset_values);

    let c = run(Profile::WorkingCapital, 0.02, 100);
    assert_ne!(a.gl_line_items, c.gl_line_items);
}

#[test]
fn test_ledger_documents_balance() {
    let dataset = run(Profile::FinancialControl, 0.02, 5);
    assert!(!dataset.gl_line_items.is_empty());

    let mut totals: HashMap<&str, (f64, f64)> = HashMap::new();
    for line in &dataset.gl_line_items {
        let total = totals.entry(line.document_number.as_str()).or_default();
        total.0 += line.amount_local;
        total.1 += line.amount_group;
    }
    assert_eq!(totals.len(), dataset.document_headers.len());
    for (local, group) in totals.values() {
        assert_abs_diff_eq!(*local, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(*group, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_opening_balances_precede_the_range() {
    let dataset = run(Profile::FinancialControl, 0.02, 6);
    let (start, _) = dataset.range;
    let opening: Vec<_> = dataset
        .document_headers
        .iter()
        .filter(|h| h.posting_date < start)
        .collect();
    assert!(!opening.is_empty());
    assert!(opening
        .iter()
        .all(|h| h.posting_date == start.pred_opt().unwrap()));
}

fn assert_clearing_pairs<P: Partner>(rows: &[OpenItem<P>]) {
    let cleared_invoices = rows
        .iter()
        .filter(|r| r.is_invoice() && !r.is_open())
        .count();
    let payments = rows.iter().filter(|r| !r.is_invoice()).count();
    assert_eq!(cleared_invoices, payments);

    let by_number: HashMap<&str, &OpenItem<P>> = rows
        .iter()
        .map(|r| (r.document_number.as_str(), r))
        .collect();
    for invoice in rows.iter().filter(|r| r.is_invoice() && !r.is_open()) {
        let payment = by_number[invoice.clearing_document.as_deref().unwrap()];
        assert_eq!(
            payment.clearing_document.as_deref(),
            Some(invoice.document_number.as_str())
        );
        assert_eq!(payment.clearing_date, invoice.clearing_date);
        assert!(invoice.clearing_date.unwrap() > invoice.posting_date);
        assert_abs_diff_eq!(
            payment.amount_in_doc_currency,
            -invoice.amount_in_doc_currency,
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_open_items_clear_in_pairs() {
    let dataset = run(Profile::WorkingCapital, 0.02, 8);
    assert!(!dataset.receivables.is_empty());
    assert!(!dataset.payables.is_empty());
    assert_clearing_pairs(&dataset.receivables);
    assert_clearing_pairs(&dataset.payables);
}

#[test]
fn test_billing_is_consistent_with_orders() {
    let dataset = run(Profile::SalesPerformance, 0.05, 21);
    let sales = &dataset.sales;
    let (_, end) = dataset.range;
    assert_eq!(sales.billing_documents.len(), sales.copa_items.len());

    let orders: HashMap<&str, _> = sales
        .sales_orders
        .iter()
        .map(|o| (o.sales_order_id.as_str(), o))
        .collect();
    for billing in &sales.billing_documents {
        let order = orders[billing.sales_order_id.as_str()];
        assert!(billing.billing_date >= order.order_date);
        assert!(billing.billing_date <= end);
        assert_abs_diff_eq!(billing.net_value, order.net_value, epsilon = 1e-9);
        assert_abs_diff_eq!(
            billing.gross_value,
            billing.net_value + billing.tax_amount,
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_fulfillment_and_stock() {
    let dataset = run(Profile::Inventory, 0.1, 3);
    let fulfillment = &dataset.fulfillment;
    assert!(!fulfillment.order_items.is_empty());
    assert_eq!(fulfillment.order_items.len(), fulfillment.deliveries.len());

    for (item, delivery) in fulfillment.order_items.iter().zip(&fulfillment.deliveries) {
        assert!(delivery.delivery_quantity <= item.order_quantity);
        if item.delivery_status == DeliveryStatus::Complete {
            assert_eq!(delivery.delivery_quantity, item.order_quantity);
        }
    }

    // Weekends are dropped from a business-day calendar.
    assert!(dataset.calendar.iter().all(|d| !d.is_weekend));

    // Every located movement lands in the snapshot.
    let snapshot_total: f64 = dataset
        .stock_snapshot
        .iter()
        .map(|s| s.unrestricted_stock + s.blocked_stock)
        .sum();
    let initial_total: f64 = dataset
        .reference
        .storage_stock
        .iter()
        .map(|s| s.unrestricted_stock)
        .sum();
    let moved: i64 = dataset
        .material_movements
        .iter()
        .filter(|m| m.storage_location.is_some())
        .map(|m| m.quantity)
        .sum();
    assert_abs_diff_eq!(snapshot_total, initial_total + moved as f64, epsilon = 1e-6);

    for balance in &dataset.stock_period_balances {
        assert_abs_diff_eq!(
            balance.closing_quantity,
            balance.opening_quantity + balance.receipts - balance.issues,
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_transfers_net_to_zero() {
    let mut config = FabricConfig::for_profile(Profile::WorkingCapital)
        .scaled(0.02)
        .with_seed(Some(4));
    config.modules.open_items = false;
    config.modules.general_ledger = false;
    let dataset = DataFabricPipeline::new(config).unwrap().run().unwrap();

    let mut per_document: HashMap<&str, i64> = HashMap::new();
    for movement in dataset
        .material_movements
        .iter()
        .filter(|m| m.movement_type == MovementType::Transfer)
    {
        *per_document
            .entry(movement.material_document.as_str())
            .or_default() += movement.quantity;
    }
    assert!(!per_document.is_empty());
    assert!(per_document.values().all(|q| *q == 0));
}

#[test]
fn test_identifiers_stay_unique_after_growth() {
    let mut config = FabricConfig::for_profile(Profile::WorkingCapital)
        .scaled(0.02)
        .with_seed(Some(17));
    config.assets.acquisition_probability = 1.0;
    config.modules.workforce = true;
    config.counts.employees = 20;
    let dataset = DataFabricPipeline::new(config).unwrap().run().unwrap();

    let assets: HashSet<_> = dataset
        .reference
        .assets
        .iter()
        .map(|a| &a.asset_number)
        .collect();
    assert_eq!(assets.len(), dataset.reference.assets.len());
    let employees: HashSet<_> = dataset
        .reference
        .employees
        .iter()
        .map(|e| &e.employee_id)
        .collect();
    assert_eq!(employees.len(), dataset.reference.employees.len());
    assert!(dataset.reference.employees.len() > 20);

    for value in &dataset.asset_values {
        assert!(value.net_book_value >= 0.0);
        assert!(value.accumulated_depreciation <= value.acquisition_value);
    }
}

#[test]
fn test_write_to_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dataset = run(Profile::Inventory, 0.05, 2);
    let written = dataset.write_to(&CsvSink::new(tmp.path())).unwrap();

    let names: HashSet<_> = written.iter().map(|t| t.name).collect();
    assert!(names.contains("dim_date"));
    assert!(names.contains("mseg_movements"));
    assert!(names.contains("vbfa_document_flow"));
    // Disabled modules leave no file behind.
    assert!(!names.contains("faglflexa_gl_items"));
    assert!(!tmp.path().join("faglflexa_gl_items.csv").exists());

    for table in &written {
        let text = std::fs::read_to_string(&table.path).unwrap();
        assert_eq!(text.lines().count(), table.rows + 1, "{}", table.name);
    }
}

#[test]
fn test_summary_ratios() {
    let dataset = run(Profile::Inventory, 0.1, 9);
    let summary = DatasetSummary::of(&dataset);
    assert_eq!(summary.seed, 9);
    assert_eq!(summary.revenue, None);
    let fill = summary.fill_rate.unwrap();
    assert!(fill > 0.0 && fill <= 1.0);
    let backorders = summary.backorder_rate.unwrap();
    assert!((0.0..=1.0).contains(&backorders));
    assert_eq!(summary.total_rows(), {
        dataset.table_counts().iter().map(|(_, n)| n).sum::<usize>()
    });
}

#[test]
fn test_goods_movements_without_storage_locations_are_rejected() {
    let mut config = FabricConfig::for_profile(Profile::Inventory)
        .scaled(0.05)
        .with_seed(Some(3));
    config.organization.storage_locations.clear();
    config.organization.locations_per_plant = 0;
    config.inventory.mix.transfer = 0.0;

    assert!(matches!(
        DataFabricPipeline::new(config),
        Err(FabricError::Config(_))
    ));
}
