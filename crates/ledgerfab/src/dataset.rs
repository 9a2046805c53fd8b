//! The generated dataset and its output.

use chrono::NaiveDate;
use tracing::info;

use crate::calendar::CalendarDay;
use crate::config::Profile;
use crate::error::FabricResult;
use crate::fabric::{FulfillmentTables, ReferenceData, SalesTables};
use crate::models::{
    AssetMovement, AssetValue, DocumentHeader, EmployeeAction, GlLineItem, MaterialMovement,
    PayableItem, ReceivableItem, StockPeriodBalance, StorageStock, TableRow,
};
use crate::registry::ReferenceRegistry;
use crate::sink::{CsvSink, TableSummary};

/// Every table of one generation run.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Seed the run used.
    pub seed: u64,
    /// Profile the configuration came from, if any.
    pub profile: Option<Profile>,
    /// First and last date of the range.
    pub range: (NaiveDate, NaiveDate),
    /// Date dimension.
    pub calendar: Vec<CalendarDay>,
    /// Reference tables, including hires and acquisitions.
    pub reference: ReferenceData,
    /// GL line items.
    pub gl_line_items: Vec<GlLineItem>,
    /// GL document headers.
    pub document_headers: Vec<DocumentHeader>,
    /// Customer open items.
    pub receivables: Vec<ReceivableItem>,
    /// Vendor open items.
    pub payables: Vec<PayableItem>,
    /// Sales orders, billing and CO-PA.
    pub sales: SalesTables,
    /// Order to delivery chains.
    pub fulfillment: FulfillmentTables,
    /// Material document lines.
    pub material_movements: Vec<MaterialMovement>,
    /// Storage stock after all movements. Empty unless stock balances are
    /// enabled; the initial stock lives in `reference`.
    pub stock_snapshot: Vec<StorageStock>,
    /// Stock per location and fiscal period.
    pub stock_period_balances: Vec<StockPeriodBalance>,
    /// Asset acquisitions and depreciation.
    pub asset_movements: Vec<AssetMovement>,
    /// Asset values per fiscal year.
    pub asset_values: Vec<AssetValue>,
    /// Hires and terminations.
    pub employee_actions: Vec<EmployeeAction>,
}

impl Dataset {
    /// Registry of every reference identifier in the dataset.
    pub fn registry(&self) -> FabricResult<ReferenceRegistry> {
        self.reference.registry()
    }

    /// Check that every foreign key of every table resolves.
    pub fn validate(&self) -> FabricResult<()> {
        let registry = self.registry()?;
        let r = &self.reference;
        registry.resolve_all(&r.material_valuations)?;
        registry.resolve_all(&r.customer_sales_areas)?;
        registry.resolve_all(&r.employees)?;
        registry.resolve_all(&r.assets)?;
        registry.resolve_all(&r.work_centers)?;
        registry.resolve_all(&r.equipment)?;
        registry.resolve_all(&r.storage_stock)?;
        registry.resolve_all(&self.gl_line_items)?;
        registry.resolve_all(&self.document_headers)?;
        registry.resolve_all(&self.receivables)?;
        registry.resolve_all(&self.payables)?;
        registry.resolve_all(&self.sales.sales_orders)?;
        registry.resolve_all(&self.sales.billing_documents)?;
        registry.resolve_all(&self.sales.copa_items)?;
        registry.resolve_all(&self.fulfillment.order_headers)?;
        registry.resolve_all(&self.fulfillment.order_items)?;
        registry.resolve_all(&self.fulfillment.deliveries)?;
        registry.resolve_all(&self.material_movements)?;
        registry.resolve_all(&self.stock_snapshot)?;
        registry.resolve_all(&self.stock_period_balances)?;
        registry.resolve_all(&self.asset_movements)?;
        registry.resolve_all(&self.asset_values)?;
        registry.resolve_all(&self.employee_actions)?;
        Ok(())
    }

    /// Row count per table, in output order, including empty tables.
    pub fn table_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts = Vec::new();
        self.visit(&mut |name, rows| counts.push((name, rows)));
        counts
    }

    /// Write every non-empty table through `sink`.
    pub fn write_to(&self, sink: &CsvSink) -> FabricResult<Vec<TableSummary>> {
        let r = &self.reference;
        let mut written = Vec::new();
        let mut push = |summary: Option<TableSummary>| written.extend(summary);

        push(sink.write(&self.calendar)?);
        push(sink.write(&r.companies)?);
        push(sink.write(&r.gl_accounts)?);
        push(sink.write(&r.cost_centers)?);
        push(sink.write(&r.profit_centers)?);
        push(sink.write(&r.plants)?);
        push(sink.write(&r.materials)?);
        push(sink.write(&r.material_valuations)?);
        push(sink.write(&r.customers)?);
        push(sink.write(&r.customer_sales_areas)?);
        push(sink.write(&r.vendors)?);
        push(sink.write(&r.employees)?);
        push(sink.write(&r.assets)?);
        push(sink.write(&r.work_centers)?);
        push(sink.write(&r.equipment)?);
        // The snapshot replaces the initial stock when both exist.
        if self.stock_snapshot.is_empty() {
            push(sink.write(&r.storage_stock)?);
        } else {
            push(sink.write(&self.stock_snapshot)?);
        }
        push(sink.write(&self.gl_line_items)?);
        push(sink.write(&self.document_headers)?);
        push(sink.write(&self.receivables)?);
        push(sink.write(&self.payables)?);
        push(sink.write(&self.sales.sales_orders)?);
        push(sink.write(&self.sales.billing_documents)?);
        push(sink.write(&self.sales.copa_items)?);
        push(sink.write(&self.fulfillment.order_headers)?);
        push(sink.write(&self.fulfillment.order_items)?);
        push(sink.write(&self.fulfillment.deliveries)?);
        push(sink.write(&self.fulfillment.document_flows)?);
        push(sink.write(&self.material_movements)?);
        push(sink.write(&self.stock_period_balances)?);
        push(sink.write(&self.asset_movements)?);
        push(sink.write(&self.asset_values)?);
        push(sink.write(&self.employee_actions)?);

        info!(
            tables = written.len(),
            dir = %sink.dir().display(),
            "Dataset written"
        );
        Ok(written)
    }

    fn visit(&self, f: &mut dyn FnMut(&'static str, usize)) {
        fn count<T: TableRow>(rows: &[T], f: &mut dyn FnMut(&'static str, usize)) {
            f(T::TABLE, rows.len());
        }

        let r = &self.reference;
        count(&self.calendar, f);
        count(&r.companies, f);
        count(&r.gl_accounts, f);
        count(&r.cost_centers, f);
        count(&r.profit_centers, f);
        count(&r.plants, f);
        count(&r.materials, f);
        count(&r.material_valuations, f);
        count(&r.customers, f);
        count(&r.customer_sales_areas, f);
        count(&r.vendors, f);
        count(&r.employees, f);
        count(&r.assets, f);
        count(&r.work_centers, f);
        count(&r.equipment, f);
        if self.stock_snapshot.is_empty() {
            count::<StorageStock>(&r.storage_stock, f);
        } else {
            count::<StorageStock>(&self.stock_snapshot, f);
        }
        count(&self.gl_line_items, f);
        count(&self.document_headers, f);
        count(&self.receivables, f);
        count(&self.payables, f);
        count(&self.sales.sales_orders, f);
        count(&self.sales.billing_documents, f);
        count(&self.sales.copa_items, f);
        count(&self.fulfillment.order_headers, f);
        count(&self.fulfillment.order_items, f);
        count(&self.fulfillment.deliveries, f);
        count(&self.fulfillment.document_flows, f);
        count(&self.material_movements, f);
        count(&self.stock_period_balances, f);
        count(&self.asset_movements, f);
        count(&self.asset_values, f);
        count(&self.employee_actions, f);
    }
}
