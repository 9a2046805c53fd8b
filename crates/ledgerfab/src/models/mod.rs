//! Row types of every generated table.
//!
//! Rows are plain data: they serialize flat to one CSV record each and carry
//! no behaviour beyond exposing the foreign keys they hold.

mod account;
mod assets;
mod ledger;
mod logistics;
mod open_item;
mod reference;
mod sales;
mod workforce;

pub use account::*;
pub use assets::*;
pub use ledger::*;
pub use logistics::*;
pub use open_item::*;
pub use reference::*;
pub use sales::*;
pub use workforce::*;

use serde::Serialize;

use crate::calendar::CalendarDay;

/// A row that belongs to a named output table.
pub trait TableRow: Serialize {
    /// Table name, also the CSV file stem.
    const TABLE: &'static str;
}

macro_rules! table_rows {
    ($($row:ty => $name:literal),* $(,)?) => {
        $(
            impl TableRow for $row {
                const TABLE: &'static str = $name;
            }
        )*
    };
}

table_rows! {
    CalendarDay => "dim_date",
    Company => "dim_company_codes",
    GlAccount => "dim_gl_accounts",
    CostCenter => "dim_cost_centers",
    ProfitCenter => "dim_profit_centers",
    Plant => "dim_plants",
    Material => "dim_materials",
    MaterialValuation => "mbew_material_valuation",
    Customer => "dim_customers",
    CustomerSalesArea => "knvv_customer_sales",
    Vendor => "dim_vendors",
    Employee => "dim_employees",
    Asset => "dim_assets",
    WorkCenter => "dim_work_centers",
    Equipment => "dim_equipment",
    StorageStock => "mard_storage_stock",
    GlLineItem => "faglflexa_gl_items",
    DocumentHeader => "bkpf_doc_header",
    ReceivableItem => "fact_ar_open_items",
    PayableItem => "fact_ap_open_items",
    SalesOrder => "sales_orders",
    BillingDocument => "billing_documents",
    CopaItem => "copa_items",
    OrderHeader => "vbak_sales_orders",
    OrderItem => "vbap_sales_items",
    Delivery => "lips_deliveries",
    DocumentFlow => "vbfa_document_flow",
    MaterialMovement => "mseg_movements",
    StockPeriodBalance => "stock_period_balances",
    AssetMovement => "fact_asset_movements",
    AssetValue => "anlc_asset_values",
    EmployeeAction => "employee_actions",
}
