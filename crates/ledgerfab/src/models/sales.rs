//! Sales orders, billing documents and profitability (CO-PA) items.

use chrono::NaiveDate;
use serde::Serialize;

use crate::registry::{CompanyCode, CustomerId, ForeignKey, ForeignKeys, MaterialId, PlantId};

/// Whether a sales order has been billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BillingStatus {
    /// A billing document references the order.
    Billed,
    /// No billing document within the range.
    #[serde(rename = "Not Billed")]
    NotBilled,
}

/// Single-item sales order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesOrder {
    /// Order number.
    pub sales_order_id: String,
    /// Item number.
    pub item_number: &'static str,
    /// Sold-to customer.
    pub customer_id: CustomerId,
    /// Ordered material.
    pub material_id: MaterialId,
    /// Order date.
    pub order_date: NaiveDate,
    /// Requested delivery date.
    pub requested_delivery_date: NaiveDate,
    /// Quantity.
    pub order_quantity: u32,
    /// Unit price.
    pub unit_price: f64,
    /// Net value.
    pub net_value: f64,
    /// Currency.
    pub currency: String,
    /// Sales organization.
    pub sales_org: &'static str,
    /// Delivering plant.
    pub plant_id: PlantId,
    /// Billing status.
    pub billing_status: BillingStatus,
}

impl ForeignKeys for SalesOrder {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.customer_id),
            ForeignKey::of(&self.material_id),
            ForeignKey::of(&self.plant_id),
        ]
    }
}

/// Billing document for one sales order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingDocument {
    /// Billing document number.
    pub billing_document: String,
    /// Item number.
    pub item_number: &'static str,
    /// Billed order.
    pub sales_order_id: String,
    /// Payer.
    pub customer_id: CustomerId,
    /// Material.
    pub material_id: MaterialId,
    /// Billing date.
    pub billing_date: NaiveDate,
    /// Billed quantity.
    pub billing_quantity: u32,
    /// Net value.
    pub net_value: f64,
    /// Tax.
    pub tax_amount: f64,
    /// Net plus tax.
    pub gross_value: f64,
    /// Currency.
    pub currency: String,
    /// Cost of goods sold.
    pub cost_of_goods: f64,
}

impl ForeignKeys for BillingDocument {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.customer_id),
            ForeignKey::of(&self.material_id),
        ]
    }
}

/// Profitability analysis line for one billing document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopaItem {
    /// Running id.
    pub id: u64,
    /// Company.
    pub company_code: CompanyCode,
    /// Operating concern.
    pub operating_concern: &'static str,
    /// Record type (`F` = billing data).
    pub record_type: &'static str,
    /// Plan/actual version.
    pub version: &'static str,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period.
    pub fiscal_period: u32,
    /// Originating billing document.
    pub billing_document: String,
    /// Customer.
    pub customer_id: CustomerId,
    /// Material.
    pub material_id: MaterialId,
    /// Sales organization.
    pub sales_org: &'static str,
    /// Product line of the material.
    pub product_line: &'static str,
    /// Revenue.
    pub revenue_amount: f64,
    /// Cost of goods, negative.
    pub cogs_amount: f64,
    /// Marketing cost, negative.
    pub marketing_cost: f64,
    /// Sales cost, negative.
    pub sales_cost: f64,
    /// Contribution margin.
    pub contribution_margin: f64,
    /// Currency.
    pub currency: String,
    /// Posting date.
    pub posting_date: NaiveDate,
}

impl ForeignKeys for CopaItem {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.company_code),
            ForeignKey::of(&self.customer_id),
            ForeignKey::of(&self.material_id),
        ]
    }
}
