//! Order fulfillment and material movement rows.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::registry::{CustomerId, ForeignKey, ForeignKeys, MaterialId, PlantId};

/// Order header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderHeader {
    /// Order number.
    pub sales_order: String,
    /// Order type.
    pub order_type: &'static str,
    /// Sales organization.
    pub sales_org: &'static str,
    /// Distribution channel.
    pub distribution_channel: &'static str,
    /// Division.
    pub division: &'static str,
    /// Order date.
    pub order_date: NaiveDate,
    /// Sold-to customer.
    pub customer_id: CustomerId,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period.
    pub fiscal_period: u32,
}

impl ForeignKeys for OrderHeader {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![ForeignKey::of(&self.customer_id)]
    }
}

/// Outcome of delivering one order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    /// Full quantity delivered.
    Complete,
    /// Part of the quantity delivered.
    Partial,
    /// Nothing delivered.
    Backordered,
}

impl DeliveryStatus {
    /// Whether an outstanding quantity remains.
    pub fn has_backorder(&self) -> bool {
        !matches!(self, DeliveryStatus::Complete)
    }
}

/// Order item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    /// Order number.
    pub sales_order: String,
    /// Item number.
    pub sales_order_item: u32,
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Ordered quantity.
    pub order_quantity: u32,
    /// Net value.
    pub net_value: f64,
    /// Currency.
    pub currency: String,
    /// Outcome of the delivery.
    pub delivery_status: DeliveryStatus,
}

impl ForeignKeys for OrderItem {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.material_id),
            ForeignKey::of(&self.plant_id),
        ]
    }
}

/// Delivery line for one order item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    /// Delivery number.
    pub delivery_id: String,
    /// Delivery item.
    pub delivery_item: u32,
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Delivered quantity.
    pub delivery_quantity: u32,
    /// Outcome.
    pub delivery_status: DeliveryStatus,
    /// Delivery date.
    pub delivery_date: NaiveDate,
    /// Order number.
    pub sales_order: String,
    /// Order item.
    pub sales_order_item: u32,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period.
    pub fiscal_period: u32,
}

impl ForeignKeys for Delivery {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.material_id),
            ForeignKey::of(&self.plant_id),
        ]
    }
}

/// Category of a document flow link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlowCategory {
    /// Order to delivery.
    #[serde(rename = "C")]
    OrderToDelivery,
    /// Delivery to backorder.
    #[serde(rename = "N")]
    DeliveryToBackorder,
}

/// Link between a preceding and a subsequent document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFlow {
    /// Preceding document.
    pub preceding_doc: String,
    /// Preceding item.
    pub preceding_item: u32,
    /// Subsequent document.
    pub subsequent_doc: String,
    /// Subsequent item.
    pub subsequent_item: u32,
    /// Link category.
    pub document_category: FlowCategory,
    /// Quantity carried by the link.
    pub quantity: u32,
    /// Link date.
    pub flow_date: NaiveDate,
}

/// Inventory movement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MovementType {
    /// Goods receipt for purchase or production order.
    #[serde(rename = "101")]
    GoodsReceipt,
    /// Goods issue to production.
    #[serde(rename = "261")]
    ProductionIssue,
    /// Transfer between storage locations.
    #[serde(rename = "311")]
    Transfer,
    /// Goods issue for a delivery.
    #[serde(rename = "601")]
    SalesIssue,
}

impl MovementType {
    /// SAP movement type code.
    pub fn code(&self) -> &'static str {
        match self {
            MovementType::GoodsReceipt => "101",
            MovementType::ProductionIssue => "261",
            MovementType::Transfer => "311",
            MovementType::SalesIssue => "601",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Line of a material document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialMovement {
    /// Material document number.
    pub material_document: String,
    /// Line within the document.
    pub document_item: u32,
    /// Movement type.
    pub movement_type: MovementType,
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Storage location; may be missing in low-quality data.
    pub storage_location: Option<String>,
    /// Batch; may be missing in low-quality data.
    pub batch_number: Option<String>,
    /// Signed quantity: receipts positive, issues negative.
    pub quantity: i64,
    /// Signed value at standard price.
    pub amount: f64,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period.
    pub fiscal_period: u32,
    /// Originating delivery, if any.
    pub reference_document: Option<String>,
}

impl ForeignKeys for MaterialMovement {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.material_id),
            ForeignKey::of(&self.plant_id),
        ]
    }
}

/// Stock movement totals for one storage location and fiscal period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPeriodBalance {
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Storage location.
    pub storage_location: String,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period.
    pub fiscal_period: u32,
    /// Stock at the start of the period.
    pub opening_quantity: f64,
    /// Sum of inbound movements.
    pub receipts: f64,
    /// Sum of outbound movements, positive.
    pub issues: f64,
    /// Stock at the end of the period.
    pub closing_quantity: f64,
}

impl ForeignKeys for StockPeriodBalance {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.material_id),
            ForeignKey::of(&self.plant_id),
        ]
    }
}
