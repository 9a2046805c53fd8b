//! Order to delivery chains.
//!
//! Each order item resolves to one of three delivery outcomes. The item, its
//! delivery row, the goods issue and the document flow links are emitted
//! together so the chain is consistent by construction:
//!
//! | Outcome   | Delivered        | Goods issue | Flows  |
//! |-----------|------------------|-------------|--------|
//! | Complete  | ordered quantity | yes         | C      |
//! | Partial   | 1 ..= qty - 1    | yes         | C, N   |
//! | Backorder | 0                | no          | C, N   |

use chrono::{Duration, NaiveDate};

use super::inventory::{MovementLine, MovementLog};
use super::reference::ReferenceData;
use crate::calendar::{CalendarDay, FiscalPosition, FiscalYearStart};
use crate::config::FulfillmentConfig;
use crate::error::{FabricError, FabricResult};
use crate::models::{
    Delivery, DeliveryStatus, DocumentFlow, FlowCategory, MovementType, OrderHeader, OrderItem,
};
use crate::random::{round_cents, FabricRng};
use crate::registry::ReferenceTable;

/// Tables produced by the fulfillment chain.
#[derive(Debug, Clone, Default)]
pub struct FulfillmentTables {
    /// Order headers.
    pub order_headers: Vec<OrderHeader>,
    /// Order items.
    pub order_items: Vec<OrderItem>,
    /// Deliveries.
    pub deliveries: Vec<Delivery>,
    /// Document flow links.
    pub document_flows: Vec<DocumentFlow>,
}

/// Delivered quantity and resulting status of an item.
///
/// A partial delivery of a single unit cannot leave anything outstanding,
/// so it becomes a full backorder.
pub fn delivery_quantity(
    outcome: DeliveryStatus,
    ordered: u32,
    rng: &mut FabricRng,
) -> (u32, DeliveryStatus) {
    match outcome {
        DeliveryStatus::Complete => (ordered, DeliveryStatus::Complete),
        DeliveryStatus::Partial if ordered > 1 => {
            (rng.range(1..=ordered - 1), DeliveryStatus::Partial)
        }
        DeliveryStatus::Partial | DeliveryStatus::Backordered => (0, DeliveryStatus::Backordered),
    }
}

/// Generates order headers, items, deliveries, goods issues and flows.
#[derive(Debug)]
pub struct FulfillmentSynthesizer<'a> {
    config: &'a FulfillmentConfig,
    reference: &'a ReferenceData,
    locations: &'a [String],
    currency: String,
    fiscal_start: FiscalYearStart,
    next_order: u64,
    next_delivery: u64,
}

impl<'a> FulfillmentSynthesizer<'a> {
    /// Create a synthesizer. Items are priced in the first company's currency.
    pub fn new(
        config: &'a FulfillmentConfig,
        reference: &'a ReferenceData,
        locations: &'a [String],
        fiscal_start: FiscalYearStart,
    ) -> FabricResult<Self> {
        let currency = reference
            .companies
            .first()
            .map(|c| c.currency.clone())
            .ok_or(FabricError::EmptyReference {
                table: ReferenceTable::Company,
            })?;
        Ok(Self {
            config,
            reference,
            locations,
            currency,
            fiscal_start,
            next_order: 1,
            next_delivery: 1,
        })
    }

    /// Emit `count` orders dated `day`.
    pub fn post_day(
        &mut self,
        day: &CalendarDay,
        count: usize,
        tables: &mut FulfillmentTables,
        log: &mut MovementLog,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        for _ in 0..count {
            self.post_order(day.date_key, tables, log, rng)?;
        }
        Ok(())
    }

    fn post_order(
        &mut self,
        date: NaiveDate,
        tables: &mut FulfillmentTables,
        log: &mut MovementLog,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let reference = self.reference;
        let customer = rng.pick(&reference.customers, ReferenceTable::Customer)?;
        let sales_order = format!("OR{:010}", self.next_order);
        self.next_order += 1;
        let position = FiscalPosition::of(date, self.fiscal_start);

        tables.order_headers.push(OrderHeader {
            sales_order: sales_order.clone(),
            order_type: "OR",
            sales_org: "1000",
            distribution_channel: "10",
            division: "00",
            order_date: date,
            customer_id: customer.customer_id.clone(),
            fiscal_year: position.fiscal_year,
            fiscal_period: position.fiscal_period,
        });

        let items = rng.range(self.config.items_per_order.min..=self.config.items_per_order.max);
        for item in 1..=items {
            self.post_item(&sales_order, item, date, tables, log, rng)?;
        }
        Ok(())
    }

    fn post_item(
        &mut self,
        sales_order: &str,
        item: u32,
        date: NaiveDate,
        tables: &mut FulfillmentTables,
        log: &mut MovementLog,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let cfg = self.config;
        let reference = self.reference;
        let m = rng.pick_index(reference.materials.len(), ReferenceTable::Material)?;
        let p = rng.pick_index(reference.plants.len(), ReferenceTable::Plant)?;
        let material_id = reference.materials[m].material_id.clone();
        let plant_id = reference.plants[p].plant_id.clone();
        let standard_price = reference.standard_price(m, p);

        let ordered = rng.range(cfg.quantity.min..=cfg.quantity.max);
        let weights = [
            (DeliveryStatus::Complete, cfg.outcomes.complete),
            (DeliveryStatus::Partial, cfg.outcomes.partial),
            (DeliveryStatus::Backordered, cfg.outcomes.backorder),
        ];
        let Some(outcome) = rng.pick_weighted(&weights) else {
            return Err(FabricError::Config(
                "fulfillment.outcomes needs a positive weight".to_string(),
            ));
        };
        let (delivered, status) = delivery_quantity(outcome, ordered, rng);

        tables.order_items.push(OrderItem {
            sales_order: sales_order.to_string(),
            sales_order_item: item,
            material_id: material_id.clone(),
            plant_id: plant_id.clone(),
            order_quantity: ordered,
            net_value: round_cents(f64::from(ordered) * standard_price * cfg.price_markup),
            currency: self.currency.clone(),
            delivery_status: status,
        });

        let delivery_id = format!("DL{:010}", self.next_delivery);
        self.next_delivery += 1;
        let lag = rng.range(cfg.delivery_lag_days.min..=cfg.delivery_lag_days.max);
        let delivery_date = date + Duration::days(i64::from(lag));
        let position = FiscalPosition::of(date, self.fiscal_start);

        if delivered > 0 {
            let storage_location = rng.pick(self.locations, ReferenceTable::Plant)?.clone();
            log.post(
                delivery_date,
                Some(&delivery_id),
                vec![MovementLine {
                    movement_type: MovementType::SalesIssue,
                    material_id: material_id.clone(),
                    plant_id: plant_id.clone(),
                    storage_location: Some(storage_location),
                    batch_number: None,
                    quantity: -i64::from(delivered),
                    unit_price: standard_price,
                }],
            );
        }

        tables.deliveries.push(Delivery {
            delivery_id: delivery_id.clone(),
            delivery_item: item,
            material_id,
            plant_id,
            delivery_quantity: delivered,
            delivery_status: status,
            delivery_date,
            sales_order: sales_order.to_string(),
            sales_order_item: item,
            fiscal_year: position.fiscal_year,
            fiscal_period: position.fiscal_period,
        });

        tables.document_flows.push(DocumentFlow {
            preceding_doc: sales_order.to_string(),
            preceding_item: item,
            subsequent_doc: delivery_id.clone(),
            subsequent_item: item,
            document_category: FlowCategory::OrderToDelivery,
            quantity: ordered,
            flow_date: date,
        });
        if status.has_backorder() {
            tables.document_flows.push(DocumentFlow {
                preceding_doc: delivery_id.clone(),
                preceding_item: item,
                subsequent_doc: format!("BO{delivery_id}"),
                subsequent_item: item,
                document_category: FlowCategory::DeliveryToBackorder,
                quantity: ordered - delivered,
                flow_date: date + Duration::days(1),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FabricConfig, Profile};
    use crate::fabric::ReferenceDataBuilder;
    use std::collections::HashMap;

    #[test]
    fn test_single_unit_partial_becomes_backorder() {
        let mut rng = FabricRng::seeded(1);
        assert_eq!(
            delivery_quantity(DeliveryStatus::Partial, 1, &mut rng),
            (0, DeliveryStatus::Backordered)
        );
        assert_eq!(
            delivery_quantity(DeliveryStatus::Complete, 7, &mut rng),
            (7, DeliveryStatus::Complete)
        );
        for _ in 0..100 {
            let (q, status) = delivery_quantity(DeliveryStatus::Partial, 5, &mut rng);
            assert_eq!(status, DeliveryStatus::Partial);
            assert!((1..=4).contains(&q));
        }
    }

    fn synth_parts() -> (FabricConfig, ReferenceData) {
        let config = FabricConfig::for_profile(Profile::Inventory).scaled(0.02);
        let mut rng = FabricRng::seeded(12);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();
        (config, data)
    }

    #[test]
    fn test_goods_issue_without_locations_fails() {
        let (config, data) = synth_parts();
        let mut synth = FulfillmentSynthesizer::new(
            &config.fulfillment,
            &data,
            &[],
            config.calendar.fiscal_start,
        )
        .unwrap();
        let mut tables = FulfillmentTables::default();
        let mut log = MovementLog::new(config.calendar.fiscal_start);
        let mut rng = FabricRng::seeded(3);
        let day = CalendarDay::new(config.calendar.start, config.calendar.fiscal_start);

        let result = synth.post_day(&day, 50, &mut tables, &mut log, &mut rng);
        assert!(matches!(
            result,
            Err(FabricError::EmptyReference {
                table: ReferenceTable::Plant
            })
        ));
        assert!(log.movements().is_empty());
    }

    #[test]
    fn test_zero_outcome_weights_fail() {
        let (mut config, data) = synth_parts();
        config.fulfillment.outcomes.complete = 0.0;
        config.fulfillment.outcomes.partial = 0.0;
        config.fulfillment.outcomes.backorder = 0.0;
        let locations = config.organization.storage_locations.clone();
        let mut synth = FulfillmentSynthesizer::new(
            &config.fulfillment,
            &data,
            &locations,
            config.calendar.fiscal_start,
        )
        .unwrap();
        let mut tables = FulfillmentTables::default();
        let mut log = MovementLog::new(config.calendar.fiscal_start);
        let mut rng = FabricRng::seeded(3);
        let day = CalendarDay::new(config.calendar.start, config.calendar.fiscal_start);

        assert!(matches!(
            synth.post_day(&day, 1, &mut tables, &mut log, &mut rng),
            Err(FabricError::Config(_))
        ));
    }

    #[test]
    fn test_chain_is_consistent() {
        let config = FabricConfig::for_profile(Profile::Inventory).scaled(0.02);
        let mut rng = FabricRng::seeded(12);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();
        let locations = config.organization.storage_locations.clone();
        let mut synth = FulfillmentSynthesizer::new(
            &config.fulfillment,
            &data,
            &locations,
            config.calendar.fiscal_start,
        )
        .unwrap();
        let mut tables = FulfillmentTables::default();
        let mut log = MovementLog::new(config.calendar.fiscal_start);
        let day = CalendarDay::new(config.calendar.start, config.calendar.fiscal_start);
        synth
            .post_day(&day, 300, &mut tables, &mut log, &mut rng)
            .unwrap();

        assert_eq!(tables.order_headers.len(), 300);
        assert_eq!(tables.order_items.len(), tables.deliveries.len());

        let issues: HashMap<&str, i64> = log
            .movements()
            .iter()
            .filter_map(|m| m.reference_document.as_deref().map(|d| (d, m.quantity)))
            .collect();
        let backorders: HashMap<&str, u32> = tables
            .document_flows
            .iter()
            .filter(|f| f.document_category == FlowCategory::DeliveryToBackorder)
            .map(|f| (f.preceding_doc.as_str(), f.quantity))
            .collect();

        for (item, delivery) in tables.order_items.iter().zip(&tables.deliveries) {
            assert_eq!(item.sales_order, delivery.sales_order);
            assert_eq!(item.delivery_status, delivery.delivery_status);
            assert!(delivery.delivery_quantity <= item.order_quantity);
            let id = delivery.delivery_id.as_str();
            match delivery.delivery_status {
                DeliveryStatus::Complete => {
                    assert_eq!(delivery.delivery_quantity, item.order_quantity);
                    assert!(!backorders.contains_key(id));
                }
                DeliveryStatus::Partial => {
                    assert!(delivery.delivery_quantity > 0);
                    assert!(delivery.delivery_quantity < item.order_quantity);
                }
                DeliveryStatus::Backordered => assert_eq!(delivery.delivery_quantity, 0),
            }
            if delivery.delivery_status.has_backorder() {
                assert_eq!(
                    backorders[id],
                    item.order_quantity - delivery.delivery_quantity
                );
            }
            assert_eq!(
                issues.get(id).copied(),
                (delivery.delivery_quantity > 0).then(|| -i64::from(delivery.delivery_quantity))
            );
        }
    }
}
