//! Goods movements.
//!
//! Receipts add stock, production and sales issues remove it, and transfers
//! move a quantity between two storage locations of one plant. Every
//! movement is recorded through a [`MovementLog`], which the fulfillment
//! chain shares, so material document numbers are unique across both.

use chrono::NaiveDate;

use super::reference::ReferenceData;
use crate::calendar::{CalendarDay, FiscalPosition, FiscalYearStart};
use crate::config::{DataQualityConfig, InventoryConfig};
use crate::error::FabricResult;
use crate::models::{MaterialMovement, MovementType};
use crate::random::{round_cents, FabricRng};
use crate::registry::{MaterialId, PlantId, ReferenceTable};

/// One line of a material document before numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementLine {
    /// Movement type.
    pub movement_type: MovementType,
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Storage location, if known.
    pub storage_location: Option<String>,
    /// Batch, if known.
    pub batch_number: Option<String>,
    /// Signed quantity; negative for issues.
    pub quantity: i64,
    /// Valuation price per unit.
    pub unit_price: f64,
}

/// Numbers material documents and collects their lines.
#[derive(Debug, Clone)]
pub struct MovementLog {
    fiscal_start: FiscalYearStart,
    next_document: u64,
    movements: Vec<MaterialMovement>,
}

impl MovementLog {
    /// Create an empty log.
    pub fn new(fiscal_start: FiscalYearStart) -> Self {
        Self {
            fiscal_start,
            next_document: 1,
            movements: Vec::new(),
        }
    }

    /// Record one material document and return its number.
    pub fn post(
        &mut self,
        date: NaiveDate,
        reference: Option<&str>,
        lines: Vec<MovementLine>,
    ) -> String {
        let material_document = format!("MDOC{:010}", self.next_document);
        self.next_document += 1;
        let position = FiscalPosition::of(date, self.fiscal_start);

        for (item, line) in lines.into_iter().enumerate() {
            self.movements.push(MaterialMovement {
                material_document: material_document.clone(),
                document_item: item as u32 + 1,
                movement_type: line.movement_type,
                amount: round_cents(line.quantity as f64 * line.unit_price),
                material_id: line.material_id,
                plant_id: line.plant_id,
                storage_location: line.storage_location,
                batch_number: line.batch_number,
                quantity: line.quantity,
                posting_date: date,
                fiscal_year: position.fiscal_year,
                fiscal_period: position.fiscal_period,
                reference_document: reference.map(str::to_string),
            });
        }
        material_document
    }

    /// Recorded movements.
    pub fn movements(&self) -> &[MaterialMovement] {
        &self.movements
    }

    /// Number of material documents recorded.
    pub fn document_count(&self) -> u64 {
        self.next_document - 1
    }

    /// Consume into the movement table.
    pub fn into_movements(self) -> Vec<MaterialMovement> {
        self.movements
    }
}

/// Kind of a generated inventory event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovementKind {
    Receipt,
    SalesIssue,
    ProductionIssue,
    Transfer,
}

/// Generates receipts, issues and transfers.
#[derive(Debug)]
pub struct InventorySynthesizer<'a> {
    config: &'a InventoryConfig,
    quality: &'a DataQualityConfig,
    reference: &'a ReferenceData,
    locations: &'a [String],
}

impl<'a> InventorySynthesizer<'a> {
    /// Create a synthesizer over the given storage locations.
    pub fn new(
        config: &'a InventoryConfig,
        quality: &'a DataQualityConfig,
        reference: &'a ReferenceData,
        locations: &'a [String],
    ) -> Self {
        Self {
            config,
            quality,
            reference,
            locations,
        }
    }

    /// Emit `count` material documents dated `day`.
    pub fn post_day(
        &self,
        day: &CalendarDay,
        count: usize,
        log: &mut MovementLog,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let mix = self.config.mix;
        let weights = [
            (MovementKind::Receipt, mix.receipt),
            (MovementKind::SalesIssue, mix.sales_issue),
            (MovementKind::ProductionIssue, mix.production_issue),
            (MovementKind::Transfer, mix.transfer),
        ];
        for _ in 0..count {
            let Some(kind) = rng.pick_weighted(&weights) else {
                return Ok(());
            };
            let lines = match kind {
                MovementKind::Receipt => vec![self.receipt(day.date_key, rng)?],
                MovementKind::SalesIssue => vec![self.issue(MovementType::SalesIssue, rng)?],
                MovementKind::ProductionIssue => {
                    vec![self.issue(MovementType::ProductionIssue, rng)?]
                }
                MovementKind::Transfer => self.transfer(rng)?,
            };
            log.post(day.date_key, None, lines);
        }
        Ok(())
    }

    fn material_at_plant(&self, rng: &mut FabricRng) -> FabricResult<(usize, usize)> {
        let material = rng.pick_index(self.reference.materials.len(), ReferenceTable::Material)?;
        let plant = rng.pick_index(self.reference.plants.len(), ReferenceTable::Plant)?;
        Ok((material, plant))
    }

    fn line(
        &self,
        movement_type: MovementType,
        (material, plant): (usize, usize),
        quantity: i64,
    ) -> MovementLine {
        let data = self.reference;
        MovementLine {
            movement_type,
            material_id: data.materials[material].material_id.clone(),
            plant_id: data.plants[plant].plant_id.clone(),
            storage_location: None,
            batch_number: None,
            quantity,
            unit_price: data.standard_price(material, plant),
        }
    }

    fn receipt(&self, date: NaiveDate, rng: &mut FabricRng) -> FabricResult<MovementLine> {
        let cfg = self.config;
        let ordered = rng.range(cfg.receipt_quantity.min..=cfg.receipt_quantity.max);
        let received = match cfg.yield_loss {
            Some(loss) => (f64::from(ordered) * (1.0 - rng.uniform(loss.min, loss.max))).round(),
            None => f64::from(ordered),
        };

        let mut line = self.line(
            MovementType::GoodsReceipt,
            self.material_at_plant(rng)?,
            received as i64,
        );
        if !rng.chance(self.quality.missing_batch_rate) {
            line.batch_number = Some(format!("BATCH-{}", date.format("%Y%m%d")));
        }
        if !rng.chance(self.quality.missing_location_rate) {
            line.storage_location = Some(self.location(rng)?);
        }
        Ok(line)
    }

    fn issue(&self, movement_type: MovementType, rng: &mut FabricRng) -> FabricResult<MovementLine> {
        let cfg = self.config;
        let quantity = rng.range(cfg.issue_quantity.min..=cfg.issue_quantity.max);
        let mut line = self.line(movement_type, self.material_at_plant(rng)?, -i64::from(quantity));
        line.storage_location = Some(self.location(rng)?);
        Ok(line)
    }

    fn transfer(&self, rng: &mut FabricRng) -> FabricResult<Vec<MovementLine>> {
        let pair = rng.sample_distinct(self.locations, 2, ReferenceTable::Plant)?;
        let (from, to) = (pair[0].clone(), pair[1].clone());
        let cfg = self.config;
        let quantity = i64::from(rng.range(cfg.issue_quantity.min..=cfg.issue_quantity.max));
        let at = self.material_at_plant(rng)?;

        let mut out = self.line(MovementType::Transfer, at, -quantity);
        out.storage_location = Some(from);
        let mut into = self.line(MovementType::Transfer, at, quantity);
        into.storage_location = Some(to);
        Ok(vec![out, into])
    }

    fn location(&self, rng: &mut FabricRng) -> FabricResult<String> {
        rng.pick(self.locations, ReferenceTable::Plant).cloned()
    }
}
