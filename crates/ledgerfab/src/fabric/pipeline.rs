//! Generation pipeline.
//!
//! The pipeline builds the calendar and reference tables, runs every enabled
//! synthesizer over the calendar, folds the derived tables and validates
//! all foreign keys before handing back a [`Dataset`].
//!
//! Modules run one after another, each over the full calendar. Employees and
//! assets are the only reference tables that grow during a run; they are
//! lent to their synthesizers and put back before validation.

use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use super::{
    AssetSynthesizer, FulfillmentSynthesizer, FulfillmentTables, InventorySynthesizer, Journal,
    LedgerSynthesizer, MovementLog, OpenItemSynthesizer, ReferenceData, ReferenceDataBuilder,
    SalesSynthesizer, SalesTables, VolumeModel, WorkforceSynthesizer,
};
use crate::aggregate::{asset_values, fold_stock};
use crate::calendar::FiscalCalendar;
use crate::config::FabricConfig;
use crate::dataset::Dataset;
use crate::error::{FabricError, FabricResult};
use crate::models::{AssetMovement, EmployeeAction, PayableItem, ReceivableItem};
use crate::random::FabricRng;

/// Counters of a finished run.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Calendar days generated.
    pub days: usize,
    /// GL documents posted, including sales and depreciation follow-ups.
    pub gl_documents: usize,
    /// Open item rows.
    pub open_items: usize,
    /// Sales orders.
    pub sales_orders: usize,
    /// Fulfillment order items.
    pub order_items: usize,
    /// Material documents.
    pub material_documents: u64,
    /// Asset movements.
    pub asset_movements: usize,
    /// Personnel actions.
    pub employee_actions: usize,
    /// Wall clock time of the run (seconds).
    pub running_time_seconds: f64,
}

/// Runs one configuration end to end.
#[derive(Debug)]
pub struct DataFabricPipeline {
    run_id: Uuid,
    config: FabricConfig,
    rng: FabricRng,
    stats: PipelineStats,
}

impl DataFabricPipeline {
    /// Validate the configuration and seed the random source.
    pub fn new(config: FabricConfig) -> FabricResult<Self> {
        config.validate().map_err(FabricError::Config)?;
        let rng = FabricRng::new(config.seed);
        Ok(Self {
            run_id: Uuid::new_v4(),
            config,
            rng,
            stats: PipelineStats::default(),
        })
    }

    /// Identifier of this run, for log correlation.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Seed in use; drawn from entropy when the configuration has none.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Configuration of the run.
    pub fn config(&self) -> &FabricConfig {
        &self.config
    }

    /// Counters of the last run.
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Generate the dataset.
    pub fn run(&mut self) -> FabricResult<Dataset> {
        let started = Instant::now();
        let config = &self.config;
        let rng = &mut self.rng;
        let modules = &config.modules;
        info!(
            run_id = %self.run_id,
            seed = rng.seed(),
            profile = config.profile.map(|p| p.name()).unwrap_or("custom"),
            "Starting generation"
        );

        let cal = &config.calendar;
        let calendar =
            FiscalCalendar::build(cal.start, cal.end, cal.fiscal_start, cal.business_days_only)?;
        let mut reference = ReferenceDataBuilder::new(config).build(rng)?;
        let volume = VolumeModel::new(&config.volume, &calendar, rng);
        debug!(
            days = calendar.len(),
            growth_rate = volume.growth_rate(),
            "Calendar ready"
        );

        let mut employees = std::mem::take(&mut reference.employees);
        let mut assets = std::mem::take(&mut reference.assets);
        let reference = reference;

        let mut journal = Journal::new(cal.fiscal_start, config.organization.group_currency.clone());
        run_ledger(config, &reference, &calendar, &volume, &mut journal, rng)?;

        let (receivables, payables) = if modules.open_items {
            run_open_items(config, &reference, &calendar, &volume, rng)?
        } else {
            (Vec::new(), Vec::new())
        };

        let mut sales = SalesTables::default();
        if modules.sales {
            run_sales(config, &reference, &calendar, &volume, &mut sales, &mut journal, rng)?;
        }

        let locations = &config.organization.storage_locations;
        let mut log = MovementLog::new(cal.fiscal_start);
        let mut fulfillment = FulfillmentTables::default();
        if modules.fulfillment {
            let mut synth = FulfillmentSynthesizer::new(
                &config.fulfillment,
                &reference,
                locations,
                cal.fiscal_start,
            )?;
            for day in calendar.days().iter().filter(|d| !volume.skips(d)) {
                let count = volume.count(config.fulfillment.orders_per_day, day, rng);
                synth.post_day(day, count, &mut fulfillment, &mut log, rng)?;
            }
        }
        if modules.inventory {
            let synth = InventorySynthesizer::new(
                &config.inventory,
                &config.data_quality,
                &reference,
                locations,
            );
            for day in calendar.days().iter().filter(|d| !volume.skips(d)) {
                let count = volume.count(config.inventory.movements_per_day, day, rng);
                synth.post_day(day, count, &mut log, rng)?;
            }
        }
        let material_documents = log.document_count();
        let material_movements = log.into_movements();

        let mut asset_movements: Vec<AssetMovement> = Vec::new();
        if modules.assets {
            let mut synth = AssetSynthesizer::new(
                &config.assets,
                &reference,
                &assets,
                cal.start,
                cal.fiscal_start,
            );
            for day in calendar.days() {
                synth.post_day(
                    day,
                    &mut assets,
                    &mut asset_movements,
                    Some(&mut journal),
                    rng,
                )?;
            }
        }

        let mut employee_actions: Vec<EmployeeAction> = Vec::new();
        if modules.workforce {
            let mut synth = WorkforceSynthesizer::new(&config.workforce, &reference);
            for day in calendar.days() {
                synth.post_day(day, &mut employees, &mut employee_actions, rng)?;
            }
        }

        let mut reference: ReferenceData = reference;
        reference.employees = employees;
        reference.assets = assets;

        let stock = if modules.stock_balances {
            fold_stock(
                &reference.storage_stock,
                &material_movements,
                config.inventory.simulate_stockouts,
            )
        } else {
            Default::default()
        };
        let asset_values = if modules.asset_values {
            asset_values(
                &reference.assets,
                &asset_movements,
                &reference.companies,
                (cal.start, cal.end),
                cal.fiscal_start,
                config.assets.max_depreciation_ratio,
            )
        } else {
            Vec::new()
        };

        let (gl_line_items, document_headers) = journal.into_parts();
        self.stats = PipelineStats {
            days: calendar.len(),
            gl_documents: document_headers.len(),
            open_items: receivables.len() + payables.len(),
            sales_orders: sales.sales_orders.len(),
            order_items: fulfillment.order_items.len(),
            material_documents,
            asset_movements: asset_movements.len(),
            employee_actions: employee_actions.len(),
            running_time_seconds: started.elapsed().as_secs_f64(),
        };

        let dataset = Dataset {
            seed: self.rng.seed(),
            profile: config.profile,
            range: (cal.start, cal.end),
            calendar: calendar.into_days(),
            reference,
            gl_line_items,
            document_headers,
            receivables,
            payables,
            sales,
            fulfillment,
            material_movements,
            stock_snapshot: stock.snapshot,
            stock_period_balances: stock.period_balances,
            asset_movements,
            asset_values,
            employee_actions,
        };
        dataset.validate()?;

        for (table, rows) in dataset.table_counts() {
            if rows > 0 {
                info!(table, rows, "Generated table");
            }
        }
        info!(
            seconds = self.stats.running_time_seconds,
            "Generation finished"
        );
        Ok(dataset)
    }
}

fn run_ledger(
    config: &FabricConfig,
    reference: &ReferenceData,
    calendar: &FiscalCalendar,
    volume: &VolumeModel,
    journal: &mut Journal,
    rng: &mut FabricRng,
) -> FabricResult<()> {
    let synth = LedgerSynthesizer::new(&config.ledger, reference);
    if config.modules.opening_balances {
        synth.opening_balances(calendar.start(), journal, rng)?;
    }
    if config.modules.general_ledger {
        for day in calendar.days().iter().filter(|d| !volume.skips(d)) {
            let count = volume.count(config.ledger.postings_per_day, day, rng);
            synth.post_day(day, count, journal, rng)?;
        }
    }
    Ok(())
}

fn run_open_items(
    config: &FabricConfig,
    reference: &ReferenceData,
    calendar: &FiscalCalendar,
    volume: &VolumeModel,
    rng: &mut FabricRng,
) -> FabricResult<(Vec<ReceivableItem>, Vec<PayableItem>)> {
    let customers: Vec<_> = reference
        .customers
        .iter()
        .map(|c| c.customer_id.clone())
        .collect();
    let vendors: Vec<_> = reference
        .vendors
        .iter()
        .map(|v| v.vendor_id.clone())
        .collect();
    let streams = &config.open_items;
    let mut ar = OpenItemSynthesizer::new(&streams.receivables, &customers, &reference.companies);
    let mut ap = OpenItemSynthesizer::new(&streams.payables, &vendors, &reference.companies);

    let mut receivables = Vec::new();
    let mut payables = Vec::new();
    for day in calendar.days().iter().filter(|d| !volume.skips(d)) {
        let count = volume.count(streams.receivables.items_per_day, day, rng);
        ar.post_day(day.date_key, count, calendar, &mut receivables, rng)?;
        let count = volume.count(streams.payables.items_per_day, day, rng);
        ap.post_day(day.date_key, count, calendar, &mut payables, rng)?;
    }
    Ok((receivables, payables))
}

fn run_sales(
    config: &FabricConfig,
    reference: &ReferenceData,
    calendar: &FiscalCalendar,
    volume: &VolumeModel,
    tables: &mut SalesTables,
    journal: &mut Journal,
    rng: &mut FabricRng,
) -> FabricResult<()> {
    let post = config.sales.post_to_ledger;
    let mut synth = SalesSynthesizer::new(&config.sales, reference)?;
    for day in calendar.business_days() {
        let count = volume.count(config.sales.orders_per_day, day, rng);
        let target = post.then_some(&mut *journal);
        synth.post_day(day, count, calendar, tables, target, rng)?;
        if post && day.is_month_start() {
            synth.accrue_opex(day.date_key, journal, rng)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    fn small(profile: Profile) -> FabricConfig {
        FabricConfig::for_profile(profile)
            .scaled(0.02)
            .with_seed(Some(7))
    }

    #[test]
    fn test_pipeline_creation() {
        let pipeline = DataFabricPipeline::new(small(Profile::Inventory)).unwrap();
        assert_eq!(pipeline.seed(), 7);
        assert_eq!(pipeline.stats().days, 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small(Profile::Inventory);
        config.calendar.end = config.calendar.start - chrono::Duration::days(1);
        assert!(matches!(
            DataFabricPipeline::new(config),
            Err(FabricError::Config(_))
        ));
    }

    #[test]
    fn test_pipeline_run_fills_stats() {
        let mut pipeline = DataFabricPipeline::new(small(Profile::SalesPerformance)).unwrap();
        let dataset = pipeline.run().unwrap();
        let stats = pipeline.stats();
        assert_eq!(stats.days, dataset.calendar.len());
        assert_eq!(stats.sales_orders, dataset.sales.sales_orders.len());
        assert!(stats.sales_orders > 0);
        assert!(stats.employee_actions > 0);
        assert_eq!(dataset.seed, 7);
    }
}
