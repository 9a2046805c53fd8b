//! Run configuration.
//!
//! A [`FabricConfig`] is built once per run, either from one of the
//! [`Profile`] presets or from a TOML file, and is passed by reference into
//! every builder. Every field carries a serde default so partial files load.
//!
//! ```toml
//! seed = 42
//! profile = "inventory"
//! output_dir = "dataset"
//!
//! [calendar]
//! start = "2023-01-01"
//! end = "2024-12-31"
//! fiscal_start = "january"
//! business_days_only = true
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::calendar::FiscalYearStart;
use crate::error::{FabricError, FabricResult};
use crate::fabric::{ChartStyle, ClearingPolicy, Industry, MonthEndBoost, SeasonalityConfig};
use crate::random::AmountDistribution;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn check_probability(name: &str, p: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(format!("{name} must be within [0, 1], got {p}"))
    }
}

fn check_non_negative(name: &str, v: f64) -> Result<(), String> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be >= 0, got {v}"))
    }
}

/// Inclusive lower and upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    /// Lower bound.
    pub min: T,
    /// Upper bound.
    pub max: T,
}

impl<T: PartialOrd + Copy + fmt::Display> Span<T> {
    /// Create a span.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Check `min <= max`.
    pub fn validate(&self, name: &str) -> Result<(), String> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(format!(
                "{name} needs min <= max, got ({}, {})",
                self.min, self.max
            ))
        }
    }
}

/// Preset corresponding to one of the dashboard datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Sales orders, billing, profitability and headcount movements.
    SalesPerformance,
    /// Double-entry ledger, receivables, payables and fixed assets.
    FinancialControl,
    /// Growth-adjusted ledger, open items, stock movements and assets.
    WorkingCapital,
    /// Goods movements, order fulfillment chains and stock levels.
    Inventory,
    /// Plants, work centers, equipment and workforce master data.
    Manufacturing,
}

impl Profile {
    /// All profiles.
    pub const ALL: [Profile; 5] = [
        Profile::SalesPerformance,
        Profile::FinancialControl,
        Profile::WorkingCapital,
        Profile::Inventory,
        Profile::Manufacturing,
    ];

    /// Command line name.
    pub fn name(&self) -> &'static str {
        match self {
            Profile::SalesPerformance => "sales-performance",
            Profile::FinancialControl => "financial-control",
            Profile::WorkingCapital => "working-capital",
            Profile::Inventory => "inventory",
            Profile::Manufacturing => "manufacturing",
        }
    }

    /// One-line description.
    pub fn description(&self) -> &'static str {
        match self {
            Profile::SalesPerformance => {
                "Sales orders, billing, CO-PA profitability and employee actions (seeded)"
            }
            Profile::FinancialControl => {
                "Balanced GL documents, AR/AP open items with clearing, asset depreciation"
            }
            Profile::WorkingCapital => {
                "Growth-adjusted GL, AR/AP aging, inventory and asset movements"
            }
            Profile::Inventory => {
                "Goods movements, order-delivery-backorder chains and stock balances (seeded)"
            }
            Profile::Manufacturing => "Plants, materials, work centers, equipment and employees",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Profile::ALL.iter().map(|p| p.name()).collect();
                format!("unknown profile '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Date range and fiscal calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// First date.
    pub start: NaiveDate,
    /// Last date, inclusive.
    pub end: NaiveDate,
    /// Month the fiscal year starts in.
    pub fiscal_start: FiscalYearStart,
    /// Emit only Monday to Friday into the date dimension.
    pub business_days_only: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start: ymd(2023, 1, 1),
            end: ymd(2024, 12, 31),
            fiscal_start: FiscalYearStart::January,
            business_days_only: false,
        }
    }
}

/// Organizational settings shared by the reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationConfig {
    /// Group reporting currency; also the currency of the first company.
    pub group_currency: String,
    /// Currencies drawn for the remaining companies.
    pub local_currencies: Vec<String>,
    /// Chart of accounts layout.
    pub chart: ChartStyle,
    /// Controlling area assigned to cost and profit centers.
    pub controlling_area: String,
    /// Storage location codes.
    pub storage_locations: Vec<String>,
    /// Distinct storage locations stocked per material and plant.
    pub locations_per_plant: usize,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            group_currency: "USD".to_string(),
            local_currencies: ["EUR", "GBP", "CAD", "JPY"].map(String::from).to_vec(),
            chart: ChartStyle::Ranged {
                accounts_per_subgroup: 20,
            },
            controlling_area: "A000".to_string(),
            storage_locations: ["A001", "B001", "C001", "WH01", "WH02"]
                .map(String::from)
                .to_vec(),
            locations_per_plant: 2,
        }
    }
}

/// Row counts of the reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountsConfig {
    /// Companies.
    pub companies: usize,
    /// Cost centers.
    pub cost_centers: usize,
    /// Profit centers.
    pub profit_centers: usize,
    /// Plants.
    pub plants: usize,
    /// Materials.
    pub materials: usize,
    /// Customers.
    pub customers: usize,
    /// Vendors.
    pub vendors: usize,
    /// Employees.
    pub employees: usize,
    /// Fixed assets.
    pub assets: usize,
    /// Work centers per plant.
    pub work_centers_per_plant: usize,
    /// Equipment per work center.
    pub equipment_per_work_center: usize,
}

impl Default for CountsConfig {
    fn default() -> Self {
        Self {
            companies: 1,
            cost_centers: 20,
            profit_centers: 10,
            plants: 1,
            materials: 100,
            customers: 100,
            vendors: 50,
            employees: 100,
            assets: 0,
            work_centers_per_plant: 0,
            equipment_per_work_center: 0,
        }
    }
}

impl CountsConfig {
    fn scaled(&self, factor: f64) -> Self {
        let scale = |n: usize| {
            if n == 0 {
                0
            } else {
                ((n as f64 * factor).round() as usize).max(1)
            }
        };
        Self {
            companies: self.companies,
            cost_centers: scale(self.cost_centers),
            profit_centers: scale(self.profit_centers),
            plants: self.plants,
            materials: scale(self.materials),
            customers: scale(self.customers),
            vendors: scale(self.vendors),
            employees: scale(self.employees),
            assets: scale(self.assets),
            work_centers_per_plant: scale(self.work_centers_per_plant),
            equipment_per_work_center: self.equipment_per_work_center,
        }
    }
}

/// Which optional tables and synthesizers run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Scenario-driven double-entry GL documents.
    pub general_ledger: bool,
    /// Opening balance documents dated the day before the start.
    pub opening_balances: bool,
    /// Receivable and payable open items with clearing.
    pub open_items: bool,
    /// Sales orders, billing and CO-PA.
    pub sales: bool,
    /// Customer sales area table.
    pub customer_sales_areas: bool,
    /// Order, delivery, goods issue and document flow chains.
    pub fulfillment: bool,
    /// Goods receipts, issues and transfers.
    pub inventory: bool,
    /// Initial storage stock per material, plant and location.
    pub storage_stock: bool,
    /// Stock snapshot and per-period stock balances.
    pub stock_balances: bool,
    /// Asset depreciation and acquisitions.
    pub assets: bool,
    /// Net book value per asset and fiscal year.
    pub asset_values: bool,
    /// Hires and terminations.
    pub workforce: bool,
}

/// Volume model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Seasonal factor per calendar month.
    pub seasonality: SeasonalityConfig,
    /// Annual growth rate range; one rate is drawn per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_growth: Option<Span<f64>>,
    /// Late-month boost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_end: Option<MonthEndBoost>,
    /// Emit nothing on weekends.
    pub skip_weekends: bool,
    /// Multiplier on weekends when they are not skipped.
    pub weekend_factor: f64,
    /// Half-width of the uniform jitter around 1.
    pub jitter: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            seasonality: SeasonalityConfig::flat(),
            annual_growth: None,
            month_end: None,
            skip_weekends: true,
            weekend_factor: 1.0,
            jitter: 0.0,
        }
    }
}

/// Weight and amount of one GL scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Relative selection weight.
    pub weight: f64,
    /// Document amount.
    pub amount: AmountDistribution,
}

/// General ledger settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Base documents per day.
    pub postings_per_day: f64,
    /// Dr cash or receivables, Cr revenue.
    pub revenue: ScenarioConfig,
    /// Dr operating expense, Cr cash or payables.
    pub expense: ScenarioConfig,
    /// Dr COGS, Cr inventory.
    pub cost_of_sales: ScenarioConfig,
    /// Dr cash, Cr cash.
    pub cash_transfer: ScenarioConfig,
    /// Opening balance of each asset role.
    pub opening_asset_amount: AmountDistribution,
    /// Opening balance of each liability role.
    pub opening_liability_amount: AmountDistribution,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            postings_per_day: 200.0,
            revenue: ScenarioConfig {
                weight: 0.40,
                amount: AmountDistribution::normal(5000.0, 1000.0),
            },
            expense: ScenarioConfig {
                weight: 0.42,
                amount: AmountDistribution::normal(1000.0, 300.0),
            },
            cost_of_sales: ScenarioConfig {
                weight: 0.10,
                amount: AmountDistribution::normal(3000.0, 800.0),
            },
            cash_transfer: ScenarioConfig {
                weight: 0.08,
                amount: AmountDistribution::normal(2000.0, 500.0),
            },
            opening_asset_amount: AmountDistribution::normal(500_000.0, 100_000.0),
            opening_liability_amount: AmountDistribution::normal(300_000.0, 50_000.0),
        }
    }
}

/// Sales order and billing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    /// Base orders per business day.
    pub orders_per_day: f64,
    /// Order quantity.
    pub quantity: Span<u32>,
    /// Unit price as a multiple of standard cost.
    pub markup: Span<f64>,
    /// Requested delivery lead time in days.
    pub requested_delivery_days: Span<u32>,
    /// Share of orders that are billed.
    pub billing_probability: f64,
    /// Days from order to billing before rolling to a business day.
    pub billing_delay_days: Span<u32>,
    /// Output tax rate.
    pub tax_rate: f64,
    /// Cost of goods as a share of net value.
    pub cogs_ratio: Span<f64>,
    /// Marketing cost as a share of revenue.
    pub marketing_ratio: Span<f64>,
    /// Sales cost as a share of revenue.
    pub sales_cost_ratio: Span<f64>,
    /// Post revenue, COGS and opex accrual documents to the ledger.
    pub post_to_ledger: bool,
    /// Monthly accrual per operating expense account.
    pub monthly_opex: AmountDistribution,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            orders_per_day: 70.0,
            quantity: Span::new(1, 100),
            markup: Span::new(1.2, 2.5),
            requested_delivery_days: Span::new(7, 30),
            billing_probability: 0.85,
            billing_delay_days: Span::new(5, 15),
            tax_rate: 0.08,
            cogs_ratio: Span::new(0.4, 0.7),
            marketing_ratio: Span::new(0.05, 0.10),
            sales_cost_ratio: Span::new(0.03, 0.08),
            post_to_ledger: true,
            monthly_opex: AmountDistribution::uniform(50_000.0, 200_000.0),
        }
    }
}

/// One open item stream (receivables or payables).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenItemStream {
    /// Base invoices per day.
    pub items_per_day: f64,
    /// Invoice amount.
    pub amount: AmountDistribution,
    /// Payment behaviour.
    pub policy: ClearingPolicy,
}

/// Receivables and payables settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenItemsConfig {
    /// Customer invoices.
    pub receivables: OpenItemStream,
    /// Vendor invoices.
    pub payables: OpenItemStream,
}

impl Default for OpenItemsConfig {
    fn default() -> Self {
        Self {
            receivables: OpenItemStream {
                items_per_day: 100.0,
                amount: AmountDistribution::normal(1500.0, 500.0),
                policy: ClearingPolicy {
                    clear_probability: 0.7,
                    target_days: 35.0,
                    delay_std_dev: 10.0,
                    min_delay_days: 5,
                    due_days_offset: Span::new(-5, 10),
                },
            },
            payables: OpenItemStream {
                items_per_day: 50.0,
                amount: AmountDistribution::normal(800.0, 300.0),
                policy: ClearingPolicy {
                    clear_probability: 0.8,
                    target_days: 50.0,
                    delay_std_dev: 12.0,
                    min_delay_days: 5,
                    due_days_offset: Span::new(-5, 10),
                },
            },
        }
    }
}

/// Relative weights of delivery outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryWeights {
    /// Delivered in full.
    pub complete: f64,
    /// Delivered in part.
    pub partial: f64,
    /// Not delivered.
    pub backorder: f64,
}

/// Order fulfillment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FulfillmentConfig {
    /// Base order headers per day.
    pub orders_per_day: f64,
    /// Items per order.
    pub items_per_order: Span<u32>,
    /// Ordered quantity per item.
    pub quantity: Span<u32>,
    /// Item price as a multiple of the plant standard price.
    pub price_markup: f64,
    /// Delivery outcome weights.
    pub outcomes: DeliveryWeights,
    /// Days from order to delivery.
    pub delivery_lag_days: Span<u32>,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            orders_per_day: 22.0,
            items_per_order: Span::new(1, 4),
            quantity: Span::new(1, 50),
            price_markup: 1.2,
            outcomes: DeliveryWeights {
                complete: 0.80,
                partial: 0.15,
                backorder: 0.05,
            },
            delivery_lag_days: Span::new(1, 3),
        }
    }
}

/// Relative weights of stock movement kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementMix {
    /// Goods receipts (101).
    pub receipt: f64,
    /// Goods issues for sales (601).
    pub sales_issue: f64,
    /// Goods issues to production (261).
    pub production_issue: f64,
    /// Location transfers (311).
    pub transfer: f64,
}

/// Stock movement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Base movements per day.
    pub movements_per_day: f64,
    /// Movement kind weights.
    pub mix: MovementMix,
    /// Ordered quantity of a goods receipt.
    pub receipt_quantity: Span<u32>,
    /// Share of a receipt lost to manufacturing yield, if simulated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_loss: Option<Span<f64>>,
    /// Quantity of issues and transfers.
    pub issue_quantity: Span<u32>,
    /// Move negative unrestricted stock into blocked stock.
    pub simulate_stockouts: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            movements_per_day: 80.0,
            mix: MovementMix {
                receipt: 0.4,
                sales_issue: 0.3,
                production_issue: 0.2,
                transfer: 0.1,
            },
            receipt_quantity: Span::new(50, 500),
            yield_loss: None,
            issue_quantity: Span::new(1, 100),
            simulate_stockouts: false,
        }
    }
}

/// Fixed asset settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Day of month on which depreciation posts.
    pub depreciation_day: u32,
    /// Acquisition value of the initial assets.
    pub acquisition_value: AmountDistribution,
    /// Lowest acquisition value.
    pub acquisition_floor: f64,
    /// Cap of accumulated depreciation as a share of acquisition value.
    pub max_depreciation_ratio: f64,
    /// Monthly chance of acquiring new assets.
    pub acquisition_probability: f64,
    /// Assets acquired per acquisition event.
    pub acquisitions_per_event: Span<u32>,
    /// Acquisition value of newly acquired assets.
    pub new_asset_value: AmountDistribution,
    /// Chance that an initial asset is deactivated inside the range.
    pub deactivation_probability: f64,
    /// Capitalization dates reach this many days before the start.
    pub capitalization_lookback_days: u32,
    /// Post monthly depreciation documents to the ledger.
    pub post_to_ledger: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            depreciation_day: 15,
            acquisition_value: AmountDistribution::normal(50_000.0, 15_000.0),
            acquisition_floor: 1_000.0,
            max_depreciation_ratio: 0.9,
            acquisition_probability: 0.1,
            acquisitions_per_event: Span::new(1, 5),
            new_asset_value: AmountDistribution::uniform(5_000.0, 100_000.0),
            deactivation_probability: 0.05,
            capitalization_lookback_days: 730,
            post_to_ledger: true,
        }
    }
}

/// Hire and termination settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkforceConfig {
    /// Terminations per month outside peak months.
    pub terminations: Span<u32>,
    /// Terminations per month in peak months.
    pub peak_terminations: Span<u32>,
    /// Calendar months with elevated terminations.
    pub termination_peak_months: Vec<u32>,
    /// Hires per month outside peak months.
    pub hires: Span<u32>,
    /// Hires per month in peak months.
    pub peak_hires: Span<u32>,
    /// Calendar months with elevated hiring.
    pub hire_peak_months: Vec<u32>,
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            terminations: Span::new(1, 4),
            peak_terminations: Span::new(3, 8),
            termination_peak_months: vec![12, 1],
            hires: Span::new(1, 5),
            peak_hires: Span::new(4, 10),
            hire_peak_months: vec![1, 2, 3, 7, 8, 9],
        }
    }
}

/// Deliberate gaps injected into movement rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityConfig {
    /// Share of goods receipts without a batch number.
    pub missing_batch_rate: f64,
    /// Share of goods receipts without a storage location.
    pub missing_location_rate: f64,
}

impl Default for DataQualityConfig {
    fn default() -> Self {
        Self {
            missing_batch_rate: 0.0,
            missing_location_rate: 0.0,
        }
    }
}

/// Complete configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Seed of the random source. `None` draws one from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Preset this configuration was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,

    /// Directory the CSV files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Seasonal profile of the industry, used by the movement streams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,

    /// Date range and fiscal calendar.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Organization settings.
    #[serde(default)]
    pub organization: OrganizationConfig,

    /// Reference table sizes.
    #[serde(default)]
    pub counts: CountsConfig,

    /// Enabled modules.
    #[serde(default)]
    pub modules: ModulesConfig,

    /// Volume model.
    #[serde(default)]
    pub volume: VolumeConfig,

    /// General ledger.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Sales and billing.
    #[serde(default)]
    pub sales: SalesConfig,

    /// Receivables and payables.
    #[serde(default)]
    pub open_items: OpenItemsConfig,

    /// Order fulfillment.
    #[serde(default)]
    pub fulfillment: FulfillmentConfig,

    /// Stock movements.
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Fixed assets.
    #[serde(default)]
    pub assets: AssetConfig,

    /// Workforce movements.
    #[serde(default)]
    pub workforce: WorkforceConfig,

    /// Data quality simulation.
    #[serde(default)]
    pub data_quality: DataQualityConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dataset")
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            seed: None,
            profile: None,
            output_dir: default_output_dir(),
            industry: None,
            calendar: CalendarConfig::default(),
            organization: OrganizationConfig::default(),
            counts: CountsConfig::default(),
            modules: ModulesConfig::default(),
            volume: VolumeConfig::default(),
            ledger: LedgerConfig::default(),
            sales: SalesConfig::default(),
            open_items: OpenItemsConfig::default(),
            fulfillment: FulfillmentConfig::default(),
            inventory: InventoryConfig::default(),
            assets: AssetConfig::default(),
            workforce: WorkforceConfig::default(),
            data_quality: DataQualityConfig::default(),
        }
    }
}

impl FabricConfig {
    /// Build the preset of a profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::SalesPerformance => Self::sales_performance(),
            Profile::FinancialControl => Self::financial_control(),
            Profile::WorkingCapital => Self::working_capital(),
            Profile::Inventory => Self::inventory(),
            Profile::Manufacturing => Self::manufacturing(),
        }
    }

    /// Sales orders with billing, CO-PA and headcount movements.
    pub fn sales_performance() -> Self {
        Self {
            seed: Some(42),
            profile: Some(Profile::SalesPerformance),
            calendar: CalendarConfig {
                start: ymd(2023, 1, 1),
                end: ymd(2024, 12, 31),
                fiscal_start: FiscalYearStart::April,
                business_days_only: false,
            },
            organization: OrganizationConfig {
                chart: ChartStyle::Compact,
                ..Default::default()
            },
            counts: CountsConfig {
                companies: 1,
                cost_centers: 20,
                profit_centers: 10,
                plants: 3,
                materials: 200,
                customers: 50,
                vendors: 0,
                employees: 500,
                assets: 0,
                work_centers_per_plant: 0,
                equipment_per_work_center: 0,
            },
            modules: ModulesConfig {
                sales: true,
                customer_sales_areas: true,
                workforce: true,
                ..Default::default()
            },
            volume: VolumeConfig {
                seasonality: SeasonalityConfig::holiday_peak(),
                month_end: Some(MonthEndBoost {
                    from_day: 28,
                    factor: 1.3,
                }),
                skip_weekends: true,
                jitter: 0.25,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Balanced ledger with open items and fixed assets.
    pub fn financial_control() -> Self {
        Self {
            seed: None,
            profile: Some(Profile::FinancialControl),
            calendar: CalendarConfig {
                start: ymd(2023, 4, 1),
                end: ymd(2024, 3, 31),
                fiscal_start: FiscalYearStart::April,
                business_days_only: false,
            },
            organization: OrganizationConfig {
                local_currencies: vec!["EUR".to_string(), "INR".to_string()],
                ..Default::default()
            },
            counts: CountsConfig {
                companies: 3,
                cost_centers: 30,
                profit_centers: 20,
                plants: 3,
                materials: 3000,
                customers: 1000,
                vendors: 500,
                employees: 0,
                assets: 2000,
                work_centers_per_plant: 0,
                equipment_per_work_center: 0,
            },
            modules: ModulesConfig {
                general_ledger: true,
                opening_balances: true,
                open_items: true,
                assets: true,
                asset_values: true,
                ..Default::default()
            },
            volume: VolumeConfig {
                seasonality: SeasonalityConfig::sinusoidal(0.2),
                month_end: Some(MonthEndBoost {
                    from_day: 26,
                    factor: 1.2,
                }),
                skip_weekends: true,
                jitter: 0.05,
                ..Default::default()
            },
            assets: AssetConfig {
                acquisition_probability: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Growth-adjusted ledger, aging, stock and asset movements.
    pub fn working_capital() -> Self {
        Self {
            seed: None,
            profile: Some(Profile::WorkingCapital),
            calendar: CalendarConfig {
                start: ymd(2023, 4, 1),
                end: ymd(2025, 3, 31),
                fiscal_start: FiscalYearStart::April,
                business_days_only: false,
            },
            organization: OrganizationConfig {
                chart: ChartStyle::Ranged {
                    accounts_per_subgroup: 30,
                },
                controlling_area: "CA01".to_string(),
                storage_locations: vec!["SL01".to_string(), "SL02".to_string()],
                ..Default::default()
            },
            counts: CountsConfig {
                companies: 3,
                cost_centers: 150,
                profit_centers: 70,
                plants: 1,
                materials: 1000,
                customers: 7000,
                vendors: 1500,
                employees: 0,
                assets: 3000,
                work_centers_per_plant: 0,
                equipment_per_work_center: 0,
            },
            modules: ModulesConfig {
                general_ledger: true,
                open_items: true,
                inventory: true,
                storage_stock: true,
                stock_balances: true,
                assets: true,
                asset_values: true,
                ..Default::default()
            },
            volume: VolumeConfig {
                seasonality: SeasonalityConfig::fiscal_close(),
                annual_growth: Some(Span::new(0.08, 0.12)),
                month_end: None,
                skip_weekends: false,
                weekend_factor: 0.2,
                jitter: 0.1,
            },
            open_items: OpenItemsConfig {
                receivables: OpenItemStream {
                    items_per_day: 30.0,
                    amount: AmountDistribution::uniform(500.0, 50_000.0),
                    policy: ClearingPolicy {
                        clear_probability: 0.95,
                        target_days: 45.0,
                        delay_std_dev: 8.0,
                        min_delay_days: 5,
                        due_days_offset: Span::new(-5, 5),
                    },
                },
                payables: OpenItemStream {
                    items_per_day: 20.0,
                    amount: AmountDistribution::uniform(100.0, 20_000.0),
                    policy: ClearingPolicy {
                        clear_probability: 0.95,
                        target_days: 55.0,
                        delay_std_dev: 8.0,
                        min_delay_days: 5,
                        due_days_offset: Span::new(-5, 5),
                    },
                },
            },
            inventory: InventoryConfig {
                movements_per_day: 80.0,
                ..Default::default()
            },
            assets: AssetConfig {
                capitalization_lookback_days: 730,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Goods movements and fulfillment chains for one industry.
    pub fn inventory() -> Self {
        Self {
            seed: Some(42),
            profile: Some(Profile::Inventory),
            industry: Some(Industry::Manufacturing),
            calendar: CalendarConfig {
                start: ymd(2023, 1, 1),
                end: ymd(2024, 12, 31),
                fiscal_start: FiscalYearStart::January,
                business_days_only: true,
            },
            counts: CountsConfig {
                companies: 1,
                cost_centers: 0,
                profit_centers: 0,
                plants: 5,
                materials: 1500,
                customers: 5000,
                vendors: 0,
                employees: 0,
                assets: 0,
                work_centers_per_plant: 0,
                equipment_per_work_center: 0,
            },
            modules: ModulesConfig {
                fulfillment: true,
                inventory: true,
                storage_stock: true,
                stock_balances: true,
                ..Default::default()
            },
            volume: VolumeConfig {
                seasonality: SeasonalityConfig::for_industry(Industry::Manufacturing),
                skip_weekends: true,
                jitter: 0.33,
                ..Default::default()
            },
            inventory: InventoryConfig {
                movements_per_day: 15.0,
                mix: MovementMix {
                    receipt: 1.0,
                    sales_issue: 0.0,
                    production_issue: 0.0,
                    transfer: 0.0,
                },
                receipt_quantity: Span::new(50, 500),
                yield_loss: Some(Span::new(0.0, 0.1)),
                ..Default::default()
            },
            fulfillment: FulfillmentConfig {
                orders_per_day: 22.0,
                ..Default::default()
            },
            data_quality: DataQualityConfig {
                missing_batch_rate: 0.05,
                missing_location_rate: 0.03,
            },
            ..Default::default()
        }
    }

    /// Manufacturing master data.
    pub fn manufacturing() -> Self {
        Self {
            seed: None,
            profile: Some(Profile::Manufacturing),
            industry: Some(Industry::Manufacturing),
            calendar: CalendarConfig {
                start: ymd(2023, 4, 1),
                end: ymd(2025, 3, 31),
                fiscal_start: FiscalYearStart::April,
                business_days_only: false,
            },
            counts: CountsConfig {
                companies: 1,
                cost_centers: 0,
                profit_centers: 0,
                plants: 3,
                materials: 750,
                customers: 0,
                vendors: 75,
                employees: 750,
                assets: 0,
                work_centers_per_plant: 30,
                equipment_per_work_center: 10,
            },
            ..Default::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the date range.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.calendar.start = start;
        self.calendar.end = end;
        self
    }

    /// Scale reference table sizes and daily volumes by `factor`.
    ///
    /// Company and plant counts are structural and stay unchanged; every
    /// non-empty table keeps at least one row.
    pub fn scaled(mut self, factor: f64) -> Self {
        self.counts = self.counts.scaled(factor);
        self.ledger.postings_per_day *= factor;
        self.sales.orders_per_day *= factor;
        self.open_items.receivables.items_per_day *= factor;
        self.open_items.payables.items_per_day *= factor;
        self.fulfillment.orders_per_day *= factor;
        self.inventory.movements_per_day *= factor;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> FabricResult<Self> {
        let config: Self = toml::from_str(s)?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> FabricResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        config.validate().map_err(FabricError::Config)?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> FabricResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), String> {
        let cal = &self.calendar;
        if cal.end < cal.start {
            return Err(format!(
                "calendar end {} is before start {}",
                cal.end, cal.start
            ));
        }

        let org = &self.organization;
        if org.group_currency.is_empty() {
            return Err("organization.group_currency must not be empty".to_string());
        }
        if self.counts.companies > 1 && org.local_currencies.is_empty() {
            return Err(
                "organization.local_currencies must not be empty with more than one company"
                    .to_string(),
            );
        }
        if self.counts.plants > 0
            && self.modules.storage_stock
            && org.locations_per_plant > org.storage_locations.len()
        {
            return Err(format!(
                "organization.locations_per_plant ({}) exceeds the {} storage locations",
                org.locations_per_plant,
                org.storage_locations.len()
            ));
        }
        if let ChartStyle::Ranged {
            accounts_per_subgroup,
        } = org.chart
        {
            if accounts_per_subgroup == 0 {
                return Err("chart.accounts_per_subgroup must be at least 1".to_string());
            }
        }

        let vol = &self.volume;
        vol.seasonality.validate()?;
        if let Some(growth) = vol.annual_growth {
            growth.validate("volume.annual_growth")?;
        }
        if let Some(boost) = vol.month_end {
            if !(1..=31).contains(&boost.from_day) {
                return Err(format!(
                    "volume.month_end.from_day must be within 1-31, got {}",
                    boost.from_day
                ));
            }
            check_non_negative("volume.month_end.factor", boost.factor)?;
        }
        check_non_negative("volume.weekend_factor", vol.weekend_factor)?;
        if !(0.0..1.0).contains(&vol.jitter) {
            return Err(format!(
                "volume.jitter must be within [0, 1), got {}",
                vol.jitter
            ));
        }

        let ledger = &self.ledger;
        check_non_negative("ledger.postings_per_day", ledger.postings_per_day)?;
        let scenarios = [
            ("ledger.revenue", &ledger.revenue),
            ("ledger.expense", &ledger.expense),
            ("ledger.cost_of_sales", &ledger.cost_of_sales),
            ("ledger.cash_transfer", &ledger.cash_transfer),
        ];
        for (name, scenario) in scenarios {
            check_non_negative(name, scenario.weight)?;
            scenario.amount.validate()?;
        }
        if self.modules.general_ledger && scenarios.iter().all(|(_, s)| s.weight == 0.0) {
            return Err("ledger scenario weights must not all be zero".to_string());
        }
        ledger.opening_asset_amount.validate()?;
        ledger.opening_liability_amount.validate()?;

        let sales = &self.sales;
        check_non_negative("sales.orders_per_day", sales.orders_per_day)?;
        sales.quantity.validate("sales.quantity")?;
        sales.markup.validate("sales.markup")?;
        sales
            .requested_delivery_days
            .validate("sales.requested_delivery_days")?;
        check_probability("sales.billing_probability", sales.billing_probability)?;
        sales.billing_delay_days.validate("sales.billing_delay_days")?;
        check_non_negative("sales.tax_rate", sales.tax_rate)?;
        sales.cogs_ratio.validate("sales.cogs_ratio")?;
        sales.marketing_ratio.validate("sales.marketing_ratio")?;
        sales.sales_cost_ratio.validate("sales.sales_cost_ratio")?;
        sales.monthly_opex.validate()?;

        for (name, stream) in [
            ("open_items.receivables", &self.open_items.receivables),
            ("open_items.payables", &self.open_items.payables),
        ] {
            check_non_negative(name, stream.items_per_day)?;
            stream.amount.validate()?;
            stream.policy.validate(name)?;
        }

        let ful = &self.fulfillment;
        check_non_negative("fulfillment.orders_per_day", ful.orders_per_day)?;
        ful.items_per_order.validate("fulfillment.items_per_order")?;
        ful.quantity.validate("fulfillment.quantity")?;
        ful.delivery_lag_days.validate("fulfillment.delivery_lag_days")?;
        check_non_negative("fulfillment.price_markup", ful.price_markup)?;
        let w = ful.outcomes;
        for (name, weight) in [
            ("fulfillment.outcomes.complete", w.complete),
            ("fulfillment.outcomes.partial", w.partial),
            ("fulfillment.outcomes.backorder", w.backorder),
        ] {
            check_non_negative(name, weight)?;
        }
        if self.modules.fulfillment && w.complete + w.partial + w.backorder <= 0.0 {
            return Err("fulfillment outcome weights must not all be zero".to_string());
        }

        let inv = &self.inventory;
        check_non_negative("inventory.movements_per_day", inv.movements_per_day)?;
        let mix = inv.mix;
        for (name, weight) in [
            ("inventory.mix.receipt", mix.receipt),
            ("inventory.mix.sales_issue", mix.sales_issue),
            ("inventory.mix.production_issue", mix.production_issue),
            ("inventory.mix.transfer", mix.transfer),
        ] {
            check_non_negative(name, weight)?;
        }
        if self.modules.inventory
            && mix.receipt + mix.sales_issue + mix.production_issue + mix.transfer <= 0.0
        {
            return Err("inventory movement weights must not all be zero".to_string());
        }
        if (self.modules.inventory || self.modules.fulfillment) && org.storage_locations.is_empty()
        {
            return Err(
                "goods movements need at least one entry in organization.storage_locations"
                    .to_string(),
            );
        }
        if self.modules.inventory && mix.transfer > 0.0 && org.storage_locations.len() < 2 {
            return Err("inventory transfers need at least two storage locations".to_string());
        }
        inv.receipt_quantity.validate("inventory.receipt_quantity")?;
        inv.issue_quantity.validate("inventory.issue_quantity")?;
        if let Some(loss) = inv.yield_loss {
            loss.validate("inventory.yield_loss")?;
            check_probability("inventory.yield_loss.min", loss.min)?;
            check_probability("inventory.yield_loss.max", loss.max)?;
        }

        let assets = &self.assets;
        if !(1..=28).contains(&assets.depreciation_day) {
            return Err(format!(
                "assets.depreciation_day must be within 1-28, got {}",
                assets.depreciation_day
            ));
        }
        assets.acquisition_value.validate()?;
        assets.new_asset_value.validate()?;
        check_non_negative("assets.acquisition_floor", assets.acquisition_floor)?;
        check_probability("assets.max_depreciation_ratio", assets.max_depreciation_ratio)?;
        check_probability(
            "assets.acquisition_probability",
            assets.acquisition_probability,
        )?;
        check_probability(
            "assets.deactivation_probability",
            assets.deactivation_probability,
        )?;
        assets
            .acquisitions_per_event
            .validate("assets.acquisitions_per_event")?;

        let wf = &self.workforce;
        wf.terminations.validate("workforce.terminations")?;
        wf.peak_terminations.validate("workforce.peak_terminations")?;
        wf.hires.validate("workforce.hires")?;
        wf.peak_hires.validate("workforce.peak_hires")?;
        if let Some(m) = wf
            .termination_peak_months
            .iter()
            .chain(&wf.hire_peak_months)
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(format!("workforce peak month {m} is not a calendar month"));
        }

        check_probability(
            "data_quality.missing_batch_rate",
            self.data_quality.missing_batch_rate,
        )?;
        check_probability(
            "data_quality.missing_location_rate",
            self.data_quality.missing_location_rate,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_profile_validates() {
        for profile in Profile::ALL {
            let config = FabricConfig::for_profile(profile);
            assert_eq!(config.profile, Some(profile));
            config
                .validate()
                .unwrap_or_else(|e| panic!("{profile}: {e}"));
        }
    }

    #[test]
    fn test_seeded_profiles() {
        assert_eq!(FabricConfig::sales_performance().seed, Some(42));
        assert_eq!(FabricConfig::inventory().seed, Some(42));
        assert_eq!(FabricConfig::financial_control().seed, None);
        assert_eq!(FabricConfig::working_capital().seed, None);
        assert_eq!(FabricConfig::manufacturing().seed, None);
    }

    #[test]
    fn test_toml_roundtrip_preserves_profile() {
        let config = FabricConfig::working_capital().with_seed(Some(7));
        let text = config.to_toml_string().unwrap();
        let parsed = FabricConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            seed = 9

            [calendar]
            start = "2023-04-01"
            end = "2023-04-30"
            fiscal_start = "april"

            [counts]
            customers = 5
        "#;
        let config = FabricConfig::from_toml_str(text).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.calendar.fiscal_start, FiscalYearStart::April);
        assert!(!config.calendar.business_days_only);
        assert_eq!(config.counts.customers, 5);
        assert_eq!(config.counts.materials, CountsConfig::default().materials);
        assert_eq!(config.output_dir, PathBuf::from("dataset"));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = FabricConfig::default();
        config.calendar.end = ymd(2022, 1, 1);
        assert!(config.validate().is_err());

        let mut config = FabricConfig::default();
        config.volume.jitter = 1.0;
        assert!(config.validate().is_err());

        let mut config = FabricConfig::default();
        config.sales.billing_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = FabricConfig::default();
        config.modules.general_ledger = true;
        for s in [
            &mut config.ledger.revenue,
            &mut config.ledger.expense,
            &mut config.ledger.cost_of_sales,
            &mut config.ledger.cash_transfer,
        ] {
            s.weight = 0.0;
        }
        assert!(config.validate().is_err());

        let mut config = FabricConfig::working_capital();
        config.organization.storage_locations.truncate(1);
        assert!(config.validate().is_err());

        let mut config = FabricConfig::default();
        config.workforce.hire_peak_months.push(13);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_goods_movements_need_storage_locations() {
        let mut config = FabricConfig::inventory();
        config.organization.storage_locations.clear();
        config.organization.locations_per_plant = 0;
        config.inventory.mix.transfer = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("storage_locations"), "{err}");

        config.modules.inventory = false;
        config.modules.fulfillment = true;
        assert!(config.validate().is_err());

        config.modules.fulfillment = false;
        config.modules.storage_stock = false;
        config.modules.stock_balances = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_names_parse() {
        for profile in Profile::ALL {
            assert_eq!(profile.name().parse::<Profile>().unwrap(), profile);
        }
        assert!("ceo".parse::<Profile>().is_err());
    }

    #[test]
    fn test_scaled_keeps_structure() {
        let config = FabricConfig::working_capital().scaled(0.01);
        assert_eq!(config.counts.companies, 3);
        assert_eq!(config.counts.plants, 1);
        assert_eq!(config.counts.customers, 70);
        assert_eq!(config.counts.employees, 0);
        assert!(config.ledger.postings_per_day < 3.0);
    }
}
