//! Derived tables folded from the transaction streams.
//!
//! Everything here is a pure function of reference rows and transactions:
//! running balances, the storage stock snapshot with per-period balances,
//! and yearly asset values.

use std::collections::{BTreeMap, HashMap};

use crate::calendar::{fiscal_year, fiscal_year_bounds, FiscalYearStart};
use crate::fabric::opening_depreciation;
use crate::models::{
    Asset, AssetMovement, AssetMovementType, AssetValue, Company, MaterialMovement,
    StockPeriodBalance, StorageStock,
};
use crate::random::round_cents;
use crate::registry::{AssetNumber, MaterialId, PlantId};

/// Running balances per key.
///
/// The balance after a sequence of postings is the opening amount plus the
/// sum of every delta, whatever order the deltas arrive in.
#[derive(Debug, Clone)]
pub struct BalanceLedger<K> {
    balances: BTreeMap<K, f64>,
}

impl<K: Ord> Default for BalanceLedger<K> {
    fn default() -> Self {
        Self {
            balances: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> BalanceLedger<K> {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the opening amount of a key.
    pub fn open(&mut self, key: K, amount: f64) {
        self.balances.insert(key, amount);
    }

    /// Apply a delta and return the new balance. Unknown keys open at zero.
    pub fn post(&mut self, key: K, delta: f64) -> f64 {
        let balance = self.balances.entry(key).or_insert(0.0);
        *balance += delta;
        *balance
    }

    /// Current balance; zero for keys never seen.
    pub fn balance(&self, key: &K) -> f64 {
        self.balances.get(key).copied().unwrap_or(0.0)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether no key has been opened or posted.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Keys and balances in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.balances.iter().map(|(k, v)| (k, *v))
    }
}

/// Material, plant and storage location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StockKey {
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Storage location.
    pub storage_location: String,
}

impl StockKey {
    fn of_stock(row: &StorageStock) -> Self {
        Self {
            material_id: row.material_id.clone(),
            plant_id: row.plant_id.clone(),
            storage_location: row.storage_location.clone(),
        }
    }

    fn of_movement(row: &MaterialMovement) -> Option<Self> {
        Some(Self {
            material_id: row.material_id.clone(),
            plant_id: row.plant_id.clone(),
            storage_location: row.storage_location.clone()?,
        })
    }
}

/// Storage stock after all movements, plus one balance row per key and
/// fiscal period with activity.
#[derive(Debug, Clone, Default)]
pub struct StockFold {
    /// Final stock per key.
    pub snapshot: Vec<StorageStock>,
    /// Per-period balances.
    pub period_balances: Vec<StockPeriodBalance>,
}

#[derive(Debug, Clone, Copy, Default)]
struct PeriodFlow {
    receipts: f64,
    issues: f64,
}

/// Fold movements into the initial storage stock.
///
/// Movements without a storage location cannot be placed and are left out.
/// With `simulate_stockouts`, negative unrestricted stock is moved into
/// blocked stock.
pub fn fold_stock(
    initial: &[StorageStock],
    movements: &[MaterialMovement],
    simulate_stockouts: bool,
) -> StockFold {
    let mut ledger = BalanceLedger::new();
    let mut rows: BTreeMap<StockKey, StorageStock> = BTreeMap::new();
    for row in initial {
        let key = StockKey::of_stock(row);
        ledger.open(key.clone(), row.unrestricted_stock);
        rows.insert(key, row.clone());
    }

    let mut flows: BTreeMap<StockKey, BTreeMap<(i32, u32), PeriodFlow>> = BTreeMap::new();
    for movement in movements {
        let Some(key) = StockKey::of_movement(movement) else {
            continue;
        };
        let quantity = movement.quantity as f64;
        ledger.post(key.clone(), quantity);
        let flow = flows
            .entry(key.clone())
            .or_default()
            .entry((movement.fiscal_year, movement.fiscal_period))
            .or_default();
        if quantity >= 0.0 {
            flow.receipts += quantity;
        } else {
            flow.issues -= quantity;
        }
        rows.entry(key).or_insert_with(|| StorageStock {
            material_id: movement.material_id.clone(),
            plant_id: movement.plant_id.clone(),
            storage_location: movement.storage_location.clone().unwrap_or_default(),
            unrestricted_stock: 0.0,
            quality_inspection: 0.0,
            blocked_stock: 0.0,
            safety_stock: 0.0,
            last_count_date: None,
        });
    }

    let mut period_balances = Vec::new();
    for (key, periods) in &flows {
        let mut running = rows.get(key).map_or(0.0, |r| r.unrestricted_stock);
        for (&(fiscal_year, fiscal_period), flow) in periods {
            let closing = running + flow.receipts - flow.issues;
            period_balances.push(StockPeriodBalance {
                material_id: key.material_id.clone(),
                plant_id: key.plant_id.clone(),
                storage_location: key.storage_location.clone(),
                fiscal_year,
                fiscal_period,
                opening_quantity: running,
                receipts: flow.receipts,
                issues: flow.issues,
                closing_quantity: closing,
            });
            running = closing;
        }
    }

    let snapshot = rows
        .into_iter()
        .map(|(key, mut row)| {
            row.unrestricted_stock = ledger.balance(&key);
            if simulate_stockouts && row.unrestricted_stock < 0.0 {
                row.blocked_stock -= row.unrestricted_stock;
                row.unrestricted_stock = 0.0;
            }
            row
        })
        .collect();

    StockFold {
        snapshot,
        period_balances,
    }
}

/// One value row per asset and fiscal year in which the asset was in service
/// between `start` and `end`.
pub fn asset_values(
    assets: &[Asset],
    movements: &[AssetMovement],
    companies: &[Company],
    (start, end): (chrono::NaiveDate, chrono::NaiveDate),
    fiscal_start: FiscalYearStart,
    max_depreciation_ratio: f64,
) -> Vec<AssetValue> {
    let mut posted: HashMap<&AssetNumber, BTreeMap<i32, f64>> = HashMap::new();
    for m in movements
        .iter()
        .filter(|m| m.movement_type == AssetMovementType::Depreciation)
    {
        *posted
            .entry(&m.asset_number)
            .or_default()
            .entry(m.fiscal_year)
            .or_default() -= m.ordinary_depreciation;
    }
    let currency: HashMap<_, _> = companies
        .iter()
        .map(|c| (&c.company_code, c.currency.as_str()))
        .collect();

    let first_year = fiscal_year(start, fiscal_start);
    let last_year = fiscal_year(end, fiscal_start);
    let mut rows = Vec::new();
    for asset in assets {
        let opening = opening_depreciation(asset, start, max_depreciation_ratio);
        let by_year = posted.get(&asset.asset_number);
        for year in first_year..=last_year {
            let Some((year_start, year_end)) = fiscal_year_bounds(year, fiscal_start) else {
                continue;
            };
            let retired_before = asset.deactivation_date.is_some_and(|d| d < year_start);
            if asset.capitalization_date > year_end || retired_before {
                continue;
            }
            let accumulated = opening
                + by_year.map_or(0.0, |years| years.range(..=year).map(|(_, v)| v).sum());
            let accumulated = round_cents(accumulated);
            rows.push(AssetValue {
                company_code: asset.company_code.clone(),
                asset_number: asset.asset_number.clone(),
                sub_number: asset.sub_number,
                fiscal_year: year,
                acquisition_value: asset.acquisition_value,
                accumulated_depreciation: accumulated,
                net_book_value: round_cents((asset.acquisition_value - accumulated).max(0.0)),
                currency: currency
                    .get(&asset.company_code)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }
    rows
}
