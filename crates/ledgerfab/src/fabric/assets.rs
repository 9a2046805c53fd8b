//! Fixed asset depreciation and acquisitions.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::ledger::{Journal, Leg, Posting};
use super::reference::{new_asset, ReferenceData};
use crate::calendar::{CalendarDay, FiscalPosition, FiscalYearStart};
use crate::config::AssetConfig;
use crate::error::FabricResult;
use crate::models::{AccountRole, Asset, AssetClass, AssetMovement, AssetMovementType, DocumentType};
use crate::random::{round_cents, FabricRng};
use crate::registry::{AssetNumber, CompanyCode, ReferenceTable};

/// Whole months from `from` to `to`, never negative.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months =
        i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month());
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0)
}

/// Straight-line monthly depreciation of an asset.
pub fn monthly_depreciation(asset: &Asset) -> f64 {
    round_cents(asset.acquisition_value * asset.asset_class.annual_rate() / 12.0)
}

/// Depreciation accumulated before `as_of`, capped at `max_ratio` of the
/// acquisition value.
pub fn opening_depreciation(asset: &Asset, as_of: NaiveDate, max_ratio: f64) -> f64 {
    let until = asset
        .deactivation_date
        .map_or(as_of, |d| d.min(as_of));
    let months = months_between(asset.capitalization_date, until) as f64;
    round_cents((monthly_depreciation(asset) * months).min(asset.acquisition_value * max_ratio))
}

/// Posts monthly depreciation and occasional acquisitions.
#[derive(Debug)]
pub struct AssetSynthesizer<'a> {
    config: &'a AssetConfig,
    reference: &'a ReferenceData,
    fiscal_start: FiscalYearStart,
    post_to_ledger: bool,
    accumulated: HashMap<AssetNumber, f64>,
    last_run: Option<(i32, u32)>,
    next_movement: u64,
}

impl<'a> AssetSynthesizer<'a> {
    /// Create a synthesizer and seed accumulated depreciation of `assets`
    /// up to `start`.
    pub fn new(
        config: &'a AssetConfig,
        reference: &'a ReferenceData,
        assets: &[Asset],
        start: NaiveDate,
        fiscal_start: FiscalYearStart,
    ) -> Self {
        let accounts = reference.accounts();
        let has_accounts = accounts.has(AccountRole::DepreciationExpense)
            && accounts.has(AccountRole::AccumulatedDepreciation);
        if config.post_to_ledger && !has_accounts {
            warn!("Chart has no depreciation accounts, depreciation stays off the ledger");
        }
        let accumulated = assets
            .iter()
            .map(|a| {
                (
                    a.asset_number.clone(),
                    opening_depreciation(a, start, config.max_depreciation_ratio),
                )
            })
            .collect();
        Self {
            config,
            reference,
            fiscal_start,
            post_to_ledger: config.post_to_ledger && has_accounts,
            accumulated,
            last_run: None,
            next_movement: 1,
        }
    }

    /// Run the monthly cycle on the first day of a month on or after the
    /// depreciation day. Other days are a no-op.
    pub fn post_day(
        &mut self,
        day: &CalendarDay,
        assets: &mut Vec<Asset>,
        movements: &mut Vec<AssetMovement>,
        journal: Option<&mut Journal>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let date = day.date_key;
        let month = (date.year(), date.month());
        if date.day() < self.config.depreciation_day || self.last_run == Some(month) {
            return Ok(());
        }
        self.last_run = Some(month);

        let before = movements.len();
        let totals = self.depreciate(date, assets, movements);
        if let Some(journal) = journal.filter(|_| self.post_to_ledger) {
            self.post_depreciation(date, &totals, journal, rng)?;
        }
        if rng.chance(self.config.acquisition_probability) {
            self.acquire(date, assets, movements, rng)?;
        }
        debug!(date = %date, movements = movements.len() - before, "Asset cycle");
        Ok(())
    }

    fn movement(
        &mut self,
        asset: &Asset,
        date: NaiveDate,
        movement_type: AssetMovementType,
        acquisition_value: f64,
        depreciation: f64,
    ) -> AssetMovement {
        let position = FiscalPosition::of(date, self.fiscal_start);
        let id = self.next_movement;
        self.next_movement += 1;
        AssetMovement {
            asset_movement_id: id,
            asset_number: asset.asset_number.clone(),
            sub_number: asset.sub_number,
            company_code: asset.company_code.clone(),
            fiscal_year: position.fiscal_year,
            fiscal_period: position.fiscal_period,
            depreciation_area: "01",
            posting_date: date,
            acquisition_value,
            ordinary_depreciation: -depreciation,
            movement_type,
        }
    }

    fn depreciate(
        &mut self,
        date: NaiveDate,
        assets: &[Asset],
        movements: &mut Vec<AssetMovement>,
    ) -> BTreeMap<CompanyCode, f64> {
        let mut totals: BTreeMap<CompanyCode, f64> = BTreeMap::new();
        for asset in assets.iter().filter(|a| a.is_active_on(date)) {
            let cap = asset.acquisition_value * self.config.max_depreciation_ratio;
            let done = self
                .accumulated
                .get(&asset.asset_number)
                .copied()
                .unwrap_or(0.0);
            let amount = round_cents(monthly_depreciation(asset).min(cap - done));
            if amount <= 0.0 {
                continue;
            }
            self.accumulated
                .insert(asset.asset_number.clone(), done + amount);
            *totals.entry(asset.company_code.clone()).or_default() += amount;
            let row = self.movement(asset, date, AssetMovementType::Depreciation, 0.0, amount);
            movements.push(row);
        }
        totals
    }

    fn post_depreciation(
        &self,
        date: NaiveDate,
        totals: &BTreeMap<CompanyCode, f64>,
        journal: &mut Journal,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let accounts = self.reference.accounts();
        let reference = format!("DEP_{:04}{:02}", date.year(), date.month());
        for (code, amount) in totals {
            let Some(company) = self.reference.company(code) else {
                continue;
            };
            journal.post(Posting {
                company,
                date,
                document_type: DocumentType::Depreciation,
                debit: Leg::account(accounts.pick(AccountRole::DepreciationExpense, rng)?),
                credit: Leg::account(accounts.pick(AccountRole::AccumulatedDepreciation, rng)?),
                amount: *amount,
                reference: Some(reference.clone()),
                text: "Monthly depreciation",
            });
        }
        Ok(())
    }

    fn acquire(
        &mut self,
        date: NaiveDate,
        assets: &mut Vec<Asset>,
        movements: &mut Vec<AssetMovement>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let cfg = self.config;
        let count = rng.range(cfg.acquisitions_per_event.min..=cfg.acquisitions_per_event.max);
        for _ in 0..count {
            let company = rng.pick(&self.reference.companies, ReferenceTable::Company)?;
            let class = rng
                .choose(&AssetClass::ALL)
                .unwrap_or(AssetClass::Machinery);
            let value = rng.amount(&cfg.new_asset_value, cfg.acquisition_floor);
            let asset = new_asset(
                assets.len() + 1,
                company.company_code.clone(),
                class,
                date,
                value,
            );
            self.accumulated.insert(asset.asset_number.clone(), 0.0);
            let row = self.movement(&asset, date, AssetMovementType::Acquisition, value, 0.0);
            movements.push(row);
            assets.push(asset);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FabricConfig, Profile};
    use crate::fabric::ReferenceDataBuilder;
    use approx::assert_abs_diff_eq;
    use chrono::Duration;
    use std::collections::HashSet;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn asset(value: f64, class: AssetClass, capitalized: NaiveDate) -> Asset {
        new_asset(1, CompanyCode::new("CO01"), class, capitalized, value)
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(ymd(2023, 1, 15), ymd(2023, 3, 15)), 2);
        assert_eq!(months_between(ymd(2023, 1, 15), ymd(2023, 3, 14)), 1);
        assert_eq!(months_between(ymd(2023, 5, 1), ymd(2023, 3, 1)), 0);
    }

    #[test]
    fn test_opening_depreciation_is_capped() {
        let a = asset(12_000.0, AssetClass::Computer, ymd(2010, 1, 1));
        assert_abs_diff_eq!(
            opening_depreciation(&a, ymd(2023, 1, 1), 0.9),
            10_800.0,
            epsilon = 1e-9
        );
        let b = asset(12_000.0, AssetClass::Computer, ymd(2022, 1, 1));
        assert_abs_diff_eq!(
            opening_depreciation(&b, ymd(2023, 1, 1), 0.9),
            3_000.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_depreciation_never_exceeds_cap() {
        let config = FabricConfig::for_profile(Profile::FinancialControl).scaled(0.01);
        let data = ReferenceData::default();
        let mut assets = vec![asset(1_200.0, AssetClass::Computer, ymd(2021, 1, 1))];
        let start = ymd(2023, 1, 1);
        let mut synth =
            AssetSynthesizer::new(&config.assets, &data, &assets, start, FiscalYearStart::January);
        let mut movements = Vec::new();
        let mut rng = FabricRng::seeded(1);

        let mut date = start;
        while date < ymd(2025, 1, 1) {
            let day = CalendarDay::new(date, FiscalYearStart::January);
            synth
                .post_day(&day, &mut assets, &mut movements, None, &mut rng)
                .unwrap();
            date += Duration::days(1);
        }

        let posted: f64 = movements.iter().map(|m| -m.ordinary_depreciation).sum();
        let opening = opening_depreciation(&assets[0], start, 0.9);
        assert_abs_diff_eq!(opening, 600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(opening + posted, 1_080.0, epsilon = 1e-6);
        assert!(movements.iter().all(|m| m.posting_date.day() == 15));
    }

    #[test]
    fn test_acquisitions_extend_asset_table() {
        let mut config = FabricConfig::for_profile(Profile::WorkingCapital).scaled(0.01);
        config.assets.acquisition_probability = 1.0;
        let mut rng = FabricRng::seeded(4);
        let mut data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();
        let mut assets = std::mem::take(&mut data.assets);
        let initial = assets.len();
        let start = config.calendar.start;
        let mut synth = AssetSynthesizer::new(
            &config.assets,
            &data,
            &assets,
            start,
            config.calendar.fiscal_start,
        );
        let mut movements = Vec::new();
        let mut journal = Journal::new(config.calendar.fiscal_start, "USD");
        let day = CalendarDay::new(ymd(2023, 4, 17), config.calendar.fiscal_start);
        synth
            .post_day(&day, &mut assets, &mut movements, Some(&mut journal), &mut rng)
            .unwrap();

        let acquired = movements
            .iter()
            .filter(|m| m.movement_type == AssetMovementType::Acquisition)
            .count();
        assert!(acquired >= 1);
        assert_eq!(assets.len(), initial + acquired);
        let ids: HashSet<_> = assets.iter().map(|a| &a.asset_number).collect();
        assert_eq!(ids.len(), assets.len());
        assert!(journal
            .headers()
            .iter()
            .all(|h| h.document_type == DocumentType::Depreciation));
        assert!(journal.document_count() <= data.companies.len());

        // a second day in the same month does nothing
        let again = CalendarDay::new(ymd(2023, 4, 18), config.calendar.fiscal_start);
        let count = movements.len();
        synth
            .post_day(&again, &mut assets, &mut movements, None, &mut rng)
            .unwrap();
        assert_eq!(movements.len(), count);
    }
}
