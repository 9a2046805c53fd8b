//! Daily event volumes.
//!
//! The number of events a stream emits on a day is
//! `round(base_rate × seasonal × growth × month_end × weekend × jitter)`.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::calendar::{CalendarDay, FiscalCalendar};
use crate::config::{Span, VolumeConfig};
use crate::random::FabricRng;

/// Industry flag selecting a seasonal profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    /// Q4 peak with a summer slowdown.
    Manufacturing,
    /// Q4 peak with a December spike.
    Retail,
    /// Q4 peak only.
    Healthcare,
}

/// Seasonal factor per calendar month, January first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityConfig {
    /// Multipliers for months 1-12.
    pub factors: [f64; 12],
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self::flat()
    }
}

impl SeasonalityConfig {
    /// No seasonal variation.
    pub fn flat() -> Self {
        Self { factors: [1.0; 12] }
    }

    /// High November and December, low summer.
    pub fn holiday_peak() -> Self {
        let mut factors = [1.0; 12];
        factors[10] = 1.43;
        factors[11] = 1.43;
        factors[5..8].fill(0.64);
        Self { factors }
    }

    /// `1 + amplitude × sin(month × π / 6)`.
    pub fn sinusoidal(amplitude: f64) -> Self {
        let mut factors = [1.0; 12];
        for (i, f) in factors.iter_mut().enumerate() {
            *f = 1.0 + amplitude * ((i + 1) as f64 * PI / 6.0).sin();
        }
        Self { factors }
    }

    /// Calendar Q4 peak followed by a stronger fiscal year-end close in
    /// January to March.
    pub fn fiscal_close() -> Self {
        let mut factors = [1.0; 12];
        factors[..3].fill(1.35);
        factors[9..].fill(1.25);
        Self { factors }
    }

    /// Seasonal profile of an industry.
    pub fn for_industry(industry: Industry) -> Self {
        let mut factors = [1.0; 12];
        factors[9..].fill(1.3);
        match industry {
            Industry::Manufacturing => {
                factors[6] = 0.8;
                factors[7] = 0.8;
            }
            Industry::Retail => factors[11] = 1.5,
            Industry::Healthcare => {}
        }
        Self { factors }
    }

    /// Factor for a calendar month (1-12).
    pub fn factor(&self, month: u32) -> f64 {
        self.factors[((month.clamp(1, 12)) - 1) as usize]
    }

    /// Check every factor is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        match self.factors.iter().position(|f| !f.is_finite() || *f < 0.0) {
            Some(i) => Err(format!(
                "seasonal factor for month {} must be >= 0, got {}",
                i + 1,
                self.factors[i]
            )),
            None => Ok(()),
        }
    }
}

/// Boost applied late in each month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthEndBoost {
    /// Day of month from which the boost applies.
    pub from_day: u32,
    /// Multiplier.
    pub factor: f64,
}

/// Per-run volume model shared by every stream.
#[derive(Debug, Clone)]
pub struct VolumeModel {
    config: VolumeConfig,
    start: chrono::NaiveDate,
    growth_rate: f64,
}

impl VolumeModel {
    /// Create the model, drawing the annual growth rate once for the run.
    pub fn new(config: &VolumeConfig, calendar: &FiscalCalendar, rng: &mut FabricRng) -> Self {
        let growth_rate = match config.annual_growth {
            Some(Span { min, max }) => rng.uniform(min, max),
            None => 0.0,
        };
        Self {
            config: config.clone(),
            start: calendar.start(),
            growth_rate,
        }
    }

    /// Annual growth rate drawn for this run.
    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    /// Whether the stream is silent on this day.
    pub fn skips(&self, day: &CalendarDay) -> bool {
        day.is_weekend && self.config.skip_weekends
    }

    /// Deterministic part of the multiplier (everything except jitter).
    pub fn base_multiplier(&self, day: &CalendarDay) -> f64 {
        if self.skips(day) {
            return 0.0;
        }

        let date = day.date_key;
        let seasonal = self.config.seasonality.factor(date.month());
        let elapsed = (date - self.start).num_days().max(0) as f64;
        let growth = 1.0 + self.growth_rate * elapsed / 365.0;
        let month_end = match self.config.month_end {
            Some(boost) if date.day() >= boost.from_day => boost.factor,
            _ => 1.0,
        };
        let weekend = if day.is_weekend {
            self.config.weekend_factor
        } else {
            1.0
        };

        seasonal * growth * month_end * weekend
    }

    /// Full multiplier with a fresh jitter draw.
    pub fn multiplier(&self, day: &CalendarDay, rng: &mut FabricRng) -> f64 {
        let base = self.base_multiplier(day);
        if base == 0.0 {
            return 0.0;
        }
        let j = self.config.jitter;
        base * rng.uniform(1.0 - j, 1.0 + j)
    }

    /// Event count for a stream with the given base rate.
    pub fn count(&self, base_rate: f64, day: &CalendarDay, rng: &mut FabricRng) -> usize {
        if base_rate <= 0.0 {
            return 0;
        }
        (base_rate * self.multiplier(day, rng)).round().max(0.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FiscalYearStart;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn calendar() -> FiscalCalendar {
        FiscalCalendar::build(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            FiscalYearStart::January,
            false,
        )
        .unwrap()
    }

    fn day(calendar: &FiscalCalendar, y: i32, m: u32, d: u32) -> CalendarDay {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        calendar
            .days()
            .iter()
            .find(|c| c.date_key == date)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_industry_profiles() {
        let mfg = SeasonalityConfig::for_industry(Industry::Manufacturing);
        assert_eq!(mfg.factor(11), 1.3);
        assert_eq!(mfg.factor(7), 0.8);
        assert_eq!(mfg.factor(3), 1.0);

        let retail = SeasonalityConfig::for_industry(Industry::Retail);
        assert_eq!(retail.factor(12), 1.5);
        assert_eq!(retail.factor(10), 1.3);
        assert_eq!(retail.factor(7), 1.0);
    }

    #[test]
    fn test_sinusoidal_profile() {
        let s = SeasonalityConfig::sinusoidal(0.2);
        assert_relative_eq!(s.factor(3), 1.2, epsilon = 1e-12);
        assert_relative_eq!(s.factor(9), 0.8, epsilon = 1e-12);
        assert_relative_eq!(s.factor(12), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_multiplier_components() {
        let cal = calendar();
        let config = VolumeConfig {
            seasonality: SeasonalityConfig::holiday_peak(),
            annual_growth: Some(Span::new(0.10, 0.10)),
            month_end: Some(MonthEndBoost {
                from_day: 28,
                factor: 1.3,
            }),
            skip_weekends: false,
            weekend_factor: 0.2,
            jitter: 0.0,
        };
        let mut rng = FabricRng::seeded(1);
        let model = VolumeModel::new(&config, &cal, &mut rng);
        assert_relative_eq!(model.growth_rate(), 0.10);

        // Thursday 2023-12-28: peak month, month end, 361 days elapsed.
        let d = day(&cal, 2023, 12, 28);
        let expected = 1.43 * (1.0 + 0.10 * 361.0 / 365.0) * 1.3;
        assert_relative_eq!(model.base_multiplier(&d), expected, epsilon = 1e-9);

        // Saturday 2023-01-07 takes the weekend factor.
        let sat = day(&cal, 2023, 1, 7);
        let expected = 1.0 * (1.0 + 0.10 * 6.0 / 365.0) * 0.2;
        assert_relative_eq!(model.base_multiplier(&sat), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_weekends_skipped() {
        let cal = calendar();
        let config = VolumeConfig {
            skip_weekends: true,
            ..VolumeConfig::default()
        };
        let mut rng = FabricRng::seeded(2);
        let model = VolumeModel::new(&config, &cal, &mut rng);
        let sunday = day(&cal, 2023, 1, 1);
        assert_eq!(model.count(100.0, &sunday, &mut rng), 0);
    }

    #[test]
    fn test_jitter_bounds() {
        let cal = calendar();
        let config = VolumeConfig {
            jitter: 0.1,
            ..VolumeConfig::default()
        };
        let mut rng = FabricRng::seeded(3);
        let model = VolumeModel::new(&config, &cal, &mut rng);
        let d = day(&cal, 2023, 3, 15);
        for _ in 0..200 {
            let n = model.count(100.0, &d, &mut rng);
            assert!((90..=110).contains(&n), "count {n} outside jitter bounds");
        }
    }

    #[test]
    fn test_negative_factor_rejected() {
        let mut s = SeasonalityConfig::flat();
        s.factors[4] = -1.0;
        assert!(s.validate().is_err());
    }
}
