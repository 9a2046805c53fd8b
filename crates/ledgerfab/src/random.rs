//! Explicit random source threaded through every builder.
//!
//! All randomness in a run comes from a single [`FabricRng`]. Seeding is a
//! caller decision: a fixed seed replays the run row-for-row, `None` draws a
//! fresh seed from OS entropy which is still recorded so the run can be
//! replayed after the fact.

use rand::distributions::uniform::SampleUniform;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{FabricError, FabricResult};
use crate::registry::ReferenceTable;

/// Round a monetary value to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parametric distribution for amounts, prices and quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmountDistribution {
    /// Gaussian with the given mean and standard deviation.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        std_dev: f64,
    },
    /// Log-normal parameterised on the underlying normal.
    LogNormal {
        /// Mean of the underlying normal.
        mu: f64,
        /// Standard deviation of the underlying normal.
        sigma: f64,
    },
    /// Uniform over `[min, max)`.
    Uniform {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

impl AmountDistribution {
    /// Shorthand for a normal distribution.
    pub const fn normal(mean: f64, std_dev: f64) -> Self {
        Self::Normal { mean, std_dev }
    }

    /// Shorthand for a uniform distribution.
    pub const fn uniform(min: f64, max: f64) -> Self {
        Self::Uniform { min, max }
    }

    /// Shorthand for a log-normal distribution.
    pub const fn log_normal(mu: f64, sigma: f64) -> Self {
        Self::LogNormal { mu, sigma }
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Normal { mean, std_dev } if !mean.is_finite() || !(std_dev >= 0.0) => Err(
                format!("normal distribution needs finite mean and std_dev >= 0, got ({mean}, {std_dev})"),
            ),
            Self::LogNormal { mu, sigma } if !mu.is_finite() || !(sigma >= 0.0) => Err(format!(
                "log-normal distribution needs finite mu and sigma >= 0, got ({mu}, {sigma})"
            )),
            Self::Uniform { min, max } if !(min <= max) => {
                Err(format!("uniform distribution needs min <= max, got ({min}, {max})"))
            }
            _ => Ok(()),
        }
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Normal { mean, .. } => mean,
            Self::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.0).exp(),
            Self::Uniform { min, max } => (min + max) / 2.0,
        }
    }
}

/// Seeded pseudo-random source shared by every component of a run.
pub struct FabricRng {
    rng: StdRng,
    seed: u64,
}

impl FabricRng {
    /// Create a source from an optional seed.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a source with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// The seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Access the underlying generator.
    pub fn inner(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Bernoulli trial.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    /// Uniform float in `[min, max)`; returns `min` for an empty interval.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            min
        } else {
            self.rng.gen_range(min..max)
        }
    }

    /// Uniform integer in an inclusive range.
    pub fn range<T>(&mut self, range: RangeInclusive<T>) -> T
    where
        T: SampleUniform + PartialOrd + Copy,
    {
        if range.start() >= range.end() {
            *range.start()
        } else {
            self.rng.gen_range(range)
        }
    }

    /// Gaussian draw; a degenerate standard deviation yields the mean.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) if std_dev > 0.0 => self.rng.sample(dist),
            _ => mean,
        }
    }

    /// Draw from an [`AmountDistribution`].
    pub fn sample(&mut self, distribution: &AmountDistribution) -> f64 {
        match *distribution {
            AmountDistribution::Normal { mean, std_dev } => self.normal(mean, std_dev),
            AmountDistribution::LogNormal { mu, sigma } => match LogNormal::new(mu, sigma) {
                Ok(dist) if sigma > 0.0 => self.rng.sample(dist),
                _ => mu.exp(),
            },
            AmountDistribution::Uniform { min, max } => self.uniform(min, max),
        }
    }

    /// Draw an amount clipped to `floor` and rounded to cents.
    pub fn amount(&mut self, distribution: &AmountDistribution, floor: f64) -> f64 {
        round_cents(self.sample(distribution).max(floor))
    }

    /// Pick one row uniformly from a reference table.
    pub fn pick<'a, T>(&mut self, items: &'a [T], table: ReferenceTable) -> FabricResult<&'a T> {
        items
            .choose(&mut self.rng)
            .ok_or(FabricError::EmptyReference { table })
    }

    /// Pick one row position uniformly from a table of `len` rows.
    pub fn pick_index(&mut self, len: usize, table: ReferenceTable) -> FabricResult<usize> {
        if len == 0 {
            return Err(FabricError::EmptyReference { table });
        }
        Ok(self.rng.gen_range(0..len))
    }

    /// Pick one entry of a constant option array. `N` must be non-zero.
    pub fn one_of<T: Copy, const N: usize>(&mut self, options: &[T; N]) -> T {
        options[self.rng.gen_range(0..N)]
    }

    /// Pick one value uniformly from a fixed option set.
    pub fn choose<T: Copy>(&mut self, options: &[T]) -> Option<T> {
        options.choose(&mut self.rng).copied()
    }

    /// Pick one value by weight. Non-positive weights are never selected.
    pub fn pick_weighted<T: Copy>(&mut self, options: &[(T, f64)]) -> Option<T> {
        let total: f64 = options.iter().map(|(_, w)| w.max(0.0)).sum();
        if options.is_empty() || total <= 0.0 {
            return None;
        }

        let r = self.rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for (value, weight) in options {
            cumulative += weight.max(0.0);
            if r < cumulative {
                return Some(*value);
            }
        }
        options
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(value, _)| *value)
    }

    /// Sample `count` distinct rows without replacement.
    pub fn sample_distinct<'a, T>(
        &mut self,
        items: &'a [T],
        count: usize,
        table: ReferenceTable,
    ) -> FabricResult<Vec<&'a T>> {
        if count > items.len() {
            return Err(FabricError::InsufficientReferences {
                table,
                requested: count,
                available: items.len(),
            });
        }
        Ok(items.choose_multiple(&mut self.rng, count).collect())
    }

    /// Sample `count` distinct indices below `len` without replacement.
    pub fn sample_indices(
        &mut self,
        len: usize,
        count: usize,
        table: ReferenceTable,
    ) -> FabricResult<Vec<usize>> {
        if count > len {
            return Err(FabricError::InsufficientReferences {
                table,
                requested: count,
                available: len,
            });
        }
        Ok(rand::seq::index::sample(&mut self.rng, len, count).into_vec())
    }

    /// Upper-case hexadecimal token derived from a random UUID.
    pub fn hex_token(&mut self, len: usize) -> String {
        let uuid = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();
        let mut token = uuid.simple().to_string().to_uppercase();
        token.truncate(len.min(32));
        token
    }
}

impl std::fmt::Debug for FabricRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabricRng").field("seed", &self.seed).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_replay() {
        let mut a = FabricRng::seeded(7);
        let mut b = FabricRng::seeded(7);
        for _ in 0..100 {
            assert_eq!(a.uniform(0.0, 1000.0), b.uniform(0.0, 1000.0));
        }
        assert_eq!(a.hex_token(8), b.hex_token(8));
    }

    #[test]
    fn test_unseeded_source_records_seed() {
        let rng = FabricRng::new(None);
        let replay = FabricRng::new(Some(rng.seed()));
        assert_eq!(rng.seed(), replay.seed());
    }

    #[test]
    fn test_pick_from_empty_table_fails() {
        let mut rng = FabricRng::seeded(1);
        let empty: Vec<u32> = Vec::new();
        let err = rng.pick(&empty, ReferenceTable::Customer).unwrap_err();
        assert!(matches!(
            err,
            FabricError::EmptyReference {
                table: ReferenceTable::Customer
            }
        ));
    }

    #[test]
    fn test_sample_distinct_rejects_oversized_request() {
        let mut rng = FabricRng::seeded(1);
        let rows = vec![1, 2, 3];
        assert!(rng.sample_distinct(&rows, 3, ReferenceTable::Employee).is_ok());
        let err = rng
            .sample_distinct(&rows, 4, ReferenceTable::Employee)
            .unwrap_err();
        assert!(matches!(
            err,
            FabricError::InsufficientReferences {
                requested: 4,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_one_of_covers_every_option() {
        let mut rng = FabricRng::seeded(5);
        let seen: std::collections::BTreeSet<_> =
            (0..200).map(|_| rng.one_of(&["a", "b", "c"])).collect();
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn test_pick_weighted_skips_zero_weights() {
        let mut rng = FabricRng::seeded(3);
        let options = [("never", 0.0), ("always", 1.0)];
        for _ in 0..200 {
            assert_eq!(rng.pick_weighted(&options), Some("always"));
        }
        assert_eq!(rng.pick_weighted::<u8>(&[]), None);
    }

    #[test]
    fn test_amount_is_clipped_and_rounded() {
        let mut rng = FabricRng::seeded(11);
        let dist = AmountDistribution::normal(0.0, 500.0);
        for _ in 0..500 {
            let value = rng.amount(&dist, 0.0);
            assert!(value >= 0.0);
            assert_eq!(value, round_cents(value));
        }
    }

    #[test]
    fn test_distribution_validation() {
        assert!(AmountDistribution::normal(10.0, 1.0).validate().is_ok());
        assert!(AmountDistribution::normal(10.0, -1.0).validate().is_err());
        assert!(AmountDistribution::uniform(5.0, 1.0).validate().is_err());
        assert!(AmountDistribution::log_normal(2.5, 0.8).validate().is_ok());
    }

    #[test]
    fn test_hex_token_length() {
        let mut rng = FabricRng::seeded(5);
        let token = rng.hex_token(8);
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }
}
