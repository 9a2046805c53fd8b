//! # ledgerfab
//!
//! Synthetic enterprise finance and operations datasets.
//!
//! One configuration drives a single generator that produces a fiscal
//! calendar, reference tables (companies, accounts, cost and profit centers,
//! plants, materials, customers, vendors, employees, assets) and the
//! transaction streams that hang off them:
//!
//! - **General ledger**: balanced double-entry documents and opening balances
//! - **Open items**: receivables and payables with stochastic clearing
//! - **Sales**: orders, billing and CO-PA profitability rows
//! - **Fulfillment**: order to delivery chains with backorders
//! - **Inventory**: receipts, issues and transfers, folded into stock balances
//! - **Assets**: monthly depreciation, acquisitions and yearly book values
//! - **Workforce**: monthly hires and terminations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────┐     ┌──────────────┐     ┌──────────┐
//! │ FabricConfig │────▶│ Reference Data │────▶│ Synthesizers │────▶│ Aggregate│
//! │  (profiles)  │     │  + Calendar    │     │ (per module) │     │ + Verify │
//! └──────────────┘     └────────────────┘     └──────────────┘     └──────────┘
//!                                                                        │
//!                                                                        ▼
//!                                                                  ┌──────────┐
//!                                                                  │ CsvSink  │
//!                                                                  └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ledgerfab::prelude::*;
//!
//! # fn main() -> ledgerfab::FabricResult<()> {
//! let config = FabricConfig::for_profile(Profile::Inventory).with_seed(Some(42));
//! let mut pipeline = DataFabricPipeline::new(config)?;
//! let dataset = pipeline.run()?;
//! dataset.write_to(&CsvSink::new("out"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fabric;
pub mod models;
pub mod random;
pub mod registry;
pub mod sink;
pub mod summary;

pub use error::{FabricError, FabricResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::calendar::{CalendarDay, FiscalCalendar, FiscalPosition, FiscalYearStart};
    pub use crate::config::{FabricConfig, Profile, Span};
    pub use crate::dataset::Dataset;
    pub use crate::error::{FabricError, FabricResult};
    pub use crate::fabric::{DataFabricPipeline, PipelineStats, ReferenceData};
    pub use crate::models::TableRow;
    pub use crate::random::{AmountDistribution, FabricRng};
    pub use crate::registry::{ReferenceRegistry, ReferenceTable};
    pub use crate::sink::{CsvSink, TableSummary};
    pub use crate::summary::DatasetSummary;
}

/// Version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
