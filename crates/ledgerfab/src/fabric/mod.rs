//! Data fabric for synthetic enterprise datasets.
//!
//! The fabric builds reference data, runs one synthesizer per business
//! process over a fiscal calendar, and ties them together in a pipeline.
//! Synthesizers share a seeded random source and a volume model that shapes
//! daily counts by season, growth and weekday.

pub mod names;

mod assets;
mod chart_of_accounts;
mod fulfillment;
mod inventory;
mod ledger;
mod open_items;
mod pipeline;
mod reference;
mod sales;
mod volume;
mod workforce;

pub use assets::*;
pub use chart_of_accounts::*;
pub use fulfillment::*;
pub use inventory::*;
pub use ledger::*;
pub use open_items::*;
pub use pipeline::*;
pub use reference::*;
pub use sales::*;
pub use volume::*;
pub use workforce::*;
