//! Asset movements and yearly asset values.

use chrono::NaiveDate;
use serde::Serialize;

use crate::registry::{AssetNumber, CompanyCode, ForeignKey, ForeignKeys};

/// Kind of asset movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetMovementType {
    /// Capitalization of a new asset.
    Acquisition,
    /// Ordinary depreciation run.
    Depreciation,
}

/// One asset posting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetMovement {
    /// Running id.
    pub asset_movement_id: u64,
    /// Asset.
    pub asset_number: AssetNumber,
    /// Sub number.
    pub sub_number: &'static str,
    /// Company.
    pub company_code: CompanyCode,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period.
    pub fiscal_period: u32,
    /// Depreciation area.
    pub depreciation_area: &'static str,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Acquisition value posted.
    pub acquisition_value: f64,
    /// Ordinary depreciation posted, negative.
    pub ordinary_depreciation: f64,
    /// Movement kind.
    pub movement_type: AssetMovementType,
}

impl ForeignKeys for AssetMovement {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.asset_number),
            ForeignKey::of(&self.company_code),
        ]
    }
}

/// Asset values at the end of a fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetValue {
    /// Company.
    pub company_code: CompanyCode,
    /// Asset.
    pub asset_number: AssetNumber,
    /// Sub number.
    pub sub_number: &'static str,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Acquisition value.
    pub acquisition_value: f64,
    /// Accumulated depreciation, positive.
    pub accumulated_depreciation: f64,
    /// Acquisition minus accumulated depreciation, never negative.
    pub net_book_value: f64,
    /// Currency.
    pub currency: String,
}

impl ForeignKeys for AssetValue {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.asset_number),
            ForeignKey::of(&self.company_code),
        ]
    }
}
