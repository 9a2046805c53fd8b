//! General ledger line items and document headers.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::registry::{CompanyCode, CostCenterId, ForeignKey, ForeignKeys, GlAccountId, ProfitCenterId};

/// Debit/credit indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DebitCredit {
    /// Debit (Soll).
    #[serde(rename = "S")]
    Debit,
    /// Credit (Haben).
    #[serde(rename = "H")]
    Credit,
}

impl DebitCredit {
    /// The other side.
    pub fn opposite(&self) -> Self {
        match self {
            DebitCredit::Debit => DebitCredit::Credit,
            DebitCredit::Credit => DebitCredit::Debit,
        }
    }

    /// Apply the side's sign to a positive amount.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            DebitCredit::Debit => amount,
            DebitCredit::Credit => -amount,
        }
    }
}

impl fmt::Display for DebitCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DebitCredit::Debit => "S",
            DebitCredit::Credit => "H",
        })
    }
}

/// Accounting document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentType {
    /// G/L account document.
    #[serde(rename = "SA")]
    Journal,
    /// Opening balance.
    #[serde(rename = "AB")]
    Opening,
    /// Depreciation run.
    #[serde(rename = "AF")]
    Depreciation,
    /// Billing transfer.
    #[serde(rename = "RV")]
    Billing,
}

impl DocumentType {
    /// Document number prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentType::Journal | DocumentType::Billing => "DOC",
            DocumentType::Opening => "IB",
            DocumentType::Depreciation => "DEP",
        }
    }
}

/// One line of a GL document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlLineItem {
    /// Running line id.
    pub id: u64,
    /// Company.
    pub company_code: CompanyCode,
    /// Account.
    pub gl_account: GlAccountId,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Document number shared by every line of the document.
    pub document_number: String,
    /// Line number within the document.
    pub item_number: u32,
    /// Signed amount in local currency.
    pub amount_local: f64,
    /// Signed amount in group currency.
    pub amount_group: f64,
    /// Local currency.
    pub currency_local: String,
    /// Group currency.
    pub currency_group: String,
    /// Debit or credit.
    pub debit_credit_indicator: DebitCredit,
    /// Cost center.
    pub cost_center: Option<CostCenterId>,
    /// Profit center.
    pub profit_center: Option<ProfitCenterId>,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period.
    pub fiscal_period: u32,
    /// Value date.
    pub value_date: NaiveDate,
    /// Originating document, if any.
    pub reference_document: Option<String>,
    /// Line text.
    pub text: &'static str,
}

impl ForeignKeys for GlLineItem {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        let mut keys = vec![
            ForeignKey::of(&self.company_code),
            ForeignKey::of(&self.gl_account),
        ];
        keys.extend(self.cost_center.as_ref().map(ForeignKey::of));
        keys.extend(self.profit_center.as_ref().map(ForeignKey::of));
        keys
    }
}

/// Header of a GL document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentHeader {
    /// Document number.
    pub document_number: String,
    /// Company.
    pub company_code: CompanyCode,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Document type.
    pub document_type: DocumentType,
    /// Document date.
    pub document_date: NaiveDate,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Reference.
    pub reference: Option<String>,
    /// Document currency.
    pub currency: String,
    /// Local-to-group rate.
    pub exchange_rate: f64,
    /// Number of line items.
    pub line_count: u32,
}

impl ForeignKeys for DocumentHeader {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![ForeignKey::of(&self.company_code)]
    }
}
