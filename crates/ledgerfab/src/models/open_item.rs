//! Receivable and payable open items.

use chrono::NaiveDate;
use serde::Serialize;

use super::{DebitCredit, TableRow};
use crate::registry::{CompanyCode, CustomerId, ForeignKey, ForeignKeys, ReferenceId, VendorId};

/// Clearing status of an open item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OpenItemStatus {
    /// Not yet matched to a payment.
    Open,
    /// Matched to a payment.
    Cleared,
}

/// Business partner side of an open item ledger.
pub trait Partner: ReferenceId + Clone + Serialize {
    /// Prefix of invoice document numbers.
    const INVOICE_PREFIX: &'static str;
    /// Prefix of payment document numbers.
    const PAYMENT_PREFIX: &'static str;
    /// Side the invoice posts on; payments post on the opposite side.
    const INVOICE_SIDE: DebitCredit;
}

impl Partner for CustomerId {
    const INVOICE_PREFIX: &'static str = "INV";
    const PAYMENT_PREFIX: &'static str = "CLR";
    const INVOICE_SIDE: DebitCredit = DebitCredit::Debit;
}

impl Partner for VendorId {
    const INVOICE_PREFIX: &'static str = "POINV";
    const PAYMENT_PREFIX: &'static str = "VPAY";
    const INVOICE_SIDE: DebitCredit = DebitCredit::Credit;
}

/// An invoice or the payment that clears it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenItem<P> {
    /// Customer or vendor.
    pub partner_id: P,
    /// Company.
    pub company_code: CompanyCode,
    /// Document number.
    pub document_number: String,
    /// Line item.
    pub line_item: u32,
    /// Fiscal year of the posting date.
    pub fiscal_year: i32,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Document date.
    pub document_date: NaiveDate,
    /// Net due date; payments carry none.
    pub due_date: Option<NaiveDate>,
    /// Date the item was cleared.
    pub clearing_date: Option<NaiveDate>,
    /// Signed amount in document currency.
    pub amount_in_doc_currency: f64,
    /// Document currency.
    pub currency: String,
    /// Debit or credit.
    pub debit_credit_indicator: DebitCredit,
    /// On an invoice: the payment that cleared it. On a payment: the invoice.
    pub clearing_document: Option<String>,
    /// Clearing status.
    pub open_item_status: OpenItemStatus,
}

impl<P> OpenItem<P> {
    /// Whether this row is still open.
    pub fn is_open(&self) -> bool {
        self.open_item_status == OpenItemStatus::Open
    }
}

impl<P: Partner> OpenItem<P> {
    /// Whether this row is an invoice rather than a payment.
    pub fn is_invoice(&self) -> bool {
        self.debit_credit_indicator == P::INVOICE_SIDE
    }
}

/// Customer open item.
pub type ReceivableItem = OpenItem<CustomerId>;

/// Vendor open item.
pub type PayableItem = OpenItem<VendorId>;

impl<P> ForeignKeys for OpenItem<P>
where
    P: Partner,
    OpenItem<P>: TableRow,
{
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.partner_id),
            ForeignKey::of(&self.company_code),
        ]
    }
}
