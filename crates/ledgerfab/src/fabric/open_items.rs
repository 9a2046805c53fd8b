//! Receivable and payable open items with clearing.
//!
//! Each invoice is emitted as an open item. With the policy's probability a
//! payment is drawn at a delay centred on the target day-count; when it falls
//! on or before the end of the calendar, the payment row is emitted and the
//! invoice is marked cleared in place.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{FiscalCalendar, FiscalPosition};
use crate::config::{OpenItemStream, Span};
use crate::error::FabricResult;
use crate::models::{Company, OpenItem, OpenItemStatus, Partner};
use crate::random::FabricRng;
use crate::registry::ReferenceTable;

/// Payment behaviour of one open item stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearingPolicy {
    /// Probability an invoice is ever paid.
    pub clear_probability: f64,
    /// Mean days from posting to payment (DSO / DPO target).
    pub target_days: f64,
    /// Standard deviation of the payment delay.
    pub delay_std_dev: f64,
    /// Shortest payment delay in days.
    pub min_delay_days: i64,
    /// Offset of the due date from `posting + target_days`.
    pub due_days_offset: Span<i64>,
}

impl ClearingPolicy {
    /// Check the policy.
    pub fn validate(&self, name: &str) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.clear_probability) {
            return Err(format!(
                "{name}.policy.clear_probability must be within [0, 1], got {}",
                self.clear_probability
            ));
        }
        if !(self.target_days.is_finite() && self.target_days >= 0.0) {
            return Err(format!(
                "{name}.policy.target_days must be >= 0, got {}",
                self.target_days
            ));
        }
        if !(self.delay_std_dev.is_finite() && self.delay_std_dev >= 0.0) {
            return Err(format!(
                "{name}.policy.delay_std_dev must be >= 0, got {}",
                self.delay_std_dev
            ));
        }
        if self.min_delay_days < 0 {
            return Err(format!(
                "{name}.policy.min_delay_days must be >= 0, got {}",
                self.min_delay_days
            ));
        }
        self.due_days_offset
            .validate(&format!("{name}.policy.due_days_offset"))
    }

    /// Net due date of an invoice.
    pub fn due_date(&self, posting: NaiveDate, rng: &mut FabricRng) -> NaiveDate {
        let offset = rng.range(self.due_days_offset.min..=self.due_days_offset.max);
        posting + Duration::days(self.target_days.round() as i64 + offset)
    }

    /// Days from posting to payment.
    pub fn payment_delay(&self, rng: &mut FabricRng) -> i64 {
        let drawn = rng.normal(self.target_days, self.delay_std_dev).round() as i64;
        drawn.max(self.min_delay_days)
    }
}

/// Generates one open item stream for a partner type.
#[derive(Debug)]
pub struct OpenItemSynthesizer<'a, P> {
    stream: &'a OpenItemStream,
    partners: &'a [P],
    companies: &'a [Company],
    table: ReferenceTable,
    next_invoice: u64,
    next_payment: u64,
}

impl<'a, P: Partner> OpenItemSynthesizer<'a, P> {
    /// Create a synthesizer over a partner list.
    pub fn new(stream: &'a OpenItemStream, partners: &'a [P], companies: &'a [Company]) -> Self {
        Self {
            stream,
            partners,
            companies,
            table: P::TABLE,
            next_invoice: 1,
            next_payment: 1,
        }
    }

    /// Emit `count` invoices posted on `date`, each followed by its payment
    /// when it clears within the calendar.
    pub fn post_day(
        &mut self,
        date: NaiveDate,
        count: usize,
        calendar: &FiscalCalendar,
        rows: &mut Vec<OpenItem<P>>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        for _ in 0..count {
            self.post_invoice(date, calendar, rows, rng)?;
        }
        Ok(())
    }

    /// Emit one invoice and, if it clears in range, its payment.
    pub fn post_invoice(
        &mut self,
        date: NaiveDate,
        calendar: &FiscalCalendar,
        rows: &mut Vec<OpenItem<P>>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let partner = rng.pick(self.partners, self.table)?.clone();
        let company = rng.pick(self.companies, ReferenceTable::Company)?;
        let policy = self.stream.policy;
        let amount = rng.amount(&self.stream.amount, 0.01);
        let side = P::INVOICE_SIDE;

        let document_number = format!("{}{:08}", P::INVOICE_PREFIX, self.next_invoice);
        self.next_invoice += 1;
        let position = calendar.fiscal_position(date);
        let mut invoice = OpenItem {
            partner_id: partner,
            company_code: company.company_code.clone(),
            document_number,
            line_item: 1,
            fiscal_year: position.fiscal_year,
            posting_date: date,
            document_date: date,
            due_date: Some(policy.due_date(date, rng)),
            clearing_date: None,
            amount_in_doc_currency: side.signed(amount),
            currency: company.currency.clone(),
            debit_credit_indicator: side,
            clearing_document: None,
            open_item_status: OpenItemStatus::Open,
        };

        let payment = if rng.chance(policy.clear_probability) {
            let paid_on = date + Duration::days(policy.payment_delay(rng));
            (paid_on <= calendar.end()).then(|| self.payment_for(&mut invoice, paid_on, calendar))
        } else {
            None
        };

        rows.push(invoice);
        rows.extend(payment);
        Ok(())
    }

    /// Build the payment clearing `invoice` and mark the invoice cleared.
    fn payment_for(
        &mut self,
        invoice: &mut OpenItem<P>,
        paid_on: NaiveDate,
        calendar: &FiscalCalendar,
    ) -> OpenItem<P> {
        let document_number = format!("{}{:08}", P::PAYMENT_PREFIX, self.next_payment);
        self.next_payment += 1;

        invoice.clearing_date = Some(paid_on);
        invoice.clearing_document = Some(document_number.clone());
        invoice.open_item_status = OpenItemStatus::Cleared;

        let FiscalPosition { fiscal_year, .. } = calendar.fiscal_position(paid_on);
        OpenItem {
            partner_id: invoice.partner_id.clone(),
            company_code: invoice.company_code.clone(),
            document_number,
            line_item: 1,
            fiscal_year,
            posting_date: paid_on,
            document_date: paid_on,
            due_date: None,
            clearing_date: Some(paid_on),
            amount_in_doc_currency: -invoice.amount_in_doc_currency,
            currency: invoice.currency.clone(),
            debit_credit_indicator: P::INVOICE_SIDE.opposite(),
            clearing_document: Some(invoice.document_number.clone()),
            open_item_status: OpenItemStatus::Cleared,
        }
    }
}
