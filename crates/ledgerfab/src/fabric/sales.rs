//! Sales orders, billing and profitability analysis.

use chrono::{Datelike, Duration, NaiveDate};

use super::ledger::{Journal, Leg, Posting};
use super::reference::{ReferenceData, SALES_ORGS};
use crate::calendar::{roll_to_business_day, CalendarDay, FiscalCalendar};
use crate::config::SalesConfig;
use crate::error::{FabricError, FabricResult};
use crate::models::{
    AccountRole, BillingDocument, BillingStatus, Company, CopaItem, DocumentType, SalesOrder,
};
use crate::random::{round_cents, FabricRng};
use crate::registry::ReferenceTable;

const ITEM: &str = "000010";
const MAX_ACCRUAL_ACCOUNTS: usize = 4;

/// Tables produced by the sales module.
#[derive(Debug, Clone, Default)]
pub struct SalesTables {
    /// Sales orders.
    pub sales_orders: Vec<SalesOrder>,
    /// Billing documents.
    pub billing_documents: Vec<BillingDocument>,
    /// CO-PA line items.
    pub copa_items: Vec<CopaItem>,
}

/// Generates orders, their billing documents and GL follow-up postings.
#[derive(Debug)]
pub struct SalesSynthesizer<'a> {
    config: &'a SalesConfig,
    reference: &'a ReferenceData,
    company: &'a Company,
    next_order: u64,
    next_billing: u64,
}

impl<'a> SalesSynthesizer<'a> {
    /// Create a synthesizer. Sales post to the first company.
    pub fn new(config: &'a SalesConfig, reference: &'a ReferenceData) -> FabricResult<Self> {
        let company = reference
            .companies
            .first()
            .ok_or(FabricError::EmptyReference {
                table: ReferenceTable::Company,
            })?;
        Ok(Self {
            config,
            reference,
            company,
            next_order: 1,
            next_billing: 1,
        })
    }

    /// Emit `count` orders dated `day`.
    pub fn post_day(
        &mut self,
        day: &CalendarDay,
        count: usize,
        calendar: &FiscalCalendar,
        tables: &mut SalesTables,
        mut journal: Option<&mut Journal>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        for _ in 0..count {
            self.post_order(day.date_key, calendar, tables, journal.as_deref_mut(), rng)?;
        }
        Ok(())
    }

    fn post_order(
        &mut self,
        date: NaiveDate,
        calendar: &FiscalCalendar,
        tables: &mut SalesTables,
        journal: Option<&mut Journal>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let cfg = self.config;
        let reference = self.reference;
        let customer = rng.pick(&reference.customers, ReferenceTable::Customer)?;
        let material = rng.pick(&reference.materials, ReferenceTable::Material)?;
        let plant = rng.pick(&reference.plants, ReferenceTable::Plant)?;

        let quantity = rng.range(cfg.quantity.min..=cfg.quantity.max);
        let unit_price =
            round_cents(material.standard_cost * rng.uniform(cfg.markup.min, cfg.markup.max));
        let net_value = round_cents(f64::from(quantity) * unit_price);
        let requested = rng.range(cfg.requested_delivery_days.min..=cfg.requested_delivery_days.max);

        let sales_order_id = format!("SO{:08}", self.next_order);
        self.next_order += 1;

        let mut order = SalesOrder {
            sales_order_id,
            item_number: ITEM,
            customer_id: customer.customer_id.clone(),
            material_id: material.material_id.clone(),
            order_date: date,
            requested_delivery_date: date + Duration::days(i64::from(requested)),
            order_quantity: quantity,
            unit_price,
            net_value,
            currency: self.company.currency.clone(),
            sales_org: rng.one_of(&SALES_ORGS),
            plant_id: plant.plant_id.clone(),
            billing_status: BillingStatus::NotBilled,
        };

        if rng.chance(cfg.billing_probability) {
            let delay = rng.range(cfg.billing_delay_days.min..=cfg.billing_delay_days.max);
            let billing_date = roll_to_business_day(date + Duration::days(i64::from(delay)));
            if billing_date <= calendar.end() {
                let billing = self.bill(&order, billing_date, rng);
                order.billing_status = BillingStatus::Billed;
                tables
                    .copa_items
                    .push(self.copa(&billing, &order, material.product_line, calendar, rng));
                if let Some(journal) = journal.filter(|_| cfg.post_to_ledger) {
                    self.post_billing(&billing, journal, rng)?;
                }
                tables.billing_documents.push(billing);
            }
        }

        tables.sales_orders.push(order);
        Ok(())
    }

    fn bill(&mut self, order: &SalesOrder, date: NaiveDate, rng: &mut FabricRng) -> BillingDocument {
        let cfg = self.config;
        let billing_document = format!("BD{:08}", self.next_billing);
        self.next_billing += 1;
        let tax_amount = round_cents(order.net_value * cfg.tax_rate);
        BillingDocument {
            billing_document,
            item_number: ITEM,
            sales_order_id: order.sales_order_id.clone(),
            customer_id: order.customer_id.clone(),
            material_id: order.material_id.clone(),
            billing_date: date,
            billing_quantity: order.order_quantity,
            net_value: order.net_value,
            tax_amount,
            gross_value: round_cents(order.net_value + tax_amount),
            currency: order.currency.clone(),
            cost_of_goods: round_cents(
                order.net_value * rng.uniform(cfg.cogs_ratio.min, cfg.cogs_ratio.max),
            ),
        }
    }

    fn copa(
        &self,
        billing: &BillingDocument,
        order: &SalesOrder,
        product_line: &'static str,
        calendar: &FiscalCalendar,
        rng: &mut FabricRng,
    ) -> CopaItem {
        let cfg = self.config;
        let revenue = billing.net_value;
        let marketing = round_cents(
            revenue * rng.uniform(cfg.marketing_ratio.min, cfg.marketing_ratio.max),
        );
        let selling = round_cents(
            revenue * rng.uniform(cfg.sales_cost_ratio.min, cfg.sales_cost_ratio.max),
        );
        let position = calendar.fiscal_position(billing.billing_date);
        CopaItem {
            id: self.next_billing - 1,
            company_code: self.company.company_code.clone(),
            operating_concern: "OP01",
            record_type: "F",
            version: "0",
            fiscal_year: position.fiscal_year,
            fiscal_period: position.fiscal_period,
            billing_document: billing.billing_document.clone(),
            customer_id: billing.customer_id.clone(),
            material_id: billing.material_id.clone(),
            sales_org: order.sales_org,
            product_line,
            revenue_amount: revenue,
            cogs_amount: -billing.cost_of_goods,
            marketing_cost: -marketing,
            sales_cost: -selling,
            contribution_margin: round_cents(revenue - billing.cost_of_goods - marketing - selling),
            currency: billing.currency.clone(),
            posting_date: billing.billing_date,
        }
    }

    fn post_billing(
        &self,
        billing: &BillingDocument,
        journal: &mut Journal,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let accounts = self.reference.accounts();
        let profit_center = rng
            .pick(&self.reference.profit_centers, ReferenceTable::ProfitCenter)
            .ok()
            .map(|p| p.profit_center.clone());

        journal.post(Posting {
            company: self.company,
            date: billing.billing_date,
            document_type: DocumentType::Billing,
            debit: Leg::account(accounts.pick(AccountRole::Receivables, rng)?),
            credit: Leg::account(accounts.primary(AccountRole::SalesRevenue)?)
                .with_profit_center(profit_center.clone()),
            amount: billing.net_value,
            reference: Some(billing.billing_document.clone()),
            text: "Billing revenue",
        });
        journal.post(Posting {
            company: self.company,
            date: billing.billing_date,
            document_type: DocumentType::Billing,
            debit: Leg::account(accounts.primary(AccountRole::Cogs)?)
                .with_profit_center(profit_center),
            credit: Leg::account(accounts.pick(AccountRole::Inventory, rng)?),
            amount: billing.cost_of_goods,
            reference: Some(billing.billing_document.clone()),
            text: "Billing cost of sales",
        });
        Ok(())
    }

    /// Accrue monthly operating expenses on up to four expense accounts.
    pub fn accrue_opex(
        &self,
        date: NaiveDate,
        journal: &mut Journal,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let accounts = self.reference.accounts();
        let accrued = accounts.primary(AccountRole::AccruedExpenses)?;
        let reference = format!("ACCRUAL_{:04}{:02}", date.year(), date.month());
        for account in accounts
            .accounts(AccountRole::OperatingExpenses)
            .iter()
            .take(MAX_ACCRUAL_ACCOUNTS)
        {
            let cost_center = rng
                .pick(&self.reference.cost_centers, ReferenceTable::CostCenter)
                .ok()
                .map(|c| c.cost_center.clone());
            journal.post(Posting {
                company: self.company,
                date,
                document_type: DocumentType::Journal,
                debit: Leg::account(account.clone()).with_cost_center(cost_center),
                credit: Leg::account(accrued.clone()),
                amount: rng.amount(&self.config.monthly_opex, 0.0),
                reference: Some(reference.clone()),
                text: "Opex accrual",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FabricConfig, Profile};
    use crate::fabric::ReferenceDataBuilder;
    use std::collections::HashMap;

    fn setup() -> (FabricConfig, ReferenceData, FiscalCalendar) {
        let config = FabricConfig::for_profile(Profile::SalesPerformance).scaled(0.1);
        let mut rng = FabricRng::seeded(7);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();
        let cal = &config.calendar;
        let calendar =
            FiscalCalendar::build(cal.start, cal.end, cal.fiscal_start, cal.business_days_only)
                .unwrap();
        (config, data, calendar)
    }

    #[test]
    fn test_billing_status_matches_billing_documents() {
        let (config, data, calendar) = setup();
        let mut synth = SalesSynthesizer::new(&config.sales, &data).unwrap();
        let mut tables = SalesTables::default();
        let mut journal = Journal::new(calendar.fiscal_start(), "USD");
        let mut rng = FabricRng::seeded(1);
        for day in calendar.business_days().take(40) {
            synth
                .post_day(day, 10, &calendar, &mut tables, Some(&mut journal), &mut rng)
                .unwrap();
        }

        let billed: HashMap<&str, &BillingDocument> = tables
            .billing_documents
            .iter()
            .map(|b| (b.sales_order_id.as_str(), b))
            .collect();
        assert_eq!(tables.sales_orders.len(), 400);
        for order in &tables.sales_orders {
            assert!(SALES_ORGS.contains(&order.sales_org));
            let bill = billed.get(order.sales_order_id.as_str());
            assert_eq!(
                order.billing_status == BillingStatus::Billed,
                bill.is_some()
            );
            if let Some(bill) = bill {
                assert!(bill.billing_date > order.order_date);
                assert!(!crate::calendar::is_weekend(bill.billing_date));
                assert_eq!(bill.net_value, order.net_value);
                assert!(bill.cost_of_goods <= bill.net_value * 0.7 + 0.01);
            }
        }
        assert_eq!(tables.copa_items.len(), tables.billing_documents.len());
        assert_eq!(
            journal.document_count(),
            tables.billing_documents.len() * 2
        );
    }

    #[test]
    fn test_billing_never_after_end() {
        let (config, data, calendar) = setup();
        let mut synth = SalesSynthesizer::new(&config.sales, &data).unwrap();
        let mut tables = SalesTables::default();
        let mut rng = FabricRng::seeded(1);
        let last = calendar.days().last().unwrap();
        synth
            .post_day(last, 50, &calendar, &mut tables, None, &mut rng)
            .unwrap();
        assert!(tables.billing_documents.is_empty());
        assert!(tables
            .sales_orders
            .iter()
            .all(|o| o.billing_status == BillingStatus::NotBilled));
    }

    #[test]
    fn test_opex_accrual() {
        let (config, data, calendar) = setup();
        let synth = SalesSynthesizer::new(&config.sales, &data).unwrap();
        let mut journal = Journal::new(calendar.fiscal_start(), "USD");
        let mut rng = FabricRng::seeded(1);
        let date = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        synth.accrue_opex(date, &mut journal, &mut rng).unwrap();

        assert_eq!(journal.document_count(), 4);
        assert!(journal
            .headers()
            .iter()
            .all(|h| h.reference.as_deref() == Some("ACCRUAL_202303")));
        let accrued = data.accounts().primary(AccountRole::AccruedExpenses).unwrap();
        assert!(journal
            .lines()
            .iter()
            .filter(|l| l.amount_local < 0.0)
            .all(|l| l.gl_account == accrued));
    }
}
