//! Double-entry general ledger.
//!
//! Every document the [`Journal`] records has exactly two lines sharing one
//! document number: the debit line carries `+amount`, the credit line
//! `-amount`. Group amounts are rounded once and negated, so each document
//! nets to zero in local and group currency.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::reference::ReferenceData;
use crate::calendar::{CalendarDay, FiscalPosition, FiscalYearStart};
use crate::config::LedgerConfig;
use crate::error::{FabricError, FabricResult};
use crate::models::{
    AccountRole, Company, DebitCredit, DocumentHeader, DocumentType, GlLineItem,
};
use crate::random::{round_cents, FabricRng};
use crate::registry::{CostCenterId, GlAccountId, ProfitCenterId, ReferenceTable};

/// One side of a posting.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// Account.
    pub account: GlAccountId,
    /// Cost center.
    pub cost_center: Option<CostCenterId>,
    /// Profit center.
    pub profit_center: Option<ProfitCenterId>,
}

impl Leg {
    /// Leg without controlling objects.
    pub fn account(account: GlAccountId) -> Self {
        Self {
            account,
            cost_center: None,
            profit_center: None,
        }
    }

    /// Attach a cost center.
    pub fn with_cost_center(mut self, cost_center: Option<CostCenterId>) -> Self {
        self.cost_center = cost_center;
        self
    }

    /// Attach a profit center.
    pub fn with_profit_center(mut self, profit_center: Option<ProfitCenterId>) -> Self {
        self.profit_center = profit_center;
        self
    }
}

/// A balanced two-line document to record.
#[derive(Debug, Clone)]
pub struct Posting<'a> {
    /// Posting company.
    pub company: &'a Company,
    /// Posting date.
    pub date: NaiveDate,
    /// Document type.
    pub document_type: DocumentType,
    /// Debited side.
    pub debit: Leg,
    /// Credited side.
    pub credit: Leg,
    /// Positive local amount.
    pub amount: f64,
    /// Originating document.
    pub reference: Option<String>,
    /// Line text.
    pub text: &'static str,
}

/// Collects GL line items and document headers.
#[derive(Debug, Clone)]
pub struct Journal {
    fiscal_start: FiscalYearStart,
    group_currency: String,
    next_line: u64,
    next_document: u64,
    lines: Vec<GlLineItem>,
    headers: Vec<DocumentHeader>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new(fiscal_start: FiscalYearStart, group_currency: impl Into<String>) -> Self {
        Self {
            fiscal_start,
            group_currency: group_currency.into(),
            next_line: 1,
            next_document: 1,
            lines: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Record a posting and return its document number.
    pub fn post(&mut self, posting: Posting<'_>) -> String {
        let document_number = format!(
            "{}{:010}",
            posting.document_type.prefix(),
            self.next_document
        );
        self.next_document += 1;

        let position = FiscalPosition::of(posting.date, self.fiscal_start);
        let amount = round_cents(posting.amount.abs());
        let amount_group = round_cents(amount * posting.company.exchange_rate);

        for (item, (side, leg)) in [
            (DebitCredit::Debit, &posting.debit),
            (DebitCredit::Credit, &posting.credit),
        ]
        .into_iter()
        .enumerate()
        {
            self.lines.push(GlLineItem {
                id: self.next_line,
                company_code: posting.company.company_code.clone(),
                gl_account: leg.account.clone(),
                posting_date: posting.date,
                document_number: document_number.clone(),
                item_number: item as u32 + 1,
                amount_local: side.signed(amount),
                amount_group: side.signed(amount_group),
                currency_local: posting.company.currency.clone(),
                currency_group: self.group_currency.clone(),
                debit_credit_indicator: side,
                cost_center: leg.cost_center.clone(),
                profit_center: leg.profit_center.clone(),
                fiscal_year: position.fiscal_year,
                fiscal_period: position.fiscal_period,
                value_date: posting.date,
                reference_document: posting.reference.clone(),
                text: posting.text,
            });
            self.next_line += 1;
        }

        self.headers.push(DocumentHeader {
            document_number: document_number.clone(),
            company_code: posting.company.company_code.clone(),
            fiscal_year: position.fiscal_year,
            document_type: posting.document_type,
            document_date: posting.date,
            posting_date: posting.date,
            reference: posting.reference,
            currency: posting.company.currency.clone(),
            exchange_rate: posting.company.exchange_rate,
            line_count: 2,
        });

        document_number
    }

    /// Recorded line items.
    pub fn lines(&self) -> &[GlLineItem] {
        &self.lines
    }

    /// Recorded document headers.
    pub fn headers(&self) -> &[DocumentHeader] {
        &self.headers
    }

    /// Number of documents recorded.
    pub fn document_count(&self) -> usize {
        self.headers.len()
    }

    /// Consume into line items and headers.
    pub fn into_parts(self) -> (Vec<GlLineItem>, Vec<DocumentHeader>) {
        (self.lines, self.headers)
    }
}

/// Business scenario of a generic GL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerScenario {
    /// Dr cash or receivables, Cr revenue.
    Revenue,
    /// Dr operating expenses, Cr cash or payables.
    Expense,
    /// Dr COGS, Cr inventory.
    CostOfSales,
    /// Dr cash, Cr cash.
    CashTransfer,
}

impl LedgerScenario {
    fn text(&self) -> &'static str {
        match self {
            LedgerScenario::Revenue => "Revenue recognition",
            LedgerScenario::Expense => "Expense posting",
            LedgerScenario::CostOfSales => "Cost of sales",
            LedgerScenario::CashTransfer => "Cash transfer",
        }
    }
}

/// Generates scenario-driven GL documents and opening balances.
#[derive(Debug)]
pub struct LedgerSynthesizer<'a> {
    config: &'a LedgerConfig,
    reference: &'a ReferenceData,
}

impl<'a> LedgerSynthesizer<'a> {
    /// Create a synthesizer over finished reference data.
    pub fn new(config: &'a LedgerConfig, reference: &'a ReferenceData) -> Self {
        Self { config, reference }
    }

    /// Post one opening document per balance sheet subgroup and company,
    /// dated the day before `start`.
    pub fn opening_balances(
        &self,
        start: NaiveDate,
        journal: &mut Journal,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let accounts = self.reference.accounts();
        let date = start - Duration::days(1);
        let equity = [AccountRole::ShareCapital, AccountRole::RetainedEarnings]
            .into_iter()
            .filter(|r| accounts.has(*r))
            .collect::<Vec<_>>();
        if equity.is_empty() {
            return Err(FabricError::EmptyReference {
                table: ReferenceTable::GlAccount,
            });
        }

        let assets = [
            AccountRole::Cash,
            AccountRole::Receivables,
            AccountRole::Inventory,
            AccountRole::FixedAssetsGross,
        ];
        let liabilities = [
            AccountRole::Payables,
            AccountRole::ShortTermDebt,
            AccountRole::LongTermDebt,
        ];

        let before = journal.document_count();
        for company in &self.reference.companies {
            for (i, role) in assets.iter().filter(|r| accounts.has(**r)).enumerate() {
                let equity_role = equity[i % equity.len()];
                journal.post(Posting {
                    company,
                    date,
                    document_type: DocumentType::Opening,
                    debit: Leg::account(accounts.pick(*role, rng)?),
                    credit: Leg::account(accounts.primary(equity_role)?),
                    amount: rng.amount(&self.config.opening_asset_amount, 0.0),
                    reference: None,
                    text: "Opening balance",
                });
            }
            for role in liabilities.iter().filter(|r| accounts.has(**r)) {
                journal.post(Posting {
                    company,
                    date,
                    document_type: DocumentType::Opening,
                    debit: Leg::account(accounts.primary(equity[equity.len() - 1])?),
                    credit: Leg::account(accounts.pick(*role, rng)?),
                    amount: rng.amount(&self.config.opening_liability_amount, 0.0),
                    reference: None,
                    text: "Opening balance",
                });
            }
        }
        debug!(
            documents = journal.document_count() - before,
            "Posted opening balances"
        );
        Ok(())
    }

    /// Post `count` scenario documents on one day.
    pub fn post_day(
        &self,
        day: &CalendarDay,
        count: usize,
        journal: &mut Journal,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let weights = [
            (LedgerScenario::Revenue, self.config.revenue.weight),
            (LedgerScenario::Expense, self.config.expense.weight),
            (LedgerScenario::CostOfSales, self.config.cost_of_sales.weight),
            (LedgerScenario::CashTransfer, self.config.cash_transfer.weight),
        ];
        for _ in 0..count {
            let Some(scenario) = rng.pick_weighted(&weights) else {
                return Ok(());
            };
            self.post_scenario(scenario, day.date_key, journal, rng)?;
        }
        Ok(())
    }

    /// Post one document of a scenario.
    pub fn post_scenario(
        &self,
        scenario: LedgerScenario,
        date: NaiveDate,
        journal: &mut Journal,
        rng: &mut FabricRng,
    ) -> FabricResult<String> {
        let reference = self.reference;
        let accounts = reference.accounts();
        let company = rng.pick(&reference.companies, ReferenceTable::Company)?;
        let cost_center = rng
            .pick(&reference.cost_centers, ReferenceTable::CostCenter)
            .ok()
            .map(|c| c.cost_center.clone());
        let profit_center = rng
            .pick(&reference.profit_centers, ReferenceTable::ProfitCenter)
            .ok()
            .map(|p| p.profit_center.clone());

        let (debit, credit, amount) = match scenario {
            LedgerScenario::Revenue => {
                let debit = if rng.chance(0.5) {
                    accounts.pick_cash(rng)?
                } else {
                    accounts.pick(AccountRole::Receivables, rng)?
                };
                let revenue_role = if rng.chance(0.8) || !accounts.has(AccountRole::OtherRevenue) {
                    AccountRole::SalesRevenue
                } else {
                    AccountRole::OtherRevenue
                };
                (
                    Leg::account(debit),
                    Leg::account(accounts.pick(revenue_role, rng)?)
                        .with_profit_center(profit_center),
                    rng.amount(&self.config.revenue.amount, 0.0),
                )
            }
            LedgerScenario::Expense => {
                let credit = if rng.chance(0.5) {
                    accounts.pick_cash(rng)?
                } else {
                    accounts.pick(AccountRole::Payables, rng)?
                };
                (
                    Leg::account(accounts.pick(AccountRole::OperatingExpenses, rng)?)
                        .with_cost_center(cost_center)
                        .with_profit_center(profit_center),
                    Leg::account(credit),
                    rng.amount(&self.config.expense.amount, 0.0),
                )
            }
            LedgerScenario::CostOfSales => (
                Leg::account(accounts.pick(AccountRole::Cogs, rng)?)
                    .with_profit_center(profit_center),
                Leg::account(accounts.pick(AccountRole::Inventory, rng)?),
                rng.amount(&self.config.cost_of_sales.amount, 0.0),
            ),
            LedgerScenario::CashTransfer => {
                let cash = accounts.cash();
                let (from, to) = if cash.len() >= 2 {
                    let pair = rng.sample_distinct(cash, 2, ReferenceTable::GlAccount)?;
                    (pair[0].clone(), pair[1].clone())
                } else {
                    let only = accounts.pick_cash(rng)?;
                    (only.clone(), only)
                };
                (
                    Leg::account(to),
                    Leg::account(from),
                    rng.amount(&self.config.cash_transfer.amount, 0.0),
                )
            }
        };

        Ok(journal.post(Posting {
            company,
            date,
            document_type: DocumentType::Journal,
            debit,
            credit,
            amount,
            reference: None,
            text: scenario.text(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FabricConfig, Profile};
    use crate::fabric::ReferenceDataBuilder;
    use approx::assert_abs_diff_eq;
    use std::collections::HashMap;

    fn reference(profile: Profile) -> (FabricConfig, ReferenceData) {
        let config = FabricConfig::for_profile(profile).scaled(0.02);
        let mut rng = FabricRng::seeded(5);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();
        (config, data)
    }

    fn company(rate: f64) -> Company {
        Company {
            company_code: crate::registry::CompanyCode::new("CO02"),
            company_name: "Test".to_string(),
            country: "DE",
            currency: "EUR".to_string(),
            chart_of_accounts: "INT",
            exchange_rate: rate,
        }
    }

    #[test]
    fn test_post_balances_in_both_currencies() {
        let mut journal = Journal::new(FiscalYearStart::April, "USD");
        let company = company(1.0837);
        let date = NaiveDate::from_ymd_opt(2023, 4, 3).unwrap();
        let doc = journal.post(Posting {
            company: &company,
            date,
            document_type: DocumentType::Journal,
            debit: Leg::account(GlAccountId::new("100000")),
            credit: Leg::account(GlAccountId::new("400000")),
            amount: 1234.567,
            reference: None,
            text: "Revenue recognition",
        });

        let lines = journal.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.document_number == doc));
        assert_eq!(lines[0].debit_credit_indicator, DebitCredit::Debit);
        assert_eq!(lines[1].debit_credit_indicator, DebitCredit::Credit);
        assert_eq!(lines[0].amount_local + lines[1].amount_local, 0.0);
        assert_eq!(lines[0].amount_group + lines[1].amount_group, 0.0);
        assert_eq!(lines[0].fiscal_period, 1);
        assert_eq!(lines[0].fiscal_year, 2023);
        assert_eq!(journal.headers()[0].line_count, 2);
    }

    #[test]
    fn test_document_numbers_are_unique() {
        let (config, data) = reference(Profile::FinancialControl);
        let synth = LedgerSynthesizer::new(&config.ledger, &data);
        let mut journal = Journal::new(config.calendar.fiscal_start, "USD");
        let mut rng = FabricRng::seeded(11);
        let day = CalendarDay::new(config.calendar.start, config.calendar.fiscal_start);
        synth.post_day(&day, 200, &mut journal, &mut rng).unwrap();

        let mut per_doc: HashMap<&str, f64> = HashMap::new();
        for line in journal.lines() {
            *per_doc.entry(line.document_number.as_str()).or_default() += line.amount_local;
        }
        assert_eq!(per_doc.len(), 200);
        for total in per_doc.values() {
            assert_abs_diff_eq!(*total, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_opening_balances_dated_before_start() {
        let (config, data) = reference(Profile::FinancialControl);
        let synth = LedgerSynthesizer::new(&config.ledger, &data);
        let mut journal = Journal::new(config.calendar.fiscal_start, "USD");
        let mut rng = FabricRng::seeded(11);
        synth
            .opening_balances(config.calendar.start, &mut journal, &mut rng)
            .unwrap();

        // four asset and three liability subgroups per company
        assert_eq!(journal.document_count(), data.companies.len() * 7);
        let day_before = config.calendar.start - Duration::days(1);
        assert!(journal.lines().iter().all(|l| l.posting_date == day_before));
        assert!(journal
            .headers()
            .iter()
            .all(|h| h.document_type == DocumentType::Opening));
    }

    #[test]
    fn test_opening_balances_need_equity() {
        let (config, data) = reference(Profile::SalesPerformance);
        let synth = LedgerSynthesizer::new(&config.ledger, &data);
        let mut journal = Journal::new(config.calendar.fiscal_start, "USD");
        let mut rng = FabricRng::seeded(11);
        assert!(synth
            .opening_balances(config.calendar.start, &mut journal, &mut rng)
            .is_err());
    }

    #[test]
    fn test_cash_transfer_uses_cash_accounts() {
        let (config, data) = reference(Profile::FinancialControl);
        let synth = LedgerSynthesizer::new(&config.ledger, &data);
        let mut journal = Journal::new(config.calendar.fiscal_start, "USD");
        let mut rng = FabricRng::seeded(2);
        for _ in 0..20 {
            synth
                .post_scenario(
                    LedgerScenario::CashTransfer,
                    config.calendar.start,
                    &mut journal,
                    &mut rng,
                )
                .unwrap();
        }
        let cash = data.accounts().cash();
        for pair in journal.lines().chunks(2) {
            assert!(cash.contains(&pair[0].gl_account));
            assert!(cash.contains(&pair[1].gl_account));
            assert_ne!(pair[0].gl_account, pair[1].gl_account);
        }
    }
}
