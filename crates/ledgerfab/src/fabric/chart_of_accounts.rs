//! Chart of accounts templates.
//!
//! Two layouts are supported: a ranged chart with a block of six-digit
//! accounts per subgroup, and a compact fifteen-account chart with seven-digit
//! numbers. Synthesizers never hard-code account numbers; they resolve an
//! [`AccountRole`] through an [`AccountBook`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FabricError, FabricResult};
use crate::models::{AccountRole, GlAccount};
use crate::random::FabricRng;
use crate::registry::{GlAccountId, ReferenceTable};

/// Layout of the generated chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum ChartStyle {
    /// Block of consecutive six-digit accounts per subgroup.
    Ranged {
        /// Accounts generated per subgroup, capped by the subgroup range.
        accounts_per_subgroup: u32,
    },
    /// Fifteen seven-digit accounts.
    Compact,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle::Ranged {
            accounts_per_subgroup: 20,
        }
    }
}

const COMPACT_CHART: [(&str, &str, AccountRole); 15] = [
    ("4000000", "Product Sales Revenue", AccountRole::SalesRevenue),
    ("4010000", "Service Revenue", AccountRole::OtherRevenue),
    ("4020000", "Other Revenue", AccountRole::OtherRevenue),
    ("5000000", "Cost of Goods Sold", AccountRole::Cogs),
    ("5010000", "Material Costs", AccountRole::Cogs),
    ("5020000", "Labor Costs", AccountRole::Cogs),
    ("6000000", "Sales & Marketing", AccountRole::OperatingExpenses),
    ("6010000", "Research & Development", AccountRole::OperatingExpenses),
    ("6020000", "General & Administrative", AccountRole::OperatingExpenses),
    ("6030000", "Employee Costs", AccountRole::OperatingExpenses),
    ("1000000", "Cash and Cash Equivalents", AccountRole::Cash),
    ("1100000", "Accounts Receivable", AccountRole::Receivables),
    ("1200000", "Inventory", AccountRole::Inventory),
    ("2000000", "Accounts Payable", AccountRole::Payables),
    ("2100000", "Accrued Expenses", AccountRole::AccruedExpenses),
];

/// Build the chart of accounts for a style.
pub fn build_chart(style: ChartStyle) -> Vec<GlAccount> {
    match style {
        ChartStyle::Ranged {
            accounts_per_subgroup,
        } => AccountRole::ALL
            .iter()
            .flat_map(|role| {
                let (start, end) = role.range();
                let last = end.min(start.saturating_add(accounts_per_subgroup).saturating_sub(1));
                (start..=last).map(move |n| {
                    let number = format!("{n:06}");
                    let description = format!("{} Account {}", role.label(), number);
                    GlAccount::new(number, description, *role)
                })
            })
            .collect(),
        ChartStyle::Compact => COMPACT_CHART
            .iter()
            .map(|(number, description, role)| GlAccount::new(*number, *description, *role))
            .collect(),
    }
}

/// Accounts indexed by subgroup.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    by_role: BTreeMap<AccountRole, Vec<GlAccountId>>,
    cash: Vec<GlAccountId>,
}

impl AccountBook {
    /// Index a chart.
    pub fn new(accounts: &[GlAccount]) -> Self {
        let mut by_role: BTreeMap<AccountRole, Vec<GlAccountId>> = BTreeMap::new();
        for account in accounts {
            by_role
                .entry(account.account_subgroup)
                .or_default()
                .push(account.gl_account.clone());
        }
        let cash = accounts
            .iter()
            .filter(|a| a.is_cash())
            .map(|a| a.gl_account.clone())
            .collect();
        Self { by_role, cash }
    }

    /// Accounts of one subgroup.
    pub fn accounts(&self, role: AccountRole) -> &[GlAccountId] {
        self.by_role.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the chart has at least one account for the role.
    pub fn has(&self, role: AccountRole) -> bool {
        !self.accounts(role).is_empty()
    }

    /// Random account of a subgroup.
    pub fn pick(&self, role: AccountRole, rng: &mut FabricRng) -> FabricResult<GlAccountId> {
        rng.pick(self.accounts(role), ReferenceTable::GlAccount)
            .cloned()
    }

    /// First account of a subgroup.
    pub fn primary(&self, role: AccountRole) -> FabricResult<GlAccountId> {
        self.accounts(role)
            .first()
            .cloned()
            .ok_or(FabricError::EmptyReference {
                table: ReferenceTable::GlAccount,
            })
    }

    /// Cash and bank accounts, matched by description.
    pub fn cash(&self) -> &[GlAccountId] {
        &self.cash
    }

    /// Random cash or bank account.
    pub fn pick_cash(&self, rng: &mut FabricRng) -> FabricResult<GlAccountId> {
        rng.pick(&self.cash, ReferenceTable::GlAccount).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountGroup, Statement};
    use std::collections::HashSet;

    #[test]
    fn test_ranged_chart() {
        let chart = build_chart(ChartStyle::Ranged {
            accounts_per_subgroup: 20,
        });
        assert_eq!(chart.len(), 22 * 20);
        assert_eq!(chart[0].gl_account.as_str(), "100000");
        assert_eq!(chart[0].account_description, "Cash Account 100000");

        let ids: HashSet<_> = chart.iter().map(|a| a.gl_account.clone()).collect();
        assert_eq!(ids.len(), chart.len());
        assert!(chart.iter().all(|a| a.gl_account.as_str().len() == 6));
    }

    #[test]
    fn test_ranged_chart_capped_by_range() {
        let chart = build_chart(ChartStyle::Ranged {
            accounts_per_subgroup: 50_000,
        });
        let cash = chart
            .iter()
            .filter(|a| a.account_subgroup == AccountRole::Cash)
            .count();
        assert_eq!(cash, 10_000);
    }

    #[test]
    fn test_compact_chart() {
        let chart = build_chart(ChartStyle::Compact);
        assert_eq!(chart.len(), 15);
        let revenue = chart
            .iter()
            .filter(|a| a.account_group == AccountGroup::Revenue)
            .count();
        assert_eq!(revenue, 3);
        assert!(chart
            .iter()
            .filter(|a| a.account_group == AccountGroup::Expense)
            .all(|a| a.account_type == Statement::ProfitAndLoss));
    }

    #[test]
    fn test_account_book_cash_by_description() {
        let book = AccountBook::new(&build_chart(ChartStyle::Compact));
        assert_eq!(book.cash().len(), 1);
        assert_eq!(book.cash()[0].as_str(), "1000000");
        assert_eq!(book.primary(AccountRole::Cogs).unwrap().as_str(), "5000000");
    }

    #[test]
    fn test_account_book_missing_role() {
        let book = AccountBook::new(&build_chart(ChartStyle::Compact));
        let mut rng = FabricRng::seeded(1);
        assert!(!book.has(AccountRole::ShareCapital));
        assert!(matches!(
            book.pick(AccountRole::ShareCapital, &mut rng),
            Err(FabricError::EmptyReference {
                table: ReferenceTable::GlAccount
            })
        ));
    }
}
