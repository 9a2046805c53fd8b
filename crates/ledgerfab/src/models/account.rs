//! General ledger account master data.

use serde::Serialize;
use std::fmt;

use crate::registry::GlAccountId;

/// Top-level account group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountGroup {
    /// Assets.
    Asset,
    /// Liabilities.
    Liability,
    /// Equity.
    Equity,
    /// Revenue.
    Revenue,
    /// Expenses.
    Expense,
}

impl AccountGroup {
    /// Statement the group reports on.
    pub fn statement(&self) -> Statement {
        match self {
            AccountGroup::Asset | AccountGroup::Liability | AccountGroup::Equity => {
                Statement::BalanceSheet
            }
            AccountGroup::Revenue | AccountGroup::Expense => Statement::ProfitAndLoss,
        }
    }
}

/// Financial statement an account reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Statement {
    /// Balance sheet.
    #[serde(rename = "Balance Sheet")]
    BalanceSheet,
    /// Profit and loss.
    #[serde(rename = "P&L")]
    ProfitAndLoss,
}

/// Account subgroup; synthesizers resolve accounts through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AccountRole {
    /// Cash and bank.
    #[serde(rename = "Cash")]
    Cash,
    /// Trade receivables.
    #[serde(rename = "Receivables")]
    Receivables,
    /// Inventory.
    #[serde(rename = "Inventory")]
    Inventory,
    /// Fixed assets at cost.
    #[serde(rename = "Fixed Assets Gross")]
    FixedAssetsGross,
    /// Contra account to fixed assets.
    #[serde(rename = "Accumulated Depreciation")]
    AccumulatedDepreciation,
    /// Other current assets.
    #[serde(rename = "Other Current Assets")]
    OtherCurrentAssets,
    /// Other non-current assets.
    #[serde(rename = "Other Non-Current Assets")]
    OtherNonCurrentAssets,
    /// Trade payables.
    #[serde(rename = "Payables")]
    Payables,
    /// Short-term debt.
    #[serde(rename = "Short-Term Debt")]
    ShortTermDebt,
    /// Accrued expenses.
    #[serde(rename = "Accrued Expenses")]
    AccruedExpenses,
    /// Long-term debt.
    #[serde(rename = "Long-Term Debt")]
    LongTermDebt,
    /// Other liabilities.
    #[serde(rename = "Other Liabilities")]
    OtherLiabilities,
    /// Share capital.
    #[serde(rename = "Share Capital")]
    ShareCapital,
    /// Retained earnings.
    #[serde(rename = "Retained Earnings")]
    RetainedEarnings,
    /// Product sales.
    #[serde(rename = "Sales Revenue")]
    SalesRevenue,
    /// Service and other revenue.
    #[serde(rename = "Other Revenue")]
    OtherRevenue,
    /// Cost of goods sold.
    #[serde(rename = "COGS")]
    Cogs,
    /// Operating expenses.
    #[serde(rename = "Operating Expenses")]
    OperatingExpenses,
    /// Depreciation expense.
    #[serde(rename = "Depreciation Expense")]
    DepreciationExpense,
    /// Interest expense.
    #[serde(rename = "Interest Expense")]
    InterestExpense,
    /// Income tax expense.
    #[serde(rename = "Tax Expense")]
    TaxExpense,
    /// Other expenses.
    #[serde(rename = "Other Expenses")]
    OtherExpenses,
}

impl AccountRole {
    /// Every role in chart order.
    pub const ALL: [AccountRole; 22] = [
        AccountRole::Cash,
        AccountRole::Receivables,
        AccountRole::Inventory,
        AccountRole::FixedAssetsGross,
        AccountRole::AccumulatedDepreciation,
        AccountRole::OtherCurrentAssets,
        AccountRole::OtherNonCurrentAssets,
        AccountRole::Payables,
        AccountRole::ShortTermDebt,
        AccountRole::AccruedExpenses,
        AccountRole::LongTermDebt,
        AccountRole::OtherLiabilities,
        AccountRole::ShareCapital,
        AccountRole::RetainedEarnings,
        AccountRole::SalesRevenue,
        AccountRole::OtherRevenue,
        AccountRole::Cogs,
        AccountRole::OperatingExpenses,
        AccountRole::DepreciationExpense,
        AccountRole::InterestExpense,
        AccountRole::TaxExpense,
        AccountRole::OtherExpenses,
    ];

    /// Display label, also used in ranged account descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            AccountRole::Cash => "Cash",
            AccountRole::Receivables => "Receivables",
            AccountRole::Inventory => "Inventory",
            AccountRole::FixedAssetsGross => "Fixed Assets Gross",
            AccountRole::AccumulatedDepreciation => "Accumulated Depreciation",
            AccountRole::OtherCurrentAssets => "Other Current Assets",
            AccountRole::OtherNonCurrentAssets => "Other Non-Current Assets",
            AccountRole::Payables => "Payables",
            AccountRole::ShortTermDebt => "Short-Term Debt",
            AccountRole::AccruedExpenses => "Accrued Expenses",
            AccountRole::LongTermDebt => "Long-Term Debt",
            AccountRole::OtherLiabilities => "Other Liabilities",
            AccountRole::ShareCapital => "Share Capital",
            AccountRole::RetainedEarnings => "Retained Earnings",
            AccountRole::SalesRevenue => "Sales Revenue",
            AccountRole::OtherRevenue => "Other Revenue",
            AccountRole::Cogs => "COGS",
            AccountRole::OperatingExpenses => "Operating Expenses",
            AccountRole::DepreciationExpense => "Depreciation Expense",
            AccountRole::InterestExpense => "Interest Expense",
            AccountRole::TaxExpense => "Tax Expense",
            AccountRole::OtherExpenses => "Other Expenses",
        }
    }

    /// Inclusive account number range of the subgroup in a ranged chart.
    pub fn range(&self) -> (u32, u32) {
        match self {
            AccountRole::Cash => (100_000, 109_999),
            AccountRole::Receivables => (110_000, 119_999),
            AccountRole::Inventory => (120_000, 129_999),
            AccountRole::FixedAssetsGross => (130_000, 139_999),
            AccountRole::AccumulatedDepreciation => (140_000, 149_999),
            AccountRole::OtherCurrentAssets => (150_000, 159_999),
            AccountRole::OtherNonCurrentAssets => (160_000, 199_999),
            AccountRole::Payables => (200_000, 209_999),
            AccountRole::ShortTermDebt => (210_000, 219_999),
            AccountRole::AccruedExpenses => (220_000, 229_999),
            AccountRole::LongTermDebt => (230_000, 239_999),
            AccountRole::OtherLiabilities => (240_000, 299_999),
            AccountRole::ShareCapital => (300_000, 309_999),
            AccountRole::RetainedEarnings => (310_000, 319_999),
            AccountRole::SalesRevenue => (400_000, 409_999),
            AccountRole::OtherRevenue => (410_000, 499_999),
            AccountRole::Cogs => (500_000, 509_999),
            AccountRole::OperatingExpenses => (510_000, 599_999),
            AccountRole::DepreciationExpense => (600_000, 609_999),
            AccountRole::InterestExpense => (610_000, 619_999),
            AccountRole::TaxExpense => (620_000, 629_999),
            AccountRole::OtherExpenses => (630_000, 699_999),
        }
    }

    /// Account group the subgroup belongs to.
    pub fn group(&self) -> AccountGroup {
        match self {
            AccountRole::Cash
            | AccountRole::Receivables
            | AccountRole::Inventory
            | AccountRole::FixedAssetsGross
            | AccountRole::AccumulatedDepreciation
            | AccountRole::OtherCurrentAssets
            | AccountRole::OtherNonCurrentAssets => AccountGroup::Asset,
            AccountRole::Payables
            | AccountRole::ShortTermDebt
            | AccountRole::AccruedExpenses
            | AccountRole::LongTermDebt
            | AccountRole::OtherLiabilities => AccountGroup::Liability,
            AccountRole::ShareCapital | AccountRole::RetainedEarnings => AccountGroup::Equity,
            AccountRole::SalesRevenue | AccountRole::OtherRevenue => AccountGroup::Revenue,
            AccountRole::Cogs
            | AccountRole::OperatingExpenses
            | AccountRole::DepreciationExpense
            | AccountRole::InterestExpense
            | AccountRole::TaxExpense
            | AccountRole::OtherExpenses => AccountGroup::Expense,
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the chart of accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlAccount {
    /// Account number.
    pub gl_account: GlAccountId,
    /// Description.
    pub account_description: String,
    /// Top-level group.
    pub account_group: AccountGroup,
    /// Subgroup.
    pub account_subgroup: AccountRole,
    /// Statement.
    pub account_type: Statement,
    /// Whether postings carry a profit center.
    pub profit_center_relevant: bool,
}

impl GlAccount {
    /// Create an account for a role.
    pub fn new(number: impl Into<String>, description: impl Into<String>, role: AccountRole) -> Self {
        let group = role.group();
        Self {
            gl_account: GlAccountId::new(number),
            account_description: description.into(),
            account_group: group,
            account_subgroup: role,
            account_type: group.statement(),
            profit_center_relevant: group.statement() == Statement::ProfitAndLoss,
        }
    }

    /// Cash or bank account by description.
    pub fn is_cash(&self) -> bool {
        self.account_description.contains("Cash") || self.account_description.contains("Bank")
    }
}
