use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::{Account, MonthKey};

/// Read-only snapshot of an [`Account`], taken at projection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_balance: Decimal,
    pub monthly_transaction_counts: BTreeMap<MonthKey, usize>,
    pub average_credit_amount: Decimal,
    pub average_debit_amount: Decimal,
}

impl Summary {
    pub fn project(account: &Account) -> Self {
        Self {
            total_balance: account.total_balance(),
            monthly_transaction_counts: account.monthly_transaction_counts(),
            average_credit_amount: account.average_credit_amount(),
            average_debit_amount: account.average_debit_amount(),
        }
    }

    /// Transaction counts keyed by month name only, for consumers that predate
    /// year-aware keys. The same month of different years is summed.
    pub fn counts_by_month_name(&self) -> HashMap<&'static str, usize> {
        self.monthly_transaction_counts
            .iter()
            .map(|(key, count)| (key.month_name(), *count))
            .into_grouping_map()
            .sum()
    }
}

impl From<&Account> for Summary {
    fn from(account: &Account) -> Self {
        Self::project(account)
    }
}

// ----------------------------------------------------------------------------
