use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::transaction::Transaction;

// ----------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
/// Identifies a calendar month. Ordered chronologically.
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns `None` unless `month` is within `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// English name of the month, without the year.
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .map_or("Unknown", |month| month.name())
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

// ----------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Running totals for every transaction that fell within one month.
pub struct MonthlyStats {
    pub transaction_count: usize,
    pub credit_count: usize,
    pub debit_count: usize,
    pub total_credit: Decimal,
    pub total_debit: Decimal,
}

impl MonthlyStats {
    fn record(&mut self, transaction: &Transaction) {
        let amount: Decimal = transaction.amount().into();

        self.transaction_count += 1;
        if transaction.is_credit() {
            self.credit_count += 1;
            self.total_credit += amount;
        } else {
            self.debit_count += 1;
            self.total_debit += amount;
        }
    }
}

// ----------------------------------------------------------------------------

#[derive(Debug, Default)]
/// Incrementally built statistics over an append-only ledger.
///
/// The balance always equals the sum of credits minus the sum of debits, and
/// the bucket counts always add up to the ledger length.
pub struct Account {
    transactions: Vec<Transaction>,
    balance: Decimal,
    monthly_stats: BTreeMap<MonthKey, MonthlyStats>,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transaction to the ledger and folds it into the balance and
    /// its month's bucket. Adding the same transaction twice counts it twice.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.balance += transaction.signed_amount();
        self.monthly_stats
            .entry(MonthKey::from(transaction.date()))
            .or_default()
            .record(&transaction);
        self.transactions.push(transaction);
    }

    pub fn total_balance(&self) -> Decimal {
        self.balance
    }

    /// The ledger, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Every bucket created so far, oldest month first.
    pub fn monthly_stats(&self) -> impl Iterator<Item = (&MonthKey, &MonthlyStats)> {
        self.monthly_stats.iter()
    }

    pub fn monthly_transaction_counts(&self) -> BTreeMap<MonthKey, usize> {
        self.monthly_stats
            .iter()
            .map(|(key, stats)| (*key, stats.transaction_count))
            .collect()
    }

    /// Mean credit amount, or zero when there are no credits.
    pub fn average_credit_amount(&self) -> Decimal {
        let (total, count) = self
            .monthly_stats
            .values()
            .fold((Decimal::ZERO, 0), |(total, count), stats| {
                (total + stats.total_credit, count + stats.credit_count)
            });

        average(total, count)
    }

    /// Mean debit amount, or zero when there are no debits.
    pub fn average_debit_amount(&self) -> Decimal {
        let (total, count) = self
            .monthly_stats
            .values()
            .fold((Decimal::ZERO, 0), |(total, count), stats| {
                (total + stats.total_debit, count + stats.debit_count)
            });

        average(total, count)
    }
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }

    total / Decimal::from(count)
}

// ----------------------------------------------------------------------------
