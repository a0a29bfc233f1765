use std::collections::BTreeMap;
use std::io::Read;

use anyhow::{bail, Context, Result};
use csv::Trim;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::MonthKey;
use crate::summary::Summary;
use crate::transaction::RawTransaction;

pub const HEADER: [&str; 3] = ["Id", "Date", "Transaction"];

/// One line of a transaction statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Transaction")]
    pub amount: String,
}

impl From<TransactionRow> for RawTransaction {
    fn from(row: TransactionRow) -> Self {
        RawTransaction::new(row.id, row.date, row.amount)
    }
}

/// Reads a whole statement. Any malformed line fails the entire read.
///
/// Columns beyond the first three are ignored.
pub fn read_transactions<R: Read>(input: R) -> Result<Vec<RawTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers().context("unable to read csv header")?;
    if headers.len() < HEADER.len() || headers.iter().take(HEADER.len()).ne(HEADER) {
        bail!("invalid csv header, expected: {}", HEADER.join(","));
    }

    reader
        .deserialize::<TransactionRow>()
        .enumerate()
        .map(|(line, row)| {
            row.map(RawTransaction::from)
                .with_context(|| format!("unable to deserialize record {}", line + 1))
        })
        .collect()
}

// ----------------------------------------------------------------------------

/// The summary of one run, tagged with the account it belongs to. This is what
/// gets handed to whatever stores or sends it.
#[derive(Debug, Serialize)]
pub struct Output {
    account_id: String,
    total_balance: Decimal,
    monthly_transaction_counts: BTreeMap<MonthKey, usize>,
    average_credit_amount: Decimal,
    average_debit_amount: Decimal,
}

impl Output {
    pub fn new(account_id: impl Into<String>, summary: Summary) -> Self {
        Self {
            account_id: account_id.into(),
            total_balance: summary.total_balance,
            monthly_transaction_counts: summary.monthly_transaction_counts,
            average_credit_amount: summary.average_credit_amount,
            average_debit_amount: summary.average_debit_amount,
        }
    }
}

// ----------------------------------------------------------------------------
