use log::{debug, info};

use crate::account::Account;
use crate::transaction::{ParseError, RawTransaction, TransactionParser};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("unable to parse transaction {id:?} (record {index})")]
    InvalidTransaction {
        index: usize,
        id: String,
        #[source]
        source: ParseError,
    },
}

type ProcessingResult = Result<Account, ProcessingError>;

// ----------------------------------------------------------------------------

/// Builds a fresh account from raw transactions, in order.
///
/// The first record that fails to parse aborts the whole run; the partially
/// built account is dropped and never handed back.
pub fn ingest<I>(parser: &TransactionParser, rows: I) -> ProcessingResult
where
    I: IntoIterator<Item = RawTransaction>,
{
    let mut account = Account::new();

    for (index, row) in rows.into_iter().enumerate() {
        let transaction = parser
            .parse_raw(&row)
            .map_err(|source| ProcessingError::InvalidTransaction {
                index,
                id: row.id.clone(),
                source,
            })?;

        debug!(
            "ingesting transaction {} dated {} ({})",
            transaction.id(),
            transaction.date(),
            transaction.signed_amount()
        );
        account.add_transaction(transaction);
    }

    info!(
        "ingested {} transactions across {} months",
        account.len(),
        account.monthly_stats().count()
    );

    Ok(account)
}

// ----------------------------------------------------------------------------
