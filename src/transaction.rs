use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

// ----------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid date format: {0:?}")]
    InvalidDateFormat(String),
    #[error("invalid amount format: {0:?}")]
    InvalidAmountFormat(String),
}

// ----------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Clone, Copy)]
/// The magnitude of a transaction. Never negative, the direction of the money
/// is carried separately by [`Transaction::is_credit`].
pub struct Amount(Decimal);

/// Largest magnitude a single transaction may carry: one quadrillion. Summing
/// more than 79 trillion such amounts is what it takes to overflow a `Decimal`
/// balance, so no realistic ledger can make the aggregates overflow.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);
}

impl TryFrom<Decimal> for Amount {
    type Error = ParseError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ParseError::InvalidAmountFormat(value.to_string()));
        }

        if value > Decimal::from(MAX_AMOUNT_UNITS) {
            return Err(ParseError::InvalidAmountFormat(value.to_string()));
        }

        Ok(Self(value.abs()))
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
/// A transaction as it comes out of the source, before any validation.
pub struct RawTransaction {
    pub id: String,
    pub date: String,
    pub amount: String,
}

impl RawTransaction {
    pub fn new(id: impl Into<String>, date: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            amount: amount.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A validated ledger entry. Immutable once built.
pub struct Transaction {
    id: String,
    date: NaiveDate,
    amount: Amount,
    is_credit: bool,
}

impl Transaction {
    pub fn new(id: impl Into<String>, date: NaiveDate, amount: Amount, is_credit: bool) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            is_credit,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Whether this transaction increases the balance.
    pub fn is_credit(&self) -> bool {
        self.is_credit
    }

    /// The amount with its direction applied: positive for credits, negative
    /// for debits.
    pub fn signed_amount(&self) -> Decimal {
        let magnitude: Decimal = self.amount.into();
        if self.is_credit {
            magnitude
        } else {
            -magnitude
        }
    }
}

// ----------------------------------------------------------------------------

/// Turns raw `(id, "M/D", "±amount")` triples into [`Transaction`]s.
///
/// Input dates carry no year, so every date is placed in the parser's
/// reference year. The parser never looks at the clock: the same input always
/// yields the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionParser {
    reference_year: i32,
}

impl TransactionParser {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn parse(
        &self,
        id: impl Into<String>,
        raw_date: &str,
        raw_amount: &str,
    ) -> Result<Transaction, ParseError> {
        let (amount, is_credit) = parse_amount(raw_amount)?;
        let date = parse_date(raw_date, self.reference_year)?;

        Ok(Transaction::new(id, date, amount, is_credit))
    }

    pub fn parse_raw(&self, raw: &RawTransaction) -> Result<Transaction, ParseError> {
        self.parse(raw.id.as_str(), &raw.date, &raw.amount)
    }
}

/// Splits off an optional leading sign. Anything but `-` is a credit. The
/// magnitude may not exceed [`MAX_AMOUNT_UNITS`].
fn parse_amount(raw: &str) -> Result<(Amount, bool), ParseError> {
    let invalid = || ParseError::InvalidAmountFormat(raw.to_owned());

    let (magnitude, is_credit) = match raw.strip_prefix('-') {
        Some(rest) => (rest, false),
        None => (raw.strip_prefix('+').unwrap_or(raw), true),
    };

    // only one sign is allowed
    if magnitude.starts_with(|c: char| c == '+' || c == '-') {
        return Err(invalid());
    }

    let value = Decimal::from_str(magnitude).map_err(|_| invalid())?;
    let amount = Amount::try_from(value).map_err(|_| invalid())?;

    Ok((amount, is_credit))
}

/// Parses `M/D` into a calendar date within `year`.
fn parse_date(raw: &str, year: i32) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDateFormat(raw.to_owned());

    let mut segments = raw.split('/');
    let (month, day) = match (segments.next(), segments.next(), segments.next()) {
        (Some(month), Some(day), None) => (month, day),
        _ => return Err(invalid()),
    };

    let month = parse_segment(month).ok_or_else(invalid)?;
    let day = parse_segment(day).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn parse_segment(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    segment.parse().ok()
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::{Amount, ParseError, RawTransaction, TransactionParser};

    macro_rules! money {
        ($dec:expr) => {
            Amount(dec!($dec))
        };
    }

    fn parser() -> TransactionParser {
        TransactionParser::new(2024)
    }

    #[test]
    fn parse_credit() {
        let tx = parser().parse("0", "7/15", "+60.5").expect("valid transaction");

        assert_eq!(tx.id(), "0");
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date"));
        assert_eq!(tx.amount(), money!(60.5));
        assert!(tx.is_credit());
        assert_eq!(tx.signed_amount(), dec!(60.5));
    }

    #[test]
    fn parse_debit() {
        let tx = parser().parse("1", "7/28", "-10.3").expect("valid transaction");

        assert_eq!(tx.amount(), money!(10.3));
        assert!(!tx.is_credit());
        assert_eq!(tx.signed_amount(), dec!(-10.3));
    }

    #[test]
    fn unsigned_amount_is_a_credit() {
        let tx = parser().parse("3", "8/13", "10").expect("valid transaction");

        assert_eq!(tx.amount(), money!(10));
        assert!(tx.is_credit());
    }

    #[test]
    fn negative_zero_is_a_zero_debit() {
        let tx = parser().parse("4", "1/1", "-0").expect("valid transaction");

        assert_eq!(tx.amount(), Amount::ZERO);
        assert!(!tx.is_credit());
    }

    #[test]
    fn reference_year_is_applied() {
        let raw = RawTransaction::new("0", "2/29", "+1");

        let parser = TransactionParser::new(2024);
        assert_eq!(parser.reference_year(), 2024);

        let leap = parser.parse_raw(&raw).expect("2024 is a leap year");
        assert_eq!(leap.date(), NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"));

        assert_eq!(
            TransactionParser::new(2023).parse_raw(&raw),
            Err(ParseError::InvalidDateFormat("2/29".to_owned()))
        );
    }

    #[test]
    fn same_input_same_output() {
        let first = parser().parse("0", "12/31", "-1.25");
        let second = parser().parse("0", "12/31", "-1.25");

        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_date_is_rejected() {
        assert_eq!(
            parser().parse("0", "13/45", "+1"),
            Err(ParseError::InvalidDateFormat("13/45".to_owned()))
        );
        assert!(parser().parse("0", "0/10", "+1").is_err());
        assert!(parser().parse("0", "4/31", "+1").is_err());
    }

    #[test]
    fn malformed_dates() {
        for date in ["", "7", "7/15/2024", "July/15", "7/", "/15", "-7/15", "+7/15", "7 /15"] {
            assert_eq!(
                parser().parse("0", date, "+1"),
                Err(ParseError::InvalidDateFormat(date.to_owned())),
                "{date:?} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_amounts() {
        for amount in ["", "+", "-", "abc", "+-5", "--5", "++5", "1.2.3", "$5"] {
            assert_eq!(
                parser().parse("0", "7/15", amount),
                Err(ParseError::InvalidAmountFormat(amount.to_owned())),
                "{amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn amount_error_takes_precedence() {
        assert!(matches!(
            parser().parse("0", "bad", "bad"),
            Err(ParseError::InvalidAmountFormat(_))
        ));
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        for amount in ["+79228162514264337593543950335", "-1000000000000000.01", "1e30"] {
            assert_eq!(
                parser().parse("0", "1/1", amount),
                Err(ParseError::InvalidAmountFormat(amount.to_owned())),
                "{amount:?} should be rejected"
            );
        }

        let largest = parser()
            .parse("0", "1/1", "-1000000000000000")
            .expect("the bound itself is allowed");
        assert_eq!(largest.amount(), money!(1000000000000000));
        assert!(!largest.is_credit());
    }

    #[test]
    fn negative_amount_is_not_a_magnitude() {
        assert!(Amount::try_from(dec!(-1.0)).is_err());
        assert_eq!(Amount::try_from(dec!(1.0)), Ok(money!(1.0)));
    }
}
