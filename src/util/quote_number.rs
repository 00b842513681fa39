use chrono::Utc;

pub const QUOTE_NUMBER_PREFIX: &str = "NF";

/// Source of customer-facing quote references.
pub trait QuoteNumberGenerator: Send + Sync {
    fn next_quote_number(&self) -> String;
}

/// `NF` followed by the last eight digits of the epoch-millisecond clock.
///
/// Two submissions in the same millisecond (modulo 10^8) collide; the unique
/// index on `quoteNumber` turns that into a failed insert.
#[derive(Debug, Default, Clone, Copy)]
pub struct EpochQuoteNumberGenerator;

impl QuoteNumberGenerator for EpochQuoteNumberGenerator {
    fn next_quote_number(&self) -> String {
        quote_number_from_millis(Utc::now().timestamp_millis())
    }
}

pub fn quote_number_from_millis(millis: i64) -> String {
    format!("{}{:08}", QUOTE_NUMBER_PREFIX, millis.rem_euclid(100_000_000))
}

pub fn is_quote_number(candidate: &str) -> bool {
    candidate
        .strip_prefix(QUOTE_NUMBER_PREFIX)
        .is_some_and(|digits| digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()))
}
