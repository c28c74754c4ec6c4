//! Domain primitives: TimeMs, Instrument, Side, FeeCurrency, Currency.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        TimeMs(chrono::Utc::now().timestamp_millis())
    }

    /// Get the underlying milliseconds value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Traded instrument symbol (e.g., "BTCUSDT", "ETH").
///
/// Stored uppercase; use [`Instrument::normalized`] at input boundaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Instrument(pub String);

impl Instrument {
    /// Create an Instrument from an already-normalized string.
    pub fn new(symbol: String) -> Self {
        Instrument(symbol)
    }

    /// Normalize a raw symbol: trim whitespace and uppercase.
    pub fn normalized(symbol: &str) -> Self {
        Instrument(symbol.trim().to_ascii_uppercase())
    }

    /// Get the symbol as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid side {0:?}, expected BUY or SELL")]
pub struct ParseSideError(pub String);

/// Trade side: BUY or SELL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Canonical stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Currency a trade fee is denominated in.
///
/// `base` fees come out of the received quantity on buys; everything else
/// behaves as `quote`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeCurrency {
    Base,
    #[default]
    #[serde(other)]
    Quote,
}

impl FeeCurrency {
    /// Interpret a stored label. Only "base" (any case) selects the base
    /// side; unknown or empty labels fall back to quote.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("base") {
            FeeCurrency::Base
        } else {
            FeeCurrency::Quote
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeeCurrency::Base => "base",
            FeeCurrency::Quote => "quote",
        }
    }
}

impl std::fmt::Display for FeeCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid currency {0:?}, expected USDT or MYR")]
pub struct ParseCurrencyError(pub String);

/// Currency of an invested amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usdt,
    Myr,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usdt => "USDT",
            Currency::Myr => "MYR",
        }
    }
}

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USDT" => Ok(Currency::Usdt),
            "MYR" => Ok(Currency::Myr),
            _ => Err(ParseCurrencyError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse_case_insensitive() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!("Sell".parse::<Side>().unwrap(), Side::Sell);
    }

    #[test]
    fn test_side_parse_rejects_unknown() {
        let err = "HOLD".parse::<Side>().unwrap_err();
        assert_eq!(err.0, "HOLD");
    }

    #[test]
    fn test_instrument_normalized() {
        let sym = Instrument::normalized("  btcusdt ");
        assert_eq!(sym.as_str(), "BTCUSDT");
    }

    #[test]
    fn test_fee_currency_from_label() {
        assert_eq!(FeeCurrency::from_label("base"), FeeCurrency::Base);
        assert_eq!(FeeCurrency::from_label("BASE"), FeeCurrency::Base);
        assert_eq!(FeeCurrency::from_label("quote"), FeeCurrency::Quote);
        // unknown labels behave as quote
        assert_eq!(FeeCurrency::from_label("bnb"), FeeCurrency::Quote);
        assert_eq!(FeeCurrency::from_label(""), FeeCurrency::Quote);
    }

    #[test]
    fn test_fee_currency_unknown_deserializes_as_quote() {
        let fc: FeeCurrency = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(fc, FeeCurrency::Quote);
        let fc: FeeCurrency = serde_json::from_str("\"base\"").unwrap();
        assert_eq!(fc, FeeCurrency::Base);
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usdt".parse::<Currency>().unwrap(), Currency::Usdt);
        assert_eq!("MYR".parse::<Currency>().unwrap(), Currency::Myr);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_timems_ordering() {
        let t1 = TimeMs::new(1000);
        let t2 = TimeMs::new(2000);
        assert!(t1 < t2);
    }
}
