//! Journal records kept alongside spot trades: bot profits and invested
//! capital.

use crate::domain::{Currency, Decimal, Instrument, TimeMs};
use serde::{Deserialize, Serialize};

/// Realized profit from one closed bot run, already in quote currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotProfit {
    pub id: Option<i64>,
    pub bot_name: Option<String>,
    pub symbol: Instrument,
    /// Signed profit for the run.
    pub profit: Decimal,
    pub closed_at: TimeMs,
    pub note: Option<String>,
}

/// A capital deposit (or withdrawal, when negative) in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Option<i64>,
    pub currency: Currency,
    pub amount: Decimal,
    pub invested_at: TimeMs,
    pub note: Option<String>,
}
