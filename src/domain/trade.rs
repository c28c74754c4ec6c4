//! Spot trade event record.

use crate::domain::{Decimal, FeeCurrency, Instrument, Side, TimeMs};
use serde::{Deserialize, Serialize};

/// A single recorded spot buy or sell.
///
/// This is the normalized form the position engine consumes: the symbol is
/// uppercased, the quantity is already resolved from either a direct amount
/// or a notional conversion, and the fee is defaulted. The `side` label is
/// kept as stored; the engine re-validates it when folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotTrade {
    /// Row id once persisted; also the tie-breaker for equal timestamps.
    pub id: Option<i64>,
    pub symbol: Instrument,
    /// Side label, contractually "BUY" or "SELL".
    pub side: String,
    /// Base units traded, positive.
    pub quantity: Decimal,
    /// Quote units per base unit, positive.
    pub price: Decimal,
    /// Fee paid, denominated per `fee_currency`.
    pub fee: Decimal,
    pub fee_currency: FeeCurrency,
    pub traded_at: TimeMs,
    pub note: Option<String>,
}

impl SpotTrade {
    /// Create an unpersisted trade with a validated side.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: Instrument,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        fee: Decimal,
        fee_currency: FeeCurrency,
        traded_at: TimeMs,
        note: Option<String>,
    ) -> Self {
        SpotTrade {
            id: None,
            symbol,
            side: side.as_str().to_string(),
            quantity,
            price,
            fee,
            fee_currency,
            traded_at,
            note,
        }
    }

    /// Same trade with the persisted row id attached.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
