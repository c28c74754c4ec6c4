//! Position accumulator: folds spot trades into per-instrument position,
//! weighted-average cost, and realized P&L.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::domain::{Decimal, FeeCurrency, Instrument, Side, SpotTrade, TimeMs};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid trade side {0:?}, expected BUY or SELL")]
    InvalidTradeSide(String),
}

/// Accumulated position state for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstrumentState {
    /// Held amount, never negative.
    pub quantity: Decimal,
    /// Quote-currency cost attributed to the current quantity, never negative.
    pub cost_basis_total: Decimal,
    /// Cumulative signed P&L crystallized by sells.
    pub realized_pnl: Decimal,
    /// Timestamp of the most recent trade, in chronological order.
    pub last_trade_at: Option<TimeMs>,
    /// Price of the most recent buy, zero before the first buy.
    pub last_buy_price: Decimal,
    /// Sum of (sell price - last buy price) * sell quantity over all sells.
    pub total_gross_profit: Decimal,
}

impl InstrumentState {
    /// Blended average cost of the held quantity, zero when flat.
    pub fn average_cost(&self) -> Decimal {
        if self.quantity.is_positive() {
            self.cost_basis_total / self.quantity
        } else {
            Decimal::zero()
        }
    }

    /// Held quantity valued at the most recent buy price.
    pub fn source_price(&self) -> Decimal {
        self.quantity * self.last_buy_price
    }

    /// Per-unit cost implied by the last buy price net of gross profit,
    /// zero when flat.
    pub fn cost_price(&self) -> Decimal {
        if self.quantity.is_positive() {
            (self.source_price() - self.total_gross_profit) / self.quantity
        } else {
            Decimal::zero()
        }
    }
}

/// Fold a set of trades into per-instrument states.
///
/// Trades are processed in ascending `traded_at` order across all
/// instruments; ties fall back to the persisted row id, then to input
/// order. The input is not mutated and no state is kept between calls, so
/// feeding the same trades in any order produces the same result.
///
/// Numeric fields are trusted as supplied: a sell that exceeds the held
/// quantity clamps the position (and its cost basis) to flat rather than
/// going short, and non-positive quantities or prices pass through
/// arithmetically.
///
/// # Errors
/// Fails with [`PositionError::InvalidTradeSide`] if any trade's side label
/// is neither BUY nor SELL; no partial result is returned.
pub fn compute_positions(
    trades: &[SpotTrade],
) -> Result<BTreeMap<Instrument, InstrumentState>, PositionError> {
    let mut ordered: Vec<&SpotTrade> = trades.iter().collect();
    ordered.sort_by_key(|t| (t.traded_at, t.id));

    let mut states: BTreeMap<Instrument, InstrumentState> = BTreeMap::new();

    for trade in ordered {
        let side: Side = trade
            .side
            .parse()
            .map_err(|_| PositionError::InvalidTradeSide(trade.side.clone()))?;

        let state = states.entry(trade.symbol.clone()).or_default();
        state.last_trade_at = Some(trade.traded_at);
        let fee = trade.fee;

        match side {
            Side::Buy => {
                state.last_buy_price = trade.price;
                match trade.fee_currency {
                    FeeCurrency::Base => {
                        // The fee comes out of the received quantity; the
                        // quote spent stays the full notional.
                        let mut net_qty = trade.quantity - fee;
                        if net_qty.is_negative() {
                            net_qty = Decimal::zero();
                        }
                        state.quantity += net_qty;
                        state.cost_basis_total += trade.quantity * trade.price;
                    }
                    FeeCurrency::Quote => {
                        state.quantity += trade.quantity;
                        state.cost_basis_total += trade.quantity * trade.price + fee;
                    }
                }
            }
            Side::Sell => {
                state.total_gross_profit +=
                    (trade.price - state.last_buy_price) * trade.quantity;

                let avg = state.average_cost();
                // Sell fees are taken on the quote side even when declared base.
                let proceeds = trade.quantity * trade.price - fee;
                state.realized_pnl += proceeds - avg * trade.quantity;

                state.quantity -= trade.quantity;
                if state.quantity.is_negative() {
                    warn!(
                        instrument = %trade.symbol,
                        oversold = %state.quantity.abs(),
                        "sell exceeds held quantity, clamping position to flat"
                    );
                    state.quantity = Decimal::zero();
                    state.cost_basis_total = Decimal::zero();
                } else {
                    state.cost_basis_total -= avg * trade.quantity;
                }
            }
        }
    }

    Ok(states)
}
