//! Domain types shared across the store, engine, and API layers.

pub mod decimal;
pub mod primitives;
pub mod records;
pub mod trade;

pub use decimal::Decimal;
pub use primitives::{Currency, FeeCurrency, Instrument, ParseCurrencyError, ParseSideError, Side, TimeMs};
pub use records::{BotProfit, Investment};
pub use trade::SpotTrade;
