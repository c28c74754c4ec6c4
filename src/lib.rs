pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    BotProfit, Currency, Decimal, FeeCurrency, Instrument, Investment, Side, SpotTrade, TimeMs,
};
pub use engine::{compute_positions, InstrumentState, PositionError};
pub use error::AppError;
