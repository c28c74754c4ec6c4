//! Pure computation core for deterministic position accounting.

pub mod accumulator;

pub use accumulator::{compute_positions, InstrumentState, PositionError};
