//! Command implementations for the parkade CLI

pub mod check;
pub mod simulate;

pub use simulate::SimulateOptions;
