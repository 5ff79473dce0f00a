//! Parkade - Parking spot allocation from the command line
//!
//! Loads a lot layout, validates it, and drives scripted arrivals and exits
//! through `parkade-core`.

pub mod cli;
pub mod commands;
