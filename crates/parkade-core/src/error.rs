//! Error types for parkade-core
//!
//! Capacity exhaustion and declined payments are ordinary outcomes
//! (`Ok(None)` / `paid == false`) and never show up here.

use thiserror::Error;

use crate::{LevelNumber, VehicleType};

/// Core error type for parking operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A level has no spot manager for the vehicle's category
    #[error("Level {level} has no spot manager for vehicle type '{vehicle_type}'")]
    UnsupportedVehicle {
        level: LevelNumber,
        vehicle_type: VehicleType,
    },

    /// Ticket does not belong to this lot, or was already settled
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    /// Vehicle description could not be parsed
    #[error("Invalid vehicle: {0}")]
    InvalidVehicle(String),

    /// Lot layout failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Lot layout is not valid TOML for the expected schema
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Filesystem errors while loading a layout
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

/// Result type alias for parkade-core operations
pub type Result<T> = std::result::Result<T, Error>;
