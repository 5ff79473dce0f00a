//! Parkade-core - Parking spot allocation
//!
//! This crate provides:
//! - Spot, vehicle and ticket types
//! - Lock-owning spot managers, one per vehicle category per level
//! - Level and building routing
//! - Pluggable spot selection and pricing strategies
//! - Entrance/exit gates and the parking lot facade
//! - Lot layout configuration
//!
//! ## Locking
//!
//! Each spot manager owns one mutex guarding its spot list. Levels, the
//! building and the lot take no allocation lock of their own, so there is no
//! global lock and no contention across levels or categories.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod building;
pub mod config;
pub mod error;
pub mod gate;
pub mod level;
pub mod lot;
pub mod manager;
pub mod payment;
pub mod pricing;
pub mod report;
pub mod selector;
pub mod spot;
pub mod ticket;
pub mod vehicle;

pub use building::Building;
pub use config::{LevelConfig, LotConfig, ManagerConfig, SelectorConfig, CONFIG_ENV_VAR};
pub use error::{Error, Result};
pub use gate::{EntranceGate, ExitGate, Settlement};
pub use level::{Level, LevelNumber};
pub use lot::ParkingLot;
pub use manager::{CategorySpotManager, Release, SpotManager};
pub use payment::Payment;
pub use pricing::{FixedPricing, HourlyPricing, PricingConfig, PricingStrategy};
pub use report::{CategoryOccupancy, LevelOccupancy, OccupancyReport};
pub use selector::{FirstFreeSelector, RandomSpotSelector, SelectorKind, SpotSelector};
pub use spot::{Spot, SpotId};
pub use ticket::{Ticket, TicketId};
pub use vehicle::{Vehicle, VehicleType};
