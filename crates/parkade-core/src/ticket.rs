//! Ticket types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LevelNumber, SpotId, Vehicle};

/// Unique ticket identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    /// Create a new ticket ID
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receipt binding a vehicle to the spot it was given.
///
/// `level` and `spot` are lookups into the building, not ownership; the
/// ticket is the only handle needed to release the spot again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    vehicle: Vehicle,
    level: LevelNumber,
    spot: SpotId,
    entry_time: DateTime<Utc>,
}

impl Ticket {
    /// Create a ticket
    #[must_use]
    pub const fn new(
        id: TicketId,
        vehicle: Vehicle,
        level: LevelNumber,
        spot: SpotId,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vehicle,
            level,
            spot,
            entry_time,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &TicketId {
        &self.id
    }

    #[must_use]
    pub const fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    #[must_use]
    pub const fn level(&self) -> &LevelNumber {
        &self.level
    }

    #[must_use]
    pub const fn spot(&self) -> &SpotId {
        &self.spot
    }

    #[must_use]
    pub const fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} at {}/{}, since {})",
            self.id,
            self.vehicle,
            self.level,
            self.spot,
            self.entry_time.to_rfc3339()
        )
    }
}
