//! Vehicle types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Error;

/// Vehicle category; each category has its own spot manager per level
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VehicleType {
    /// Two-wheeler
    Bike,
    /// Four-wheeler
    Car,
    /// Oversized vehicle
    Truck,
}

/// A vehicle presented at the gate. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    vehicle_type: VehicleType,
    number: String,
}

impl Vehicle {
    /// Create a new vehicle
    #[must_use]
    pub fn new(vehicle_type: VehicleType, number: impl Into<String>) -> Self {
        Self {
            vehicle_type,
            number: number.into(),
        }
    }

    #[must_use]
    pub const fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    /// Registration plate
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl std::fmt::Display for Vehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.vehicle_type, self.number)
    }
}

/// Parses `TYPE:PLATE`, e.g. `bike:TS30J8383`.
impl FromStr for Vehicle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, number) = s.split_once(':').ok_or_else(|| {
            Error::InvalidVehicle(format!("'{s}' is not of the form TYPE:PLATE"))
        })?;

        let vehicle_type = VehicleType::from_str(kind.trim()).map_err(|_| {
            Error::InvalidVehicle(format!(
                "unknown vehicle type '{kind}'. Must be one of: bike, car, truck"
            ))
        })?;

        let number = number.trim();
        if number.is_empty() {
            return Err(Error::InvalidVehicle(format!("'{s}' has an empty plate")));
        }

        Ok(Self::new(vehicle_type, number))
    }
}
