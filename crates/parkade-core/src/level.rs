//! Levels
//!
//! A level routes a vehicle to the spot manager of its category. It takes
//! no lock of its own: each (level, category) pair is one manager and one
//! lock domain, so booking a bike never contends with booking a car.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    report::{CategoryOccupancy, LevelOccupancy},
    Error, Release, Result, SpotId, SpotManager, Vehicle, VehicleType,
};

/// Level identifier, e.g. `L0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelNumber(String);

impl LevelNumber {
    /// Create a new level number
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Get the number as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One floor of the building: a spot manager per vehicle category
pub struct Level {
    number: LevelNumber,
    managers: HashMap<VehicleType, Box<dyn SpotManager>>,
}

impl Level {
    /// Create a level from its managers, keyed by each manager's category.
    ///
    /// Two managers for the same category are a configuration error.
    pub fn new(
        number: LevelNumber,
        managers: impl IntoIterator<Item = Box<dyn SpotManager>>,
    ) -> Result<Self> {
        let mut by_category: HashMap<VehicleType, Box<dyn SpotManager>> = HashMap::new();
        for manager in managers {
            let category = manager.category();
            if by_category.insert(category, manager).is_some() {
                return Err(Error::InvalidConfig(format!(
                    "level {number} has more than one spot manager for '{category}'"
                )));
            }
        }

        Ok(Self {
            number,
            managers: by_category,
        })
    }

    #[must_use]
    pub const fn number(&self) -> &LevelNumber {
        &self.number
    }

    fn manager(&self, vehicle: &Vehicle) -> Result<&dyn SpotManager> {
        let vehicle_type = vehicle.vehicle_type();
        self.managers
            .get(&vehicle_type)
            .map(|manager| &**manager)
            .ok_or_else(|| Error::UnsupportedVehicle {
                level: self.number.clone(),
                vehicle_type,
            })
    }

    /// Whether the vehicle's category has a free spot on this level
    pub fn has_availability(&self, vehicle: &Vehicle) -> Result<bool> {
        let free = self.manager(vehicle)?.has_free_space();
        debug!(level = %self.number, %vehicle, free, "checked availability");
        Ok(free)
    }

    /// Book a spot for the vehicle; `Ok(None)` when none could be booked
    pub fn book_slot(&self, vehicle: &Vehicle) -> Result<Option<SpotId>> {
        Ok(self.manager(vehicle)?.park())
    }

    /// Free the vehicle's spot
    pub fn free_slot(&self, vehicle: &Vehicle, spot: &SpotId) -> Result<Release> {
        let release = self.manager(vehicle)?.unpark(spot);
        debug!(level = %self.number, %vehicle, %spot, %release, "freed slot");
        Ok(release)
    }

    pub(crate) fn occupancy(&self) -> LevelOccupancy {
        let mut categories: Vec<CategoryOccupancy> = self
            .managers
            .values()
            .map(|manager| CategoryOccupancy {
                vehicle_type: manager.category(),
                capacity: manager.capacity(),
                free: manager.free_count(),
            })
            .collect();
        categories.sort_by_key(|c| c.vehicle_type);

        LevelOccupancy {
            number: self.number.clone(),
            categories,
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut categories: Vec<_> = self.managers.keys().collect();
        categories.sort();
        f.debug_struct("Level")
            .field("number", &self.number)
            .field("categories", &categories)
            .finish()
    }
}
