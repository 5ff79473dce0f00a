//! Occupancy snapshots
//!
//! Each category count is read under its own manager lock, so a report taken
//! while traffic is flowing is a best-effort snapshot, not a consistent cut.

use serde::{Deserialize, Serialize};

use crate::{LevelNumber, VehicleType};

/// Capacity and free count for one category on one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOccupancy {
    pub vehicle_type: VehicleType,
    pub capacity: usize,
    pub free: usize,
}

/// Per-category occupancy of one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOccupancy {
    pub number: LevelNumber,
    pub categories: Vec<CategoryOccupancy>,
}

/// Occupancy of every level, in building order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReport {
    pub levels: Vec<LevelOccupancy>,
}

impl OccupancyReport {
    fn categories(&self, vehicle_type: VehicleType) -> impl Iterator<Item = &CategoryOccupancy> {
        self.levels
            .iter()
            .flat_map(|level| level.categories.iter())
            .filter(move |c| c.vehicle_type == vehicle_type)
    }

    /// Spots of this category across the building
    #[must_use]
    pub fn capacity_for(&self, vehicle_type: VehicleType) -> usize {
        self.categories(vehicle_type).map(|c| c.capacity).sum()
    }

    /// Free spots of this category across the building
    #[must_use]
    pub fn free_for(&self, vehicle_type: VehicleType) -> usize {
        self.categories(vehicle_type).map(|c| c.free).sum()
    }

    /// Occupied spots across the building, all categories
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.levels
            .iter()
            .flat_map(|level| level.categories.iter())
            .map(|c| c.capacity - c.free)
            .sum()
    }
}
