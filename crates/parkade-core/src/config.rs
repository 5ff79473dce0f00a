//! Lot layout configuration
//!
//! A layout is the external wiring of a lot: which levels exist, which spots
//! each level has per vehicle category, which of them start occupied, and
//! which selection and pricing strategies to use.
//!
//! # Example Config
//!
//! ```toml
//! [selector]
//! strategy = "first-free"
//!
//! [pricing]
//! strategy = "hourly"
//! rates = { bike = "10", car = "20" }
//! minimum = "10"
//!
//! [[levels]]
//! number = "L0"
//!
//! [[levels.managers]]
//! vehicle = "bike"
//! spots = ["L0-S1", "L0-S2"]
//! occupied = ["L0-S2"]
//! ```

use std::{
    collections::{BTreeSet, HashSet},
    path::Path,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Building, CategorySpotManager, EntranceGate, Error, ExitGate, Level, LevelNumber,
    ParkingLot, PricingConfig, Result, SelectorKind, Spot, SpotId, SpotManager, SpotSelector,
    VehicleType,
};

/// Environment variable naming the layout file when none is given explicitly
pub const CONFIG_ENV_VAR: &str = "PARKADE_CONFIG";

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION STRUCTURES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    pub strategy: SelectorKind,
}

/// Spots of one vehicle category on one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagerConfig {
    pub vehicle: VehicleType,
    pub spots: Vec<String>,
    #[serde(default)]
    pub occupied: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    pub number: String,
    pub managers: Vec<ManagerConfig>,
}

/// Complete lot layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LotConfig {
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    pub levels: Vec<LevelConfig>,
}

// ═══════════════════════════════════════════════════════════════════════════
// LOADING
// ═══════════════════════════════════════════════════════════════════════════

impl LotConfig {
    /// Parse and validate a layout
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a layout file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("Failed to read {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded lot layout");
        Self::from_toml_str(&content)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VALIDATION
    // ═══════════════════════════════════════════════════════════════════════

    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(Error::InvalidConfig(
                "layout must declare at least one level".into(),
            ));
        }

        let mut level_numbers = HashSet::new();
        let mut spot_ids = HashSet::new();
        let mut expected_categories: Option<BTreeSet<VehicleType>> = None;

        for level in &self.levels {
            if level.number.trim().is_empty() {
                return Err(Error::InvalidConfig("level number cannot be empty".into()));
            }
            if !level_numbers.insert(level.number.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate level number {}",
                    level.number
                )));
            }

            let categories = Self::validate_level(level, &mut spot_ids)?;
            match &expected_categories {
                None => expected_categories = Some(categories),
                Some(expected) if *expected != categories => {
                    return Err(Error::InvalidConfig(format!(
                        "level {} serves {} but earlier levels serve {}",
                        level.number,
                        describe(&categories),
                        describe(expected)
                    )));
                }
                Some(_) => {}
            }
        }

        // Amount checks live in the strategy constructors
        self.pricing.build().map(|_| ())
    }

    fn validate_level<'a>(
        level: &'a LevelConfig,
        spot_ids: &mut HashSet<&'a str>,
    ) -> Result<BTreeSet<VehicleType>> {
        if level.managers.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "level {} has no spot managers",
                level.number
            )));
        }

        let mut categories = BTreeSet::new();
        for manager in &level.managers {
            if !categories.insert(manager.vehicle) {
                return Err(Error::InvalidConfig(format!(
                    "level {} declares '{}' more than once",
                    level.number, manager.vehicle
                )));
            }
            if manager.spots.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "level {} has no spots for '{}'",
                    level.number, manager.vehicle
                )));
            }
            for spot in &manager.spots {
                if spot.trim().is_empty() {
                    return Err(Error::InvalidConfig(format!(
                        "level {} has an empty spot id",
                        level.number
                    )));
                }
                if !spot_ids.insert(spot.as_str()) {
                    return Err(Error::InvalidConfig(format!("duplicate spot id {spot}")));
                }
            }
            if let Some(stray) = manager
                .occupied
                .iter()
                .find(|id| !manager.spots.contains(id))
            {
                return Err(Error::InvalidConfig(format!(
                    "occupied spot {stray} is not listed in level {} '{}' spots",
                    level.number, manager.vehicle
                )));
            }
        }

        Ok(categories)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ASSEMBLY
    // ═══════════════════════════════════════════════════════════════════════

    /// Assemble the lot described by this layout
    pub fn build(&self) -> Result<ParkingLot> {
        self.validate()?;

        let selector = self.selector.strategy.build();
        let levels = self
            .levels
            .iter()
            .map(|level| Self::build_level(level, &selector))
            .collect::<Result<Vec<_>>>()?;

        let building = Building::new(levels)?;
        let exit = ExitGate::new(self.pricing.build()?);
        Ok(ParkingLot::new(EntranceGate, building, exit))
    }

    fn build_level(level: &LevelConfig, selector: &Arc<dyn SpotSelector>) -> Result<Level> {
        let managers = level.managers.iter().map(|manager| {
            let spots = manager
                .spots
                .iter()
                .map(|id| Spot::new(SpotId::new(id.as_str()), !manager.occupied.contains(id)))
                .collect();
            Box::new(CategorySpotManager::new(
                manager.vehicle,
                spots,
                Arc::clone(selector),
            )) as Box<dyn SpotManager>
        });
        Level::new(LevelNumber::new(level.number.as_str()), managers)
    }
}

fn describe(categories: &BTreeSet<VehicleType>) -> String {
    categories
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
