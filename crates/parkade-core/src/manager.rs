//! Spot managers
//!
//! A spot manager owns every spot of one vehicle category on one level and
//! is the only thing that mutates them. All mutation happens under a single
//! mutex that guards the whole spot list:
//!
//! - [`SpotManager::park`] selects *and* occupies inside one critical
//!   section, so two concurrent callers can never be handed the same spot.
//! - [`SpotManager::unpark`] marks a spot free inside the same lock domain.
//! - [`SpotManager::has_free_space`] is advisory; by the time the caller acts
//!   on it another thread may have taken the last spot. `park` re-checks.
//!
//! Faults never leave the manager. A panicking selector, a selector that
//! names a bad spot, or a poisoned lock all end up as "no spot" (or
//! [`Release::Faulted`]) with an `error!` event.

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{Spot, SpotId, SpotSelector, VehicleType};

/// Outcome of [`SpotManager::unpark`]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Release {
    /// The spot went from occupied to free
    Freed,
    /// The spot was already free; nothing changed
    AlreadyFree,
    /// This manager does not own a spot with that id; nothing changed
    Unknown,
    /// The manager's lock is poisoned; nothing changed
    Faulted,
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Freed => write!(f, "freed"),
            Self::AlreadyFree => write!(f, "already_free"),
            Self::Unknown => write!(f, "unknown"),
            Self::Faulted => write!(f, "faulted"),
        }
    }
}

/// Allocation capability for the spots of one vehicle category
pub trait SpotManager: Send + Sync {
    /// Category served by this manager
    fn category(&self) -> VehicleType;

    /// Whether any owned spot is currently free. Advisory only.
    fn has_free_space(&self) -> bool;

    /// Select and occupy a free spot atomically.
    ///
    /// `None` when nothing is free or when selection faulted.
    fn park(&self) -> Option<SpotId>;

    /// Mark `spot` free again.
    fn unpark(&self, spot: &SpotId) -> Release;

    /// Number of owned spots
    fn capacity(&self) -> usize;

    /// Number of owned spots that are currently free
    fn free_count(&self) -> usize;

    /// Whether this manager owns `spot`
    fn contains(&self, spot: &SpotId) -> bool;
}

/// Mutex-guarded spot list for a single vehicle category
pub struct CategorySpotManager {
    category: VehicleType,
    spots: Mutex<Vec<Spot>>,
    selector: Arc<dyn SpotSelector>,
}

impl CategorySpotManager {
    /// Create a manager owning `spots`
    #[must_use]
    pub fn new(category: VehicleType, spots: Vec<Spot>, selector: Arc<dyn SpotSelector>) -> Self {
        Self {
            category,
            spots: Mutex::new(spots),
            selector,
        }
    }

    fn lock(&self, operation: &str) -> Option<MutexGuard<'_, Vec<Spot>>> {
        match self.spots.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                error!(
                    category = %self.category,
                    operation,
                    "spot manager lock is poisoned"
                );
                None
            }
        }
    }

    fn select(&self, spots: &[Spot]) -> Option<usize> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.selector.choose_spot(spots))) {
            Ok(choice) => choice,
            Err(_) => {
                error!(category = %self.category, "spot selector panicked");
                None
            }
        }
    }
}

impl SpotManager for CategorySpotManager {
    fn category(&self) -> VehicleType {
        self.category
    }

    fn has_free_space(&self) -> bool {
        self.lock("has_free_space")
            .is_some_and(|spots| spots.iter().any(Spot::is_available))
    }

    fn park(&self) -> Option<SpotId> {
        let mut spots = self.lock("park")?;

        let Some(index) = self.select(&spots) else {
            debug!(category = %self.category, "no free spot");
            return None;
        };

        let len = spots.len();
        match spots.get_mut(index) {
            Some(spot) if spot.is_available() => {
                spot.occupy();
                info!(category = %self.category, spot = %spot.id(), "spot booked");
                Some(spot.id().clone())
            }
            Some(spot) => {
                error!(
                    category = %self.category,
                    spot = %spot.id(),
                    "selector chose an occupied spot"
                );
                None
            }
            None => {
                error!(
                    category = %self.category,
                    index,
                    len,
                    "selector chose an index outside the spot list"
                );
                None
            }
        }
    }

    fn unpark(&self, spot: &SpotId) -> Release {
        let Some(mut spots) = self.lock("unpark") else {
            return Release::Faulted;
        };

        match spots.iter_mut().find(|candidate| candidate.id() == spot) {
            Some(owned) if owned.is_available() => {
                warn!(category = %self.category, %spot, "spot is already free");
                Release::AlreadyFree
            }
            Some(owned) => {
                owned.release();
                info!(category = %self.category, %spot, "spot freed");
                Release::Freed
            }
            None => {
                warn!(category = %self.category, %spot, "spot is not managed here");
                Release::Unknown
            }
        }
    }

    fn capacity(&self) -> usize {
        self.lock("capacity").map_or(0, |spots| spots.len())
    }

    fn free_count(&self) -> usize {
        self.lock("free_count")
            .map_or(0, |spots| spots.iter().filter(|s| s.is_available()).count())
    }

    fn contains(&self, spot: &SpotId) -> bool {
        self.lock("contains")
            .is_some_and(|spots| spots.iter().any(|candidate| candidate.id() == spot))
    }
}

impl fmt::Debug for CategorySpotManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategorySpotManager")
            .field("category", &self.category)
            .field("spots", &self.spots)
            .finish_non_exhaustive()
    }
}
