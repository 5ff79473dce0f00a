//! Buildings
//!
//! A building scans its levels in declared order and books on the first one
//! that can take the vehicle. The availability check and the booking are
//! separate critical sections, so a level can fill up in between. When that
//! happens the scan moves on to the next level instead of failing.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    report::OccupancyReport, Error, Level, LevelNumber, Release, Result, Ticket, TicketId,
    Vehicle,
};

/// Ordered collection of levels
#[derive(Debug)]
pub struct Building {
    levels: Vec<Level>,
    issued: AtomicU64,
}

impl Building {
    /// Create a building; level numbers must be unique since tickets route
    /// back by number.
    pub fn new(levels: Vec<Level>) -> Result<Self> {
        for (i, level) in levels.iter().enumerate() {
            if levels[..i].iter().any(|l| l.number() == level.number()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate level number {}",
                    level.number()
                )));
            }
        }

        Ok(Self {
            levels,
            issued: AtomicU64::new(0),
        })
    }

    /// Look up a level by number
    #[must_use]
    pub fn level(&self, number: &LevelNumber) -> Option<&Level> {
        self.levels.iter().find(|level| level.number() == number)
    }

    fn next_ticket_id(&self) -> TicketId {
        let seq = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        TicketId::new(format!("TKT-{seq:06}"))
    }

    /// Allocate a spot for `vehicle` on the first level that has one.
    ///
    /// `Ok(None)` means the building is full for this category. A level
    /// without a manager for the category aborts the scan with
    /// [`Error::UnsupportedVehicle`].
    pub fn allocate(&self, vehicle: &Vehicle) -> Result<Option<Ticket>> {
        for level in &self.levels {
            if !level.has_availability(vehicle)? {
                continue;
            }

            debug!(level = %level.number(), %vehicle, "level has a free spot");
            match level.book_slot(vehicle)? {
                Some(spot) => {
                    let ticket = Ticket::new(
                        self.next_ticket_id(),
                        vehicle.clone(),
                        level.number().clone(),
                        spot,
                        Utc::now(),
                    );
                    info!(
                        ticket = %ticket.id(),
                        level = %ticket.level(),
                        spot = %ticket.spot(),
                        %vehicle,
                        "ticket issued"
                    );
                    return Ok(Some(ticket));
                }
                None => {
                    warn!(
                        level = %level.number(),
                        %vehicle,
                        "level filled up between check and booking, trying next level"
                    );
                }
            }
        }

        info!(%vehicle, "no spot available in building");
        Ok(None)
    }

    /// Free the spot referenced by `ticket`.
    ///
    /// A ticket naming a level or spot this building does not own is
    /// [`Error::InvalidTicket`]. Releasing an already free spot is reported
    /// as [`Release::AlreadyFree`] and changes nothing.
    pub fn release(&self, ticket: &Ticket) -> Result<Release> {
        let level = self.level(ticket.level()).ok_or_else(|| {
            Error::InvalidTicket(format!(
                "ticket {} names unknown level {}",
                ticket.id(),
                ticket.level()
            ))
        })?;

        info!(ticket = %ticket.id(), level = %level.number(), spot = %ticket.spot(), "releasing spot");
        match level.free_slot(ticket.vehicle(), ticket.spot())? {
            Release::Unknown => Err(Error::InvalidTicket(format!(
                "ticket {} names spot {} which level {} does not manage for '{}'",
                ticket.id(),
                ticket.spot(),
                ticket.level(),
                ticket.vehicle().vehicle_type()
            ))),
            outcome => Ok(outcome),
        }
    }

    /// Per-level, per-category capacity and free counts
    #[must_use]
    pub fn occupancy(&self) -> OccupancyReport {
        OccupancyReport {
            levels: self.levels.iter().map(Level::occupancy).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::AtomicUsize, Arc};

    use super::*;
    use crate::{
        CategorySpotManager, FirstFreeSelector, Spot, SpotId, SpotManager, VehicleType,
    };

    fn level(number: &str, states: &[bool]) -> Level {
        let spots = states
            .iter()
            .enumerate()
            .map(|(i, free)| Spot::new(SpotId::new(format!("{number}-S{i}")), *free))
            .collect();
        let manager: Box<dyn SpotManager> = Box::new(CategorySpotManager::new(
            VehicleType::Bike,
            spots,
            Arc::new(FirstFreeSelector),
        ));
        Level::new(LevelNumber::new(number), [manager]).unwrap_or_else(|e| panic!("{e}"))
    }

    fn bike(plate: &str) -> Vehicle {
        Vehicle::new(VehicleType::Bike, plate)
    }

    /// Reports free space but never hands out a spot, like a level that
    /// lost the race between check and booking.
    struct RacingManager {
        parks: Arc<AtomicUsize>,
    }

    impl SpotManager for RacingManager {
        fn category(&self) -> VehicleType {
            VehicleType::Bike
        }
        fn has_free_space(&self) -> bool {
            true
        }
        fn park(&self) -> Option<SpotId> {
            self.parks.fetch_add(1, Ordering::SeqCst);
            None
        }
        fn unpark(&self, _spot: &SpotId) -> Release {
            Release::Unknown
        }
        fn capacity(&self) -> usize {
            1
        }
        fn free_count(&self) -> usize {
            0
        }
        fn contains(&self, _spot: &SpotId) -> bool {
            false
        }
    }

    #[test]
    fn test_allocate_skips_full_level() {
        let building = Building::new(vec![level("A", &[false, false]), level("B", &[true])])
            .unwrap_or_else(|e| panic!("{e}"));

        let ticket = building
            .allocate(&bike("KA01"))
            .ok()
            .flatten()
            .unwrap_or_else(|| panic!("expected a ticket"));
        assert_eq!(ticket.level(), &LevelNumber::new("B"));
        assert_eq!(ticket.spot(), &SpotId::new("B-S0"));
    }

    #[test]
    fn test_allocate_prefers_first_level() {
        let building = Building::new(vec![level("A", &[true]), level("B", &[true])])
            .unwrap_or_else(|e| panic!("{e}"));
        let ticket = building.allocate(&bike("KA01")).ok().flatten();
        assert_eq!(ticket.map(|t| t.level().clone()), Some(LevelNumber::new("A")));
    }

    #[test]
    fn test_allocate_falls_through_when_booking_loses_race() {
        let parks = Arc::new(AtomicUsize::new(0));
        let racing: Box<dyn SpotManager> = Box::new(RacingManager {
            parks: Arc::clone(&parks),
        });
        let racy = Level::new(LevelNumber::new("A"), [racing]).unwrap_or_else(|e| panic!("{e}"));
        let building =
            Building::new(vec![racy, level("B", &[true])]).unwrap_or_else(|e| panic!("{e}"));

        let ticket = building
            .allocate(&bike("KA01"))
            .ok()
            .flatten()
            .unwrap_or_else(|| panic!("expected a ticket from level B"));
        assert_eq!(ticket.level(), &LevelNumber::new("B"));
        assert_eq!(parks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_allocate_full_building_returns_none() {
        let building = Building::new(vec![level("A", &[false]), level("B", &[false])])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(building.allocate(&bike("KA01")), Ok(None));
    }

    #[test]
    fn test_allocate_unsupported_category_is_loud() {
        let building = Building::new(vec![level("A", &[true])]).unwrap_or_else(|e| panic!("{e}"));
        let car = Vehicle::new(VehicleType::Car, "KA02");
        assert!(matches!(
            building.allocate(&car),
            Err(Error::UnsupportedVehicle { .. })
        ));
    }

    #[test]
    fn test_ticket_ids_are_unique() {
        let building = Building::new(vec![level("A", &[true, true, true])])
            .unwrap_or_else(|e| panic!("{e}"));
        let ids: Vec<TicketId> = (0..3)
            .filter_map(|i| building.allocate(&bike(&format!("P{i}"))).ok().flatten())
            .map(|t| t.id().clone())
            .collect();
        assert_eq!(
            ids,
            vec![
                TicketId::new("TKT-000001"),
                TicketId::new("TKT-000002"),
                TicketId::new("TKT-000003"),
            ]
        );
    }

    #[test]
    fn test_release_frees_spot() {
        let building = Building::new(vec![level("A", &[true])]).unwrap_or_else(|e| panic!("{e}"));
        let ticket = building
            .allocate(&bike("KA01"))
            .ok()
            .flatten()
            .unwrap_or_else(|| panic!("expected a ticket"));

        assert_eq!(building.allocate(&bike("KA02")), Ok(None));
        assert_eq!(building.release(&ticket), Ok(Release::Freed));
        assert_eq!(building.release(&ticket), Ok(Release::AlreadyFree));
        assert!(building.allocate(&bike("KA02")).ok().flatten().is_some());
    }

    #[test]
    fn test_release_rejects_foreign_tickets() {
        let building = Building::new(vec![level("A", &[true])]).unwrap_or_else(|e| panic!("{e}"));

        let unknown_level = Ticket::new(
            TicketId::new("X"),
            bike("KA01"),
            LevelNumber::new("Z"),
            SpotId::new("A-S0"),
            Utc::now(),
        );
        assert!(matches!(
            building.release(&unknown_level),
            Err(Error::InvalidTicket(_))
        ));

        let unknown_spot = Ticket::new(
            TicketId::new("Y"),
            bike("KA01"),
            LevelNumber::new("A"),
            SpotId::new("A-S9"),
            Utc::now(),
        );
        assert!(matches!(
            building.release(&unknown_spot),
            Err(Error::InvalidTicket(_))
        ));
    }

    #[test]
    fn test_duplicate_level_numbers_rejected() {
        let result = Building::new(vec![level("A", &[true]), level("A", &[true])]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_occupancy_report() {
        let building = Building::new(vec![level("A", &[false, true]), level("B", &[true])])
            .unwrap_or_else(|e| panic!("{e}"));
        let report = building.occupancy();

        assert_eq!(report.levels.len(), 2);
        assert_eq!(report.capacity_for(VehicleType::Bike), 3);
        assert_eq!(report.free_for(VehicleType::Bike), 2);
        assert_eq!(report.free_for(VehicleType::Car), 0);
        assert_eq!(report.occupied(), 1);
    }
}
