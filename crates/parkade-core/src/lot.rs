//! Parking lot facade
//!
//! Composes the entrance gate, the building and the exit gate, and keeps a
//! ledger of live tickets. A ticket is live from the moment it is issued
//! until its exit is paid for; only a live ticket can release a spot. That
//! stops a replayed ticket from freeing a spot that has since been handed to
//! another vehicle.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::{error, info, warn};

use crate::{
    report::OccupancyReport, Building, EntranceGate, Error, ExitGate, Payment, Release, Result,
    Settlement, Ticket, TicketId, Vehicle,
};

/// Top-level entry point: vehicles arrive and exit here
#[derive(Debug)]
pub struct ParkingLot {
    entrance: EntranceGate,
    building: Building,
    exit: ExitGate,
    live: Mutex<HashMap<TicketId, Ticket>>,
}

impl ParkingLot {
    #[must_use]
    pub fn new(entrance: EntranceGate, building: Building, exit: ExitGate) -> Self {
        Self {
            entrance,
            building,
            exit,
            live: Mutex::new(HashMap::new()),
        }
    }

    // Each ledger operation is a single insert/remove, so a poisoned map is
    // still consistent.
    fn ledger(&self) -> MutexGuard<'_, HashMap<TicketId, Ticket>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit a vehicle. `Ok(None)` when the lot is full for its category.
    pub fn vehicle_arrives(&self, vehicle: &Vehicle) -> Result<Option<Ticket>> {
        let ticket = self.entrance.enter(&self.building, vehicle)?;
        match &ticket {
            Some(issued) => {
                self.ledger().insert(issued.id().clone(), issued.clone());
            }
            None => info!(%vehicle, "lot is full"),
        }
        Ok(ticket)
    }

    /// Charge for `ticket` and, only once paid, release its spot.
    ///
    /// On a declined payment, or when pricing faults, the spot stays occupied
    /// and the ticket stays live so the exit can be retried. Once paid the
    /// ticket is settled for good; a release that fails after that is logged
    /// and does not undo the settlement. A ticket that is not live (never
    /// issued here, already settled, or being settled concurrently) is
    /// [`Error::InvalidTicket`].
    pub fn vehicle_exits(&self, ticket: &Ticket, payment: &dyn Payment) -> Result<Settlement> {
        self.claim(ticket)?;

        let settlement = self.exit.complete_exit(ticket, payment);
        if !settlement.paid {
            warn!(ticket = %ticket.id(), "exit not completed, spot stays occupied");
            self.ledger().insert(ticket.id().clone(), ticket.clone());
            return Ok(settlement);
        }

        match self.building.release(ticket) {
            Ok(Release::Freed) => {
                info!(ticket = %ticket.id(), amount = %settlement.amount, "vehicle exited");
            }
            Ok(release) => {
                error!(ticket = %ticket.id(), %release, "paid exit did not free its spot");
            }
            Err(e) => {
                error!(ticket = %ticket.id(), error = %e, "paid exit did not free its spot");
            }
        }
        Ok(settlement)
    }

    fn claim(&self, ticket: &Ticket) -> Result<()> {
        let mut ledger = self.ledger();
        match ledger.get(ticket.id()) {
            Some(live) if live == ticket => {
                ledger.remove(ticket.id());
                Ok(())
            }
            Some(_) => Err(Error::InvalidTicket(format!(
                "ticket {} does not match the issued ticket",
                ticket.id()
            ))),
            None => Err(Error::InvalidTicket(format!(
                "ticket {} is not live (unknown or already settled)",
                ticket.id()
            ))),
        }
    }

    /// Tickets issued and not yet settled
    #[must_use]
    pub fn live_tickets(&self) -> usize {
        self.ledger().len()
    }

    #[must_use]
    pub fn occupancy(&self) -> OccupancyReport {
        self.building.occupancy()
    }
}
