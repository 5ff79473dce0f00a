//! Entrance and exit gates

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{Building, Payment, PricingStrategy, Result, Ticket, TicketId, Vehicle};

/// Admits vehicles by allocating them a spot
#[derive(Debug, Clone, Copy, Default)]
pub struct EntranceGate;

impl EntranceGate {
    pub fn enter(&self, building: &Building, vehicle: &Vehicle) -> Result<Option<Ticket>> {
        building.allocate(vehicle)
    }
}

/// Result of an exit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub ticket_id: TicketId,
    pub amount: Decimal,
    /// Payment went through and the ticket is settled. Whether the spot
    /// itself was freed is logged by the lot; a settled ticket is never
    /// charged twice.
    pub paid: bool,
}

/// Prices a stay and collects payment. Never frees the spot itself.
pub struct ExitGate {
    pricing: Box<dyn PricingStrategy>,
}

impl ExitGate {
    #[must_use]
    pub fn new(pricing: Box<dyn PricingStrategy>) -> Self {
        Self { pricing }
    }

    /// Charge for `ticket` through `payment`.
    ///
    /// A panicking pricing strategy or payment collaborator counts as a
    /// declined payment. When pricing faults, payment is not attempted and
    /// the settlement carries a zero amount.
    pub fn complete_exit(&self, ticket: &Ticket, payment: &dyn Payment) -> Settlement {
        let priced = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pricing.calculate(ticket, Utc::now())
        }));
        let Ok(amount) = priced else {
            error!(ticket = %ticket.id(), "pricing strategy panicked");
            return Settlement {
                ticket_id: ticket.id().clone(),
                amount: Decimal::ZERO,
                paid: false,
            };
        };

        let paid = panic::catch_unwind(AssertUnwindSafe(|| payment.pay(amount)))
            .unwrap_or_else(|_| {
                error!(ticket = %ticket.id(), %amount, "payment collaborator panicked");
                false
            });

        if paid {
            info!(ticket = %ticket.id(), %amount, "payment successful, completing exit");
        } else {
            warn!(ticket = %ticket.id(), %amount, "payment declined");
        }

        Settlement {
            ticket_id: ticket.id().clone(),
            amount,
            paid,
        }
    }
}

impl fmt::Debug for ExitGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitGate").finish_non_exhaustive()
    }
}
