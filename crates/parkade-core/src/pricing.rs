//! Pricing strategies
//!
//! Pricing is a pure function of the ticket and the exit instant. The exit
//! instant is passed in rather than read from the clock so that a quote can
//! be reproduced.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, Ticket, VehicleType};

/// Flat fee charged by [`FixedPricing::default`]
pub const DEFAULT_FIXED_FEE: Decimal = Decimal::ONE_HUNDRED;

const SECONDS_PER_HOUR: i64 = 3600;

/// Computes the fee for a completed stay
pub trait PricingStrategy: Send + Sync {
    /// Non-negative amount owed for `ticket` when leaving at `exit_at`
    fn calculate(&self, ticket: &Ticket, exit_at: DateTime<Utc>) -> Decimal;
}

impl<F> PricingStrategy for F
where
    F: Fn(&Ticket, DateTime<Utc>) -> Decimal + Send + Sync,
{
    fn calculate(&self, ticket: &Ticket, exit_at: DateTime<Utc>) -> Decimal {
        self(ticket, exit_at)
    }
}

fn ensure_non_negative(what: &str, amount: Decimal) -> Result<Decimal> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidConfig(format!(
            "{what} must not be negative, got {amount}"
        )));
    }
    Ok(amount)
}

/// Same amount for every ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPricing {
    amount: Decimal,
}

impl FixedPricing {
    pub fn new(amount: Decimal) -> Result<Self> {
        ensure_non_negative("fixed fee", amount).map(|amount| Self { amount })
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Default for FixedPricing {
    fn default() -> Self {
        Self {
            amount: DEFAULT_FIXED_FEE,
        }
    }
}

impl PricingStrategy for FixedPricing {
    fn calculate(&self, _ticket: &Ticket, _exit_at: DateTime<Utc>) -> Decimal {
        self.amount
    }
}

/// Per-category hourly rate; every started hour is billed in full.
///
/// Categories without a rate are billed the minimum charge only. A fee too
/// large to represent is capped at [`Decimal::MAX`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyPricing {
    rates: BTreeMap<VehicleType, Decimal>,
    minimum: Decimal,
}

impl HourlyPricing {
    pub fn new(rates: BTreeMap<VehicleType, Decimal>, minimum: Decimal) -> Result<Self> {
        for (vehicle_type, rate) in &rates {
            ensure_non_negative(&format!("hourly rate for {vehicle_type}"), *rate)?;
        }
        let minimum = ensure_non_negative("minimum charge", minimum)?;
        Ok(Self { rates, minimum })
    }

    /// Hours billed for a stay; a clock that runs backwards bills nothing
    #[must_use]
    pub fn billable_hours(entry: DateTime<Utc>, exit_at: DateTime<Utc>) -> i64 {
        let seconds = (exit_at - entry).num_seconds().max(0);
        (seconds + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR
    }
}

impl PricingStrategy for HourlyPricing {
    fn calculate(&self, ticket: &Ticket, exit_at: DateTime<Utc>) -> Decimal {
        let rate = self
            .rates
            .get(&ticket.vehicle().vehicle_type())
            .copied()
            .unwrap_or(Decimal::ZERO);
        let hours = Decimal::from(Self::billable_hours(ticket.entry_time(), exit_at));
        // Saturate rather than panic on overflow
        rate.checked_mul(hours)
            .unwrap_or(Decimal::MAX)
            .max(self.minimum)
    }
}

/// Pricing section of a lot layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum PricingConfig {
    Fixed {
        #[serde(default = "default_fixed_fee")]
        amount: Decimal,
    },
    Hourly {
        rates: BTreeMap<VehicleType, Decimal>,
        #[serde(default)]
        minimum: Decimal,
    },
}

const fn default_fixed_fee() -> Decimal {
    DEFAULT_FIXED_FEE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self::Fixed {
            amount: DEFAULT_FIXED_FEE,
        }
    }
}

impl PricingConfig {
    /// Instantiate the configured strategy, validating amounts
    pub fn build(&self) -> Result<Box<dyn PricingStrategy>> {
        match self {
            Self::Fixed { amount } => Ok(Box::new(FixedPricing::new(*amount)?)),
            Self::Hourly { rates, minimum } => {
                Ok(Box::new(HourlyPricing::new(rates.clone(), *minimum)?))
            }
        }
    }
}
