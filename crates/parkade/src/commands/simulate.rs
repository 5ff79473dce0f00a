//! Simulate command implementation
//!
//! Admits a scripted list of vehicles, optionally over several worker
//! threads, then walks every admitted vehicle through the exit gate with a
//! payment stub that either approves or declines.

use std::{path::PathBuf, thread};

use anyhow::{Context, Result};
use parkade_core::{
    LotConfig, OccupancyReport, ParkingLot, SelectorKind, Settlement, Ticket, Vehicle,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

/// Simulate command options
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    /// Lot layout file
    pub config: PathBuf,
    /// Vehicles to admit, in script order
    pub arrivals: Vec<Vehicle>,
    /// Decline every exit payment
    pub decline: bool,
    /// Worker threads used for admission
    pub threads: usize,
    /// Overrides the layout's selector when set
    pub selector: Option<SelectorKind>,
}

/// Outcome of one scripted arrival
#[derive(Debug, Clone, Serialize)]
pub struct Arrival {
    pub vehicle: Vehicle,
    /// `None` when the lot was full for the vehicle's category
    pub ticket: Option<Ticket>,
}

/// Everything the simulation observed
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub arrivals: Vec<Arrival>,
    pub settlements: Vec<Settlement>,
    pub occupancy: OccupancyReport,
}

/// Run the simulation
///
/// # Errors
///
/// Returns an error if:
/// - The layout cannot be loaded or is invalid
/// - A vehicle's category has no spot manager in the building
/// - An exit is rejected as an invalid ticket
pub fn run(options: &SimulateOptions) -> Result<SimulationReport> {
    let mut config = LotConfig::load(&options.config)
        .with_context(|| format!("Invalid lot layout {}", options.config.display()))?;
    if let Some(selector) = options.selector {
        config.selector.strategy = selector;
    }
    let lot = config.build().context("Failed to assemble lot")?;

    let arrivals = admit_all(&lot, &options.arrivals, options.threads)?;

    let approve = !options.decline;
    let payment = move |_: Decimal| approve;
    let settlements = arrivals
        .iter()
        .filter_map(|arrival| arrival.ticket.as_ref())
        .map(|ticket| {
            lot.vehicle_exits(ticket, &payment)
                .with_context(|| format!("Exit failed for ticket {}", ticket.id()))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        admitted = settlements.len(),
        paid = settlements.iter().filter(|s| s.paid).count(),
        "simulation finished"
    );

    Ok(SimulationReport {
        arrivals,
        settlements,
        occupancy: lot.occupancy(),
    })
}

/// Admit `vehicles` over `threads` workers, preserving script order in the
/// returned outcomes.
fn admit_all(lot: &ParkingLot, vehicles: &[Vehicle], threads: usize) -> Result<Vec<Arrival>> {
    if vehicles.is_empty() {
        return Ok(Vec::new());
    }
    let chunk_size = vehicles.len().div_ceil(threads.max(1));
    debug!(vehicles = vehicles.len(), threads, chunk_size, "admitting vehicles");

    let batches = thread::scope(|scope| {
        let workers: Vec<_> = vehicles
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || admit_chunk(lot, chunk)))
            .collect();

        workers
            .into_iter()
            .map(|worker| {
                worker
                    .join()
                    .map_err(|_| anyhow::anyhow!("admission worker panicked"))?
            })
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(batches.into_iter().flatten().collect())
}

fn admit_chunk(lot: &ParkingLot, vehicles: &[Vehicle]) -> Result<Vec<Arrival>> {
    vehicles
        .iter()
        .map(|vehicle| {
            let ticket = lot
                .vehicle_arrives(vehicle)
                .with_context(|| format!("Cannot admit {vehicle}"))?;
            Ok(Arrival {
                vehicle: vehicle.clone(),
                ticket,
            })
        })
        .collect()
}
