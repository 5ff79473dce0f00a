//! Check command implementation
//!
//! Validates a lot layout by assembling it, then reports the initial
//! occupancy.

use std::path::Path;

use anyhow::{Context, Result};
use parkade_core::{LotConfig, OccupancyReport};
use tracing::info;

/// Load, validate and assemble the layout at `path`
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or fails
/// validation.
pub fn run(path: &Path) -> Result<OccupancyReport> {
    let lot = LotConfig::load(path)
        .and_then(|config| config.build())
        .with_context(|| format!("Invalid lot layout {}", path.display()))?;

    let report = lot.occupancy();
    info!(
        path = %path.display(),
        levels = report.levels.len(),
        occupied = report.occupied(),
        "layout is valid"
    );
    Ok(report)
}
