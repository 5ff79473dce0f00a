use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use parkade_core::{SelectorKind, Vehicle};

use crate::commands::{check, simulate, SimulateOptions};

pub fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("check", sub_m)) => handle_check(sub_m),
        Some(("simulate", sub_m)) => handle_simulate(sub_m),
        _ => anyhow::bail!("Unknown command. Run 'parkade --help' for usage."),
    }
}

fn config_path(matches: &ArgMatches) -> Result<PathBuf> {
    matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .context("--config (or PARKADE_CONFIG) is required")
}

fn handle_check(matches: &ArgMatches) -> Result<()> {
    let report = check::run(&config_path(matches)?)?;
    print_json(&report)
}

fn handle_simulate(matches: &ArgMatches) -> Result<()> {
    let threads = matches.get_one::<u64>("threads").copied().unwrap_or(1);
    let options = SimulateOptions {
        config: config_path(matches)?,
        arrivals: matches
            .get_many::<Vehicle>("arrive")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        decline: matches.get_flag("decline"),
        threads: usize::try_from(threads).context("--threads is out of range")?,
        selector: matches.get_one::<SelectorKind>("selector").copied(),
    };

    let report = simulate::run(&options)?;
    print_json(&report)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render report")?;
    println!("{rendered}");
    Ok(())
}
