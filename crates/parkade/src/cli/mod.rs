pub mod handlers;

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use parkade_core::{SelectorKind, Vehicle, CONFIG_ENV_VAR};

/// Initialize tracing subscriber for logging
///
/// `RUST_LOG` selects the filter, INFO when unset. Logs go to stderr so that
/// stdout carries only the JSON report.
///
/// # Errors
/// Returns an error if a subscriber is already installed
pub fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}

pub fn build_cli() -> Command {
    Command::new("parkade")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Concurrent parking spot allocation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd_check())
        .subcommand(cmd_simulate())
}

fn arg_config() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_name("PATH")
        .env(CONFIG_ENV_VAR)
        .required(true)
        .help("Lot layout file (TOML)")
}

fn cmd_check() -> Command {
    Command::new("check")
        .about("Validate a lot layout and print its occupancy")
        .arg(arg_config())
}

fn cmd_simulate() -> Command {
    Command::new("simulate")
        .about("Admit vehicles, then exit each one through the payment gate")
        .arg(arg_config())
        .arg(
            Arg::new("arrive")
                .long("arrive")
                .short('a')
                .value_name("TYPE:PLATE")
                .action(ArgAction::Append)
                .required(true)
                .value_parser(|s: &str| s.parse::<Vehicle>())
                .help("Vehicle to admit, e.g. car:KA01AB1234 (repeatable)"),
        )
        .arg(
            Arg::new("decline")
                .long("decline")
                .action(ArgAction::SetTrue)
                .help("Decline every exit payment"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('j')
                .value_name("N")
                .default_value("1")
                .value_parser(value_parser!(u64).range(1..=256))
                .help("Worker threads admitting vehicles concurrently"),
        )
        .arg(
            Arg::new("selector")
                .long("selector")
                .value_name("STRATEGY")
                .value_parser(SelectorKind::parse)
                .help("Override the layout's spot selector (first-free, random)"),
        )
}
