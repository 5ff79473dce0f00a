use anyhow::Result;
use parkade::cli::{build_cli, handlers, init_tracing};

fn main() -> Result<()> {
    init_tracing()?;
    let matches = build_cli().get_matches();
    handlers::dispatch(&matches)
}
