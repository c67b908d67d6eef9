//! # pricing-sim
//!
//! Prices menu items from the command line.
//!
//! ```text
//! pricing-sim price --cost 18 --waste 10 --overhead 25 --margin 30 --volume 2000
//! pricing-sim compare --request risoto.json --json
//! pricing-sim --config ./settings.toml config --write
//! ```

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mesa_simulator::cli::Cli;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    mesa_simulator::run(cli, &mut out).context("pricing-sim failed")?;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so `--json` output stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mesa=trace` - Show trace for mesa crates only
/// - Default: INFO, DEBUG for mesa crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mesa=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
