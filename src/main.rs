//! Ticksmith - Tick-Driven Market Making Decision Engine
//!
//! Replays recorded ticks through the decision engine.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use ticksmith::adapters::cli;

fn main() -> Result<()> {
    // Load .env file if it exists (TICKSMITH_CONFIG may be set there)
    dotenvy::dotenv().ok();

    let app = cli::init();
    init_logging(app.verbose, app.debug)?;

    cli::execute(app)
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    // Orders go to stdout, so logs stay on stderr
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    Ok(())
}
