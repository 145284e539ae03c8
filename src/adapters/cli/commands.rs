//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the ticksmith engine.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::adapters::replay::{JsonlOrderSink, JsonlTickSource};
use crate::application::{Engine, ReplayRunner, RunSummary};
use crate::config::{load_config, resolve_config_path, Config, CONFIG_ENV_VAR};
use crate::ports::{OrderSink, TickSource};

/// Ticksmith - rolling-band market making and pairs arbitrage decision engine
#[derive(Parser, Debug)]
#[command(
    name = "ticksmith",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Rolling-band market making and pairs arbitrage decision engine",
    long_about = "Ticksmith decides limit orders once per tick from order book snapshots, \
                  own fills and exogenous observations, keeping every product inside its \
                  position limit."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay recorded ticks through the engine
    Replay(ReplayCmd),

    /// Load and validate a configuration file
    Validate(ValidateCmd),

    /// Print the built-in configuration as TOML
    DefaultConfig,
}

/// Replay a JSON Lines tick file
#[derive(Parser, Debug)]
pub struct ReplayCmd {
    /// Path to configuration file (falls back to $TICKSMITH_CONFIG, then built-in defaults)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Tick file, one TradingState JSON object per line ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: String,

    /// Where to write orders (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Drop zero-quantity placeholder orders from the output
    #[arg(long)]
    pub drop_placeholders: bool,
}

/// Validate configuration
#[derive(Parser, Debug)]
pub struct ValidateCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,
}

/// Execute the parsed command
pub fn execute(app: CliApp) -> Result<()> {
    match app.command {
        Command::Replay(cmd) => replay_command(cmd),
        Command::Validate(cmd) => validate_command(cmd),
        Command::DefaultConfig => default_config_command(),
    }
}

fn load_or_default(explicit: Option<&str>) -> Result<Config> {
    match resolve_config_path(explicit) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            load_config(&path).with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => {
            tracing::info!("no configuration given, using built-in defaults");
            Ok(Config::default())
        }
    }
}

fn replay_command(cmd: ReplayCmd) -> Result<()> {
    let config = load_or_default(cmd.config.as_deref())?;
    let engine = Engine::new(&config);
    tracing::info!(strategies = ?engine.strategy_names(), "engine ready");

    let source: Box<dyn TickSource> = if cmd.input == "-" {
        Box::new(JsonlTickSource::new(io::stdin().lock()))
    } else {
        let file = File::open(&cmd.input).with_context(|| format!("Failed to open tick file {}", cmd.input))?;
        Box::new(JsonlTickSource::new(BufReader::new(file)))
    };

    let writer: Box<dyn Write> = match &cmd.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let sink: Box<dyn OrderSink> = Box::new(JsonlOrderSink::new(writer));

    let mut runner = ReplayRunner::new(engine, source, sink).drop_placeholders(cmd.drop_placeholders);
    let summary = runner.run().context("Replay failed")?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    eprintln!("Ticks:    {}", summary.ticks);
    eprintln!("Orders:   {} ({} buy, {} sell)", summary.orders, summary.buys, summary.sells);
    eprintln!("Skipped:  {}", summary.skipped);
    if let Some(ts) = summary.last_timestamp {
        eprintln!("Last tick: {}", ts);
    }
    eprintln!("Profit:   {:.1}", summary.final_profit);
}

fn validate_command(cmd: ValidateCmd) -> Result<()> {
    let path = resolve_config_path(cmd.config.as_deref())
        .with_context(|| format!("No configuration given (use --config or set {CONFIG_ENV_VAR})"))?;
    let config = load_config(&path).with_context(|| format!("Invalid configuration {}", path.display()))?;

    println!("Configuration OK: {}", path.display());
    println!("  position limits: {}", config.position_limits.len());
    println!("  band_breakout: {}", config.band_breakout.len());
    println!("  mean_reversion: {}", config.mean_reversion.len());
    println!("  pairs_arbitrage: {}", config.pairs_arbitrage.len());
    println!("  indicator_momentum: {}", config.indicator_momentum.len());
    Ok(())
}

fn default_config_command() -> Result<()> {
    let text = Config::default()
        .to_toml_string()
        .context("Failed to render default configuration")?;
    print!("{text}");
    Ok(())
}
