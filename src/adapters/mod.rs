//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Replay: JSON Lines tick source and order sink
//! - CLI: Command-line interface handlers

pub mod cli;
pub mod replay;

pub use cli::CliApp;
pub use replay::{JsonlOrderSink, JsonlTickSource, OrderRecord};
