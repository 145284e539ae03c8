//! Application Layer - Wires strategies, session state and ports together
//!
//! - `Engine`: one call per tick, returns the merged order set
//! - `ReplayRunner`: drives an `Engine` from a `TickSource` into an `OrderSink`

pub mod engine;
pub mod runner;

pub use engine::Engine;
pub use runner::{ReplayRunner, RunError, RunSummary};
