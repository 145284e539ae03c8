//! Ports Layer - Trait definitions for the engine's collaborators
//!
//! These traits abstract:
//! - Tick snapshots coming in (`TickSource`)
//! - Orders going out (`OrderSink`)
//! - The per-tick decision rules the engine drives (`TickStrategy`)

pub mod execution;
pub mod market_data;
pub mod mocks;
pub mod strategy;

pub use execution::{OrderSink, SinkError};
pub use market_data::{Listing, SourceError, TickSource, TradingState};
pub use strategy::{EngineError, MarketView, TickStrategy};
