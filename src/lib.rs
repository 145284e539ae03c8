//! Ticksmith - Tick-Driven Market Making Decision Engine
//!
//! Decides limit orders once per tick for a simulated exchange round using
//! rolling statistics over recent mid prices, spreads and exogenous signals.
//!
//! # Modules
//!
//! - `domain`: Core types (Order, OrderDepth, Quote, PositionLimit, SessionState)
//! - `ports`: Trait abstractions (TickSource, OrderSink, TickStrategy)
//! - `strategy`: Signal generation (BandBreakout, MeanReversion, PairsArbitrage, IndicatorMomentum)
//! - `adapters`: External implementations (JSON Lines replay, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Engine and replay runner

pub mod domain;
pub mod ports;
pub mod strategy;
pub mod adapters;
pub mod config;
pub mod application;
