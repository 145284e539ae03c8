//! Strategy port
//!
//! The engine drives every configured strategy through `TickStrategy`,
//! handing it a read-only `MarketView` of the tick. A strategy returns its
//! orders and advances its own windows; errors skip that strategy for the
//! tick only.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{
    BookError, BookSide, Order, PositionLimit, Positions, Product, Quote, SessionState,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Degenerate book for {product}: {side} side is empty")]
    DegenerateBook { product: Product, side: BookSide },
    #[error("No order book for {0} this tick")]
    MissingBook(Product),
    #[error("No position limit configured for {0}")]
    MissingLimit(Product),
    #[error("Observation {0} missing from this tick")]
    MissingObservation(String),
}

/// Read-only view of one tick shared by all strategies
#[derive(Debug, Clone, Copy)]
pub struct MarketView<'a> {
    pub timestamp: u64,
    /// Cash and fill-price memory as of the start of this tick
    pub session: &'a SessionState,
    pub quotes: &'a BTreeMap<Product, Result<Quote, BookError>>,
    pub positions: &'a Positions,
    pub limits: &'a BTreeMap<Product, PositionLimit>,
    pub observations: &'a BTreeMap<String, f64>,
}

impl MarketView<'_> {
    /// Ticks already processed in this session, not counting this one.
    /// Starts again from zero after a session reset.
    pub fn elapsed_ticks(&self) -> u64 {
        self.session.ticks_seen()
    }

    pub fn quote(&self, product: &str) -> Result<Quote, EngineError> {
        match self.quotes.get(product) {
            Some(Ok(quote)) => Ok(*quote),
            Some(Err(BookError::EmptySide(side))) => Err(EngineError::DegenerateBook {
                product: product.to_string(),
                side: *side,
            }),
            None => Err(EngineError::MissingBook(product.to_string())),
        }
    }

    pub fn position(&self, product: &str) -> i64 {
        self.positions.get(product)
    }

    pub fn limit(&self, product: &str) -> Result<PositionLimit, EngineError> {
        self.limits
            .get(product)
            .copied()
            .ok_or_else(|| EngineError::MissingLimit(product.to_string()))
    }

    pub fn observation(&self, name: &str) -> Result<f64, EngineError> {
        self.observations
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::MissingObservation(name.to_string()))
    }
}

/// A decision rule the engine runs once per tick
pub trait TickStrategy {
    /// Short label for logs
    fn name(&self) -> &str;

    /// Products this strategy places orders for
    fn products(&self) -> Vec<&str>;

    /// Decide this tick's orders, then advance the strategy's windows
    fn on_tick(&mut self, market: &MarketView<'_>) -> Result<Vec<Order>, EngineError>;

    /// Drop all window state at a session boundary
    fn reset(&mut self);
}
