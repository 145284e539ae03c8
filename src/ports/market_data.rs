//! Market data port
//!
//! `TradingState` is the snapshot the host hands the engine once per tick.
//! `TickSource` abstracts where those snapshots come from (a replay file, an
//! in-memory script in tests).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{OrderDepth, Product, Trade};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read tick: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed tick on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A tradable listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: Product,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub denomination: String,
}

/// Everything the host reports for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingState {
    pub timestamp: u64,
    #[serde(default)]
    pub listings: BTreeMap<Product, Listing>,
    #[serde(default)]
    pub order_depths: BTreeMap<Product, OrderDepth>,
    /// Net holdings; products never traded may be missing
    #[serde(default)]
    pub position: BTreeMap<Product, i64>,
    /// Our own recent fills, per product
    #[serde(default)]
    pub own_trades: BTreeMap<Product, Vec<Trade>>,
    /// Other participants' recent fills, per product
    #[serde(default)]
    pub market_trades: BTreeMap<Product, Vec<Trade>>,
    /// Exogenous scalar observations by name
    #[serde(default)]
    pub observations: BTreeMap<String, f64>,
}

impl TradingState {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Products the host lists, plus any with a book this tick
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.listings
            .keys()
            .chain(self.order_depths.keys().filter(|p| !self.listings.contains_key(*p)))
    }

    pub fn with_depth(mut self, product: impl Into<Product>, depth: OrderDepth) -> Self {
        self.order_depths.insert(product.into(), depth);
        self
    }

    pub fn with_position(mut self, product: impl Into<Product>, position: i64) -> Self {
        self.position.insert(product.into(), position);
        self
    }

    pub fn with_observation(mut self, name: impl Into<String>, value: f64) -> Self {
        self.observations.insert(name.into(), value);
        self
    }

    pub fn with_own_trade(mut self, trade: Trade) -> Self {
        self.own_trades.entry(trade.symbol.clone()).or_default().push(trade);
        self
    }
}

/// Supplies one `TradingState` per tick in time order
pub trait TickSource {
    /// Next snapshot, `Ok(None)` once the source is exhausted
    fn next_tick(&mut self) -> Result<Option<TradingState>, SourceError>;
}

impl<T: TickSource + ?Sized> TickSource for Box<T> {
    fn next_tick(&mut self) -> Result<Option<TradingState>, SourceError> {
        (**self).next_tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_state_parses() {
        let state: TradingState = serde_json::from_str(r#"{"timestamp": 300}"#).unwrap();
        assert_eq!(state.timestamp, 300);
        assert!(state.order_depths.is_empty());
        assert!(state.observations.is_empty());
    }

    #[test]
    fn test_full_state_parses() {
        let json = r#"{
            "timestamp": 1000,
            "listings": {"PEARLS": {"symbol": "PEARLS", "product": "PEARLS", "denomination": "SEASHELLS"}},
            "order_depths": {"PEARLS": {"buy_orders": {"9998": 2}, "sell_orders": {"10001": -3}}},
            "position": {"PEARLS": 4},
            "own_trades": {"PEARLS": [{"symbol": "PEARLS", "price": 9998, "quantity": 2, "buyer": "SUBMISSION", "timestamp": 900}]},
            "observations": {"DOLPHIN_SIGHTINGS": 3012}
        }"#;
        let state: TradingState = serde_json::from_str(json).unwrap();
        assert_eq!(state.position["PEARLS"], 4);
        assert_eq!(state.observations["DOLPHIN_SIGHTINGS"], 3012.0);
        assert_eq!(state.own_trades["PEARLS"][0].buyer.as_deref(), Some("SUBMISSION"));
        assert!(state.order_depths["PEARLS"].quote().is_ok());
    }

    #[test]
    fn test_products_union() {
        let mut state = TradingState::new(0).with_depth("BANANAS", OrderDepth::default());
        state.listings.insert(
            "PEARLS".to_string(),
            Listing {
                symbol: "PEARLS".to_string(),
                product: "PEARLS".to_string(),
                denomination: "SEASHELLS".to_string(),
            },
        );
        let products: Vec<_> = state.products().cloned().collect();
        assert_eq!(products, vec!["PEARLS".to_string(), "BANANAS".to_string()]);
    }
}
