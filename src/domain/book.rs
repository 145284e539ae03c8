//! Order Book Snapshot
//!
//! Resting bids and asks for one product at one tick, plus the top-of-book
//! view the strategies price from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Which side of the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookSide {
    Bid,
    Ask,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Bid => write!(f, "bid"),
            BookSide::Ask => write!(f, "ask"),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("{0} side of the order book is empty")]
    EmptySide(BookSide),
}

/// Price -> volume maps for resting buy and sell orders.
///
/// Some hosts report ask volumes as negative numbers; volumes are read back
/// through `abs` so both conventions work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDepth {
    #[serde(default)]
    pub buy_orders: BTreeMap<i64, i64>,
    #[serde(default)]
    pub sell_orders: BTreeMap<i64, i64>,
}

impl OrderDepth {
    pub fn new(buy_orders: BTreeMap<i64, i64>, sell_orders: BTreeMap<i64, i64>) -> Self {
        Self {
            buy_orders,
            sell_orders,
        }
    }

    /// Highest bid as (price, volume)
    pub fn best_bid(&self) -> Option<(i64, i64)> {
        self.buy_orders
            .iter()
            .next_back()
            .map(|(&price, &volume)| (price, volume.abs()))
    }

    /// Lowest ask as (price, volume)
    pub fn best_ask(&self) -> Option<(i64, i64)> {
        self.sell_orders
            .iter()
            .next()
            .map(|(&price, &volume)| (price, volume.abs()))
    }

    /// Top of book, failing if either side is empty
    pub fn quote(&self) -> Result<Quote, BookError> {
        let (bid_price, bid_volume) = self.best_bid().ok_or(BookError::EmptySide(BookSide::Bid))?;
        let (ask_price, ask_volume) = self.best_ask().ok_or(BookError::EmptySide(BookSide::Ask))?;
        Ok(Quote {
            bid_price,
            bid_volume,
            ask_price,
            ask_volume,
        })
    }
}

/// Best bid/ask with their volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub bid_price: i64,
    pub bid_volume: i64,
    pub ask_price: i64,
    pub ask_volume: i64,
}

impl Quote {
    pub fn new(bid_price: i64, bid_volume: i64, ask_price: i64, ask_volume: i64) -> Self {
        Self {
            bid_price,
            bid_volume,
            ask_price,
            ask_volume,
        }
    }

    pub fn mid(&self) -> f64 {
        (self.bid_price + self.ask_price) as f64 / 2.0
    }

    pub fn spread(&self) -> i64 {
        self.ask_price - self.bid_price
    }

    /// Volume weighted price, each side weighted by the opposite side's volume.
    /// Falls back to the mid when both volumes are zero.
    pub fn wap(&self) -> f64 {
        let total = self.bid_volume + self.ask_volume;
        if total == 0 {
            return self.mid();
        }
        (self.bid_price * self.ask_volume + self.ask_price * self.bid_volume) as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn depth(bids: &[(i64, i64)], asks: &[(i64, i64)]) -> OrderDepth {
        OrderDepth::new(bids.iter().copied().collect(), asks.iter().copied().collect())
    }

    #[test]
    fn test_best_levels() {
        let book = depth(&[(9995, 10), (9998, 4)], &[(10002, -7), (10005, -20)]);
        assert_eq!(book.best_bid(), Some((9998, 4)));
        assert_eq!(book.best_ask(), Some((10002, 7)));
    }

    #[test]
    fn test_quote_mid_and_spread() {
        let quote = depth(&[(4949, 20)], &[(4952, 20)]).quote().unwrap();
        assert_relative_eq!(quote.mid(), 4950.5);
        assert_eq!(quote.spread(), 3);
    }

    #[test]
    fn test_empty_side_is_reported() {
        let no_bids = depth(&[], &[(10002, 5)]);
        assert_eq!(no_bids.quote(), Err(BookError::EmptySide(BookSide::Bid)));

        let no_asks = depth(&[(9998, 5)], &[]);
        assert_eq!(no_asks.quote(), Err(BookError::EmptySide(BookSide::Ask)));
        assert!(no_asks.best_ask().is_none());
    }

    #[test]
    fn test_wap_weights_opposite_volume() {
        // Heavy bid volume pulls the price toward the ask
        let quote = Quote::new(100, 30, 102, 10);
        assert_relative_eq!(quote.wap(), (100.0 * 10.0 + 102.0 * 30.0) / 40.0);
        assert!(quote.wap() > quote.mid());
    }

    #[test]
    fn test_wap_without_volume() {
        let quote = Quote::new(100, 0, 102, 0);
        assert_relative_eq!(quote.wap(), 101.0);
    }

    #[test]
    fn test_depth_from_json_string_keys() {
        let json = r#"{"buy_orders":{"9998":4},"sell_orders":{"10002":-7}}"#;
        let book: OrderDepth = serde_json::from_str(json).unwrap();
        assert_eq!(book.quote().unwrap(), Quote::new(9998, 4, 10002, 7));
    }
}
