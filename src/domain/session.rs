//! Session State
//!
//! Everything that lives for one trading session apart from the strategy
//! windows: cumulative cash from our own fills, the last prices we bought and
//! sold at, and the tick counter used for cold-start gating.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::order::Product;
use super::position::Positions;
use super::trade::Trade;

/// Static session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Timestamp distance between two consecutive ticks
    pub tick_interval: u64,
    /// Timestamp of the last tick of the session, if known
    pub final_timestamp: Option<u64>,
    /// Trader id the exchange puts on our own fills
    pub own_trader_id: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: 100,
            final_timestamp: Some(99_900),
            own_trader_id: "SUBMISSION".to_string(),
        }
    }
}

/// Cash movement from one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillSummary {
    pub bought: i64,
    pub sold: i64,
    pub cash_delta: i64,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    settings: SessionSettings,
    cash: i64,
    last_bought_price: Option<i64>,
    last_sold_price: Option<i64>,
    ticks_seen: u64,
    last_timestamp: Option<u64>,
}

impl SessionState {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            cash: 0,
            last_bought_price: None,
            last_sold_price: None,
            ticks_seen: 0,
            last_timestamp: None,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn cash(&self) -> i64 {
        self.cash
    }

    pub fn last_bought_price(&self) -> Option<i64> {
        self.last_bought_price
    }

    pub fn last_sold_price(&self) -> Option<i64> {
        self.last_sold_price
    }

    pub fn ticks_seen(&self) -> u64 {
        self.ticks_seen
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// Apply our own fills from the previous tick to cash.
    ///
    /// Hosts resend recent fills every tick, so only trades stamped exactly
    /// one interval before `now` are counted.
    pub fn reconcile_fills(
        &mut self,
        own_trades: &BTreeMap<Product, Vec<Trade>>,
        now: u64,
    ) -> FillSummary {
        let mut summary = FillSummary::default();
        let Some(previous) = now.checked_sub(self.settings.tick_interval) else {
            return summary;
        };

        for trade in own_trades.values().flatten() {
            if trade.timestamp != previous {
                continue;
            }
            if trade.bought_by(&self.settings.own_trader_id) {
                tracing::debug!(
                    product = %trade.symbol,
                    quantity = trade.quantity,
                    price = trade.price,
                    "bought"
                );
                summary.bought += trade.quantity.abs();
                summary.cash_delta -= trade.notional();
                self.last_bought_price = Some(trade.price);
            } else if trade.sold_by(&self.settings.own_trader_id) {
                tracing::debug!(
                    product = %trade.symbol,
                    quantity = trade.quantity,
                    price = trade.price,
                    "sold"
                );
                summary.sold += trade.quantity.abs();
                summary.cash_delta += trade.notional();
                self.last_sold_price = Some(trade.price);
            }
        }

        self.cash += summary.cash_delta;
        summary
    }

    /// Profit if every open position were closed at its mid price.
    /// Products without a mid this tick are left out.
    pub fn mark_to_market(&self, positions: &Positions, mids: &BTreeMap<Product, f64>) -> f64 {
        positions
            .iter()
            .filter_map(|(product, qty)| mids.get(product).map(|mid| qty as f64 * mid))
            .fold(self.cash as f64, |acc, value| acc + value)
    }

    /// Record that the tick at `timestamp` has been processed
    pub fn advance(&mut self, timestamp: u64) {
        self.ticks_seen += 1;
        self.last_timestamp = Some(timestamp);
    }

    /// Whether `timestamp` is the session's closing tick
    pub fn is_final_tick(&self, timestamp: u64) -> bool {
        self.settings.final_timestamp == Some(timestamp)
    }

    /// Start a fresh session with the same settings
    pub fn reset(&mut self) {
        *self = Self::new(self.settings.clone());
    }
}
