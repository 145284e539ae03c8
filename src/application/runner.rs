//! Replay Runner
//!
//! Feeds recorded ticks through the engine and hands each tick's orders to
//! an `OrderSink`. Ticks are processed strictly in source order; the first
//! source or sink error stops the run.

use thiserror::Error;
use tracing::{debug, info};

use super::engine::Engine;
use crate::ports::{OrderSink, SinkError, SourceError, TickSource};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Tick source error: {0}")]
    Source(#[from] SourceError),
    #[error("Order sink error: {0}")]
    Sink(#[from] SinkError),
}

/// What a replay did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Non-placeholder orders produced
    pub orders: usize,
    pub buys: usize,
    pub sells: usize,
    /// Strategy runs skipped because of degenerate books or missing data
    pub skipped: usize,
    pub last_timestamp: Option<u64>,
    /// Mark-to-market profit after the last tick
    pub final_profit: f64,
}

pub struct ReplayRunner<S, K> {
    engine: Engine,
    source: S,
    sink: K,
    drop_placeholders: bool,
}

impl<S: TickSource, K: OrderSink> ReplayRunner<S, K> {
    pub fn new(engine: Engine, source: S, sink: K) -> Self {
        Self {
            engine,
            source,
            sink,
            drop_placeholders: false,
        }
    }

    /// Remove zero-quantity orders before they reach the sink
    pub fn drop_placeholders(mut self, drop: bool) -> Self {
        self.drop_placeholders = drop;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Process every tick the source yields
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();

        while let Some(state) = self.source.next_tick()? {
            let orders = self.engine.on_tick(&state);
            let orders = if self.drop_placeholders {
                orders.without_placeholders()
            } else {
                orders
            };

            summary.ticks += 1;
            for order in orders.iter().flat_map(|(_, o)| o) {
                if order.is_buy() {
                    summary.buys += 1;
                } else if order.is_sell() {
                    summary.sells += 1;
                }
            }
            summary.orders = summary.buys + summary.sells;
            summary.skipped += self.engine.last_errors().len();
            summary.last_timestamp = Some(state.timestamp);
            summary.final_profit = self.engine.last_profit();

            debug!(timestamp = state.timestamp, orders = orders.order_count(), "tick submitted");
            self.sink.submit(state.timestamp, &orders)?;
        }

        self.sink.flush()?;
        info!(
            ticks = summary.ticks,
            orders = summary.orders,
            skipped = summary.skipped,
            profit = summary.final_profit,
            "replay finished"
        );
        Ok(summary)
    }

    pub fn into_parts(self) -> (Engine, S, K) {
        (self.engine, self.source, self.sink)
    }
}
