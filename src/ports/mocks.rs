//! In-memory port implementations for tests and dry runs

use std::collections::VecDeque;

use super::execution::{OrderSink, SinkError};
use super::market_data::{SourceError, TickSource, TradingState};
use crate::domain::TickOrders;

/// Tick source that replays a prepared list of snapshots
#[derive(Debug, Default, Clone)]
pub struct VecTickSource {
    ticks: VecDeque<TradingState>,
}

impl VecTickSource {
    pub fn new(ticks: impl IntoIterator<Item = TradingState>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }

    /// Builder method to append a snapshot
    pub fn with_tick(mut self, state: TradingState) -> Self {
        self.ticks.push_back(state);
        self
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl TickSource for VecTickSource {
    fn next_tick(&mut self) -> Result<Option<TradingState>, SourceError> {
        Ok(self.ticks.pop_front())
    }
}

/// Order sink that keeps every submission
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    submissions: Vec<(u64, TickOrders)>,
    flushes: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded submissions
    pub fn submissions(&self) -> &[(u64, TickOrders)] {
        &self.submissions
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl OrderSink for RecordingSink {
    fn submit(&mut self, timestamp: u64, orders: &TickOrders) -> Result<(), SinkError> {
        self.submissions.push((timestamp, orders.clone()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}
