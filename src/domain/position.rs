use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::order::Product;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("Invalid position limit: {0} (must be > 0)")]
    InvalidLimit(i64),
}

/// Symmetric position bound `[-limit, limit]` for one product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PositionLimit(i64);

impl PositionLimit {
    pub fn new(limit: i64) -> Result<Self, PositionError> {
        if limit <= 0 {
            return Err(PositionError::InvalidLimit(limit));
        }
        Ok(Self(limit))
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn contains(&self, position: i64) -> bool {
        position.abs() <= self.0
    }

    /// Units that can still be bought before reaching `+limit`
    pub fn buy_headroom(&self, position: i64) -> i64 {
        (self.0 - position).max(0)
    }

    /// Units that can still be sold before reaching `-limit`
    pub fn sell_headroom(&self, position: i64) -> i64 {
        (self.0 + position).max(0)
    }

    /// Clamp a wanted buy size to the remaining headroom
    pub fn clamp_buy(&self, position: i64, wanted: i64) -> i64 {
        wanted.max(0).min(self.buy_headroom(position))
    }

    /// Clamp a wanted sell size (positive units) to the remaining headroom
    pub fn clamp_sell(&self, position: i64, wanted: i64) -> i64 {
        wanted.max(0).min(self.sell_headroom(position))
    }
}

impl TryFrom<i64> for PositionLimit {
    type Error = PositionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositionLimit> for i64 {
    fn from(limit: PositionLimit) -> Self {
        limit.0
    }
}

/// Net signed holdings per product for the current tick.
///
/// Products the host never reported read as flat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Positions(BTreeMap<Product, i64>);

impl Positions {
    /// Build from the host's report, adding a zero entry for every listed
    /// product the report leaves out
    pub fn from_reported<'a>(
        reported: &BTreeMap<Product, i64>,
        listings: impl IntoIterator<Item = &'a Product>,
    ) -> Self {
        let mut positions = reported.clone();
        for product in listings {
            positions.entry(product.clone()).or_insert(0);
        }
        Self(positions)
    }

    pub fn get(&self, product: &str) -> i64 {
        self.0.get(product).copied().unwrap_or(0)
    }

    pub fn set(&mut self, product: impl Into<Product>, position: i64) {
        self.0.insert(product.into(), position);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Product, i64)> {
        self.0.iter().map(|(p, &q)| (p, q))
    }
}
