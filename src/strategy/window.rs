//! Rolling Window
//!
//! Fixed-capacity FIFO buffer of observations with mean, population standard
//! deviation and band queries over its current contents.
//!
//! Band formula: (avg + n * std, avg - n * std)
//!
//! The window never refuses a query. An empty window reports avg = std = 0,
//! so callers that need a full window check `is_full` themselves.

use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Rolling buffer holding at most `size` observations, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    /// Observations in push order
    contents: VecDeque<f64>,
    /// Capacity
    size: usize,
}

impl RollingWindow {
    /// Create an empty window holding at most `size` observations
    pub fn new(size: usize) -> Self {
        Self {
            contents: VecDeque::with_capacity(size + 1),
            size,
        }
    }

    /// Append an observation, evicting the oldest once over capacity
    pub fn push(&mut self, value: f64) {
        self.contents.push_back(value);
        while self.contents.len() > self.size {
            self.contents.pop_front();
        }
    }

    /// Arithmetic mean of the current contents, 0 when empty
    pub fn avg(&self) -> f64 {
        if self.contents.is_empty() {
            return 0.0;
        }
        self.contents.iter().mean()
    }

    /// Population standard deviation, 0 for fewer than two observations
    pub fn std(&self) -> f64 {
        if self.contents.len() < 2 {
            return 0.0;
        }
        self.contents.iter().population_std_dev()
    }

    /// Upper and lower band `n` standard deviations from the mean
    pub fn bounds(&self, n: f64) -> (f64, f64) {
        let avg = self.avg();
        let std = self.std();
        (avg + n * std, avg - n * std)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.contents.len() >= self.size
    }

    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Most recent observation
    pub fn latest(&self) -> Option<f64> {
        self.contents.back().copied()
    }

    /// Current contents, oldest to newest
    pub fn contents(&self) -> impl Iterator<Item = f64> + '_ {
        self.contents.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.contents.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.contents.clear();
    }
}
