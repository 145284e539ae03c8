//! Lagged differences over a window's contents.
//!
//! `diff[i] = x[i] - x[i - term]` for `i >= term`. The first `term`
//! observations have no partner and are left out of every aggregate.

use statrs::statistics::Statistics;

use super::window::RollingWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceSeries {
    /// Valid differences, oldest first
    values: Vec<f64>,
    term: usize,
}

impl DifferenceSeries {
    pub fn from_window(window: &RollingWindow, term: usize) -> Self {
        Self::from_slice(&window.to_vec(), term)
    }

    pub fn from_slice(observations: &[f64], term: usize) -> Self {
        let values = if term == 0 || observations.len() <= term {
            Vec::new()
        } else {
            observations
                .iter()
                .skip(term)
                .zip(observations.iter())
                .map(|(current, lagged)| current - lagged)
                .collect()
        };
        Self { values, term }
    }

    pub fn term(&self) -> usize {
        self.term
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean over every valid difference
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().mean())
    }

    /// Mean over the last `lookback` differences, leaving out the newest.
    ///
    /// Covers the `lookback - 1` differences before the latest one, or all
    /// older ones when fewer exist. `None` when nothing is left.
    pub fn trailing_mean(&self, lookback: usize) -> Option<f64> {
        let end = self.values.len().checked_sub(1)?;
        let start = self.values.len().saturating_sub(lookback);
        if start >= end {
            return None;
        }
        Some(self.values[start..end].iter().mean())
    }
}
