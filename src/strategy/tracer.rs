//! Signal Tracer
//!
//! A rolling window over a derived signal (for example the mean indicator
//! difference) answering "is this value extreme compared with the signal's
//! own recent history?".
//!
//! A value is high when `value - k * std > avg` and low when
//! `value + k * std < avg`. With an empty history avg = std = 0, so any
//! value of non-zero sign classifies immediately.

use super::window::RollingWindow;

/// Where a value sits relative to the traced history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremity {
    High,
    Low,
    Normal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalTracer {
    history: RollingWindow,
}

impl SignalTracer {
    pub fn new(size: usize) -> Self {
        Self {
            history: RollingWindow::new(size),
        }
    }

    /// Add a value to the history. Call after all comparisons for the tick.
    pub fn record(&mut self, value: f64) {
        self.history.push(value);
    }

    pub fn avg(&self) -> f64 {
        self.history.avg()
    }

    pub fn std(&self) -> f64 {
        self.history.std()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn history(&self) -> &RollingWindow {
        &self.history
    }

    /// Classify `value` against the history using `k` standard deviations
    pub fn classify(&self, value: f64, k: f64) -> Extremity {
        let avg = self.avg();
        let std = self.std();
        if value - k * std > avg {
            Extremity::High
        } else if value + k * std < avg {
            Extremity::Low
        } else {
            Extremity::Normal
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_classifies_by_sign() {
        let tracer = SignalTracer::new(10);
        assert_eq!(tracer.classify(0.3, 0.1), Extremity::High);
        assert_eq!(tracer.classify(-0.3, 0.1), Extremity::Low);
        assert_eq!(tracer.classify(0.0, 0.1), Extremity::Normal);
    }

    #[test]
    fn test_band_around_history() {
        let mut tracer = SignalTracer::new(4);
        for value in [1.0, -1.0, 1.0, -1.0] {
            tracer.record(value);
        }
        // avg 0, std 1: with k = 0.5 the neutral band is [-0.5, 0.5]
        assert_eq!(tracer.classify(0.4, 0.5), Extremity::Normal);
        assert_eq!(tracer.classify(0.6, 0.5), Extremity::High);
        assert_eq!(tracer.classify(-0.6, 0.5), Extremity::Low);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut tracer = SignalTracer::new(3);
        for value in 0..10 {
            tracer.record(value as f64);
        }
        assert_eq!(tracer.len(), 3);
        assert_eq!(tracer.history().to_vec(), vec![7.0, 8.0, 9.0]);
    }
}
