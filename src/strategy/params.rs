//! Strategy Parameters
//!
//! Parameter structs for each decision family. Defaults reproduce the
//! tuning used in the competition round (BANANAS band breakout, PEARLS
//! mean reversion, COCONUTS/PINA_COLADAS pairs, DIVING_GEAR momentum).

use serde::{Deserialize, Serialize};

/// Band breakout market making on one product's mid price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandBreakoutParams {
    /// Number of mid prices in the rolling window
    pub window_size: usize,
    /// Price improvement from the touch
    pub margin: i64,
    /// Largest order used to unwind gradually
    pub clear_limit: i64,
    /// Breakouts are ignored once |position| reaches this
    pub force_clear: i64,
    /// Inner band width in standard deviations
    pub inner_band: f64,
    /// Outer band width in standard deviations
    pub outer_band: f64,
    /// Margin multiplier when the mid is beyond the outer band
    pub adaptive_multiplier: i64,
}

impl Default for BandBreakoutParams {
    fn default() -> Self {
        Self {
            window_size: 10,
            margin: 1,
            clear_limit: 20,
            force_clear: 20,
            inner_band: 0.7,
            outer_band: 2.0,
            adaptive_multiplier: 2,
        }
    }
}

impl BandBreakoutParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.window_size == 0 {
            return Err(ParamError::InvalidWindowSize(self.window_size));
        }
        if self.margin < 0 {
            return Err(ParamError::NegativeMargin(self.margin));
        }
        if self.clear_limit <= 0 {
            return Err(ParamError::InvalidClearLimit(self.clear_limit));
        }
        if self.force_clear <= 0 {
            return Err(ParamError::InvalidForceClear(self.force_clear));
        }
        validate_bands(self.inner_band, self.outer_band)?;
        if self.adaptive_multiplier < 1 {
            return Err(ParamError::InvalidMultiplier(self.adaptive_multiplier));
        }
        Ok(())
    }
}

/// Quoting around a fixed fair value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionParams {
    /// Fair value the product reverts to
    pub true_price: i64,
    /// Minimum edge to the fair value before quoting a side
    pub min_profit_margin: i64,
    /// Size scaling per unit of edge
    pub alpha: f64,
    /// Units per unit of edge
    pub lot_size: i64,
}

impl Default for MeanReversionParams {
    fn default() -> Self {
        Self {
            true_price: 10_000,
            min_profit_margin: 2,
            alpha: 1.0,
            lot_size: 15,
        }
    }
}

impl MeanReversionParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.true_price <= 0 {
            return Err(ParamError::InvalidTruePrice(self.true_price));
        }
        if self.lot_size <= 0 {
            return Err(ParamError::InvalidLotSize(self.lot_size));
        }
        if !(self.alpha > 0.0) || !self.alpha.is_finite() {
            return Err(ParamError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

/// Cross-product arbitrage between two products linked by a lot ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairsArbitrageParams {
    /// Number of spread observations per window; also the cold-start length in ticks
    pub window_size: usize,
    /// Units of product A per lot
    pub lot_size_a: i64,
    /// Units of product B per lot
    pub lot_size_b: i64,
    /// Price improvement from the touch
    pub margin: i64,
    /// Per-leg cap on traded units before lot rounding
    pub trade_amount_cap: i64,
    /// Entry band width in standard deviations
    pub inner_band: f64,
    /// Band beyond which the hedge leg is priced more aggressively
    pub outer_band: f64,
    /// Added to whichever entry threshold is tighter
    pub tie_break_bump: f64,
}

impl Default for PairsArbitrageParams {
    fn default() -> Self {
        Self {
            window_size: 4,
            lot_size_a: 15,
            lot_size_b: 8,
            margin: 1,
            trade_amount_cap: 1200,
            inner_band: 1.0,
            outer_band: 2.0,
            tie_break_bump: 25.0,
        }
    }
}

impl PairsArbitrageParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.window_size == 0 {
            return Err(ParamError::InvalidWindowSize(self.window_size));
        }
        if self.lot_size_a <= 0 {
            return Err(ParamError::InvalidLotSize(self.lot_size_a));
        }
        if self.lot_size_b <= 0 {
            return Err(ParamError::InvalidLotSize(self.lot_size_b));
        }
        if self.margin < 0 {
            return Err(ParamError::NegativeMargin(self.margin));
        }
        if self.trade_amount_cap <= 0 {
            return Err(ParamError::InvalidTradeCap(self.trade_amount_cap));
        }
        validate_bands(self.inner_band, self.outer_band)?;
        if self.tie_break_bump < 0.0 {
            return Err(ParamError::InvalidTieBreak(self.tie_break_bump));
        }
        Ok(())
    }
}

/// Momentum trading on an exogenous indicator with trend-exhaustion exits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorMomentumParams {
    /// Indicator observations kept
    pub indicator_window: usize,
    /// Lag of the indicator differences
    pub indicator_diff_term: usize,
    /// Instrument mid prices kept
    pub instrument_window: usize,
    /// Lag of the instrument differences
    pub instrument_diff_term: usize,
    /// Differences in the long trend mean
    pub long_lookback: usize,
    /// Trailing slots of the short trend mean; the newest slot is left out
    pub short_lookback: usize,
    /// History length of the signal tracer
    pub tracer_size: usize,
    /// Standard deviations the signal must clear, a fraction below one
    pub entry_std_multiplier: f64,
    /// Minimum absolute signal for an entry
    pub absolute_threshold: f64,
}

impl Default for IndicatorMomentumParams {
    fn default() -> Self {
        // 10 past differences plus the lag plus the current observation
        Self {
            indicator_window: 12,
            indicator_diff_term: 1,
            instrument_window: 12,
            instrument_diff_term: 1,
            long_lookback: 30,
            short_lookback: 10,
            tracer_size: 10,
            entry_std_multiplier: 0.1,
            absolute_threshold: 0.0,
        }
    }
}

impl IndicatorMomentumParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        for size in [self.indicator_window, self.instrument_window, self.tracer_size] {
            if size == 0 {
                return Err(ParamError::InvalidWindowSize(size));
            }
        }
        for (term, window) in [
            (self.indicator_diff_term, self.indicator_window),
            (self.instrument_diff_term, self.instrument_window),
        ] {
            if term == 0 || term >= window {
                return Err(ParamError::InvalidDiffTerm { term, window });
            }
        }
        if self.short_lookback < 2 || self.long_lookback <= self.short_lookback {
            return Err(ParamError::InvalidLookbacks {
                short: self.short_lookback,
                long: self.long_lookback,
            });
        }
        if !(0.0..1.0).contains(&self.entry_std_multiplier) {
            return Err(ParamError::InvalidEntryMultiplier(self.entry_std_multiplier));
        }
        if self.absolute_threshold < 0.0 {
            return Err(ParamError::InvalidAbsoluteThreshold(self.absolute_threshold));
        }
        Ok(())
    }
}

fn validate_bands(inner: f64, outer: f64) -> Result<(), ParamError> {
    if inner < 0.0 || outer <= inner {
        return Err(ParamError::InvalidBands { inner, outer });
    }
    Ok(())
}

/// Parameter validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("Invalid window size: {0} (must be > 0)")]
    InvalidWindowSize(usize),
    #[error("Invalid margin: {0} (must be >= 0)")]
    NegativeMargin(i64),
    #[error("Invalid clear limit: {0} (must be > 0)")]
    InvalidClearLimit(i64),
    #[error("Invalid force clear: {0} (must be > 0)")]
    InvalidForceClear(i64),
    #[error("Invalid bands: inner {inner}, outer {outer} (need 0 <= inner < outer)")]
    InvalidBands { inner: f64, outer: f64 },
    #[error("Invalid adaptive multiplier: {0} (must be >= 1)")]
    InvalidMultiplier(i64),
    #[error("Invalid true price: {0} (must be > 0)")]
    InvalidTruePrice(i64),
    #[error("Invalid lot size: {0} (must be > 0)")]
    InvalidLotSize(i64),
    #[error("Invalid alpha: {0} (must be > 0)")]
    InvalidAlpha(f64),
    #[error("Invalid trade amount cap: {0} (must be > 0)")]
    InvalidTradeCap(i64),
    #[error("Invalid tie-break bump: {0} (must be >= 0)")]
    InvalidTieBreak(f64),
    #[error("Invalid diff term {term} for window of {window} (need 0 < term < window)")]
    InvalidDiffTerm { term: usize, window: usize },
    #[error("Invalid lookbacks: short {short}, long {long} (need 2 <= short < long)")]
    InvalidLookbacks { short: usize, long: usize },
    #[error("Invalid entry multiplier: {0} (must be 0 <= k < 1)")]
    InvalidEntryMultiplier(f64),
    #[error("Invalid absolute threshold: {0} (must be >= 0)")]
    InvalidAbsoluteThreshold(f64),
}
