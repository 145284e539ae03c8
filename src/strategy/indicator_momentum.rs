//! Indicator Momentum
//!
//! Trades a product on the trend of an exogenous indicator (for example
//! dolphin sightings for diving gear) and exits when the product's own
//! trend runs out of steam.
//!
//! Per tick:
//! 1. `observe` pushes the indicator value and the product mid
//! 2. `evaluate` derives
//!    - `signal`: mean lagged difference of the indicator window
//!    - `short_mean`/`long_mean`: mean of the product differences over the
//!      short and long lookbacks, leaving out this tick's difference
//! 3. Entry: `signal` extreme against the tracer history buys (or sells)
//!    up to the limit, capped by the touch volume
//! 4. Exit: `short_mean < long_mean` flattens at the bid,
//!    `short_mean > long_mean` flattens at the ask
//! 5. `record_signal` pushes `signal` into the tracer
//!
//! Entry and exit are evaluated independently and may both fire in the same
//! tick, even in opposite directions. This mirrors the tuned behaviour and is
//! kept as a heuristic.

use crate::domain::{Order, PositionLimit, Product, Quote};
use crate::ports::{EngineError, MarketView, TickStrategy};

use super::difference::DifferenceSeries;
use super::params::IndicatorMomentumParams;
use super::tracer::{Extremity, SignalTracer};
use super::window::RollingWindow;

/// Result of one evaluation, kept for logging and for `record_signal`
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumDecision {
    pub orders: Vec<Order>,
    /// Mean indicator difference, `None` until the window holds more than the lag
    pub signal: Option<f64>,
    pub short_mean: Option<f64>,
    pub long_mean: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct IndicatorMomentumStrategy {
    product: Product,
    indicator: String,
    params: IndicatorMomentumParams,
    indicator_window: RollingWindow,
    instrument_window: RollingWindow,
    tracer: SignalTracer,
}

impl IndicatorMomentumStrategy {
    pub fn new(
        product: impl Into<Product>,
        indicator: impl Into<String>,
        params: IndicatorMomentumParams,
    ) -> Self {
        Self {
            product: product.into(),
            indicator: indicator.into(),
            indicator_window: RollingWindow::new(params.indicator_window),
            instrument_window: RollingWindow::new(params.instrument_window),
            tracer: SignalTracer::new(params.tracer_size),
            params,
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    /// Observation key of the indicator
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    pub fn params(&self) -> &IndicatorMomentumParams {
        &self.params
    }

    pub fn indicator_window(&self) -> &RollingWindow {
        &self.indicator_window
    }

    pub fn instrument_window(&self) -> &RollingWindow {
        &self.instrument_window
    }

    pub fn tracer(&self) -> &SignalTracer {
        &self.tracer
    }

    /// Push this tick's indicator value and mid price
    pub fn observe(&mut self, indicator_value: f64, quote: &Quote) {
        self.indicator_window.push(indicator_value);
        self.instrument_window.push(quote.mid());
    }

    pub fn signal(&self) -> Option<f64> {
        DifferenceSeries::from_window(&self.indicator_window, self.params.indicator_diff_term).mean()
    }

    /// Entry and exit orders from the current windows. Does not mutate.
    pub fn evaluate(&self, quote: &Quote, position: i64, limit: PositionLimit) -> MomentumDecision {
        let mut orders = Vec::new();

        let signal = self.signal();
        if let Some(signal) = signal {
            let threshold = self.params.absolute_threshold;
            match self.tracer.classify(signal, self.params.entry_std_multiplier) {
                Extremity::High if signal > threshold => {
                    let quantity = limit.clamp_buy(position, quote.ask_volume);
                    if quantity > 0 {
                        orders.push(Order::new(self.product.as_str(), quote.ask_price, quantity));
                    }
                }
                Extremity::Low if signal < -threshold => {
                    let quantity = limit.clamp_sell(position, quote.bid_volume);
                    if quantity > 0 {
                        orders.push(Order::new(self.product.as_str(), quote.bid_price, -quantity));
                    }
                }
                _ => {}
            }
        }

        let trend = DifferenceSeries::from_window(&self.instrument_window, self.params.instrument_diff_term);
        let short_mean = trend.trailing_mean(self.params.short_lookback);
        let long_mean = trend.trailing_mean(self.params.long_lookback);

        if let (Some(short), Some(long)) = (short_mean, long_mean) {
            if position != 0 {
                if short < long {
                    orders.push(Order::new(self.product.as_str(), quote.bid_price, -position));
                }
                if short > long {
                    orders.push(Order::new(self.product.as_str(), quote.ask_price, -position));
                }
            }
        }

        tracing::debug!(
            product = %self.product,
            signal = ?signal,
            tracer_avg = self.tracer.avg(),
            tracer_std = self.tracer.std(),
            short = ?short_mean,
            long = ?long_mean,
            orders = orders.len(),
            "momentum evaluation"
        );

        MomentumDecision {
            orders,
            signal,
            short_mean,
            long_mean,
        }
    }

    /// Push the decision's signal into the tracer. Call after `evaluate`.
    pub fn record_signal(&mut self, decision: &MomentumDecision) {
        if let Some(signal) = decision.signal {
            self.tracer.record(signal);
        }
    }

    /// observe, evaluate, record in one call
    pub fn step(
        &mut self,
        indicator_value: f64,
        quote: &Quote,
        position: i64,
        limit: PositionLimit,
    ) -> Vec<Order> {
        self.observe(indicator_value, quote);
        let decision = self.evaluate(quote, position, limit);
        self.record_signal(&decision);
        decision.orders
    }

    pub fn reset(&mut self) {
        self.indicator_window.clear();
        self.instrument_window.clear();
        self.tracer.clear();
    }
}

impl TickStrategy for IndicatorMomentumStrategy {
    fn name(&self) -> &str {
        "indicator_momentum"
    }

    fn products(&self) -> Vec<&str> {
        vec![self.product.as_str()]
    }

    fn on_tick(&mut self, market: &MarketView<'_>) -> Result<Vec<Order>, EngineError> {
        let value = market.observation(&self.indicator)?;
        let quote = market.quote(&self.product)?;
        let limit = market.limit(&self.product)?;
        Ok(self.step(value, &quote, market.position(&self.product), limit))
    }

    fn reset(&mut self) {
        IndicatorMomentumStrategy::reset(self);
    }
}
