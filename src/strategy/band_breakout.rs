//! Band Breakout Market Maker
//!
//! Quotes one product against a rolling band of its own mid prices.
//!
//! - mid above the inner band: sell down to `-limit`
//! - mid below the inner band: buy up to `+limit`
//! - otherwise: unwind at most `clear_limit` units toward flat
//!
//! Beyond the outer band the price improvement is scaled by
//! `adaptive_multiplier`. Breakouts are ignored once `|position|` reaches
//! `force_clear`, and until the window has filled.
//!
//! The decision never sees the current tick's mid: `decide` reads the window,
//! then the caller pushes the mid with `observe`.

use crate::domain::{Order, PositionLimit, Product, Quote};
use crate::ports::{EngineError, MarketView, TickStrategy};

use super::params::BandBreakoutParams;
use super::window::RollingWindow;

/// Which branch produced the order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakoutSignal {
    Sell,
    Buy,
    Unwind,
}

#[derive(Debug, Clone)]
pub struct BandBreakoutStrategy {
    product: Product,
    params: BandBreakoutParams,
    window: RollingWindow,
}

impl BandBreakoutStrategy {
    pub fn new(product: impl Into<Product>, params: BandBreakoutParams) -> Self {
        let window = RollingWindow::new(params.window_size);
        Self {
            product: product.into(),
            params,
            window,
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn params(&self) -> &BandBreakoutParams {
        &self.params
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    /// Classify the quote's mid against the current bands
    pub fn signal(&self, quote: &Quote, position: i64) -> BreakoutSignal {
        if !self.window.is_full() || position.abs() >= self.params.force_clear {
            return BreakoutSignal::Unwind;
        }
        let mid = quote.mid();
        let (upper, lower) = self.window.bounds(self.params.inner_band);
        if mid > upper {
            BreakoutSignal::Sell
        } else if mid < lower {
            BreakoutSignal::Buy
        } else {
            BreakoutSignal::Unwind
        }
    }

    /// Exactly one order for this tick. Does not touch the window.
    pub fn decide(&self, quote: &Quote, position: i64, limit: PositionLimit) -> Order {
        let mid = quote.mid();
        let (upper2, lower2) = self.window.bounds(self.params.outer_band);
        let margin = self.params.margin;

        let order = match self.signal(quote, position) {
            BreakoutSignal::Sell => {
                let margin = if mid > upper2 {
                    margin * self.params.adaptive_multiplier
                } else {
                    margin
                };
                Order::new(
                    self.product.as_str(),
                    quote.ask_price - margin,
                    -limit.sell_headroom(position),
                )
            }
            BreakoutSignal::Buy => {
                let margin = if mid < lower2 {
                    margin * self.params.adaptive_multiplier
                } else {
                    margin
                };
                Order::new(
                    self.product.as_str(),
                    quote.bid_price + margin,
                    limit.buy_headroom(position),
                )
            }
            BreakoutSignal::Unwind if position > 0 => Order::new(
                self.product.as_str(),
                quote.ask_price - margin,
                -position.min(self.params.clear_limit),
            ),
            BreakoutSignal::Unwind if position < 0 => Order::new(
                self.product.as_str(),
                quote.bid_price + margin,
                (-position).min(self.params.clear_limit),
            ),
            BreakoutSignal::Unwind => Order::new(self.product.as_str(), quote.bid_price + margin, 0),
        };

        tracing::debug!(
            product = %self.product,
            mid,
            avg = self.window.avg(),
            std = self.window.std(),
            price = order.price,
            quantity = order.quantity,
            "band breakout decision"
        );
        order
    }

    /// Push the tick's mid price. Call after `decide`.
    pub fn observe(&mut self, quote: &Quote) {
        self.window.push(quote.mid());
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl TickStrategy for BandBreakoutStrategy {
    fn name(&self) -> &str {
        "band_breakout"
    }

    fn products(&self) -> Vec<&str> {
        vec![self.product.as_str()]
    }

    fn on_tick(&mut self, market: &MarketView<'_>) -> Result<Vec<Order>, EngineError> {
        let quote = market.quote(&self.product)?;
        let limit = market.limit(&self.product)?;
        let order = self.decide(&quote, market.position(&self.product), limit);
        self.observe(&quote);
        Ok(vec![order])
    }

    fn reset(&mut self) {
        BandBreakoutStrategy::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(value: i64) -> PositionLimit {
        PositionLimit::new(value).unwrap()
    }

    /// Strategy whose window holds mids alternating 99/101: avg 100, std 1
    fn warmed_up() -> BandBreakoutStrategy {
        let mut strategy = BandBreakoutStrategy::new("BANANAS", BandBreakoutParams::default());
        for i in 0..10 {
            let quote = if i % 2 == 0 {
                Quote::new(98, 10, 100, 10)
            } else {
                Quote::new(100, 10, 102, 10)
            };
            strategy.observe(&quote);
        }
        strategy
    }

    #[test]
    fn test_cold_window_only_unwinds() {
        let strategy = BandBreakoutStrategy::new("BANANAS", BandBreakoutParams::default());
        let quote = Quote::new(200, 5, 202, 5);
        let order = strategy.decide(&quote, 8, limit(20));
        assert_eq!(order, Order::new("BANANAS", 201, -8));

        let flat = strategy.decide(&quote, 0, limit(20));
        assert!(flat.is_placeholder());
    }

    #[test]
    fn test_sell_breakout_to_negative_limit() {
        let strategy = warmed_up();
        // mid 101: above the inner band (100.7), below the outer band (102)
        let quote = Quote::new(100, 5, 102, 5);
        assert_eq!(strategy.signal(&quote, 0), BreakoutSignal::Sell);
        let order = strategy.decide(&quote, 5, limit(20));
        assert_eq!(order, Order::new("BANANAS", 101, -25));
        assert_eq!(order.position_after_fill(5), -20);
    }

    #[test]
    fn test_outer_band_scales_margin() {
        let strategy = warmed_up();
        let quote = Quote::new(104, 5, 106, 5);
        let order = strategy.decide(&quote, 0, limit(20));
        assert_eq!(order, Order::new("BANANAS", 104, -20));

        let low = Quote::new(94, 5, 96, 5);
        let order = strategy.decide(&low, 0, limit(20));
        assert_eq!(order, Order::new("BANANAS", 96, 20));
    }

    #[test]
    fn test_force_clear_suppresses_breakout() {
        let strategy = warmed_up();
        let quote = Quote::new(104, 5, 106, 5);
        assert_eq!(strategy.signal(&quote, -20), BreakoutSignal::Unwind);
        let order = strategy.decide(&quote, -20, limit(20));
        assert_eq!(order, Order::new("BANANAS", 105, 20));
    }

    #[test]
    fn test_unwind_caps_at_clear_limit() {
        let mut params = BandBreakoutParams::default();
        params.clear_limit = 5;
        params.force_clear = 100;
        let strategy = BandBreakoutStrategy::new("BANANAS", params);
        let quote = Quote::new(98, 5, 102, 5);
        assert_eq!(strategy.decide(&quote, 12, limit(50)).quantity, -5);
        assert_eq!(strategy.decide(&quote, -3, limit(50)).quantity, 3);
    }

    #[test]
    fn test_orders_stay_within_limits() {
        let strategy = warmed_up();
        let quotes = [
            Quote::new(104, 5, 106, 5),
            Quote::new(94, 5, 96, 5),
            Quote::new(99, 5, 101, 5),
        ];
        for quote in &quotes {
            for position in -20..=20 {
                let order = strategy.decide(quote, position, limit(20));
                assert!(
                    limit(20).contains(order.position_after_fill(position)),
                    "position {position} order {order}"
                );
            }
        }
    }

    #[test]
    fn test_position_outside_limit_never_widens() {
        let mut params = BandBreakoutParams::default();
        params.force_clear = 100;
        let mut strategy = BandBreakoutStrategy::new("BANANAS", params);
        for i in 0..10 {
            strategy.observe(&if i % 2 == 0 { Quote::new(98, 1, 100, 1) } else { Quote::new(100, 1, 102, 1) });
        }
        let high = Quote::new(104, 5, 106, 5);
        assert_eq!(strategy.decide(&high, -25, limit(20)).quantity, 0);
    }

    #[test]
    fn test_decide_does_not_mutate() {
        let strategy = warmed_up();
        let quote = Quote::new(104, 5, 106, 5);
        let first = strategy.decide(&quote, 3, limit(20));
        let second = strategy.decide(&quote, 3, limit(20));
        assert_eq!(first, second);
        assert_eq!(strategy.window().len(), 10);
    }

    #[test]
    fn test_observe_pushes_mid() {
        let mut strategy = BandBreakoutStrategy::new("BANANAS", BandBreakoutParams::default());
        strategy.observe(&Quote::new(4949, 1, 4952, 1));
        assert_eq!(strategy.window().latest(), Some(4950.5));
        strategy.reset();
        assert!(strategy.window().is_empty());
    }
}
