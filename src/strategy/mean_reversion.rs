//! Mean Reversion Around a Fixed Fair Value
//!
//! For products that oscillate around a known price. Each side is quoted
//! independently when the touch is at least `min_profit_margin` through the
//! fair value, with size proportional to the edge:
//!
//! - buy edge  = true_price - best_ask
//! - sell edge = best_bid - true_price
//! - size      = min(floor(alpha * edge * lot_size), headroom)
//!
//! With an edge of two or more the order steps one tick inside the touch.
//! Stateless: the same quote and position always give the same orders.

use crate::domain::{Order, PositionLimit, Product, Quote};
use crate::ports::{EngineError, MarketView, TickStrategy};

use super::params::MeanReversionParams;

#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    product: Product,
    params: MeanReversionParams,
}

impl MeanReversionStrategy {
    pub fn new(product: impl Into<Product>, params: MeanReversionParams) -> Self {
        Self {
            product: product.into(),
            params,
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn params(&self) -> &MeanReversionParams {
        &self.params
    }

    fn wanted(&self, edge: i64) -> i64 {
        (self.params.alpha * (edge * self.params.lot_size) as f64).floor() as i64
    }

    /// Zero, one or two orders; the sell side is listed first
    pub fn decide(&self, quote: &Quote, position: i64, limit: PositionLimit) -> Vec<Order> {
        let mut orders = Vec::with_capacity(2);

        let sell_edge = quote.bid_price - self.params.true_price;
        if sell_edge >= self.params.min_profit_margin {
            let step = if sell_edge >= 2 { 1 } else { 0 };
            let quantity = limit.clamp_sell(position, self.wanted(sell_edge));
            tracing::debug!(product = %self.product, edge = sell_edge, quantity, "sell edge");
            orders.push(Order::new(self.product.as_str(), quote.bid_price - step, -quantity));
        }

        let buy_edge = self.params.true_price - quote.ask_price;
        if buy_edge >= self.params.min_profit_margin {
            let step = if buy_edge >= 2 { 1 } else { 0 };
            let quantity = limit.clamp_buy(position, self.wanted(buy_edge));
            tracing::debug!(product = %self.product, edge = buy_edge, quantity, "buy edge");
            orders.push(Order::new(self.product.as_str(), quote.ask_price + step, quantity));
        }

        orders
    }
}

impl TickStrategy for MeanReversionStrategy {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn products(&self) -> Vec<&str> {
        vec![self.product.as_str()]
    }

    fn on_tick(&mut self, market: &MarketView<'_>) -> Result<Vec<Order>, EngineError> {
        let quote = market.quote(&self.product)?;
        let limit = market.limit(&self.product)?;
        Ok(self.decide(&quote, market.position(&self.product), limit))
    }

    fn reset(&mut self) {}
}
