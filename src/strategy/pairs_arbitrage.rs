//! Pairs Arbitrage
//!
//! Two products whose fair values are linked by a lot ratio, e.g. 15 units of
//! A trade at roughly the value of 8 units of B. Two cross spreads are tracked:
//!
//!   spread_ab = bid(A) * lot_a - ask(B) * lot_b   (sell A, buy B)
//!   spread_ba = bid(B) * lot_b - ask(A) * lot_a   (buy A, sell B)
//!
//! When a spread breaks above its rolling `inner_band` threshold the pair is
//! traded in whole lots so both legs carry the same lot count. The tighter
//! of the two thresholds is widened by `tie_break_bump` so the noisier side
//! does not fire first; this is a tuned heuristic without a deeper invariant.
//!
//! Nothing is traded until `window_size` ticks of the current session have
//! been processed, but both spread windows are fed from the first tick on.

use crate::domain::{Order, PositionLimit, Product, Quote};
use crate::ports::{EngineError, MarketView, TickStrategy};

use super::params::PairsArbitrageParams;
use super::window::RollingWindow;

/// One product's view for the tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairLeg {
    pub quote: Quote,
    pub position: i64,
    pub limit: PositionLimit,
}

impl PairLeg {
    pub fn new(quote: Quote, position: i64, limit: PositionLimit) -> Self {
        Self {
            quote,
            position,
            limit,
        }
    }
}

/// Orders for both legs. A holds `[sell, buy]`, B holds `[buy, sell]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOrders {
    pub a: Vec<Order>,
    pub b: Vec<Order>,
}

/// Current thresholds after the tie-break
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadThresholds {
    pub upper_ab: f64,
    pub upper_ab_outer: f64,
    pub upper_ba: f64,
    pub upper_ba_outer: f64,
}

#[derive(Debug, Clone)]
pub struct PairsArbitrageStrategy {
    product_a: Product,
    product_b: Product,
    params: PairsArbitrageParams,
    window_ab: RollingWindow,
    window_ba: RollingWindow,
}

impl PairsArbitrageStrategy {
    pub fn new(
        product_a: impl Into<Product>,
        product_b: impl Into<Product>,
        params: PairsArbitrageParams,
    ) -> Self {
        let window_ab = RollingWindow::new(params.window_size);
        let window_ba = RollingWindow::new(params.window_size);
        Self {
            product_a: product_a.into(),
            product_b: product_b.into(),
            params,
            window_ab,
            window_ba,
        }
    }

    pub fn product_a(&self) -> &str {
        &self.product_a
    }

    pub fn product_b(&self) -> &str {
        &self.product_b
    }

    pub fn params(&self) -> &PairsArbitrageParams {
        &self.params
    }

    pub fn window_ab(&self) -> &RollingWindow {
        &self.window_ab
    }

    pub fn window_ba(&self) -> &RollingWindow {
        &self.window_ba
    }

    /// Value of selling a lot of A into its bid and buying a lot of B at its ask
    pub fn spread_ab(&self, a: &Quote, b: &Quote) -> i64 {
        a.bid_price * self.params.lot_size_a - b.ask_price * self.params.lot_size_b
    }

    /// Value of selling a lot of B into its bid and buying a lot of A at its ask
    pub fn spread_ba(&self, a: &Quote, b: &Quote) -> i64 {
        b.bid_price * self.params.lot_size_b - a.ask_price * self.params.lot_size_a
    }

    pub fn thresholds(&self) -> SpreadThresholds {
        let (mut upper_ab, _) = self.window_ab.bounds(self.params.inner_band);
        let (upper_ab_outer, _) = self.window_ab.bounds(self.params.outer_band);
        let (mut upper_ba, _) = self.window_ba.bounds(self.params.inner_band);
        let (upper_ba_outer, _) = self.window_ba.bounds(self.params.outer_band);

        if upper_ab < upper_ba {
            upper_ab += self.params.tie_break_bump;
        } else {
            upper_ba += self.params.tie_break_bump;
        }

        SpreadThresholds {
            upper_ab,
            upper_ab_outer,
            upper_ba,
            upper_ba_outer,
        }
    }

    fn lots(&self, units_a: i64, units_b: i64) -> i64 {
        let cap = self.params.trade_amount_cap;
        let lots_a = units_a.min(cap) / self.params.lot_size_a;
        let lots_b = units_b.min(cap) / self.params.lot_size_b;
        lots_a.min(lots_b).max(0)
    }

    /// Orders for both legs, or `None` during the cold start.
    /// Does not touch the windows.
    pub fn decide(&self, elapsed_ticks: u64, a: &PairLeg, b: &PairLeg) -> Option<PairOrders> {
        if elapsed_ticks < self.params.window_size as u64 {
            return None;
        }

        let t = self.thresholds();
        let spread_ab = self.spread_ab(&a.quote, &b.quote) as f64;
        let spread_ba = self.spread_ba(&a.quote, &b.quote) as f64;

        let mut sell_a = 0;
        let mut buy_a = 0;
        let mut sell_b = 0;
        let mut buy_b = 0;

        if spread_ab > t.upper_ab
            && a.limit.sell_headroom(a.position) > 0
            && b.limit.buy_headroom(b.position) > 0
        {
            let lots = self.lots(
                a.limit.sell_headroom(a.position),
                b.limit.buy_headroom(b.position),
            );
            tracing::debug!(spread_ab, upper = t.upper_ab, lots, "sell A, buy B");
            sell_a = lots * self.params.lot_size_a;
            buy_b = lots * self.params.lot_size_b;
        } else if spread_ba > t.upper_ba
            && a.limit.buy_headroom(a.position) > 0
            && b.limit.sell_headroom(b.position) > 0
        {
            let lots = self.lots(
                a.limit.buy_headroom(a.position),
                b.limit.sell_headroom(b.position),
            );
            tracing::debug!(spread_ba, upper = t.upper_ba, lots, "buy A, sell B");
            buy_a = lots * self.params.lot_size_a;
            sell_b = lots * self.params.lot_size_b;
        }

        let margin = self.params.margin;
        let buy_b_margin = if spread_ab > t.upper_ab_outer { 2 * margin } else { margin };
        let sell_b_margin = if spread_ba > t.upper_ba_outer { 2 * margin } else { margin };

        let orders = PairOrders {
            a: vec![
                Order::new(self.product_a.as_str(), a.quote.ask_price - margin, -sell_a),
                Order::new(self.product_a.as_str(), a.quote.bid_price + margin, buy_a),
            ],
            b: vec![
                Order::new(self.product_b.as_str(), b.quote.bid_price + buy_b_margin, buy_b),
                Order::new(self.product_b.as_str(), b.quote.ask_price - sell_b_margin, -sell_b),
            ],
        };
        Some(orders)
    }

    /// Push the tick's spreads. Call after `decide`, on every tick.
    pub fn observe(&mut self, a: &Quote, b: &Quote) {
        let spread_ab = self.spread_ab(a, b) as f64;
        let spread_ba = self.spread_ba(a, b) as f64;
        self.window_ab.push(spread_ab);
        self.window_ba.push(spread_ba);
    }

    pub fn reset(&mut self) {
        self.window_ab.clear();
        self.window_ba.clear();
    }
}

impl TickStrategy for PairsArbitrageStrategy {
    fn name(&self) -> &str {
        "pairs_arbitrage"
    }

    fn products(&self) -> Vec<&str> {
        vec![self.product_a.as_str(), self.product_b.as_str()]
    }

    fn on_tick(&mut self, market: &MarketView<'_>) -> Result<Vec<Order>, EngineError> {
        let a = PairLeg::new(
            market.quote(&self.product_a)?,
            market.position(&self.product_a),
            market.limit(&self.product_a)?,
        );
        let b = PairLeg::new(
            market.quote(&self.product_b)?,
            market.position(&self.product_b),
            market.limit(&self.product_b)?,
        );

        let decided = self.decide(market.elapsed_ticks(), &a, &b);
        self.observe(&a.quote, &b.quote);

        Ok(decided
            .map(|PairOrders { a, b }| a.into_iter().chain(b).collect::<Vec<_>>())
            .unwrap_or_default())
    }

    fn reset(&mut self) {
        PairsArbitrageStrategy::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COCONUTS: &str = "COCONUTS";
    const PINA: &str = "PINA_COLADAS";

    fn strategy() -> PairsArbitrageStrategy {
        PairsArbitrageStrategy::new(COCONUTS, PINA, PairsArbitrageParams::default())
    }

    fn leg(bid: i64, ask: i64, position: i64, limit: i64) -> PairLeg {
        PairLeg::new(Quote::new(bid, 50, ask, 50), position, PositionLimit::new(limit).unwrap())
    }

    /// Feeds quotes whose AB spread alternates around 0
    fn warmed_up() -> PairsArbitrageStrategy {
        let mut strategy = strategy();
        for i in 0..4 {
            let a = if i % 2 == 0 { Quote::new(8000, 50, 8002, 50) } else { Quote::new(8001, 50, 8003, 50) };
            let b = Quote::new(14998, 50, 15000, 50);
            strategy.observe(&a, &b);
        }
        strategy
    }

    #[test]
    fn test_cold_start_emits_nothing() {
        let strategy = warmed_up();
        let a = leg(9000, 9002, 0, 600);
        let b = leg(14998, 15000, 0, 300);
        for ticks in 0..4 {
            assert!(strategy.decide(ticks, &a, &b).is_none());
        }
        assert!(strategy.decide(4, &a, &b).is_some());
    }

    #[test]
    fn test_spread_definitions() {
        let strategy = strategy();
        let a = Quote::new(8000, 1, 8002, 1);
        let b = Quote::new(14998, 1, 15000, 1);
        assert_eq!(strategy.spread_ab(&a, &b), 8000 * 15 - 15000 * 8);
        assert_eq!(strategy.spread_ba(&a, &b), 14998 * 8 - 8002 * 15);
    }

    #[test]
    fn test_tie_break_bumps_tighter_side() {
        let strategy = warmed_up();
        let (raw_ab, _) = strategy.window_ab().bounds(1.0);
        let (raw_ba, _) = strategy.window_ba().bounds(1.0);
        let t = strategy.thresholds();
        assert!(raw_ab > raw_ba);
        assert_eq!(t.upper_ab, raw_ab);
        assert_eq!(t.upper_ba, raw_ba + 25.0);
    }

    #[test]
    fn test_tie_break_equal_bounds_bumps_ba() {
        // heuristic: on a tie the BA threshold is the one widened
        let strategy = strategy();
        let t = strategy.thresholds();
        assert_eq!(t.upper_ab, 0.0);
        assert_eq!(t.upper_ba, 25.0);
    }

    #[test]
    fn test_sell_a_buy_b_in_equal_lots() {
        let strategy = warmed_up();
        // A bid jumps: spread_ab = 9000*15 - 15000*8 = 15000
        let a = leg(9000, 9002, 0, 600);
        let b = leg(14998, 15000, 0, 300);
        let orders = strategy.decide(4, &a, &b).unwrap();

        // B headroom 300 -> 37 lots, A headroom 600 -> 40 lots
        assert_eq!(orders.a[0], Order::new(COCONUTS, 9001, -37 * 15));
        assert_eq!(orders.a[1].quantity, 0);
        assert_eq!(orders.b[0], Order::new(PINA, 14998 + 2, 37 * 8));
        assert_eq!(orders.b[1].quantity, 0);
    }

    #[test]
    fn test_buy_a_sell_b() {
        let strategy = warmed_up();
        // A ask drops far enough that spread_ba clears its bumped threshold
        let a = leg(7000, 7002, 0, 600);
        let b = leg(14998, 15000, 0, 300);
        let orders = strategy.decide(10, &a, &b).unwrap();
        assert!(orders.a[1].quantity > 0);
        assert!(orders.b[1].quantity < 0);
        assert_eq!(orders.a[0].quantity, 0);
        assert_eq!(orders.b[0].quantity, 0);
    }

    #[test]
    fn test_quiet_tick_emits_placeholders() {
        let strategy = warmed_up();
        let a = leg(8000, 8002, 0, 600);
        let b = leg(14998, 15000, 0, 300);
        let orders = strategy.decide(10, &a, &b).unwrap();
        assert_eq!(orders.a.len(), 2);
        assert_eq!(orders.b.len(), 2);
        assert!(orders.a.iter().chain(&orders.b).all(Order::is_placeholder));
    }

    #[test]
    fn test_lot_multiples_and_limits() {
        let strategy = warmed_up();
        let b = leg(14998, 15000, 0, 300);
        for pos_a in [-600, -450, -17, 0, 33, 599] {
            for pos_b in [-300, -5, 0, 150, 299, 300] {
                let a = PairLeg { position: pos_a, ..leg(9000, 9002, 0, 600) };
                let b = PairLeg { position: pos_b, ..b };
                let orders = strategy.decide(4, &a, &b).unwrap();
                let units_a: i64 = orders.a.iter().map(|o| o.quantity).sum();
                let units_b: i64 = orders.b.iter().map(|o| o.quantity).sum();
                assert_eq!(units_a % 15, 0);
                assert_eq!(units_b % 8, 0);
                assert_eq!(-units_a / 15, units_b / 8);
                assert!(a.limit.contains(pos_a + units_a));
                assert!(b.limit.contains(pos_b + units_b));
            }
        }
    }

    #[test]
    fn test_full_legs_block_trade() {
        let strategy = warmed_up();
        let a = leg(9000, 9002, -600, 600);
        let b = leg(14998, 15000, 0, 300);
        let orders = strategy.decide(4, &a, &b).unwrap();
        assert!(orders.a.iter().chain(&orders.b).all(Order::is_placeholder));
    }

    #[test]
    fn test_decide_is_pure_and_observe_feeds_both_windows() {
        let mut strategy = warmed_up();
        let a = leg(9000, 9002, 0, 600);
        let b = leg(14998, 15000, 0, 300);
        assert_eq!(strategy.decide(4, &a, &b), strategy.decide(4, &a, &b));

        strategy.observe(&a.quote, &b.quote);
        assert_eq!(strategy.window_ab().latest(), Some(15000.0));
        assert_eq!(strategy.window_ba().latest(), Some((14998 * 8 - 9002 * 15) as f64));
        assert_eq!(strategy.window_ab().len(), 4);

        strategy.reset();
        assert!(strategy.window_ab().is_empty());
        assert!(strategy.window_ba().is_empty());
    }
}
