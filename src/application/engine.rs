//! Decision Engine
//!
//! Runs every configured strategy once per tick:
//! 1. top of book for each product (empty sides are kept as errors)
//! 2. positions, with a zero entry for listed products the host left out
//! 3. cash from our fills on the previous tick
//! 4. each strategy decides, then advances its own windows
//! 5. orders are merged per product
//!
//! A strategy that fails (degenerate book, missing observation) is skipped
//! for the tick with a warning; the other strategies still run. After the
//! configured final tick the session and every window start over.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{
    BookError, PositionLimit, Positions, Product, Quote, SessionSettings, SessionState, TickOrders,
};
use crate::ports::{EngineError, MarketView, TickStrategy, TradingState};
use crate::strategy::{
    BandBreakoutStrategy, IndicatorMomentumStrategy, MeanReversionStrategy, PairsArbitrageStrategy,
};

pub struct Engine {
    strategies: Vec<Box<dyn TickStrategy>>,
    limits: BTreeMap<Product, PositionLimit>,
    session: SessionState,
    last_errors: Vec<EngineError>,
    last_profit: f64,
}

impl Engine {
    /// Build every strategy listed in `config`
    pub fn new(config: &Config) -> Self {
        let mut strategies: Vec<Box<dyn TickStrategy>> = Vec::with_capacity(config.strategy_count());
        strategies.extend(
            config
                .band_breakout
                .iter()
                .map(|s| Box::new(BandBreakoutStrategy::from(s)) as Box<dyn TickStrategy>),
        );
        strategies.extend(
            config
                .mean_reversion
                .iter()
                .map(|s| Box::new(MeanReversionStrategy::from(s)) as Box<dyn TickStrategy>),
        );
        strategies.extend(
            config
                .pairs_arbitrage
                .iter()
                .map(|s| Box::new(PairsArbitrageStrategy::from(s)) as Box<dyn TickStrategy>),
        );
        strategies.extend(
            config
                .indicator_momentum
                .iter()
                .map(|s| Box::new(IndicatorMomentumStrategy::from(s)) as Box<dyn TickStrategy>),
        );

        Self::from_parts(config.session.clone(), config.position_limits.clone(), strategies)
    }

    pub fn from_parts(
        settings: SessionSettings,
        limits: BTreeMap<Product, PositionLimit>,
        strategies: Vec<Box<dyn TickStrategy>>,
    ) -> Self {
        Self {
            strategies,
            limits,
            session: SessionState::new(settings),
            last_errors: Vec::new(),
            last_profit: 0.0,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn limits(&self) -> &BTreeMap<Product, PositionLimit> {
        &self.limits
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Strategies skipped on the most recent tick and why
    pub fn last_errors(&self) -> &[EngineError] {
        &self.last_errors
    }

    /// Mark-to-market profit at the end of the most recent tick.
    /// Kept across the reset that follows the final tick.
    pub fn last_profit(&self) -> f64 {
        self.last_profit
    }

    /// Decide the orders for one tick and advance all state
    pub fn on_tick(&mut self, state: &TradingState) -> TickOrders {
        let timestamp = state.timestamp;
        self.last_errors.clear();

        let quotes: BTreeMap<Product, Result<Quote, BookError>> = state
            .order_depths
            .iter()
            .map(|(product, depth)| (product.clone(), depth.quote()))
            .collect();
        let mids: BTreeMap<Product, f64> = quotes
            .iter()
            .filter_map(|(product, quote)| quote.as_ref().ok().map(|q| (product.clone(), q.mid())))
            .collect();
        for (product, quote) in quotes.iter().filter_map(|(p, q)| q.as_ref().ok().map(|q| (p, q))) {
            debug!(
                timestamp,
                product = %product,
                mid = quote.mid(),
                wap = quote.wap(),
                spread = quote.spread(),
                "book"
            );
        }

        let positions = Positions::from_reported(&state.position, state.products());

        let fills = self.session.reconcile_fills(&state.own_trades, timestamp);
        if fills.bought > 0 || fills.sold > 0 {
            debug!(
                timestamp,
                bought = fills.bought,
                sold = fills.sold,
                cash = self.session.cash(),
                "fills reconciled"
            );
        }

        let market = MarketView {
            timestamp,
            session: &self.session,
            quotes: &quotes,
            positions: &positions,
            limits: &self.limits,
            observations: &state.observations,
        };

        let mut orders = TickOrders::new();
        for strategy in self.strategies.iter_mut() {
            for product in strategy.products() {
                orders.touch(product);
            }
            match strategy.on_tick(&market) {
                Ok(decided) => orders.extend(decided),
                Err(e) => {
                    warn!(timestamp, strategy = strategy.name(), error = %e, "strategy skipped");
                    self.last_errors.push(e);
                }
            }
        }

        for (product, product_orders) in orders.iter() {
            for order in product_orders.iter().filter(|o| !o.is_placeholder()) {
                debug!(timestamp, product = %product, price = order.price, quantity = order.quantity, "order");
            }
        }

        let profit = self.session.mark_to_market(&positions, &mids);
        debug!(timestamp, cash = self.session.cash(), profit, "tick done");
        self.last_profit = profit;

        self.session.advance(timestamp);
        if self.session.is_final_tick(timestamp) {
            info!(
                timestamp,
                cash = self.session.cash(),
                profit,
                ticks = self.session.ticks_seen(),
                "final tick, session profit"
            );
            self.reset();
        }

        orders
    }

    /// Start a fresh session: cash, fill memory and every window
    pub fn reset(&mut self) {
        self.session.reset();
        for strategy in self.strategies.iter_mut() {
            strategy.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderDepth, Trade};

    fn depth(bid: i64, ask: i64) -> OrderDepth {
        let mut depth = OrderDepth::default();
        depth.buy_orders.insert(bid, 10);
        depth.sell_orders.insert(ask, -10);
        depth
    }

    fn pearls_only() -> Config {
        Config {
            band_breakout: Vec::new(),
            pairs_arbitrage: Vec::new(),
            indicator_momentum: Vec::new(),
            ..Config::default()
        }
    }

    #[test]
    fn test_new_builds_all_strategies() {
        let engine = Engine::new(&Config::default());
        assert_eq!(
            engine.strategy_names(),
            vec!["band_breakout", "mean_reversion", "pairs_arbitrage", "indicator_momentum"]
        );
    }

    #[test]
    fn test_missing_position_defaults_to_flat() {
        let mut engine = Engine::new(&pearls_only());
        let state = TradingState::new(0).with_depth("PEARLS", depth(10003, 9995));
        let orders = engine.on_tick(&state);
        assert_eq!(
            orders.get("PEARLS"),
            &[Order::new("PEARLS", 10002, -20), Order::new("PEARLS", 9996, 20)]
        );
    }

    #[test]
    fn test_degenerate_book_skips_only_that_strategy() {
        let mut engine = Engine::new(&Config::default());
        let mut bananas = OrderDepth::default();
        bananas.buy_orders.insert(4950, 5);
        let state = TradingState::new(0)
            .with_depth("BANANAS", bananas)
            .with_depth("PEARLS", depth(10003, 9995))
            .with_depth("COCONUTS", depth(7999, 8001))
            .with_depth("PINA_COLADAS", depth(14999, 15001))
            .with_depth("DIVING_GEAR", depth(99_999, 100_001))
            .with_observation("DOLPHIN_SIGHTINGS", 3000.0);

        let orders = engine.on_tick(&state);
        assert!(orders.get("BANANAS").is_empty());
        assert_eq!(orders.get("PEARLS").len(), 2);
        assert_eq!(
            engine.last_errors(),
            &[EngineError::DegenerateBook {
                product: "BANANAS".to_string(),
                side: crate::domain::BookSide::Ask
            }]
        );
    }

    #[test]
    fn test_missing_observation_is_reported() {
        let mut engine = Engine::new(&Config::default());
        let state = TradingState::new(0).with_depth("DIVING_GEAR", depth(99_999, 100_001));
        let orders = engine.on_tick(&state);
        assert!(orders.get("DIVING_GEAR").is_empty());
        assert!(engine
            .last_errors()
            .contains(&EngineError::MissingObservation("DOLPHIN_SIGHTINGS".to_string())));
    }

    #[test]
    fn test_cash_reconciled_from_previous_tick() {
        let mut engine = Engine::new(&pearls_only());
        engine.on_tick(&TradingState::new(0).with_depth("PEARLS", depth(9998, 10002)));
        let fill = Trade {
            symbol: "PEARLS".to_string(),
            price: 9996,
            quantity: 20,
            buyer: Some("SUBMISSION".to_string()),
            seller: None,
            timestamp: 0,
        };
        let state = TradingState::new(100)
            .with_depth("PEARLS", depth(9998, 10002))
            .with_position("PEARLS", 20)
            .with_own_trade(fill);
        engine.on_tick(&state);
        assert_eq!(engine.session().cash(), -9996 * 20);
        assert_eq!(engine.session().last_bought_price(), Some(9996));
        // 20 PEARLS marked at a mid of 10000
        assert_eq!(engine.last_profit(), (20 * 10000 - 9996 * 20) as f64);
    }

    #[test]
    fn test_final_tick_resets_session() {
        let mut config = pearls_only();
        config.session.final_timestamp = Some(200);
        let mut engine = Engine::new(&config);
        for ts in [0, 100, 200] {
            engine.on_tick(&TradingState::new(ts).with_depth("PEARLS", depth(9998, 10002)));
        }
        assert_eq!(engine.session().ticks_seen(), 0);
        assert!(engine.session().last_timestamp().is_none());
    }

    #[test]
    fn test_pairs_cold_start_again_after_reset() {
        let mut config = Config {
            band_breakout: Vec::new(),
            mean_reversion: Vec::new(),
            indicator_momentum: Vec::new(),
            ..Config::default()
        };
        config.session.final_timestamp = Some(500);
        let mut engine = Engine::new(&config);

        let flat = |ts| {
            TradingState::new(ts)
                .with_depth("COCONUTS", depth(7999, 8001))
                .with_depth("PINA_COLADAS", depth(14999, 15001))
        };
        let rich = |ts| {
            TradingState::new(ts)
                .with_depth("COCONUTS", depth(8010, 8012))
                .with_depth("PINA_COLADAS", depth(14999, 15001))
        };

        for ts in [0, 100, 200, 300, 400, 500] {
            engine.on_tick(&flat(ts));
        }
        assert_eq!(engine.session().ticks_seen(), 0);

        // new session: the spread windows are empty again
        for ts in [600, 700, 800, 900] {
            let orders = engine.on_tick(&rich(ts));
            assert!(orders.get("COCONUTS").is_empty(), "orders at {ts}");
            assert!(orders.get("PINA_COLADAS").is_empty(), "orders at {ts}");
        }
        let orders = engine.on_tick(&rich(1000));
        assert_eq!(orders.get("COCONUTS").len(), 2);
        assert_eq!(orders.get("PINA_COLADAS").len(), 2);
    }

    #[test]
    fn test_same_snapshot_same_orders_for_stateless_strategy() {
        let mut engine = Engine::new(&pearls_only());
        let state = TradingState::new(0).with_depth("PEARLS", depth(10003, 9995));
        let first = engine.on_tick(&state);
        let second = engine.on_tick(&state);
        assert_eq!(first, second);
    }

    #[test]
    fn test_strategy_products_always_present() {
        let mut engine = Engine::new(&pearls_only());
        let orders = engine.on_tick(&TradingState::new(0).with_depth("PEARLS", depth(9998, 10002)));
        assert_eq!(orders.products().count(), 1);
        assert!(orders.get("PEARLS").is_empty());
    }
}
