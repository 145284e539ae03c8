//! Strategy Layer - Rolling statistics and the per-product decision rules
//!
//! Building blocks:
//! - `RollingWindow`: fixed-capacity buffer with mean / population std / bands
//! - `DifferenceSeries`: lagged differences over a window
//! - `SignalTracer`: rolling history of a derived signal
//!
//! Decision families:
//! - `BandBreakoutStrategy`: quote against a mid-price band, unwind otherwise
//! - `MeanReversionStrategy`: size proportional to distance from a fixed fair value
//! - `PairsArbitrageStrategy`: lot-matched trades on two cross spreads
//! - `IndicatorMomentumStrategy`: exogenous indicator entries, trend-exhaustion exits
//!
//! Every strategy separates a pure decision step from the step that pushes
//! the tick's observations, so a decision can be replayed without side effects.

pub mod band_breakout;
pub mod difference;
pub mod indicator_momentum;
pub mod mean_reversion;
pub mod pairs_arbitrage;
pub mod params;
pub mod tracer;
pub mod window;

pub use band_breakout::{BandBreakoutStrategy, BreakoutSignal};
pub use difference::DifferenceSeries;
pub use indicator_momentum::{IndicatorMomentumStrategy, MomentumDecision};
pub use mean_reversion::MeanReversionStrategy;
pub use pairs_arbitrage::{PairLeg, PairOrders, PairsArbitrageStrategy, SpreadThresholds};
pub use params::{
    BandBreakoutParams, IndicatorMomentumParams, MeanReversionParams, PairsArbitrageParams, ParamError,
};
pub use tracer::{Extremity, SignalTracer};
pub use window::RollingWindow;
