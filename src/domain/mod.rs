//! Domain Layer - Core types for the decision engine
//!
//! Pure data types with no I/O:
//! - `order`: orders and the per-tick order set
//! - `book`: order book snapshots and top-of-book quotes
//! - `position`: position limits and per-product holdings
//! - `trade`: fills reported by the exchange
//! - `session`: cash and fill-price memory for one trading session

pub mod book;
pub mod order;
pub mod position;
pub mod session;
pub mod trade;

pub use book::{BookError, BookSide, OrderDepth, Quote};
pub use order::{Order, Product, TickOrders};
pub use position::{PositionError, PositionLimit, Positions};
pub use session::{FillSummary, SessionSettings, SessionState};
pub use trade::Trade;
