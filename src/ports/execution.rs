//! Execution port
//!
//! Where a tick's orders go once decided. The engine itself never submits;
//! the replay runner hands each tick's orders to an `OrderSink`.

use thiserror::Error;

use crate::domain::TickOrders;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write orders: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode orders: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Order sink rejected tick {timestamp}: {reason}")]
    Rejected { timestamp: u64, reason: String },
}

#[cfg_attr(test, mockall::automock)]
pub trait OrderSink {
    /// Accept the orders decided for the tick at `timestamp`
    fn submit(&mut self, timestamp: u64, orders: &TickOrders) -> Result<(), SinkError>;

    /// Flush anything buffered
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<T: OrderSink + ?Sized> OrderSink for Box<T> {
    fn submit(&mut self, timestamp: u64, orders: &TickOrders) -> Result<(), SinkError> {
        (**self).submit(timestamp, orders)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}
