//! JSON Lines replay adapters
//!
//! Input: one `TradingState` JSON object per line. Blank lines are skipped.
//! Output: one `{"timestamp": .., "orders": {..}}` object per tick.

use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use crate::domain::TickOrders;
use crate::ports::{OrderSink, SinkError, SourceError, TickSource, TradingState};

/// Reads ticks from any buffered reader
pub struct JsonlTickSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonlTickSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> TickSource for JsonlTickSource<R> {
    fn next_tick(&mut self) -> Result<Option<TradingState>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            let state = serde_json::from_str(trimmed).map_err(|source| SourceError::Parse {
                line: self.line,
                source,
            })?;
            return Ok(Some(state));
        }
    }
}

/// One output line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub timestamp: u64,
    pub orders: TickOrders,
}

/// Writes one JSON line per tick
pub struct JsonlOrderSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlOrderSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OrderSink for JsonlOrderSink<W> {
    fn submit(&mut self, timestamp: u64, orders: &TickOrders) -> Result<(), SinkError> {
        let record = OrderRecord {
            timestamp,
            orders: orders.clone(),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
