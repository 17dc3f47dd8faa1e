//! Durable trade logging. The wire format is a fixed 40-byte little-endian
//! record:
//!
//! ```text
//! offset  size  field
//! 0       8     trade_id         u64
//! 8       8     timestamp        u64
//! 16      8     price_ticks      i64
//! 24      4     taker_order_id   u32
//! 28      4     maker_order_id   u32
//! 32      4     qty              i32
//! 36      1     side             u8 (0 = buy, 1 = sell)
//! 37      3     padding          zeroed
//! ```
//!
//! A failure to write or flush is propagated as `io::Error`; this module
//! never panics on an I/O failure.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::trade::Trade;

pub const TRADE_RECORD_LEN: usize = 40;

pub trait TradeLogger: Send {
    fn log(&mut self, trade: &Trade) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    fn close(self: Box<Self>) -> io::Result<()>;
}

pub struct BinaryTradeLogger {
    file: File,
}

impl BinaryTradeLogger {
    /// Opens (creating if necessary) the file at `path` in append mode.
    /// Returns the underlying `io::Error` rather than panicking if the file
    /// cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self { file })
    }

    fn encode(trade: &Trade) -> [u8; TRADE_RECORD_LEN] {
        let mut buf = [0u8; TRADE_RECORD_LEN];
        buf[0..8].copy_from_slice(&trade.trade_id.to_le_bytes());
        buf[8..16].copy_from_slice(&trade.timestamp.to_le_bytes());
        buf[16..24].copy_from_slice(&(trade.price_ticks as i64).to_le_bytes());
        buf[24..28].copy_from_slice(&trade.taker_order_id.to_le_bytes());
        buf[28..32].copy_from_slice(&trade.maker_order_id.to_le_bytes());
        buf[32..36].copy_from_slice(&trade.qty.to_le_bytes());
        buf[36] = trade.side.as_u8();
        // bytes 37..40 stay zeroed padding
        buf
    }
}

impl TradeLogger for BinaryTradeLogger {
    fn log(&mut self, trade: &Trade) -> io::Result<()> {
        let buf = Self::encode(trade);
        self.file.write_all(&buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.file.flush()
    }
}
